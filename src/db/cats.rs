use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::geo::{Point, Polygon};
use crate::models::{Cat, OwnerSnapshot};

#[derive(Debug, sqlx::FromRow)]
pub struct CatRow {
    pub id: Uuid,
    pub cat_name: String,
    pub weight: f64,
    pub filename: Option<String>,
    pub birthdate: NaiveDate,
    pub owner_id: Uuid,
    pub owner_name: String,
    pub owner_email: String,
    pub location_lon: Option<f64>,
    pub location_lat: Option<f64>,
}

impl From<CatRow> for Cat {
    fn from(row: CatRow) -> Self {
        let location = match (row.location_lon, row.location_lat) {
            (Some(lon), Some(lat)) => Some(Point::new(lon, lat)),
            _ => None,
        };
        Cat {
            id: row.id,
            cat_name: row.cat_name,
            weight: row.weight,
            filename: row.filename,
            birthdate: row.birthdate,
            location,
            owner: OwnerSnapshot {
                id: row.owner_id,
                user_name: row.owner_name,
                email: row.owner_email,
            },
        }
    }
}

pub async fn create(pool: &PgPool, cat: &Cat) -> Result<Cat, sqlx::Error> {
    let row = sqlx::query_as::<_, CatRow>(
        "INSERT INTO cats (id, cat_name, weight, filename, birthdate,
                           owner_id, owner_name, owner_email, location_lon, location_lat)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) RETURNING *",
    )
    .bind(cat.id)
    .bind(&cat.cat_name)
    .bind(cat.weight)
    .bind(&cat.filename)
    .bind(cat.birthdate)
    .bind(cat.owner.id)
    .bind(&cat.owner.user_name)
    .bind(&cat.owner.email)
    .bind(cat.location.map(|p| p.lon()))
    .bind(cat.location.map(|p| p.lat()))
    .fetch_one(pool)
    .await?;
    Ok(row.into())
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Cat>, sqlx::Error> {
    let row = sqlx::query_as::<_, CatRow>("SELECT * FROM cats WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(Cat::from))
}

pub async fn list_all(pool: &PgPool) -> Result<Vec<Cat>, sqlx::Error> {
    let rows = sqlx::query_as::<_, CatRow>("SELECT * FROM cats")
        .fetch_all(pool)
        .await?;
    Ok(rows.into_iter().map(Cat::from).collect())
}

pub async fn list_by_owner(pool: &PgPool, owner_id: Uuid) -> Result<Vec<Cat>, sqlx::Error> {
    let rows = sqlx::query_as::<_, CatRow>("SELECT * FROM cats WHERE owner_id = $1")
        .bind(owner_id)
        .fetch_all(pool)
        .await?;
    Ok(rows.into_iter().map(Cat::from).collect())
}

/// `polygon @> point` counts points on the ring as contained.
pub async fn list_within(pool: &PgPool, region: &Polygon) -> Result<Vec<Cat>, sqlx::Error> {
    let rows = sqlx::query_as::<_, CatRow>(
        "SELECT * FROM cats
         WHERE location_lon IS NOT NULL AND location_lat IS NOT NULL
           AND $1::text::polygon @> point(location_lon, location_lat)",
    )
    .bind(region.to_pg_literal())
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(Cat::from).collect())
}

pub async fn update(pool: &PgPool, cat: &Cat) -> Result<Option<Cat>, sqlx::Error> {
    let row = sqlx::query_as::<_, CatRow>(
        "UPDATE cats SET cat_name = $2, weight = $3, filename = $4, birthdate = $5,
                         owner_id = $6, owner_name = $7, owner_email = $8,
                         location_lon = $9, location_lat = $10
         WHERE id = $1 RETURNING *",
    )
    .bind(cat.id)
    .bind(&cat.cat_name)
    .bind(cat.weight)
    .bind(&cat.filename)
    .bind(cat.birthdate)
    .bind(cat.owner.id)
    .bind(&cat.owner.user_name)
    .bind(&cat.owner.email)
    .bind(cat.location.map(|p| p.lon()))
    .bind(cat.location.map(|p| p.lat()))
    .fetch_optional(pool)
    .await?;
    Ok(row.map(Cat::from))
}

pub async fn delete(pool: &PgPool, id: Uuid) -> Result<Option<Cat>, sqlx::Error> {
    let row = sqlx::query_as::<_, CatRow>("DELETE FROM cats WHERE id = $1 RETURNING *")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(Cat::from))
}
