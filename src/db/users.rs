use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{Role, User};

#[derive(Debug, sqlx::FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub user_name: String,
    pub email: String,
    pub role: String,
    pub password: String,
}

impl TryFrom<UserRow> for User {
    type Error = sqlx::Error;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role = row
            .role
            .parse::<Role>()
            .map_err(|e| sqlx::Error::Decode(e.into()))?;
        Ok(User {
            id: row.id,
            user_name: row.user_name,
            email: row.email,
            role,
            password: row.password,
        })
    }
}

pub async fn create(pool: &PgPool, user: &User) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, UserRow>(
        "INSERT INTO users (id, user_name, email, role, password)
         VALUES ($1, $2, $3, $4, $5) RETURNING *",
    )
    .bind(user.id)
    .bind(&user.user_name)
    .bind(&user.email)
    .bind(user.role.as_str())
    .bind(&user.password)
    .fetch_one(pool)
    .await?
    .try_into()
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .map(User::try_from)
        .transpose()
}

pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE email = $1")
        .bind(email)
        .fetch_optional(pool)
        .await?
        .map(User::try_from)
        .transpose()
}

pub async fn list_all(pool: &PgPool) -> Result<Vec<User>, sqlx::Error> {
    sqlx::query_as::<_, UserRow>("SELECT * FROM users")
        .fetch_all(pool)
        .await?
        .into_iter()
        .map(User::try_from)
        .collect()
}

/// Role is not written here: it cannot change through a profile update.
pub async fn update(pool: &PgPool, user: &User) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, UserRow>(
        "UPDATE users SET user_name = $2, email = $3, password = $4
         WHERE id = $1 RETURNING *",
    )
    .bind(user.id)
    .bind(&user.user_name)
    .bind(&user.email)
    .bind(&user.password)
    .fetch_optional(pool)
    .await?
    .map(User::try_from)
    .transpose()
}

pub async fn delete(pool: &PgPool, id: Uuid) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, UserRow>("DELETE FROM users WHERE id = $1 RETURNING *")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .map(User::try_from)
        .transpose()
}
