use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db;
use crate::models::{Cat, User};
use crate::store::{CatFilter, CatStore, StoreError, UserStore};

/// PostgreSQL-backed store. Pool acquisition is bounded by the pool's
/// acquire timeout, which surfaces as [`StoreError::Unavailable`].
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn insert_user(&self, user: &User) -> Result<User, StoreError> {
        Ok(db::users::create(&self.pool, user).await?)
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(db::users::find_by_id(&self.pool, id).await?)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(db::users::find_by_email(&self.pool, email).await?)
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        Ok(db::users::list_all(&self.pool).await?)
    }

    async fn update_user(&self, user: &User) -> Result<Option<User>, StoreError> {
        Ok(db::users::update(&self.pool, user).await?)
    }

    async fn delete_user(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(db::users::delete(&self.pool, id).await?)
    }
}

#[async_trait]
impl CatStore for PgStore {
    async fn insert_cat(&self, cat: &Cat) -> Result<Cat, StoreError> {
        Ok(db::cats::create(&self.pool, cat).await?)
    }

    async fn find_cat(&self, id: Uuid) -> Result<Option<Cat>, StoreError> {
        Ok(db::cats::find_by_id(&self.pool, id).await?)
    }

    async fn list_cats(&self, filter: &CatFilter) -> Result<Vec<Cat>, StoreError> {
        let cats = match filter {
            CatFilter::All => db::cats::list_all(&self.pool).await?,
            CatFilter::Owner(owner_id) => db::cats::list_by_owner(&self.pool, *owner_id).await?,
            CatFilter::Within(region) => db::cats::list_within(&self.pool, region).await?,
        };
        Ok(cats)
    }

    async fn update_cat(&self, cat: &Cat) -> Result<Option<Cat>, StoreError> {
        Ok(db::cats::update(&self.pool, cat).await?)
    }

    async fn delete_cat(&self, id: Uuid) -> Result<Option<Cat>, StoreError> {
        Ok(db::cats::delete(&self.pool, id).await?)
    }
}
