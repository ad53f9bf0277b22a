//! Entity store seam. The services only ever talk to [`Store`]; which
//! backend sits behind it is decided at startup.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::geo::Polygon;
use crate::models::{Cat, User};

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug)]
pub enum StoreError {
    /// A uniqueness constraint was violated (e.g. duplicate email).
    Conflict(String),
    /// The store could not be reached in time.
    Unavailable(String),
    Database(sqlx::Error),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Conflict(msg) => write!(f, "Conflict: {msg}"),
            StoreError::Unavailable(msg) => write!(f, "Store unavailable: {msg}"),
            StoreError::Database(err) => write!(f, "Database Error: {err}"),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                StoreError::Conflict(db_err.message().to_string())
            }
            sqlx::Error::PoolTimedOut => StoreError::Unavailable(err.to_string()),
            _ => StoreError::Database(err),
        }
    }
}

/// Which cats a listing should return.
#[derive(Debug, Clone)]
pub enum CatFilter {
    All,
    /// Cats whose owner snapshot carries this user id.
    Owner(Uuid),
    /// Cats with a location inside the polygon, edges included.
    Within(Polygon),
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn insert_user(&self, user: &User) -> Result<User, StoreError>;
    async fn find_user(&self, id: Uuid) -> Result<Option<User>, StoreError>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
    async fn list_users(&self) -> Result<Vec<User>, StoreError>;
    /// Replace the stored user. `None` if it no longer exists.
    async fn update_user(&self, user: &User) -> Result<Option<User>, StoreError>;
    /// Remove and return the user. `None` if it was already gone.
    async fn delete_user(&self, id: Uuid) -> Result<Option<User>, StoreError>;
}

#[async_trait]
pub trait CatStore: Send + Sync {
    async fn insert_cat(&self, cat: &Cat) -> Result<Cat, StoreError>;
    async fn find_cat(&self, id: Uuid) -> Result<Option<Cat>, StoreError>;
    async fn list_cats(&self, filter: &CatFilter) -> Result<Vec<Cat>, StoreError>;
    /// Replace the stored cat. `None` if it no longer exists.
    async fn update_cat(&self, cat: &Cat) -> Result<Option<Cat>, StoreError>;
    /// Remove and return the cat. `None` if it was already gone.
    async fn delete_cat(&self, id: Uuid) -> Result<Option<Cat>, StoreError>;
}

pub trait Store: UserStore + CatStore {}

impl<T: UserStore + CatStore> Store for T {}
