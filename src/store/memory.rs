use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use uuid::Uuid;

use crate::models::{Cat, User};
use crate::store::{CatFilter, CatStore, StoreError, UserStore};

/// In-process store used when no database is configured, and by tests.
///
/// Iteration order of listings follows the shard layout and is not stable.
#[derive(Default)]
pub struct MemoryStore {
    users: DashMap<Uuid, User>,
    /// email -> user id, kept in step with `users` for uniqueness checks.
    emails: DashMap<String, Uuid>,
    cats: DashMap<Uuid, Cat>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn reserve_email(&self, email: &str, id: Uuid) -> Result<(), StoreError> {
        match self.emails.entry(email.to_string()) {
            Entry::Occupied(entry) if *entry.get() != id => Err(StoreError::Conflict(format!(
                "email '{email}' is already registered"
            ))),
            Entry::Occupied(_) => Ok(()),
            Entry::Vacant(entry) => {
                entry.insert(id);
                Ok(())
            }
        }
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert_user(&self, user: &User) -> Result<User, StoreError> {
        if self.users.contains_key(&user.id) {
            return Err(StoreError::Conflict(format!("user {} already exists", user.id)));
        }
        self.reserve_email(&user.email, user.id)?;
        self.users.insert(user.id, user.clone());
        Ok(user.clone())
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.users.get(&id).map(|u| u.value().clone()))
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let Some(id) = self.emails.get(email).map(|e| *e.value()) else {
            return Ok(None);
        };
        self.find_user(id).await
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        Ok(self.users.iter().map(|u| u.value().clone()).collect())
    }

    async fn update_user(&self, user: &User) -> Result<Option<User>, StoreError> {
        let Some(previous_email) = self.users.get(&user.id).map(|u| u.email.clone()) else {
            return Ok(None);
        };

        if previous_email != user.email {
            self.reserve_email(&user.email, user.id)?;
            self.emails.remove_if(&previous_email, |_, owner| *owner == user.id);
        }

        match self.users.get_mut(&user.id) {
            Some(mut stored) => {
                *stored = user.clone();
                Ok(Some(user.clone()))
            }
            None => {
                self.emails.remove_if(&user.email, |_, owner| *owner == user.id);
                Ok(None)
            }
        }
    }

    async fn delete_user(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let removed = self.users.remove(&id).map(|(_, user)| user);
        if let Some(user) = &removed {
            self.emails.remove_if(&user.email, |_, owner| *owner == id);
        }
        Ok(removed)
    }
}

#[async_trait]
impl CatStore for MemoryStore {
    async fn insert_cat(&self, cat: &Cat) -> Result<Cat, StoreError> {
        match self.cats.entry(cat.id) {
            Entry::Occupied(_) => Err(StoreError::Conflict(format!("cat {} already exists", cat.id))),
            Entry::Vacant(entry) => {
                entry.insert(cat.clone());
                Ok(cat.clone())
            }
        }
    }

    async fn find_cat(&self, id: Uuid) -> Result<Option<Cat>, StoreError> {
        Ok(self.cats.get(&id).map(|c| c.value().clone()))
    }

    async fn list_cats(&self, filter: &CatFilter) -> Result<Vec<Cat>, StoreError> {
        let cats = self
            .cats
            .iter()
            .filter(|entry| {
                let cat = entry.value();
                match filter {
                    CatFilter::All => true,
                    CatFilter::Owner(owner_id) => cat.owner.id == *owner_id,
                    CatFilter::Within(polygon) => cat
                        .location
                        .as_ref()
                        .is_some_and(|point| polygon.contains(point)),
                }
            })
            .map(|entry| entry.value().clone())
            .collect();
        Ok(cats)
    }

    async fn update_cat(&self, cat: &Cat) -> Result<Option<Cat>, StoreError> {
        match self.cats.get_mut(&cat.id) {
            Some(mut stored) => {
                *stored = cat.clone();
                Ok(Some(cat.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete_cat(&self, id: Uuid) -> Result<Option<Cat>, StoreError> {
        Ok(self.cats.remove(&id).map(|(_, cat)| cat))
    }
}
