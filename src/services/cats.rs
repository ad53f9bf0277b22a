use std::sync::Arc;

use uuid::Uuid;

use crate::auth::extractor::AuthUser;
use crate::error::AppError;
use crate::geo::BoundingBox;
use crate::models::{Cat, CatInput, OwnerSnapshot};
use crate::policy::Action;
use crate::store::{CatFilter, Store};

const CREATE_FAILED: &str = "Cat creation failed";
const UPDATE_FAILED: &str = "Cat update failed";
const DELETE_FAILED: &str = "Cat delete failed";

fn cat_not_found() -> AppError {
    AppError::NotFound("Cat not found".to_string())
}

fn user_not_found() -> AppError {
    AppError::NotFound("User not found".to_string())
}

/// Cat reads and policy-guarded mutations.
///
/// Mutations fetch the current record, check the actor against its current
/// owner snapshot, then write. The fetch and the write are separate store
/// calls with no lock or version check between them, so concurrent writers
/// on one cat resolve as last-write-wins.
pub struct CatService {
    store: Arc<dyn Store>,
}

impl CatService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn get(&self, id: Uuid) -> Result<Cat, AppError> {
        self.store.find_cat(id).await?.ok_or_else(cat_not_found)
    }

    pub async fn list(&self) -> Result<Vec<Cat>, AppError> {
        Ok(self.store.list_cats(&CatFilter::All).await?)
    }

    pub async fn list_by_owner(&self, actor: &AuthUser) -> Result<Vec<Cat>, AppError> {
        Ok(self.store.list_cats(&CatFilter::Owner(actor.user_id)).await?)
    }

    pub async fn list_in_area(&self, area: &BoundingBox) -> Result<Vec<Cat>, AppError> {
        Ok(self
            .store
            .list_cats(&CatFilter::Within(area.to_polygon()))
            .await?)
    }

    /// The owner snapshot is taken from the actor's stored user record, so it
    /// reflects their identity at the moment of creation.
    pub async fn create(&self, input: CatInput, actor: &AuthUser) -> Result<Cat, AppError> {
        let owner = self
            .store
            .find_user(actor.user_id)
            .await
            .map_err(AppError::masking(CREATE_FAILED))?
            .ok_or_else(user_not_found)?;

        let cat = input.into_cat(Uuid::now_v7(), OwnerSnapshot::of(&owner));
        let created = self
            .store
            .insert_cat(&cat)
            .await
            .map_err(AppError::masking(CREATE_FAILED))?;

        tracing::info!(cat_id = %created.id, owner_id = %created.owner.id, "cat created");
        Ok(created)
    }

    pub async fn update(
        &self,
        id: Uuid,
        input: CatInput,
        actor: &AuthUser,
    ) -> Result<Cat, AppError> {
        let mut cat = self.fetch(id, UPDATE_FAILED).await?;
        actor.authorize(cat.owner.id, Action::UpdateOwn, "Only owner can update cat")?;

        input.apply_to(&mut cat);
        let updated = self.write(&cat).await?;

        tracing::info!(cat_id = %updated.id, user_id = %actor.user_id, "cat updated");
        Ok(updated)
    }

    /// Replace the owner snapshot with one taken from `new_owner`'s current
    /// user record. Checked against the cat's current owner.
    pub async fn reassign(
        &self,
        id: Uuid,
        new_owner: Uuid,
        actor: &AuthUser,
    ) -> Result<Cat, AppError> {
        let mut cat = self.fetch(id, UPDATE_FAILED).await?;
        actor.authorize(
            cat.owner.id,
            Action::ReassignOwner,
            "Only admin can change cat owner",
        )?;

        let owner = self
            .store
            .find_user(new_owner)
            .await
            .map_err(AppError::masking(UPDATE_FAILED))?
            .ok_or_else(user_not_found)?;

        let previous_owner = cat.owner.id;
        cat.owner = OwnerSnapshot::of(&owner);
        let updated = self.write(&cat).await?;

        tracing::info!(
            cat_id = %updated.id,
            %previous_owner,
            owner_id = %updated.owner.id,
            user_id = %actor.user_id,
            "cat owner reassigned"
        );
        Ok(updated)
    }

    /// `as_admin` selects the admin deletion rule instead of the owner rule.
    pub async fn delete(&self, id: Uuid, actor: &AuthUser, as_admin: bool) -> Result<Cat, AppError> {
        let cat = self.fetch(id, DELETE_FAILED).await?;
        let (action, denied) = if as_admin {
            (Action::DeleteAny, "Only admin can delete cat")
        } else {
            (Action::DeleteOwn, "Only owner can delete cat")
        };
        actor.authorize(cat.owner.id, action, denied)?;

        let deleted = self
            .store
            .delete_cat(id)
            .await
            .map_err(AppError::masking(DELETE_FAILED))?
            .ok_or_else(cat_not_found)?;

        tracing::info!(cat_id = %deleted.id, user_id = %actor.user_id, as_admin, "cat deleted");
        Ok(deleted)
    }

    async fn fetch(&self, id: Uuid, failed: &'static str) -> Result<Cat, AppError> {
        self.store
            .find_cat(id)
            .await
            .map_err(AppError::masking(failed))?
            .ok_or_else(cat_not_found)
    }

    /// A cat deleted between fetch and write comes back as `NotFound`.
    async fn write(&self, cat: &Cat) -> Result<Cat, AppError> {
        self.store
            .update_cat(cat)
            .await
            .map_err(AppError::masking(UPDATE_FAILED))?
            .ok_or_else(cat_not_found)
    }
}
