use std::sync::Arc;

use uuid::Uuid;

use crate::auth::extractor::AuthUser;
use crate::auth::password;
use crate::config::{AdminSeed, PasswordConfig};
use crate::error::AppError;
use crate::models::{normalize_email, NewUser, Role, User, UserOutput, UserUpdate};
use crate::policy::Action;
use crate::store::Store;

const CREATE_FAILED: &str = "User creation failed";
const UPDATE_FAILED: &str = "User update failed";
const DELETE_FAILED: &str = "User deletion failed";

fn user_not_found() -> AppError {
    AppError::NotFound("User not found".to_string())
}

/// User registration, profile reads, and self-service mutations. A user is
/// its own owner for policy purposes.
pub struct UserService {
    store: Arc<dyn Store>,
    passwords: PasswordConfig,
}

impl UserService {
    pub fn new(store: Arc<dyn Store>, passwords: PasswordConfig) -> Self {
        Self { store, passwords }
    }

    pub async fn get(&self, id: Uuid) -> Result<User, AppError> {
        self.store.find_user(id).await?.ok_or_else(user_not_found)
    }

    pub async fn list(&self) -> Result<Vec<UserOutput>, AppError> {
        let users = self.store.list_users().await?;
        Ok(users.into_iter().map(UserOutput::from).collect())
    }

    /// Register a new user. Registration always yields a plain `user`.
    pub async fn create(&self, input: NewUser) -> Result<UserOutput, AppError> {
        let created = self
            .insert(input.user_name, &input.email, &input.password, Role::User)
            .await?;

        tracing::info!(user_id = %created.id, "user created");
        Ok(UserOutput::from(created))
    }

    /// Create the configured admin account unless its email is already
    /// registered. An existing account is left untouched.
    pub async fn seed_admin(&self, seed: &AdminSeed) -> Result<(), AppError> {
        let email = normalize_email(&seed.email);
        if self
            .store
            .find_user_by_email(&email)
            .await
            .map_err(AppError::masking(CREATE_FAILED))?
            .is_some()
        {
            tracing::debug!(%email, "admin account already present");
            return Ok(());
        }

        let admin = self
            .insert(seed.user_name.clone(), &email, &seed.password, Role::Admin)
            .await?;
        tracing::info!(user_id = %admin.id, "admin account seeded");
        Ok(())
    }

    /// Apply a profile update to user `id`. Role is never touched; a new
    /// password is hashed with the same parameters as registration.
    pub async fn update(
        &self,
        id: Uuid,
        input: UserUpdate,
        actor: &AuthUser,
    ) -> Result<UserOutput, AppError> {
        let mut user = self.fetch(id, UPDATE_FAILED).await?;
        actor.authorize(user.id, Action::UpdateOwn, "Only owner can update user")?;

        if let Some(user_name) = input.user_name {
            user.user_name = user_name;
        }
        if let Some(email) = input.email {
            user.email = normalize_email(&email);
        }
        if let Some(new_password) = input.password {
            user.password = password::hash(&new_password, &self.passwords).map_err(|e| {
                tracing::error!(error = %e, "{UPDATE_FAILED}");
                AppError::OperationFailed(UPDATE_FAILED)
            })?;
        }

        let updated = self
            .store
            .update_user(&user)
            .await
            .map_err(AppError::masking(UPDATE_FAILED))?
            .ok_or_else(user_not_found)?;

        tracing::info!(user_id = %updated.id, "user updated");
        Ok(UserOutput::from(updated))
    }

    pub async fn delete(&self, id: Uuid, actor: &AuthUser) -> Result<UserOutput, AppError> {
        let user = self.fetch(id, DELETE_FAILED).await?;
        actor.authorize(user.id, Action::DeleteOwn, "Only owner can delete user")?;

        let deleted = self
            .store
            .delete_user(id)
            .await
            .map_err(AppError::masking(DELETE_FAILED))?
            .ok_or_else(user_not_found)?;

        tracing::info!(user_id = %deleted.id, "user deleted");
        Ok(UserOutput::from(deleted))
    }

    /// Identity carried by an already-verified token. No store lookup.
    pub fn check_token(&self, actor: &AuthUser) -> UserOutput {
        actor.identity()
    }

    /// Look up a user by email and verify the password. Unknown email and
    /// wrong password are indistinguishable to the caller.
    pub async fn authenticate(&self, email: &str, candidate: &str) -> Result<User, AppError> {
        let invalid = || AppError::Unauthorized("Invalid credentials".to_string());

        let user = self
            .store
            .find_user_by_email(&normalize_email(email))
            .await?
            .ok_or_else(invalid)?;
        let valid = password::verify(candidate, &user.password).map_err(AppError::Internal)?;
        if !valid {
            return Err(invalid());
        }
        Ok(user)
    }

    async fn insert(
        &self,
        user_name: String,
        email: &str,
        plain_password: &str,
        role: Role,
    ) -> Result<User, AppError> {
        let hashed = password::hash(plain_password, &self.passwords).map_err(|e| {
            tracing::error!(error = %e, "{CREATE_FAILED}");
            AppError::OperationFailed(CREATE_FAILED)
        })?;

        let user = User {
            id: Uuid::now_v7(),
            user_name,
            email: normalize_email(email),
            role,
            password: hashed,
        };
        self.store
            .insert_user(&user)
            .await
            .map_err(AppError::masking(CREATE_FAILED))
    }

    async fn fetch(&self, id: Uuid, failed: &'static str) -> Result<User, AppError> {
        self.store
            .find_user(id)
            .await
            .map_err(AppError::masking(failed))?
            .ok_or_else(user_not_found)
    }
}
