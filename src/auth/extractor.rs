use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::headers::authorization::Bearer;
use axum_extra::headers::Authorization;
use axum_extra::TypedHeader;
use uuid::Uuid;

use crate::auth::jwt::{self, Claims};
use crate::error::AppError;
use crate::models::{Role, UserOutput};
use crate::policy::{self, Action, Decision};
use crate::state::SharedState;

/// The authenticated caller, as read from a verified bearer token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub user_name: String,
    pub email: String,
    pub role: Role,
}

impl AuthUser {
    pub fn decide(&self, owner_id: Uuid, action: Action) -> Decision {
        policy::decide(self.user_id, self.role, owner_id, action)
    }

    /// Run the policy check and turn a denial into `Forbidden(denied)`.
    pub fn authorize(
        &self,
        owner_id: Uuid,
        action: Action,
        denied: &'static str,
    ) -> Result<(), AppError> {
        match self.decide(owner_id, action) {
            Decision::Allow => Ok(()),
            Decision::Deny(reason) => {
                tracing::debug!(
                    user_id = %self.user_id,
                    %owner_id,
                    ?action,
                    %reason,
                    "authorization denied"
                );
                Err(AppError::Forbidden(denied.to_string()))
            }
        }
    }

    pub fn identity(&self) -> UserOutput {
        UserOutput {
            id: self.user_id,
            user_name: self.user_name.clone(),
            email: self.email.clone(),
        }
    }
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.sub,
            user_name: claims.user_name,
            email: claims.email,
            role: claims.role,
        }
    }
}

impl FromRequestParts<SharedState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &SharedState,
    ) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| AppError::Unauthorized("Missing authentication token".to_string()))?;

        let claims = jwt::decode_token(bearer.token(), &state.config.jwt_secret)
            .map_err(|_| AppError::Unauthorized("Invalid or expired token".to_string()))?;

        Ok(AuthUser::from(claims))
    }
}
