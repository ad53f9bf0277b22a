use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::auth::jwt::{encode_token, Claims};
use crate::error::AppError;
use crate::models::UserOutput;
use crate::state::SharedState;

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub message: &'static str,
    pub token: String,
    pub user: UserOutput,
}

pub async fn login(
    State(state): State<SharedState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, AppError> {
    let Json(req) = payload?;

    // Rate limit check
    if state.login_limiter.check(&req.email).is_err() {
        return Err(AppError::RateLimited(
            "Too many login attempts. Please try again later.".to_string(),
        ));
    }

    let user = match state.users.authenticate(&req.email, &req.password).await {
        Ok(user) => user,
        Err(err @ AppError::Unauthorized(_)) => {
            state.login_limiter.record_failure(&req.email);
            return Err(err);
        }
        Err(err) => return Err(err),
    };
    state.login_limiter.reset(&req.email);

    let claims = Claims::new(&user, state.config.token_ttl);
    let token = encode_token(&claims, &state.config.jwt_secret).map_err(AppError::Internal)?;

    tracing::info!(user_id = %user.id, "user logged in");

    Ok(Json(LoginResponse {
        message: "Login successful",
        token,
        user: UserOutput::from(user),
    }))
}
