use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::Json;
use uuid::Uuid;

use crate::auth::extractor::AuthUser;
use crate::error::AppError;
use crate::models::{NewUser, User, UserOutput, UserUpdate};
use crate::routes::MessageResponse;
use crate::state::SharedState;

pub async fn list(
    _auth: AuthUser,
    State(state): State<SharedState>,
) -> Result<Json<Vec<UserOutput>>, AppError> {
    Ok(Json(state.users.list().await?))
}

pub async fn get(
    _auth: AuthUser,
    State(state): State<SharedState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<User>, AppError> {
    let Path(id) = path?;
    Ok(Json(state.users.get(id).await?))
}

pub async fn create(
    State(state): State<SharedState>,
    payload: Result<Json<NewUser>, JsonRejection>,
) -> Result<Json<MessageResponse<UserOutput>>, AppError> {
    let Json(req) = payload?;
    req.validate()?;

    let user = state.users.create(req).await?;
    Ok(Json(MessageResponse::new("User created successfully", user)))
}

pub async fn update_current(
    auth: AuthUser,
    State(state): State<SharedState>,
    payload: Result<Json<UserUpdate>, JsonRejection>,
) -> Result<Json<MessageResponse<UserOutput>>, AppError> {
    let Json(req) = payload?;
    req.validate()?;

    let user = state.users.update(auth.user_id, req, &auth).await?;
    Ok(Json(MessageResponse::new("User updated successfully", user)))
}

pub async fn delete_current(
    auth: AuthUser,
    State(state): State<SharedState>,
) -> Result<Json<MessageResponse<UserOutput>>, AppError> {
    let user = state.users.delete(auth.user_id, &auth).await?;
    Ok(Json(MessageResponse::new("User deleted successfully", user)))
}

pub async fn check_token(
    auth: AuthUser,
    State(state): State<SharedState>,
) -> Json<MessageResponse<UserOutput>> {
    Json(MessageResponse::new(
        "Token is valid",
        state.users.check_token(&auth),
    ))
}
