use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::extractor::AuthUser;
use crate::error::AppError;
use crate::geo::BoundingBox;
use crate::models::{Cat, CatInput};
use crate::routes::MessageResponse;
use crate::state::SharedState;

#[derive(Deserialize)]
pub struct ReassignOwner {
    pub owner: Uuid,
}

pub async fn list(
    _auth: AuthUser,
    State(state): State<SharedState>,
) -> Result<Json<Vec<Cat>>, AppError> {
    Ok(Json(state.cats.list().await?))
}

pub async fn list_by_user(
    auth: AuthUser,
    State(state): State<SharedState>,
) -> Result<Json<Vec<Cat>>, AppError> {
    Ok(Json(state.cats.list_by_owner(&auth).await?))
}

pub async fn list_in_area(
    _auth: AuthUser,
    State(state): State<SharedState>,
    query: Result<Query<BoundingBox>, QueryRejection>,
) -> Result<Json<Vec<Cat>>, AppError> {
    let Query(area) = query?;
    Ok(Json(state.cats.list_in_area(&area).await?))
}

pub async fn get(
    _auth: AuthUser,
    State(state): State<SharedState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Cat>, AppError> {
    let Path(id) = path?;
    Ok(Json(state.cats.get(id).await?))
}

pub async fn create(
    auth: AuthUser,
    State(state): State<SharedState>,
    payload: Result<Json<CatInput>, JsonRejection>,
) -> Result<Json<MessageResponse<Cat>>, AppError> {
    let Json(req) = payload?;
    req.validate(Utc::now().date_naive())?;

    let cat = state.cats.create(req, &auth).await?;
    Ok(Json(MessageResponse::new("Cat created successfully", cat)))
}

pub async fn update(
    auth: AuthUser,
    State(state): State<SharedState>,
    path: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<CatInput>, JsonRejection>,
) -> Result<Json<MessageResponse<Cat>>, AppError> {
    let Path(id) = path?;
    let Json(req) = payload?;
    req.validate(Utc::now().date_naive())?;

    let cat = state.cats.update(id, req, &auth).await?;
    Ok(Json(MessageResponse::new("Cat updated successfully", cat)))
}

pub async fn delete(
    auth: AuthUser,
    State(state): State<SharedState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<MessageResponse<Cat>>, AppError> {
    let Path(id) = path?;
    let cat = state.cats.delete(id, &auth, false).await?;
    Ok(Json(MessageResponse::new("Cat deleted successfully", cat)))
}

pub async fn reassign(
    auth: AuthUser,
    State(state): State<SharedState>,
    path: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<ReassignOwner>, JsonRejection>,
) -> Result<Json<MessageResponse<Cat>>, AppError> {
    let Path(id) = path?;
    let Json(req) = payload?;

    let cat = state.cats.reassign(id, req.owner, &auth).await?;
    Ok(Json(MessageResponse::new("Cat updated successfully", cat)))
}

pub async fn delete_as_admin(
    auth: AuthUser,
    State(state): State<SharedState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<MessageResponse<Cat>>, AppError> {
    let Path(id) = path?;
    let cat = state.cats.delete(id, &auth, true).await?;
    Ok(Json(MessageResponse::new("Cat deleted successfully", cat)))
}
