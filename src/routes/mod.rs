pub mod auth;
pub mod cats;
pub mod users;

use axum::routing::{get, post};
use axum::Router;
use serde::Serialize;

use crate::state::SharedState;

/// Envelope for successful mutations: `{"message": ..., "data": ...}`.
#[derive(Debug, Serialize)]
pub struct MessageResponse<T> {
    pub message: &'static str,
    pub data: T,
}

impl<T> MessageResponse<T> {
    pub fn new(message: &'static str, data: T) -> Self {
        Self { message, data }
    }
}

pub fn api_routes() -> Router<SharedState> {
    Router::new()
        // Auth
        .route("/api/v1/auth/login", post(auth::login))
        // Users
        .route(
            "/api/v1/users",
            get(users::list)
                .post(users::create)
                .put(users::update_current)
                .delete(users::delete_current),
        )
        .route("/api/v1/users/token", get(users::check_token))
        .route("/api/v1/users/{id}", get(users::get))
        // Cats
        .route("/api/v1/cats", get(cats::list).post(cats::create))
        .route("/api/v1/cats/user", get(cats::list_by_user))
        .route("/api/v1/cats/area", get(cats::list_in_area))
        .route(
            "/api/v1/cats/admin/{id}",
            axum::routing::put(cats::reassign).delete(cats::delete_as_admin),
        )
        .route(
            "/api/v1/cats/{id}",
            get(cats::get).put(cats::update).delete(cats::delete),
        )
}
