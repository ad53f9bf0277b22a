pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod geo;
pub mod models;
pub mod policy;
pub mod rate_limit;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;
pub mod validation;

use std::sync::Arc;

use axum::http::{HeaderName, HeaderValue};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::state::{AppState, SharedState};
use crate::store::Store;

pub fn build_app(store: Arc<dyn Store>, config: Config) -> (Router, SharedState) {
    let max_body_size = config.max_body_size;
    let state: SharedState = Arc::new(AppState::new(store, config));

    let app = Router::new()
        .merge(routes::api_routes())
        .route("/health", axum::routing::get(health))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(SetResponseHeaderLayer::overriding(
                    HeaderName::from_static("x-content-type-options"),
                    HeaderValue::from_static("nosniff"),
                ))
                .layer(SetResponseHeaderLayer::overriding(
                    HeaderName::from_static("x-frame-options"),
                    HeaderValue::from_static("DENY"),
                ))
                .layer(RequestBodyLimitLayer::new(max_body_size)),
        )
        .with_state(state.clone());

    (app, state)
}

async fn health() -> &'static str {
    "ok"
}
