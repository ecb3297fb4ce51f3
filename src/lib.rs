//! Bug tracker
//!
//! REST backend with SQLite persistence, a typed HTTP client for it, and a
//! client-side replica that stays consistent with the server after each call.

pub mod api;
pub mod client;
pub mod config;
pub mod db;
pub mod errors;
pub mod models;
pub mod sync;

use std::sync::Arc;

use axum::{routing::get, Router};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use db::BugStore;

pub use client::{BugClient, ClientError};
pub use models::{Bug, BugPriority, BugStatus, CreateBugRequest, UpdateBugRequest};
pub use sync::{BugSync, SyncState};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<BugStore>,
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/bugs", get(api::list_bugs).post(api::create_bug))
        .route(
            "/bugs/{id}",
            get(api::get_bug).put(api::update_bug).delete(api::delete_bug),
        );

    // Health check
    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api/v1", api_routes)
        .merge(health_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
