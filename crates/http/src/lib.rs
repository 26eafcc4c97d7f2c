//! HTTP API server for assetdb.

#![allow(unreachable_pub, reason = "pub items are re-exported")]
#![allow(missing_debug_implementations, reason = "Internal types")]
#![allow(clippy::single_call_fn, reason = "HTTP handlers are called once from router")]

pub mod api_error;
mod handlers;
mod query_types;
mod response_types;

use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;

use assetdb_service::SearchService;

/// Shared application state for all HTTP handlers.
pub struct AppState {
    /// Read-only queries over the asset table
    pub search_service: Arc<SearchService>,
}

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::system::index))
        .route("/health", get(handlers::system::health))
        .route("/api/stats", get(handlers::system::stats))
        .route("/api/search", get(handlers::search::semantic_search))
        .route("/api/search/text", get(handlers::search::text_search))
        .route("/api/search/nearby", get(handlers::search::nearby))
        .route("/api/assets/{id}", get(handlers::assets::get_asset))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
