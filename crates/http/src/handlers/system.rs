use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use assetdb_core::AssetStats;

use crate::api_error::ApiError;
use crate::response_types::{HealthResponse, IndexResponse};
use crate::AppState;

const ENDPOINTS: &[&str] = &[
    "GET /health",
    "GET /api/stats",
    "GET /api/search?q=&limit=",
    "GET /api/search/text?q=&limit=",
    "GET /api/search/nearby?lat=&lon=&radius_m=&limit=",
    "GET /api/assets/{id}",
];

pub async fn index() -> Json<IndexResponse> {
    Json(IndexResponse {
        name: "assetdb",
        version: env!("CARGO_PKG_VERSION"),
        endpoints: ENDPOINTS,
    })
}

pub async fn health(State(state): State<Arc<AppState>>) -> (StatusCode, Json<HealthResponse>) {
    match state.search_service.ping().await {
        Ok(()) => (StatusCode::OK, Json(HealthResponse::HEALTHY)),
        Err(e) => {
            tracing::warn!(error = %e, "health check failed");
            (StatusCode::SERVICE_UNAVAILABLE, Json(HealthResponse::UNHEALTHY))
        },
    }
}

pub async fn stats(State(state): State<Arc<AppState>>) -> Result<Json<AssetStats>, ApiError> {
    Ok(Json(state.search_service.get_stats().await?))
}
