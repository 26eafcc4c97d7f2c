use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;

use assetdb_core::{AssetMatch, NearbyAsset};

use crate::api_error::ApiError;
use crate::query_types::{NearbyQuery, SearchQuery};
use crate::AppState;

pub async fn semantic_search(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<AssetMatch>>, ApiError> {
    let results = state.search_service.semantic_search(&query.q, query.capped_limit()).await?;
    tracing::debug!(q = %query.q, hits = results.len(), "semantic search");
    Ok(Json(results))
}

pub async fn text_search(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<AssetMatch>>, ApiError> {
    Ok(Json(state.search_service.text_search(&query.q, query.capped_limit()).await?))
}

pub async fn nearby(
    State(state): State<Arc<AppState>>,
    Query(query): Query<NearbyQuery>,
) -> Result<Json<Vec<NearbyAsset>>, ApiError> {
    let results = state
        .search_service
        .nearby(query.lat, query.lon, query.radius_m, query.capped_limit())
        .await?;
    Ok(Json(results))
}
