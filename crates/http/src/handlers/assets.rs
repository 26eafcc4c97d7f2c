use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;

use assetdb_core::Asset;

use crate::api_error::ApiError;
use crate::AppState;

pub async fn get_asset(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<Asset>, ApiError> {
    state
        .search_service
        .get_asset(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("asset '{id}' not found")))
}
