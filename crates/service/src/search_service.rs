use std::sync::Arc;

use assetdb_core::{
    sort_by_score_descending, Asset, AssetMatch, AssetStats, GeoPoint, NearbyAsset,
    MAX_NEARBY_RADIUS_M, MAX_QUERY_LIMIT,
};
use assetdb_embeddings::Embedder;
use assetdb_storage::AssetRepository;

use crate::blocking::embed_blocking;
use crate::ServiceError;

pub struct SearchService {
    storage: Arc<dyn AssetRepository>,
    embedder: Arc<dyn Embedder>,
}

fn non_blank_query(query: &str) -> Result<&str, ServiceError> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return Err(ServiceError::InvalidInput("query must not be empty".to_owned()));
    }
    Ok(trimmed)
}

impl SearchService {
    #[must_use]
    pub fn new(storage: Arc<dyn AssetRepository>, embedder: Arc<dyn Embedder>) -> Self {
        Self { storage, embedder }
    }

    /// Embeds `query` and returns the closest active assets, best first.
    pub async fn semantic_search(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<AssetMatch>, ServiceError> {
        let query = non_blank_query(query)?;
        let vector = embed_blocking(&self.embedder, query.to_owned()).await?;
        let mut matches =
            self.storage.semantic_search(&vector, limit.min(MAX_QUERY_LIMIT)).await?;
        sort_by_score_descending(&mut matches);
        Ok(matches)
    }

    pub async fn text_search(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<AssetMatch>, ServiceError> {
        let query = non_blank_query(query)?;
        Ok(self.storage.text_search(query, limit.min(MAX_QUERY_LIMIT)).await?)
    }

    /// Assets within `radius_m` meters of (`lat`, `lon`), nearest first.
    pub async fn nearby(
        &self,
        lat: f64,
        lon: f64,
        radius_m: f64,
        limit: usize,
    ) -> Result<Vec<NearbyAsset>, ServiceError> {
        let center = GeoPoint::new(lat, lon)?;
        if !radius_m.is_finite() || radius_m <= 0.0 {
            return Err(ServiceError::InvalidInput(format!(
                "radius_m must be a positive number, got {radius_m}"
            )));
        }
        if radius_m > MAX_NEARBY_RADIUS_M {
            return Err(ServiceError::InvalidInput(format!(
                "radius_m must not exceed {MAX_NEARBY_RADIUS_M}"
            )));
        }
        Ok(self.storage.nearby(center, radius_m, limit.min(MAX_QUERY_LIMIT)).await?)
    }

    pub async fn get_asset(&self, id: i32) -> Result<Option<Asset>, ServiceError> {
        Ok(self.storage.get_asset(id).await?)
    }

    pub async fn get_stats(&self) -> Result<AssetStats, ServiceError> {
        Ok(self.storage.get_stats().await?)
    }

    pub async fn ping(&self) -> Result<(), ServiceError> {
        Ok(self.storage.ping().await?)
    }
}
