//! Storage trait abstraction
//!
//! Async domain traits so the loader and search services can run against
//! PostgreSQL in production and an in-memory fake in tests.

use assetdb_core::{Asset, AssetMatch, AssetStats, GeoPoint, NearbyAsset, NewAsset};
use async_trait::async_trait;

use crate::error::StorageError;

/// Asset writes and point lookups.
#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Insert one asset, returning its generated id.
    async fn insert_asset(&self, asset: &NewAsset) -> Result<i32, StorageError>;

    /// Get asset by ID.
    async fn get_asset(&self, id: i32) -> Result<Option<Asset>, StorageError>;

    /// Total number of rows.
    async fn count_assets(&self) -> Result<u64, StorageError>;

    /// Rebuild the approximate-nearest-neighbour index after a bulk load so
    /// its clusters reflect the data.
    async fn rebuild_vector_index(&self) -> Result<(), StorageError>;
}

/// Similarity, full-text and spatial queries over active assets.
#[async_trait]
pub trait SearchStore: Send + Sync {
    /// Cosine similarity search, nearest first.
    async fn semantic_search(
        &self,
        query_vec: &[f32],
        limit: usize,
    ) -> Result<Vec<AssetMatch>, StorageError>;

    /// Full-text search over name, district, province and tags.
    async fn text_search(&self, query: &str, limit: usize)
        -> Result<Vec<AssetMatch>, StorageError>;

    /// Assets within `radius_m` meters of `center`, nearest first.
    async fn nearby(
        &self,
        center: GeoPoint,
        radius_m: f64,
        limit: usize,
    ) -> Result<Vec<NearbyAsset>, StorageError>;
}

/// Aggregate statistics and liveness.
#[async_trait]
pub trait StatsStore: Send + Sync {
    /// Get storage statistics.
    async fn get_stats(&self) -> Result<AssetStats, StorageError>;

    /// Round-trip to the database.
    async fn ping(&self) -> Result<(), StorageError>;
}

/// Everything the services need from a backend.
pub trait AssetRepository: AssetStore + SearchStore + StatsStore {}

impl<T: AssetStore + SearchStore + StatsStore> AssetRepository for T {}
