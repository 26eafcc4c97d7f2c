//! In-memory fakes for the service tests.

#![allow(clippy::unwrap_used, reason = "test code")]

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use assetdb_core::{
    sort_by_score_descending, Asset, AssetMatch, AssetStats, AssetStatus, AssetSummary, GeoPoint,
    NearbyAsset, NewAsset, TypeCount,
};
use assetdb_embeddings::{Embedder, EmbeddingError};
use assetdb_geocode::{GeocodeError, Geocoder};
use assetdb_storage::{AssetStore, SearchStore, StatsStore, StorageError};
use async_trait::async_trait;

/// Byte-histogram embedder: identical texts get identical unit vectors.
#[derive(Default)]
pub struct FakeEmbedder {
    seen: Mutex<Vec<String>>,
    fail_on: Option<String>,
}

impl FakeEmbedder {
    pub const DIMENSION: usize = 32;

    /// Errors for any text containing `needle`.
    pub fn failing_on(needle: &str) -> Self {
        Self { fail_on: Some(needle.to_owned()), ..Self::default() }
    }

    pub fn seen(&self) -> Vec<String> {
        self.seen.lock().unwrap().clone()
    }
}

impl Embedder for FakeEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.seen.lock().unwrap().push(text.to_owned());
        if self.fail_on.as_deref().is_some_and(|n| text.contains(n)) {
            return Err(EmbeddingError::Generation("model refused input".to_owned()));
        }
        let mut v = vec![0.0_f32; Self::DIMENSION];
        for b in text.bytes() {
            v[usize::from(b) % Self::DIMENSION] += 1.0;
        }
        let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt().max(f32::EPSILON);
        Ok(v.into_iter().map(|x| x / norm).collect())
    }

    fn dimension(&self) -> usize {
        Self::DIMENSION
    }
}

/// Resolves everything to central Bangkok except addresses containing
/// "nowhere". A failing geocoder errors on every call.
#[derive(Default)]
pub struct FakeGeocoder {
    fail: bool,
    calls: AtomicUsize,
}

impl FakeGeocoder {
    pub fn failing() -> Self {
        Self { fail: true, ..Self::default() }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Geocoder for FakeGeocoder {
    async fn geocode(&self, address: &str) -> Result<Option<GeoPoint>, GeocodeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            let inner = GeocodeError::HttpStatus { code: 503, body: String::new() };
            return Err(GeocodeError::RetriesExhausted(Box::new(inner)));
        }
        if address.contains("nowhere") {
            return Ok(None);
        }
        Ok(Some(GeoPoint::new(13.7563, 100.5018).unwrap()))
    }
}

#[derive(Default)]
pub struct MemoryStore {
    rows: Mutex<Vec<NewAsset>>,
    reject_name: Option<String>,
    fail_reindex: bool,
    reindex_calls: Mutex<usize>,
    last_limit: Mutex<Option<usize>>,
}

impl MemoryStore {
    /// A store whose inserts fail for one specific name.
    pub fn rejecting(name: &str) -> Self {
        Self { reject_name: Some(name.to_owned()), ..Self::default() }
    }

    /// A store whose index rebuild always fails.
    pub fn failing_reindex() -> Self {
        Self { fail_reindex: true, ..Self::default() }
    }

    pub fn rows(&self) -> Vec<NewAsset> {
        self.rows.lock().unwrap().clone()
    }

    pub fn reindex_calls(&self) -> usize {
        *self.reindex_calls.lock().unwrap()
    }

    pub fn last_limit(&self) -> Option<usize> {
        *self.last_limit.lock().unwrap()
    }

    fn summaries(&self) -> Vec<(AssetSummary, NewAsset)> {
        self.rows()
            .into_iter()
            .zip(1..)
            .map(|(row, id)| (summary(id, &row), row))
            .collect()
    }
}

fn summary(id: i32, row: &NewAsset) -> AssetSummary {
    AssetSummary {
        id,
        name: row.name.clone(),
        description: row.description.clone(),
        address: row.address.clone(),
        district: row.district.clone(),
        province: row.province.clone(),
        location_type: row.location_type.clone(),
        location: row.location,
    }
}

fn cosine(a: &[f32], b: &[f32]) -> f64 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let na = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let nb = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    f64::from(dot / (na * nb).max(f32::EPSILON))
}

fn haversine_m(a: GeoPoint, b: GeoPoint) -> f64 {
    const EARTH_RADIUS_M: f64 = 6_371_008.8;
    let (lat1, lat2) = (a.latitude().to_radians(), b.latitude().to_radians());
    let dlat = lat2 - lat1;
    let dlon = (b.longitude() - a.longitude()).to_radians();
    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * h.sqrt().asin()
}

#[async_trait]
impl AssetStore for MemoryStore {
    async fn insert_asset(&self, asset: &NewAsset) -> Result<i32, StorageError> {
        if self.reject_name.as_deref() == Some(asset.name.as_str()) {
            return Err(StorageError::Constraint(format!("rejected {}", asset.name)));
        }
        let mut rows = self.rows.lock().unwrap();
        rows.push(asset.clone());
        Ok(i32::try_from(rows.len()).unwrap())
    }

    async fn get_asset(&self, id: i32) -> Result<Option<Asset>, StorageError> {
        let Some((s, row)) = self.summaries().into_iter().find(|(s, _)| s.id == id) else {
            return Ok(None);
        };
        let now = chrono::Utc::now();
        Ok(Some(Asset {
            id: s.id,
            name: s.name,
            description: s.description,
            address: s.address,
            district: s.district,
            province: s.province,
            location_type: s.location_type,
            location: s.location,
            metadata: row.metadata,
            images: serde_json::json!([]),
            tags: row.tags,
            status: AssetStatus::Active,
            verified: false,
            has_embedding: !row.embedding.is_empty(),
            created_at: now,
            updated_at: now,
        }))
    }

    async fn count_assets(&self) -> Result<u64, StorageError> {
        Ok(self.rows.lock().unwrap().len() as u64)
    }

    async fn rebuild_vector_index(&self) -> Result<(), StorageError> {
        *self.reindex_calls.lock().unwrap() += 1;
        if self.fail_reindex {
            return Err(StorageError::Migration("REINDEX INDEX idx_assets_embedding failed".to_owned()));
        }
        Ok(())
    }
}

#[async_trait]
impl SearchStore for MemoryStore {
    async fn semantic_search(
        &self,
        query_vec: &[f32],
        limit: usize,
    ) -> Result<Vec<AssetMatch>, StorageError> {
        *self.last_limit.lock().unwrap() = Some(limit);
        let mut matches: Vec<_> = self
            .summaries()
            .into_iter()
            .filter(|(_, row)| !row.embedding.is_empty())
            .map(|(asset, row)| AssetMatch { score: cosine(query_vec, &row.embedding), asset })
            .collect();
        sort_by_score_descending(&mut matches);
        matches.truncate(limit);
        Ok(matches)
    }

    async fn text_search(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<AssetMatch>, StorageError> {
        *self.last_limit.lock().unwrap() = Some(limit);
        let needle = query.to_lowercase();
        Ok(self
            .summaries()
            .into_iter()
            .filter(|(s, _)| s.name.to_lowercase().contains(&needle))
            .take(limit)
            .map(|(asset, _)| AssetMatch { asset, score: 1.0 })
            .collect())
    }

    async fn nearby(
        &self,
        center: GeoPoint,
        radius_m: f64,
        limit: usize,
    ) -> Result<Vec<NearbyAsset>, StorageError> {
        *self.last_limit.lock().unwrap() = Some(limit);
        let mut hits: Vec<_> = self
            .summaries()
            .into_iter()
            .filter_map(|(asset, _)| {
                let distance_m = haversine_m(center, asset.location?);
                (distance_m <= radius_m).then_some(NearbyAsset { asset, distance_m })
            })
            .collect();
        hits.sort_by(|a, b| a.distance_m.total_cmp(&b.distance_m));
        hits.truncate(limit);
        Ok(hits)
    }
}

#[async_trait]
impl StatsStore for MemoryStore {
    async fn get_stats(&self) -> Result<AssetStats, StorageError> {
        let rows = self.rows();
        let mut types: Vec<TypeCount> = Vec::new();
        for row in &rows {
            match types.iter_mut().find(|t| t.location_type == row.location_type) {
                Some(t) => t.count += 1,
                None => types.push(TypeCount { location_type: row.location_type.clone(), count: 1 }),
            }
        }
        let tags: BTreeSet<&String> = rows.iter().flat_map(|r| &r.tags).collect();
        Ok(AssetStats {
            total_assets: rows.len() as u64,
            assets_by_type: types,
            assets_with_images: 0,
            total_unique_tags: tags.len() as u64,
        })
    }

    async fn ping(&self) -> Result<(), StorageError> {
        Ok(())
    }
}
