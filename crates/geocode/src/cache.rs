use std::collections::HashMap;

use assetdb_core::GeoPoint;
use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::GeocodeError;
use crate::Geocoder;

/// Memoizes another geocoder by trimmed address. Negative answers are cached
/// too; errors are not, so a later call can retry them.
#[derive(Debug)]
pub struct CachingGeocoder<G> {
    inner: G,
    entries: Mutex<HashMap<String, Option<GeoPoint>>>,
}

impl<G: Geocoder> CachingGeocoder<G> {
    #[must_use]
    pub fn new(inner: G) -> Self {
        Self { inner, entries: Mutex::new(HashMap::new()) }
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }
}

#[async_trait]
impl<G: Geocoder> Geocoder for CachingGeocoder<G> {
    async fn geocode(&self, address: &str) -> Result<Option<GeoPoint>, GeocodeError> {
        let key = address.trim().to_owned();
        if let Some(hit) = self.entries.lock().await.get(&key) {
            tracing::debug!(address = %key, "geocode cache hit");
            return Ok(*hit);
        }
        let resolved = self.inner.geocode(&key).await?;
        self.entries.lock().await.insert(key, resolved);
        Ok(resolved)
    }
}
