//! Address geocoding for the asset loader.
//!
//! [`NominatimClient`] talks to an OpenStreetMap Nominatim-compatible search
//! API, spacing requests with a [`RateLimiter`] and retrying transient
//! failures with exponential backoff. [`CachingGeocoder`] avoids resolving the
//! same address twice.

mod cache;
mod client;
mod config;
pub mod error;
mod rate_limit;
#[cfg(test)]
mod retry_tests;

use assetdb_core::GeoPoint;
use async_trait::async_trait;

pub use cache::CachingGeocoder;
pub use client::NominatimClient;
pub use config::{
    DEFAULT_BASE_URL, DEFAULT_MAX_ATTEMPTS, DEFAULT_MIN_INTERVAL_MS, DEFAULT_TIMEOUT_SECS,
    DEFAULT_USER_AGENT, GeocoderConfig,
};
pub use error::GeocodeError;
pub use rate_limit::RateLimiter;

/// Resolves a free-form postal address to a point.
///
/// `Ok(None)` means the service answered but knows no such address.
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn geocode(&self, address: &str) -> Result<Option<GeoPoint>, GeocodeError>;
}
