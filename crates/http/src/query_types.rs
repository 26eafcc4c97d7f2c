//! Request/query types (Deserialize)

use assetdb_core::{DEFAULT_NEARBY_RADIUS_M, DEFAULT_QUERY_LIMIT, MAX_QUERY_LIMIT};
use serde::Deserialize;

const fn default_limit() -> usize {
    DEFAULT_QUERY_LIMIT
}

const fn default_radius() -> f64 {
    DEFAULT_NEARBY_RADIUS_M
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

impl SearchQuery {
    /// Cap limit to prevent DoS via unbounded queries.
    pub fn capped_limit(&self) -> usize {
        self.limit.min(MAX_QUERY_LIMIT)
    }
}

#[derive(Debug, Deserialize)]
pub struct NearbyQuery {
    pub lat: f64,
    pub lon: f64,
    #[serde(default = "default_radius")]
    pub radius_m: f64,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

impl NearbyQuery {
    pub fn capped_limit(&self) -> usize {
        self.limit.min(MAX_QUERY_LIMIT)
    }
}
