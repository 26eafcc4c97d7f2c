//! The `asset` entity: a physical location of interest.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::geo::GeoPoint;

/// Lifecycle status, mirrored by the `CHECK` constraint on `assets.status`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum AssetStatus {
    /// Visible in search results
    #[default]
    Active,
    /// Temporarily hidden (closed, under repair)
    Inactive,
    /// Kept for history, never shown
    Archived,
}

impl AssetStatus {
    pub const ALL_VARIANTS_STR: &'static str = "active|inactive|archived";

    pub const ALL_VARIANTS: &'static [AssetStatus] =
        &[AssetStatus::Active, AssetStatus::Inactive, AssetStatus::Archived];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match *self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Archived => "archived",
        }
    }
}

impl std::fmt::Display for AssetStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssetStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            "archived" => Ok(Self::Archived),
            other => Err(CoreError::InvalidStatus(other.to_owned())),
        }
    }
}

/// Insert model produced by the loader. `updated_at` and `search_vector`
/// are absent: triggers own them.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAsset {
    pub name: String,
    pub description: Option<String>,
    pub address: Option<String>,
    pub district: Option<String>,
    pub province: Option<String>,
    pub location_type: String,
    pub location: Option<GeoPoint>,
    pub embedding: Vec<f32>,
    pub metadata: serde_json::Value,
    pub tags: Vec<String>,
}

/// A stored asset as read back from the database.
#[derive(Debug, Clone, Serialize)]
pub struct Asset {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub address: Option<String>,
    pub district: Option<String>,
    pub province: Option<String>,
    pub location_type: String,
    pub location: Option<GeoPoint>,
    pub metadata: serde_json::Value,
    pub images: serde_json::Value,
    pub tags: Vec<String>,
    pub status: AssetStatus,
    pub verified: bool,
    pub has_embedding: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Columns shared by every search result.
#[derive(Debug, Clone, Serialize)]
pub struct AssetSummary {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub address: Option<String>,
    pub district: Option<String>,
    pub province: Option<String>,
    pub location_type: String,
    pub location: Option<GeoPoint>,
}

/// Ranked result of a similarity or full-text query. Higher score is better.
#[derive(Debug, Clone, Serialize)]
pub struct AssetMatch {
    #[serde(flatten)]
    pub asset: AssetSummary,
    pub score: f64,
}

/// Result of a radius query, nearest first.
#[derive(Debug, Clone, Serialize)]
pub struct NearbyAsset {
    #[serde(flatten)]
    pub asset: AssetSummary,
    pub distance_m: f64,
}

/// Sorts matches by score, best first. NaN scores sink to the end.
pub fn sort_by_score_descending(matches: &mut [AssetMatch]) {
    fn key(m: &AssetMatch) -> f64 {
        if m.score.is_nan() { f64::NEG_INFINITY } else { m.score }
    }
    matches.sort_by(|a, b| key(b).total_cmp(&key(a)));
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeCount {
    pub location_type: String,
    pub count: u64,
}

/// Aggregate numbers over the whole table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AssetStats {
    pub total_assets: u64,
    pub assets_by_type: Vec<TypeCount>,
    pub assets_with_images: u64,
    pub total_unique_tags: u64,
}
