//! PostgreSQL storage backend using sqlx.
//!
//! Split into modular files by domain concern.

mod assets;
mod queries;
mod stats;

use assetdb_core::{
    AssetSummary, GeoPoint, PG_POOL_ACQUIRE_TIMEOUT_SECS, PG_POOL_IDLE_TIMEOUT_SECS,
    PG_POOL_MAX_CONNECTIONS,
};
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};

use crate::error::StorageError;
use crate::pg_migrations::run_pg_migrations;

#[derive(Clone, Debug)]
pub struct PgStorage {
    pool: PgPool,
}

impl PgStorage {
    /// Connects and brings the schema up to date.
    pub async fn new(database_url: &str) -> Result<Self, StorageError> {
        let pool = PgPoolOptions::new()
            .max_connections(PG_POOL_MAX_CONNECTIONS)
            .acquire_timeout(std::time::Duration::from_secs(PG_POOL_ACQUIRE_TIMEOUT_SECS))
            .idle_timeout(std::time::Duration::from_secs(PG_POOL_IDLE_TIMEOUT_SECS))
            .test_before_acquire(true)
            .connect(database_url)
            .await?;
        run_pg_migrations(&pool).await.map_err(|e| StorageError::Migration(e.to_string()))?;
        tracing::info!("PgStorage initialized");
        Ok(Self { pool })
    }

    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Formats an embedding as a pgvector text literal, bound with `$n::vector`.
#[must_use]
pub fn vector_literal(embedding: &[f32]) -> String {
    format!("[{}]", embedding.iter().map(|f| f.to_string()).collect::<Vec<_>>().join(","))
}

/// Builds a prefix-matching `to_tsquery('simple', ...)` expression from free
/// text. tsquery operators and ASCII punctuation are stripped; non-ASCII
/// characters (Thai vowel marks included) are kept.
#[must_use]
pub fn build_tsquery(query: &str) -> String {
    query
        .split_whitespace()
        .filter_map(|w| {
            let sanitized: String = w
                .chars()
                .filter(|c| !c.is_ascii() || c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
                .collect();
            if sanitized.is_empty() { None } else { Some(format!("{sanitized}:*")) }
        })
        .collect::<Vec<_>>()
        .join(" & ")
}

/// Convert `usize` to `i64` for SQL LIMIT binds.
/// Saturates to `i64::MAX` on overflow (only possible on 128-bit targets).
pub(crate) fn usize_to_i64(val: usize) -> i64 {
    i64::try_from(val).unwrap_or(i64::MAX)
}

pub(crate) fn i64_to_u64(val: i64) -> u64 {
    u64::try_from(val).unwrap_or(0)
}

/// Rebuilds a point from the `latitude`/`longitude` columns produced by
/// `ST_Y(location::geometry)` / `ST_X(location::geometry)`.
pub(crate) fn row_location(row: &sqlx::postgres::PgRow) -> Result<Option<GeoPoint>, StorageError> {
    let lat: Option<f64> = row.try_get("latitude")?;
    let lon: Option<f64> = row.try_get("longitude")?;
    Ok(match (lat, lon) {
        (Some(lat), Some(lon)) => GeoPoint::new(lat, lon)
            .map_err(|e| {
                tracing::warn!(lat, lon, error = %e, "corrupt location in DB, ignoring");
            })
            .ok(),
        _ => None,
    })
}

pub(crate) fn row_to_summary(row: &sqlx::postgres::PgRow) -> Result<AssetSummary, StorageError> {
    Ok(AssetSummary {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        address: row.try_get("address")?,
        district: row.try_get("district")?,
        province: row.try_get("province")?,
        location_type: row.try_get("location_type")?,
        location: row_location(row)?,
    })
}

pub(crate) const SUMMARY_COLUMNS: &str =
    "id, name, description, address, district, province, location_type,
     ST_Y(location::geometry) AS latitude, ST_X(location::geometry) AS longitude";

pub(crate) const ASSET_COLUMNS: &str =
    "id, name, description, address, district, province, location_type,
     ST_Y(location::geometry) AS latitude, ST_X(location::geometry) AS longitude,
     metadata, images, tags, status, verified, embedding IS NOT NULL AS has_embedding,
     created_at, updated_at";
