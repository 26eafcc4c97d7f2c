//! Shared constants for assetdb.
//!
//! The schema, the embedding model and the HTTP layer all depend on these,
//! so they live in one place.

/// Maximum number of results for any query (DoS protection).
pub const MAX_QUERY_LIMIT: usize = 100;

/// Default number of results when limit is not specified by the caller.
pub const DEFAULT_QUERY_LIMIT: usize = 5;

/// PostgreSQL connection pool: maximum connections.
pub const PG_POOL_MAX_CONNECTIONS: u32 = 20;

/// PostgreSQL connection pool: acquire timeout in seconds.
pub const PG_POOL_ACQUIRE_TIMEOUT_SECS: u64 = 10;

/// PostgreSQL connection pool: idle timeout in seconds.
pub const PG_POOL_IDLE_TIMEOUT_SECS: u64 = 300;

/// Text embedding dimension (all-MiniLM-L6-v2).
pub const EMBEDDING_DIMENSION: usize = 384;

/// Image embedding dimension (CLIP ViT-B/32). The column exists but the
/// loader never writes it.
pub const IMAGE_EMBEDDING_DIMENSION: usize = 512;

/// Category assigned when an input record has none.
pub const DEFAULT_CATEGORY: &str = "general";

/// Default input file for the loader.
pub const DEFAULT_INPUT_FILE: &str = "assets_rows.json";

/// Default search radius for nearby queries, in meters.
pub const DEFAULT_NEARBY_RADIUS_M: f64 = 5_000.0;

/// Upper bound on nearby search radius, in meters.
pub const MAX_NEARBY_RADIUS_M: f64 = 100_000.0;
