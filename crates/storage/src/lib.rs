//! Storage layer for assetdb
//!
//! PostgreSQL with PostGIS for locations, pgvector for embeddings and a
//! trigger-maintained tsvector for full-text search.

pub mod error;
mod pg_migrations;
mod pg_storage;
pub mod traits;

pub use error::StorageError;
pub use pg_migrations::run_pg_migrations;
pub use pg_storage::{build_tsquery, vector_literal, PgStorage};
pub use traits::{AssetRepository, AssetStore, SearchStore, StatsStore};
