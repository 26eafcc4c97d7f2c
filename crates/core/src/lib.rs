//! Core types for assetdb
//!
//! Domain types shared across all other crates: the asset entity, the raw
//! input record, geographic points and the constants the schema relies on.

mod asset;
mod constants;
mod env_config;
mod error;
mod geo;
mod record;

pub use asset::*;
pub use constants::*;
pub use env_config::env_parse_with_default;
pub use error::*;
pub use geo::GeoPoint;
pub use record::{parse_records, AssetRecord};
