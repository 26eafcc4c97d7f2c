//! Service layer for assetdb
//!
//! Business logic between the CLI/HTTP front ends and storage, embeddings
//! and geocoding.

#![allow(clippy::missing_errors_doc, reason = "Errors are self-explanatory from Result types")]

mod blocking;
pub mod error;
mod loader_service;
mod search_service;
#[cfg(test)]
mod test_support;

pub use error::ServiceError;
pub use loader_service::{LoadFailure, LoadReport, LoaderService};
pub use search_service::SearchService;
