//! The load pipeline: parse → geocode → embed → insert, one record at a time.

use std::path::Path;
use std::sync::Arc;

use assetdb_core::{parse_records, AssetRecord, GeoPoint};
use serde_json::Value;
use assetdb_embeddings::Embedder;
use assetdb_geocode::Geocoder;
use assetdb_storage::AssetRepository;
use serde::Serialize;

use crate::blocking::embed_blocking;
use crate::ServiceError;

/// A record that could not be inserted.
#[derive(Debug, Clone, Serialize)]
pub struct LoadFailure {
    /// Zero-based position in the input array.
    pub index: usize,
    pub name: String,
    pub error: String,
}

/// Outcome of one load run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LoadReport {
    pub total: usize,
    pub inserted: usize,
    pub failed: usize,
    /// Inserted rows that got a location.
    pub geocoded: usize,
    /// Rows whose address was present but did not resolve, or whose
    /// geocoding call failed.
    pub not_geocoded: usize,
    /// Rows with no usable address at all.
    pub no_address: usize,
    pub failures: Vec<LoadFailure>,
    /// Set when the rows were committed but the vector index rebuild failed.
    pub reindex_error: Option<String>,
}

impl LoadReport {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failed == 0 && self.reindex_error.is_none()
    }
}

/// Label for logs and failures; works on elements that are not valid records.
fn display_name(item: &Value) -> String {
    match item.get("name") {
        Some(Value::String(s)) if !s.trim().is_empty() => s.clone(),
        Some(v @ Value::Number(_)) => v.to_string(),
        _ => "Unknown".to_owned(),
    }
}

enum Located {
    Found(GeoPoint),
    Unresolved,
    NoAddress,
}

pub struct LoaderService {
    storage: Arc<dyn AssetRepository>,
    embedder: Arc<dyn Embedder>,
    geocoder: Arc<dyn Geocoder>,
}

impl LoaderService {
    #[must_use]
    pub fn new(
        storage: Arc<dyn AssetRepository>,
        embedder: Arc<dyn Embedder>,
        geocoder: Arc<dyn Geocoder>,
    ) -> Self {
        Self { storage, embedder, geocoder }
    }

    /// Reads and loads a JSON array of records. A missing file, invalid JSON
    /// or a non-array top level fails the whole run before anything is
    /// inserted; problems inside individual elements do not.
    pub async fn load_file(&self, path: &Path) -> Result<LoadReport, ServiceError> {
        let raw = tokio::fs::read_to_string(path).await?;
        let items = parse_records(&raw)?;
        tracing::info!(path = %path.display(), records = items.len(), "loaded input file");
        Ok(self.load_records(&items).await)
    }

    /// Loads raw input elements sequentially. A failure in one element is
    /// logged, counted and listed in the report; the run always completes.
    pub async fn load_records(&self, items: &[Value]) -> LoadReport {
        let total = items.len();
        let mut report = LoadReport { total, ..LoadReport::default() };

        for (index, item) in items.iter().enumerate() {
            let name = display_name(item);
            tracing::info!("[{}/{}] processing {}", index + 1, total, name);
            let outcome = match AssetRecord::from_value(item.clone()) {
                Ok(record) => self.load_one(&record).await,
                Err(e) => Err(e.into()),
            };
            match outcome {
                Ok((id, located)) => {
                    report.inserted += 1;
                    match located {
                        Located::Found(_) => report.geocoded += 1,
                        Located::Unresolved => report.not_geocoded += 1,
                        Located::NoAddress => report.no_address += 1,
                    }
                    tracing::debug!(id, "inserted");
                }
                Err(e) => {
                    tracing::error!(index, name = %name, error = %e, "failed to load record");
                    report.failed += 1;
                    report.failures.push(LoadFailure { index, name, error: e.to_string() });
                }
            }
        }

        if report.inserted > 0 {
            if let Err(e) = self.storage.rebuild_vector_index().await {
                tracing::warn!(error = %e, "rows committed but vector index rebuild failed");
                report.reindex_error = Some(e.to_string());
            }
        }
        tracing::info!(
            total = report.total,
            inserted = report.inserted,
            failed = report.failed,
            geocoded = report.geocoded,
            not_geocoded = report.not_geocoded,
            no_address = report.no_address,
            "load finished"
        );
        report
    }

    async fn load_one(&self, record: &AssetRecord) -> Result<(i32, Located), ServiceError> {
        if record.name().trim().is_empty() {
            tracing::warn!("record has no name, inserting it with an empty name");
        }
        let located = self.locate(record).await;
        let embedding = embed_blocking(&self.embedder, record.embedding_text()).await?;
        let location = match &located {
            Located::Found(point) => Some(*point),
            Located::Unresolved | Located::NoAddress => None,
        };
        let id = self.storage.insert_asset(&record.to_new_asset(location, embedding)).await?;
        Ok((id, located))
    }

    async fn locate(&self, record: &AssetRecord) -> Located {
        let Some(address) = record.geocodable_address() else {
            tracing::warn!(name = record.name(), "no address, inserting without location");
            return Located::NoAddress;
        };
        match self.geocoder.geocode(address).await {
            Ok(Some(point)) => {
                tracing::debug!(lat = point.latitude(), lon = point.longitude(), "geocoded");
                Located::Found(point)
            }
            Ok(None) => {
                tracing::warn!(address, "address did not resolve");
                Located::Unresolved
            }
            Err(e) => {
                tracing::warn!(address, error = %e, "geocoding failed, inserting without location");
                Located::Unresolved
            }
        }
    }
}
