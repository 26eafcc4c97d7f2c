use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Result};
use assetdb_geocode::{CachingGeocoder, GeocoderConfig, NominatimClient};
use assetdb_service::{LoaderService, SearchService};

use crate::{load_embedder, open_storage};

const CHECK_LIMIT: usize = 3;

pub(crate) async fn run(path: &Path, check_query: Option<&str>) -> Result<()> {
    if !path.is_file() {
        bail!("input file not found: {}", path.display());
    }

    let storage = open_storage().await?;
    let embedder = load_embedder().await?;
    let geocoder = CachingGeocoder::new(NominatimClient::new(GeocoderConfig::from_env())?);

    let loader = LoaderService::new(storage.clone(), embedder.clone(), Arc::new(geocoder));
    let report = loader.load_file(path).await?;

    println!(
        "Loaded {}/{} records ({} geocoded, {} unresolved, {} without address, {} failed)",
        report.inserted,
        report.total,
        report.geocoded,
        report.not_geocoded,
        report.no_address,
        report.failed,
    );
    for failure in &report.failures {
        println!("  #{} {}: {}", failure.index, failure.name, failure.error);
    }
    if let Some(e) = &report.reindex_error {
        println!("Rows are committed but the embedding index rebuild failed: {e}");
    }

    if let Some(query) = check_query {
        let search = SearchService::new(storage, embedder);
        let results = search.semantic_search(query, CHECK_LIMIT).await?;
        println!("Top {} matches for {query:?}:", results.len());
        for m in &results {
            println!("  - {} (similarity: {:.3})", m.asset.name, m.score);
        }
    }

    Ok(())
}
