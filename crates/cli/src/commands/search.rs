use anyhow::{bail, Result};
use assetdb_service::SearchService;

use crate::{load_embedder, open_storage};

async fn search_service() -> Result<SearchService> {
    let storage = open_storage().await?;
    let embedder = load_embedder().await?;
    Ok(SearchService::new(storage, embedder))
}

pub(crate) async fn run_search(query: &str, limit: usize, text: bool) -> Result<()> {
    let service = search_service().await?;
    let results = if text {
        service.text_search(query, limit).await?
    } else {
        service.semantic_search(query, limit).await?
    };
    println!("{}", serde_json::to_string_pretty(&results)?);
    Ok(())
}

pub(crate) async fn run_nearby(lat: f64, lon: f64, radius_m: f64, limit: usize) -> Result<()> {
    let service = search_service().await?;
    let results = service.nearby(lat, lon, radius_m, limit).await?;
    println!("{}", serde_json::to_string_pretty(&results)?);
    Ok(())
}

pub(crate) async fn run_stats() -> Result<()> {
    let service = search_service().await?;
    let stats = service.get_stats().await?;
    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}

pub(crate) async fn run_get(id: i32) -> Result<()> {
    let service = search_service().await?;
    match service.get_asset(id).await? {
        Some(asset) => println!("{}", serde_json::to_string_pretty(&asset)?),
        None => bail!("asset not found: {id}"),
    }
    Ok(())
}
