use std::sync::Arc;

use anyhow::Result;
use assetdb_embeddings::Embedder;
use assetdb_http::{create_router, AppState};
use assetdb_service::SearchService;

use crate::{load_embedder, open_storage};

pub(crate) async fn run(port: u16, host: String) -> Result<()> {
    let storage = open_storage().await?;
    let embedder = load_embedder().await?;
    tracing::info!("Embedding service initialized ({} dimensions)", embedder.dimension());

    let state = Arc::new(AppState { search_service: Arc::new(SearchService::new(storage, embedder)) });

    let router = create_router(state);
    let addr = format!("{host}:{port}");
    tracing::info!("Starting HTTP server on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router).await?;
    Ok(())
}
