//! Runs the synchronous embedding model off the async executor.

use std::sync::Arc;

use assetdb_embeddings::Embedder;
use tokio::task::spawn_blocking;

use crate::ServiceError;

pub(crate) async fn embed_blocking(
    embedder: &Arc<dyn Embedder>,
    text: String,
) -> Result<Vec<f32>, ServiceError> {
    let embedder = Arc::clone(embedder);
    spawn_blocking(move || embedder.embed(&text))
        .await
        .map_err(|e| {
            tracing::error!("Join error: {}", e);
            ServiceError::Task(e.to_string())
        })?
        .map_err(ServiceError::from)
}
