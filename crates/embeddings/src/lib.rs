//! Embedding generation for semantic search
//!
//! Local all-MiniLM-L6-v2 model through fastembed. The first run downloads
//! the ONNX weights into fastembed's cache directory.

pub mod error;

use std::sync::Mutex;

use assetdb_core::EMBEDDING_DIMENSION;
use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};

pub use error::EmbeddingError;

/// Anything that turns text into a fixed-length vector.
pub trait Embedder: Send + Sync {
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;

    fn dimension(&self) -> usize;
}

/// fastembed-backed embedder. The model needs `&mut` access, hence the mutex.
pub struct EmbeddingService {
    model: Mutex<TextEmbedding>,
}

impl std::fmt::Debug for EmbeddingService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbeddingService")
            .field("model", &"AllMiniLML6V2")
            .field("dimension", &EMBEDDING_DIMENSION)
            .finish()
    }
}

impl EmbeddingService {
    /// Loads the model, downloading it on first use.
    ///
    /// # Errors
    /// Returns `ModelInit` if the model cannot be fetched or loaded.
    pub fn new() -> Result<Self, EmbeddingError> {
        let options =
            InitOptions::new(EmbeddingModel::AllMiniLML6V2).with_show_download_progress(true);
        let model =
            TextEmbedding::try_new(options).map_err(|e| EmbeddingError::ModelInit(e.to_string()))?;
        tracing::info!(dimension = EMBEDDING_DIMENSION, "embedding model loaded");
        Ok(Self { model: Mutex::new(model) })
    }
}

impl Embedder for EmbeddingService {
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let mut model = self.model.lock().map_err(|_| EmbeddingError::LockPoisoned)?;
        let mut embeddings = model
            .embed(vec![text], None)
            .map_err(|e| EmbeddingError::Generation(e.to_string()))?;
        drop(model);
        if embeddings.is_empty() {
            return Err(EmbeddingError::EmptyResult);
        }
        let vector = embeddings.swap_remove(0);
        check_dimension(&vector, EMBEDDING_DIMENSION)?;
        Ok(vector)
    }

    fn dimension(&self) -> usize {
        EMBEDDING_DIMENSION
    }
}

/// Rejects vectors that would not fit the `vector(N)` column.
pub fn check_dimension(vector: &[f32], expected: usize) -> Result<(), EmbeddingError> {
    if vector.len() == expected {
        Ok(())
    } else {
        Err(EmbeddingError::DimensionMismatch { expected, actual: vector.len() })
    }
}
