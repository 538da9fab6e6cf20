//! Text embedding using local models
//!
//! Uses sentence-transformers/paraphrase-multilingual-MiniLM-L12-v2 via the
//! fastembed crate (ONNX runtime). The catalog and sales book are in Russian
//! with Latin model names mixed in, so the model has to be multilingual.
//!
//! # Model Details
//!
//! - Dimensions: 384
//! - Max tokens: 128
//!
//! # Usage
//!
//! ```ignore
//! use partscout_lib::embed::{Embedder, MiniLmEmbedder};
//!
//! let embedder = MiniLmEmbedder::new()?;
//!
//! let corpus = embedder.embed(&["ID: 101. Название: ...", "Совет по продажам ..."])?;
//! let query = embedder.embed_one("моторчик омывателя Golf 6")?;
//! ```

use crate::{Error, Result};

/// A vector embedding - fixed size array of floats
pub type Embedding = Vec<f32>;

/// Trait for text embedding models
///
/// Corpus and queries must go through the same instance: vectors from
/// different models or settings are not comparable.
pub trait Embedder: Send + Sync {
    /// Embed a batch of texts, preserving length and order.
    fn embed(&self, texts: &[&str]) -> Result<Vec<Embedding>>;

    /// Embed a single text. Same as `embed(&[text])[0]`.
    fn embed_one(&self, text: &str) -> Result<Embedding> {
        self.embed(&[text])?
            .into_iter()
            .next()
            .ok_or_else(|| Error::Embedding("model returned no embeddings".to_string()))
    }

    /// Returns the embedding dimension
    fn dimension(&self) -> usize;

    /// Returns the model name/identifier
    fn model_name(&self) -> &str;
}

mod minilm;
pub use minilm::*;
