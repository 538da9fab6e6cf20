//! High-level search interface
//!
//! Combines corpus loading, embedder and index into a single retriever.
//!
//! # Usage
//!
//! ```ignore
//! use partscout_lib::{embed::MiniLmEmbedder, search::Retriever};
//!
//! let mut retriever = Retriever::new(MiniLmEmbedder::new()?);
//! retriever.initialize("data/catalog.csv", "data/sales_book.txt")?;
//! let results = retriever.search("моторчик омывателя Golf 6", 3)?;
//! ```
//!
//! An uninitialized or empty retriever answers every query with no results.
//! Callers should treat that as "nothing relevant is known", not as a failure.

use std::path::Path;
use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::chunk::{self, Chunk, Source};
use crate::config::Config;
use crate::embed::{Embedder, MiniLmEmbedder};
use crate::store::{FlatIndex, VectorIndex};
use crate::{Error, Result};

mod context;

pub use context::*;

/// A search result with its distance to the query
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SearchResult {
    /// Chunk text as it was embedded
    pub text: String,
    /// Where the chunk came from
    pub source: Source,
    /// Squared Euclidean distance (lower is more relevant)
    pub distance: f32,
}

/// Chunks plus the index built over their embeddings
struct Corpus<I> {
    chunks: Vec<Chunk>,
    index: I,
}

/// Retriever over the catalog and sales book.
///
/// Built once by [`initialize`](Self::initialize) and read-only afterwards,
/// so `search` only needs `&self`.
pub struct Retriever<E: Embedder, I: VectorIndex = FlatIndex> {
    embedder: E,
    corpus: Option<Corpus<I>>,
}

impl Retriever<MiniLmEmbedder> {
    /// Load the model named in `config` and index the configured sources.
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut retriever = Self::new(MiniLmEmbedder::from_config(config)?);
        retriever.initialize(&config.catalog_path, &config.sales_path)?;
        Ok(retriever)
    }
}

impl<E: Embedder, I: VectorIndex> Retriever<E, I> {
    /// Create an uninitialized retriever.
    #[must_use]
    pub fn new(embedder: E) -> Self {
        Self {
            embedder,
            corpus: None,
        }
    }

    /// Load both sources, embed every chunk and build the index.
    ///
    /// Replaces anything indexed before. On error the retriever is left
    /// uninitialized rather than serving a partial or stale corpus.
    pub fn initialize(&mut self, catalog_path: impl AsRef<Path>, sales_path: impl AsRef<Path>) -> Result<()> {
        self.corpus = None;
        let chunks = chunk::load(catalog_path, sales_path)?;
        self.index(chunks)
    }

    /// Embed `chunks` in one batch and build the index over them.
    ///
    /// Chunk positions must be `0..chunks.len()` in order, as produced by
    /// [`chunk::load`].
    pub fn index(&mut self, chunks: Vec<Chunk>) -> Result<()> {
        self.corpus = None;
        if chunks.is_empty() {
            return Err(Error::EmptyCorpus);
        }
        if let Some((i, c)) = chunks.iter().enumerate().find(|(i, c)| c.position != *i) {
            return Err(Error::InvalidInput(format!(
                "chunk at slot {i} has position {}",
                c.position
            )));
        }

        let started = Instant::now();
        let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
        let embeddings = self.embedder.embed(&texts)?;
        if embeddings.len() != chunks.len() {
            return Err(Error::Embedding(format!(
                "expected {} embeddings, got {}",
                chunks.len(),
                embeddings.len()
            )));
        }
        debug!(elapsed_ms = started.elapsed().as_millis() as u64, "corpus embedded");

        let index = I::build(embeddings)?;
        info!(
            vectors = index.len(),
            dimension = index.dimension().unwrap_or(0),
            model = self.embedder.model_name(),
            "index built"
        );

        self.corpus = Some(Corpus { chunks, index });
        Ok(())
    }

    /// Search for the `k` chunks closest to `query`.
    ///
    /// Returns an empty list when nothing is indexed or `k` is zero.
    pub fn search(&self, query: &str, k: usize) -> Result<Vec<SearchResult>> {
        let Some(corpus) = &self.corpus else {
            debug!("search before initialization, returning no results");
            return Ok(Vec::new());
        };
        if corpus.index.is_empty() || k == 0 {
            return Ok(Vec::new());
        }

        let query_embedding = self.embedder.embed_one(query)?;
        let hits = corpus.index.query(&query_embedding, k)?;

        let mut results = Vec::with_capacity(hits.len());
        for hit in hits {
            let Some(chunk) = corpus.chunks.get(hit.position) else {
                warn!(
                    position = hit.position,
                    chunks = corpus.chunks.len(),
                    "index returned out-of-range position, skipping"
                );
                continue;
            };
            results.push(SearchResult {
                text: chunk.text.clone(),
                source: chunk.source.clone(),
                distance: hit.distance,
            });
        }

        debug!(query, k, returned = results.len(), "search done");
        Ok(results)
    }

    /// Returns the indexed chunks in position order (empty when uninitialized).
    #[must_use]
    pub fn chunks(&self) -> &[Chunk] {
        match &self.corpus {
            Some(corpus) => &corpus.chunks,
            None => &[],
        }
    }

    /// Returns the number of indexed chunks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.chunks().len()
    }

    /// Returns `true` if no chunks are indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` once an index has been built.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.corpus.is_some()
    }

    /// Returns a reference to the embedder.
    #[must_use]
    pub fn embedder(&self) -> &E {
        &self.embedder
    }
}
