//! Vector index backends
//!
//! The corpus is small (hundreds to low thousands of chunks), so an exact
//! brute-force scan is all that's needed.
//!
//! # Storage Model
//!
//! Row `i` of the index holds the embedding of the chunk at position `i`.
//! The index only knows positions; joining back to chunk text happens in
//! [`crate::search`].
//!
//! # Usage
//!
//! ```ignore
//! use partscout_lib::store::{FlatIndex, VectorIndex};
//!
//! let index = FlatIndex::build(embeddings)?;
//! for hit in index.query(&query_embedding, 5)? {
//!     println!("{} {:.4}", hit.position, hit.distance);
//! }
//! ```

use std::cmp::Ordering;

use serde::Serialize;

use crate::embed::Embedding;
use crate::Result;

/// One hit from an index query
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Neighbor {
    /// Row of the matched vector
    pub position: usize,
    /// Squared Euclidean distance to the query (lower is closer)
    pub distance: f32,
}

// Ordered by distance, then by position so equal distances resolve the same
// way every time. `total_cmp` keeps the order total even with NaN.
impl Ord for Neighbor {
    fn cmp(&self, other: &Self) -> Ordering {
        self.distance
            .total_cmp(&other.distance)
            .then(self.position.cmp(&other.position))
    }
}

impl PartialOrd for Neighbor {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Neighbor {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Neighbor {}

/// Trait for nearest-neighbor index backends
///
/// An index is built once from the full set of vectors and is read-only
/// afterwards.
pub trait VectorIndex: Send + Sync + Sized {
    /// Build an index over `embeddings`; row `i` is `embeddings[i]`.
    ///
    /// All vectors must share one dimension. An empty input is a valid,
    /// empty index.
    fn build(embeddings: Vec<Embedding>) -> Result<Self>;

    /// Find the `k` nearest rows to `vector`
    ///
    /// # Returns
    /// At most `min(k, len)` hits, ascending by distance, ties by position.
    fn query(&self, vector: &[f32], k: usize) -> Result<Vec<Neighbor>>;

    /// Get total number of indexed vectors
    fn len(&self) -> usize;

    /// Check if index is empty
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Dimension of the indexed vectors, `None` when empty
    fn dimension(&self) -> Option<usize>;
}

mod flat;

pub use flat::*;
