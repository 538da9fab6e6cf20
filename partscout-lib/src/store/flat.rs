use std::collections::BinaryHeap;

use tracing::debug;

use crate::embed::Embedding;
use crate::store::{Neighbor, VectorIndex};
use crate::{Error, Result};

/// Exact flat index.
///
/// Compares the query against every stored vector by squared Euclidean
/// distance on the raw vectors. No normalization and no approximation.
#[derive(Debug, Default)]
pub struct FlatIndex {
    embeddings: Vec<Embedding>,
}

impl VectorIndex for FlatIndex {
    fn build(embeddings: Vec<Embedding>) -> Result<Self> {
        if let Some(first) = embeddings.first() {
            let expected = first.len();
            if let Some((position, bad)) = embeddings
                .iter()
                .enumerate()
                .find(|(_, e)| e.len() != expected)
            {
                return Err(Error::DimensionMismatch {
                    expected,
                    found: bad.len(),
                    position: Some(position),
                });
            }
        }

        debug!(vectors = embeddings.len(), "flat index built");
        Ok(Self { embeddings })
    }

    fn query(&self, vector: &[f32], k: usize) -> Result<Vec<Neighbor>> {
        let Some(expected) = self.dimension() else {
            return Ok(Vec::new());
        };
        if k == 0 {
            return Ok(Vec::new());
        }
        if vector.len() != expected {
            return Err(Error::DimensionMismatch {
                expected,
                found: vector.len(),
                position: None,
            });
        }

        let k = k.min(self.embeddings.len());

        // max-heap capped at k: the root is the worst of the current best
        let mut best = BinaryHeap::with_capacity(k + 1);
        for (position, embedding) in self.embeddings.iter().enumerate() {
            best.push(Neighbor {
                position,
                distance: squared_l2(vector, embedding),
            });
            if best.len() > k {
                best.pop();
            }
        }

        Ok(best.into_sorted_vec())
    }

    fn len(&self) -> usize {
        self.embeddings.len()
    }

    fn dimension(&self) -> Option<usize> {
        self.embeddings.first().map(Vec::len)
    }
}

/// Compute squared Euclidean distance between two vectors.
fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len(), "vectors must have same length");

    a.iter()
        .zip(b)
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}
