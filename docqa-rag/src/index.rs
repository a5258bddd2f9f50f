//! Flat (exact) nearest-neighbour index using squared Euclidean distance.
//!
//! This module provides [`FlatL2Index`], an immutable brute-force index over a
//! contiguous buffer of vectors. Positions returned by a search are the
//! insertion positions of the vectors passed to [`FlatL2Index::build`].

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::error::{RagError, Result};

/// A single search hit: distance to the query and the vector's position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Neighbor {
    /// Squared Euclidean distance to the query.
    pub distance: f32,
    /// Insertion position of the matched vector.
    pub position: usize,
}

/// An exact nearest-neighbour index over vectors of one dimension.
///
/// Vectors are stored row-major in a single buffer. The index cannot be
/// modified after construction; a new document means a new index.
///
/// # Example
///
/// ```rust
/// use docqa_rag::FlatL2Index;
///
/// let index = FlatL2Index::build(vec![vec![0.0, 0.0], vec![3.0, 4.0]]).unwrap();
/// let hits = index.search(&[3.0, 4.0], 1).unwrap();
/// assert_eq!(hits[0].position, 1);
/// assert_eq!(hits[0].distance, 0.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FlatL2Index {
    dimensions: usize,
    data: Vec<f32>,
}

/// Squared Euclidean distance between two equal-length vectors.
pub fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}

impl FlatL2Index {
    /// Build an index over `vectors`, in order.
    ///
    /// # Errors
    ///
    /// - [`RagError::EmptyIndex`] if `vectors` is empty.
    /// - [`RagError::DimensionMismatch`] if the vectors do not all share the
    ///   dimension of the first one, or if that dimension is zero.
    pub fn build(vectors: Vec<Vec<f32>>) -> Result<Self> {
        let dimensions = vectors.first().map(Vec::len).ok_or(RagError::EmptyIndex)?;
        if dimensions == 0 {
            return Err(RagError::DimensionMismatch { expected: 1, actual: 0 });
        }

        let mut data = Vec::with_capacity(dimensions * vectors.len());
        for vector in &vectors {
            if vector.len() != dimensions {
                return Err(RagError::DimensionMismatch {
                    expected: dimensions,
                    actual: vector.len(),
                });
            }
            data.extend_from_slice(vector);
        }

        Ok(Self { dimensions, data })
    }

    /// Dimension shared by every vector in the index.
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Number of indexed vectors.
    pub fn len(&self) -> usize {
        self.data.len() / self.dimensions
    }

    /// Always `false` for a successfully built index.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The vector stored at `position`, if any.
    pub fn vector(&self, position: usize) -> Option<&[f32]> {
        self.data.chunks_exact(self.dimensions).nth(position)
    }

    /// Return the `top_k` vectors nearest to `query`.
    ///
    /// Results are ordered by ascending squared distance; equal distances are
    /// ordered by lower insertion position. A `top_k` larger than the index
    /// returns every vector.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::DimensionMismatch`] if `query` has the wrong length.
    pub fn search(&self, query: &[f32], top_k: usize) -> Result<Vec<Neighbor>> {
        if query.len() != self.dimensions {
            return Err(RagError::DimensionMismatch {
                expected: self.dimensions,
                actual: query.len(),
            });
        }

        let mut neighbors: Vec<Neighbor> = self
            .data
            .chunks_exact(self.dimensions)
            .enumerate()
            .map(|(position, vector)| Neighbor { distance: squared_l2(vector, query), position })
            .collect();

        neighbors.sort_by(compare_neighbors);
        neighbors.truncate(top_k);
        Ok(neighbors)
    }
}

fn compare_neighbors(a: &Neighbor, b: &Neighbor) -> Ordering {
    a.distance.total_cmp(&b.distance).then_with(|| a.position.cmp(&b.position))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three() -> FlatL2Index {
        FlatL2Index::build(vec![vec![0.0, 0.0], vec![1.0, 0.0], vec![0.0, 2.0]]).unwrap()
    }

    #[test]
    fn self_match_is_first_at_zero_distance() {
        let index = three();
        for position in 0..index.len() {
            let query = index.vector(position).unwrap().to_vec();
            let hits = index.search(&query, 1).unwrap();
            assert_eq!(hits, [Neighbor { distance: 0.0, position }]);
        }
    }

    #[test]
    fn distances_are_squared() {
        let hits = three().search(&[0.0, 0.0], 3).unwrap();
        let distances: Vec<f32> = hits.iter().map(|n| n.distance).collect();
        assert_eq!(distances, [0.0, 1.0, 4.0]);
    }

    #[test]
    fn top_k_larger_than_index_returns_everything() {
        let hits = three().search(&[5.0, 5.0], 1000).unwrap();
        assert_eq!(hits.len(), 3);
    }

    #[test]
    fn zero_top_k_returns_nothing() {
        assert!(three().search(&[0.0, 0.0], 0).unwrap().is_empty());
    }

    #[test]
    fn ties_prefer_lower_position() {
        let index =
            FlatL2Index::build(vec![vec![1.0, 0.0], vec![-1.0, 0.0], vec![0.0, 1.0]]).unwrap();
        let positions: Vec<usize> =
            index.search(&[0.0, 0.0], 3).unwrap().iter().map(|n| n.position).collect();
        assert_eq!(positions, [0, 1, 2]);
    }

    #[test]
    fn empty_input_is_rejected() {
        assert!(matches!(FlatL2Index::build(Vec::new()), Err(RagError::EmptyIndex)));
    }

    #[test]
    fn mixed_dimensions_are_rejected() {
        let err = FlatL2Index::build(vec![vec![1.0, 2.0], vec![1.0]]).unwrap_err();
        assert!(matches!(err, RagError::DimensionMismatch { expected: 2, actual: 1 }));
    }

    #[test]
    fn zero_dimension_is_rejected() {
        let err = FlatL2Index::build(vec![Vec::new()]).unwrap_err();
        assert!(matches!(err, RagError::DimensionMismatch { actual: 0, .. }));
    }

    #[test]
    fn wrong_query_dimension_is_rejected() {
        let err = three().search(&[1.0, 2.0, 3.0], 1).unwrap_err();
        assert!(matches!(err, RagError::DimensionMismatch { expected: 2, actual: 3 }));
    }
}
