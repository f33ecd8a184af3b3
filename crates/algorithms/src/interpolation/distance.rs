//! Distances and neighbor search in grid-index space
//!
//! All searches are deterministic: equal distances are ordered by row, then
//! by column (row-major order).

use std::cmp::Ordering;

/// A known cell as seen from a query cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub row: usize,
    pub col: usize,
    pub value: f64,
    pub distance: f64,
}

impl Neighbor {
    /// Distance first, then row-major position
    fn search_order(&self, other: &Self) -> Ordering {
        self.distance
            .total_cmp(&other.distance)
            .then_with(|| (self.row, self.col).cmp(&(other.row, other.col)))
    }
}

/// Distance between two cells given as (row, col).
pub trait DistanceMetric {
    fn distance(&self, a: (usize, usize), b: (usize, usize)) -> f64;
}

/// Straight-line distance between cell indices.
#[derive(Debug, Clone, Copy, Default)]
pub struct Euclidean;

impl Euclidean {
    /// Exact squared distance
    #[inline]
    pub fn distance_sq(a: (usize, usize), b: (usize, usize)) -> u64 {
        let dr = a.0.abs_diff(b.0) as u64;
        let dc = a.1.abs_diff(b.1) as u64;
        dr * dr + dc * dc
    }
}

impl DistanceMetric for Euclidean {
    #[inline]
    fn distance(&self, a: (usize, usize), b: (usize, usize)) -> f64 {
        (Self::distance_sq(a, b) as f64).sqrt()
    }
}

/// The `k` candidates closest to `query`, nearest first.
///
/// `candidates` are known cells as (row, col, value). Returns fewer than `k`
/// neighbors only when there are fewer candidates.
pub fn k_nearest<M: DistanceMetric>(
    metric: &M,
    query: (usize, usize),
    candidates: &[(usize, usize, f64)],
    k: usize,
) -> Vec<Neighbor> {
    let mut neighbors: Vec<Neighbor> = candidates
        .iter()
        .map(|&(row, col, value)| Neighbor {
            row,
            col,
            value,
            distance: metric.distance(query, (row, col)),
        })
        .collect();

    let k = k.min(neighbors.len());
    if k == 0 {
        return Vec::new();
    }
    if k < neighbors.len() {
        neighbors.select_nth_unstable_by(k - 1, Neighbor::search_order);
        neighbors.truncate(k);
    }
    neighbors.sort_by(Neighbor::search_order);
    neighbors
}

/// The single candidate closest to `query`.
pub fn nearest<M: DistanceMetric>(
    metric: &M,
    query: (usize, usize),
    candidates: &[(usize, usize, f64)],
) -> Option<Neighbor> {
    k_nearest(metric, query, candidates, 1).into_iter().next()
}

/// Nearest source index for output index `index` of an axis upscaled by
/// `factor`.
///
/// Source cell `j` sits at output position `j * factor`, so this is
/// `index / factor` rounded to the nearest integer with exact halves going to
/// the smaller index, clamped to `len - 1`. On a regular lattice the
/// Euclidean nearest cell separates per axis, so applying this to rows and
/// columns independently gives the 2D nearest cell with row-major tie-breaks.
#[inline]
pub fn nearest_source_index(index: usize, factor: usize, len: usize) -> usize {
    debug_assert!(factor >= 1 && len >= 1);
    // ceil(index / factor - 1/2) in integer arithmetic
    let j = (2 * index + factor - 1) / (2 * factor);
    j.min(len - 1)
}
