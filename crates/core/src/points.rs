//! Scattered point samples

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// A sample point with x, y coordinates and a scalar value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplePoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl SamplePoint {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// An ordered, non-empty, immutable set of samples read from one point file.
#[derive(Debug, Clone, PartialEq)]
pub struct PointSet {
    points: Vec<SamplePoint>,
}

impl PointSet {
    /// Wrap a list of samples; fails on an empty list or non-finite fields.
    pub fn new(points: Vec<SamplePoint>) -> Result<Self> {
        if points.is_empty() {
            return Err(Error::InsufficientData("point set is empty".into()));
        }
        if let Some((i, p)) = points
            .iter()
            .enumerate()
            .find(|(_, p)| !(p.x.is_finite() && p.y.is_finite() && p.z.is_finite()))
        {
            return Err(Error::invalid_input(
                "point",
                format!("#{} ({}, {}, {})", i, p.x, p.y, p.z),
                "coordinates and values must be finite",
            ));
        }
        Ok(Self { points })
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false; see [`PointSet::new`]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SamplePoint> {
        self.points.iter()
    }

    pub fn as_slice(&self) -> &[SamplePoint] {
        &self.points
    }

    /// Bounding box (min_x, min_y, max_x, max_y)
    pub fn bounds(&self) -> (f64, f64, f64, f64) {
        self.points.iter().fold(
            (f64::INFINITY, f64::INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
            |(x0, y0, x1, y1), p| (x0.min(p.x), y0.min(p.y), x1.max(p.x), y1.max(p.y)),
        )
    }
}

impl<'a> IntoIterator for &'a PointSet {
    type Item = &'a SamplePoint;
    type IntoIter = std::slice::Iter<'a, SamplePoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}
