//! Pattern type for resonant.
//!
//! A pattern is a dense feature vector in which single features may be
//! missing. Missing features are stored as `None` and are skipped by every
//! sum the learning rules compute, so a half-observed input still takes part
//! in category search.

use crate::error::{ArtError, Result};
use serde::{Deserialize, Serialize};
use std::ops::Index;

/// A single feature value; `None` marks an absent observation.
pub type Feature = Option<f64>;

/// An input pattern or a prototype row.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pattern {
    /// The actual feature data
    data: Vec<Feature>,
}

impl Pattern {
    /// Create a pattern where every feature is missing.
    pub fn missing(dimensions: usize) -> Self {
        Self {
            data: vec![None; dimensions],
        }
    }

    /// Create a pattern from raw feature data.
    pub fn from_data(data: Vec<Feature>) -> Self {
        Self { data }
    }

    /// Create a pattern from f64 values. `NaN` becomes a missing feature.
    pub fn from_f64(values: &[f64]) -> Self {
        let data = values
            .iter()
            .map(|&v| if v.is_nan() { None } else { Some(v) })
            .collect();
        Self { data }
    }

    /// A pattern with a single 1.0 at `index` and 0.0 everywhere else.
    pub fn one_hot(dimensions: usize, index: usize) -> Self {
        assert!(index < dimensions, "one-hot index {} out of {}", index, dimensions);
        let mut data = vec![Some(0.0); dimensions];
        data[index] = Some(1.0);
        Self { data }
    }

    /// Get the dimensionality.
    pub fn dimensions(&self) -> usize {
        self.data.len()
    }

    /// Get the raw data as a slice.
    pub fn data(&self) -> &[Feature] {
        &self.data
    }

    /// Complement coding: `[x, 1 - x]`.
    ///
    /// A missing feature stays missing in both halves.
    pub fn complement_code(&self) -> Pattern {
        let mut data = Vec::with_capacity(self.data.len() * 2);
        data.extend_from_slice(&self.data);
        data.extend(self.data.iter().map(|v| v.map(|x| 1.0 - x)));
        Pattern { data }
    }

    /// Inverse of [`complement_code`](Self::complement_code): keep the first half.
    pub fn complement_decode(&self) -> Pattern {
        assert!(
            self.data.len() % 2 == 0,
            "complement coded pattern must have an even length, got {}",
            self.data.len()
        );
        Pattern {
            data: self.data[..self.data.len() / 2].to_vec(),
        }
    }
}

impl Index<usize> for Pattern {
    type Output = Feature;

    fn index(&self, index: usize) -> &Self::Output {
        &self.data[index]
    }
}

// =============================================================================
// Feature arithmetic
// =============================================================================

/// Check that a non-empty training batch holds `expected`-dimensional patterns.
pub(crate) fn check_training(rows: &[Pattern], expected: usize, what: &str) -> Result<()> {
    if rows.is_empty() {
        return Err(ArtError::EmptyInput(format!("{what} has no rows")));
    }
    check_batch(rows, expected)
}

/// Check that every row of a batch has `expected` features.
pub(crate) fn check_batch(rows: &[Pattern], expected: usize) -> Result<()> {
    match rows.iter().find(|row| row.dimensions() != expected) {
        Some(row) => Err(ArtError::DimensionMismatch {
            expected,
            got: row.dimensions(),
        }),
        None => Ok(()),
    }
}

/// Sum of the present features.
pub fn present_sum(values: &[Feature]) -> f64 {
    values.iter().flatten().sum()
}

/// Element-wise minimum (fuzzy AND). Missing on either side stays missing.
pub fn fuzzy_and(a: &[Feature], b: &[Feature]) -> Vec<Feature> {
    assert_eq!(a.len(), b.len(), "Dimension mismatch in fuzzy AND");
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| match (x, y) {
            (Some(x), Some(y)) => Some(x.min(*y)),
            _ => None,
        })
        .collect()
}

/// `overlap / input`, the share of the input a category covers.
///
/// An input with nothing observed only matches a category that is just as
/// empty; against anything else the ratio is NaN and fails every vigilance
/// test.
pub(crate) fn match_ratio(overlap: f64, input: f64, weight: f64) -> f64 {
    if input == 0.0 {
        return if weight == 0.0 { 1.0 } else { f64::NAN };
    }
    overlap / input
}

/// Sum of absolute differences over features present in both rows.
///
/// A feature that appears or disappears counts as an infinite difference.
pub(crate) fn abs_delta(old: &[Feature], new: &[Feature]) -> f64 {
    assert_eq!(old.len(), new.len(), "Dimension mismatch in weight delta");
    old.iter()
        .zip(new.iter())
        .map(|(a, b)| match (a, b) {
            (Some(a), Some(b)) => (a - b).abs(),
            (None, None) => 0.0,
            _ => f64::INFINITY,
        })
        .sum()
}
