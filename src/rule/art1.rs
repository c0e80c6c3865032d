//! ART 1 for binary patterns.
//!
//! A row stores the bottom-up weights in its first half and the top-down
//! template in its second half. Learning is always fast: the template is
//! intersected with the input and the bottom-up half is renormalised.

use super::LearningRule;
use crate::config::ModuleParams;
use crate::error::{ArtError, Result};
use crate::pattern::{match_ratio, present_sum, Feature, Pattern};
use serde::{Deserialize, Serialize};

/// ART 1 learning rule with choice parameter `L`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Art1 {
    l: f64,
}

impl Art1 {
    pub fn new(l: f64) -> Self {
        Self { l }
    }

    pub fn l(&self) -> f64 {
        self.l
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.l >= 1.0) {
            return Err(ArtError::TooSmall {
                parameter: "L",
                min: 1.0,
                value: self.l,
            });
        }
        Ok(())
    }

    /// Bottom-up half of a row.
    pub fn bottom_up(w: &[Feature]) -> &[Feature] {
        &w[..w.len() / 2]
    }

    /// Top-down half of a row.
    pub fn top_down(w: &[Feature]) -> &[Feature] {
        &w[w.len() / 2..]
    }

    /// `L / (L − 1 + |w_td|) · w_td`
    fn normalise(&self, w_td: &[Feature]) -> Vec<Feature> {
        let denominator = self.l - 1.0 + present_sum(w_td);
        let scale = if denominator == 0.0 {
            0.0
        } else {
            self.l / denominator
        };
        w_td.iter().map(|v| v.map(|v| scale * v)).collect()
    }

    fn intersect(x: &[Feature], w: &[Feature]) -> Vec<Feature> {
        assert_eq!(x.len(), w.len(), "Dimension mismatch in ART1 intersection");
        x.iter()
            .zip(w.iter())
            .map(|(a, b)| Some(a.as_ref()? * b.as_ref()?))
            .collect()
    }

    fn join(&self, w_td: Vec<Feature>) -> Vec<Feature> {
        let mut row = self.normalise(&w_td);
        row.extend(w_td);
        row
    }
}

impl Default for Art1 {
    fn default() -> Self {
        Self::new(2.0)
    }
}

impl LearningRule for Art1 {
    fn weight_dimension(&self, input_dimension: usize) -> usize {
        input_dimension * 2
    }

    /// Fast commit: the template is the input itself.
    ///
    /// Departs from the classic uncommitted all-ones template: a new row
    /// starts out already committed to `x`.
    fn new_weight(&self, x: &Pattern) -> Pattern {
        Pattern::from_data(self.join(x.data().to_vec()))
    }

    /// `Σ x · w_bu` over present inputs.
    fn activation(&self, _params: &ModuleParams, x: &[Feature], w: &[Feature]) -> f64 {
        present_sum(&Self::intersect(x, Self::bottom_up(w)))
    }

    /// `|x ∧ w_td| / |x|`
    fn match_score(&self, _params: &ModuleParams, x: &[Feature], w: &[Feature]) -> f64 {
        let w_td = Self::top_down(w);
        match_ratio(
            present_sum(&Self::intersect(x, w_td)),
            present_sum(x),
            present_sum(w_td),
        )
    }

    fn weight_update(&self, _learning_rate: f64, x: &[Feature], w: &[Feature]) -> Vec<Feature> {
        self.join(Self::intersect(x, Self::top_down(w)))
    }

    /// The top-down template.
    fn prototype(&self, w: &[Feature]) -> Pattern {
        Pattern::from_data(Self::top_down(w).to_vec())
    }

    fn validate(&self) -> Result<()> {
        Art1::validate(self)
    }
}
