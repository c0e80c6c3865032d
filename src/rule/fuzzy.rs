//! Fuzzy ART.
//!
//! Inputs are complement coded, so a prototype is a hyper-rectangle whose
//! lower corner is the first half of the row and whose (inverted) upper
//! corner is the second half. Fuzzy AND is the element-wise minimum.

use super::LearningRule;
use crate::config::ModuleParams;
use crate::pattern::{fuzzy_and, match_ratio, present_sum, Feature, Pattern};
use serde::{Deserialize, Serialize};

/// Fuzzy ART learning rule.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fuzzy;

impl Fuzzy {
    /// `|x ∧ w| / |x|`, the match value without module parameters.
    ///
    /// The ARTMAP map field scores its association rows with this.
    pub fn match_value(x: &[Feature], w: &[Feature]) -> f64 {
        match_ratio(present_sum(&fuzzy_and(x, w)), present_sum(x), present_sum(w))
    }

    /// `β (x ∧ w) + (1 − β) w`.
    pub fn update(learning_rate: f64, x: &[Feature], w: &[Feature]) -> Vec<Feature> {
        fuzzy_and(x, w)
            .iter()
            .zip(w.iter())
            .map(|(m, w)| match (m, w) {
                (Some(m), Some(w)) => Some(learning_rate * m + (1.0 - learning_rate) * w),
                _ => None,
            })
            .collect()
    }
}

impl LearningRule for Fuzzy {
    fn weight_dimension(&self, input_dimension: usize) -> usize {
        input_dimension * 2
    }

    fn new_weight(&self, x: &Pattern) -> Pattern {
        x.clone()
    }

    /// `|x ∧ w| / (α + |w|)`
    fn activation(&self, params: &ModuleParams, x: &[Feature], w: &[Feature]) -> f64 {
        present_sum(&fuzzy_and(x, w)) / (params.alpha + present_sum(w))
    }

    /// `|x ∧ w| / |x|`
    fn match_score(&self, _params: &ModuleParams, x: &[Feature], w: &[Feature]) -> f64 {
        Self::match_value(x, w)
    }

    fn weight_update(&self, learning_rate: f64, x: &[Feature], w: &[Feature]) -> Vec<Feature> {
        Self::update(learning_rate, x, w)
    }

    fn process(&self, x: &Pattern) -> Pattern {
        x.complement_code()
    }

    fn unprocess(&self, x: &Pattern) -> Pattern {
        x.complement_decode()
    }
}
