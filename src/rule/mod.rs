//! Learning rules: the similarity and update formulas a network searches with.
//!
//! A rule supplies the three functions every resonance search needs
//! (activation, match, weight update), how a fresh prototype is built from
//! an input, and how raw inputs are coded before they reach a module.
//!
//! - [`Fuzzy`]: Fuzzy ART with complement coding (Carpenter et al., 1991)
//! - [`Hypersphere`]: Hypersphere ART (Anagnostopoulos & Georgiopoulos, 2000)
//! - [`Art1`]: binary ART 1 with bottom-up/top-down weights
//!
//! Networks are generic over [`LearningRule`]; the closed [`Rule`] enum
//! picks one of the three at runtime and is the default type parameter.
//!
//! # Example
//!
//! ```rust
//! use resonant::{LearningRule, Pattern, Rule};
//!
//! let rule = Rule::fuzzy();
//! let x = rule.process(&Pattern::from_f64(&[0.2, 0.9]));
//! let w = rule.new_weight(&x);
//! assert_eq!(rule.weight_dimension(2), 4);
//! assert_eq!(w.dimensions(), 4);
//! ```

pub mod art1;
pub mod fuzzy;
pub mod hypersphere;

pub use art1::Art1;
pub use fuzzy::Fuzzy;
pub use hypersphere::Hypersphere;

use crate::config::ModuleParams;
use crate::error::Result;
use crate::pattern::{Feature, Pattern};
use serde::{Deserialize, Serialize};

/// The contract between a network and its similarity formulas.
pub trait LearningRule {
    /// Width of a prototype row for `input_dimension` raw features.
    fn weight_dimension(&self, input_dimension: usize) -> usize;

    /// Prototype of a brand-new category created from the coded input `x`.
    fn new_weight(&self, x: &Pattern) -> Pattern;

    /// Choice value used to rank categories.
    fn activation(&self, params: &ModuleParams, x: &[Feature], w: &[Feature]) -> f64;

    /// Match value compared against vigilance.
    fn match_score(&self, params: &ModuleParams, x: &[Feature], w: &[Feature]) -> f64;

    /// Move `w` toward `x` at `learning_rate`.
    fn weight_update(&self, learning_rate: f64, x: &[Feature], w: &[Feature]) -> Vec<Feature>;

    /// Code a raw input before it enters a module.
    fn process(&self, x: &Pattern) -> Pattern {
        x.clone()
    }

    /// Revert [`process`](Self::process).
    fn unprocess(&self, x: &Pattern) -> Pattern {
        x.clone()
    }

    /// The coded pattern a prototype stands for, without rule-specific terms.
    fn prototype(&self, w: &[Feature]) -> Pattern {
        Pattern::from_data(w.to_vec())
    }

    /// Adapt data-dependent constants to a training batch.
    fn fit(&mut self, _data: &[Pattern]) {}

    /// Check rule-specific parameters.
    fn validate(&self) -> Result<()> {
        Ok(())
    }
}

// =============================================================================
// Rule
// =============================================================================

/// Runtime choice among the three learning rules.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Rule {
    Fuzzy(Fuzzy),
    Hypersphere(Hypersphere),
    Art1(Art1),
}

impl Rule {
    pub fn fuzzy() -> Self {
        Rule::Fuzzy(Fuzzy)
    }

    pub fn hypersphere() -> Self {
        Rule::Hypersphere(Hypersphere::new())
    }

    /// ART 1 with choice parameter `l` (2.0 is customary).
    pub fn art1(l: f64) -> Self {
        Rule::Art1(Art1::new(l))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Rule::Fuzzy(_) => "fuzzy",
            Rule::Hypersphere(_) => "hypersphere",
            Rule::Art1(_) => "ART1",
        }
    }
}

impl Default for Rule {
    fn default() -> Self {
        Rule::fuzzy()
    }
}

impl LearningRule for Rule {
    fn weight_dimension(&self, input_dimension: usize) -> usize {
        match self {
            Rule::Fuzzy(r) => r.weight_dimension(input_dimension),
            Rule::Hypersphere(r) => r.weight_dimension(input_dimension),
            Rule::Art1(r) => r.weight_dimension(input_dimension),
        }
    }

    fn new_weight(&self, x: &Pattern) -> Pattern {
        match self {
            Rule::Fuzzy(r) => r.new_weight(x),
            Rule::Hypersphere(r) => r.new_weight(x),
            Rule::Art1(r) => r.new_weight(x),
        }
    }

    fn activation(&self, params: &ModuleParams, x: &[Feature], w: &[Feature]) -> f64 {
        match self {
            Rule::Fuzzy(r) => r.activation(params, x, w),
            Rule::Hypersphere(r) => r.activation(params, x, w),
            Rule::Art1(r) => r.activation(params, x, w),
        }
    }

    fn match_score(&self, params: &ModuleParams, x: &[Feature], w: &[Feature]) -> f64 {
        match self {
            Rule::Fuzzy(r) => r.match_score(params, x, w),
            Rule::Hypersphere(r) => r.match_score(params, x, w),
            Rule::Art1(r) => r.match_score(params, x, w),
        }
    }

    fn weight_update(&self, learning_rate: f64, x: &[Feature], w: &[Feature]) -> Vec<Feature> {
        match self {
            Rule::Fuzzy(r) => r.weight_update(learning_rate, x, w),
            Rule::Hypersphere(r) => r.weight_update(learning_rate, x, w),
            Rule::Art1(r) => r.weight_update(learning_rate, x, w),
        }
    }

    fn process(&self, x: &Pattern) -> Pattern {
        match self {
            Rule::Fuzzy(r) => r.process(x),
            Rule::Hypersphere(r) => r.process(x),
            Rule::Art1(r) => r.process(x),
        }
    }

    fn unprocess(&self, x: &Pattern) -> Pattern {
        match self {
            Rule::Fuzzy(r) => r.unprocess(x),
            Rule::Hypersphere(r) => r.unprocess(x),
            Rule::Art1(r) => r.unprocess(x),
        }
    }

    fn prototype(&self, w: &[Feature]) -> Pattern {
        match self {
            Rule::Fuzzy(r) => r.prototype(w),
            Rule::Hypersphere(r) => r.prototype(w),
            Rule::Art1(r) => r.prototype(w),
        }
    }

    fn fit(&mut self, data: &[Pattern]) {
        match self {
            Rule::Fuzzy(r) => r.fit(data),
            Rule::Hypersphere(r) => r.fit(data),
            Rule::Art1(r) => r.fit(data),
        }
    }

    fn validate(&self) -> Result<()> {
        match self {
            Rule::Art1(r) => r.validate(),
            _ => Ok(()),
        }
    }
}
