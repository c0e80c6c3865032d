//! Resonance search.
//!
//! Categories are visited in descending activation order; the first one
//! whose match reaches the (possibly raised) vigilance resonates. The search
//! itself never touches weights: callers drive the state machine and decide
//! what an accepted or exhausted search means for them.
//!
//! ```text
//!   Searching(0) ──match ≥ ρ──▶ Resonant(k)
//!        │
//!    reject / track
//!        ▼
//!   Searching(1) ── ... ──▶ Exhausted
//! ```

use super::Module;
use crate::pattern::Pattern;
use crate::rule::LearningRule;

/// Category indices ordered by descending activation.
///
/// Equal activations keep their index order. NaN ranks last.
pub fn rank(activations: &[f64]) -> Vec<usize> {
    let key = |a: f64| if a.is_nan() { f64::NEG_INFINITY } else { a + 0.0 };
    let mut order: Vec<usize> = (0..activations.len()).collect();
    order.sort_by(|&i, &j| key(activations[j]).total_cmp(&key(activations[i])));
    order
}

/// Where a search stands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchState {
    /// Evaluating the candidate at this ranking position.
    Searching(usize),
    /// A category was accepted.
    Resonant(usize),
    /// Every candidate was rejected.
    Exhausted,
}

/// One walk down a ranking.
#[derive(Clone, Debug)]
pub struct ResonanceSearch {
    ranking: Vec<usize>,
    vigilance: f64,
    state: SearchState,
}

impl ResonanceSearch {
    /// Start at the top of `ranking`; an empty ranking is already exhausted.
    pub fn new(ranking: Vec<usize>, vigilance: f64) -> Self {
        let state = if ranking.is_empty() {
            SearchState::Exhausted
        } else {
            SearchState::Searching(0)
        };
        Self {
            ranking,
            vigilance,
            state,
        }
    }

    pub fn state(&self) -> SearchState {
        self.state
    }

    /// Current effective vigilance.
    pub fn vigilance(&self) -> f64 {
        self.vigilance
    }

    /// Category under evaluation, if still searching.
    pub fn candidate(&self) -> Option<usize> {
        match self.state {
            SearchState::Searching(j) => Some(self.ranking[j]),
            _ => None,
        }
    }

    /// The vigilance test: `m ≥ ρ`.
    pub fn passes(&self, m: f64) -> bool {
        m >= self.vigilance
    }

    /// Accept the current candidate.
    pub fn resonate(&mut self) {
        if let Some(k) = self.candidate() {
            self.state = SearchState::Resonant(k);
        }
    }

    /// Move to the next candidate, or exhaust the ranking.
    pub fn advance(&mut self) {
        if let SearchState::Searching(j) = self.state {
            self.state = if j + 1 < self.ranking.len() {
                SearchState::Searching(j + 1)
            } else {
                SearchState::Exhausted
            };
        }
    }

    /// Match tracking: raise vigilance just above `m` and move on.
    pub fn track(&mut self, m: f64, epsilon: f64) {
        self.vigilance = (m + epsilon).min(1.0);
        self.advance();
    }
}

// =============================================================================
// Plain search
// =============================================================================

/// Resonate `x` in `module`, learning the winner or creating a category.
///
/// Always returns a winner.
pub fn learn<R: LearningRule>(module: &mut Module, rule: &R, x: &Pattern) -> usize {
    let mut search = ResonanceSearch::new(module.rank(rule, x), module.vigilance());
    while let Some(k) = search.candidate() {
        if search.passes(module.match_score(rule, k, x)) {
            module.resonate(rule, k, x, module.learning_rate());
            search.resonate();
        } else {
            search.advance();
        }
    }
    match search.state() {
        SearchState::Resonant(k) => k,
        _ => module.new_category(rule, x),
    }
}

/// Find the resonant category for `x` without learning.
pub fn classify<R: LearningRule>(module: &mut Module, rule: &R, x: &Pattern) -> Option<usize> {
    let mut search = ResonanceSearch::new(module.rank(rule, x), module.vigilance());
    while let Some(k) = search.candidate() {
        if search.passes(module.match_score(rule, k, x)) {
            search.resonate();
        } else {
            search.advance();
        }
    }
    let winner = match search.state() {
        SearchState::Resonant(k) => Some(k),
        _ => None,
    };
    module.set_winner(winner);
    winner
}
