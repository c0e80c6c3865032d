//! A single resonance layer.

use super::search::rank;
use super::store::CategoryStore;
use crate::config::ModuleParams;
use crate::pattern::{Feature, Pattern};
use crate::rule::LearningRule;
use serde::{Deserialize, Serialize};

/// One layer: parameters, its category store and the last winners.
///
/// `winner` is the last resonant category; TopoART also records the
/// second-best match of the last sample in `runner_up`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Module {
    id: usize,
    params: ModuleParams,
    store: CategoryStore,
    winner: Option<usize>,
    runner_up: Option<usize>,
}

impl Module {
    /// A module whose prototype rows are `width` features wide.
    pub fn new(id: usize, params: ModuleParams, width: usize) -> Self {
        Self {
            id,
            params,
            store: CategoryStore::new(width, params.capacity),
            winner: None,
            runner_up: None,
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn params(&self) -> &ModuleParams {
        &self.params
    }

    pub fn vigilance(&self) -> f64 {
        self.params.vigilance
    }

    pub fn learning_rate(&self) -> f64 {
        self.params.learning_rate
    }

    pub fn store(&self) -> &CategoryStore {
        &self.store
    }

    pub(crate) fn store_mut(&mut self) -> &mut CategoryStore {
        &mut self.store
    }

    pub fn num_categories(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Prototype row of category `k`.
    pub fn weight(&self, k: usize) -> &[Feature] {
        self.store.weight(k)
    }

    pub fn winner(&self) -> Option<usize> {
        self.winner
    }

    pub fn runner_up(&self) -> Option<usize> {
        self.runner_up
    }

    pub(crate) fn set_winner(&mut self, winner: Option<usize>) {
        self.winner = winner;
    }

    pub(crate) fn set_runner_up(&mut self, runner_up: Option<usize>) {
        self.runner_up = runner_up;
    }

    /// Activation of every committed category for `x`.
    pub fn activations<R: LearningRule>(&self, rule: &R, x: &Pattern) -> Vec<f64> {
        self.store
            .iter()
            .map(|w| rule.activation(&self.params, x.data(), w))
            .collect()
    }

    /// Category indices in search order for `x`.
    pub fn rank<R: LearningRule>(&self, rule: &R, x: &Pattern) -> Vec<usize> {
        rank(&self.activations(rule, x))
    }

    pub fn match_score<R: LearningRule>(&self, rule: &R, k: usize, x: &Pattern) -> f64 {
        rule.match_score(&self.params, x.data(), self.store.weight(k))
    }

    /// Commit a category for `x` and make it the winner.
    pub(crate) fn new_category<R: LearningRule>(&mut self, rule: &R, x: &Pattern) -> usize {
        let k = self.store.push(rule.new_weight(x));
        self.winner = Some(k);
        k
    }

    /// Move category `k` toward `x`. Returns whether the row changed.
    pub(crate) fn learn<R: LearningRule>(
        &mut self,
        rule: &R,
        k: usize,
        x: &Pattern,
        learning_rate: f64,
    ) -> bool {
        let updated = rule.weight_update(learning_rate, x.data(), self.store.weight(k));
        self.store.set_weight(k, updated)
    }

    /// Learn `k`, count the use and make it the winner.
    pub(crate) fn resonate<R: LearningRule>(
        &mut self,
        rule: &R,
        k: usize,
        x: &Pattern,
        learning_rate: f64,
    ) {
        self.learn(rule, k, x, learning_rate);
        self.store.record_use(k);
        self.winner = Some(k);
    }

    /// Zero the per-epoch bookkeeping.
    pub(crate) fn reset_epoch(&mut self) {
        self.store.reset_counters();
        self.store.reset_changes();
    }

    pub(crate) fn compact(&mut self) {
        self.store.compact();
    }

    /// Follow a pruning remap so the winners keep pointing at survivors.
    pub(crate) fn remap_winners(&mut self, remap: &[Option<usize>]) {
        self.winner = self.winner.and_then(|k| remap.get(k).copied().flatten());
        self.runner_up = self.runner_up.and_then(|k| remap.get(k).copied().flatten());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::Rule;

    #[test]
    fn test_new_category_is_winner() {
        let rule = Rule::fuzzy();
        let mut module = Module::new(0, ModuleParams::new(0.7, 1.0, 2), 4);
        let x = rule.process(&Pattern::from_f64(&[0.3, 0.6]));
        let k = module.new_category(&rule, &x);
        assert_eq!(k, 0);
        assert_eq!(module.winner(), Some(0));
        assert_eq!(module.num_categories(), 1);
        assert_eq!(module.store().counters()[0], 1);
    }

    #[test]
    fn test_activations_follow_rule() {
        let rule = Rule::fuzzy();
        let mut module = Module::new(0, ModuleParams::new(0.7, 1.0, 2), 4);
        let a = rule.process(&Pattern::from_f64(&[0.2, 0.2]));
        let b = rule.process(&Pattern::from_f64(&[0.8, 0.8]));
        module.new_category(&rule, &a);
        module.new_category(&rule, &b);
        assert_eq!(module.rank(&rule, &b), vec![1, 0]);
        assert_eq!(module.match_score(&rule, 1, &b), 1.0);
    }

    #[test]
    fn test_remap_winners() {
        let mut module = Module::new(0, ModuleParams::new(0.7, 1.0, 2), 1);
        module.set_winner(Some(2));
        module.set_runner_up(Some(0));
        module.remap_winners(&[None, Some(0), Some(1)]);
        assert_eq!(module.winner(), Some(1));
        assert_eq!(module.runner_up(), None);
    }
}
