//! Module chain: a hierarchy of modules with cascading vigilance.
//!
//! Module `i` runs at `ρᵢ = 0.5·(ρᵢ₋₁ + 1)`. During learning the same input
//! pattern climbs the chain from module 0; classification queries one
//! module at a time.

use super::module::Module;
use super::search;
use crate::config::ModuleParams;
use crate::error::{ArtError, Result};
use crate::pattern::Pattern;
use crate::rule::LearningRule;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Vigilance of the module above one running at `vigilance`.
pub fn next_vigilance(vigilance: f64) -> f64 {
    0.5 * (vigilance + 1.0)
}

/// Vigilances of a `count`-module chain starting from `base`.
///
/// Modules whose derived vigilance is 0 or negative are dropped with a
/// warning; the returned list only holds the survivors.
pub fn cascade(base: f64, count: usize) -> Result<Vec<f64>> {
    let mut vigilances = Vec::with_capacity(count);
    let mut rho = base;
    for i in 0..count {
        if i > 0 {
            rho = next_vigilance(rho);
        }
        if rho <= 0.0 {
            warn!(module = i, vigilance = rho, "dropping module with non-positive vigilance");
            continue;
        }
        vigilances.push(rho);
    }
    if vigilances.is_empty() {
        return Err(ArtError::EmptyChain);
    }
    Ok(vigilances)
}

/// An ordered list of modules learning the same inputs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ModuleChain {
    modules: Vec<Module>,
}

impl ModuleChain {
    /// Build a chain of `count` modules from `base` vigilance.
    ///
    /// `params` turns each surviving vigilance into module parameters.
    pub fn new(
        count: usize,
        base: f64,
        width: usize,
        params: impl Fn(f64) -> ModuleParams,
    ) -> Result<Self> {
        let modules = cascade(base, count)?
            .into_iter()
            .enumerate()
            .map(|(id, rho)| Module::new(id, params(rho), width))
            .collect();
        Ok(Self { modules })
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    pub fn module(&self, id: usize) -> Result<&Module> {
        self.modules.get(id).ok_or(ArtError::UnknownModule {
            id,
            count: self.modules.len(),
        })
    }

    pub(crate) fn module_mut(&mut self, id: usize) -> Result<&mut Module> {
        let count = self.modules.len();
        self.modules
            .get_mut(id)
            .ok_or(ArtError::UnknownModule { id, count })
    }

    /// Learn `x` in every module from `start` upward. Returns the winners.
    ///
    /// Every learning search resonates, so the pattern always reaches the
    /// top of the chain.
    pub fn learn<R: LearningRule>(&mut self, rule: &R, start: usize, x: &Pattern) -> Vec<usize> {
        self.modules
            .iter_mut()
            .skip(start)
            .map(|module| search::learn(module, rule, x))
            .collect()
    }

    /// Resonant category of `x` in module `id`, without learning.
    pub fn classify<R: LearningRule>(
        &mut self,
        rule: &R,
        id: usize,
        x: &Pattern,
    ) -> Result<Option<usize>> {
        Ok(search::classify(self.module_mut(id)?, rule, x))
    }

    /// Changes recorded by each module this epoch.
    pub fn change_counts(&self) -> Vec<u64> {
        self.modules
            .iter()
            .map(|m| m.store().change_total())
            .collect()
    }

    pub(crate) fn reset_epoch(&mut self) {
        self.modules.iter_mut().for_each(Module::reset_epoch);
    }

    pub(crate) fn compact(&mut self) {
        self.modules.iter_mut().for_each(Module::compact);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::Rule;

    fn params(rho: f64) -> ModuleParams {
        ModuleParams::new(rho, 1.0, 8)
    }

    #[test]
    fn test_cascade_values() {
        let rhos = cascade(0.5, 3).unwrap();
        assert_eq!(rhos, vec![0.5, 0.75, 0.875]);
    }

    #[test]
    fn test_cascade_drops_zero_base() {
        let rhos = cascade(0.0, 3).unwrap();
        assert_eq!(rhos, vec![0.5, 0.75]);
        assert_eq!(cascade(0.0, 1), Err(ArtError::EmptyChain));
    }

    #[test]
    fn test_chain_reindexes_survivors() {
        let chain = ModuleChain::new(3, 0.0, 4, params).unwrap();
        assert_eq!(chain.len(), 2);
        let ids: Vec<_> = chain.modules().iter().map(Module::id).collect();
        assert_eq!(ids, vec![0, 1]);
        assert_eq!(chain.module(1).unwrap().vigilance(), 0.75);
        assert_eq!(
            chain.module(2).unwrap_err(),
            ArtError::UnknownModule { id: 2, count: 2 }
        );
    }

    #[test]
    fn test_learn_climbs_the_chain() {
        let rule = Rule::fuzzy();
        let mut chain = ModuleChain::new(3, 0.5, 4, params).unwrap();
        let x = rule.process(&Pattern::from_f64(&[0.4, 0.6]));
        let winners = chain.learn(&rule, 0, &x);
        assert_eq!(winners, vec![0, 0, 0]);
        for module in chain.modules() {
            assert_eq!(module.num_categories(), 1);
            assert_eq!(module.weight(0), x.data());
        }
    }

    #[test]
    fn test_higher_modules_are_finer() {
        let rule = Rule::fuzzy();
        let mut chain = ModuleChain::new(2, 0.5, 4, params).unwrap();
        for v in [0.1, 0.25, 0.4, 0.55, 0.7, 0.85] {
            chain.learn(&rule, 0, &rule.process(&Pattern::from_f64(&[v, v])));
        }
        let coarse = chain.modules()[0].num_categories();
        let fine = chain.modules()[1].num_categories();
        assert!(fine >= coarse, "module 1 has {fine} categories, module 0 has {coarse}");
    }

    #[test]
    fn test_classify_unknown_module() {
        let rule = Rule::fuzzy();
        let mut chain = ModuleChain::new(1, 0.5, 4, params).unwrap();
        let x = rule.process(&Pattern::from_f64(&[0.4, 0.6]));
        assert!(chain.classify(&rule, 1, &x).is_err());
        assert_eq!(chain.classify(&rule, 0, &x).unwrap(), None);
    }
}
