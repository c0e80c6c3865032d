//! TopoART: topology-preserving ART.
//!
//! Every sample may resonate with two categories of a module: the best
//! match (bm), learned at rate β₁, and the second-best match (sbm), learned
//! at β₂. The two are linked by an undirected edge. Categories that have
//! won fewer than φ samples are noise; every τ samples they are pruned
//! together with their edges. A bm that has seen at least φ samples passes
//! the input on to the next module, which runs at a higher vigilance.
//!
//! After training, the connected components of each module's edge list
//! form its clusters.
//!
//! # Example
//!
//! ```rust
//! use resonant::{Pattern, Rule, TopoArt, TopoConfig};
//!
//! let data: Vec<Pattern> = (0..40)
//!     .map(|i| {
//!         let t = (i % 10) as f64 * 0.01;
//!         if i % 2 == 0 {
//!             Pattern::from_f64(&[0.1 + t, 0.1 + t])
//!         } else {
//!             Pattern::from_f64(&[0.8 + t, 0.8 - t])
//!         }
//!     })
//!     .collect();
//!
//! let config = TopoConfig::new(2).with_vigilance(0.8).with_phi(2).with_tau(20);
//! let mut topo = TopoArt::new(config, Rule::fuzzy()).unwrap();
//! topo.train(&data).unwrap();
//!
//! let out = topo.predict(0, &data[..2]).unwrap();
//! assert_ne!(out[0].cluster, out[1].cluster);
//! ```

pub mod cluster;
pub mod edges;

pub use cluster::link_clusters;
pub use edges::EdgeList;

use crate::art::TrainSummary;
use crate::config::TopoConfig;
use crate::engine::{cascade, search, Module, ResonanceSearch};
use crate::error::{ArtError, Result};
use crate::pattern::{check_batch, check_training, Pattern};
use crate::rule::{LearningRule, Rule};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// One TopoART module with its topology state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TopoLayer {
    module: Module,
    /// Wins per category, used only for pruning.
    accumulators: Vec<u32>,
    edges: EdgeList,
    clusters: Vec<Vec<usize>>,
}

impl TopoLayer {
    fn new(module: Module) -> Self {
        Self {
            module,
            accumulators: Vec::new(),
            edges: EdgeList::new(),
            clusters: Vec::new(),
        }
    }

    pub fn module(&self) -> &Module {
        &self.module
    }

    pub fn accumulators(&self) -> &[u32] {
        &self.accumulators
    }

    pub fn edges(&self) -> &EdgeList {
        &self.edges
    }

    /// Linked clusters, members ascending, ordered by smallest member.
    pub fn clusters(&self) -> &[Vec<usize>] {
        &self.clusters
    }

    /// Index of the cluster holding `category`.
    pub fn cluster_of(&self, category: usize) -> Option<usize> {
        self.clusters
            .iter()
            .position(|members| members.binary_search(&category).is_ok())
    }

    fn new_category<R: LearningRule>(&mut self, rule: &R, x: &Pattern) -> usize {
        let k = self.module.new_category(rule, x);
        self.accumulators.push(1);
        k
    }

    /// Remove every category won fewer than `phi` times. Returns how many went.
    fn prune(&mut self, phi: u32) -> usize {
        let keep: Vec<bool> = self.accumulators.iter().map(|&a| a >= phi).collect();
        let remap = self.module.store_mut().retain(&keep);
        self.module.remap_winners(&remap);
        self.edges.remap(&remap);
        self.accumulators.retain(|&a| a >= phi);
        keep.iter().filter(|&&k| !k).count()
    }

    fn link(&mut self) {
        self.clusters = link_clusters(self.edges.as_slice(), self.module.num_categories());
    }
}

/// Answer of one module for one input.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopoPrediction {
    pub category: Option<usize>,
    pub cluster: Option<usize>,
}

/// A TopoART network.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TopoArt<R = Rule> {
    config: TopoConfig,
    rule: R,
    layers: Vec<TopoLayer>,
    epochs: usize,
}

impl<R: LearningRule> TopoArt<R> {
    pub fn new(config: TopoConfig, rule: R) -> Result<Self> {
        config.validate()?;
        rule.validate()?;
        let width = rule.weight_dimension(config.dimension);
        let layers = cascade(config.vigilance, config.modules)?
            .into_iter()
            .enumerate()
            .map(|(id, rho)| TopoLayer::new(Module::new(id, config.module_params(rho), width)))
            .collect();
        Ok(Self {
            config,
            rule,
            layers,
            epochs: 0,
        })
    }

    pub fn config(&self) -> &TopoConfig {
        &self.config
    }

    pub fn rule(&self) -> &R {
        &self.rule
    }

    pub fn layers(&self) -> &[TopoLayer] {
        &self.layers
    }

    pub fn layer(&self, id: usize) -> Result<&TopoLayer> {
        self.layers.get(id).ok_or(ArtError::UnknownModule {
            id,
            count: self.layers.len(),
        })
    }

    pub fn epochs(&self) -> usize {
        self.epochs
    }

    /// Learn `data`, pruning every τ samples, then link clusters.
    pub fn train(&mut self, data: &[Pattern]) -> Result<TrainSummary> {
        check_training(data, self.config.dimension, "training data")?;
        self.rule.fit(data);
        let coded: Vec<Pattern> = data.iter().map(|x| self.rule.process(x)).collect();

        let max_epochs = self.config.max_epochs;
        let tau = self.config.tau;
        let mut since_prune = 0;
        let mut converged = false;
        self.epochs = max_epochs;
        for epoch in 1..=max_epochs {
            for x in &coded {
                self.learn(0, x);
                since_prune += 1;
                if tau > 0 && since_prune == tau {
                    self.prune();
                    since_prune = 0;
                }
            }

            let changes: Vec<u64> = self
                .layers
                .iter()
                .map(|l| l.module.store().change_total())
                .collect();
            debug!(epoch, ?changes, "TopoART epoch finished");
            if changes.iter().all(|&c| c == 0) {
                converged = true;
                self.epochs = epoch;
                break;
            }
            if epoch < max_epochs {
                self.layers.iter_mut().for_each(|l| l.module.reset_epoch());
            }
        }

        self.prune();
        for layer in self.layers.iter_mut() {
            layer.module.compact();
            layer.link();
        }

        let categories: Vec<usize> = self
            .layers
            .iter()
            .map(|l| l.module.num_categories())
            .collect();
        let clusters: Vec<usize> = self.layers.iter().map(|l| l.clusters.len()).collect();
        info!(
            epochs = self.epochs,
            converged,
            ?categories,
            ?clusters,
            "TopoART training finished"
        );
        Ok(TrainSummary {
            epochs: self.epochs,
            converged,
            categories,
        })
    }

    /// Category and cluster of every row in module `module_id`.
    pub fn predict(&mut self, module_id: usize, data: &[Pattern]) -> Result<Vec<TopoPrediction>> {
        self.layer(module_id)?;
        check_batch(data, self.config.dimension)?;
        let rule = &self.rule;
        let layer = &mut self.layers[module_id];
        Ok(data
            .iter()
            .map(|x| {
                let category = search::classify(&mut layer.module, rule, &rule.process(x));
                TopoPrediction {
                    category,
                    cluster: category.and_then(|k| layer.cluster_of(k)),
                }
            })
            .collect())
    }

    /// One sample through module `id`: bm, optional cascade, then sbm.
    fn learn(&mut self, id: usize, x: &Pattern) {
        let phi = self.config.phi;
        let beta_sbm = self.config.learning_rate_sbm;
        let layer = &mut self.layers[id];
        layer.module.set_runner_up(None);
        let ranking = layer.module.rank(&self.rule, x);
        let mut search = ResonanceSearch::new(ranking, layer.module.vigilance());
        let mut bm = None;

        while let Some(k) = search.candidate() {
            let layer = &mut self.layers[id];
            if !search.passes(layer.module.match_score(&self.rule, k, x)) {
                search.advance();
                continue;
            }
            match bm {
                None => {
                    let rate = layer.module.learning_rate();
                    layer.module.resonate(&self.rule, k, x, rate);
                    layer.accumulators[k] += 1;
                    bm = Some(k);
                    let climb = layer.accumulators[k] >= phi && id + 1 < self.layers.len();
                    if climb {
                        self.learn(id + 1, x);
                    }
                    search.advance();
                }
                Some(best) => {
                    layer.module.learn(&self.rule, k, x, beta_sbm);
                    layer.module.store_mut().record_use(k);
                    layer.module.set_runner_up(Some(k));
                    layer.accumulators[k] += 1;
                    layer.edges.link(best, k);
                    search.resonate();
                }
            }
        }

        if bm.is_none() {
            self.layers[id].new_category(&self.rule, x);
        }
    }

    fn prune(&mut self) {
        let phi = self.config.phi;
        for (id, layer) in self.layers.iter_mut().enumerate() {
            let removed = layer.prune(phi);
            debug!(
                module = id,
                removed,
                remaining = layer.module.num_categories(),
                "TopoART pruning pass"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ModuleParams;
    use crate::pattern::Feature;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    /// Two elongated strips plus sparse uniform noise.
    fn strips_with_noise(samples: usize, seed: u64) -> Vec<Pattern> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        (0..samples)
            .map(|i| {
                if i % 10 == 9 {
                    return Pattern::from_f64(&[rng.gen::<f64>(), rng.gen::<f64>()]);
                }
                let t: f64 = rng.gen_range(0.0..0.3);
                let jitter: f64 = rng.gen_range(-0.01..0.01);
                if i % 2 == 0 {
                    Pattern::from_f64(&[0.1 + t, 0.15 + jitter])
                } else {
                    Pattern::from_f64(&[0.85 + jitter, 0.6 + t])
                }
            })
            .collect()
    }

    fn assert_topology_consistent(topo: &TopoArt) {
        for layer in topo.layers() {
            let n = layer.module().num_categories();
            assert_eq!(layer.accumulators().len(), n);
            for &(a, b) in layer.edges().iter() {
                assert!(a < n && b < n, "edge ({a}, {b}) with {n} categories");
                assert_ne!(a, b);
            }
            let mut members: Vec<usize> = layer.clusters().iter().flatten().copied().collect();
            members.sort_unstable();
            assert_eq!(members, (0..n).collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_defaults() {
        let topo = TopoArt::new(TopoConfig::new(2), Rule::fuzzy()).unwrap();
        assert_eq!(topo.layers().len(), 2);
        assert_eq!(topo.layers()[0].module().vigilance(), 0.9);
        assert!((topo.layers()[1].module().vigilance() - 0.95).abs() < 1e-12);
        assert_eq!(topo.layers()[0].module().store().rows(), 200);
    }

    #[test]
    fn test_sbm_linked_once() {
        // two overlapping categories, every later sample hits both
        let config = TopoConfig::new(1)
            .with_vigilance(0.5)
            .with_tau(0)
            .with_phi(1)
            .with_modules(1)
            .with_learning_rates(0.0, 0.0);
        let mut topo = TopoArt::new(config, Rule::fuzzy()).unwrap();
        let data = vec![
            Pattern::from_f64(&[0.0]),
            Pattern::from_f64(&[1.0]),
            Pattern::from_f64(&[0.5]),
            Pattern::from_f64(&[0.5]),
        ];
        topo.train(&data).unwrap();
        let layer = &topo.layers()[0];
        assert_eq!(layer.module().num_categories(), 2);
        assert_eq!(layer.edges().as_slice(), &[(0, 1)]);
        assert_eq!(layer.clusters(), &[vec![0, 1]]);
    }

    fn coded(topo: &TopoArt, v: f64) -> Pattern {
        topo.rule().process(&Pattern::from_f64(&[v]))
    }

    fn assert_row(actual: &[Feature], expected: &[f64]) {
        assert_eq!(actual.len(), expected.len());
        for (a, e) in actual.iter().zip(expected) {
            let a = a.expect("weight feature missing");
            assert!((a - e).abs() < 1e-12, "{actual:?} != {expected:?}");
        }
    }

    fn two_rate_topo() -> TopoArt {
        let config = TopoConfig::new(1)
            .with_vigilance(0.5)
            .with_learning_rates(1.0, 0.5)
            .with_phi(3)
            .with_tau(0);
        TopoArt::new(config, Rule::fuzzy()).unwrap()
    }

    #[test]
    fn test_sbm_learns_at_second_rate() {
        let mut topo = two_rate_topo();
        for v in [0.2, 0.8, 0.5] {
            let x = coded(&topo, v);
            topo.learn(0, &x);
        }
        let layer = &topo.layers()[0];
        let module = layer.module();
        assert_eq!(module.num_categories(), 2);
        // bm at β₁ = 1: min([0.5, 0.5], [0.2, 0.8])
        assert_row(module.weight(0), &[0.2, 0.5]);
        // sbm at β₂ = 0.5: 0.5·min(x, w) + 0.5·w
        assert_row(module.weight(1), &[0.65, 0.2]);
        assert_eq!(module.winner(), Some(0));
        assert_eq!(module.runner_up(), Some(1));
        assert_eq!(layer.accumulators(), &[2, 2]);
        assert_eq!(layer.edges().as_slice(), &[(0, 1)]);
    }

    #[test]
    fn test_cascade_waits_for_phi() {
        let mut topo = two_rate_topo();
        for v in [0.2, 0.8, 0.5] {
            let x = coded(&topo, v);
            topo.learn(0, &x);
        }
        assert!(topo.layers()[1].module().is_empty());

        // fourth win of category 0 brings its accumulator to φ = 3
        let x = coded(&topo, 0.5);
        topo.learn(0, &x);
        assert_eq!(topo.layers()[0].accumulators(), &[3, 3]);
        assert_eq!(topo.layers()[0].edges().len(), 1);
        let upper = &topo.layers()[1];
        assert_eq!(upper.module().num_categories(), 1);
        assert_eq!(upper.accumulators(), &[1]);
        assert_row(upper.module().weight(0), &[0.5, 0.5]);
    }

    #[test]
    fn test_layer_prune_removes_below_phi() {
        let rule = Rule::fuzzy();
        let mut layer = TopoLayer::new(Module::new(0, ModuleParams::new(0.5, 1.0, 10), 2));
        for v in [0.1, 0.5, 0.9] {
            layer.new_category(&rule, &rule.process(&Pattern::from_f64(&[v])));
        }
        layer.accumulators = vec![5, 2, 7];
        layer.edges.link(0, 1);
        layer.edges.link(1, 2);
        layer.edges.link(0, 2);

        assert_eq!(layer.prune(3), 1);
        assert_eq!(layer.module().num_categories(), 2);
        assert_eq!(layer.accumulators(), &[5, 7]);
        assert_row(layer.module().weight(0), &[0.1, 0.9]);
        assert_row(layer.module().weight(1), &[0.9, 0.1]);
        assert_eq!(layer.edges().as_slice(), &[(0, 1)]);
        assert_eq!(layer.module().store().rows(), 10);

        assert_eq!(layer.prune(6), 1);
        assert_eq!(layer.accumulators(), &[7]);
        assert!(layer.edges().is_empty());
    }

    #[test]
    fn test_empty_prediction_batch() {
        let mut topo = two_rate_topo();
        topo.train(&[Pattern::from_f64(&[0.3])]).unwrap();
        assert!(topo.predict(0, &[]).unwrap().is_empty());
        assert!(matches!(topo.train(&[]), Err(ArtError::EmptyInput(_))));
    }

    #[test]
    fn test_noise_is_pruned() {
        let data = strips_with_noise(400, 17);
        let config = TopoConfig::new(2).with_vigilance(0.85).with_phi(5).with_tau(100);
        let mut topo = TopoArt::new(config, Rule::fuzzy()).unwrap();
        topo.train(&data).unwrap();
        assert_topology_consistent(&topo);
        for layer in topo.layers() {
            for &a in layer.accumulators() {
                assert!(a >= 5, "category with accumulator {a} survived pruning");
            }
        }
        assert!(topo.layers()[0].module().num_categories() > 0);
    }

    #[test]
    fn test_strips_form_separate_clusters() {
        let data = strips_with_noise(600, 3);
        let config = TopoConfig::new(2)
            .with_modules(1)
            .with_vigilance(0.9)
            .with_phi(3)
            .with_tau(200);
        let mut topo = TopoArt::new(config, Rule::fuzzy()).unwrap();
        topo.train(&data).unwrap();
        assert_topology_consistent(&topo);

        let probes = [
            Pattern::from_f64(&[0.12, 0.15]),
            Pattern::from_f64(&[0.38, 0.15]),
            Pattern::from_f64(&[0.85, 0.62]),
        ];
        let out = topo.predict(0, &probes).unwrap();
        for p in &out {
            assert!(p.category.is_some() && p.cluster.is_some(), "{p:?}");
        }
        assert_ne!(out[0].cluster, out[2].cluster);
        assert_ne!(out[1].cluster, out[2].cluster);
    }

    #[test]
    fn test_zero_tau_only_prunes_at_end() {
        let data = strips_with_noise(100, 5);
        let config = TopoConfig::new(2)
            .with_modules(1)
            .with_phi(u32::MAX)
            .with_tau(0)
            .with_max_epochs(1);
        let mut topo = TopoArt::new(config, Rule::fuzzy()).unwrap();
        let summary = topo.train(&data).unwrap();
        assert_eq!(summary.categories, vec![0]);
        assert!(topo.layers()[0].edges().is_empty());
        assert!(topo.layers()[0].clusters().is_empty());
        let out = topo.predict(0, &data[..1]).unwrap();
        assert_eq!(
            out[0],
            TopoPrediction {
                category: None,
                cluster: None
            }
        );
    }

    #[test]
    fn test_unknown_module() {
        let mut topo = TopoArt::new(TopoConfig::new(2), Rule::fuzzy()).unwrap();
        let err = topo.predict(2, &[Pattern::from_f64(&[0.1, 0.1])]).unwrap_err();
        assert_eq!(err, ArtError::UnknownModule { id: 2, count: 2 });
    }

    #[test]
    fn test_serde_round_trip() {
        let data = strips_with_noise(100, 9);
        let config = TopoConfig::new(2).with_phi(2).with_tau(50);
        let mut topo = TopoArt::new(config, Rule::fuzzy()).unwrap();
        topo.train(&data).unwrap();
        let json = serde_json::to_string(&topo).unwrap();
        let restored: TopoArt = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, topo);
    }
}
