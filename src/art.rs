//! Unsupervised ART network.
//!
//! A chain of one or more modules learns every sample in order; training
//! repeats full passes over the data until a pass changes nothing or the
//! epoch limit is reached.
//!
//! # Example
//!
//! ```rust
//! use resonant::{Art, ArtConfig, Pattern, Rule};
//!
//! let data: Vec<Pattern> = [[0.1, 0.1], [0.12, 0.08], [0.9, 0.85]]
//!     .iter()
//!     .map(|row| Pattern::from_f64(row))
//!     .collect();
//!
//! let mut art = Art::new(ArtConfig::new(2).with_vigilance(0.8), Rule::fuzzy()).unwrap();
//! let summary = art.train(&data).unwrap();
//! assert!(summary.converged);
//!
//! let categories = art.predict(0, &data).unwrap();
//! assert_eq!(categories[0], categories[1]);
//! assert_ne!(categories[0], categories[2]);
//! ```

use crate::config::ArtConfig;
use crate::engine::{Module, ModuleChain};
use crate::error::Result;
use crate::pattern::{check_batch, check_training, Pattern};
use crate::rule::{LearningRule, Rule};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Outcome of one `train` call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainSummary {
    /// Epochs run: the converging epoch, or the epoch limit.
    pub epochs: usize,
    /// Whether an epoch finished without any change.
    pub converged: bool,
    /// Committed categories per module after training.
    pub categories: Vec<usize>,
}

/// A plain (optionally hierarchical) ART network.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Art<R = Rule> {
    config: ArtConfig,
    rule: R,
    chain: ModuleChain,
    epochs: usize,
}

impl<R: LearningRule> Art<R> {
    /// Validate `config` and build the module chain.
    pub fn new(config: ArtConfig, rule: R) -> Result<Self> {
        config.validate()?;
        rule.validate()?;
        let width = rule.weight_dimension(config.dimension);
        let chain = ModuleChain::new(config.modules, config.vigilance, width, |rho| {
            config.module_params(rho)
        })?;
        Ok(Self {
            config,
            rule,
            chain,
            epochs: 0,
        })
    }

    pub fn config(&self) -> &ArtConfig {
        &self.config
    }

    pub fn rule(&self) -> &R {
        &self.rule
    }

    pub fn modules(&self) -> &[Module] {
        self.chain.modules()
    }

    pub fn module(&self, id: usize) -> Result<&Module> {
        self.chain.module(id)
    }

    /// Epochs run by the last `train` call.
    pub fn epochs(&self) -> usize {
        self.epochs
    }

    /// Learn `data` until an epoch changes nothing or `max_epochs` is hit.
    pub fn train(&mut self, data: &[Pattern]) -> Result<TrainSummary> {
        check_training(data, self.config.dimension, "training data")?;
        self.rule.fit(data);
        let coded: Vec<Pattern> = data.iter().map(|x| self.rule.process(x)).collect();

        let max_epochs = self.config.max_epochs;
        let mut converged = false;
        self.epochs = max_epochs;
        for epoch in 1..=max_epochs {
            for x in &coded {
                self.chain.learn(&self.rule, 0, x);
            }

            let changes = self.chain.change_counts();
            debug!(epoch, ?changes, "ART epoch finished");
            if changes.iter().all(|&c| c == 0) {
                converged = true;
                self.epochs = epoch;
                break;
            }
            if epoch < max_epochs {
                self.chain.reset_epoch();
            }
        }
        self.chain.compact();

        let categories: Vec<usize> = self.modules().iter().map(Module::num_categories).collect();
        if converged {
            info!(epochs = self.epochs, ?categories, "ART converged");
        } else {
            info!(epochs = self.epochs, ?categories, "ART reached max epochs");
        }
        Ok(TrainSummary {
            epochs: self.epochs,
            converged,
            categories,
        })
    }

    /// Resonant category of every row in module `module_id`.
    ///
    /// `None` where no category meets the module's vigilance.
    pub fn predict(&mut self, module_id: usize, data: &[Pattern]) -> Result<Vec<Option<usize>>> {
        self.chain.module(module_id)?;
        check_batch(data, self.config.dimension)?;
        data.iter()
            .map(|x| {
                let x = self.rule.process(x);
                self.chain.classify(&self.rule, module_id, &x)
            })
            .collect()
    }
}
