//! Supervised ARTMAP.
//!
//! Module a clusters the inputs; a map field checks every candidate winner
//! against the target before it may learn. A candidate that resonates with
//! the input but disagrees with the target triggers match tracking: the
//! effective vigilance is raised just above its match and the search goes on.
//!
//! - **Simplified**: each module-a category carries one class label.
//! - **Standard**: module b clusters the target vectors and an
//!   [`AssociationField`] links module-a rows to module-b columns.
//!
//! # Example
//!
//! ```rust
//! use resonant::{Artmap, ArtmapConfig, Pattern, Predicted, Rule, Targets};
//!
//! let data: Vec<Pattern> = [[0.1, 0.2], [0.15, 0.2], [0.8, 0.9]]
//!     .iter()
//!     .map(|row| Pattern::from_f64(row))
//!     .collect();
//! let labels = [0, 0, 1];
//!
//! let mut net = Artmap::new(ArtmapConfig::simplified(2), Rule::fuzzy()).unwrap();
//! net.train(&data, Targets::Labels(&labels)).unwrap();
//!
//! let out = net.predict(&data[2..], None).unwrap();
//! assert_eq!(out[0].predicted, Predicted::Label(Some(1)));
//! ```

pub mod mapfield;

pub use mapfield::{AssociationField, Label, LabelMap};

use crate::art::TrainSummary;
use crate::config::{ArtmapConfig, ArtmapMode};
use crate::engine::{next_vigilance, search, Module, ResonanceSearch, SearchState};
use crate::error::{ArtError, Result};
use crate::pattern::{check_batch, check_training, Pattern};
use crate::rule::{LearningRule, Rule};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Supervision signal for training or scoring.
#[derive(Clone, Copy, Debug)]
pub enum Targets<'a> {
    /// One class label per sample (simplified mode).
    Labels(&'a [Label]),
    /// One target vector per sample (standard mode).
    Vectors(&'a [Pattern]),
}

impl Targets<'_> {
    pub fn len(&self) -> usize {
        match self {
            Targets::Labels(labels) => labels.len(),
            Targets::Vectors(vectors) => vectors.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// What module a's categories are associated with.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum MapField {
    Simplified(LabelMap),
    Standard {
        module_b: Module,
        field: AssociationField,
        target_dimension: usize,
    },
}

impl MapField {
    fn missing_targets(&self) -> ArtError {
        match self {
            MapField::Simplified(_) => ArtError::MissingTargets {
                mode: "simplified",
                expected: "label",
            },
            MapField::Standard { .. } => ArtError::MissingTargets {
                mode: "standard",
                expected: "vector",
            },
        }
    }
}

/// The network's answer for one input.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Predicted {
    /// Label of the winning category, if any category resonated.
    Label(Option<Label>),
    /// Recalled target vector; every feature is missing without a winner.
    Vector(Pattern),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ArtmapPrediction {
    pub predicted: Predicted,
    /// Winning module-a category.
    pub category: Option<usize>,
    /// Whether the prediction agrees with the supplied target.
    pub matched: Option<bool>,
}

/// Borrowed training state of one mode.
enum Supervision<'a> {
    Labels {
        map: &'a mut LabelMap,
        labels: &'a [Label],
    },
    Vectors {
        module_b: &'a mut Module,
        field: &'a mut AssociationField,
        targets: Vec<Pattern>,
    },
}

impl Supervision<'_> {
    fn change_total(&self) -> u64 {
        match self {
            Supervision::Labels { .. } => 0,
            Supervision::Vectors {
                module_b, field, ..
            } => module_b.store().change_total() + field.change_total(),
        }
    }

    fn reset_epoch(&mut self) {
        if let Supervision::Vectors {
            module_b, field, ..
        } = self
        {
            module_b.reset_epoch();
            field.reset_changes();
        }
    }
}

/// A supervised ARTMAP network.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Artmap<R = Rule> {
    config: ArtmapConfig,
    rule: R,
    module_a: Module,
    map_field: MapField,
    epochs: usize,
}

impl<R: LearningRule> Artmap<R> {
    pub fn new(config: ArtmapConfig, rule: R) -> Result<Self> {
        config.validate()?;
        rule.validate()?;
        let module_a = Module::new(
            0,
            config.module_params(config.vigilance),
            rule.weight_dimension(config.dimension),
        );
        let map_field = match config.mode {
            ArtmapMode::Simplified => MapField::Simplified(LabelMap::new()),
            ArtmapMode::Standard { target_dimension } => MapField::Standard {
                module_b: Module::new(
                    1,
                    config.module_params(next_vigilance(config.vigilance)),
                    rule.weight_dimension(target_dimension),
                ),
                field: AssociationField::new(config.vigilance, config.learning_rate),
                target_dimension,
            },
        };
        Ok(Self {
            config,
            rule,
            module_a,
            map_field,
            epochs: 0,
        })
    }

    pub fn config(&self) -> &ArtmapConfig {
        &self.config
    }

    pub fn rule(&self) -> &R {
        &self.rule
    }

    pub fn module_a(&self) -> &Module {
        &self.module_a
    }

    /// Module b of the standard mode.
    pub fn module_b(&self) -> Option<&Module> {
        match &self.map_field {
            MapField::Standard { module_b, .. } => Some(module_b),
            MapField::Simplified(_) => None,
        }
    }

    pub fn map_field(&self) -> &MapField {
        &self.map_field
    }

    /// Labels of the simplified mode, one per module-a category.
    pub fn labels(&self) -> Option<&[Label]> {
        match &self.map_field {
            MapField::Simplified(map) => Some(map.labels()),
            MapField::Standard { .. } => None,
        }
    }

    pub fn epochs(&self) -> usize {
        self.epochs
    }

    /// Learn `data` against `targets` until an epoch changes nothing.
    pub fn train(&mut self, data: &[Pattern], targets: Targets<'_>) -> Result<TrainSummary> {
        check_training(data, self.config.dimension, "training data")?;
        check_length(data.len(), targets.len())?;

        let rule = &mut self.rule;
        let mut supervision = match (&mut self.map_field, targets) {
            (MapField::Simplified(map), Targets::Labels(labels)) => {
                Supervision::Labels { map, labels }
            }
            (
                MapField::Standard {
                    module_b,
                    field,
                    target_dimension,
                },
                Targets::Vectors(vectors),
            ) => {
                check_batch(vectors, *target_dimension)?;
                Supervision::Vectors {
                    module_b,
                    field,
                    targets: vectors.iter().map(|y| rule.process(y)).collect(),
                }
            }
            (map_field, _) => return Err(map_field.missing_targets()),
        };
        rule.fit(data);
        let inputs: Vec<Pattern> = data.iter().map(|x| rule.process(x)).collect();
        let rule = &*rule;

        let max_epochs = self.config.max_epochs;
        let mut converged = false;
        self.epochs = max_epochs;
        for epoch in 1..=max_epochs {
            for (i, x) in inputs.iter().enumerate() {
                match &mut supervision {
                    Supervision::Labels { map, labels } => {
                        learn_labelled(&mut self.module_a, map, rule, x, labels[i]);
                    }
                    Supervision::Vectors {
                        module_b,
                        field,
                        targets,
                    } => {
                        learn_associated(&mut self.module_a, module_b, field, rule, x, &targets[i]);
                    }
                }
            }

            let changes_a = self.module_a.store().change_total();
            let changes_map = supervision.change_total();
            debug!(epoch, changes_a, changes_map, "ARTMAP epoch finished");
            if changes_a + changes_map == 0 {
                converged = true;
                self.epochs = epoch;
                break;
            }
            if epoch < max_epochs {
                self.module_a.reset_epoch();
                supervision.reset_epoch();
            }
        }

        self.module_a.compact();
        if let Supervision::Vectors { module_b, .. } = supervision {
            module_b.compact();
        }

        let mut categories = vec![self.module_a.num_categories()];
        categories.extend(self.module_b().map(Module::num_categories));
        info!(
            epochs = self.epochs,
            converged,
            ?categories,
            mode = self.config.mode.name(),
            "ARTMAP training finished"
        );
        Ok(TrainSummary {
            epochs: self.epochs,
            converged,
            categories,
        })
    }

    /// Predict a label or target vector for every row.
    ///
    /// With `targets`, each prediction is also scored against its target.
    pub fn predict(
        &mut self,
        data: &[Pattern],
        targets: Option<Targets<'_>>,
    ) -> Result<Vec<ArtmapPrediction>> {
        check_batch(data, self.config.dimension)?;
        if let Some(targets) = &targets {
            check_length(data.len(), targets.len())?;
        }

        let rule = &self.rule;
        let module_a = &mut self.module_a;
        match (&mut self.map_field, targets) {
            (MapField::Simplified(map), None) => Ok(data
                .iter()
                .map(|x| predict_label(module_a, map, rule, x, None))
                .collect()),
            (MapField::Simplified(map), Some(Targets::Labels(labels))) => Ok(data
                .iter()
                .zip(labels)
                .map(|(x, &label)| predict_label(module_a, map, rule, x, Some(label)))
                .collect()),
            (
                MapField::Standard {
                    module_b,
                    field,
                    target_dimension,
                },
                targets,
            ) => {
                let vectors = match targets {
                    None => None,
                    Some(Targets::Vectors(vectors)) => {
                        check_batch(vectors, *target_dimension)?;
                        Some(vectors)
                    }
                    Some(Targets::Labels(_)) => {
                        return Err(ArtError::MissingTargets {
                            mode: "standard",
                            expected: "vector",
                        })
                    }
                };
                Ok(data
                    .iter()
                    .enumerate()
                    .map(|(i, x)| {
                        let y = vectors.map(|v| &v[i]);
                        predict_vector(module_a, module_b, field, *target_dimension, rule, x, y)
                    })
                    .collect())
            }
            (map_field, Some(_)) => Err(map_field.missing_targets()),
        }
    }
}

fn check_length(samples: usize, targets: usize) -> Result<()> {
    if samples != targets {
        return Err(ArtError::LengthMismatch { samples, targets });
    }
    Ok(())
}

// =============================================================================
// Match tracking
// =============================================================================

/// Simplified ARTMAP learning step for coded `x` with class `label`.
fn learn_labelled<R: LearningRule>(
    module_a: &mut Module,
    map: &mut LabelMap,
    rule: &R,
    x: &Pattern,
    label: Label,
) -> usize {
    let epsilon = module_a.params().epsilon;
    let mut search = ResonanceSearch::new(module_a.rank(rule, x), module_a.vigilance());
    while let Some(k) = search.candidate() {
        let m = module_a.match_score(rule, k, x);
        if !search.passes(m) {
            search.advance();
        } else if map.label(k) == Some(label) {
            module_a.resonate(rule, k, x, module_a.learning_rate());
            search.resonate();
        } else {
            search.track(m, epsilon);
        }
    }
    if let SearchState::Resonant(k) = search.state() {
        return k;
    }
    let k = module_a.new_category(rule, x);
    map.bind(k, label);
    k
}

/// Standard ARTMAP learning step for coded input `x` and coded target `y`.
fn learn_associated<R: LearningRule>(
    module_a: &mut Module,
    module_b: &mut Module,
    field: &mut AssociationField,
    rule: &R,
    x: &Pattern,
    y: &Pattern,
) -> usize {
    let jb = search::learn(module_b, rule, y);
    while field.b_size() < module_b.num_categories() {
        field.add_column();
    }

    let epsilon = module_a.params().epsilon;
    let mut search = ResonanceSearch::new(module_a.rank(rule, x), module_a.vigilance());
    while let Some(k) = search.candidate() {
        let m = module_a.match_score(rule, k, x);
        if !search.passes(m) {
            search.advance();
        } else if field.passes(k, jb) {
            module_a.resonate(rule, k, x, module_a.learning_rate());
            field.update(k, jb);
            search.resonate();
        } else {
            search.track(m, epsilon);
        }
    }
    if let SearchState::Resonant(k) = search.state() {
        return k;
    }
    let k = module_a.new_category(rule, x);
    field.add_row();
    field.update(k, jb);
    k
}

fn predict_label<R: LearningRule>(
    module_a: &mut Module,
    map: &LabelMap,
    rule: &R,
    x: &Pattern,
    target: Option<Label>,
) -> ArtmapPrediction {
    let category = search::classify(module_a, rule, &rule.process(x));
    let label = category.and_then(|k| map.label(k));
    ArtmapPrediction {
        predicted: Predicted::Label(label),
        category,
        matched: target.map(|t| label == Some(t)),
    }
}

fn predict_vector<R: LearningRule>(
    module_a: &mut Module,
    module_b: &mut Module,
    field: &AssociationField,
    target_dimension: usize,
    rule: &R,
    x: &Pattern,
    target: Option<&Pattern>,
) -> ArtmapPrediction {
    let category = search::classify(module_a, rule, &rule.process(x));
    let recalled = category
        .and_then(|k| field.active_column(k))
        .map(|jb| rule.unprocess(&rule.prototype(module_b.weight(jb))))
        .unwrap_or_else(|| Pattern::missing(target_dimension));
    let matched = target.map(|y| {
        let jb = search::classify(module_b, rule, &rule.process(y));
        match (category, jb) {
            (Some(k), Some(jb)) => field.passes(k, jb),
            _ => false,
        }
    });
    ArtmapPrediction {
        predicted: Predicted::Vector(recalled),
        category,
        matched,
    }
}
