//! # Resonant: Adaptive Resonance Theory Networks
//!
//! Resonant implements the ART family of incremental clustering and
//! classification networks. Each sample is matched against the existing
//! categories in order of activation; the first one that passes the
//! vigilance test learns it, otherwise a new category is created.
//!
//! ## Quick Start
//!
//! ```rust
//! use resonant::{Art, ArtConfig, Pattern, Rule};
//!
//! let data: Vec<Pattern> = vec![
//!     Pattern::from_f64(&[0.10, 0.20]),
//!     Pattern::from_f64(&[0.12, 0.21]),
//!     Pattern::from_f64(&[0.90, 0.80]),
//! ];
//!
//! let mut art = Art::new(ArtConfig::new(2).with_vigilance(0.8), Rule::fuzzy())?;
//! art.train(&data)?;
//!
//! let categories = art.predict(0, &data)?;
//! assert_eq!(categories[0], categories[1]);
//! # Ok::<(), resonant::ArtError>(())
//! ```
//!
//! ## Core Concepts
//!
//! - **Rule**: activation, match and update formulas ([`Fuzzy`], [`Hypersphere`], [`Art1`])
//! - **Module**: one resonance layer holding a growable category store
//! - **Vigilance**: the minimum match a category needs to resonate
//! - **Art**: unsupervised clustering over a chain of modules
//! - **Artmap**: supervised learning with match tracking
//! - **TopoArt**: noise pruning and topology clusters from best/second-best links
//!
//! Missing input features are `None` in a [`Pattern`] and are skipped by
//! every sum; "no resonant category" is an `Option<usize>::None`.

pub mod art;
pub mod artmap;
pub mod config;
pub mod engine;
pub mod error;
pub mod pattern;
pub mod rule;
pub mod topo;

// Re-exports for convenience
pub use art::{Art, TrainSummary};
pub use artmap::{
    Artmap, ArtmapPrediction, AssociationField, Label, LabelMap, MapField, Predicted, Targets,
};
pub use config::{ArtConfig, ArtmapConfig, ArtmapMode, ModuleParams, TopoConfig};
pub use engine::{CategoryStore, Module, ModuleChain, ResonanceSearch, SearchState};
pub use error::{ArtError, Result};
pub use pattern::{Feature, Pattern};
pub use rule::{Art1, Fuzzy, Hypersphere, LearningRule, Rule};
pub use topo::{link_clusters, EdgeList, TopoArt, TopoLayer, TopoPrediction};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fuzzy_reference_values() {
        let params = ModuleParams {
            alpha: 2.0,
            ..ModuleParams::new(0.5, 1.0, 10)
        };
        let x = Pattern::from_f64(&[1.0, 2.0, 3.0]);
        let w = Pattern::from_f64(&[3.0, 2.0, 1.0]);
        assert_eq!(Rule::fuzzy().activation(&params, x.data(), w.data()), 0.5);

        let x = Pattern::from_f64(&[1.0, 2.0, f64::NAN]);
        assert_eq!(Rule::fuzzy().activation(&params, x.data(), w.data()), 0.375);
    }

    #[test]
    fn test_new_category_counts() {
        let rule = Rule::fuzzy();
        let mut chain = ModuleChain::new(1, 0.99, 4, |rho| ModuleParams::new(rho, 1.0, 2)).unwrap();
        for (i, v) in [0.1, 0.5, 0.9].iter().enumerate() {
            let before = chain.modules()[0].num_categories();
            chain.learn(&rule, 0, &rule.process(&Pattern::from_f64(&[*v, *v])));
            let module = &chain.modules()[0];
            assert_eq!(module.num_categories(), before + 1, "sample {i}");
            assert_eq!(module.store().counters()[before], 1);
        }
    }

    #[test]
    fn test_every_rule_trains() {
        let data: Vec<Pattern> = [[0.0, 1.0, 0.0], [0.0, 1.0, 1.0], [1.0, 0.0, 0.0]]
            .iter()
            .map(|row| Pattern::from_f64(row))
            .collect();
        for rule in [Rule::fuzzy(), Rule::hypersphere(), Rule::art1(2.0)] {
            let name = rule.name();
            let mut art = Art::new(ArtConfig::new(3).with_vigilance(0.6), rule).unwrap();
            let summary = art.train(&data).unwrap();
            assert!(summary.categories[0] >= 1, "{name} learned nothing");
            for k in art.predict(0, &data).unwrap().into_iter().flatten() {
                assert!(k < summary.categories[0], "{name} returned category {k}");
            }
        }
    }
}
