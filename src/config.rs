//! Network configuration.
//!
//! Each network type has a plain config struct with defaults, chained
//! `with_*` setters and a `validate()` that every network runs at
//! construction. Invalid values are reported, never clamped.

use crate::error::{ArtError, Result};
use serde::{Deserialize, Serialize};

/// Default choice parameter α of the activation function.
pub const DEFAULT_ALPHA: f64 = 0.001;
/// Default match-tracking increment ε.
pub const DEFAULT_EPSILON: f64 = 0.000001;

/// Parameters of a single resonance layer.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ModuleParams {
    /// Vigilance ρ: minimum match for resonance.
    pub vigilance: f64,
    /// Learning rate β.
    pub learning_rate: f64,
    /// Choice parameter α.
    pub alpha: f64,
    /// Match-tracking increment ε.
    pub epsilon: f64,
    /// Number of category rows added whenever the store is full.
    pub capacity: usize,
}

impl ModuleParams {
    /// Parameters with the default α and ε.
    pub fn new(vigilance: f64, learning_rate: f64, capacity: usize) -> Self {
        Self {
            vigilance,
            learning_rate,
            alpha: DEFAULT_ALPHA,
            epsilon: DEFAULT_EPSILON,
            capacity,
        }
    }
}

// =============================================================================
// ART
// =============================================================================

/// Configuration of a plain (optionally hierarchical) ART network.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ArtConfig {
    /// Number of raw input features.
    pub dimension: usize,
    /// Number of modules in the hierarchy.
    pub modules: usize,
    /// Base vigilance of the first module.
    pub vigilance: f64,
    pub learning_rate: f64,
    /// Category growth chunk.
    pub capacity: usize,
    pub max_epochs: usize,
    pub alpha: f64,
    pub epsilon: f64,
}

impl ArtConfig {
    /// Standard configuration for `dimension` input features.
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            modules: 1,
            vigilance: 0.75,
            learning_rate: 1.0,
            capacity: 100,
            max_epochs: 20,
            alpha: DEFAULT_ALPHA,
            epsilon: DEFAULT_EPSILON,
        }
    }

    pub fn with_modules(mut self, modules: usize) -> Self {
        self.modules = modules;
        self
    }

    pub fn with_vigilance(mut self, vigilance: f64) -> Self {
        self.vigilance = vigilance;
        self
    }

    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn with_max_epochs(mut self, max_epochs: usize) -> Self {
        self.max_epochs = max_epochs;
        self
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<()> {
        check_unit("vigilance", self.vigilance)?;
        check_unit("learningRate", self.learning_rate)?;
        check_min("num", 1, self.modules)?;
        check_min("categorySize", 1, self.capacity)?;
        check_min("maxEpochs", 1, self.max_epochs)?;
        check_min("dimension", 1, self.dimension)?;
        check_positive("alpha", self.alpha)?;
        check_positive("epsilon", self.epsilon)
    }

    /// Module parameters for a given (cascaded) vigilance.
    pub(crate) fn module_params(&self, vigilance: f64) -> ModuleParams {
        ModuleParams {
            vigilance,
            learning_rate: self.learning_rate,
            alpha: self.alpha,
            epsilon: self.epsilon,
            capacity: self.capacity,
        }
    }
}

impl Default for ArtConfig {
    fn default() -> Self {
        Self::new(1)
    }
}

// =============================================================================
// ARTMAP
// =============================================================================

/// How the map field associates module-a categories with targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArtmapMode {
    /// One scalar label recorded per module-a category.
    Simplified,
    /// A module b learns the target vectors; a weight matrix links a to b.
    Standard {
        /// Number of raw features in each target vector.
        target_dimension: usize,
    },
}

impl ArtmapMode {
    pub fn name(&self) -> &'static str {
        match self {
            ArtmapMode::Simplified => "simplified",
            ArtmapMode::Standard { .. } => "standard",
        }
    }
}

/// Configuration of a supervised ARTMAP network.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ArtmapConfig {
    pub dimension: usize,
    pub mode: ArtmapMode,
    /// Vigilance of module a and of the map field.
    pub vigilance: f64,
    pub learning_rate: f64,
    pub capacity: usize,
    pub max_epochs: usize,
    pub alpha: f64,
    pub epsilon: f64,
}

impl ArtmapConfig {
    /// Simplified ARTMAP over `dimension` input features.
    pub fn simplified(dimension: usize) -> Self {
        Self::with_mode(dimension, ArtmapMode::Simplified)
    }

    /// Standard ARTMAP mapping `dimension` inputs to `target_dimension` targets.
    pub fn standard(dimension: usize, target_dimension: usize) -> Self {
        Self::with_mode(dimension, ArtmapMode::Standard { target_dimension })
    }

    fn with_mode(dimension: usize, mode: ArtmapMode) -> Self {
        Self {
            dimension,
            mode,
            vigilance: 0.75,
            learning_rate: 1.0,
            capacity: 100,
            max_epochs: 20,
            alpha: DEFAULT_ALPHA,
            epsilon: DEFAULT_EPSILON,
        }
    }

    pub fn with_vigilance(mut self, vigilance: f64) -> Self {
        self.vigilance = vigilance;
        self
    }

    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn with_max_epochs(mut self, max_epochs: usize) -> Self {
        self.max_epochs = max_epochs;
        self
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<()> {
        check_unit("vigilance", self.vigilance)?;
        check_unit("learningRate", self.learning_rate)?;
        check_min("categorySize", 1, self.capacity)?;
        check_min("maxEpochs", 1, self.max_epochs)?;
        check_min("dimension", 1, self.dimension)?;
        if let ArtmapMode::Standard { target_dimension } = self.mode {
            check_min("targetDimension", 1, target_dimension)?;
        }
        check_positive("alpha", self.alpha)?;
        check_positive("epsilon", self.epsilon)
    }

    pub(crate) fn module_params(&self, vigilance: f64) -> ModuleParams {
        ModuleParams {
            vigilance,
            learning_rate: self.learning_rate,
            alpha: self.alpha,
            epsilon: self.epsilon,
            capacity: self.capacity,
        }
    }
}

// =============================================================================
// TopoART
// =============================================================================

/// Configuration of a TopoART network.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TopoConfig {
    pub dimension: usize,
    pub modules: usize,
    pub vigilance: f64,
    /// Learning rate β₁ of the best-matching category.
    pub learning_rate: f64,
    /// Learning rate β₂ of the second-best-matching category.
    pub learning_rate_sbm: f64,
    /// Samples between pruning passes; 0 disables periodic pruning.
    pub tau: usize,
    /// Accumulator threshold φ below which a category is noise.
    pub phi: u32,
    pub capacity: usize,
    pub max_epochs: usize,
    pub alpha: f64,
    pub epsilon: f64,
}

impl TopoConfig {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            modules: 2,
            vigilance: 0.9,
            learning_rate: 1.0,
            learning_rate_sbm: 0.6,
            tau: 100,
            phi: 6,
            capacity: 200,
            max_epochs: 20,
            alpha: DEFAULT_ALPHA,
            epsilon: DEFAULT_EPSILON,
        }
    }

    pub fn with_modules(mut self, modules: usize) -> Self {
        self.modules = modules;
        self
    }

    pub fn with_vigilance(mut self, vigilance: f64) -> Self {
        self.vigilance = vigilance;
        self
    }

    /// Set β₁ and β₂.
    pub fn with_learning_rates(mut self, bm: f64, sbm: f64) -> Self {
        self.learning_rate = bm;
        self.learning_rate_sbm = sbm;
        self
    }

    pub fn with_tau(mut self, tau: usize) -> Self {
        self.tau = tau;
        self
    }

    pub fn with_phi(mut self, phi: u32) -> Self {
        self.phi = phi;
        self
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn with_max_epochs(mut self, max_epochs: usize) -> Self {
        self.max_epochs = max_epochs;
        self
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<()> {
        check_unit("vigilance", self.vigilance)?;
        check_unit("learningRate1", self.learning_rate)?;
        check_unit("learningRate2", self.learning_rate_sbm)?;
        check_min("num", 1, self.modules)?;
        check_min("categorySize", 1, self.capacity)?;
        check_min("maxEpochs", 1, self.max_epochs)?;
        check_min("dimension", 1, self.dimension)?;
        check_positive("alpha", self.alpha)?;
        check_positive("epsilon", self.epsilon)
    }

    pub(crate) fn module_params(&self, vigilance: f64) -> ModuleParams {
        ModuleParams {
            vigilance,
            learning_rate: self.learning_rate,
            alpha: self.alpha,
            epsilon: self.epsilon,
            capacity: self.capacity,
        }
    }
}

// =============================================================================
// Checks
// =============================================================================

fn check_unit(parameter: &'static str, value: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(ArtError::OutOfRange { parameter, value });
    }
    Ok(())
}

fn check_min(parameter: &'static str, min: usize, value: usize) -> Result<()> {
    if value < min {
        return Err(ArtError::TooSmall {
            parameter,
            min: min as f64,
            value: value as f64,
        });
    }
    Ok(())
}

fn check_positive(parameter: &'static str, value: f64) -> Result<()> {
    if !(value > 0.0) {
        return Err(ArtError::TooSmall {
            parameter,
            min: 0.0,
            value,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(ArtConfig::new(4).validate().is_ok());
        assert!(ArtmapConfig::simplified(4).validate().is_ok());
        assert!(ArtmapConfig::standard(4, 2).validate().is_ok());
        assert!(TopoConfig::new(4).validate().is_ok());
    }

    #[test]
    fn test_vigilance_out_of_range() {
        let err = ArtConfig::new(4).with_vigilance(1.2).validate().unwrap_err();
        assert_eq!(
            err,
            ArtError::OutOfRange {
                parameter: "vigilance",
                value: 1.2
            }
        );
        assert!(ArtConfig::new(4).with_vigilance(f64::NAN).validate().is_err());
    }

    #[test]
    fn test_zero_sizes_rejected() {
        assert!(ArtConfig::new(0).validate().is_err());
        assert!(ArtConfig::new(3).with_modules(0).validate().is_err());
        assert!(ArtConfig::new(3).with_capacity(0).validate().is_err());
        assert!(ArtConfig::new(3).with_max_epochs(0).validate().is_err());
        assert!(ArtmapConfig::standard(3, 0).validate().is_err());
    }

    #[test]
    fn test_topo_learning_rates_checked() {
        let cfg = TopoConfig::new(2).with_learning_rates(1.0, -0.1);
        assert!(matches!(
            cfg.validate(),
            Err(ArtError::OutOfRange {
                parameter: "learningRate2",
                ..
            })
        ));
    }

    #[test]
    fn test_error_message() {
        let err = ArtConfig::new(2).with_learning_rate(2.0).validate().unwrap_err();
        assert_eq!(err.to_string(), "learningRate must be between 0 and 1.0, got 2");
    }
}
