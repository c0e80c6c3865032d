//! Error types for resonant.

use thiserror::Error;

/// Resonant error types.
///
/// Every variant is a configuration or input problem detected at
/// construction or at `train`/`predict` entry. Broken internal invariants
/// (compacting past the allocation, mismatched weight widths) panic instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ArtError {
    /// A parameter that must lie in [0, 1] does not
    #[error("{parameter} must be between 0 and 1.0, got {value}")]
    OutOfRange { parameter: &'static str, value: f64 },

    /// A size or count parameter is below its minimum
    #[error("{parameter} must be at least {min}, got {value}")]
    TooSmall {
        parameter: &'static str,
        min: f64,
        value: f64,
    },

    /// Every module of the chain was dropped by the vigilance cascade
    #[error("no module can be created: the derived vigilance is 0 or negative")]
    EmptyChain,

    /// Invalid pattern dimensions
    #[error("Dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// ARTMAP training without the targets its mode requires
    #[error("the {mode} ARTMAP requires {expected} targets")]
    MissingTargets {
        mode: &'static str,
        expected: &'static str,
    },

    /// Different number of samples and targets
    #[error("{samples} samples but {targets} targets")]
    LengthMismatch { samples: usize, targets: usize },

    /// Prediction asked for a module outside the chain
    #[error("module {id} does not exist, the network has {count}")]
    UnknownModule { id: usize, count: usize },

    /// Empty input where non-empty was required
    #[error("Empty input: {0}")]
    EmptyInput(String),
}

/// Result type alias for resonant operations.
pub type Result<T> = std::result::Result<T, ArtError>;
