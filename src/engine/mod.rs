//! The resonance engine shared by every network.
//!
//! - [`CategoryStore`]: growable prototype matrix with usage and change counters
//! - [`Module`]: one resonance layer
//! - [`ResonanceSearch`]: the vigilance-gated walk over a ranking
//! - [`ModuleChain`]: a hierarchy of modules with cascading vigilance

pub mod chain;
pub mod module;
pub mod search;
pub mod store;

pub use chain::{cascade, next_vigilance, ModuleChain};
pub use module::Module;
pub use search::{rank, ResonanceSearch, SearchState};
pub use store::{CategoryStore, CHANGE_THRESHOLD};
