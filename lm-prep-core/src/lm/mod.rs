//! Language-model build step.
//!
//! The estimation and the binary conversion are done by external tools
//! (`lmplz` and `build_binary`); this module builds and validates their
//! command lines and runs them in sequence.

/// `lmplz` invocation, memory budget and pruning thresholds.
pub mod estimator;

/// `build_binary` invocation and its data-structure options.
pub mod converter;

/// Runs the estimator then the converter.
pub mod orchestrator;

pub use converter::{BinaryBuildOptions, BinaryStructure, BuildBinaryCommand};
pub use estimator::{LmplzCommand, MemoryBudget, PruneThresholds};
pub use orchestrator::{build_language_model, LmArtifacts, LmBuildRequest};
