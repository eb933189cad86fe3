//! Corpus and vocabulary preparation for n-gram language models.
//!
//! This crate turns a raw encyclopedia dump into the two artifacts an
//! n-gram estimator needs:
//! - A normalized corpus, one sentence per line
//! - A frequency-ranked vocabulary restricted to an allowed character set
//!
//! and drives the external estimator and binary converter over them.
//! Dump extraction, sentence segmentation and the estimation itself are
//! external collaborators; this crate only owns the logic in between.

/// Error type shared by every stage of the pipeline.
pub mod error;

/// Pipeline configuration loaded from TOML and overridden from the CLI.
pub mod config;

/// Language profiles and the text normalizer.
///
/// A profile bundles a sentence segmenter with a case-folding rule.
pub mod text;

/// Article parsing and the parallel corpus builder.
pub mod corpus;

/// Word counting, top-k selection and coverage statistics.
pub mod vocab;

/// Typed external-tool invocations and the runner executing them.
pub mod command;

/// Estimator and converter commands and the model-build orchestrator.
pub mod lm;

/// End-to-end pipelines behind the two command-line entry points.
pub mod pipeline;

/// I/O utilities (line reading/writing, directory walking, path helpers).
///
/// Not exposed
pub(crate) mod io;

pub use error::{PrepError, Result};
