//! Text-level building blocks shared by the corpus stage.
//!
//! - Language profiles (`LanguageProfile`) pairing a sentence segmenter
//!   with a case-folding rule, looked up through a `LanguageRegistry`
//! - The sentence normalizer (`Normalizer`)

/// Segmenter and case-folder capabilities, language profiles and registry.
pub mod language;

/// Sentence normalization (case folding, symbol stripping, whitespace).
pub mod normalizer;

pub use language::{CaseFolder, LanguageProfile, LanguageRegistry, Segmenter};
pub use normalizer::Normalizer;
