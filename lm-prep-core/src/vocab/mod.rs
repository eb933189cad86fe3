//! Vocabulary curation.
//!
//! - Character allow-list deciding which words are counted (`AllowedChars`)
//! - Word frequency table, top-k selection and coverage (`curator`)

/// Allowed character set.
pub mod allowed;

/// Frequency counting, ranking and coverage reporting.
pub mod curator;

pub use allowed::AllowedChars;
pub use curator::{
	coverage_percent, curate_corpus_file, curate_vocabulary, CurationReport, FrequencyTable, TopKSelection,
	VocabularyEntry,
};
