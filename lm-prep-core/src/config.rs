use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{PrepError, Result};
use crate::lm::{BinaryBuildOptions, BinaryStructure, MemoryBudget, PruneThresholds};
use crate::text::LanguageRegistry;

/// Settings of both pipelines.
///
/// Every field has a default, so an empty file (or no file) is a valid
/// configuration. Command-line flags are applied on top by the binary.
///
/// ```toml
/// [corpus]
/// language_id = "tr"
/// processes = 8
///
/// [vocabulary]
/// top_k = 200000
/// allowed_chars = "chars.txt"
///
/// [lm]
/// order = 4
/// memory = "80%"
/// prune = [0, 1, 1, 1]
/// binary_type = "trie"
/// pointer_compression = 22
/// quantization = 8
/// ```
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
	pub corpus: CorpusConfig,
	pub vocabulary: VocabularyConfig,
	pub lm: LmConfig,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct CorpusConfig {
	pub language_id: String,
	/// Worker count for both the extractor and the corpus builder.
	pub processes: usize,
}

impl Default for CorpusConfig {
	fn default() -> Self {
		Self { language_id: "tr".to_owned(), processes: num_cpus::get() }
	}
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct VocabularyConfig {
	pub top_k: usize,
	/// One allowed character per line; absent means every word counts.
	pub allowed_chars: Option<PathBuf>,
}

impl Default for VocabularyConfig {
	fn default() -> Self {
		Self { top_k: 200_000, allowed_chars: None }
	}
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct LmConfig {
	pub order: usize,
	pub memory: String,
	pub prune: Option<Vec<u64>>,
	pub binary_type: Option<BinaryStructure>,
	pub pointer_compression: Option<u8>,
	pub quantization: Option<u8>,
}

impl Default for LmConfig {
	fn default() -> Self {
		Self {
			order: 4,
			memory: "80%".to_owned(),
			prune: None,
			binary_type: None,
			pointer_compression: None,
			quantization: None,
		}
	}
}

impl LmConfig {
	pub fn memory_budget(&self) -> Result<MemoryBudget> {
		self.memory.parse()
	}

	pub fn prune_thresholds(&self) -> Option<PruneThresholds> {
		self.prune.clone().map(PruneThresholds::new)
	}

	pub fn binary_options(&self) -> BinaryBuildOptions {
		BinaryBuildOptions {
			structure: self.binary_type,
			pointer_compression: self.pointer_compression,
			quantization: self.quantization,
		}
	}
}

impl PipelineConfig {
	pub fn from_toml_str(contents: &str) -> Result<Self> {
		Ok(toml::from_str(contents)?)
	}

	/// Reads a TOML configuration file.
	pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
		let path = path.as_ref();
		let contents = fs::read_to_string(path).map_err(|e| PrepError::io(path, e))?;
		Self::from_toml_str(&contents)
	}

	/// Checks the settings used by the corpus pipeline.
	pub fn validate_corpus(&self, registry: &LanguageRegistry) -> Result<()> {
		registry.get(&self.corpus.language_id)?;
		if self.corpus.processes == 0 {
			return Err(PrepError::InvalidConfig("processes must be at least 1".to_owned()));
		}
		Ok(())
	}

	/// Checks the settings used by the model pipeline.
	pub fn validate_lm(&self) -> Result<()> {
		if self.vocabulary.top_k == 0 {
			return Err(PrepError::InvalidConfig("top_k must be at least 1".to_owned()));
		}
		if self.lm.order < 1 {
			return Err(PrepError::InvalidConfig("n-gram order must be at least 1".to_owned()));
		}
		self.lm.memory_budget()?;
		if let Some(prune) = self.lm.prune_thresholds() {
			prune.validate_for_order(self.lm.order)?;
		}
		self.lm.binary_options().validate()
	}

	pub fn validate(&self, registry: &LanguageRegistry) -> Result<()> {
		self.validate_corpus(registry)?;
		self.validate_lm()
	}
}
