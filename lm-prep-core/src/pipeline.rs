//! The two end-to-end runs:
//! - `process_wiki`: dump -> article files -> `sentences.txt`
//! - `generate_lm`: `sentences.txt` -> `unigrams.txt` -> `lm.arpa` -> `lm.bin`
//!
//! Both check their whole configuration before doing any heavy work.

use std::path::{Path, PathBuf};

use log::info;

use crate::command::{run_tool, ToolCommand};
use crate::config::PipelineConfig;
use crate::corpus::{build_corpus_with_progress, list_article_files, write_corpus, ArticleParser, ExtractorCommand};
use crate::error::Result;
use crate::io::ensure_dir;
use crate::lm::{build_language_model, LmArtifacts, LmBuildRequest};
use crate::text::LanguageRegistry;
use crate::vocab::{curate_corpus_file, AllowedChars, CurationReport};

/// Corpus file name inside the output directory.
pub const CORPUS_FILE_NAME: &str = "sentences.txt";

/// Vocabulary file name inside the output directory.
pub const VOCAB_FILE_NAME: &str = "unigrams.txt";

/// Extractor output directory name inside the output directory.
pub const EXTRACT_DIR_NAME: &str = "extract";

#[derive(Debug, Clone)]
pub struct ProcessWikiOptions {
	pub wiki_dump: PathBuf,
	pub output_dir: PathBuf,
	/// Extractor executable.
	pub extractor: PathBuf,
	/// Reuse an existing `extract` directory instead of running the extractor.
	pub skip_extraction: bool,
	pub config: PipelineConfig,
}

#[derive(Debug, Clone)]
pub struct CorpusSummary {
	pub extract_dir: PathBuf,
	pub article_files: usize,
	pub sentences: usize,
	pub corpus_path: PathBuf,
}

/// Extracts a dump and builds the sentence corpus from it.
///
/// `on_file_done(done, total)` is called after each article file.
pub fn process_wiki<F>(options: &ProcessWikiOptions, registry: &LanguageRegistry, on_file_done: F) -> Result<CorpusSummary>
where
	F: FnMut(usize, usize),
{
	let config = &options.config;
	config.validate_corpus(registry)?;
	let profile = registry.get(&config.corpus.language_id)?;

	ensure_dir(&options.output_dir)?;
	let extract_dir = options.output_dir.join(EXTRACT_DIR_NAME);

	if options.skip_extraction {
		info!("Reusing extracted files in {}", extract_dir.display());
	} else {
		let mut extractor =
			ExtractorCommand::new(options.wiki_dump.clone(), extract_dir.clone(), config.corpus.processes);
		extractor.program = options.extractor.clone();
		extractor.validate()?;
		run_tool(&extractor)?;
	}

	let files = list_article_files(&extract_dir)?;
	info!("Found {} extracted file(s)", files.len());

	let parser = ArticleParser::new(profile);
	let sentences = build_corpus_with_progress(&files, config.corpus.processes, &parser, on_file_done)?;

	let corpus_path = options.output_dir.join(CORPUS_FILE_NAME);
	write_corpus(&corpus_path, &sentences)?;

	Ok(CorpusSummary { extract_dir, article_files: files.len(), sentences: sentences.len(), corpus_path })
}

#[derive(Debug, Clone)]
pub struct GenerateLmOptions {
	pub corpus_path: PathBuf,
	pub output_dir: PathBuf,
	/// Directory holding `lmplz` and `build_binary`.
	pub bins_dir: PathBuf,
	pub config: PipelineConfig,
}

#[derive(Debug, Clone)]
pub struct LmSummary {
	pub vocab_path: PathBuf,
	pub report: CurationReport,
	pub artifacts: LmArtifacts,
}

/// Curates the vocabulary of a corpus and builds the model over it.
pub fn generate_lm(options: &GenerateLmOptions) -> Result<LmSummary> {
	let config = &options.config;
	config.validate_lm()?;

	let allowed = config.vocabulary.allowed_chars.as_deref().map(AllowedChars::from_file).transpose()?;
	if let Some(allowed) = &allowed {
		info!("Restricting unigrams to {} allowed characters", allowed.len());
	}

	ensure_dir(&options.output_dir)?;
	let vocab_path = options.output_dir.join(VOCAB_FILE_NAME);
	let request = lm_request(options, &vocab_path)?;

	let report = curate_corpus_file(&options.corpus_path, allowed.as_ref(), config.vocabulary.top_k)?;
	report.selection.write(&vocab_path)?;

	let artifacts = build_language_model(&request)?;
	info!("Binary model written to {}", artifacts.binary_path.display());

	Ok(LmSummary { vocab_path, report, artifacts })
}

fn lm_request(options: &GenerateLmOptions, vocab_path: &Path) -> Result<LmBuildRequest> {
	let lm = &options.config.lm;
	Ok(LmBuildRequest {
		corpus_path: options.corpus_path.clone(),
		vocab_path: vocab_path.to_path_buf(),
		output_dir: options.output_dir.clone(),
		bins_dir: options.bins_dir.clone(),
		order: lm.order,
		memory: lm.memory_budget()?,
		prune: lm.prune_thresholds(),
		binary: lm.binary_options(),
	})
}
