use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use env_logger::Env;
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, LevelFilter};

use lm_prep_core::config::PipelineConfig;
use lm_prep_core::lm::{BinaryStructure, PruneThresholds};
use lm_prep_core::pipeline::{generate_lm, process_wiki, GenerateLmOptions, ProcessWikiOptions};
use lm_prep_core::text::LanguageRegistry;

#[derive(Parser, Debug)]
#[command(name = "lm-prep", version, about = "Prepare corpora and vocabularies for n-gram language models")]
struct Cli {
	/// Increase verbosity (-v, -vv)
	#[arg(short = 'v', long, global = true, action = ArgAction::Count)]
	verbose: u8,

	/// Decrease verbosity (--quiet, --quiet --quiet)
	#[arg(long, global = true, action = ArgAction::Count)]
	quiet: u8,

	/// TOML configuration file; flags override its values
	#[arg(long, global = true, value_name = "PATH")]
	config: Option<PathBuf>,

	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
	/// Extract a wikipedia dump and build the sentence corpus
	ProcessWiki(ProcessWikiArgs),
	/// Curate the vocabulary of a corpus and build the language model
	GenerateLm(GenerateLmArgs),
}

#[derive(Args, Debug)]
struct ProcessWikiArgs {
	/// Path to a wikipedia dump
	#[arg(long, value_name = "PATH")]
	wiki_dump: PathBuf,

	/// Output directory for the extracted files and sentences.txt
	#[arg(long, value_name = "DIR")]
	output: PathBuf,

	/// Language id of the dump
	#[arg(long, value_name = "ID")]
	language_id: Option<String>,

	/// Number of processes for extraction and parsing [default: logical CPUs]
	#[arg(long, value_name = "N")]
	processes: Option<usize>,

	/// Dump extractor executable
	#[arg(long, value_name = "PATH", default_value = "wikiextractor")]
	extractor: PathBuf,

	/// Reuse <output>/extract instead of running the extractor
	#[arg(long)]
	skip_extract: bool,
}

#[derive(Args, Debug)]
struct GenerateLmArgs {
	/// Input text file, one sentence per line
	#[arg(long, value_name = "PATH")]
	input: PathBuf,

	/// Output directory for the vocabulary and model files
	#[arg(long, value_name = "DIR")]
	output: PathBuf,

	/// Directory holding the lmplz and build_binary executables
	#[arg(long, value_name = "DIR")]
	kenlm_bins: PathBuf,

	/// Allowed characters in unigrams, one character per line
	#[arg(long, value_name = "PATH")]
	vocab: Option<PathBuf>,

	/// Keep the top_k most frequent words [default: 200000]
	#[arg(long, value_name = "K")]
	top_k: Option<usize>,

	/// Order of the n-gram model [default: 4]
	#[arg(long, value_name = "N")]
	order: Option<usize>,

	/// Sorting memory for the estimator, e.g. 80% or 4G [default: 80%]
	#[arg(long, value_name = "SIZE")]
	memory: Option<String>,

	/// Per-order pruning thresholds, e.g. "0 1 1"
	#[arg(long, value_name = "THRESHOLDS")]
	prune: Option<PruneThresholds>,

	/// Binary data structure: probing or trie
	#[arg(long, value_name = "TYPE")]
	binary_type: Option<BinaryStructure>,

	/// Pointer compression bits (trie only)
	#[arg(short = 'a', long, value_name = "BITS")]
	pointer_compression: Option<u8>,

	/// Quantization bits (trie only)
	#[arg(short = 'q', long, value_name = "BITS")]
	quantization: Option<u8>,
}

fn main() -> Result<()> {
	let cli = Cli::parse();
	init_logging(cli.verbose, cli.quiet);

	let config = match &cli.config {
		Some(path) => PipelineConfig::load(path).with_context(|| format!("loading {}", path.display()))?,
		None => PipelineConfig::default(),
	};

	match cli.command {
		Commands::ProcessWiki(args) => run_process_wiki(args, config),
		Commands::GenerateLm(args) => run_generate_lm(args, config),
	}
}

fn init_logging(verbose: u8, quiet: u8) {
	let level = if quiet > 0 {
		match quiet {
			1 => LevelFilter::Warn,
			_ => LevelFilter::Error,
		}
	} else {
		match verbose {
			0 => LevelFilter::Info,
			1 => LevelFilter::Debug,
			_ => LevelFilter::Trace,
		}
	};

	let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or("info"));
	builder.format_timestamp_millis();
	if verbose > 0 || quiet > 0 {
		builder.filter_level(level);
	}
	let _ = builder.try_init();
}

fn run_process_wiki(args: ProcessWikiArgs, mut config: PipelineConfig) -> Result<()> {
	if let Some(language_id) = args.language_id {
		config.corpus.language_id = language_id;
	}
	if let Some(processes) = args.processes {
		config.corpus.processes = processes;
	}

	let registry = LanguageRegistry::with_defaults();
	let options = ProcessWikiOptions {
		wiki_dump: args.wiki_dump,
		output_dir: args.output,
		extractor: args.extractor,
		skip_extraction: args.skip_extract,
		config,
	};

	let progress = ProgressBar::new(0);
	progress.set_style(
		ProgressStyle::with_template("{bar:40} {pos}/{len} files [{elapsed_precise} < {eta_precise}]")
			.unwrap_or_else(|_| ProgressStyle::default_bar()),
	);
	let summary = process_wiki(&options, &registry, |done, total| {
		progress.set_length(total as u64);
		progress.set_position(done as u64);
	});
	progress.finish_and_clear();
	let summary = summary.context("corpus processing failed")?;

	info!(
		"{} sentences from {} file(s) written to {}",
		summary.sentences,
		summary.article_files,
		summary.corpus_path.display()
	);
	Ok(())
}

fn run_generate_lm(args: GenerateLmArgs, mut config: PipelineConfig) -> Result<()> {
	if args.vocab.is_some() {
		config.vocabulary.allowed_chars = args.vocab;
	}
	if let Some(top_k) = args.top_k {
		config.vocabulary.top_k = top_k;
	}
	if let Some(order) = args.order {
		config.lm.order = order;
	}
	if let Some(memory) = args.memory {
		config.lm.memory = memory;
	}
	if let Some(prune) = args.prune {
		config.lm.prune = Some(prune.values().to_vec());
	}
	if args.binary_type.is_some() {
		config.lm.binary_type = args.binary_type;
	}
	if args.pointer_compression.is_some() {
		config.lm.pointer_compression = args.pointer_compression;
	}
	if args.quantization.is_some() {
		config.lm.quantization = args.quantization;
	}

	let options = GenerateLmOptions {
		corpus_path: args.input,
		output_dir: args.output,
		bins_dir: args.kenlm_bins,
		config,
	};
	let summary = generate_lm(&options).context("language model generation failed")?;

	info!(
		"Vocabulary of {} words ({:.2} % coverage) in {}",
		summary.report.selection.len(),
		summary.report.coverage_percent,
		summary.vocab_path.display()
	);
	info!("ARPA model: {}", summary.artifacts.arpa_path.display());
	info!("Binary model: {}", summary.artifacts.binary_path.display());
	Ok(())
}
