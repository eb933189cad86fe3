use std::path::PathBuf;

use log::info;

use super::converter::{BinaryBuildOptions, BuildBinaryCommand};
use super::estimator::{LmplzCommand, MemoryBudget, PruneThresholds};
use crate::command::{run_tool, ToolCommand};
use crate::error::Result;

/// ARPA model file name inside the output directory.
pub const ARPA_FILE_NAME: &str = "lm.arpa";

/// Binary model file name inside the output directory.
pub const BINARY_FILE_NAME: &str = "lm.bin";

/// Everything needed to turn a corpus and a vocabulary into a model.
#[derive(Debug, Clone)]
pub struct LmBuildRequest {
	pub corpus_path: PathBuf,
	pub vocab_path: PathBuf,
	pub output_dir: PathBuf,
	/// Directory holding `lmplz` and `build_binary`.
	pub bins_dir: PathBuf,
	pub order: usize,
	pub memory: MemoryBudget,
	pub prune: Option<PruneThresholds>,
	pub binary: BinaryBuildOptions,
}

/// Files produced by a successful build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LmArtifacts {
	pub arpa_path: PathBuf,
	pub binary_path: PathBuf,
}

impl LmBuildRequest {
	/// The two commands of the build, estimator first.
	pub fn commands(&self) -> (LmplzCommand, BuildBinaryCommand) {
		let artifacts = self.artifacts();
		let lmplz = LmplzCommand::new(
			&self.bins_dir,
			self.corpus_path.clone(),
			artifacts.arpa_path.clone(),
			self.order,
			self.memory.clone(),
			self.vocab_path.clone(),
		)
		.with_prune(self.prune.clone());
		let build_binary =
			BuildBinaryCommand::new(&self.bins_dir, artifacts.arpa_path, artifacts.binary_path, self.binary);
		(lmplz, build_binary)
	}

	pub fn artifacts(&self) -> LmArtifacts {
		LmArtifacts {
			arpa_path: self.output_dir.join(ARPA_FILE_NAME),
			binary_path: self.output_dir.join(BINARY_FILE_NAME),
		}
	}
}

/// Runs the estimator, then the converter on its output.
///
/// # Behavior
/// - Both commands are validated before either is started.
/// - The converter only runs if the estimator succeeded.
///
/// # Errors
/// A validation error, or the first tool that fails to start or exits
/// non-zero. Files left behind by a failed step are not valid output.
pub fn build_language_model(request: &LmBuildRequest) -> Result<LmArtifacts> {
	let (lmplz, build_binary) = request.commands();
	lmplz.validate()?;
	build_binary.validate()?;

	info!(
		"Creating {}-gram arpa LM with {} pruning",
		request.order,
		request.prune.as_ref().map_or_else(|| "no".to_owned(), ToString::to_string)
	);
	run_tool(&lmplz)?;

	info!("Converting {}-gram arpa LM to binary", request.order);
	run_tool(&build_binary)?;

	Ok(request.artifacts())
}
