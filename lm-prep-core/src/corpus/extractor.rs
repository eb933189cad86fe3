use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::command::ToolCommand;
use crate::error::{PrepError, Result};
use crate::io::list_files_recursive;

/// Default extractor executable, resolved through `PATH`.
pub const WIKIEXTRACTOR: &str = "wikiextractor";

/// Dump extractor invocation.
///
/// Writes a directory tree of files holding one JSON article per line.
#[derive(Debug, Clone)]
pub struct ExtractorCommand {
	pub program: PathBuf,
	pub dump: PathBuf,
	pub output_dir: PathBuf,
	pub processes: usize,
}

impl ExtractorCommand {
	pub fn new(dump: PathBuf, output_dir: PathBuf, processes: usize) -> Self {
		Self { program: PathBuf::from(WIKIEXTRACTOR), dump, output_dir, processes }
	}
}

impl ToolCommand for ExtractorCommand {
	fn program(&self) -> &Path {
		&self.program
	}

	fn args(&self) -> Vec<OsString> {
		vec![
			self.dump.clone().into(),
			"-o".into(),
			self.output_dir.clone().into(),
			"--no-templates".into(),
			"--json".into(),
			"--processes".into(),
			self.processes.to_string().into(),
		]
	}

	fn validate(&self) -> Result<()> {
		if self.processes == 0 {
			return Err(PrepError::InvalidConfig("extractor needs at least one process".to_owned()));
		}
		if !self.dump.is_file() {
			return Err(PrepError::InvalidConfig(format!("dump not found: {}", self.dump.display())));
		}
		Ok(())
	}
}

/// Every article file written by the extractor, sorted by path.
pub fn list_article_files<P: AsRef<Path>>(extract_dir: P) -> Result<Vec<PathBuf>> {
	list_files_recursive(extract_dir)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn extractor_arguments() {
		let command = ExtractorCommand::new(PathBuf::from("trwiki.xml.bz2"), PathBuf::from("out/extract"), 8);
		assert_eq!(command.command_line(), "wikiextractor trwiki.xml.bz2 -o out/extract --no-templates --json --processes 8");
	}

	#[test]
	fn missing_dump_fails_validation() {
		let command = ExtractorCommand::new(PathBuf::from("/no/such/dump.bz2"), PathBuf::from("out"), 2);
		assert!(matches!(command.validate(), Err(PrepError::InvalidConfig(_))));
	}
}
