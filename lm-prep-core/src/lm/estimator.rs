use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::command::ToolCommand;
use crate::error::{PrepError, Result};

/// File name of the estimator inside the binaries directory.
pub const LMPLZ: &str = "lmplz";

/// Sorting memory handed to the estimator, e.g. `80%`, `4G`, `512M`.
///
/// Accepted form: a positive number followed by an optional unit, one of
/// `%` (of physical memory, at most 100) or `b K M G T P E Z Y`.
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryBudget(String);

impl MemoryBudget {
	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl FromStr for MemoryBudget {
	type Err = PrepError;

	fn from_str(s: &str) -> Result<Self> {
		let invalid = || PrepError::InvalidConfig(format!("invalid memory budget '{s}'"));

		let s = s.trim();
		let split = s.find(|c: char| !(c.is_ascii_digit() || c == '.')).unwrap_or(s.len());
		let (number, unit) = s.split_at(split);

		let value: f64 = number.parse().map_err(|_| invalid())?;
		if value <= 0.0 {
			return Err(invalid());
		}
		match unit {
			"" | "b" | "K" | "M" | "G" | "T" | "P" | "E" | "Z" | "Y" => {}
			"%" if value <= 100.0 => {}
			_ => return Err(invalid()),
		}
		Ok(Self(s.to_owned()))
	}
}

impl fmt::Display for MemoryBudget {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

/// Per-order pruning thresholds.
///
/// Threshold `i` drops n-grams of order `i + 1` seen at most that many
/// times. Parsed from the whitespace-separated form `"0 1 1"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PruneThresholds(Vec<u64>);

impl PruneThresholds {
	pub fn new(thresholds: Vec<u64>) -> Self {
		Self(thresholds)
	}

	pub fn values(&self) -> &[u64] {
		&self.0
	}

	/// Checks the thresholds against the n-gram order.
	///
	/// # Errors
	/// `InvalidConfig` if the list is empty, longer than `order`, starts
	/// with a non-zero value (unigram pruning is not supported), or
	/// decreases anywhere. Missing trailing orders reuse the last value.
	pub fn validate_for_order(&self, order: usize) -> Result<()> {
		let invalid = |msg: String| Err(PrepError::InvalidConfig(msg));

		let Some(&first) = self.0.first() else {
			return invalid("pruning needs at least one threshold".to_owned());
		};
		if self.0.len() > order {
			return invalid(format!(
				"{} pruning thresholds given for a {}-gram model",
				self.0.len(),
				order
			));
		}
		if first != 0 {
			return invalid("unigram pruning is not supported, the first threshold must be 0".to_owned());
		}
		if self.0.windows(2).any(|pair| pair[0] > pair[1]) {
			return invalid(format!("pruning thresholds must be non-decreasing, got '{self}'"));
		}
		Ok(())
	}
}

impl FromStr for PruneThresholds {
	type Err = PrepError;

	fn from_str(s: &str) -> Result<Self> {
		s.split_whitespace()
			.map(|token| {
				token
					.parse::<u64>()
					.map_err(|_| PrepError::InvalidConfig(format!("invalid pruning threshold '{token}'")))
			})
			.collect::<Result<Vec<_>>>()
			.map(Self)
	}
}

impl fmt::Display for PruneThresholds {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let values: Vec<String> = self.0.iter().map(u64::to_string).collect();
		f.write_str(&values.join(" "))
	}
}

/// `lmplz` invocation producing an ARPA model from the corpus.
#[derive(Debug, Clone)]
pub struct LmplzCommand {
	pub program: PathBuf,
	pub text: PathBuf,
	pub arpa: PathBuf,
	pub order: usize,
	pub memory: MemoryBudget,
	pub limit_vocab_file: PathBuf,
	pub prune: Option<PruneThresholds>,
}

impl LmplzCommand {
	/// Builds the command with the estimator taken from `bins_dir`.
	pub fn new<P: AsRef<Path>>(
		bins_dir: P,
		text: PathBuf,
		arpa: PathBuf,
		order: usize,
		memory: MemoryBudget,
		limit_vocab_file: PathBuf,
	) -> Self {
		Self {
			program: bins_dir.as_ref().join(LMPLZ),
			text,
			arpa,
			order,
			memory,
			limit_vocab_file,
			prune: None,
		}
	}

	pub fn with_prune(mut self, prune: Option<PruneThresholds>) -> Self {
		self.prune = prune;
		self
	}
}

impl ToolCommand for LmplzCommand {
	fn program(&self) -> &Path {
		&self.program
	}

	fn args(&self) -> Vec<OsString> {
		let mut args: Vec<OsString> = vec![
			"--text".into(),
			self.text.clone().into(),
			"--arpa".into(),
			self.arpa.clone().into(),
			"--order".into(),
			self.order.to_string().into(),
			"--memory".into(),
			self.memory.as_str().into(),
			"--limit_vocab_file".into(),
			self.limit_vocab_file.clone().into(),
		];
		if let Some(prune) = &self.prune {
			args.push("--prune".into());
			args.extend(prune.values().iter().map(|t| OsString::from(t.to_string())));
		}
		args
	}

	fn validate(&self) -> Result<()> {
		if self.order < 1 {
			return Err(PrepError::InvalidConfig("n-gram order must be at least 1".to_owned()));
		}
		if let Some(prune) = &self.prune {
			prune.validate_for_order(self.order)?;
		}
		Ok(())
	}
}
