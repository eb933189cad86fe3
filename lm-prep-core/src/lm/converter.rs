use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;

use crate::command::ToolCommand;
use crate::error::{PrepError, Result};

/// File name of the converter inside the binaries directory.
pub const BUILD_BINARY: &str = "build_binary";

/// Largest quantization width the converter supports.
const MAX_QUANTIZATION_BITS: u8 = 25;

/// Largest pointer-compression width.
const MAX_POINTER_BITS: u8 = 64;

/// Data structure of the binary model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BinaryStructure {
	Probing,
	Trie,
}

impl BinaryStructure {
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Probing => "probing",
			Self::Trie => "trie",
		}
	}
}

impl FromStr for BinaryStructure {
	type Err = PrepError;

	fn from_str(s: &str) -> Result<Self> {
		match s {
			"probing" => Ok(Self::Probing),
			"trie" => Ok(Self::Trie),
			_ => Err(PrepError::InvalidConfig(format!(
				"unknown binary type '{s}', expected 'probing' or 'trie'"
			))),
		}
	}
}

impl fmt::Display for BinaryStructure {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Optional knobs of the binary conversion.
///
/// # Invariants (checked by `validate`)
/// - `pointer_compression` and `quantization` require `Trie`
/// - `quantization` in 1..=25, `pointer_compression` in 1..=64
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BinaryBuildOptions {
	pub structure: Option<BinaryStructure>,
	pub pointer_compression: Option<u8>,
	pub quantization: Option<u8>,
}

impl BinaryBuildOptions {
	pub fn validate(&self) -> Result<()> {
		let trie = self.structure == Some(BinaryStructure::Trie);

		if let Some(bits) = self.quantization {
			if !trie {
				return Err(PrepError::InvalidConfig("quantization (-q) requires the trie binary type".to_owned()));
			}
			if !(1..=MAX_QUANTIZATION_BITS).contains(&bits) {
				return Err(PrepError::InvalidConfig(format!(
					"quantization must use 1 to {MAX_QUANTIZATION_BITS} bits, got {bits}"
				)));
			}
		}
		if let Some(bits) = self.pointer_compression {
			if !trie {
				return Err(PrepError::InvalidConfig(
					"pointer compression (-a) requires the trie binary type".to_owned(),
				));
			}
			if !(1..=MAX_POINTER_BITS).contains(&bits) {
				return Err(PrepError::InvalidConfig(format!(
					"pointer compression must use 1 to {MAX_POINTER_BITS} bits, got {bits}"
				)));
			}
		}
		Ok(())
	}
}

/// `build_binary` invocation converting an ARPA file to a binary model.
#[derive(Debug, Clone)]
pub struct BuildBinaryCommand {
	pub program: PathBuf,
	pub arpa: PathBuf,
	pub binary: PathBuf,
	pub options: BinaryBuildOptions,
}

impl BuildBinaryCommand {
	pub fn new<P: AsRef<Path>>(bins_dir: P, arpa: PathBuf, binary: PathBuf, options: BinaryBuildOptions) -> Self {
		Self { program: bins_dir.as_ref().join(BUILD_BINARY), arpa, binary, options }
	}
}

impl ToolCommand for BuildBinaryCommand {
	fn program(&self) -> &Path {
		&self.program
	}

	fn args(&self) -> Vec<OsString> {
		let mut args: Vec<OsString> = vec!["-v".into()];
		if let Some(bits) = self.options.pointer_compression {
			args.push("-a".into());
			args.push(bits.to_string().into());
		}
		if let Some(bits) = self.options.quantization {
			args.push("-q".into());
			args.push(bits.to_string().into());
		}
		if let Some(structure) = self.options.structure {
			args.push(structure.as_str().into());
		}
		args.push(self.arpa.clone().into());
		args.push(self.binary.clone().into());
		args
	}

	fn validate(&self) -> Result<()> {
		self.options.validate()
	}
}
