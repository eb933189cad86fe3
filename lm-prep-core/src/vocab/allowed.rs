use std::collections::HashSet;
use std::path::Path;

use crate::error::{PrepError, Result};
use crate::io::read_lines;

/// Characters a word may be made of.
///
/// A word is eligible for counting only if every one of its characters
/// is in the set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllowedChars {
	chars: HashSet<char>,
}

impl AllowedChars {
	pub fn new<I: IntoIterator<Item = char>>(chars: I) -> Self {
		Self { chars: chars.into_iter().collect() }
	}

	/// Loads a character list, one character per line.
	///
	/// Surrounding whitespace is trimmed and blank lines are skipped.
	///
	/// # Errors
	/// - `Io` if the file cannot be read
	/// - `InvalidConfig` if a line holds more than one character, or if the
	///   file lists no character at all (every word would be rejected)
	pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
		let path = path.as_ref();
		let mut chars = HashSet::new();
		for (index, line) in read_lines(path)?.iter().enumerate() {
			let line = line.trim();
			let mut it = line.chars();
			match (it.next(), it.next()) {
				(None, _) => continue,
				(Some(c), None) => {
					chars.insert(c);
				}
				(Some(_), Some(_)) => {
					return Err(PrepError::InvalidConfig(format!(
						"{} line {}: expected a single character, got {:?}",
						path.display(),
						index + 1,
						line
					)));
				}
			}
		}
		if chars.is_empty() {
			return Err(PrepError::InvalidConfig(format!(
				"{} does not list any allowed character",
				path.display()
			)));
		}
		Ok(Self { chars })
	}

	pub fn contains(&self, c: char) -> bool {
		self.chars.contains(&c)
	}

	/// `true` if every character of `word` is allowed.
	pub fn permits(&self, word: &str) -> bool {
		word.chars().all(|c| self.chars.contains(&c))
	}

	pub fn len(&self) -> usize {
		self.chars.len()
	}

	pub fn is_empty(&self) -> bool {
		self.chars.is_empty()
	}
}

impl FromIterator<char> for AllowedChars {
	fn from_iter<I: IntoIterator<Item = char>>(iter: I) -> Self {
		Self::new(iter)
	}
}
