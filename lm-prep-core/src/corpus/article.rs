use std::path::Path;

use log::debug;
use serde::Deserialize;

use crate::error::{PrepError, Result};
use crate::io::read_lines;
use crate::text::{LanguageProfile, Normalizer};

/// One extracted article, as written by the dump extractor (one JSON
/// object per line).
///
/// Only `text` is required; the other fields name the article in logs.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ArticleRecord {
	#[serde(default)]
	pub id: Option<String>,
	#[serde(default)]
	pub title: Option<String>,
	#[serde(default)]
	pub url: Option<String>,
	pub text: String,
}

impl ArticleRecord {
	/// Title, else id, else url, else `"untitled"`.
	pub fn label(&self) -> &str {
		[&self.title, &self.id, &self.url]
			.into_iter()
			.find_map(|field| field.as_deref())
			.unwrap_or("untitled")
	}
}

/// Splits an article into sentences and normalizes each of them.
///
/// Sentences come out in the segmenter's order; sentences that normalize
/// to nothing are dropped.
pub fn extract_sentences<'a>(
	article_text: &str,
	profile: &'a LanguageProfile,
) -> impl Iterator<Item = String> + use<'a> {
	let normalizer = Normalizer::new(profile.case_folder());
	profile
		.segmenter()
		.segment(article_text)
		.into_iter()
		.map(move |sentence| normalizer.normalize(&sentence))
		.filter(|sentence| !sentence.is_empty())
}

/// Turns article files into normalized sentences for one language.
///
/// Holds only a shared reference to the profile, so one parser can be
/// used from every worker thread.
#[derive(Debug, Clone, Copy)]
pub struct ArticleParser<'a> {
	profile: &'a LanguageProfile,
}

impl<'a> ArticleParser<'a> {
	pub fn new(profile: &'a LanguageProfile) -> Self {
		Self { profile }
	}

	pub fn profile(&self) -> &'a LanguageProfile {
		self.profile
	}

	/// Sentences of a single article.
	pub fn parse_article(&self, article_text: &str) -> Vec<String> {
		extract_sentences(article_text, self.profile).collect()
	}

	/// Reads every record of an article file.
	///
	/// # Errors
	/// - `Io` if the file cannot be read
	/// - `MalformedRecord` with the 1-based line number of the first bad line
	///
	/// # Notes
	/// Blank lines are skipped.
	pub fn read_records<P: AsRef<Path>>(&self, path: P) -> Result<Vec<ArticleRecord>> {
		let path = path.as_ref();
		let mut records = Vec::new();
		for (index, line) in read_lines(path)?.iter().enumerate() {
			if line.trim().is_empty() {
				continue;
			}
			let record = serde_json::from_str(line).map_err(|source| PrepError::MalformedRecord {
				path: path.to_path_buf(),
				line: index + 1,
				source,
			})?;
			records.push(record);
		}
		Ok(records)
	}

	/// Sentences of every article in a file, article by article.
	///
	/// All records are parsed before any sentence is extracted, so a bad
	/// line fails the file without doing partial work.
	pub fn parse_file<P: AsRef<Path>>(&self, path: P) -> Result<Vec<String>> {
		let path = path.as_ref();
		let records = self.read_records(path)?;
		let mut sentences = Vec::new();
		for record in &records {
			let before = sentences.len();
			sentences.extend(extract_sentences(&record.text, self.profile));
			if sentences.len() == before {
				debug!("{}: article '{}' has no sentences", path.display(), record.label());
			}
		}
		Ok(sentences)
	}
}
