use std::collections::{HashMap, HashSet};
use std::fmt;
use std::mem;

use unicode_segmentation::UnicodeSegmentation;

use crate::error::{PrepError, Result};

/// Splits a block of text into raw sentences.
///
/// Implementations must return sentences in text order. They are not
/// expected to clean anything up: normalization happens afterwards.
pub trait Segmenter: Send + Sync {
	fn segment(&self, text: &str) -> Vec<String>;
}

impl<F> Segmenter for F
where
	F: Fn(&str) -> Vec<String> + Send + Sync,
{
	fn segment(&self, text: &str) -> Vec<String> {
		self(text)
	}
}

/// Language-aware lowercasing.
pub trait CaseFolder: Send + Sync {
	fn fold(&self, text: &str) -> String;
}

/// Plain Unicode lowercasing, correct for most scripts.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnicodeCaseFolder;

impl CaseFolder for UnicodeCaseFolder {
	fn fold(&self, text: &str) -> String {
		text.to_lowercase()
	}
}

/// Turkish lowercasing.
///
/// Turkish distinguishes dotted and dotless i: `I` lowers to `ı` and `İ`
/// lowers to `i`. Default Unicode lowering maps `I` to `i` and `İ` to
/// `i` + combining dot, both wrong for Turkish text.
#[derive(Debug, Default, Clone, Copy)]
pub struct TurkishCaseFolder;

impl CaseFolder for TurkishCaseFolder {
	fn fold(&self, text: &str) -> String {
		let mut folded = String::with_capacity(text.len());
		for c in text.chars() {
			match c {
				'I' => folded.push('ı'),
				'İ' => folded.push('i'),
				_ => folded.extend(c.to_lowercase()),
			}
		}
		folded
	}
}

/// Sentence boundaries from Unicode Standard Annex #29.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnicodeSentenceSegmenter;

impl Segmenter for UnicodeSentenceSegmenter {
	fn segment(&self, text: &str) -> Vec<String> {
		text.unicode_sentences().map(str::to_owned).collect()
	}
}

/// Lowercase Turkish abbreviations that are followed by a period mid-sentence.
const TURKISH_ABBREVIATIONS: &[&str] = &[
	"alb", "av", "bkz", "bşk", "cad", "dr", "doç", "gen", "gör", "hz", "kur", "ltd", "mah", "müh", "no",
	"org", "öğr", "örn", "prof", "sf", "sok", "st", "şti", "vb", "vd", "vs", "yrd", "yy",
];

/// Longest digit run still read as an ordinal ("1.", "19.", "100.").
const MAX_ORDINAL_DIGITS: usize = 3;

/// Turkish sentence boundaries.
///
/// Starts from UAX #29 boundaries and re-joins the ones that fall after a
/// period that does not end a sentence in Turkish text:
/// - ordinals: `1. Dünya Savaşı`, `19. yüzyıl`
/// - known abbreviations: `Prof. Dr. Ahmet`, `vb.`
/// - single-letter initials and dotted acronyms: `M. Kemal`, `M.Ö.`
///
/// # Notes
/// A sentence really ending in a short number ("Sonuç 3.") is joined with
/// the next one.
#[derive(Debug, Clone)]
pub struct TurkishSentenceSegmenter {
	abbreviations: HashSet<&'static str>,
}

impl TurkishSentenceSegmenter {
	pub fn new() -> Self {
		Self { abbreviations: TURKISH_ABBREVIATIONS.iter().copied().collect() }
	}

	/// Whether a UAX #29 piece ends on a period that belongs to its last word.
	fn continues_after(&self, piece: &str) -> bool {
		let Some(head) = piece.trim_end().strip_suffix('.') else {
			return false;
		};
		let Some(word) = head.split_whitespace().next_back() else {
			return false;
		};
		let word = word.trim_start_matches(|c: char| !c.is_alphanumeric());
		if word.is_empty() {
			return false;
		}
		if word.chars().all(|c| c.is_ascii_digit()) {
			return word.len() <= MAX_ORDINAL_DIGITS;
		}
		if word.chars().count() == 1 || word.contains('.') {
			return true;
		}
		self.abbreviations.contains(TurkishCaseFolder.fold(word).as_str())
	}
}

impl Default for TurkishSentenceSegmenter {
	fn default() -> Self {
		Self::new()
	}
}

impl Segmenter for TurkishSentenceSegmenter {
	fn segment(&self, text: &str) -> Vec<String> {
		let mut sentences = Vec::new();
		let mut pending = String::new();
		for piece in text.unicode_sentences() {
			pending.push_str(piece);
			if !self.continues_after(piece) {
				sentences.push(mem::take(&mut pending));
			}
		}
		if !pending.is_empty() {
			sentences.push(pending);
		}
		sentences
	}
}

/// Everything language-specific the corpus stage needs.
///
/// # Invariants
/// - `id` is the key the profile is registered under
pub struct LanguageProfile {
	id: String,
	segmenter: Box<dyn Segmenter>,
	case_folder: Box<dyn CaseFolder>,
}

impl LanguageProfile {
	pub fn new<S, C>(id: &str, segmenter: S, case_folder: C) -> Self
	where
		S: Segmenter + 'static,
		C: CaseFolder + 'static,
	{
		Self {
			id: id.to_owned(),
			segmenter: Box::new(segmenter),
			case_folder: Box::new(case_folder),
		}
	}

	/// Turkish: abbreviation-aware segmentation with Turkish case folding.
	pub fn turkish() -> Self {
		Self::new("tr", TurkishSentenceSegmenter::new(), TurkishCaseFolder)
	}

	pub fn id(&self) -> &str {
		&self.id
	}

	pub fn segmenter(&self) -> &dyn Segmenter {
		self.segmenter.as_ref()
	}

	pub fn case_folder(&self) -> &dyn CaseFolder {
		self.case_folder.as_ref()
	}
}

impl fmt::Debug for LanguageProfile {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("LanguageProfile").field("id", &self.id).finish_non_exhaustive()
	}
}

/// Maps language ids to profiles.
///
/// Built once per run and passed by reference; there is no process-wide
/// language state.
#[derive(Debug, Default)]
pub struct LanguageRegistry {
	profiles: HashMap<String, LanguageProfile>,
}

impl LanguageRegistry {
	/// Registry holding every built-in profile (currently only `tr`).
	pub fn with_defaults() -> Self {
		let mut registry = Self::default();
		registry.register(LanguageProfile::turkish());
		registry
	}

	/// Adds a profile, replacing any previous one with the same id.
	pub fn register(&mut self, profile: LanguageProfile) {
		self.profiles.insert(profile.id.clone(), profile);
	}

	/// Looks up a profile.
	///
	/// # Errors
	/// Returns `UnsupportedLanguage` if no profile is registered for `id`.
	pub fn get(&self, id: &str) -> Result<&LanguageProfile> {
		self.profiles.get(id).ok_or_else(|| PrepError::UnsupportedLanguage(id.to_owned()))
	}

	pub fn contains(&self, id: &str) -> bool {
		self.profiles.contains_key(id)
	}

	/// Registered ids, sorted.
	pub fn ids(&self) -> Vec<&str> {
		let mut ids: Vec<&str> = self.profiles.keys().map(String::as_str).collect();
		ids.sort_unstable();
		ids
	}
}
