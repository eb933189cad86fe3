use std::collections::HashMap;
use std::path::Path;

use log::{info, warn};

use super::allowed::AllowedChars;
use crate::error::Result;
use crate::io::{for_each_line, write_lines};

/// A counted word.
///
/// # Invariants
/// - `count >= 1`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VocabularyEntry {
	pub word: String,
	pub count: u64,
}

/// Word frequencies over a corpus.
///
/// Entries are stored in first-seen order, which is also the tie-break
/// used when ranking: among equal counts, the word met first in the
/// corpus ranks higher.
///
/// # Invariants
/// - Each word appears once in `entries`, `index` maps it to its position
/// - `total` is the sum of all entry counts
#[derive(Debug, Default, Clone)]
pub struct FrequencyTable {
	index: HashMap<String, usize>,
	entries: Vec<VocabularyEntry>,
	total: u64,
}

impl FrequencyTable {
	pub fn new() -> Self {
		Self::default()
	}

	/// Counts every sentence of an in-memory corpus.
	pub fn from_sentences<I, S>(sentences: I, allowed: Option<&AllowedChars>) -> Self
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let mut table = Self::new();
		for sentence in sentences {
			table.add_sentence(sentence.as_ref(), allowed);
		}
		table
	}

	/// Counts a corpus file line by line, without loading it whole.
	///
	/// Returns the table and the number of sentences read.
	pub fn from_corpus_file<P: AsRef<Path>>(path: P, allowed: Option<&AllowedChars>) -> Result<(Self, usize)> {
		let mut table = Self::new();
		let sentences = for_each_line(path, |sentence| table.add_sentence(sentence, allowed))?;
		Ok((table, sentences))
	}

	/// Counts the whitespace-separated words of a sentence.
	///
	/// With an allow-list, words containing any other character are skipped
	/// and do not contribute to the total either.
	pub fn add_sentence(&mut self, sentence: &str, allowed: Option<&AllowedChars>) {
		for word in sentence.split_whitespace() {
			if allowed.is_none_or(|allowed| allowed.permits(word)) {
				self.add_word(word);
			}
		}
	}

	/// Records one occurrence of `word`.
	pub fn add_word(&mut self, word: &str) {
		match self.index.get(word) {
			Some(&position) => self.entries[position].count += 1,
			None => {
				self.index.insert(word.to_owned(), self.entries.len());
				self.entries.push(VocabularyEntry { word: word.to_owned(), count: 1 });
			}
		}
		self.total += 1;
	}

	pub fn count(&self, word: &str) -> Option<u64> {
		self.index.get(word).map(|&position| self.entries[position].count)
	}

	/// Number of distinct counted words.
	pub fn unique_words(&self) -> usize {
		self.entries.len()
	}

	/// Sum of all counts.
	pub fn total_occurrences(&self) -> u64 {
		self.total
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// All entries in first-seen order.
	pub fn entries(&self) -> &[VocabularyEntry] {
		&self.entries
	}

	/// The `k` most frequent words, by descending count.
	///
	/// `k` is clamped to the number of distinct words. Ties keep
	/// first-seen order.
	pub fn top_k(&self, k: usize) -> TopKSelection {
		let mut ranked: Vec<&VocabularyEntry> = self.entries.iter().collect();
		// Stable sort: equal counts stay in first-seen order
		ranked.sort_by(|a, b| b.count.cmp(&a.count));

		TopKSelection {
			requested: k,
			entries: ranked.into_iter().take(k).cloned().collect(),
		}
	}
}

/// The retained vocabulary, in rank order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopKSelection {
	requested: usize,
	entries: Vec<VocabularyEntry>,
}

impl TopKSelection {
	pub fn entries(&self) -> &[VocabularyEntry] {
		&self.entries
	}

	pub fn words(&self) -> impl Iterator<Item = &str> {
		self.entries.iter().map(|entry| entry.word.as_str())
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// The `k` that was asked for, before clamping.
	pub fn requested(&self) -> usize {
		self.requested
	}

	/// `true` if fewer words exist than were requested.
	pub fn was_clamped(&self) -> bool {
		self.entries.len() < self.requested
	}

	/// Sum of the counts of the selected words.
	pub fn total_count(&self) -> u64 {
		self.entries.iter().map(|entry| entry.count).sum()
	}

	/// Writes the vocabulary file: one word per line, rank order, no counts.
	pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<()> {
		write_lines(&path, self.words())?;
		info!("Saved {} words to {}", self.len(), path.as_ref().display());
		Ok(())
	}
}

/// Percentage of `total` represented by `selected`.
///
/// An empty population has no meaningful coverage; it is reported as 0.
pub fn coverage_percent(selected: u64, total: u64) -> f64 {
	if total == 0 {
		return 0.0;
	}
	100.0 * selected as f64 / total as f64
}

/// Outcome of vocabulary curation.
#[derive(Debug, Clone)]
pub struct CurationReport {
	pub selection: TopKSelection,
	pub unique_words: usize,
	pub total_occurrences: u64,
	/// In [0, 100]; 0 when nothing was counted.
	pub coverage_percent: f64,
}

impl CurationReport {
	/// Selects the top `top_k` words of a table and logs the statistics.
	pub fn from_table(table: &FrequencyTable, top_k: usize) -> Self {
		let selection = table.top_k(top_k);
		let coverage = coverage_percent(selection.total_count(), table.total_occurrences());

		info!("Number of unique words: {}", table.unique_words());
		if table.is_empty() {
			warn!("No word was counted; coverage reported as 0");
		} else if selection.was_clamped() {
			warn!("Requested top {} words but only {} exist", top_k, selection.len());
		}
		info!("Top {} words are {:.2} % of all words", selection.len(), coverage);

		Self {
			unique_words: table.unique_words(),
			total_occurrences: table.total_occurrences(),
			coverage_percent: coverage,
			selection,
		}
	}
}

/// Counts an in-memory corpus and selects its top-k vocabulary.
pub fn curate_vocabulary<I, S>(corpus: I, allowed: Option<&AllowedChars>, top_k: usize) -> CurationReport
where
	I: IntoIterator<Item = S>,
	S: AsRef<str>,
{
	CurationReport::from_table(&FrequencyTable::from_sentences(corpus, allowed), top_k)
}

/// Streams a corpus file and selects its top-k vocabulary.
pub fn curate_corpus_file<P: AsRef<Path>>(
	path: P,
	allowed: Option<&AllowedChars>,
	top_k: usize,
) -> Result<CurationReport> {
	let (table, sentences) = FrequencyTable::from_corpus_file(path, allowed)?;
	info!("Number of sentences: {}", sentences);
	Ok(CurationReport::from_table(&table, top_k))
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::rngs::StdRng;
	use rand::{Rng, SeedableRng};

	#[test]
	fn distinct_counts_select_the_most_frequent() {
		let report = curate_vocabulary(["a a a", "b b", "c"], None, 2);

		assert_eq!(
			report.selection.entries(),
			&[
				VocabularyEntry { word: "a".to_owned(), count: 3 },
				VocabularyEntry { word: "b".to_owned(), count: 2 },
			]
		);
		assert_eq!(report.unique_words, 3);
		assert_eq!(report.total_occurrences, 6);
		assert!((report.coverage_percent - 83.333).abs() < 0.01);
	}

	#[test]
	fn allow_list_excludes_words_from_table_and_total() {
		let allowed: AllowedChars = "ab".chars().collect();
		let table = FrequencyTable::from_sentences(["ab ba cx"], Some(&allowed));

		assert_eq!(table.unique_words(), 2);
		assert_eq!(table.count("ab"), Some(1));
		assert_eq!(table.count("ba"), Some(1));
		assert_eq!(table.count("cx"), None);
		assert_eq!(table.total_occurrences(), 2);
	}

	#[test]
	fn ties_keep_first_seen_order() {
		let table = FrequencyTable::from_sentences(["z y x", "x y z w"], None);
		let selection = table.top_k(4);
		assert_eq!(selection.words().collect::<Vec<_>>(), vec!["z", "y", "x", "w"]);

		// Same input, same ranking
		let again = FrequencyTable::from_sentences(["z y x", "x y z w"], None);
		assert_eq!(again.top_k(4), selection);
	}

	#[test]
	fn top_k_is_clamped_and_covers_everything() {
		let report = curate_vocabulary(["bir iki", "iki"], None, 10);
		assert_eq!(report.selection.len(), 2);
		assert_eq!(report.selection.requested(), 10);
		assert!(report.selection.was_clamped());
		assert_eq!(report.coverage_percent, 100.0);
	}

	#[test]
	fn empty_corpus_reports_zero_coverage() {
		let empty: [&str; 0] = [];
		let report = curate_vocabulary(empty, None, 5);
		assert!(report.selection.is_empty());
		assert_eq!(report.unique_words, 0);
		assert_eq!(report.coverage_percent, 0.0);

		let blank = curate_vocabulary(["", "   "], None, 5);
		assert_eq!(blank.total_occurrences, 0);
		assert_eq!(blank.coverage_percent, 0.0);
	}

	#[test]
	fn random_corpora_have_a_monotonic_cutoff() {
		let words = ["ev", "okul", "kitap", "su", "göz", "el", "yol", "gün", "dil", "ağaç"];
		let mut rng = StdRng::seed_from_u64(7);

		for _ in 0..200 {
			let sentences: Vec<String> = (0..rng.random_range(0..30))
				.map(|_| {
					(0..rng.random_range(0..8))
						.map(|_| words[rng.random_range(0..words.len())])
						.collect::<Vec<_>>()
						.join(" ")
				})
				.collect();
			let table = FrequencyTable::from_sentences(&sentences, None);
			let k = rng.random_range(0..=table.unique_words());
			let selection = table.top_k(k);

			assert_eq!(selection.len(), k);
			let min_selected = selection.entries().iter().map(|e| e.count).min().unwrap_or(u64::MAX);
			for entry in table.entries() {
				if !selection.words().any(|word| word == entry.word) {
					assert!(entry.count <= min_selected);
				}
			}

			let coverage = coverage_percent(selection.total_count(), table.total_occurrences());
			assert!((0.0..=100.0).contains(&coverage));
			if k == table.unique_words() && k > 0 {
				assert_eq!(coverage, 100.0);
			}
		}
	}

	#[test]
	fn vocabulary_file_lists_words_in_rank_order() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("unigrams.txt");
		curate_vocabulary(["c b b a a a"], None, 2).selection.write(&path).unwrap();
		assert_eq!(std::fs::read_to_string(&path).unwrap(), "a\nb\n");
	}

	#[test]
	fn corpus_file_is_streamed() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("sentences.txt");
		std::fs::write(&path, "merhaba dünya\nmerhaba türkiye\n").unwrap();

		let report = curate_corpus_file(&path, None, 1).unwrap();
		assert_eq!(report.selection.words().collect::<Vec<_>>(), vec!["merhaba"]);
		assert_eq!(report.total_occurrences, 4);
		assert_eq!(report.coverage_percent, 50.0);
	}
}
