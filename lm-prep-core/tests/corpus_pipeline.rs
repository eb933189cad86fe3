use std::fs;
use std::path::{Path, PathBuf};

use lm_prep_core::config::PipelineConfig;
use lm_prep_core::corpus::{build_corpus, ArticleParser};
use lm_prep_core::pipeline::{process_wiki, ProcessWikiOptions, EXTRACT_DIR_NAME};
use lm_prep_core::text::LanguageRegistry;
use lm_prep_core::vocab::curate_corpus_file;
use lm_prep_core::PrepError;

fn write_article_file(path: &Path, texts: &[&str]) {
	let lines: Vec<String> = texts
		.iter()
		.enumerate()
		.map(|(i, text)| serde_json::json!({ "id": i.to_string(), "title": "t", "text": text }).to_string())
		.collect();
	fs::write(path, lines.join("\n") + "\n").unwrap();
}

/// Lays out three extracted files the way the extractor nests them.
fn prepare_extract_dir(output_dir: &Path) -> Vec<PathBuf> {
	let extract = output_dir.join(EXTRACT_DIR_NAME);
	fs::create_dir_all(extract.join("AA")).unwrap();
	fs::create_dir_all(extract.join("AB")).unwrap();

	let files = vec![extract.join("AA/wiki_00"), extract.join("AA/wiki_01"), extract.join("AB/wiki_00")];
	write_article_file(&files[0], &["Ankara başkenttir. Ilık bir gün."]);
	write_article_file(&files[1], &["İzmir’in limanı büyük. Deniz (Ege) mavidir!"]);
	write_article_file(&files[2], &["Kars soğuktur. Ardahan da öyle."]);
	files
}

#[test]
fn three_files_two_workers_make_a_six_line_corpus() {
	let dir = tempfile::tempdir().unwrap();
	prepare_extract_dir(dir.path());

	let mut config = PipelineConfig::default();
	config.corpus.processes = 2;
	let options = ProcessWikiOptions {
		wiki_dump: PathBuf::from("unused.xml.bz2"),
		output_dir: dir.path().to_path_buf(),
		extractor: PathBuf::from("unused"),
		skip_extraction: true,
		config,
	};

	let mut last_progress = None;
	let summary = process_wiki(&options, &LanguageRegistry::with_defaults(), |done, total| {
		last_progress = Some((done, total))
	})
	.unwrap();

	assert_eq!(summary.article_files, 3);
	assert_eq!(summary.sentences, 6);
	assert_eq!(last_progress, Some((3, 3)));

	let corpus = fs::read_to_string(&summary.corpus_path).unwrap();
	let lines: Vec<&str> = corpus.lines().collect();
	assert_eq!(lines.len(), 6);

	// Cross-file order is completion order; within an article order holds
	for (first, second) in [
		("ankara başkenttir", "ılık bir gün"),
		("izmir'in limanı büyük", "deniz ege mavidir"),
		("kars soğuktur", "ardahan da öyle"),
	] {
		let at = lines.iter().position(|line| *line == first).unwrap();
		assert_eq!(lines[at + 1], second);
	}
}

#[test]
fn unsupported_language_fails_before_any_work() {
	let dir = tempfile::tempdir().unwrap();
	let mut config = PipelineConfig::default();
	config.corpus.language_id = "klingon".to_owned();
	let output_dir = dir.path().join("out");
	let options = ProcessWikiOptions {
		wiki_dump: PathBuf::from("unused.xml.bz2"),
		output_dir: output_dir.clone(),
		extractor: PathBuf::from("unused"),
		skip_extraction: true,
		config,
	};

	let err = process_wiki(&options, &LanguageRegistry::with_defaults(), |_, _| {}).unwrap_err();
	assert!(matches!(err, PrepError::UnsupportedLanguage(ref id) if id == "klingon"));
	assert!(!output_dir.exists());
}

#[test]
fn malformed_article_aborts_the_whole_build() {
	let dir = tempfile::tempdir().unwrap();
	let mut files = prepare_extract_dir(dir.path());
	let broken = dir.path().join("broken");
	fs::write(&broken, "{\"text\": \"Tamam.\"}\nnot json\n").unwrap();
	files.push(broken.clone());

	let registry = LanguageRegistry::with_defaults();
	let parser = ArticleParser::new(registry.get("tr").unwrap());
	let err = build_corpus(&files, 2, &parser).unwrap_err();
	assert!(matches!(err, PrepError::MalformedRecord { ref path, line: 2, .. } if *path == broken), "{err}");
}

#[test]
fn curated_vocabulary_of_a_built_corpus() {
	let dir = tempfile::tempdir().unwrap();
	let corpus_path = dir.path().join("sentences.txt");
	fs::write(&corpus_path, "a a a\nb b\nc\n").unwrap();

	let report = curate_corpus_file(&corpus_path, None, 2).unwrap();
	assert_eq!(report.selection.words().collect::<Vec<_>>(), vec!["a", "b"]);
	assert_eq!(report.unique_words, 3);
	assert!((report.coverage_percent - 500.0 / 6.0).abs() < 1e-9);
}
