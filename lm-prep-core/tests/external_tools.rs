//! Runs the model pipeline against stand-in estimator and converter scripts.
//!
//! Kept to a single test: writing an executable while another test thread
//! forks can make the exec fail with "text file busy".
#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use lm_prep_core::config::PipelineConfig;
use lm_prep_core::lm::BinaryStructure;
use lm_prep_core::pipeline::{generate_lm, GenerateLmOptions};
use lm_prep_core::PrepError;

const FAKE_LMPLZ: &str = r#"#!/bin/sh
echo "$@" > "$(dirname "$0")/lmplz.args"
while [ $# -gt 0 ]; do
	if [ "$1" = "--arpa" ]; then
		shift
		echo "arpa" > "$1"
	fi
	shift
done
"#;

const FAKE_BUILD_BINARY: &str = r#"#!/bin/sh
echo "$@" > "$(dirname "$0")/build_binary.args"
for last; do :; done
echo "binary" > "$last"
"#;

fn install_script(dir: &Path, name: &str, body: &str) {
	let path = dir.join(name);
	fs::write(&path, body).unwrap();
	fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
}

fn options(corpus_path: PathBuf, output_dir: PathBuf, bins_dir: PathBuf, config: PipelineConfig) -> GenerateLmOptions {
	GenerateLmOptions { corpus_path, output_dir, bins_dir, config }
}

#[test]
fn model_pipeline_drives_both_tools() {
	let dir = tempfile::tempdir().unwrap();
	let corpus_path = dir.path().join("sentences.txt");
	fs::write(&corpus_path, "a a a\nb b\nc\nab x\n").unwrap();
	let allowed_path = dir.path().join("chars.txt");
	fs::write(&allowed_path, "a\nb\nc\n").unwrap();

	// Successful run
	let bins = dir.path().join("bins");
	fs::create_dir(&bins).unwrap();
	install_script(&bins, "lmplz", FAKE_LMPLZ);
	install_script(&bins, "build_binary", FAKE_BUILD_BINARY);

	let mut config = PipelineConfig::default();
	config.vocabulary.top_k = 2;
	config.vocabulary.allowed_chars = Some(allowed_path);
	config.lm.order = 3;
	config.lm.memory = "1G".to_owned();
	config.lm.prune = Some(vec![0, 1]);
	config.lm.binary_type = Some(BinaryStructure::Trie);
	config.lm.quantization = Some(8);

	let out = dir.path().join("out");
	let summary = generate_lm(&options(corpus_path.clone(), out.clone(), bins.clone(), config.clone())).unwrap();

	assert_eq!(fs::read_to_string(&summary.vocab_path).unwrap(), "a\nb\n");
	// "x" is outside the allowed characters: 7 counted occurrences
	assert_eq!(summary.report.total_occurrences, 7);
	assert_eq!(summary.report.unique_words, 4);
	assert_eq!(fs::read_to_string(&summary.artifacts.arpa_path).unwrap(), "arpa\n");
	assert_eq!(fs::read_to_string(&summary.artifacts.binary_path).unwrap(), "binary\n");

	let lmplz_args = fs::read_to_string(bins.join("lmplz.args")).unwrap();
	assert_eq!(
		lmplz_args.trim_end(),
		format!(
			"--text {} --arpa {} --order 3 --memory 1G --limit_vocab_file {} --prune 0 1",
			corpus_path.display(),
			out.join("lm.arpa").display(),
			out.join("unigrams.txt").display()
		)
	);
	let build_binary_args = fs::read_to_string(bins.join("build_binary.args")).unwrap();
	assert_eq!(
		build_binary_args.trim_end(),
		format!("-v -q 8 trie {} {}", out.join("lm.arpa").display(), out.join("lm.bin").display())
	);

	// Failing estimator: exit status is propagated and the converter never runs
	let failing_bins = dir.path().join("failing_bins");
	fs::create_dir(&failing_bins).unwrap();
	install_script(&failing_bins, "lmplz", "#!/bin/sh\nexit 3\n");
	install_script(&failing_bins, "build_binary", FAKE_BUILD_BINARY);

	let err = generate_lm(&options(corpus_path, dir.path().join("out2"), failing_bins.clone(), config)).unwrap_err();
	assert!(
		matches!(err, PrepError::CommandFailed { ref program, code: Some(3) } if program.ends_with("lmplz")),
		"{err}"
	);
	assert!(!failing_bins.join("build_binary.args").exists());
}
