//! Error types for the preparation pipeline.

use std::path::PathBuf;
use thiserror::Error;

/// Every fatal condition of a run.
///
/// Nothing is retried: an offline batch job is recovered by running it
/// again, so each variant carries enough context (file, line, command)
/// to diagnose the failure afterwards.
#[derive(Error, Debug)]
pub enum PrepError {
	/// No language profile is registered for this id
	#[error("language id '{0}' is not supported")]
	UnsupportedLanguage(String),

	/// Invalid or inconsistent configuration
	#[error("invalid configuration: {0}")]
	InvalidConfig(String),

	/// Configuration file could not be parsed
	#[error("failed to parse configuration: {0}")]
	ConfigParse(#[from] toml::de::Error),

	/// I/O error with file context
	#[error("I/O error for {path}: {source}")]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	/// A line of an article file is not a valid JSON record
	#[error("malformed record in {path} at line {line}: {source}")]
	MalformedRecord {
		path: PathBuf,
		line: usize,
		#[source]
		source: serde_json::Error,
	},

	/// A corpus worker thread died
	#[error("corpus worker failed: {0}")]
	Worker(String),

	/// External program could not be started
	#[error("failed to start {program}: {source}")]
	CommandSpawn {
		program: String,
		#[source]
		source: std::io::Error,
	},

	/// External program exited unsuccessfully
	#[error("{program} exited with {}", describe_exit(.code))]
	CommandFailed { program: String, code: Option<i32> },
}

impl PrepError {
	/// Wraps an `io::Error` with the path it happened on.
	pub fn io<P: Into<PathBuf>>(path: P, source: std::io::Error) -> Self {
		Self::Io { path: path.into(), source }
	}
}

fn describe_exit(code: &Option<i32>) -> String {
	match code {
		Some(code) => format!("status {code}"),
		None => "no status (terminated by signal)".to_owned(),
	}
}

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, PrepError>;
