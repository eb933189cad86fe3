use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use crate::error::{PrepError, Result};

/// Reads a text file and returns all its lines as a `Vec<String>`.
///
/// - Reads the entire file into memory
/// - Splits on `\n` / `\r\n`
pub(crate) fn read_lines<P: AsRef<Path>>(filename: P) -> Result<Vec<String>> {
	let path = filename.as_ref();
	let mut contents = String::new();
	File::open(path)
		.and_then(|mut file| file.read_to_string(&mut contents))
		.map_err(|e| PrepError::io(path, e))?;
	Ok(contents.lines().map(str::to_owned).collect())
}

/// Streams a text file line by line without holding it in memory.
///
/// The line passed to `f` has its line terminator removed.
/// Returns the number of lines visited.
pub(crate) fn for_each_line<P, F>(filename: P, mut f: F) -> Result<usize>
where
	P: AsRef<Path>,
	F: FnMut(&str),
{
	let path = filename.as_ref();
	let file = File::open(path).map_err(|e| PrepError::io(path, e))?;
	let mut reader = BufReader::new(file);
	let mut line = String::new();
	let mut count = 0;

	loop {
		line.clear();
		let read = reader.read_line(&mut line).map_err(|e| PrepError::io(path, e))?;
		if read == 0 {
			break;
		}
		f(line.trim_end_matches(['\n', '\r']));
		count += 1;
	}

	Ok(count)
}

/// Writes every item on its own line, each followed by `\n`.
pub(crate) fn write_lines<P, I, S>(filename: P, lines: I) -> Result<()>
where
	P: AsRef<Path>,
	I: IntoIterator<Item = S>,
	S: AsRef<str>,
{
	let path = filename.as_ref();
	let file = File::create(path).map_err(|e| PrepError::io(path, e))?;
	let mut writer = BufWriter::new(file);
	for line in lines {
		writer
			.write_all(line.as_ref().as_bytes())
			.and_then(|_| writer.write_all(b"\n"))
			.map_err(|e| PrepError::io(path, e))?;
	}
	writer.flush().map_err(|e| PrepError::io(path, e))
}

/// Creates a directory and all of its parents if missing.
pub(crate) fn ensure_dir<P: AsRef<Path>>(dir: P) -> Result<()> {
	let dir = dir.as_ref();
	fs::create_dir_all(dir).map_err(|e| PrepError::io(dir, e))
}

/// Lists every regular file below `dir`, recursively.
///
/// Paths are returned sorted so that callers get a reproducible order
/// regardless of how the filesystem enumerates entries.
pub(crate) fn list_files_recursive<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
	let mut files = Vec::new();
	let mut pending = vec![dir.as_ref().to_path_buf()];

	while let Some(current) = pending.pop() {
		for entry in fs::read_dir(&current).map_err(|e| PrepError::io(&current, e))? {
			let path = entry.map_err(|e| PrepError::io(&current, e))?.path();
			if path.is_dir() {
				pending.push(path);
			} else if path.is_file() {
				files.push(path);
			}
		}
	}

	files.sort();
	Ok(files)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn write_then_stream_lines() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("lines.txt");
		write_lines(&path, ["first", "second", ""]).unwrap();

		assert_eq!(fs::read_to_string(&path).unwrap(), "first\nsecond\n\n");

		let mut seen = Vec::new();
		let count = for_each_line(&path, |line| seen.push(line.to_owned())).unwrap();
		assert_eq!(count, 3);
		assert_eq!(seen, vec!["first", "second", ""]);
	}

	#[test]
	fn crlf_terminators_are_stripped() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("crlf.txt");
		fs::write(&path, "a b\r\nc\r\n").unwrap();

		assert_eq!(read_lines(&path).unwrap(), vec!["a b", "c"]);
		let mut seen = Vec::new();
		for_each_line(&path, |line| seen.push(line.to_owned())).unwrap();
		assert_eq!(seen, vec!["a b", "c"]);
	}

	#[test]
	fn recursive_listing_is_sorted() {
		let dir = tempfile::tempdir().unwrap();
		let nested = dir.path().join("AB");
		ensure_dir(&nested).unwrap();
		fs::write(nested.join("wiki_01"), "").unwrap();
		fs::write(nested.join("wiki_00"), "").unwrap();
		fs::write(dir.path().join("AA_wiki"), "").unwrap();

		let files = list_files_recursive(dir.path()).unwrap();
		assert_eq!(
			files,
			vec![dir.path().join("AA_wiki"), nested.join("wiki_00"), nested.join("wiki_01")]
		);
	}

	#[test]
	fn missing_file_reports_path() {
		let err = read_lines("/nonexistent/input.txt").unwrap_err();
		assert!(matches!(err, PrepError::Io { ref path, .. } if path == Path::new("/nonexistent/input.txt")));
	}
}
