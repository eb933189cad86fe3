use std::any::Any;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Mutex};
use std::thread;

use log::{debug, info};

use super::article::ArticleParser;
use crate::error::{PrepError, Result};
use crate::io::write_lines;

/// Builds the corpus from article files with a fixed-size worker pool.
///
/// See `build_corpus_with_progress`; this variant reports no progress.
pub fn build_corpus<P>(article_paths: &[P], worker_count: usize, parser: &ArticleParser<'_>) -> Result<Vec<String>>
where
	P: AsRef<Path>,
{
	build_corpus_with_progress(article_paths, worker_count, parser, |_, _| {})
}

/// Builds the corpus from article files with a fixed-size worker pool.
///
/// # Parameters
/// - `article_paths`: Files holding one JSON article record per line.
/// - `worker_count`: Number of worker threads (>= 1).
/// - `parser`: Shared article parser, borrowed by every worker.
/// - `on_file_done`: Called as `(files_done, files_total)` after each file,
///   on the calling thread.
///
/// # Behavior
/// - Spawns `worker_count` threads (fewer if there are fewer files).
/// - Workers pull paths from a shared queue and parse one whole file at a time.
/// - Per-file sentence lists are appended in the order they arrive.
///
/// # Ordering
/// Sentences of one article, and articles of one file, stay in order.
/// The order of files in the result is the completion order and is
/// **not** guaranteed to match `article_paths`.
///
/// # Errors
/// The first failing file aborts the build: no further files are
/// dispatched and its error is returned. A panicking worker yields
/// `PrepError::Worker` only where panics unwind: the workspace release
/// profile sets `panic = "abort"`, so in release binaries a worker panic
/// ends the process instead.
pub fn build_corpus_with_progress<P, F>(
	article_paths: &[P],
	worker_count: usize,
	parser: &ArticleParser<'_>,
	mut on_file_done: F,
) -> Result<Vec<String>>
where
	P: AsRef<Path>,
	F: FnMut(usize, usize),
{
	if worker_count == 0 {
		return Err(PrepError::InvalidConfig("worker count must be at least 1".to_owned()));
	}

	let total = article_paths.len();
	let workers = worker_count.min(total.max(1));
	debug!("Dispatching {} file(s) to {} worker(s)", total, workers);

	let (job_tx, job_rx) = mpsc::channel();
	for path in article_paths {
		// Receiver is alive until the end of this function
		let _ = job_tx.send(path.as_ref());
	}
	drop(job_tx);
	let job_rx = Mutex::new(job_rx);
	let abort = AtomicBool::new(false);

	let corpus = thread::scope(|scope| -> Result<Vec<String>> {
		let (result_tx, result_rx) = mpsc::channel();

		let handles: Vec<_> = (0..workers)
			.map(|_| {
				let result_tx = result_tx.clone();
				let job_rx = &job_rx;
				let abort = &abort;
				scope.spawn(move || {
					while !abort.load(Ordering::Relaxed) {
						let next = match job_rx.lock() {
							Ok(rx) => rx.recv(),
							Err(_) => break,
						};
						let Ok(path) = next else { break };
						if result_tx.send((path, parser.parse_file(path))).is_err() {
							break;
						}
					}
				})
			})
			.collect();
		drop(result_tx);

		let mut corpus = Vec::new();
		let mut collected = Ok(());
		let mut done = 0;
		for (path, result) in result_rx.iter() {
			match result {
				Ok(sentences) => {
					debug!("{}: {} sentences", path.display(), sentences.len());
					corpus.extend(sentences);
					done += 1;
					on_file_done(done, total);
				}
				Err(e) => {
					abort.store(true, Ordering::Relaxed);
					collected = Err(e);
					break;
				}
			}
		}

		let mut panicked = None;
		for handle in handles {
			if let Err(payload) = handle.join() {
				panicked = Some(panic_message(payload));
			}
		}

		if let Err(e) = collected {
			return Err(e);
		}
		match panicked {
			Some(message) => Err(PrepError::Worker(message)),
			None => Ok(corpus),
		}
	})?;

	info!("Number of extracted sentences: {}", corpus.len());
	Ok(corpus)
}

/// Writes the corpus, one sentence per line.
pub fn write_corpus<P, S>(path: P, sentences: &[S]) -> Result<()>
where
	P: AsRef<Path>,
	S: AsRef<str>,
{
	write_lines(&path, sentences)?;
	info!("Saved {} sentences to {}", sentences.len(), path.as_ref().display());
	Ok(())
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
	if let Some(message) = payload.downcast_ref::<&str>() {
		(*message).to_owned()
	} else if let Some(message) = payload.downcast_ref::<String>() {
		message.clone()
	} else {
		"worker thread panicked".to_owned()
	}
}
