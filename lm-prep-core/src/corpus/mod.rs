//! Corpus construction from extracted article files.
//!
//! - Article records and per-article sentence extraction (`article`)
//! - Fixed-size worker pool fanning files out and collecting sentences
//!   (`builder`)
//! - The dump extractor producing the article files (`extractor`)

/// Article records, sentence extraction and per-file parsing.
pub mod article;

/// Parallel corpus builder and corpus writer.
pub mod builder;

/// External dump extractor and discovery of its output files.
pub mod extractor;

pub use article::{extract_sentences, ArticleParser, ArticleRecord};
pub use builder::{build_corpus, build_corpus_with_progress, write_corpus};
pub use extractor::{list_article_files, ExtractorCommand};
