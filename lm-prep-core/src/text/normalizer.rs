use super::language::CaseFolder;

/// Symbols stripped from every sentence, wherever they occur.
pub const REMOVED_CHARS: &[char] = &[
	'#', '$', '%', '&', '(', ')', '*', '+', ',', '-', '.', '/', ':', ';', '<', '=', '>', '?', '@',
	'[', ']', '^', '_', '{', '|', '}', '~', '!', '"', '\\',
];

/// Typographic apostrophe variants, unified to `'`.
pub const APOSTROPHE_VARIANTS: &[char] = &['’', '`', '´', 'ʹ', 'ʻ', 'ʼ', 'ʽ', 'ʿ', 'ˈ'];

/// The canonical apostrophe.
pub const APOSTROPHE: char = '\'';

/// Turns a raw sentence into a trainable one.
///
/// Steps, in order:
/// 1. Case folding with the language's rule
/// 2. Removal of every character in `REMOVED_CHARS`
/// 3. Each run of `APOSTROPHE_VARIANTS` collapsed to one `'`
/// 4. Each run of whitespace collapsed to one space, ends trimmed
///
/// # Notes
/// - Removal is plain character matching, not word-boundary aware:
///   `e-posta` becomes `eposta`.
/// - Removal happens before the run detection, so `’.’` is one run.
/// - `normalize` is idempotent.
#[derive(Clone, Copy)]
pub struct Normalizer<'a> {
	case_folder: &'a dyn CaseFolder,
}

impl<'a> Normalizer<'a> {
	pub fn new(case_folder: &'a dyn CaseFolder) -> Self {
		Self { case_folder }
	}

	/// Normalizes one sentence.
	///
	/// Returns an empty string when nothing is left; callers drop those.
	pub fn normalize(&self, sentence: &str) -> String {
		let folded = self.case_folder.fold(sentence);
		let mut out = String::with_capacity(folded.len());
		let mut pending_space = false;
		let mut in_apostrophe_run = false;

		for c in folded.chars() {
			if REMOVED_CHARS.contains(&c) {
				continue;
			}
			if c.is_whitespace() {
				// Leading whitespace is never emitted
				pending_space = !out.is_empty();
				in_apostrophe_run = false;
				continue;
			}
			if pending_space {
				out.push(' ');
				pending_space = false;
			}
			if APOSTROPHE_VARIANTS.contains(&c) {
				if !in_apostrophe_run {
					out.push(APOSTROPHE);
				}
				in_apostrophe_run = true;
				continue;
			}
			in_apostrophe_run = false;
			out.push(c);
		}

		out
	}
}
