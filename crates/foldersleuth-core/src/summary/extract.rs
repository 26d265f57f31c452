/// Text extraction from plain-text documents.
///
/// Rich formats (PDF, DOCX, spreadsheets) need format parsers that live
/// outside this crate; they plug in through [`TextExtractor`](super::TextExtractor).
use super::TextExtractor;
use crate::error::ExtractError;
use crate::model::extension_of;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Upper bound on extracted text handed to a summariser, in characters.
pub const DEFAULT_MAX_CHARS: usize = 120_000;

/// Extensions read by [`PlainTextExtractor::default`], lowercase without dot.
pub const PLAIN_TEXT_EXTENSIONS: &[&str] = &[
    "txt", "md", "markdown", "rst", "csv", "tsv", "log", "json", "toml", "yaml", "yml", "xml",
    "html", "htm", "ini",
];

/// Truncate `text` to at most `max_chars` characters.
pub fn limit_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Reads UTF-8 text files (lossily) for a configurable set of extensions.
#[derive(Debug, Clone)]
pub struct PlainTextExtractor {
    extensions: Vec<String>,
    max_chars: usize,
}

impl Default for PlainTextExtractor {
    fn default() -> Self {
        Self::new(PLAIN_TEXT_EXTENSIONS.iter().copied(), DEFAULT_MAX_CHARS)
    }
}

impl PlainTextExtractor {
    /// `extensions` are matched case-insensitively, with or without a dot.
    pub fn new<'a>(extensions: impl IntoIterator<Item = &'a str>, max_chars: usize) -> Self {
        Self {
            extensions: extensions
                .into_iter()
                .map(|e| e.trim_start_matches('.').to_ascii_lowercase())
                .collect(),
            max_chars,
        }
    }

    pub fn with_max_chars(mut self, max_chars: usize) -> Self {
        self.max_chars = max_chars;
        self
    }
}

impl TextExtractor for PlainTextExtractor {
    fn supports(&self, path: &Path) -> bool {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();
        let ext = extension_of(&name).trim_start_matches('.');
        !ext.is_empty() && self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext))
    }

    fn extract_text(&self, path: &Path) -> Result<String, ExtractError> {
        if !self.supports(path) {
            return Err(ExtractError::Unsupported {
                path: path.to_path_buf(),
            });
        }

        let io_err = |source| ExtractError::Io {
            path: path.to_path_buf(),
            source,
        };
        // A UTF-8 character is at most 4 bytes, so this is always enough.
        let byte_budget = self.max_chars.saturating_mul(4) as u64;
        let mut bytes = Vec::new();
        File::open(path)
            .map_err(io_err)?
            .take(byte_budget)
            .read_to_end(&mut bytes)
            .map_err(io_err)?;

        let text = String::from_utf8_lossy(&bytes);
        Ok(limit_chars(&text, self.max_chars).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn limit_chars_respects_char_boundaries() {
        assert_eq!(limit_chars("héllo", 2), "hé");
        assert_eq!(limit_chars("abc", 10), "abc");
        assert_eq!(limit_chars("", 0), "");
    }

    #[test]
    fn supports_matches_extension_case_insensitively() {
        let ex = PlainTextExtractor::default();
        assert!(ex.supports(Path::new("/d/notes.TXT")));
        assert!(ex.supports(Path::new("/d/readme.md")));
        assert!(!ex.supports(Path::new("/d/report.pdf")));
        assert!(!ex.supports(Path::new("/d/Makefile")));
    }

    #[test]
    fn custom_extension_list() {
        let ex = PlainTextExtractor::new([".Rs", "py"], 10);
        assert!(ex.supports(Path::new("main.rs")));
        assert!(ex.supports(Path::new("tool.PY")));
        assert!(!ex.supports(Path::new("notes.txt")));
    }

    #[test]
    fn extract_caps_length() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("long.txt");
        std::fs::write(&path, "x".repeat(500)).unwrap();

        let ex = PlainTextExtractor::default().with_max_chars(100);
        assert_eq!(ex.extract_text(&path).unwrap().len(), 100);
    }

    #[test]
    fn extract_unsupported_is_an_error() {
        let ex = PlainTextExtractor::default();
        let err = ex.extract_text(Path::new("/d/scan.pdf")).unwrap_err();
        assert!(matches!(err, ExtractError::Unsupported { .. }));
    }

    #[test]
    fn extract_missing_file_is_io_error() {
        let tmp = TempDir::new().unwrap();
        let ex = PlainTextExtractor::default();
        let err = ex.extract_text(&tmp.path().join("gone.txt")).unwrap_err();
        assert!(matches!(err, ExtractError::Io { .. }));
    }
}
