/// Document summaries — discover supported files under a folder, pull their
/// text out and condense it.
///
/// Extraction and summarisation are trait seams: [`TextExtractor`] and
/// [`Summarizer`]. The crate ships plain-text and lead-sentence
/// implementations; format parsers and remote summarisation services plug in
/// from outside.
pub mod extract;
pub mod lead;

pub use extract::{limit_chars, PlainTextExtractor, DEFAULT_MAX_CHARS};
pub use lead::LeadSummarizer;

use crate::error::{ExtractError, Result, SummarizeError, TraversalError};
use crate::scanner::aggregate::validate_root;
use crate::scanner::CancelToken;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Default summary length budget passed to [`Summarizer::summarize`].
pub const DEFAULT_SUMMARY_LIMIT: usize = 150;

/// Turns a document into text.
pub trait TextExtractor: Send + Sync {
    /// Whether this extractor handles `path` (normally decided by extension).
    fn supports(&self, path: &Path) -> bool;

    fn extract_text(&self, path: &Path) -> std::result::Result<String, ExtractError>;
}

/// Condenses text to roughly `limit` words.
pub trait Summarizer: Send + Sync {
    fn summarize(&self, text: &str, limit: usize) -> std::result::Result<String, SummarizeError>;
}

/// Summary of one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileSummary {
    pub file_name: String,
    /// Path relative to the summarised folder.
    pub relative_path: PathBuf,
    pub summary: String,
}

/// A document that could not be summarised.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryFailure {
    pub path: PathBuf,
    pub message: String,
}

/// Outcome of [`summarize_folder`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct SummaryBatch {
    /// Number of supported documents found.
    pub discovered: usize,
    pub summaries: Vec<FileSummary>,
    pub failures: Vec<SummaryFailure>,
}

#[derive(Debug, Clone)]
pub struct SummaryOptions {
    /// Word budget per summary.
    pub limit: usize,
    /// Checked once per document.
    pub cancel: Option<CancelToken>,
}

impl Default for SummaryOptions {
    fn default() -> Self {
        Self {
            limit: DEFAULT_SUMMARY_LIMIT,
            cancel: None,
        }
    }
}

/// All files below `root` that `extractor` supports, in sorted walk order.
pub fn discover_supported(root: &Path, extractor: &dyn TextExtractor) -> Result<Vec<PathBuf>> {
    validate_root(root)?;

    let walker = jwalk::WalkDir::new(root)
        .skip_hidden(false)
        .follow_links(false)
        .sort(true);

    let mut found = Vec::new();
    for entry_result in walker {
        let entry = match entry_result {
            Ok(e) => e,
            Err(err) => {
                debug!("Skipping unreadable entry during discovery: {err}");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if extractor.supports(&path) {
            found.push(path);
        }
    }
    Ok(found)
}

/// Summarise every supported document under `root`.
///
/// A document that fails to extract or summarise is recorded in
/// [`SummaryBatch::failures`] and the batch carries on.
pub fn summarize_folder(
    root: &Path,
    extractor: &dyn TextExtractor,
    summarizer: &dyn Summarizer,
    options: &SummaryOptions,
) -> Result<SummaryBatch> {
    let start = Instant::now();
    let documents = discover_supported(root, extractor)?;
    info!(
        "Found {} supported documents under {}",
        documents.len(),
        root.display()
    );

    let mut batch = SummaryBatch {
        discovered: documents.len(),
        ..SummaryBatch::default()
    };

    for (i, path) in documents.iter().enumerate() {
        if options.cancel.as_ref().is_some_and(|t| t.is_cancelled()) {
            return Err(TraversalError::Cancelled);
        }
        debug!("Summarising {}/{}: {}", i + 1, documents.len(), path.display());

        let outcome = extractor
            .extract_text(path)
            .map_err(|e| e.to_string())
            .and_then(|text| {
                summarizer
                    .summarize(&text, options.limit)
                    .map_err(|e| e.to_string())
            });

        match outcome {
            Ok(summary) => batch.summaries.push(FileSummary {
                file_name: path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default(),
                relative_path: path.strip_prefix(root).unwrap_or(path).to_path_buf(),
                summary,
            }),
            Err(message) => {
                warn!("Failed to summarise {}: {message}", path.display());
                batch.failures.push(SummaryFailure {
                    path: path.clone(),
                    message,
                });
            }
        }
    }

    info!(
        "Summarised {} of {} documents in {:?}",
        batch.summaries.len(),
        batch.discovered,
        start.elapsed()
    );
    Ok(batch)
}
