/// FolderSleuth Core — aggregation, inventory, analysis and summaries.
///
/// This crate contains all business logic with zero frontend dependencies.
/// It is designed to be reusable across different frontends (CLI, GUI, TUI).
///
/// # Modules
///
/// - [`model`] — Report value objects, item records and size formatting.
/// - [`scanner`] — Recursive statistics aggregation, background scans and item inventory.
/// - [`analysis`] — Post-scan views (extension shares, categories, largest and stale files).
/// - [`summary`] — Document discovery, text extraction and summarisation seams.
/// - [`export`] — Pluggable structured output sinks (JSON, CSV).
pub mod analysis;
pub mod error;
pub mod export;
pub mod model;
pub mod scanner;
pub mod summary;

pub use error::{Result, TraversalError};
pub use model::{AggregateReport, ItemRecord, TieBreak};
pub use scanner::{aggregate, list_items, start_scan, AggregateOptions, CancelToken};
