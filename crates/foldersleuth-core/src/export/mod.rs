/// Export sinks — pluggable destinations for reports, listings and summaries.
///
/// A frontend picks one [`ReportSink`] and hands it whatever it produced.
/// The structured sinks here ([`JsonSink`], [`CsvSink`]) write plain data;
/// human-oriented rendering belongs to the frontend's own sink. Every sink
/// handles every section, so no command option is silently dropped by a
/// format.
pub mod csv;
pub mod json;

pub use self::csv::CsvSink;
pub use self::json::JsonSink;

use crate::analysis::{CategoryStats, LargestFile, StaleFile};
use crate::error::ExportError;
use crate::model::{AggregateReport, ItemRecord};
use crate::summary::SummaryBatch;

/// Destination for FolderSleuth output.
///
/// A command writes one or more sections, then calls [`finish`](Self::finish)
/// exactly once.
pub trait ReportSink {
    fn write_report(&mut self, report: &AggregateReport) -> Result<(), ExportError>;

    fn write_items(&mut self, items: &[ItemRecord]) -> Result<(), ExportError>;

    fn write_summaries(&mut self, batch: &SummaryBatch) -> Result<(), ExportError>;

    fn write_categories(&mut self, categories: &[CategoryStats]) -> Result<(), ExportError>;

    fn write_largest(&mut self, files: &[LargestFile]) -> Result<(), ExportError>;

    fn write_stale(&mut self, files: &[StaleFile]) -> Result<(), ExportError>;

    /// Flush buffered output. Called once when the command is done.
    fn finish(&mut self) -> Result<(), ExportError> {
        Ok(())
    }
}
