/// Pretty-printed JSON output.
///
/// Sections are collected into one object keyed by section name and written
/// as a single document on [`finish`](ReportSink::finish), so the output of
/// any command parses as one JSON value.
use super::ReportSink;
use crate::analysis::{CategoryStats, LargestFile, StaleFile};
use crate::error::ExportError;
use crate::model::{AggregateReport, ItemRecord};
use crate::summary::SummaryBatch;
use serde::Serialize;
use serde_json::{Map, Value};
use std::io::Write;

pub struct JsonSink<W: Write> {
    writer: W,
    document: Map<String, Value>,
}

impl<W: Write> JsonSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            document: Map::new(),
        }
    }

    /// Return the underlying writer. Sections not yet finished are dropped.
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn section<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> Result<(), ExportError> {
        self.document
            .insert(key.to_string(), serde_json::to_value(value)?);
        Ok(())
    }
}

impl<W: Write> ReportSink for JsonSink<W> {
    fn write_report(&mut self, report: &AggregateReport) -> Result<(), ExportError> {
        self.section("report", report)
    }

    fn write_items(&mut self, items: &[ItemRecord]) -> Result<(), ExportError> {
        self.section("items", items)
    }

    fn write_summaries(&mut self, batch: &SummaryBatch) -> Result<(), ExportError> {
        self.section("summaries", batch)
    }

    fn write_categories(&mut self, categories: &[CategoryStats]) -> Result<(), ExportError> {
        self.section("categories", categories)
    }

    fn write_largest(&mut self, files: &[LargestFile]) -> Result<(), ExportError> {
        self.section("largest", files)
    }

    fn write_stale(&mut self, files: &[StaleFile]) -> Result<(), ExportError> {
        self.section("stale", files)
    }

    fn finish(&mut self) -> Result<(), ExportError> {
        let document = std::mem::take(&mut self.document);
        serde_json::to_writer_pretty(&mut self.writer, &document)?;
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::category_breakdown;
    use crate::model::{PartialReport, TieBreak};
    use std::path::{Path, PathBuf};

    fn sample_report() -> AggregateReport {
        let mut partial = PartialReport::new(TieBreak::FirstSeen);
        partial.record_file(Path::new("/r/a.txt"), 100, None);
        partial.record_dir();
        partial.finish()
    }

    #[test]
    fn report_round_trips_through_json() {
        let report = sample_report();

        let mut sink = JsonSink::new(Vec::new());
        sink.write_report(&report).unwrap();
        sink.finish().unwrap();
        let value: Value = serde_json::from_slice(&sink.into_inner()).unwrap();

        let back: AggregateReport = serde_json::from_value(value["report"].clone()).unwrap();
        assert_eq!(back, report);
    }

    #[test]
    fn every_section_lands_in_one_document() {
        let report = sample_report();
        let largest = vec![LargestFile {
            path: PathBuf::from("/r/a.txt"),
            relative_path: PathBuf::from("a.txt"),
            size: 100,
        }];

        let mut sink = JsonSink::new(Vec::new());
        sink.write_report(&report).unwrap();
        sink.write_categories(&category_breakdown(&report)).unwrap();
        sink.write_largest(&largest).unwrap();
        sink.write_stale(&[]).unwrap();
        sink.finish().unwrap();
        let bytes = sink.into_inner();

        // A single top-level value, not a stream of documents.
        let value: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["report"]["file_count"], 1);
        assert_eq!(value["categories"][0]["file_count"], 1);
        assert_eq!(value["largest"][0]["size"], 100);
        assert_eq!(value["stale"], Value::Array(Vec::new()));
    }

    #[test]
    fn unfinished_sink_writes_nothing() {
        let mut sink = JsonSink::new(Vec::new());
        sink.write_report(&sample_report()).unwrap();
        assert!(sink.into_inner().is_empty());
    }
}
