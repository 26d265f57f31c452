/// Human-readable console rendering.
///
/// [`ConsoleSink`] is the text-format [`ReportSink`]: aligned tables with
/// formatted sizes and local timestamps, or an indented tree outline for
/// item listings.
use chrono::{DateTime, Local};
use foldersleuth_core::analysis::{extension_shares, CategoryStats, LargestFile, StaleFile};
use foldersleuth_core::error::ExportError;
use foldersleuth_core::export::ReportSink;
use foldersleuth_core::model::size::{format_count, format_size};
use foldersleuth_core::model::{ItemKind, ItemStamp};
use foldersleuth_core::summary::SummaryBatch;
use foldersleuth_core::{AggregateReport, ItemRecord};
use std::io::Write;
use std::time::SystemTime;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Indent per depth level in the tree outline.
const TREE_INDENT: &str = "    ";

/// Local-time rendering of a timestamp, `-` when absent.
pub fn format_timestamp(time: Option<SystemTime>) -> String {
    match time {
        Some(t) => DateTime::<Local>::from(t).format(TIMESTAMP_FORMAT).to_string(),
        None => "-".to_string(),
    }
}

pub struct ConsoleSink<W: Write> {
    writer: W,
    /// Render item listings as an outline rather than a table.
    tree: bool,
}

impl<W: Write> ConsoleSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            tree: false,
        }
    }

    pub fn with_tree(mut self, tree: bool) -> Self {
        self.tree = tree;
        self
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn heading(&mut self, title: &str) -> Result<(), ExportError> {
        writeln!(self.writer)?;
        writeln!(self.writer, "{title}")?;
        writeln!(self.writer, "{}", "-".repeat(title.chars().count()))?;
        Ok(())
    }

    fn field(&mut self, label: &str, value: &str) -> Result<(), ExportError> {
        writeln!(self.writer, "  {label:<14} {value}")?;
        Ok(())
    }

    fn stamp(&mut self, label: &str, stamp: Option<&ItemStamp>) -> Result<(), ExportError> {
        let value = match stamp {
            Some(s) => format!(
                "{} ({})",
                s.path.display(),
                format_timestamp(Some(s.modified))
            ),
            None => "-".to_string(),
        };
        self.field(label, &value)
    }

    fn write_outline(&mut self, items: &[ItemRecord]) -> Result<(), ExportError> {
        for item in items {
            let indent = TREE_INDENT.repeat(item.depth.saturating_sub(1));
            match item.kind {
                ItemKind::Folder => writeln!(self.writer, "{indent}{}/", item.name)?,
                _ => writeln!(
                    self.writer,
                    "{indent}{} ({})",
                    item.name,
                    format_size(item.size)
                )?,
            }
            if let Some(err) = &item.error {
                writeln!(self.writer, "{indent}{TREE_INDENT}! {err}")?;
            }
        }
        Ok(())
    }

    fn write_table(&mut self, items: &[ItemRecord]) -> Result<(), ExportError> {
        writeln!(
            self.writer,
            "{:<48} {:<6} {:>10} {:<19} {:<19} {:>7} {}",
            "Path", "Type", "Size", "Modified", "Created", "Entries", "MIME"
        )?;
        for item in items {
            let size = match item.kind {
                ItemKind::Folder => "-".to_string(),
                _ => format_size(item.size),
            };
            let entries = item
                .entry_count
                .map(format_count)
                .unwrap_or_else(|| "-".to_string());
            writeln!(
                self.writer,
                "{:<48} {:<6} {:>10} {:<19} {:<19} {:>7} {}",
                item.relative_path.display(),
                item.kind.label(),
                size,
                format_timestamp(item.modified),
                format_timestamp(item.created),
                entries,
                item.mime_type.as_deref().unwrap_or("-")
            )?;
            if let Some(err) = &item.error {
                writeln!(self.writer, "    ! {err}")?;
            }
        }
        Ok(())
    }
}

impl<W: Write> ReportSink for ConsoleSink<W> {
    fn write_report(&mut self, report: &AggregateReport) -> Result<(), ExportError> {
        self.heading("Folder summary")?;
        self.field("Total items", &format_count(report.total_items()))?;
        self.field("Files", &format_count(report.file_count))?;
        self.field("Directories", &format_count(report.dir_count))?;
        self.field("Total size", &format_size(report.total_size))?;
        self.field("Inaccessible", &format_count(report.inaccessible_count))?;
        self.stamp("Newest item", report.newest_item.as_ref())?;
        self.stamp("Oldest item", report.oldest_item.as_ref())?;

        if report.file_count == 0 {
            return Ok(());
        }
        self.heading("File types")?;
        for share in extension_shares(report) {
            writeln!(
                self.writer,
                "  {:<16} {:>10} {:>6.1}%",
                share.label,
                format_count(share.count),
                share.percent
            )?;
        }
        Ok(())
    }

    fn write_items(&mut self, items: &[ItemRecord]) -> Result<(), ExportError> {
        let files = items.iter().filter(|i| i.is_file()).count() as u64;
        let folders = items
            .iter()
            .filter(|i| i.kind == ItemKind::Folder)
            .count() as u64;
        self.heading(&format!(
            "Items ({} files, {} folders)",
            format_count(files),
            format_count(folders)
        ))?;
        if self.tree {
            self.write_outline(items)
        } else {
            self.write_table(items)
        }
    }

    fn write_summaries(&mut self, batch: &SummaryBatch) -> Result<(), ExportError> {
        self.heading(&format!(
            "Summaries ({} of {} documents)",
            batch.summaries.len(),
            batch.discovered
        ))?;
        for summary in &batch.summaries {
            writeln!(self.writer)?;
            writeln!(self.writer, "{}", summary.relative_path.display())?;
            writeln!(self.writer, "  {}", summary.summary)?;
        }
        if !batch.failures.is_empty() {
            self.heading("Failed documents")?;
            for failure in &batch.failures {
                writeln!(
                    self.writer,
                    "  {}: {}",
                    failure.path.display(),
                    failure.message
                )?;
            }
        }
        Ok(())
    }

    fn write_categories(&mut self, categories: &[CategoryStats]) -> Result<(), ExportError> {
        self.heading("Categories")?;
        for stats in categories {
            writeln!(
                self.writer,
                "  {:<16} {:>10} {:>6.1}%",
                stats.category.label(),
                format_count(stats.file_count),
                stats.percent
            )?;
        }
        Ok(())
    }

    fn write_largest(&mut self, files: &[LargestFile]) -> Result<(), ExportError> {
        self.heading("Largest files")?;
        for file in files {
            writeln!(
                self.writer,
                "  {:>10}  {}",
                format_size(file.size),
                file.relative_path.display()
            )?;
        }
        Ok(())
    }

    fn write_stale(&mut self, files: &[StaleFile]) -> Result<(), ExportError> {
        self.heading("Stale files")?;
        if files.is_empty() {
            writeln!(self.writer, "  none")?;
        }
        for file in files {
            writeln!(
                self.writer,
                "  {:>10}  {:>5} days  {}",
                format_size(file.size),
                file.age_days,
                file.path.display()
            )?;
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<(), ExportError> {
        self.writer.flush()?;
        Ok(())
    }
}
