/// CSV output.
///
/// A report becomes a `field,value` block of its scalars followed by its
/// extension table, a listing becomes one row per item, and a summary batch
/// becomes the `File Name, Relative Path, Summary` table. Each table starts
/// with its own header row.
use super::ReportSink;
use crate::analysis::{extension_shares, CategoryStats, LargestFile, StaleFile};
use crate::error::ExportError;
use crate::model::{AggregateReport, ItemRecord, ItemStamp};
use crate::summary::SummaryBatch;
use chrono::{DateTime, Utc};
use std::io::Write;
use std::time::SystemTime;

pub struct CsvSink<W: Write> {
    writer: ::csv::Writer<W>,
}

impl<W: Write> CsvSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: ::csv::WriterBuilder::new()
                .flexible(true)
                .from_writer(writer),
        }
    }

    /// Flush and return the underlying writer.
    pub fn into_inner(self) -> Result<W, ExportError> {
        self.writer
            .into_inner()
            .map_err(|e| ExportError::Io(e.into_error()))
    }
}

fn rfc3339(time: Option<SystemTime>) -> String {
    time.map(|t| DateTime::<Utc>::from(t).to_rfc3339())
        .unwrap_or_default()
}

impl<W: Write> ReportSink for CsvSink<W> {
    fn write_report(&mut self, report: &AggregateReport) -> Result<(), ExportError> {
        let stamp_path = |stamp: Option<&ItemStamp>| {
            stamp
                .map(|s| s.path.to_string_lossy().into_owned())
                .unwrap_or_default()
        };
        let stamp_time = |stamp: Option<&ItemStamp>| rfc3339(stamp.map(|s| s.modified));

        let scalars = [
            ("total_size", report.total_size.to_string()),
            ("file_count", report.file_count.to_string()),
            ("dir_count", report.dir_count.to_string()),
            ("inaccessible_count", report.inaccessible_count.to_string()),
            ("newest_item", stamp_path(report.newest_item.as_ref())),
            ("newest_modified", stamp_time(report.newest_item.as_ref())),
            ("oldest_item", stamp_path(report.oldest_item.as_ref())),
            ("oldest_modified", stamp_time(report.oldest_item.as_ref())),
        ];
        self.writer.write_record(["field", "value"])?;
        for (field, value) in &scalars {
            self.writer.write_record([*field, value.as_str()])?;
        }

        self.writer
            .write_record(["extension", "label", "count", "percent"])?;
        for share in extension_shares(report) {
            self.writer.write_record([
                share.extension.as_str(),
                share.label.as_str(),
                share.count.to_string().as_str(),
                format!("{:.2}", share.percent).as_str(),
            ])?;
        }
        Ok(())
    }

    fn write_items(&mut self, items: &[ItemRecord]) -> Result<(), ExportError> {
        self.writer.write_record([
            "name",
            "relative_path",
            "kind",
            "extension",
            "size",
            "modified",
            "created",
            "entry_count",
            "mime_type",
            "error",
        ])?;
        for item in items {
            self.writer.write_record([
                item.name.as_str(),
                &*item.relative_path.to_string_lossy(),
                item.kind.label(),
                item.extension.as_str(),
                item.size.to_string().as_str(),
                rfc3339(item.modified).as_str(),
                rfc3339(item.created).as_str(),
                item.entry_count.map(|n| n.to_string()).unwrap_or_default().as_str(),
                item.mime_type.as_deref().unwrap_or(""),
                item.error.as_deref().unwrap_or(""),
            ])?;
        }
        Ok(())
    }

    fn write_summaries(&mut self, batch: &SummaryBatch) -> Result<(), ExportError> {
        self.writer
            .write_record(["File Name", "Relative Path", "Summary"])?;
        for summary in &batch.summaries {
            self.writer.write_record([
                summary.file_name.as_str(),
                &*summary.relative_path.to_string_lossy(),
                summary.summary.as_str(),
            ])?;
        }
        Ok(())
    }

    fn write_categories(&mut self, categories: &[CategoryStats]) -> Result<(), ExportError> {
        self.writer.write_record(["category", "count", "percent"])?;
        for stats in categories {
            self.writer.write_record([
                stats.category.label(),
                stats.file_count.to_string().as_str(),
                format!("{:.2}", stats.percent).as_str(),
            ])?;
        }
        Ok(())
    }

    fn write_largest(&mut self, files: &[LargestFile]) -> Result<(), ExportError> {
        self.writer.write_record(["largest_file", "size"])?;
        for file in files {
            self.writer.write_record([
                &*file.relative_path.to_string_lossy(),
                file.size.to_string().as_str(),
            ])?;
        }
        Ok(())
    }

    fn write_stale(&mut self, files: &[StaleFile]) -> Result<(), ExportError> {
        self.writer
            .write_record(["stale_file", "size", "last_modified", "age_days"])?;
        for file in files {
            self.writer.write_record([
                &*file.path.to_string_lossy(),
                file.size.to_string().as_str(),
                rfc3339(Some(file.last_modified)).as_str(),
                file.age_days.to_string().as_str(),
            ])?;
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<(), ExportError> {
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ItemKind, PartialReport, TieBreak};
    use crate::summary::FileSummary;
    use std::path::{Path, PathBuf};
    use std::time::Duration;

    #[test]
    fn report_becomes_scalars_then_extension_table() {
        let mut partial = PartialReport::new(TieBreak::FirstSeen);
        partial.record_file(Path::new("/r/a.txt"), 100, None);
        partial.record_file(Path::new("/r/b.txt"), 150, None);
        partial.record_file(Path::new("/r/LICENSE"), 50, None);
        partial.record_dir();

        let mut sink = CsvSink::new(Vec::new());
        sink.write_report(&partial.finish()).unwrap();
        let out = String::from_utf8(sink.into_inner().unwrap()).unwrap();

        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "field,value");
        assert_eq!(lines[1], "total_size,300");
        assert_eq!(lines[2], "file_count,3");
        assert_eq!(lines[3], "dir_count,1");
        assert_eq!(lines[4], "inaccessible_count,0");
        assert_eq!(lines[5], "newest_item,");
        assert_eq!(lines[8], "oldest_modified,");
        assert_eq!(lines[9], "extension,label,count,percent");
        assert_eq!(lines[10], ".txt,.txt,2,66.67");
        assert_eq!(lines[11], ",No extension,1,33.33");
    }

    #[test]
    fn report_scalars_carry_newest_and_oldest() {
        let old = SystemTime::UNIX_EPOCH + Duration::from_secs(1_000_000_000);
        let new = SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000);
        let mut partial = PartialReport::new(TieBreak::FirstSeen);
        partial.record_file(Path::new("/r/old.txt"), 1, Some(old));
        partial.record_file(Path::new("/r/new.txt"), 1, Some(new));

        let mut sink = CsvSink::new(Vec::new());
        sink.write_report(&partial.finish()).unwrap();
        let out = String::from_utf8(sink.into_inner().unwrap()).unwrap();

        assert!(out.contains("newest_item,/r/new.txt\n"));
        assert!(out.contains("newest_modified,2023-11-14T22:13:20+00:00\n"));
        assert!(out.contains("oldest_item,/r/old.txt\n"));
        assert!(out.contains("oldest_modified,2001-09-09T01:46:40+00:00\n"));
    }

    #[test]
    fn items_carry_mime_type_column() {
        let item = ItemRecord {
            name: "logo.png".into(),
            path: PathBuf::from("/r/img/logo.png"),
            relative_path: PathBuf::from("img/logo.png"),
            depth: 2,
            kind: ItemKind::File,
            extension: ".png".into(),
            size: 70,
            modified: None,
            created: None,
            mime_type: Some("image/png".into()),
            entry_count: None,
            error: None,
        };

        let mut sink = CsvSink::new(Vec::new());
        sink.write_items(&[item]).unwrap();
        let out = String::from_utf8(sink.into_inner().unwrap()).unwrap();

        assert_eq!(
            out,
            "name,relative_path,kind,extension,size,modified,created,entry_count,mime_type,error\n\
             logo.png,img/logo.png,File,.png,70,,,,image/png,\n"
        );
    }

    #[test]
    fn summaries_use_document_table_headers() {
        let batch = SummaryBatch {
            discovered: 1,
            summaries: vec![FileSummary {
                file_name: "notes.txt".into(),
                relative_path: PathBuf::from("sub/notes.txt"),
                summary: "Short, with a comma.".into(),
            }],
            failures: Vec::new(),
        };

        let mut sink = CsvSink::new(Vec::new());
        sink.write_summaries(&batch).unwrap();
        let out = String::from_utf8(sink.into_inner().unwrap()).unwrap();

        assert_eq!(
            out,
            "File Name,Relative Path,Summary\nnotes.txt,sub/notes.txt,\"Short, with a comma.\"\n"
        );
    }
}
