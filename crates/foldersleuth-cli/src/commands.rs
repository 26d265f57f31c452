/// Subcommand handlers: run the core operation, then hand the results to a
/// [`ReportSink`] chosen from the output format.
use crate::args::{AnalyzeArgs, ListArgs, OutputArgs, OutputFormat, SummarizeArgs};
use crate::config::AppConfig;
use crate::render::ConsoleSink;
use anyhow::{Context, Result};
use foldersleuth_core::analysis::{category_breakdown, find_stale_files, largest_files};
use foldersleuth_core::export::{CsvSink, JsonSink, ReportSink};
use foldersleuth_core::scanner::progress::ScanProgress;
use foldersleuth_core::scanner::{list_items, start_scan, AggregateOptions, InventoryOptions};
use foldersleuth_core::summary::{
    summarize_folder, LeadSummarizer, PlainTextExtractor, SummaryOptions,
};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::time::{Duration, SystemTime};
use tracing::{debug, info, warn};

/// Upper bound on per-entry errors kept for the end-of-scan log.
const MAX_RECORDED_ERRORS: usize = 1_000;

/// Running view of a background scan, fed from its progress channel.
#[derive(Debug, Default)]
pub struct ScanMonitor {
    pub files_found: u64,
    pub dirs_found: u64,
    pub total_size: u64,
    pub current_path: PathBuf,
    pub error_count: u64,
    pub errors: Vec<(PathBuf, String)>,
    pub duration: Option<Duration>,
    pub was_cancelled: bool,
}

impl ScanMonitor {
    /// Apply one progress message. Returns `true` on a terminal message.
    pub fn observe(&mut self, msg: ScanProgress) -> bool {
        match msg {
            ScanProgress::Started { root, parallel } => {
                debug!("Scan of {} started (parallel: {parallel})", root.display());
                false
            }
            ScanProgress::Update {
                files_found,
                dirs_found,
                total_size,
                current_path,
            } => {
                self.files_found = files_found;
                self.dirs_found = dirs_found;
                self.total_size = total_size;
                debug!(
                    "{files_found} files, {dirs_found} dirs so far; at {}",
                    current_path.display()
                );
                self.current_path = current_path;
                false
            }
            ScanProgress::Error { path, message } => {
                self.error_count += 1;
                if self.errors.len() < MAX_RECORDED_ERRORS {
                    self.errors.push((path, message));
                }
                false
            }
            ScanProgress::Complete {
                duration,
                inaccessible_count,
            } => {
                self.duration = Some(duration);
                self.error_count = self.error_count.max(inaccessible_count);
                true
            }
            ScanProgress::Cancelled => {
                self.was_cancelled = true;
                true
            }
        }
    }
}

/// Open the destination named by `--output`, or stdout.
fn open_output(output: &OutputArgs) -> Result<Box<dyn Write>> {
    match &output.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Cannot create output file {}", path.display()))?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(BufWriter::new(io::stdout().lock()))),
    }
}

fn make_sink(format: OutputFormat, writer: Box<dyn Write>, tree: bool) -> Box<dyn ReportSink> {
    match format {
        OutputFormat::Text => Box::new(ConsoleSink::new(writer).with_tree(tree)),
        OutputFormat::Json => Box::new(JsonSink::new(writer)),
        OutputFormat::Csv => Box::new(CsvSink::new(writer)),
    }
}

pub fn analyze(args: &AnalyzeArgs, config: &AppConfig) -> Result<()> {
    let mut options = AggregateOptions::default()
        .with_tie_break(config.scan.tie_break)
        .with_parallel(config.scan.parallel);
    options.threads = config.scan.threads;
    if let Some(secs) = config.scan.timeout_seconds {
        options = options.with_timeout(Duration::from_secs(secs));
    }

    let handle = start_scan(args.path.clone(), options).context("Failed to start scan thread")?;
    let mut monitor = ScanMonitor::default();
    for msg in handle.progress_rx.iter() {
        if monitor.observe(msg) {
            break;
        }
    }

    let report = handle
        .wait()
        .with_context(|| format!("Analysis of {} failed", args.path.display()))?;
    for (path, message) in &monitor.errors {
        debug!("Inaccessible: {}: {message}", path.display());
    }
    if report.inaccessible_count > 0 {
        warn!(
            "{} entries under {} could not be read",
            report.inaccessible_count,
            args.path.display()
        );
    }
    if let Some(duration) = monitor.duration {
        info!("Analysis finished in {duration:?}");
    }

    let mut sink = make_sink(config.output.format, open_output(&args.output)?, false);
    sink.write_report(&report)?;
    if args.categories {
        sink.write_categories(&category_breakdown(&report))?;
    }
    sink.finish()?;
    Ok(())
}

pub fn list(args: &ListArgs, config: &AppConfig) -> Result<()> {
    let options = InventoryOptions {
        max_depth: args.max_depth,
        parallel: config.scan.parallel,
    };
    let items = list_items(&args.path, &options)
        .with_context(|| format!("Listing of {} failed", args.path.display()))?;
    info!("Listed {} items under {}", items.len(), args.path.display());

    let mut sink = make_sink(config.output.format, open_output(&args.output)?, args.tree);
    sink.write_items(&items)?;
    if let Some(n) = args.top {
        sink.write_largest(&largest_files(&items, n))?;
    }
    if let Some(days) = args.stale_days {
        let stale = find_stale_files(&items, days, config.output.stale_limit, SystemTime::now());
        sink.write_stale(&stale)?;
    }
    sink.finish()?;
    Ok(())
}

pub fn summarize(args: &SummarizeArgs, config: &AppConfig) -> Result<()> {
    let extractor = PlainTextExtractor::new(
        config.summary.extensions.iter().map(String::as_str),
        config.summary.max_chars,
    );
    let options = SummaryOptions {
        limit: config.summary.limit,
        ..SummaryOptions::default()
    };
    let batch = summarize_folder(&args.path, &extractor, &LeadSummarizer, &options)
        .with_context(|| format!("Summarising {} failed", args.path.display()))?;
    if !batch.failures.is_empty() {
        warn!("{} documents could not be summarised", batch.failures.len());
    }

    let mut sink = make_sink(config.output.format, open_output(&args.output)?, false);
    sink.write_summaries(&batch)?;
    sink.finish()?;
    Ok(())
}
