/// Aggregate folder statistics.
///
/// A report is built bottom-up: every directory level owns a
/// [`PartialReport`], records its own files into it, folds in the finished
/// partials of its subdirectories, and hands the result to its parent. The
/// root's partial is finished into an immutable [`AggregateReport`].
use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Extension → number of files. Keys keep their leading dot and original
/// case; the empty key is the "no extension" bucket.
pub type ExtensionHistogram = BTreeMap<CompactString, u64>;

/// Histogram key used for files without an extension.
pub const NO_EXTENSION: &str = "";

/// How to choose between two items with identical modification times.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TieBreak {
    /// Keep the item met first in sorted depth-first order.
    #[default]
    FirstSeen,
    /// Keep the item with the lexicographically smaller path.
    PathOrder,
}

/// A path together with its last-modified time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStamp {
    pub path: PathBuf,
    #[serde(with = "crate::model::timestamp")]
    pub modified: SystemTime,
}

/// Statistics for a whole directory tree.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AggregateReport {
    /// Sum of the sizes of all regular files, in bytes.
    pub total_size: u64,
    pub file_count: u64,
    /// Subdirectories below the root (the root itself is not counted).
    pub dir_count: u64,
    /// Entries skipped because of a per-entry I/O failure.
    pub inaccessible_count: u64,
    pub extension_histogram: ExtensionHistogram,
    /// Least recently modified regular file. `None` when there are no files.
    pub oldest_item: Option<ItemStamp>,
    /// Most recently modified regular file. `None` when there are no files.
    pub newest_item: Option<ItemStamp>,
}

impl AggregateReport {
    /// Files plus directories.
    pub fn total_items(&self) -> u64 {
        self.file_count + self.dir_count
    }

    /// `true` if the tree contained no files and no directories.
    pub fn is_empty(&self) -> bool {
        self.total_items() == 0
    }

    /// Count for one histogram bucket (0 if absent).
    pub fn extension_count(&self, extension: &str) -> u64 {
        self.extension_histogram.get(extension).copied().unwrap_or(0)
    }
}

/// Running totals for one subtree.
///
/// Owned by exactly one traversal call. Never shared, and never touched
/// again once folded into its parent.
#[derive(Debug, Clone, Default)]
pub struct PartialReport {
    totals: AggregateReport,
    tie_break: TieBreak,
}

impl PartialReport {
    pub fn new(tie_break: TieBreak) -> Self {
        Self {
            totals: AggregateReport::default(),
            tie_break,
        }
    }

    /// Resume from a finished report, e.g. to fold separately aggregated
    /// subtrees together.
    pub fn from_report(report: AggregateReport, tie_break: TieBreak) -> Self {
        Self {
            totals: report,
            tie_break,
        }
    }

    /// Record one regular file.
    ///
    /// Files whose modification time is unavailable still count towards
    /// sizes and the histogram but never become oldest/newest.
    pub fn record_file(&mut self, path: &Path, size: u64, modified: Option<SystemTime>) {
        self.totals.file_count += 1;
        self.totals.total_size += size;

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();
        *self
            .totals
            .extension_histogram
            .entry(CompactString::new(extension_of(&name)))
            .or_insert(0) += 1;

        if let Some(modified) = modified {
            if challenges(
                self.totals.oldest_item.as_ref(),
                path,
                modified,
                Ordering::Less,
                self.tie_break,
            ) {
                self.totals.oldest_item = Some(ItemStamp {
                    path: path.to_path_buf(),
                    modified,
                });
            }
            if challenges(
                self.totals.newest_item.as_ref(),
                path,
                modified,
                Ordering::Greater,
                self.tie_break,
            ) {
                self.totals.newest_item = Some(ItemStamp {
                    path: path.to_path_buf(),
                    modified,
                });
            }
        }
    }

    /// Record one subdirectory (its contents are folded separately).
    pub fn record_dir(&mut self) {
        self.totals.dir_count += 1;
    }

    /// Record an entry that could not be read.
    pub fn record_inaccessible(&mut self) {
        self.totals.inaccessible_count += 1;
    }

    /// Fold a finished child subtree into this one.
    ///
    /// Counts and histogram buckets are summed. Oldest/newest follow the same
    /// strict-inequality rule as [`record_file`](Self::record_file), so the
    /// items already held here win ties under [`TieBreak::FirstSeen`].
    pub fn fold(&mut self, child: PartialReport) {
        let child = child.totals;
        self.totals.total_size += child.total_size;
        self.totals.file_count += child.file_count;
        self.totals.dir_count += child.dir_count;
        self.totals.inaccessible_count += child.inaccessible_count;

        for (extension, count) in child.extension_histogram {
            *self.totals.extension_histogram.entry(extension).or_insert(0) += count;
        }

        if let Some(stamp) = child.oldest_item {
            if challenges(
                self.totals.oldest_item.as_ref(),
                &stamp.path,
                stamp.modified,
                Ordering::Less,
                self.tie_break,
            ) {
                self.totals.oldest_item = Some(stamp);
            }
        }
        if let Some(stamp) = child.newest_item {
            if challenges(
                self.totals.newest_item.as_ref(),
                &stamp.path,
                stamp.modified,
                Ordering::Greater,
                self.tie_break,
            ) {
                self.totals.newest_item = Some(stamp);
            }
        }
    }

    /// Current totals without consuming the partial.
    pub fn totals(&self) -> &AggregateReport {
        &self.totals
    }

    pub fn finish(self) -> AggregateReport {
        self.totals
    }
}

/// Whether `(path, modified)` should replace `current`.
///
/// `wanted` is `Less` when tracking the oldest item and `Greater` for the
/// newest.
fn challenges(
    current: Option<&ItemStamp>,
    path: &Path,
    modified: SystemTime,
    wanted: Ordering,
    tie_break: TieBreak,
) -> bool {
    let Some(current) = current else {
        return true;
    };
    match modified.cmp(&current.modified) {
        Ordering::Equal => tie_break == TieBreak::PathOrder && path < current.path.as_path(),
        ord => ord == wanted,
    }
}

/// Extension of a file name, including the leading dot.
///
/// The suffix from the last `.` counts as the extension unless everything
/// before that dot is dots too, so `.bashrc` has none, `a.tar.gz` gives
/// `.gz` and `name.` gives `.`.
pub fn extension_of(name: &str) -> &str {
    match name.rfind('.') {
        Some(dot) if !name[..dot].chars().all(|c| c == '.') => &name[dot..],
        _ => NO_EXTENSION,
    }
}
