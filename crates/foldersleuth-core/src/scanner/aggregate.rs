/// Recursive folder statistics aggregation.
///
/// Each directory level lists its entries sorted by name, records its own
/// regular files, aggregates every subdirectory into a separate
/// [`PartialReport`] and folds those children back in entry order. Because
/// the fold order never depends on scheduling, sequential and parallel walks
/// produce identical reports under either [`TieBreak`](crate::model::TieBreak)
/// policy.
///
/// # Failure policy
///
/// Only the root is allowed to fail the whole call. Anything below it that
/// cannot be read (an unlistable subdirectory, an entry that vanished mid-walk,
/// failing metadata) is counted in `inaccessible_count` and skipped.
/// Symlinks and special files are skipped without touching any counter.
use crate::error::{Result, TraversalError};
use crate::model::{AggregateReport, PartialReport};
use crate::scanner::progress::ScanProgress;
use crate::scanner::AggregateOptions;
use rayon::prelude::*;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Instant, SystemTime};
use tracing::{debug, info, trace};

/// Send a progress update every this many completed directories.
const PROGRESS_EVERY_DIRS: u64 = 64;

/// One classified entry of a directory listing, in name order.
enum Slot {
    File {
        path: PathBuf,
        size: u64,
        modified: Option<SystemTime>,
    },
    Dir(PathBuf),
}

/// Shared, read-mostly state for one aggregation call.
///
/// The counters only feed progress messages; report totals travel through
/// the returned partials.
struct Walk<'a> {
    options: &'a AggregateOptions,
    dirs_done: AtomicU64,
    files_seen: AtomicU64,
    bytes_seen: AtomicU64,
}

/// Aggregate statistics for the tree rooted at `root`.
///
/// Fails with [`TraversalError::InvalidRoot`] if `root` does not exist, is
/// not a directory or cannot be listed, and with `Cancelled` /
/// `DeadlineExceeded` when the options' stop conditions trip. No partial
/// report is returned in either case.
pub fn aggregate(root: &Path, options: &AggregateOptions) -> Result<AggregateReport> {
    validate_root(root)?;

    let start = Instant::now();
    info!(
        "Aggregating {} ({})",
        root.display(),
        if options.parallel { "parallel" } else { "sequential" }
    );

    let walk = Walk::new(options);

    let partial = if options.parallel {
        let threads = options.threads.unwrap_or_else(num_cpus::get).max(1);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("foldersleuth-walker-{i}"))
            .build()?;
        pool.install(|| walk.directory(root, true))?
    } else {
        walk.directory(root, true)?
    };

    let report = partial.finish();
    info!(
        "Aggregated {} files, {} dirs, {} bytes ({} inaccessible) in {:?}",
        report.file_count,
        report.dir_count,
        report.total_size,
        report.inaccessible_count,
        start.elapsed()
    );
    Ok(report)
}

/// Check that `root` exists and is a directory.
pub(crate) fn validate_root(root: &Path) -> Result<()> {
    let meta = fs::metadata(root).map_err(|err| {
        let reason = if err.kind() == io::ErrorKind::NotFound {
            "does not exist"
        } else {
            "cannot be read"
        };
        TraversalError::invalid_root(root, reason, Some(err))
    })?;
    if !meta.is_dir() {
        return Err(TraversalError::invalid_root(root, "not a directory", None));
    }
    Ok(())
}

impl<'a> Walk<'a> {
    fn new(options: &'a AggregateOptions) -> Self {
        Self {
            options,
            dirs_done: AtomicU64::new(0),
            files_seen: AtomicU64::new(0),
            bytes_seen: AtomicU64::new(0),
        }
    }

    /// Aggregate one directory and everything below it.
    fn directory(&self, dir: &Path, is_root: bool) -> Result<PartialReport> {
        self.checkpoint()?;

        let mut partial = PartialReport::new(self.options.tie_break);

        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(err) if is_root => {
                return Err(TraversalError::invalid_root(dir, "cannot be read", Some(err)));
            }
            Err(err) => {
                self.entry_failed(dir, &err);
                partial.record_inaccessible();
                return Ok(partial);
            }
        };

        let mut listing = Vec::new();
        for entry in entries {
            match entry {
                Ok(entry) => listing.push(entry),
                Err(err) => {
                    self.entry_failed(dir, &err);
                    partial.record_inaccessible();
                }
            }
        }
        listing.sort_by_key(|entry| entry.file_name());

        let mut slots = Vec::with_capacity(listing.len());
        for entry in listing {
            let path = entry.path();
            // DirEntry::file_type does not follow symlinks.
            let file_type = match entry.file_type() {
                Ok(t) => t,
                Err(err) => {
                    self.entry_failed(&path, &err);
                    partial.record_inaccessible();
                    continue;
                }
            };

            if file_type.is_file() {
                match entry.metadata() {
                    Ok(meta) => slots.push(Slot::File {
                        path,
                        size: meta.len(),
                        modified: meta.modified().ok(),
                    }),
                    Err(err) => {
                        self.entry_failed(&path, &err);
                        partial.record_inaccessible();
                    }
                }
            } else if file_type.is_dir() {
                slots.push(Slot::Dir(path));
            } else {
                trace!("Skipping special entry {}", path.display());
            }
        }

        let subdirs: Vec<&Path> = slots
            .iter()
            .filter_map(|slot| match slot {
                Slot::Dir(path) => Some(path.as_path()),
                Slot::File { .. } => None,
            })
            .collect();

        let children: Vec<PartialReport> = if self.options.parallel {
            subdirs
                .par_iter()
                .map(|path| self.directory(path, false))
                .collect::<Result<_>>()?
        } else {
            subdirs
                .iter()
                .map(|path| self.directory(path, false))
                .collect::<Result<_>>()?
        };

        // Fold in name order so ties resolve the same way regardless of
        // which child finished first.
        let mut children = children.into_iter();
        for slot in slots {
            match slot {
                Slot::File {
                    path,
                    size,
                    modified,
                } => {
                    self.files_seen.fetch_add(1, Ordering::Relaxed);
                    self.bytes_seen.fetch_add(size, Ordering::Relaxed);
                    partial.record_file(&path, size, modified);
                }
                Slot::Dir(_) => {
                    partial.record_dir();
                    if let Some(child) = children.next() {
                        partial.fold(child);
                    }
                }
            }
        }

        self.directory_done(dir);
        Ok(partial)
    }

    /// Honour cancellation and the deadline. Checked once per directory.
    fn checkpoint(&self) -> Result<()> {
        if self
            .options
            .cancel
            .as_ref()
            .is_some_and(|token| token.is_cancelled())
        {
            return Err(TraversalError::Cancelled);
        }
        if self
            .options
            .deadline
            .is_some_and(|deadline| Instant::now() >= deadline)
        {
            return Err(TraversalError::DeadlineExceeded);
        }
        Ok(())
    }

    fn entry_failed(&self, path: &Path, err: &io::Error) {
        debug!("Skipping inaccessible entry {}: {err}", path.display());
        if let Some(tx) = &self.options.progress {
            let _ = tx.try_send(ScanProgress::Error {
                path: path.to_path_buf(),
                message: err.to_string(),
            });
        }
    }

    fn directory_done(&self, dir: &Path) {
        let done = self.dirs_done.fetch_add(1, Ordering::Relaxed) + 1;
        if done % PROGRESS_EVERY_DIRS != 0 {
            return;
        }
        if let Some(tx) = &self.options.progress {
            // Lossy: a slow consumer must never stall the walk.
            let _ = tx.try_send(ScanProgress::Update {
                files_found: self.files_seen.load(Ordering::Relaxed),
                dirs_found: done,
                total_size: self.bytes_seen.load(Ordering::Relaxed),
                current_path: dir.to_path_buf(),
            });
        }
    }
}
