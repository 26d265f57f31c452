/// Scan progress reporting — lightweight messages sent from the scan
/// thread to the frontend via a crossbeam channel.

use std::path::PathBuf;
use std::time::Duration;

/// Progress updates sent from the scan thread.
///
/// The finished report is returned by [`ScanHandle::wait`](super::ScanHandle::wait);
/// these messages carry only lightweight counters and status flags.
#[derive(Debug, Clone)]
pub enum ScanProgress {
    /// The scan thread has started walking `root`.
    Started { root: PathBuf, parallel: bool },
    /// Periodic update with running totals across the whole walk.
    Update {
        files_found: u64,
        dirs_found: u64,
        total_size: u64,
        current_path: PathBuf,
    },
    /// A non-fatal error (e.g. permission denied on one entry).
    Error { path: PathBuf, message: String },
    /// Aggregation completed successfully.
    Complete {
        duration: Duration,
        inaccessible_count: u64,
    },
    /// Scan was cancelled or ran past its deadline.
    Cancelled,
}
