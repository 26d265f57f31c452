/// Scanner module — orchestrates filesystem traversal.
///
/// Provides:
/// - [`aggregate`] — recursive statistics fold, sequential or rayon-parallel.
/// - [`start_scan`] — the same aggregation on a background thread with
///   progress reporting and cancellation.
/// - [`list_items`] — flat `jwalk`-based item inventory.
pub mod aggregate;
pub mod inventory;
pub mod progress;

pub use aggregate::aggregate;
pub use inventory::{list_items, InventoryOptions};

use crate::error::{Result, TraversalError};
use crate::model::{AggregateReport, TieBreak};
use progress::ScanProgress;

use crossbeam_channel::{Receiver, Sender};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::info;

/// Shared stop flag. Clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request the traversal to stop at the next directory boundary.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Knobs for [`aggregate`] and [`start_scan`].
#[derive(Debug, Clone, Default)]
pub struct AggregateOptions {
    /// How oldest/newest ties are resolved.
    pub tie_break: TieBreak,
    /// Aggregate subdirectories on a rayon pool.
    pub parallel: bool,
    /// Pool size for parallel mode. Defaults to the number of CPUs.
    pub threads: Option<usize>,
    /// Checked once per directory.
    pub cancel: Option<CancelToken>,
    /// Checked once per directory.
    pub deadline: Option<Instant>,
    /// Receives `Update` and `Error` messages while walking.
    pub progress: Option<Sender<ScanProgress>>,
}

impl AggregateOptions {
    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Give up once `timeout` has elapsed from now.
    ///
    /// A timeout too far in the future to represent as an [`Instant`] means
    /// no deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.deadline = Instant::now().checked_add(timeout);
        self
    }
}

/// Maximum number of progress messages that may queue up in the channel.
///
/// Progress is sent with `try_send`, so a consumer that never drains the
/// channel only loses updates; it never blocks the walk.
pub const PROGRESS_CHANNEL_CAPACITY: usize = 4_096;

/// Handle to a running or completed background scan.
pub struct ScanHandle {
    /// Receiver for progress updates from the scan thread.
    pub progress_rx: Receiver<ScanProgress>,
    cancel: CancelToken,
    thread: thread::JoinHandle<Result<AggregateReport>>,
}

impl ScanHandle {
    /// Request the scan to stop as soon as possible.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Check whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// `true` once the scan thread has returned.
    pub fn is_finished(&self) -> bool {
        self.thread.is_finished()
    }

    /// Block until the scan finishes and return its result.
    pub fn wait(self) -> Result<AggregateReport> {
        self.thread
            .join()
            .unwrap_or(Err(TraversalError::WorkerPanicked))
    }
}

/// Start aggregating `root` on a background thread.
///
/// A cancel token already present in `options` is shared with the handle;
/// any progress sender is replaced by the handle's own channel.
pub fn start_scan(root: PathBuf, mut options: AggregateOptions) -> std::io::Result<ScanHandle> {
    let (progress_tx, progress_rx) =
        crossbeam_channel::bounded::<ScanProgress>(PROGRESS_CHANNEL_CAPACITY);
    let cancel = options.cancel.get_or_insert_with(CancelToken::new).clone();
    options.progress = Some(progress_tx.clone());

    let thread = thread::Builder::new()
        .name("foldersleuth-scanner".into())
        .spawn(move || {
            info!("Starting scan of {}", root.display());
            let _ = progress_tx.try_send(ScanProgress::Started {
                root: root.clone(),
                parallel: options.parallel,
            });

            let start = Instant::now();
            let result = aggregate(&root, &options);

            let terminal = match &result {
                Ok(report) => ScanProgress::Complete {
                    duration: start.elapsed(),
                    inaccessible_count: report.inaccessible_count,
                },
                Err(TraversalError::Cancelled | TraversalError::DeadlineExceeded) => {
                    ScanProgress::Cancelled
                }
                Err(err) => ScanProgress::Error {
                    path: root.clone(),
                    message: err.to_string(),
                },
            };
            let _ = progress_tx.try_send(terminal);
            result
        })?;

    Ok(ScanHandle {
        progress_rx,
        cancel,
        thread,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_timeout_sets_a_deadline() {
        let before = Instant::now();
        let options = AggregateOptions::default().with_timeout(Duration::from_secs(5));
        let deadline = options.deadline.expect("deadline must be set");
        assert!(deadline >= before + Duration::from_secs(5));
    }

    #[test]
    fn unrepresentable_timeout_means_no_deadline() {
        let options = AggregateOptions::default().with_timeout(Duration::from_secs(u64::MAX));
        assert!(options.deadline.is_none());
    }

    #[test]
    fn cancel_token_clones_share_the_flag() {
        let token = CancelToken::new();
        let clone = token.clone();
        assert!(!clone.is_cancelled());
        token.cancel();
        assert!(clone.is_cancelled());
    }
}
