//! Pipeline context: the resolved walk configuration plus the run state every walk worker shares.

use crossbeam_channel::{Receiver, Sender, bounded};
use std::ffi::{OsStr, OsString};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use crate::WalkStatus;
use crate::engine::filter::{PathFilter, Visit};

/// Whether a walk loop should keep going after an emit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Stop,
}

/// Shared context for the walk. Built once in `setup_pipeline` and handed to the walk thread
/// behind an `Arc`; pool tasks borrow it for the lifetime of the rayon scope.
pub struct PipelineContext {
    /// Canonical walk root.
    pub root: PathBuf,
    pub filter: PathFilter,
    pub directory_only: bool,
    /// Result ceiling; `usize::MAX` when unbounded.
    pub max_results: usize,
    /// Set from outside (Ctrl+C) to stop the walk.
    pub cancel: Arc<AtomicBool>,
    /// Unreadable entries: (path, error). Touched only on errors.
    pub skipped_paths: Mutex<Vec<(PathBuf, String)>>,
    emitted: AtomicUsize,
    overflowed: AtomicBool,
    disconnected: AtomicBool,
}

impl PipelineContext {
    pub fn new(
        root: PathBuf,
        filter: PathFilter,
        directory_only: bool,
        max_results: Option<usize>,
        cancel: Arc<AtomicBool>,
    ) -> Self {
        Self {
            root,
            filter,
            directory_only,
            max_results: max_results.unwrap_or(usize::MAX),
            cancel,
            skipped_paths: Mutex::new(Vec::new()),
            emitted: AtomicUsize::new(0),
            overflowed: AtomicBool::new(false),
            disconnected: AtomicBool::new(false),
        }
    }

    pub fn classify(&self, rel: &OsStr, is_dir: bool) -> Visit {
        self.filter.classify(rel, is_dir, self.directory_only)
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::Relaxed)
    }

    /// Cancelled, ceiling hit, or nobody is listening any more.
    pub fn should_stop(&self) -> bool {
        self.is_cancelled()
            || self.overflowed.load(Ordering::Relaxed)
            || self.disconnected.load(Ordering::Relaxed)
    }

    /// Count `rel` against the ceiling and send it. Blocks while the channel is full.
    ///
    /// The counter is a relaxed atomic and the stop flags are read without ordering, so
    /// under the concurrent walk the ceiling is best-effort: workers that already passed
    /// `should_stop` may still land a result. Callers get "about N", not "exactly N".
    pub fn emit(&self, tx: &Sender<OsString>, rel: OsString) -> Flow {
        if self.should_stop() {
            return Flow::Stop;
        }
        let n = self.emitted.fetch_add(1, Ordering::Relaxed) + 1;
        if n > self.max_results {
            self.overflowed.store(true, Ordering::Relaxed);
            return Flow::Stop;
        }
        if tx.send(rel).is_err() {
            self.disconnected.store(true, Ordering::Relaxed);
            return Flow::Stop;
        }
        Flow::Continue
    }

    /// Results handed to the channel so far (capped at the ceiling).
    pub fn emitted(&self) -> usize {
        self.emitted.load(Ordering::Relaxed).min(self.max_results)
    }

    pub fn record_skipped(&self, path: Option<PathBuf>, msg: String) {
        let path = path.unwrap_or_else(|| PathBuf::from("<no-path>"));
        if let Ok(mut skipped) = self.skipped_paths.lock() {
            skipped.push((path, msg));
        }
    }

    /// How the walk ended. Read after the walk thread has been joined.
    pub fn status(&self) -> WalkStatus {
        if self.is_cancelled() {
            WalkStatus::Interrupted
        } else if self.disconnected.load(Ordering::Relaxed) {
            WalkStatus::Disconnected
        } else if self.overflowed.load(Ordering::Relaxed) {
            WalkStatus::Overflow
        } else {
            WalkStatus::Completed
        }
    }
}

/// Handles returned by [`run_pipeline`](crate::pipeline::run_pipeline): drain `result_rx`,
/// then pass `walk_handle` and `ctx` to [`finish_pipeline`](crate::pipeline::finish_pipeline).
pub struct PipelineHandles {
    pub result_rx: Receiver<OsString>,
    pub walk_handle: JoinHandle<()>,
    pub ctx: Arc<PipelineContext>,
}

/// Bounded channel between walk workers and the result sink. Items are root-relative
/// slash paths, raw bytes included.
pub fn create_result_channel(cap: usize) -> (Sender<OsString>, Receiver<OsString>) {
    bounded::<OsString>(cap)
}
