//! Public and internal types for the files API and pipeline.

use crate::utils::config::ExitCodes;

/// Lib-only options for [`list_dir`](crate::list_dir). Only the fields that apply when using the crate (no progress bar, no logging).
#[derive(Clone, Debug)]
pub struct FilesOpts {
    /// Ignore pattern (regex), matched against the entry name and its root-relative path.
    /// `None` → `FILES_IGNORE_PATTERN` or the built-in VCS pattern. `Some("")` disables ignoring.
    pub ignore: Option<String>,
    /// Only emit entries whose name matches this regex.
    pub match_pattern: Option<String>,
    /// Skip dot-prefixed entries (and everything below hidden directories).
    pub hidden: bool,
    /// Emit directories instead of files.
    pub directory_only: bool,
    /// Stop after this many results. `None` → unbounded.
    pub max_results: Option<usize>,
    /// Buffer everything and emit in byte-wise order.
    pub sort: bool,
    /// Emit absolute paths instead of paths relative to the base as given.
    pub absolute: bool,
    /// Walk with one pool task per directory instead of a single depth-first walk.
    pub parallel: bool,
    /// Pool size for the parallel walk. When None, derived from available threads and FD limit.
    pub num_threads: Option<usize>,
}

impl Default for FilesOpts {
    fn default() -> Self {
        Self {
            ignore: None,
            match_pattern: None,
            hidden: true,
            directory_only: false,
            max_results: None,
            sort: false,
            absolute: false,
            parallel: false,
            num_threads: None,
        }
    }
}

impl From<&FilesOpts> for Opts {
    fn from(o: &FilesOpts) -> Self {
        Opts {
            ignore: o.ignore.clone(),
            match_pattern: o.match_pattern.clone(),
            hidden: o.hidden,
            directory_only: o.directory_only,
            max_results: o.max_results,
            sort: o.sort,
            absolute: o.absolute,
            parallel: o.parallel,
            num_threads: o.num_threads,
            progress: false,
            verbose: false,
        }
    }
}

/// Full options (CLI). Use [`FilesOpts`] for lib.
#[derive(Clone, Debug)]
pub struct Opts {
    /// Ignore pattern. When None, uses [`default_ignore_pattern`](crate::utils::config::default_ignore_pattern).
    pub ignore: Option<String>,
    pub match_pattern: Option<String>,
    pub hidden: bool,
    pub directory_only: bool,
    pub max_results: Option<usize>,
    pub sort: bool,
    pub absolute: bool,
    pub parallel: bool,
    pub num_threads: Option<usize>,
    /// Show a running result counter on stderr.
    pub progress: bool,
    /// Debug logging.
    pub verbose: bool,
}

impl Default for Opts {
    fn default() -> Self {
        Opts::from(&FilesOpts::default())
    }
}

/// How a walk ended. Only [`WalkStatus::Interrupted`] and [`WalkStatus::Disconnected`] are failures.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WalkStatus {
    /// The whole tree was visited.
    Completed,
    /// The result ceiling was reached; the walk stopped early on purpose.
    Overflow,
    /// Cancellation was requested (Ctrl+C).
    Interrupted,
    /// The result receiver went away before the walk finished.
    Disconnected,
}

impl WalkStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, WalkStatus::Completed | WalkStatus::Overflow)
    }

    pub fn exit_code(&self) -> u8 {
        match self {
            WalkStatus::Completed | WalkStatus::Overflow => 0,
            WalkStatus::Interrupted => ExitCodes::INTERRUPTED,
            WalkStatus::Disconnected => ExitCodes::OUTPUT,
        }
    }
}
