//! Application configuration constants.
//! Names, defaults and tuning in one place.

use std::sync::OnceLock;

// ---- Package / names (from CARGO_PKG_NAME, cached) ----

/// Package-derived names: built once from `CARGO_PKG_NAME`, then cached.
pub struct PackagePaths {
    config_filename: String,
    ignore_env_key: String,
}

static PACKAGE_PATHS: OnceLock<PackagePaths> = OnceLock::new();

impl PackagePaths {
    /// Build and cache names from `CARGO_PKG_NAME`. Called once on first use.
    pub fn get() -> &'static PackagePaths {
        PACKAGE_PATHS.get_or_init(|| {
            let pkg = env!("CARGO_PKG_NAME");
            PackagePaths {
                config_filename: format!(".{pkg}.toml"),
                ignore_env_key: format!("{}_IGNORE_PATTERN", pkg.to_uppercase()),
            }
        })
    }

    /// Per-root settings file, e.g. `.files.toml`.
    pub fn config_filename(&self) -> &str {
        &self.config_filename
    }

    /// Environment variable holding the default ignore pattern, e.g. `FILES_IGNORE_PATTERN`.
    pub fn ignore_env_key(&self) -> &str {
        &self.ignore_env_key
    }
}

// ---- Patterns ----

/// Built-in ignore pattern: VCS metadata directories.
pub const DEFAULT_IGNORE_PATTERN: &str = r"^(\.git|\.hg|\.svn|_darcs|\.bzr)$";

/// Read a pattern from environment variable `key`. Unset or blank counts as absent.
pub fn pattern_from_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .filter(|s| !s.trim().is_empty())
}

/// Ignore pattern used when nothing else is configured: `FILES_IGNORE_PATTERN`, else the built-in.
pub fn default_ignore_pattern() -> String {
    pattern_from_env(PackagePaths::get().ignore_env_key())
        .unwrap_or_else(|| DEFAULT_IGNORE_PATTERN.to_string())
}

// ---- Worker threads ----

/// Thread limits for the concurrent walk pool.
/// Use [`WorkerThreadLimits::current()`] to fill `all_threads` from rayon; the rest are const.
#[derive(Clone, Copy, Debug)]
pub struct WorkerThreadLimits {
    /// Available threads (from rayon); set by [`WorkerThreadLimits::current()`].
    pub all_threads: usize,
    /// Minimum pool size.
    pub floor: usize,
}

impl Default for WorkerThreadLimits {
    fn default() -> Self {
        Self {
            all_threads: 0, // use current() to set from rayon
            floor: Self::FLOOR_THREADS,
        }
    }
}

impl WorkerThreadLimits {
    pub const FLOOR_THREADS: usize = 2;

    /// Build limits with `all_threads` set from `rayon::current_num_threads()`.
    pub fn current() -> Self {
        Self {
            all_threads: rayon::current_num_threads(),
            ..Self::default()
        }
    }
}

// ---- Progress ----

pub struct ProgressConsts;

impl ProgressConsts {
    /// Batch size for progress counter updates while draining results (reduce lock contention).
    pub const PROGRESS_UPDATE_BATCH_SIZE: usize = 100;
}

// ---- Result channel ----

/// Capacity of the channel between walk workers and the result sink. Small on purpose:
/// a slow consumer throttles the walk instead of buffering the whole tree.
pub const RESULT_CHANNEL_CAP: usize = 20;

// ---- Exit codes ----

pub struct ExitCodes;

impl ExitCodes {
    pub const FATAL: u8 = 1;
    pub const OUTPUT: u8 = 2;
    /// 128 + SIGINT.
    pub const INTERRUPTED: u8 = 130;
}
