//! File descriptor limit detection for capping the concurrent walk pool (Unix).

/// Estimated number of file descriptors held per walk worker (open dir handle plus slack).
pub const FDS_PER_WORKER: usize = 4;

/// Fraction of the process FD limit to use (leave headroom for stdio and the rest of the process).
const FD_LIMIT_FRACTION: f64 = 0.8;

/// Returns the soft limit for max open file descriptors, or `None` if unavailable (e.g. Windows).
#[cfg(unix)]
pub fn max_open_fds() -> Option<u64> {
    use std::mem::MaybeUninit;
    let mut rlim = MaybeUninit::<libc::rlimit>::uninit();
    if unsafe { libc::getrlimit(libc::RLIMIT_NOFILE, rlim.as_mut_ptr()) } != 0 {
        return None;
    }
    let rlim = unsafe { rlim.assume_init() };
    let cur = rlim.rlim_cur;
    if cur == libc::RLIM_INFINITY || cur > i64::MAX as u64 {
        return None;
    }
    Some(cur)
}

#[cfg(not(unix))]
pub fn max_open_fds() -> Option<u64> {
    None
}

/// Max pool size that keeps concurrent `read_dir` handles under ~80% of the FD limit.
/// Returns `None` if no limit is available.
pub fn max_workers_by_fd_limit() -> Option<usize> {
    let limit = max_open_fds()?;
    let usable = (limit as f64 * FD_LIMIT_FRACTION) as usize;
    if usable < FDS_PER_WORKER {
        return Some(1);
    }
    Some(usable / FDS_PER_WORKER)
}

/// Pool size for the concurrent walk: `requested` if given, else available threads,
/// never below `floor` and never above what the FD limit allows.
pub fn determine_walk_threads(requested: Option<usize>, available: usize, floor: usize) -> usize {
    let wanted = requested.unwrap_or_else(|| available.max(floor));
    match max_workers_by_fd_limit() {
        Some(cap) => wanted.min(cap).max(1),
        None => wanted.max(1),
    }
}
