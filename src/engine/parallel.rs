//! Shared helpers for parallel processing.

use log::debug;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::error::FilesError;
use crate::utils::config::WorkerThreadLimits;
use crate::utils::fd_limit::determine_walk_threads;

pub fn parallel_walk_handler(parallel_walk: bool, num_threads: usize) {
    if parallel_walk {
        debug!("Walking in parallel ({} workers)", num_threads);
    } else {
        debug!("Walking serially");
    }
}

/// Dedicated pool for the concurrent walk so a caller's global rayon pool is never blocked on our channel.
pub fn build_walk_pool(requested: Option<usize>) -> Result<(ThreadPool, usize), FilesError> {
    let limits = WorkerThreadLimits::current();
    let num_threads = determine_walk_threads(requested, limits.all_threads, limits.floor);
    let pool = ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .thread_name(|i| format!("{}-walk-{}", env!("CARGO_PKG_NAME"), i))
        .build()?;
    Ok((pool, num_threads))
}
