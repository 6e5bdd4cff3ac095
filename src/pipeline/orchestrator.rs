use anyhow::Result;
use log::debug;
use rayon::ThreadPool;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::thread::JoinHandle;

use crate::engine::filter::PathFilter;
use crate::engine::parallel::{build_walk_pool, parallel_walk_handler};
use crate::engine::tools::validate_root;
use crate::utils::config::{RESULT_CHANNEL_CAP, default_ignore_pattern};
use crate::{Opts, WalkStatus};

use super::context::{PipelineContext, PipelineHandles, create_result_channel};
use super::error_handler::log_skipped_paths;
use super::walk::spawn_walk_thread;

/// Start the walk. Returns the result receiver and handles; caller drains `result_rx`
/// and then calls [`finish_pipeline`].
pub fn run_pipeline(
    root: &Path,
    opts: &Opts,
    cancel: Arc<AtomicBool>,
) -> Result<PipelineHandles> {
    let (ctx, pool) = setup_pipeline(root, opts, cancel)?;
    let ctx = Arc::new(ctx);
    let (result_tx, result_rx) = create_result_channel(RESULT_CHANNEL_CAP);
    let walk_handle = spawn_walk_thread(result_tx, Arc::clone(&ctx), pool);
    Ok(PipelineHandles {
        result_rx,
        walk_handle,
        ctx,
    })
}

/// Compile patterns, validate the root, build the pool for the concurrent walk.
/// Every configuration error surfaces here, before anything is read.
pub fn setup_pipeline(
    root: &Path,
    opts: &Opts,
    cancel: Arc<AtomicBool>,
) -> Result<(PipelineContext, Option<ThreadPool>)> {
    let ignore = opts.ignore.clone().unwrap_or_else(default_ignore_pattern);
    debug!("ignore pattern: {:?}", ignore);
    let filter = PathFilter::new(&ignore, opts.match_pattern.as_deref(), opts.hidden)?;
    let root = validate_root(root)?;

    let pool = if opts.parallel {
        let (pool, num_threads) = build_walk_pool(opts.num_threads)?;
        parallel_walk_handler(true, num_threads);
        Some(pool)
    } else {
        parallel_walk_handler(false, 1);
        None
    };

    let ctx = PipelineContext::new(
        root,
        filter,
        opts.directory_only,
        opts.max_results,
        cancel,
    );
    Ok((ctx, pool))
}

/// Join the walk thread (after the receiver was drained or dropped) and report how it ended.
pub fn finish_pipeline(walk_handle: JoinHandle<()>, ctx: &PipelineContext) -> Result<WalkStatus> {
    walk_handle
        .join()
        .map_err(|_| anyhow::anyhow!("walk thread panicked"))?;
    log_skipped_paths(ctx);
    let status = ctx.status();
    debug!("walk finished: {:?}, {} results", status, ctx.emitted());
    Ok(status)
}
