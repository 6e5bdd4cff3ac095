//! Sequential strategy (walkdir, depth-first) and the walk thread that runs either strategy.

use crossbeam_channel::Sender;
use rayon::ThreadPool;
use std::ffi::OsString;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use walkdir::WalkDir;

use crate::engine::filter::Visit;
use crate::engine::tools::relative_slash_path;

use super::context::{Flow, PipelineContext};
use super::parallel_walk::walk_concurrent;

/// Depth-first walk on the calling thread. Rejected directories are pruned with
/// `skip_current_dir`, so nothing below them is ever read.
pub fn walk_sequential(ctx: &PipelineContext, tx: &Sender<OsString>) {
    let mut iter = WalkDir::new(&ctx.root).follow_links(false).into_iter();
    while let Some(outcome) = iter.next() {
        if ctx.should_stop() {
            break;
        }
        let entry = match outcome {
            Ok(entry) => entry,
            Err(err) => {
                ctx.record_skipped(err.path().map(PathBuf::from), err.to_string());
                continue;
            }
        };
        if entry.depth() == 0 {
            continue;
        }
        let is_dir = entry.file_type().is_dir();
        let rel = relative_slash_path(entry.path(), &ctx.root);
        match ctx.classify(&rel, is_dir) {
            Visit::Skip => {
                if is_dir {
                    iter.skip_current_dir();
                }
            }
            Visit::Descend => {}
            Visit::Emit => {
                if ctx.emit(tx, rel) == Flow::Stop {
                    break;
                }
            }
        }
    }
}

/// Run the walk on its own thread. `pool: Some` selects the concurrent strategy.
/// The sender is dropped when the walk returns, which closes the channel for the sink.
pub fn spawn_walk_thread(
    result_tx: Sender<OsString>,
    ctx: Arc<PipelineContext>,
    pool: Option<ThreadPool>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        match pool {
            Some(pool) => walk_concurrent(&pool, &ctx, &result_tx),
            None => walk_sequential(&ctx, &result_tx),
        }
        drop(result_tx);
    })
}
