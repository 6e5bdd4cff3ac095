//! Directory listing operations: pipeline → sink → presenter → destination.

use anyhow::Result;
use log::debug;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use crate::engine::progress::{finish_bar, progress_callback, setup_progress};
use crate::pipeline::{PipelineHandles, finish_pipeline, run_pipeline};
use crate::present::Presenter;
use crate::sink::{drain, write_paths};
use crate::{Opts, WalkStatus};

/// List `root` into `out`, one presented path per line. Used by the CLI.
///
/// A write failure is returned only after the walk thread has been joined: dropping the
/// receiver makes every pending send fail, so the walk winds down on its own.
pub fn list_dir_to_writer<W: Write>(
    root: &Path,
    opts: &Opts,
    cancel: Arc<AtomicBool>,
    out: &mut W,
) -> Result<WalkStatus> {
    let presenter = Presenter::new(root, opts.absolute)?;
    let PipelineHandles {
        result_rx,
        walk_handle,
        ctx,
    } = run_pipeline(root, opts, cancel)?;

    let bar = setup_progress(opts.progress);
    let paths = drain(result_rx, opts.sort, progress_callback(&bar));
    let written = write_paths(paths, &presenter, out);
    if let Some(bar) = &bar {
        finish_bar(bar);
    }

    let status = finish_pipeline(walk_handle, &ctx)?;
    let written = written?;
    debug!("{} paths written", written);
    Ok(status)
}

/// List `root`, calling `on_path` with each presented path as soon as the sink yields it.
/// Paths keep their on-disk bytes; a non-UTF-8 name still names the file.
pub fn list_dir_callback<F>(
    root: &Path,
    opts: &Opts,
    cancel: Arc<AtomicBool>,
    mut on_path: F,
) -> Result<WalkStatus>
where
    F: FnMut(&Path),
{
    let presenter = Presenter::new(root, opts.absolute)?;
    let PipelineHandles {
        result_rx,
        walk_handle,
        ctx,
    } = run_pipeline(root, opts, cancel)?;

    for rel in drain(result_rx, opts.sort, None) {
        on_path(Path::new(&presenter.present(&rel)));
    }
    finish_pipeline(walk_handle, &ctx)
}

/// List `root` into a `Vec`, in output order.
pub fn list_dir_with_opts(
    root: &Path,
    opts: &Opts,
    cancel: Arc<AtomicBool>,
) -> Result<(Vec<PathBuf>, WalkStatus)> {
    let mut paths = Vec::new();
    let status = list_dir_callback(root, opts, cancel, |p| paths.push(p.to_path_buf()))?;
    Ok((paths, status))
}
