//! Concurrent strategy: one pool task per directory.
//!
//! ```text
//! pool.scope ─ expand(root)
//!                ├── file  → classify → emit ──┐
//!                ├── dir   → spawn expand(dir) │  (not awaited)
//!                └── ...                       ├──> bounded channel ──> sink
//!              expand(dir) ...  ───────────────┘
//! ```
//!
//! The scope is the join barrier: it returns once every spawned task has finished,
//! and only then does the walk thread drop the sender.

use crossbeam_channel::Sender;
use rayon::{Scope, ThreadPool};
use std::ffi::OsString;
use std::fs;
use std::path::PathBuf;

use crate::engine::filter::Visit;
use crate::engine::tools::join_rel;

use super::context::{Flow, PipelineContext};

pub fn walk_concurrent(pool: &ThreadPool, ctx: &PipelineContext, tx: &Sender<OsString>) {
    pool.scope(|s| expand_dir(s, ctx, tx, ctx.root.clone(), OsString::new()));
}

/// List one directory. Subdirectories become new tasks; files (or directories, in
/// directory-only mode) are emitted here. A directory that cannot be read is recorded
/// and treated as empty; siblings are unaffected.
fn expand_dir<'scope>(
    s: &Scope<'scope>,
    ctx: &'scope PipelineContext,
    tx: &'scope Sender<OsString>,
    dir: PathBuf,
    rel: OsString,
) {
    if ctx.should_stop() {
        return;
    }
    let read_dir = match fs::read_dir(&dir) {
        Ok(read_dir) => read_dir,
        Err(err) => {
            ctx.record_skipped(Some(dir), err.to_string());
            return;
        }
    };
    for item in read_dir {
        if ctx.should_stop() {
            return;
        }
        let entry = match item {
            Ok(entry) => entry,
            Err(err) => {
                ctx.record_skipped(Some(dir.clone()), err.to_string());
                continue;
            }
        };
        // file_type does not follow symlinks: a link to a directory is listed, not entered.
        let is_dir = match entry.file_type() {
            Ok(ft) => ft.is_dir(),
            Err(err) => {
                ctx.record_skipped(Some(entry.path()), err.to_string());
                continue;
            }
        };
        let child_rel = join_rel(&rel, &entry.file_name());
        let visit = ctx.classify(&child_rel, is_dir);
        if visit == Visit::Skip {
            continue;
        }
        if is_dir {
            let child_dir = entry.path();
            let task_rel = child_rel.clone();
            s.spawn(move |s| expand_dir(s, ctx, tx, child_dir, task_rel));
        }
        if visit == Visit::Emit && ctx.emit(tx, child_rel) == Flow::Stop {
            return;
        }
    }
}
