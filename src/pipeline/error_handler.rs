use log::debug;

use super::context::PipelineContext;

/// Report unreadable subtrees after the walk. They are expected (permissions, entries deleted
/// mid-walk) and never fail the run, so they only show up at debug level.
pub fn log_skipped_paths(ctx: &PipelineContext) {
    let Ok(skipped) = ctx.skipped_paths.lock() else {
        return;
    };
    if skipped.is_empty() {
        return;
    }
    debug!(
        "Skipped {} paths due to permission errors or access issues",
        skipped.len()
    );
    for (path, msg) in skipped.iter() {
        debug!("  skipped: {} ({})", path.display(), msg);
    }
}
