//! Pipeline components: context, walk strategies, orchestration, error handling.

pub mod context;
pub mod error_handler;
pub mod orchestrator;
pub mod parallel_walk;
pub mod walk;

pub use context::{Flow, PipelineContext, PipelineHandles, create_result_channel};
pub use error_handler::log_skipped_paths;
pub use orchestrator::{finish_pipeline, run_pipeline, setup_pipeline};
pub use parallel_walk::walk_concurrent;
pub use walk::{spawn_walk_thread, walk_sequential};
