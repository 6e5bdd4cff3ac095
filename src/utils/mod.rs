pub mod config;
pub mod fd_limit;
pub mod files_toml;
pub mod logger;

pub use config::*;
pub use fd_limit::{FDS_PER_WORKER, determine_walk_threads, max_open_fds, max_workers_by_fd_limit};
pub use logger::setup_logging;
