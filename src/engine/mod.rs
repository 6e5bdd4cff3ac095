//! Engine module: CLI surface, entry filtering and walk helpers

pub mod arg_parser;
pub mod cli;
pub mod filter;
pub mod parallel;
pub mod progress;
pub mod tools;

// Re-export commonly used functions
pub use arg_parser::Cli;
pub use cli::{apply_cli_to_opts, handle_run};
pub use filter::{PathFilter, Visit};
pub use tools::{
    base_name, clean_path, join_rel, path_relative_to, path_to_slash, relative_slash_path,
    validate_root,
};
