//! Error types for files.
//!
//! Fatal failures carry their own exit code; the CLI downcasts the `anyhow::Error`
//! it receives to pick one. Messages leave the cause out: it is the `source`, and
//! the CLI prints the chain with `{:#}`. Subtree read errors never show up here: they are
//! recorded on the pipeline context and the walk carries on.

use std::path::PathBuf;
use thiserror::Error;

use crate::utils::config::ExitCodes;

#[derive(Error, Debug)]
pub enum FilesError {
    /// Ignore or match regex failed to compile.
    #[error("invalid {kind} pattern")]
    InvalidPattern {
        kind: &'static str,
        #[source]
        source: regex::Error,
    },

    /// Root cannot be read (missing, permission denied).
    #[error("{}", .path.display())]
    Root {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path:?} is not a directory")]
    NotADirectory { path: PathBuf },

    #[error("build walk thread pool")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// Writing a result line failed (e.g. the reading end of a pipe was closed).
    #[error("write output")]
    Output(#[source] std::io::Error),

    #[error("interrupted")]
    Interrupted,
}

impl FilesError {
    pub fn exit_code(&self) -> u8 {
        match self {
            FilesError::Output(_) => ExitCodes::OUTPUT,
            FilesError::Interrupted => ExitCodes::INTERRUPTED,
            _ => ExitCodes::FATAL,
        }
    }

    /// Output errors exit quietly: the reader is gone, there is nobody to tell.
    pub fn is_quiet(&self) -> bool {
        matches!(self, FilesError::Output(_) | FilesError::Interrupted)
    }
}
