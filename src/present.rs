//! Output form of a walked path.

use std::ffi::{OsStr, OsString};
use std::path::Path;

use crate::engine::tools::{clean_path, path_to_slash};
use crate::error::FilesError;

/// Prefix for every emitted path, computed once from the base the user gave.
///
/// - relative mode: the base as given, cleaned. `.` means no prefix, so a walk of the
///   current directory yields `src/main.go`; a walk of `proj` yields `proj/src/main.go`.
///   Either way the path resolves from the current directory.
/// - absolute mode: the base made absolute against the current directory, cleaned.
#[derive(Clone, Debug)]
pub struct Presenter {
    prefix: Option<OsString>,
}

impl Presenter {
    pub fn new(base: &Path, absolute: bool) -> Result<Self, FilesError> {
        let base = if absolute {
            let abs = std::path::absolute(base).map_err(|source| FilesError::Root {
                path: base.to_path_buf(),
                source,
            })?;
            clean_path(&abs)
        } else {
            clean_path(base)
        };
        let mut prefix = path_to_slash(&base);
        if prefix == "." {
            return Ok(Self { prefix: None });
        }
        if !prefix.as_encoded_bytes().ends_with(b"/") {
            prefix.push("/");
        }
        Ok(Self {
            prefix: Some(prefix),
        })
    }

    /// `rel` is relative to the walk root and already slash-separated.
    pub fn present(&self, rel: impl AsRef<OsStr>) -> OsString {
        let rel = rel.as_ref();
        match &self.prefix {
            Some(prefix) => {
                let mut out = OsString::with_capacity(prefix.len() + rel.len());
                out.push(prefix);
                out.push(rel);
                out
            }
            None => rel.to_os_string(),
        }
    }
}
