//! Entry predicates shared by both walk strategies.
//!
//! Every check takes the entry's path relative to the walk root, slash-normalized
//! (`"src/main.go"`). The root itself is the empty string. Patterns run on the raw
//! name bytes, so names that are not valid UTF-8 are still filtered.
//!
//! The ignore pattern is tried against the base name and against the full
//! relative path; either match ignores the entry. Name-anchored patterns such as
//! the default `^(\.git|...)$` therefore work at every depth, and path patterns
//! such as `^vendor/cache$` can target a single nested directory.

use regex::bytes::Regex;
use std::ffi::OsStr;

use crate::engine::tools::base_name;
use crate::error::FilesError;

/// What a walk should do with one entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Visit {
    /// Hidden or ignored. Directories are pruned with their whole subtree.
    Skip,
    /// Traverse (directories) but do not emit.
    Descend,
    /// Emit. Directories are still traversed.
    Emit,
}

#[derive(Clone, Debug)]
pub struct PathFilter {
    ignore: Option<Regex>,
    matcher: Option<Regex>,
    hidden: bool,
}

impl PathFilter {
    /// Compile patterns. An empty ignore pattern disables ignoring; `None`/empty match accepts every name.
    pub fn new(ignore: &str, match_pattern: Option<&str>, hidden: bool) -> Result<Self, FilesError> {
        let ignore = compile("ignore", ignore)?;
        let matcher = match match_pattern {
            Some(p) => compile("match", p)?,
            None => None,
        };
        Ok(Self {
            ignore,
            matcher,
            hidden,
        })
    }

    /// Dot-prefixed base name, when the hidden policy is on. Never true for the root.
    pub fn is_hidden(&self, rel: impl AsRef<OsStr>) -> bool {
        let rel = rel.as_ref().as_encoded_bytes();
        self.hidden && !rel.is_empty() && base_name(rel).starts_with(b".")
    }

    pub fn is_ignored(&self, rel: impl AsRef<OsStr>) -> bool {
        let rel = rel.as_ref().as_encoded_bytes();
        match &self.ignore {
            Some(re) => !rel.is_empty() && (re.is_match(base_name(rel)) || re.is_match(rel)),
            None => false,
        }
    }

    pub fn is_matched(&self, name: impl AsRef<OsStr>) -> bool {
        self.name_matches(name.as_ref().as_encoded_bytes())
    }

    fn name_matches(&self, name: &[u8]) -> bool {
        self.matcher.as_ref().is_none_or(|re| re.is_match(name))
    }

    /// Hidden, then ignore, then match. Match only decides emission, never traversal.
    pub fn classify(&self, rel: impl AsRef<OsStr>, is_dir: bool, directory_only: bool) -> Visit {
        let rel = rel.as_ref();
        if self.is_hidden(rel) || self.is_ignored(rel) {
            return Visit::Skip;
        }
        // Only the kind being listed is ever emitted.
        if is_dir != directory_only {
            return Visit::Descend;
        }
        if self.name_matches(base_name(rel.as_encoded_bytes())) {
            Visit::Emit
        } else {
            Visit::Descend
        }
    }
}

fn compile(kind: &'static str, pattern: &str) -> Result<Option<Regex>, FilesError> {
    if pattern.is_empty() {
        return Ok(None);
    }
    Regex::new(pattern)
        .map(Some)
        .map_err(|source| FilesError::InvalidPattern { kind, source })
}
