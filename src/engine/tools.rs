//! Path utilities

use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::error::FilesError;

/// Convert absolute path to relative path from base
pub fn path_relative_to(path: &Path, base: &Path) -> Option<PathBuf> {
    path.strip_prefix(base).ok().map(|p| p.to_path_buf())
}

/// Path with every separator written as `/`. Names are kept byte for byte, so a
/// non-UTF-8 name still names the same file.
pub fn path_to_slash(path: &Path) -> OsString {
    let mut out = OsString::new();
    let mut need_sep = false;
    for comp in path.components() {
        match comp {
            Component::Prefix(prefix) => out.push(prefix.as_os_str()),
            Component::RootDir => out.push("/"),
            other => {
                if need_sep {
                    out.push("/");
                }
                out.push(other.as_os_str());
                need_sep = true;
                continue;
            }
        }
        need_sep = false;
    }
    out
}

/// Root-relative path of `path` under `root`, slash-normalized. Empty for the root itself.
pub fn relative_slash_path(path: &Path, root: &Path) -> OsString {
    match path_relative_to(path, root) {
        Some(rel) => path_to_slash(&rel),
        None => path_to_slash(path),
    }
}

/// Last component of a slash path (`b"a/b/c.go"` → `b"c.go"`).
pub fn base_name(rel: &[u8]) -> &[u8] {
    rel.rsplit(|b| *b == b'/').next().unwrap_or(rel)
}

/// Join a root-relative slash path and a child name.
pub fn join_rel(parent: &OsStr, name: &OsStr) -> OsString {
    let mut out = OsString::with_capacity(parent.len() + name.len() + 1);
    if !parent.is_empty() {
        out.push(parent);
        out.push("/");
    }
    out.push(name);
    out
}

/// Lexical cleanup: drop `.` components, fold `..` into the preceding normal component.
/// Does not touch the filesystem. An empty result becomes `.`.
pub fn clean_path(path: &Path) -> PathBuf {
    let mut out: Vec<Component> = Vec::new();
    for comp in path.components() {
        match comp {
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                // `/..` is `/`
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(comp),
            },
            other => out.push(other),
        }
    }
    if out.is_empty() {
        return PathBuf::from(".");
    }
    out.iter().map(|c| c.as_os_str()).collect()
}

/// Resolve the walk root: must exist, be a directory and be listable. Returns the canonical path.
pub fn validate_root(root: &Path) -> Result<PathBuf, FilesError> {
    let root_err = |source| FilesError::Root {
        path: root.to_path_buf(),
        source,
    };
    let canonical = root.canonicalize().map_err(root_err)?;
    let meta = fs::metadata(&canonical).map_err(root_err)?;
    if !meta.is_dir() {
        return Err(FilesError::NotADirectory {
            path: root.to_path_buf(),
        });
    }
    // Metadata succeeds on a directory we cannot list; only reading it tells.
    fs::read_dir(&canonical).map_err(root_err)?;
    Ok(canonical)
}
