//! files: fast directory-tree lister for fuzzy finders

pub mod engine;
pub mod error;
pub mod listing;
pub mod pipeline;
pub mod present;
pub mod sink;
pub mod types;
pub mod utils;

/// Re-export types for API
pub use error::FilesError;
pub use types::*;

use log::debug;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

/// Result alias used by public files API
pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;

/// Paths produced by [`list_dir`] and how the walk ended.
#[derive(Clone, Debug)]
pub struct Listing {
    pub paths: Vec<PathBuf>,
    pub status: WalkStatus,
}

/// Single entry point: list `root` with `opts`.
///
/// - **`on_path: None`** → collected; [`Listing::paths`] holds every path in output order.
/// - **`on_path: Some(f)`** → streaming; `f` gets each path as soon as it is ready and
///   [`Listing::paths`] stays empty. Keep `f` fast: the walk is throttled by it.
///
/// Paths are `/`-separated and keep the names' raw bytes. They are relative to `root` as
/// given (so a relative `root` yields paths that resolve from the current directory)
/// unless `opts.absolute` is set.
///
/// ```ignore
/// let opts = files::FilesOpts { match_pattern: Some(r"\.rs$".into()), sort: true, ..Default::default() };
/// let listing = files::list_dir(Path::new("."), &opts, None::<fn(&Path)>)?;
/// ```
pub fn list_dir<F>(root: &Path, opts: &FilesOpts, on_path: Option<F>) -> Result<Listing>
where
    F: FnMut(&Path),
{
    let opts = Opts::from(opts);
    debug!(
        "{} CONFIG:{:#?}",
        env!("CARGO_PKG_NAME").to_string().to_uppercase(),
        opts
    );
    // Lib callers have no Ctrl+C hookup; the flag is never set.
    let cancel = Arc::new(AtomicBool::new(false));

    match on_path {
        None => {
            let (paths, status) = listing::list_dir_with_opts(root, &opts, cancel)?;
            Ok(Listing { paths, status })
        }
        Some(f) => {
            let status = listing::list_dir_callback(root, &opts, cancel, f)?;
            Ok(Listing {
                paths: Vec::new(),
                status,
            })
        }
    }
}
