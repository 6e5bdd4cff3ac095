//! Load `.files.toml` from the walk root (CLI only). Lib does not use this; the consuming program injects config via FilesOpts.

use serde::Deserialize;
use std::path::Path;

use crate::Opts;
use crate::utils::config::PackagePaths;

#[derive(Debug, Default, Deserialize)]
pub struct FilesToml {
    #[serde(default)]
    settings: SettingsSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SettingsSection {
    ignore: Option<String>,
    #[serde(rename = "match")]
    match_pattern: Option<String>,
    hidden: Option<bool>,
    directory_only: Option<bool>,
    max: Option<usize>,
    sort: Option<bool>,
    absolute: Option<bool>,
    parallel: Option<bool>,
    threads: Option<usize>,
    progress: Option<bool>,
}

/// Parse settings from a TOML string.
pub fn parse_files_toml(s: &str) -> Result<FilesToml, toml::de::Error> {
    toml::from_str(s)
}

/// Load `.files.toml` from `dir` if present. Returns None if file missing or unreadable; a malformed file is warned about and skipped.
/// A file that is applied is announced at info level: it can change what the listing looks like.
pub fn load_files_toml(dir: &Path) -> Option<FilesToml> {
    let path = dir.join(PackagePaths::get().config_filename());
    let s = std::fs::read_to_string(&path).ok()?;
    match parse_files_toml(&s) {
        Ok(file) => {
            log::info!("Using settings from {}", path.display());
            Some(file)
        }
        Err(e) => {
            log::warn!("{}: {}", path.display(), e);
            None
        }
    }
}

/// Overwrite opts field from file when present.
macro_rules! apply_file_opt {
    ($file:expr, $opts:expr, $file_field:ident => $opts_field:ident) => {
        if let Some(v) = $file.$file_field {
            $opts.$opts_field = v;
        }
    };
}

/// Apply file config to opts (only set fields present in the file). Call before applying CLI.
pub fn apply_file_to_opts(file: &FilesToml, opts: &mut Opts) {
    let s = &file.settings;
    if let Some(ref p) = s.ignore {
        opts.ignore = Some(p.clone());
    }
    if let Some(ref p) = s.match_pattern {
        opts.match_pattern = Some(p.clone());
    }
    apply_file_opt!(s, opts, hidden => hidden);
    apply_file_opt!(s, opts, directory_only => directory_only);
    if let Some(max) = s.max {
        opts.max_results = (max > 0).then_some(max);
    }
    apply_file_opt!(s, opts, sort => sort);
    apply_file_opt!(s, opts, absolute => absolute);
    apply_file_opt!(s, opts, parallel => parallel);
    if let Some(n) = s.threads {
        opts.num_threads = Some(n);
    }
    apply_file_opt!(s, opts, progress => progress);
}
