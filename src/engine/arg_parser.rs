use clap::Parser;
use std::path::PathBuf;

struct DefaultArgs;

impl DefaultArgs {
    pub const DIR: &'static str = ".";
}

/// Fast directory-tree file lister for fuzzy finders.
///
/// Boolean flags take an optional value with `=`: `-H=false` lists hidden entries.
#[derive(Clone, Debug, Parser)]
#[command(name = "files")]
#[command(about = "List files under DIR, skipping VCS directories and hidden entries.")]
#[command(disable_version_flag = true)]
pub struct Cli {
    /// Directory to list. Default: current directory.
    #[arg(value_name = "DIR", default_value = DefaultArgs::DIR)]
    pub dir: PathBuf,

    /// Ignore pattern (regex) matched against each entry's name and its path relative to DIR.
    /// Default: FILES_IGNORE_PATTERN, else VCS directories. Empty string ignores nothing.
    #[arg(short = 'i', value_name = "REGEX")]
    pub ignore: Option<String>,

    /// Read the ignore pattern from this environment variable. Wins over -i.
    #[arg(short = 'I', value_name = "ENV_VAR")]
    pub ignore_env: Option<String>,

    /// Ignore hidden (dot-prefixed) entries. Default: true.
    #[arg(short = 'H', num_args = 0..=1, require_equals = true, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub hidden: Option<bool>,

    /// Show a running count on stderr.
    #[arg(short = 'p', num_args = 0..=1, require_equals = true, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub progress: Option<bool>,

    /// Walk directories concurrently (one task per directory). Output order is not stable.
    #[arg(short = 'A', num_args = 0..=1, require_equals = true, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub parallel: Option<bool>,

    /// Print absolute paths.
    #[arg(short = 'a', num_args = 0..=1, require_equals = true, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub absolute: Option<bool>,

    /// Sort output (waits for the walk to finish).
    #[arg(short = 's', num_args = 0..=1, require_equals = true, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub sort: Option<bool>,

    /// Only print entries whose name matches this regex. Directories are still searched.
    #[arg(short = 'm', value_name = "REGEX")]
    pub match_pattern: Option<String>,

    /// Stop after N results. N <= 0 means no limit.
    #[arg(short = 'M', value_name = "N", allow_negative_numbers = true, value_parser = clap::value_parser!(i64))]
    pub max: Option<i64>,

    /// Print directories only.
    #[arg(short = 'd', num_args = 0..=1, require_equals = true, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub directory_only: Option<bool>,

    /// Worker threads for -A. Default: available threads, capped by the open-file limit.
    #[arg(short = 'j', long = "threads", value_name = "N")]
    pub threads: Option<usize>,

    /// Print version and exit.
    #[arg(short = 'v')]
    pub version: bool,

    /// Debug logging on stderr.
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub verbose: Option<bool>,
}

impl Cli {
    /// `-M` as a ceiling: non-positive means unbounded.
    pub fn max_results(&self) -> Option<Option<usize>> {
        self.max.map(|n| usize::try_from(n).ok().filter(|n| *n > 0))
    }
}
