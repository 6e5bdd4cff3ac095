//! CLI command handler: resolve options, hook up Ctrl+C, list to stdout.

use anyhow::{Context, Result};
use log::{debug, warn};
use std::io::{self, BufWriter};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::engine::arg_parser::Cli;
use crate::error::FilesError;
use crate::listing::list_dir_to_writer;
use crate::utils::config::pattern_from_env;
use crate::utils::files_toml::{apply_file_to_opts, load_files_toml};
use crate::utils::setup_logging;
use crate::{Opts, WalkStatus};

/// Overwrite opts field from a CLI flag when given.
macro_rules! apply_cli_opt {
    ($cli:expr, $opts:expr, $cli_field:ident => $opts_field:ident) => {
        if let Some(v) = $cli.$cli_field {
            $opts.$opts_field = v;
        }
    };
}

/// Apply CLI flags on top of `opts` (defaults, then `.files.toml`). Flags always win.
pub fn apply_cli_to_opts(cli: &Cli, opts: &mut Opts) {
    if let Some(ref pattern) = cli.ignore {
        opts.ignore = Some(pattern.clone());
    }
    // -I wins over -i when both are given and the variable is set.
    if let Some(ref key) = cli.ignore_env {
        match pattern_from_env(key) {
            Some(pattern) => opts.ignore = Some(pattern),
            None => warn!("{} is not set; keeping the current ignore pattern", key),
        }
    }
    if let Some(ref pattern) = cli.match_pattern {
        opts.match_pattern = Some(pattern.clone());
    }
    apply_cli_opt!(cli, opts, hidden => hidden);
    apply_cli_opt!(cli, opts, progress => progress);
    apply_cli_opt!(cli, opts, parallel => parallel);
    apply_cli_opt!(cli, opts, absolute => absolute);
    apply_cli_opt!(cli, opts, sort => sort);
    apply_cli_opt!(cli, opts, directory_only => directory_only);
    apply_cli_opt!(cli, opts, verbose => verbose);
    if let Some(max) = cli.max_results() {
        opts.max_results = max;
    }
    if let Some(n) = cli.threads {
        opts.num_threads = Some(n);
    }
}

fn setup_opts(cli: &Cli) -> Opts {
    setup_logging(cli.verbose.unwrap_or(false));
    let mut opts = Opts::default();
    if let Some(file) = load_files_toml(&cli.dir) {
        apply_file_to_opts(&file, &mut opts);
    }
    apply_cli_to_opts(cli, &mut opts);
    opts
}

/// Cancellation flag raised by Ctrl+C. The walk checks it at every entry.
fn install_interrupt_handler() -> Result<Arc<AtomicBool>> {
    let cancel_requested = Arc::new(AtomicBool::new(false));
    let cancel_requested_handler = Arc::clone(&cancel_requested);
    ctrlc::set_handler(move || {
        cancel_requested_handler.store(true, Ordering::Relaxed);
    })
    .context("set Ctrl+C handler")?;
    Ok(cancel_requested)
}

/// Run the listing. `-v` prints the version and returns. An interrupted walk is returned
/// as [`FilesError::Interrupted`] after the partial output was flushed.
pub fn handle_run(cli: &Cli) -> Result<WalkStatus> {
    if cli.version {
        println!("{}", env!("CARGO_PKG_VERSION"));
        return Ok(WalkStatus::Completed);
    }
    let opts = setup_opts(cli);
    debug!("{:#?}", opts);
    let cancel = install_interrupt_handler()?;

    let stdout = io::stdout();
    // Streaming goes through the line-buffered stdout so a fuzzy finder sees paths as they
    // are found; sorted output is written in one go and can use a block buffer.
    let status = if opts.sort {
        let mut out = BufWriter::new(stdout.lock());
        list_dir_to_writer(&cli.dir, &opts, cancel, &mut out)?
    } else {
        let mut out = stdout.lock();
        list_dir_to_writer(&cli.dir, &opts, cancel, &mut out)?
    };

    if status == WalkStatus::Interrupted {
        return Err(FilesError::Interrupted.into());
    }
    Ok(status)
}
