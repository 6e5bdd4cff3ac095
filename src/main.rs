//! files CLI: print the files under a directory, one per line, for fuzzy finders.

use clap::Parser;
use files::FilesError;
use files::engine::arg_parser::Cli;
use files::engine::handle_run;
use files::utils::config::ExitCodes;
use std::process::ExitCode;
use std::time::Instant;

/// Log a fatal error (once) and pick its exit code.
fn report_error(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<FilesError>() {
        Some(files_err) => {
            if !files_err.is_quiet() {
                log::error!("{:#}", err);
            }
            files_err.exit_code()
        }
        None => {
            log::error!("{:#}", err);
            ExitCodes::FATAL
        }
    }
}

fn main() -> ExitCode {
    let start_time = Instant::now();
    let cli = Cli::parse();
    let code = match handle_run(&cli) {
        Ok(status) => status.exit_code(),
        Err(err) => report_error(&err),
    };
    log::debug!("Total time: {:?}", start_time.elapsed());
    ExitCode::from(code)
}
