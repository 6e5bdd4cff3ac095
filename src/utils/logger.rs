use colored::Colorize;
use env_logger::{Builder, Target};
use log::{Level, LevelFilter};
use std::io::Write;

/// Install the stderr logger. Our crate logs at Info (Debug when `verbose`), dependencies at Warn.
/// `RUST_LOG` still overrides. Stdout is reserved for paths, so the target is pinned to stderr.
pub fn setup_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let _ = Builder::from_default_env()
        .target(Target::Stderr)
        .filter_level(LevelFilter::Warn)
        .filter_module(env!("CARGO_PKG_NAME"), level)
        .format(|buf, record| {
            let name = env!("CARGO_PKG_NAME");
            let line = match record.level() {
                Level::Error => format!("[{} {}] {}", name.cyan(), "ERROR".red(), record.args()),
                Level::Warn => format!("[{} {}] {}", name.cyan(), "WARN".yellow(), record.args()),
                Level::Debug | Level::Trace => format!(
                    "[{} {}] {}",
                    name.cyan(),
                    record.target().white(),
                    record.args()
                ),
                Level::Info => format!("[{}] {}", name.cyan(), record.args()),
            };
            writeln!(buf, "{}", line)
        })
        .try_init();
}
