use crate::cli::Cli;

// Logger
use env_logger::Builder;

/// Build logger
pub fn set_logger(cli: &Cli) {
    // Set verbosity
    let verbosity: log::LevelFilter = cli.verbose.log_level_filter();
    // Logs go to stderr, stdout is kept for the report.
    let res = Builder::new()
        .filter_level(verbosity)
        .format_timestamp(None)
        .try_init();
    if let Err(e) = res {
        eprintln!("Logger already set: {}", e);
    }
}
