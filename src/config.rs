//! Command-line configuration for the `spend` binary.

use clap::Parser;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

/// spend: record what you spend and chart where the money goes.
///
/// Starts an interactive menu. Enter `1` to record a purchase or `2` to show
/// the analysis report for the current month.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    /// The SQLite database file holding spending records. Created if missing.
    #[arg(long, env = "SPEND_DB", default_value = "p_finance.db")]
    database: PathBuf,

    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, default_value_t = LevelFilter::WARN)]
    log_level: LevelFilter,
}

impl Args {
    pub fn database(&self) -> &Path {
        &self.database
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }
}

/// Initializes the tracing subscriber. Logs go to stderr so they stay out of
/// the prompts.
pub fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => EnvFilter::from_default_env(),
        None => EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), level)),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["spend"]).unwrap();
        if std::env::var_os("SPEND_DB").is_none() {
            assert_eq!(args.database(), Path::new("p_finance.db"));
        }
        assert_eq!(args.log_level(), LevelFilter::WARN);
    }

    #[test]
    fn test_explicit_flags() {
        let args = Args::try_parse_from([
            "spend",
            "--database",
            "/tmp/other.db",
            "--log-level",
            "debug",
        ])
        .unwrap();
        assert_eq!(args.database(), Path::new("/tmp/other.db"));
        assert_eq!(args.log_level(), LevelFilter::DEBUG);
    }

    #[test]
    fn test_bad_log_level_rejected() {
        let result = Args::try_parse_from(["spend", "--log-level", "loud"]);
        assert!(result.is_err());
    }
}
