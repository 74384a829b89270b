// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

use crate::types::Category;

/// Command-line arguments for `timebox`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "timebox",
    version,
    about = "Run a command under a deadline; kill it if the deadline wins.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// If omitted, `Timebox.toml` in the current directory is used when it
    /// exists, otherwise built-in defaults.
    #[arg(long, value_name = "PATH")]
    pub config: Option<String>,

    /// Use the preset deadline for this category.
    #[arg(long, value_enum, value_name = "CATEGORY")]
    pub category: Option<Category>,

    /// Deadline in milliseconds (overrides the category preset).
    #[arg(long, value_name = "MS", value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout_ms: Option<u64>,

    /// Message printed when the deadline wins.
    #[arg(long, value_name = "TEXT")]
    pub message: Option<String>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `TIMEBOX_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Print the effective deadlines, but don't run anything.
    #[arg(long)]
    pub dry_run: bool,

    /// The command to run, e.g. `timebox -- curl -s https://example.com`.
    #[arg(last = true, value_name = "COMMAND")]
    pub command: Vec<String>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_command_is_collected() {
        let args = CliArgs::parse_from([
            "timebox",
            "--category",
            "query",
            "--",
            "sleep",
            "1",
        ]);
        assert_eq!(args.category, Some(Category::Query));
        assert_eq!(args.command, vec!["sleep".to_string(), "1".to_string()]);
    }

    #[test]
    fn category_accepts_the_same_aliases_as_config() {
        for (word, expected) in [
            ("read", Category::Query),
            ("authentication", Category::Auth),
            ("write", Category::Insert),
            ("insert", Category::Insert),
        ] {
            let args = CliArgs::parse_from(["timebox", "--category", word, "--", "true"]);
            assert_eq!(args.category, Some(expected), "--category {word}");
        }
        assert!(CliArgs::try_parse_from(["timebox", "--category", "delete", "--", "true"]).is_err());
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let res = CliArgs::try_parse_from(["timebox", "--timeout-ms", "0", "--", "true"]);
        assert!(res.is_err());
    }
}
