//! CLI argument definitions using clap

use clap::{ArgAction, Parser};
use tracing::level_filters::LevelFilter;

use crate::logging::{verbosity_filter, LogFormat};

/// Version reported by `--version`; set `PROGSHELL_VERSION` at build time to override.
pub const VERSION: &str = match option_env!("PROGSHELL_VERSION") {
    Some(version) => version,
    None => "unknown",
};

/// CLI bootstrap shell: parse options, inject dependencies, run
#[derive(Parser, Debug, Clone, Default, PartialEq, Eq)]
#[command(name = "progshell")]
#[command(author, about, long_about = None)]
#[command(version = VERSION, disable_version_flag = true)]
pub struct Options {
    /// Print version and exit
    #[arg(long, action = ArgAction::Version)]
    pub version: Option<bool>,

    /// Increase log verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count, conflicts_with = "quiet")]
    pub debug: u8,

    /// Only log errors
    #[arg(short, long)]
    pub quiet: bool,

    /// Log line format
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

impl Options {
    /// Level filter selected by `--quiet` / `--debug`.
    pub fn level_filter(&self) -> LevelFilter {
        if self.quiet {
            LevelFilter::ERROR
        } else {
            verbosity_filter(self.debug)
        }
    }
}
