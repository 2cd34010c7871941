//! CLI-level errors (wraps container and runner errors)

use thiserror::Error;

use crate::application::RunnerError;
use crate::infrastructure::ContainerError;

/// Malformed command-line input.
///
/// The message is clap's rendered diagnostic, usage line included.
#[derive(Error, Debug)]
#[error("{0}")]
pub struct ParseError(#[from] clap::Error);

impl ParseError {
    pub fn kind(&self) -> clap::error::ErrorKind {
        self.0.kind()
    }
}

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("configuration error: {0}")]
    Container(#[from] ContainerError),

    #[error("{0}")]
    Runner(#[from] RunnerError),
}

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Parse(_) | CliError::Container(_) | CliError::Runner(_) => {
                crate::exitcode::FAILURE
            }
        }
    }
}
