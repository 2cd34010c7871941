//! Application-level errors (runner failures)

use thiserror::Error;

use crate::infrastructure::ContainerError;

/// Failure while a runner executes.
#[derive(Error, Debug)]
pub enum RunnerError {
    #[error("{0}")]
    Dependency(#[from] ContainerError),

    #[error("cancelled before completion")]
    Cancelled,

    #[error("operation failed: {context}")]
    OperationFailed {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl RunnerError {
    /// Wrap an arbitrary error with context.
    pub fn failed(
        context: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::OperationFailed {
            context: context.into(),
            source: source.into(),
        }
    }
}

/// Result type for runner execution.
pub type RunnerResult<T> = Result<T, RunnerError>;
