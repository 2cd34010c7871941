//! Infrastructure-level errors (dependency wiring)

use thiserror::Error;

use crate::infrastructure::di::Capability;

/// Wiring errors raised while building or reading the [`Container`].
///
/// Every variant is a configuration defect: it is detected before the runner
/// executes and reported to the user instead of surfacing mid-run.
///
/// [`Container`]: crate::infrastructure::di::Container
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContainerError {
    #[error("no binding for required capability: {0}")]
    Unresolved(Capability),

    #[error("capability already bound: {0}")]
    AlreadyBound(Capability),

    #[error("cannot bind {found} value to capability {expected}")]
    Mismatch {
        expected: Capability,
        found: Capability,
    },

    #[error("capability {capability} bound after {after}")]
    OutOfOrder {
        capability: Capability,
        after: Capability,
    },
}

/// Result type for container operations.
pub type ContainerResult<T> = Result<T, ContainerError>;
