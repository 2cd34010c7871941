//! Infrastructure layer: termination boundary and DI container
//!
//! This layer owns the process-level side effects and wires up the
//! per-invocation dependencies.

pub mod di;
pub mod error;
pub mod traits;

pub use error::{ContainerError, ContainerResult};
pub use traits::{ExitController, Exited, ProcessExit};
