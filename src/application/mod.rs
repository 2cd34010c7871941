//! Application layer: the runner contract
//!
//! This layer defines what gets executed once dependencies are wired.

pub mod error;
pub mod runner;

pub use error::{RunnerError, RunnerResult};
pub use runner::Runner;
