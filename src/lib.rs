//! Bootstrap shell for a command-line program.
//!
//! Arguments are parsed into [`cli::Options`], the per-invocation
//! dependencies (cancellation token, logger, options) are bound into an
//! [`infrastructure::di::Container`], and a single [`application::Runner`] is
//! executed with them. Termination always goes through an injected
//! [`infrastructure::ExitController`].

pub mod application;
pub mod cli;
pub mod exitcode;
pub mod infrastructure;
pub mod logging;
pub mod util;
