//! Runner: the single execution entry point

use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument};

use crate::application::error::{RunnerError, RunnerResult};
use crate::cli::args::Options;
use crate::infrastructure::di::{Capability, Container};
use crate::logging::Logger;

/// Performs the program's work with its dependencies injected.
pub trait Runner {
    /// Capabilities that must resolve before [`Runner::run`] is called.
    fn requires(&self) -> &'static [Capability];

    fn run(&self, deps: &Container) -> RunnerResult<()>;
}

/// The options are their own runner. There is no command to host yet, so a
/// run checks its dependencies and succeeds.
impl Runner for Options {
    fn requires(&self) -> &'static [Capability] {
        &Capability::ALL
    }

    #[instrument(level = "debug", skip_all)]
    fn run(&self, deps: &Container) -> RunnerResult<()> {
        let token = deps.get::<CancellationToken>()?;
        let logger = deps.get::<Logger>()?;
        let options = deps.get::<Options>()?;

        if token.is_cancelled() {
            return Err(RunnerError::Cancelled);
        }
        logger.in_scope(|| debug!(?options, "running"));
        Ok(())
    }
}
