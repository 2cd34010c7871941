//! Top-level driver: parse, wire, run, exit
//!
//! One driver handles one invocation and walks
//! `Unparsed → Parsed → Running → Completed`. A parse failure or a
//! short-circuit goes straight from `Unparsed` to `Completed`; a wiring defect
//! goes from `Parsed` to `Completed(Failure)`. Exit is requested exactly once,
//! through the injected [`ExitController`].

use std::ffi::OsString;
use std::io::{IsTerminal, Write};

use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};
use tracing_subscriber::fmt::writer::BoxMakeWriter;

use crate::application::Runner;
use crate::cli::args::Options;
use crate::cli::error::CliError;
use crate::cli::output;
use crate::cli::parser::{self, Parsed};
use crate::exitcode;
use crate::infrastructure::di::Container;
use crate::infrastructure::error::ContainerResult;
use crate::infrastructure::traits::{ExitController, Exited};
use crate::logging::{LogSettings, Logger, MAX_VERBOSITY};

/// How a completed invocation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure,
}

/// Lifecycle of one invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Unparsed,
    Parsed,
    Running,
    Completed(Outcome),
}

impl Phase {
    pub fn can_advance_to(self, next: Phase) -> bool {
        use Phase::*;
        matches!(
            (self, next),
            (Unparsed, Parsed)
                | (Unparsed, Completed(_))
                | (Parsed, Running)
                | (Parsed, Completed(Outcome::Failure))
                | (Running, Completed(_))
        )
    }
}

/// What a driver run left behind.
#[derive(Debug)]
pub struct Completion {
    pub exited: Exited,
    pub trail: Vec<Phase>,
}

impl Completion {
    pub fn code(&self) -> i32 {
        self.exited.code()
    }

    /// Whether the invocation ever passed through `phase`.
    pub fn entered(&self, phase: Phase) -> bool {
        self.trail.contains(&phase)
    }

    pub fn outcome(&self) -> Option<Outcome> {
        match self.trail.last() {
            Some(Phase::Completed(outcome)) => Some(*outcome),
            _ => None,
        }
    }
}

/// Builds the container from the token, logger and parsed options.
pub type BuildContainer<'a> =
    Box<dyn FnOnce(CancellationToken, Logger, Options) -> ContainerResult<Container> + 'a>;

pub struct Driver<'a> {
    out: &'a mut dyn Write,
    err: &'a mut dyn Write,
    exit: &'a dyn ExitController,
    token: CancellationToken,
    log_writer: Option<BoxMakeWriter>,
    build: Option<BuildContainer<'a>>,
    color: bool,
    trail: Vec<Phase>,
}

impl<'a> Driver<'a> {
    pub fn new(
        out: &'a mut dyn Write,
        err: &'a mut dyn Write,
        exit: &'a dyn ExitController,
    ) -> Self {
        Self {
            out,
            err,
            exit,
            token: CancellationToken::new(),
            log_writer: None,
            build: None,
            color: std::io::stderr().is_terminal(),
            trail: vec![Phase::Unparsed],
        }
    }

    /// Use `token` as the invocation's cancellation token.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.token = token;
        self
    }

    /// Send log output to `writer` instead of stderr.
    pub fn with_log_writer(mut self, writer: BoxMakeWriter) -> Self {
        self.log_writer = Some(writer);
        self
    }

    /// Replace [`Container::assemble`] as the way dependencies get wired.
    pub fn with_container_builder(
        mut self,
        build: impl FnOnce(CancellationToken, Logger, Options) -> ContainerResult<Container> + 'a,
    ) -> Self {
        self.build = Some(Box::new(build));
        self
    }

    /// Colorize the `error:` prefix of reported failures.
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// Parse `args` and run the options themselves.
    pub fn execute<I, T>(self, args: I) -> Completion
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        self.execute_with(args, Options::clone)
    }

    /// Parse `args` and run the runner `select` picks from the options.
    pub fn execute_with<I, T, R, F>(mut self, args: I, select: F) -> Completion
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
        R: Runner,
        F: FnOnce(&Options) -> R,
    {
        let options = match parser::parse(args, self.out, self.exit) {
            Ok(Parsed::Ready(options)) => {
                self.advance(Phase::Parsed);
                options
            }
            Ok(Parsed::Exited(exited)) => {
                self.advance(Phase::Completed(Outcome::Success));
                return self.complete(exited);
            }
            Err(e) => return self.fail(CliError::from(e)),
        };

        let logger = self.logger(&options);
        let runner = select(&options);
        let token = self.token.clone();
        let built = match self.build.take() {
            Some(build) => build(token, logger.clone(), options),
            None => Container::assemble(token, logger.clone(), options),
        };
        let deps = match built.and_then(|deps| deps.ensure(runner.requires()).map(|()| deps)) {
            Ok(deps) => deps,
            Err(e) => return self.fail(CliError::from(e)),
        };

        logger.in_scope(|| {
            self.advance(Phase::Running);
            match runner.run(&deps) {
                Ok(()) => {
                    self.advance(Phase::Completed(Outcome::Success));
                    let exited = self.exit.exit(exitcode::OK);
                    self.complete(exited)
                }
                Err(e) => {
                    error!(error = %e, "Program failed");
                    let code = CliError::from(e).exit_code();
                    self.advance(Phase::Completed(Outcome::Failure));
                    let exited = self.exit.exit(code);
                    self.complete(exited)
                }
            }
        })
    }

    fn logger(&mut self, options: &Options) -> Logger {
        let settings = LogSettings::from(options);
        let logger = match self.log_writer.take() {
            Some(writer) => Logger::with_writer(
                LogSettings {
                    ansi: false,
                    ..settings
                },
                writer,
            ),
            None => Logger::stderr(settings),
        };
        if options.debug > MAX_VERBOSITY {
            logger.in_scope(|| warn!("Don't be crazy, max is -d -d -d"));
        }
        logger
    }

    /// Report a failure that happened before the runner and request exit.
    fn fail(mut self, e: CliError) -> Completion {
        let reported = match &e {
            CliError::Parse(parse) => output::plain(self.err, parse),
            _ => output::error(self.err, &e, self.color),
        };
        if let Err(io) = reported.and_then(|()| self.err.flush()) {
            debug!(error = %io, "could not report failure");
        }
        self.advance(Phase::Completed(Outcome::Failure));
        let exited = self.exit.exit(e.exit_code());
        self.complete(exited)
    }

    fn complete(self, exited: Exited) -> Completion {
        self.out.flush().ok();
        Completion {
            exited,
            trail: self.trail,
        }
    }

    fn advance(&mut self, next: Phase) {
        let current = self.phase();
        debug_assert!(
            current.can_advance_to(next),
            "illegal transition {current:?} -> {next:?}"
        );
        debug!(from = ?current, to = ?next, "phase");
        self.trail.push(next);
    }

    pub fn phase(&self) -> Phase {
        self.trail.last().copied().unwrap_or(Phase::Unparsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    use Outcome::*;
    use Phase::*;

    #[rstest]
    #[case(Unparsed, Parsed, true)]
    #[case(Unparsed, Completed(Success), true)]
    #[case(Unparsed, Completed(Failure), true)]
    #[case(Parsed, Running, true)]
    #[case(Parsed, Completed(Failure), true)]
    #[case(Running, Completed(Success), true)]
    #[case(Running, Completed(Failure), true)]
    #[case(Unparsed, Running, false)]
    #[case(Parsed, Completed(Success), false)]
    #[case(Completed(Success), Running, false)]
    #[case(Completed(Failure), Parsed, false)]
    fn given_phases_when_checking_transition_then_matches_lifecycle(
        #[case] from: Phase,
        #[case] to: Phase,
        #[case] allowed: bool,
    ) {
        assert_eq!(from.can_advance_to(to), allowed);
    }
}
