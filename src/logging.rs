//! Logger construction
//!
//! The logger is an injected dependency rather than a global subscriber: the
//! driver builds a [`Logger`] from the parsed options, binds it into the
//! container and runs the runner under it.

use std::io::IsTerminal;

use clap::ValueEnum;
use tracing::level_filters::LevelFilter;
use tracing::Dispatch;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{fmt, Layer, Registry};

use crate::cli::args::Options;

/// Log line format.
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human readable lines
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

/// Logging configuration projected from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogSettings {
    pub level: LevelFilter,
    pub format: LogFormat,
    pub ansi: bool,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: LevelFilter::WARN,
            format: LogFormat::Text,
            ansi: false,
        }
    }
}

impl From<&Options> for LogSettings {
    fn from(options: &Options) -> Self {
        Self {
            level: options.level_filter(),
            format: options.log_format,
            ansi: std::io::stderr().is_terminal(),
        }
    }
}

/// Highest `-d` count with its own level; more is clamped to trace.
pub const MAX_VERBOSITY: u8 = 3;

/// Map the `-d` count to a level: 0=warn, 1=info, 2=debug, 3+=trace.
pub fn verbosity_filter(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// Handle to a configured tracing dispatcher.
#[derive(Debug, Clone)]
pub struct Logger {
    dispatch: Dispatch,
}

impl Logger {
    /// Logger writing to stderr.
    pub fn stderr(settings: LogSettings) -> Self {
        Self::with_writer(settings, BoxMakeWriter::new(std::io::stderr))
    }

    /// Logger writing to an arbitrary writer.
    pub fn with_writer(settings: LogSettings, writer: BoxMakeWriter) -> Self {
        let layer: Box<dyn Layer<Registry> + Send + Sync> = match settings.format {
            LogFormat::Text => fmt::layer()
                .with_writer(writer)
                .with_ansi(settings.ansi)
                .with_target(true)
                .with_thread_names(false)
                .with_span_events(FmtSpan::CLOSE)
                .boxed(),
            LogFormat::Json => fmt::layer()
                .json()
                .with_writer(writer)
                .with_target(true)
                .with_span_events(FmtSpan::CLOSE)
                .boxed(),
        };
        let subscriber = tracing_subscriber::registry()
            .with(layer)
            .with(settings.level);

        Self {
            dispatch: Dispatch::new(subscriber),
        }
    }

    /// Run `f` with this logger as the thread's default dispatcher.
    pub fn in_scope<T>(&self, f: impl FnOnce() -> T) -> T {
        tracing::dispatcher::with_default(&self.dispatch, f)
    }
}

impl From<Dispatch> for Logger {
    fn from(dispatch: Dispatch) -> Self {
        Self { dispatch }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::testing::SharedBuffer;
    use rstest::rstest;

    #[rstest]
    #[case(0, LevelFilter::WARN)]
    #[case(1, LevelFilter::INFO)]
    #[case(2, LevelFilter::DEBUG)]
    #[case(3, LevelFilter::TRACE)]
    #[case(9, LevelFilter::TRACE)]
    fn given_verbosity_when_mapping_then_returns_level(
        #[case] verbosity: u8,
        #[case] expected: LevelFilter,
    ) {
        assert_eq!(verbosity_filter(verbosity), expected);
    }

    #[test]
    fn given_warn_level_when_logging_info_then_filtered_out() {
        let buffer = SharedBuffer::new();
        let logger = Logger::with_writer(LogSettings::default(), buffer.make_writer());

        logger.in_scope(|| {
            tracing::info!("hidden");
            tracing::error!("shown");
        });

        let output = buffer.contents();
        assert!(!output.contains("hidden"));
        assert!(output.contains("shown"));
    }

    #[test]
    fn given_json_format_when_logging_then_writes_json_lines() {
        let buffer = SharedBuffer::new();
        let settings = LogSettings {
            format: LogFormat::Json,
            ..LogSettings::default()
        };
        let logger = Logger::with_writer(settings, buffer.make_writer());

        logger.in_scope(|| tracing::error!(answer = 42, "structured"));

        let output = buffer.contents();
        let line = output.lines().next().unwrap();
        assert!(line.starts_with('{'), "not json: {line}");
        assert!(line.contains("\"message\":\"structured\""));
        assert!(line.contains("\"answer\":42"));
    }
}
