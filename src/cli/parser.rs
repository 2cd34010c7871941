//! Argument parsing with parse-time short-circuits
//!
//! `--version` and `--help` are acted on here, while clap is still parsing:
//! the text is written, termination is requested with [`exitcode::OK`] and
//! the caller gets [`Parsed::Exited`] instead of options. A runner is never
//! reached on that path.
//!
//! [`exitcode::OK`]: crate::exitcode::OK

use std::ffi::OsString;
use std::fmt::Display;
use std::io::Write;

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use tracing::debug;

use crate::cli::args::{Options, VERSION};
use crate::cli::error::ParseError;
use crate::cli::output;
use crate::exitcode;
use crate::infrastructure::traits::{ExitController, Exited};

/// Result of a successful parse.
#[derive(Debug)]
pub enum Parsed {
    /// Options are ready for the runner.
    Ready(Options),
    /// A short-circuit flag already produced its output and requested exit.
    Exited(Exited),
}

/// Parse the argument tail (argv without the program name).
pub fn parse<I, T>(
    args: I,
    out: &mut dyn Write,
    exit: &dyn ExitController,
) -> Result<Parsed, ParseError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let name = OsString::from(Options::command().get_name());
    let argv = std::iter::once(name).chain(args.into_iter().map(Into::into));

    match Options::try_parse_from(argv) {
        Ok(options) => Ok(Parsed::Ready(options)),
        Err(err) => match err.kind() {
            ErrorKind::DisplayVersion => short_circuit(out, exit, VERSION),
            ErrorKind::DisplayHelp => short_circuit(out, exit, err.render()),
            _ => Err(ParseError::from(err)),
        },
    }
}

fn short_circuit(
    out: &mut dyn Write,
    exit: &dyn ExitController,
    text: impl Display,
) -> Result<Parsed, ParseError> {
    debug!("short-circuit during parse");
    output::plain(out, &text).map_err(clap::Error::from)?;
    out.flush().map_err(clap::Error::from)?;
    Ok(Parsed::Exited(exit.exit(exitcode::OK)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::LogFormat;
    use crate::util::testing::RecordingExit;
    use rstest::rstest;

    fn run(args: &[&str]) -> (Result<Parsed, ParseError>, String, RecordingExit) {
        let exit = RecordingExit::new();
        let mut out = Vec::new();
        let parsed = parse(args.iter().copied(), &mut out, &exit);
        (parsed, String::from_utf8(out).unwrap(), exit)
    }

    #[test]
    fn given_version_flag_when_parsing_then_prints_version_and_exits_zero() {
        let (parsed, out, exit) = run(&["--version"]);

        assert!(matches!(parsed, Ok(Parsed::Exited(e)) if e.code() == 0));
        assert_eq!(out, "unknown\n");
        assert_eq!(exit.codes(), vec![0]);
    }

    #[rstest]
    #[case(&["-d", "--version"])]
    #[case(&["--version", "--quiet"])]
    #[case(&["--log-format", "json", "--version"])]
    fn given_version_with_other_flags_when_parsing_then_output_unchanged(#[case] args: &[&str]) {
        let (parsed, out, exit) = run(args);

        assert!(matches!(parsed, Ok(Parsed::Exited(_))));
        assert_eq!(out, "unknown\n");
        assert_eq!(exit.codes(), vec![0]);
    }

    #[test]
    fn given_help_flag_when_parsing_then_prints_usage_and_exits_zero() {
        let (parsed, out, exit) = run(&["--help"]);

        assert!(matches!(parsed, Ok(Parsed::Exited(_))));
        assert!(out.contains("Usage:"), "help output: {out}");
        assert!(out.contains("--version"));
        assert_eq!(exit.codes(), vec![0]);
    }

    #[rstest]
    #[case(&["--bogus-flag"])]
    #[case(&["positional"])]
    #[case(&["--log-format", "xml"])]
    #[case(&["--log-format"])]
    #[case(&["--quiet", "--debug"])]
    fn given_malformed_args_when_parsing_then_parse_error_without_exit(#[case] args: &[&str]) {
        let (parsed, out, exit) = run(args);

        assert!(parsed.is_err());
        assert!(out.is_empty());
        assert!(exit.codes().is_empty());
    }

    #[test]
    fn given_bogus_flag_when_parsing_then_unknown_argument() {
        let (parsed, _, _) = run(&["--bogus-flag"]);

        let err = parsed.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownArgument);
        assert!(err.to_string().contains("--bogus-flag"));
    }

    #[test]
    fn given_no_args_when_parsing_then_defaults() {
        let (parsed, _, exit) = run(&[]);

        match parsed {
            Ok(Parsed::Ready(options)) => assert_eq!(options, Options::default()),
            other => panic!("expected options, got {other:?}"),
        }
        assert!(exit.codes().is_empty());
    }

    #[test]
    fn given_logging_flags_when_parsing_then_options_carry_them() {
        let (parsed, _, _) = run(&["-dd", "--log-format", "json"]);

        let Ok(Parsed::Ready(options)) = parsed else {
            panic!("expected options");
        };
        assert_eq!(options.debug, 2);
        assert_eq!(options.log_format, LogFormat::Json);
        assert!(!options.quiet);
    }
}
