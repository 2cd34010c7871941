//! Terminal output formatting with colors
//!
//! Respects NO_COLOR, CLICOLOR, CLICOLOR_FORCE automatically. Callers pass
//! `color` for the stream they write to, since colored only checks stdout.

use std::fmt::Display;
use std::io::{self, Write};

use colored::Colorize;

/// Print error ("error:" prefix, red bold when `color` is set)
pub fn error(w: &mut dyn Write, msg: &(impl Display + ?Sized), color: bool) -> io::Result<()> {
    if color {
        writeln!(w, "{}: {}", "error".red().bold(), msg)
    } else {
        writeln!(w, "error: {}", msg)
    }
}

/// Print plain text, adding a trailing newline if missing
pub fn plain(w: &mut dyn Write, msg: &(impl Display + ?Sized)) -> io::Result<()> {
    let text = msg.to_string();
    if text.ends_with('\n') {
        write!(w, "{}", text)
    } else {
        writeln!(w, "{}", text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_message_when_printing_error_then_prefixed() {
        let mut buf = Vec::new();

        error(&mut buf, "boom", true).unwrap();

        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("error"));
        assert!(text.ends_with(": boom\n"));
    }

    #[test]
    fn given_no_color_when_printing_error_then_plain_prefix() {
        let mut buf = Vec::new();

        error(&mut buf, "boom", false).unwrap();

        assert_eq!(String::from_utf8(buf).unwrap(), "error: boom\n");
    }

    #[test]
    fn given_terminated_text_when_printing_plain_then_no_extra_newline() {
        let mut buf = Vec::new();

        plain(&mut buf, "one\n").unwrap();
        plain(&mut buf, "two").unwrap();

        assert_eq!(String::from_utf8(buf).unwrap(), "one\ntwo\n");
    }
}
