//! I/O boundary traits for testability
//!
//! Process termination is the one side effect the shell cannot undo, so it
//! sits behind a trait and is handed to the driver explicitly.

use std::io::Write;

/// Proof that termination was requested with a given code.
///
/// Only an [`ExitController`] hands these out. With [`ProcessExit`] the value
/// is never observed because the process is gone before it returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct Exited(i32);

impl Exited {
    /// Wrap a requested exit code. Meant for [`ExitController`] implementations.
    pub fn new(code: i32) -> Self {
        Self(code)
    }

    /// The code termination was requested with.
    pub fn code(self) -> i32 {
        self.0
    }
}

/// Termination strategy: "terminate the process with code N".
pub trait ExitController {
    /// Request termination with `code`.
    fn exit(&self, code: i32) -> Exited;
}

// ============================================================
// REAL IMPLEMENTATIONS
// ============================================================

/// Real termination via [`std::process::exit`].
#[derive(Debug, Default)]
pub struct ProcessExit;

impl ExitController for ProcessExit {
    fn exit(&self, code: i32) -> Exited {
        // process::exit skips destructors, so buffered output must go first
        std::io::stdout().flush().ok();
        std::io::stderr().flush().ok();
        std::process::exit(code)
    }
}
