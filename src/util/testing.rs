//! Test doubles and one-time test setup

use std::cell::RefCell;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, Once, PoisonError};

use tracing::{debug, info, level_filters::LevelFilter};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan, writer::BoxMakeWriter},
    prelude::*,
};

use crate::infrastructure::traits::{ExitController, Exited};

static TEST_SETUP: Once = Once::new();

pub fn init_test_setup() {
    TEST_SETUP.call_once(|| {
        // global logging subscriber, used by code running outside a driver
        setup_test_logging();
        info!("Test Setup complete");
    });
}

fn setup_test_logging() {
    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_test_writer()
            .with_target(true)
            .with_thread_names(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(LevelFilter::TRACE),
    );

    // Only set if we haven't already set a global subscriber
    if tracing::dispatcher::has_been_set() {
        debug!("Tracing subscriber already set");
    } else {
        subscriber.try_init().unwrap_or_else(|e| {
            eprintln!("Error: Failed to set up logging: {}", e);
        });
    }
}

/// Exit controller that records requested codes instead of terminating.
#[derive(Debug, Default)]
pub struct RecordingExit {
    codes: RefCell<Vec<i32>>,
}

impl RecordingExit {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every code requested so far, oldest first.
    pub fn codes(&self) -> Vec<i32> {
        self.codes.borrow().clone()
    }

    pub fn last(&self) -> Option<i32> {
        self.codes.borrow().last().copied()
    }
}

impl ExitController for RecordingExit {
    fn exit(&self, code: i32) -> Exited {
        self.codes.borrow_mut().push(code);
        Exited::new(code)
    }
}

/// Cloneable in-memory sink, usable as a `Write` or as a tracing writer.
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> String {
        let bytes = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        String::from_utf8_lossy(&bytes).into_owned()
    }

    pub fn make_writer(&self) -> BoxMakeWriter {
        let buffer = self.clone();
        BoxMakeWriter::new(move || buffer.clone())
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
