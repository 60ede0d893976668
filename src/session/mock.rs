//! Mock transport for testing without a gnuplot installation
//!
//! [`MockPipe`] records every command line a session sends instead of
//! writing it to a child process. The shared [`CommandLog`] stays usable
//! after the pipe has been handed to a session, so tests can assert on
//! the exact commands a plotting operation produced.
//!
//! # Enabling
//!
//! Outside this crate's own tests the mock is only available when the
//! `mock-pipe` feature is enabled:
//!
//! ```bash
//! cargo test --features mock-pipe
//! ```

use super::transport::PipeTransport;
use crate::error::{GnuplotError, Result};
use std::sync::{Arc, Mutex};

#[derive(Debug, Default)]
struct LogInner {
    commands: Vec<String>,
    closed: bool,
}

/// Shared view of the commands a [`MockPipe`] has received.
#[derive(Debug, Clone, Default)]
pub struct CommandLog {
    inner: Arc<Mutex<LogInner>>,
}

impl CommandLog {
    /// All recorded command lines, in send order.
    pub fn commands(&self) -> Vec<String> {
        self.inner.lock().unwrap().commands.clone()
    }

    /// The most recently sent command line.
    pub fn last(&self) -> Option<String> {
        self.inner.lock().unwrap().commands.last().cloned()
    }

    /// Number of recorded commands.
    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().commands.len()
    }

    /// Whether no command has been recorded.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().unwrap().commands.is_empty()
    }

    /// Whether the pipe has been closed.
    pub fn is_closed(&self) -> bool {
        self.inner.lock().unwrap().closed
    }
}

/// Recording stand-in for a gnuplot child process.
#[derive(Debug, Default)]
pub struct MockPipe {
    log: CommandLog,
    fail_sends: bool,
}

impl MockPipe {
    /// Create a mock pipe with an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `send` fail with an I/O error.
    pub fn with_failing_sends(mut self) -> Self {
        self.fail_sends = true;
        self
    }

    /// Handle to the shared command log.
    pub fn log(&self) -> CommandLog {
        self.log.clone()
    }
}

impl PipeTransport for MockPipe {
    fn send(&mut self, line: &str) -> Result<()> {
        if self.fail_sends {
            return Err(GnuplotError::Io(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "mock pipe configured to fail",
            )));
        }
        self.log.inner.lock().unwrap().commands.push(line.to_string());
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.log.inner.lock().unwrap().closed = true;
        Ok(())
    }
}
