//! Pipe transport between the session and the gnuplot child process
//!
//! The session talks to gnuplot through the [`PipeTransport`] trait so
//! tests can substitute a recording mock for a real child process. The
//! real implementation, [`ProcessPipe`], spawns gnuplot with a piped
//! stdin and never reads back: all success or failure signaling from the
//! plotting program is invisible to this layer (fire-and-forget).

use crate::error::{GnuplotError, Result};
use std::io::Write;
use std::path::Path;
use std::process::{Child, ChildStdin, Command, Stdio};

/// Write-only command channel into a gnuplot process.
///
/// One transport is owned by exactly one session. `send` must deliver
/// the line to the child before returning: plot/replot/splot decisions
/// depend on external state this crate does not introspect, so no
/// buffering across calls is allowed.
pub trait PipeTransport: Send {
    /// Write one command line plus a trailing newline and flush.
    fn send(&mut self, line: &str) -> Result<()>;

    /// Close the channel. Called at most once.
    fn close(&mut self) -> Result<()>;
}

/// Transport backed by a spawned gnuplot child process.
pub struct ProcessPipe {
    child: Child,
    stdin: Option<ChildStdin>,
}

impl ProcessPipe {
    /// Spawn `executable` with a piped stdin.
    ///
    /// Stdout and stderr are discarded: this layer never reads back from
    /// the child.
    pub fn spawn(executable: &Path) -> Result<Self> {
        let mut child = Command::new(executable)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| {
                GnuplotError::Launch(format!("could not spawn {}: {e}", executable.display()))
            })?;

        let stdin = child.stdin.take().ok_or_else(|| {
            GnuplotError::Launch(format!(
                "no stdin pipe for spawned process {}",
                executable.display()
            ))
        })?;

        tracing::info!(executable = %executable.display(), pid = child.id(), "spawned gnuplot");
        Ok(Self {
            child,
            stdin: Some(stdin),
        })
    }
}

impl PipeTransport for ProcessPipe {
    fn send(&mut self, line: &str) -> Result<()> {
        let stdin = self.stdin.as_mut().ok_or_else(|| {
            GnuplotError::Io(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "pipe to gnuplot already closed",
            ))
        })?;
        stdin.write_all(line.as_bytes())?;
        stdin.write_all(b"\n")?;
        stdin.flush()?;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        // Dropping stdin sends EOF, which makes gnuplot exit.
        drop(self.stdin.take());
        let status = self.child.wait()?;
        if !status.success() {
            tracing::warn!(%status, "gnuplot exited with non-zero status");
        }
        Ok(())
    }
}
