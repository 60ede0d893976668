//! # gnuplot-pipe: typed pipe driver for gnuplot
//!
//! A process-boundary wrapper that drives the external gnuplot program
//! through a one-way text pipe. Commands and data are formatted into
//! gnuplot's scripting language and written to the child's stdin;
//! tabular data travels through tracked temporary files that gnuplot
//! reads back by path. The pipe is write-only: nothing is ever read
//! back from the child (fire-and-forget).
//!
//! ## Architecture
//!
//! - **Session** ([`GnuplotSession`]): owns the child process and the
//!   plot-state bookkeeping (2D/3D mode, plot counter, active styles)
//! - **Command formatter** ([`command`]): builds gnuplot command lines
//!   from typed inputs
//! - **Temporary-file manager** ([`tmpfile::TempFileRegistry`]):
//!   uniquely named data files with an ordered registry, bulk cleanup
//!   and a platform-fixed ceiling
//! - **Configuration** ([`GnuplotConfig`]): executable location, default
//!   terminal and temp directory, explicitly injected at construction
//!
//! ## Example
//!
//! ```no_run
//! use gnuplot_pipe::{GnuplotConfig, GnuplotSession, PlotStyle};
//!
//! fn main() -> gnuplot_pipe::Result<()> {
//!     let mut session = GnuplotSession::open(GnuplotConfig::new())?;
//!     session.set_style(PlotStyle::LinesPoints);
//!     session.set_grid()?;
//!     session.plot_xy(&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0], "samples")?;
//!     session.plot_equation("sin(x)", "reference")?;
//!     session.remove_temp_files()?;
//!     Ok(())
//! }
//! ```
//!
//! ## Concurrency
//!
//! Single-threaded and synchronous: every operation is a direct blocking
//! system call. A session is a single-owner value and must not be shared
//! across threads without external mutual exclusion. There is no timeout
//! or cancellation; a hung gnuplot process blocks the calling thread.

pub mod command;
pub mod config;
pub mod data;
pub mod error;
pub mod session;
pub mod tmpfile;
pub mod types;

// Re-export commonly used types
pub use config::GnuplotConfig;
pub use error::{GnuplotError, Result, ResultExt};
pub use session::{GnuplotSession, PipeTransport, ProcessPipe};
pub use tmpfile::{TempFileRegistry, MAX_TEMP_FILES};
pub use types::{
    CommandKind, ContourParam, ContourSettings, ContourType, PlotStyle, SmoothStyle,
};

#[cfg(any(test, feature = "mock-pipe"))]
pub use session::{CommandLog, MockPipe};
