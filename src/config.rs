//! Session configuration for the gnuplot pipe driver
//!
//! Historically, pipe-based gnuplot wrappers kept the executable path
//! and default terminal in process-wide mutable statics shared by every
//! session. Here the configuration is an explicit value injected into
//! [`GnuplotSession::open`](crate::session::GnuplotSession::open); hosts
//! that want shared defaults pass the same `GnuplotConfig` to each
//! session themselves.
//!
//! # Example
//!
//! ```
//! use gnuplot_pipe::GnuplotConfig;
//!
//! let config = GnuplotConfig::new()
//!     .with_terminal("png")
//!     .with_executable_dir("/opt/gnuplot/bin");
//! assert_eq!(config.terminal, "png");
//! ```

use crate::error::{GnuplotError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration injected into a gnuplot session at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GnuplotConfig {
    /// Directory searched for the executable before `PATH`
    pub executable_dir: Option<PathBuf>,

    /// File name of the gnuplot executable
    pub executable_name: String,

    /// Default display terminal, selected right after the pipe opens
    pub terminal: String,

    /// Directory for temporary data files; `None` means the system temp
    /// directory
    pub temp_dir: Option<PathBuf>,
}

impl Default for GnuplotConfig {
    fn default() -> Self {
        Self {
            executable_dir: Some(PathBuf::from(if cfg!(windows) {
                "C:/program files/gnuplot/bin"
            } else {
                "/usr/local/bin"
            })),
            executable_name: if cfg!(windows) {
                "pgnuplot.exe".to_string()
            } else {
                "gnuplot".to_string()
            },
            terminal: if cfg!(windows) {
                "windows".to_string()
            } else if cfg!(target_os = "macos") {
                "aqua".to_string()
            } else {
                "x11".to_string()
            },
            temp_dir: None,
        }
    }
}

impl GnuplotConfig {
    /// Create a configuration with platform defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the directory searched before `PATH`.
    pub fn with_executable_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.executable_dir = Some(dir.into());
        self
    }

    /// Set the executable file name.
    pub fn with_executable_name(mut self, name: impl Into<String>) -> Self {
        self.executable_name = name.into();
        self
    }

    /// Set the default display terminal.
    pub fn with_terminal(mut self, terminal: impl Into<String>) -> Self {
        self.terminal = terminal.into();
        self
    }

    /// Set the directory for temporary data files.
    pub fn with_temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = Some(dir.into());
        self
    }

    /// Load a configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            GnuplotError::Config(format!("failed to read config file {path:?}: {e}"))
        })?;
        toml::from_str(&content).map_err(|e| {
            GnuplotError::Config(format!("failed to parse config file {path:?}: {e}"))
        })
    }

    /// Load a configuration, returning platform defaults on any error.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(path).unwrap_or_default()
    }

    /// Save the configuration to a TOML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                GnuplotError::Config(format!("failed to create config directory: {e}"))
            })?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| GnuplotError::Config(format!("failed to serialize config: {e}")))?;
        std::fs::write(path, content).map_err(|e| {
            GnuplotError::Config(format!("failed to write config file {path:?}: {e}"))
        })
    }

    /// Locate the gnuplot executable.
    ///
    /// Looks at [`executable_dir`](Self::executable_dir) first, then
    /// scans `PATH` split on the platform separator. Fails with
    /// [`GnuplotError::Launch`] when no candidate exists.
    pub fn locate_executable(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.executable_dir {
            let candidate = dir.join(&self.executable_name);
            if is_executable(&candidate) {
                return Ok(candidate);
            }
        }

        if let Some(path_var) = std::env::var_os("PATH") {
            for dir in std::env::split_paths(&path_var) {
                let candidate = dir.join(&self.executable_name);
                if is_executable(&candidate) {
                    return Ok(candidate);
                }
            }
        }

        Err(GnuplotError::Launch(format!(
            "cannot find {} neither in PATH nor in {:?}",
            self.executable_name, self.executable_dir
        )))
    }
}

/// Whether `path` is a file this process may execute.
#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

/// On non-Unix platforms only existence is checked.
#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
