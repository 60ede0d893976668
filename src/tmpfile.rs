//! Temporary data file allocation and bulk cleanup
//!
//! Each plot call that carries data writes it into a uniquely named
//! temporary file that gnuplot reads back by path. Files are tracked in
//! an ordered registry for bulk deletion and are never auto-deleted on
//! drop: an unbounded-lifetime gnuplot child may still be reading them.
//!
//! The number of simultaneously tracked files is capped at a
//! platform-fixed ceiling: 64 on Unix-like systems, 27 on Windows. The
//! asymmetry is an external OS constraint, not a design choice.

use crate::error::{GnuplotError, Result};
use std::fs::File;
use std::path::{Path, PathBuf};

/// Platform ceiling for simultaneously tracked temporary files.
pub const MAX_TEMP_FILES: usize = if cfg!(windows) { 27 } else { 64 };

/// Prefix for generated file names.
const TEMP_FILE_PREFIX: &str = "gnuplot_";

/// Ordered registry of temporary data files created by one session.
#[derive(Debug, Default)]
pub struct TempFileRegistry {
    /// Directory for new files; `None` means the system temp directory
    dir: Option<PathBuf>,
    /// Paths in creation order
    files: Vec<PathBuf>,
}

impl TempFileRegistry {
    /// Create an empty registry backed by the system temp directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty registry that places files in `dir`.
    pub fn with_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: Some(dir.into()),
            files: Vec::new(),
        }
    }

    /// Number of currently tracked files.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Paths of all tracked files, in creation order.
    pub fn paths(&self) -> &[PathBuf] {
        &self.files
    }

    /// Create a freshly opened, uniquely named file ready for writing.
    ///
    /// Fails with [`GnuplotError::ResourceExhausted`] once the registry
    /// holds one file less than [`MAX_TEMP_FILES`]; no file is created on
    /// the failing call. The ceiling check precedes any filesystem
    /// access, so rejection has no side effect.
    pub fn create(&mut self) -> Result<(File, PathBuf)> {
        if self.files.len() >= MAX_TEMP_FILES - 1 {
            return Err(GnuplotError::ResourceExhausted {
                limit: MAX_TEMP_FILES,
            });
        }

        let dir = match &self.dir {
            Some(dir) => dir.clone(),
            None => std::env::temp_dir(),
        };
        let named = tempfile::Builder::new()
            .prefix(TEMP_FILE_PREFIX)
            .tempfile_in(&dir)?;
        // Detach from the tempfile guard: the file must outlive this
        // handle so gnuplot can read it later.
        let (file, path) = named.keep().map_err(|e| GnuplotError::Io(e.error))?;

        tracing::debug!(path = %path.display(), "created temporary data file");
        self.files.push(path.clone());
        Ok((file, path))
    }

    /// Delete every registered file and clear the registry.
    ///
    /// All deletions are attempted even when one fails; the error names
    /// the first offending path. An empty registry is a no-op.
    pub fn remove_all(&mut self) -> Result<()> {
        if self.files.is_empty() {
            return Ok(());
        }

        let attempted = self.files.len();
        let mut failed: Vec<PathBuf> = Vec::new();
        for path in self.files.drain(..) {
            if let Err(e) = std::fs::remove_file(&path) {
                tracing::warn!(path = %path.display(), error = %e, "failed to delete temporary file");
                failed.push(path);
            }
        }

        match failed.first() {
            Some(first) => Err(GnuplotError::Cleanup {
                path: first.clone(),
                failed: failed.len(),
                attempted,
            }),
            None => {
                tracing::debug!(count = attempted, "deleted temporary data files");
                Ok(())
            }
        }
    }
}

/// Whether a path looks like a file this crate generated.
pub fn is_generated_path(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with(TEMP_FILE_PREFIX))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_create_registers_path() {
        let dir = tempfile::tempdir().unwrap();
        let mut registry = TempFileRegistry::with_dir(dir.path());

        let (mut file, path) = registry.create().unwrap();
        writeln!(file, "1 2").unwrap();

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.paths()[0], path);
        assert!(path.exists());
        assert!(is_generated_path(&path));

        registry.remove_all().unwrap();
    }

    #[test]
    fn test_file_survives_handle_drop() {
        let dir = tempfile::tempdir().unwrap();
        let mut registry = TempFileRegistry::with_dir(dir.path());

        let path = {
            let (_file, path) = registry.create().unwrap();
            path
        };
        assert!(path.exists());

        registry.remove_all().unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_remove_all_empty_is_noop() {
        let mut registry = TempFileRegistry::new();
        assert!(registry.remove_all().is_ok());
        assert!(registry.remove_all().is_ok());
    }

    #[test]
    fn test_remove_all_continues_past_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut registry = TempFileRegistry::with_dir(dir.path());

        let (_f1, gone) = registry.create().unwrap();
        let (_f2, kept) = registry.create().unwrap();
        std::fs::remove_file(&gone).unwrap();

        let err = registry.remove_all().unwrap_err();
        match err {
            GnuplotError::Cleanup {
                path,
                failed,
                attempted,
            } => {
                assert_eq!(path, gone);
                assert_eq!(failed, 1);
                assert_eq!(attempted, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
        // the second deletion still happened
        assert!(!kept.exists());
        assert!(registry.is_empty());
    }
}
