//! File emission and post-write formatting
//!
//! The writer knows nothing about write policies; it only answers "does this
//! exist" and "write this". The orchestrator decides which files to skip.

use std::fs::{self, DirBuilder};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::{Error, Result};

/// Writes generated files below an output root
#[derive(Debug, Clone)]
pub struct OutputWriter {
    root: PathBuf,
}

impl OutputWriter {
    /// Create a writer rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Output root
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute location of a relative artifact path
    #[must_use]
    pub fn resolve(&self, relative: &Path) -> PathBuf {
        self.root.join(relative)
    }

    /// Whether a relative path already exists
    #[must_use]
    pub fn exists(&self, relative: &Path) -> bool {
        self.resolve(relative).exists()
    }

    /// Model directories below `src/models` that contain a `mod.rs`
    ///
    /// Sorted by name. A missing `src/models` yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the directory cannot be listed.
    pub fn model_modules(&self) -> Result<Vec<String>> {
        let models = self.root.join("src").join("models");
        if !models.is_dir() {
            return Ok(Vec::new());
        }

        let mut modules = Vec::new();
        for entry in fs::read_dir(&models).map_err(|e| Error::io(&models, e))? {
            let path = entry.map_err(|e| Error::io(&models, e))?.path();
            if !path.join("mod.rs").is_file() {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                modules.push(name.to_string());
            }
        }
        modules.sort();
        Ok(modules)
    }

    /// Write `content` to a relative path, creating parent directories
    ///
    /// Directories are created world-accessible (`0o777` before umask) on
    /// Unix.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] naming the directory or file that failed.
    pub fn write(&self, relative: &Path, content: &str) -> Result<PathBuf> {
        let path = self.resolve(relative);

        if let Some(parent) = path.parent() {
            create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }

        fs::write(&path, content).map_err(|e| Error::io(&path, e))?;
        tracing::debug!(path = %path.display(), bytes = content.len(), "wrote file");
        Ok(path)
    }
}

fn create_dir_all(path: &Path) -> std::io::Result<()> {
    let mut builder = DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o777);
    }
    builder.create(path)
}

/// Normalises generated source after it is written
pub trait SourceFormatter {
    /// Format the file at `path` in place
    ///
    /// # Errors
    ///
    /// Returns a description of the failure. Callers treat it as non-fatal.
    fn format(&self, path: &Path) -> std::result::Result<(), String>;
}

/// Runs `rustfmt` on each file
#[derive(Debug, Clone)]
pub struct Rustfmt {
    program: String,
    edition: String,
}

impl Rustfmt {
    /// `rustfmt` from `PATH`, 2021 edition
    #[must_use]
    pub fn new() -> Self {
        Self {
            program: "rustfmt".to_string(),
            edition: "2021".to_string(),
        }
    }

    /// Use a different executable
    #[must_use]
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }
}

impl Default for Rustfmt {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceFormatter for Rustfmt {
    fn format(&self, path: &Path) -> std::result::Result<(), String> {
        let output = Command::new(&self.program)
            .arg("--edition")
            .arg(&self.edition)
            .arg(path)
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| format!("failed to run {}: {e}", self.program))?;

        if output.status.success() {
            Ok(())
        } else {
            Err(String::from_utf8_lossy(&output.stderr).trim().to_string())
        }
    }
}

/// Leaves files untouched
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopFormatter;

impl SourceFormatter for NoopFormatter {
    fn format(&self, _path: &Path) -> std::result::Result<(), String> {
        Ok(())
    }
}
