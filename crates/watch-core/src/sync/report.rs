//! Run outcome reporting
//!
//! Fatal problems propagate as errors and halt the run. Everything else
//! lands here: printed when it happens, collected for the caller.

use crate::runtime::DepKind;
use colored::Colorize;
use std::path::PathBuf;
use thiserror::Error;

/// A problem that was reported and recovered from during a run.
#[derive(Debug, Error)]
pub enum Warning {
    #[error("npm is not available; skipping dependency installation")]
    NpmUnavailable,

    #[error("failed to install {kind} dependencies: {message}")]
    Install { kind: DepKind, message: String },

    #[error("failed to write manifest to {}: {message}", .path.display())]
    ManifestWrite { path: PathBuf, message: String },

    #[error("{} did not exist before the in-place edit", .path.display())]
    MissingFile { path: PathBuf },

    #[error("in-place edit of {} failed: {message}", .path.display())]
    Edit { path: PathBuf, message: String },
}

/// What a completed run wants the caller to know: which files were
/// downloaded and which steps degraded along the way.
#[derive(Debug, Default)]
pub struct RunReport {
    pub downloaded: Vec<String>,
    pub warnings: Vec<Warning>,
}

impl RunReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Print a warning immediately and record it.
    pub fn warn(&mut self, warning: Warning) {
        eprintln!("{} {}", "Warning:".yellow(), warning);
        self.warnings.push(warning);
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}
