use crate::ports::outbound::OutputPresenter;
use crate::shared::error::CloudScanError;
use crate::shared::security::validate_not_symlink;
use crate::shared::Result;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// FileSystemWriter adapter writing the rendered report to a file
pub struct FileSystemWriter {
    output_path: PathBuf,
}

impl FileSystemWriter {
    pub fn new(output_path: PathBuf) -> Self {
        Self { output_path }
    }

    fn render_error(&self, details: impl std::fmt::Display) -> anyhow::Error {
        CloudScanError::Render {
            details: format!("{}: {}", self.output_path.display(), details),
        }
        .into()
    }

    /// The parent directory must already exist; it is never created
    fn validate_parent_directory(&self) -> Result<()> {
        match self.output_path.parent() {
            Some(parent) if parent != Path::new("") && !parent.is_dir() => Err(self.render_error(
                format!("Parent directory does not exist: {}", parent.display()),
            )),
            _ => Ok(()),
        }
    }
}

impl OutputPresenter for FileSystemWriter {
    fn present(&self, content: &str) -> Result<()> {
        self.validate_parent_directory()?;

        // Refuse to follow a symlink planted at the output path
        if fs::symlink_metadata(&self.output_path).is_ok() {
            validate_not_symlink(&self.output_path, "write")
                .map_err(|e| self.render_error(e))?;
        }

        fs::write(&self.output_path, content).map_err(|e| self.render_error(e))?;

        tracing::info!("Report written to {}", self.output_path.display());
        eprintln!("✅ Output complete: {}", self.output_path.display());
        Ok(())
    }
}

/// StdoutPresenter adapter writing the rendered report to stdout
pub struct StdoutPresenter;

impl StdoutPresenter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for StdoutPresenter {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputPresenter for StdoutPresenter {
    fn present(&self, content: &str) -> Result<()> {
        let mut stdout = io::stdout().lock();
        stdout
            .write_all(content.as_bytes())
            .and_then(|_| stdout.flush())
            .map_err(|e| CloudScanError::Render {
                details: format!("Failed to write to stdout: {}", e),
            })?;
        Ok(())
    }
}
