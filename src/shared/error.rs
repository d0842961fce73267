use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Exit codes for the CLI application.
///
/// These codes allow CI systems to distinguish between different
/// types of failures and successes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success - scan completed (or failed checks were found but not requested to fail)
    Success = 0,
    /// Failed checks were found and `--exit-on-failure` was given
    FailedChecksDetected = 1,
    /// Invalid command-line arguments (clap parsing errors)
    InvalidArguments = 2,
    /// Application error (identity, cache, scan backend, rendering, timeout, etc.)
    ApplicationError = 3,
}

impl ExitCode {
    /// Convert to i32 for use with std::process::exit
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitCode::Success => write!(f, "Success (0)"),
            ExitCode::FailedChecksDetected => write!(f, "Failed Checks Detected (1)"),
            ExitCode::InvalidArguments => write!(f, "Invalid Arguments (2)"),
            ExitCode::ApplicationError => write!(f, "Application Error (3)"),
        }
    }
}

/// Application-specific errors for cloud scanning.
///
/// A cache miss is not an error: the cache store reports it as `Ok(None)`.
#[derive(Debug, Error)]
pub enum CloudScanError {
    #[error("Invalid configuration: {message}")]
    Configuration { message: String },

    #[error("Service '{service}' is not currently supported - supported services are: {}", supported.join(", "))]
    UnsupportedService {
        service: String,
        supported: Vec<String>,
    },

    #[error("Failed to discover cloud account identity\nDetails: {details}\n\n💡 Hint: Check your credentials or pass both --account and --region")]
    IdentityResolution { details: String },

    #[error("Cache I/O error: {path}\nDetails: {details}\n\n💡 Hint: Check the cache directory permissions, or remove the corrupted entry")]
    CacheIo { path: PathBuf, details: String },

    #[error("{provider} scan error: {details}")]
    ScanBackend { provider: String, details: String },

    #[error("Scan did not finish within {}s\n\n💡 Hint: Increase the --timeout value", timeout.as_secs())]
    DeadlineExceeded { timeout: Duration },

    #[error("Unable to write results: {details}")]
    Render { details: String },
}

impl CloudScanError {
    /// Convenience constructor for configuration errors
    pub fn configuration(message: impl Into<String>) -> Self {
        CloudScanError::Configuration {
            message: message.into(),
        }
    }
}
