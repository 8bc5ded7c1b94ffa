use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Exit code the helper process reserves for rejected credentials.
pub const AUTH_FAILURE_EXIT_CODE: i32 = 899;

/// Exit codes for the CLI application.
///
/// These codes allow schedulers to distinguish a clean pass from a pass
/// where some targets could not be collected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Every target was collected, blacked out, or excluded
    Success = 0,
    /// At least one target ended the cycle as Down or Config Error
    PartialCollection = 1,
    /// Invalid command-line arguments (clap parsing errors)
    InvalidArguments = 2,
    /// Application error (configuration, catalog, helper startup, I/O)
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
            ExitCode::PartialCollection => write!(f, "Partial Collection (1)"),
            ExitCode::InvalidArguments => write!(f, "Invalid Arguments (2)"),
            ExitCode::ApplicationError => write!(f, "Application Error (3)"),
        }
    }
}

/// Errors raised by the collection pipeline.
///
/// `Config` and `ProcessLifecycle` abort a whole run. The remaining
/// variants are per-target and end up inside that target's result.
#[derive(Debug, Error)]
pub enum CollectorError {
    #[error("Invalid configuration in {source_name}\nDetails: {details}\n\n💡 Hint: Check that the file exists and follows the expected record format")]
    Config {
        source_name: String,
        details: String,
    },

    #[error("Helper process lifecycle failure: {details}\n\n💡 Hint: Verify java_home and that the helper jars are present in helper_lib_dir")]
    ProcessLifecycle { details: String },

    #[error("Unable to reach helper process at {address}: {details}")]
    Transport { address: String, details: String },

    #[error("{message} (exit code {exit_code})")]
    Protocol { exit_code: i32, message: String },

    #[error("Failed to map query reply: {details}")]
    Mapping { details: String },

    #[error("request timed out after {seconds}s")]
    Timeout { seconds: u64 },

    #[error("collection cancelled")]
    Cancelled,

    #[error("Failed to read file: {path}\nDetails: {details}\n\n💡 Hint: Please verify that the file exists and you have read permissions")]
    FileReadError { path: PathBuf, details: String },

    #[error("Failed to write to file: {path}\nDetails: {details}\n\n💡 Hint: Please verify that the directory exists and you have write permissions")]
    FileWriteError { path: PathBuf, details: String },
}

impl CollectorError {
    pub fn config(source_name: impl Into<String>, details: impl Into<String>) -> Self {
        CollectorError::Config {
            source_name: source_name.into(),
            details: details.into(),
        }
    }

    pub fn lifecycle(details: impl Into<String>) -> Self {
        CollectorError::ProcessLifecycle {
            details: details.into(),
        }
    }

    /// True when the failure points at bad credentials rather than an
    /// unreachable target.
    pub fn indicates_credential_failure(&self) -> bool {
        match self {
            CollectorError::Protocol { exit_code, .. } if *exit_code == AUTH_FAILURE_EXIT_CODE => {
                true
            }
            other => {
                let text = other.to_string().to_lowercase();
                text.contains("password") || text.contains("credential")
            }
        }
    }
}
