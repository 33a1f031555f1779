//! Structured error handling and exit codes.

use serde::Serialize;

use crate::config::ConfigError;
use crate::duplicates::FinderError;
use crate::report::ReportError;

/// Exit codes for the filedupes application.
///
/// - 0: Success (report written, with or without duplicates)
/// - 1: General error (unexpected failure)
/// - 2: Configuration error (bad flag, config file or scan root)
/// - 3: Output error (report could not be created or written)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExitCode {
    /// Success: Scan completed and the report was written.
    Success = 0,
    /// General error: An unexpected error occurred.
    GeneralError = 1,
    /// Configuration error: invalid settings or scan root.
    ConfigError = 2,
    /// Output error: the report could not be written.
    OutputError = 3,
}

impl ExitCode {
    /// Get the numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Get the machine-readable code prefix.
    #[must_use]
    pub fn code_prefix(self) -> &'static str {
        match self {
            Self::Success => "FD000",
            Self::GeneralError => "FD001",
            Self::ConfigError => "FD002",
            Self::OutputError => "FD003",
        }
    }

    /// Classify a fatal error by walking its source chain.
    #[must_use]
    pub fn from_error(err: &anyhow::Error) -> Self {
        for cause in err.chain() {
            if cause.is::<ConfigError>() || cause.is::<FinderError>() {
                return Self::ConfigError;
            }
            if cause.is::<ReportError>() {
                return Self::OutputError;
            }
        }
        Self::GeneralError
    }
}

/// Structured error information for JSON output.
#[derive(Debug, Serialize)]
pub struct StructuredError {
    /// The error code (e.g., "FD002")
    pub code: String,
    /// The exit code number
    pub exit_code: i32,
    /// Human-readable error message, including causes
    pub message: String,
}

impl StructuredError {
    /// Create a new structured error from an anyhow error and an exit code.
    #[must_use]
    pub fn new(err: &anyhow::Error, exit_code: ExitCode) -> Self {
        Self {
            code: exit_code.code_prefix().to_string(),
            exit_code: exit_code.as_i32(),
            message: format!("{err:#}"),
        }
    }
}
