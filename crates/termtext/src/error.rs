//! Error type shared by everything that surrounds the formatting core.
//!
//! The SGR interpreter and the text inserter never fail; configuration
//! loading, PTY sessions and the CLI report [`TermtextError`].

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Result alias used across the crate.
pub type TermtextResult<T> = Result<T, TermtextError>;

/// Stable error codes with CLI exit status mapping.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    /// Filesystem or PTY I/O failure.
    #[serde(rename = "E_IO")]
    Io,
    /// Configuration file could not be parsed or failed validation.
    #[serde(rename = "E_CONFIG")]
    Config,
    /// Malformed input such as a non UTF-8 release index.
    #[serde(rename = "E_PROTOCOL")]
    Protocol,
    /// A deadline elapsed before the operation finished.
    #[serde(rename = "E_TIMEOUT")]
    Timeout,
    /// The captured process exited unsuccessfully.
    #[serde(rename = "E_PROCESS_EXIT")]
    ProcessExit,
    /// Invariant violation inside the crate.
    #[serde(rename = "E_INTERNAL")]
    Internal,
    /// Invalid command line arguments.
    #[serde(rename = "E_CLI_INVALID_ARG")]
    CliInvalidArg,
}

impl ErrorCode {
    /// The wire representation, e.g. `E_IO`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Io => "E_IO",
            Self::Config => "E_CONFIG",
            Self::Protocol => "E_PROTOCOL",
            Self::Timeout => "E_TIMEOUT",
            Self::ProcessExit => "E_PROCESS_EXIT",
            Self::Internal => "E_INTERNAL",
            Self::CliInvalidArg => "E_CLI_INVALID_ARG",
        }
    }

    /// Parse a wire code back into an [`ErrorCode`].
    pub fn parse(code: &str) -> Option<Self> {
        match code {
            "E_IO" => Some(Self::Io),
            "E_CONFIG" => Some(Self::Config),
            "E_PROTOCOL" => Some(Self::Protocol),
            "E_TIMEOUT" => Some(Self::Timeout),
            "E_PROCESS_EXIT" => Some(Self::ProcessExit),
            "E_INTERNAL" => Some(Self::Internal),
            "E_CLI_INVALID_ARG" => Some(Self::CliInvalidArg),
            _ => None,
        }
    }

    /// Process exit status the CLI uses for this code.
    pub fn exit_code(self) -> i32 {
        match self {
            Self::CliInvalidArg => 2,
            Self::Config => 3,
            Self::Timeout => 4,
            Self::Protocol => 5,
            Self::ProcessExit => 6,
            Self::Io => 7,
            Self::Internal => 8,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured error information, serializable for `--json` output.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Wire error code.
    pub code: String,
    /// Human-readable message.
    pub message: String,
    /// Optional machine-readable context.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<Value>,
}

/// Error returned by configuration, session and CLI operations.
#[derive(Debug, thiserror::Error, Diagnostic)]
#[error("{code}: {message}")]
pub struct TermtextError {
    /// Error category.
    pub code: ErrorCode,
    /// Human-readable message.
    pub message: String,
    /// Optional machine-readable context.
    pub context: Option<Value>,
}

impl TermtextError {
    /// Build an error from its parts.
    pub fn new(
        code: ErrorCode,
        message: impl Into<String>,
        context: impl Into<Option<Value>>,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            context: context.into(),
        }
    }

    pub fn io(message: impl Into<String>, err: impl fmt::Display) -> Self {
        Self::new(
            ErrorCode::Io,
            message,
            serde_json::json!({ "source": err.to_string() }),
        )
    }

    pub fn config(message: impl Into<String>, context: impl Into<Option<Value>>) -> Self {
        Self::new(ErrorCode::Config, message, context)
    }

    pub fn protocol(message: impl Into<String>, context: impl Into<Option<Value>>) -> Self {
        Self::new(ErrorCode::Protocol, message, context)
    }

    pub fn timeout(message: impl Into<String>, context: impl Into<Option<Value>>) -> Self {
        Self::new(ErrorCode::Timeout, message, context)
    }

    pub fn process_exit(message: impl Into<String>, exit_code: Option<u32>) -> Self {
        Self::new(
            ErrorCode::ProcessExit,
            message,
            serde_json::json!({ "exit_code": exit_code }),
        )
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Internal, message, None)
    }

    pub fn cli_invalid_arg(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::CliInvalidArg, message, None)
    }

    /// Exit status for the CLI.
    pub fn exit_code(&self) -> i32 {
        self.code.exit_code()
    }

    /// Serializable view of this error.
    pub fn to_error_info(&self) -> ErrorInfo {
        ErrorInfo {
            code: self.code.as_str().to_string(),
            message: self.message.clone(),
            context: self.context.clone(),
        }
    }
}
