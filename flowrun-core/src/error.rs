//! Structured error types for flowrun-core.
//!
//! Process-level failures never escape [`crate::ProcessRunner::run`] as errors;
//! they are folded into [`crate::InvocationResult::Failure`] through the
//! `From<FlowError>` conversion, which carries the failure kind and exit code.

use std::io;
use std::time::Duration;
use thiserror::Error;

use crate::invocation::FailureKind;

/// Main error type for flowrun-core operations
#[derive(Error, Debug)]
pub enum FlowError {
    /// The executable could not be launched (permission denied, bad format, ...)
    #[error("failed to launch {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    /// Bare executable name not found on PATH
    #[error("executable '{program}' not found on PATH")]
    NotFound { program: String },

    /// The CLI ran and reported failure
    #[error("{message}")]
    NonZeroExit { code: Option<i32>, message: String },

    /// The CLI exceeded its allotted time and was killed
    #[error("timed out after {after:?}")]
    Timeout { after: Duration },

    /// I/O failure while talking to a running child
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },

    /// Configuration error
    #[error("Configuration error: {reason}")]
    Config { reason: String },
}

/// Result type alias for flowrun-core operations
pub type Result<T> = std::result::Result<T, FlowError>;

impl FlowError {
    /// Create a spawn error for `program`
    pub fn spawn(program: impl Into<String>, source: io::Error) -> Self {
        Self::Spawn {
            program: program.into(),
            source,
        }
    }

    /// Create the error for a process that exited with a nonzero (or no) code.
    ///
    /// The message is stderr, falling back to stdout when stderr is empty.
    pub fn exit(code: Option<i32>, stdout: String, stderr: String) -> Self {
        let message = if stderr.is_empty() { stdout } else { stderr };
        Self::NonZeroExit { code, message }
    }

    /// Create a config error
    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config {
            reason: reason.into(),
        }
    }

    /// Failure kind reported to callers of the runner
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Spawn { .. } | Self::NotFound { .. } | Self::Config { .. } => FailureKind::Spawn,
            Self::NonZeroExit { .. } | Self::Io { .. } => FailureKind::Exit,
            Self::Timeout { .. } => FailureKind::Timeout,
        }
    }

    /// Exit code, only known when the process actually exited
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            Self::NonZeroExit { code, .. } => *code,
            _ => None,
        }
    }
}
