//! Invocation request/result types
//!
//! An [`InvocationRequest`] describes one execution of the external CLI;
//! an [`InvocationResult`] is its normalized outcome.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::FlowError;

/// One CLI invocation: argv (without program name) plus per-call options.
///
/// Built once and not mutated afterwards; builder methods consume `self`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvocationRequest {
    args: Vec<String>,
    cwd: Option<PathBuf>,
    env: Vec<(String, String)>,
    timeout: Option<Duration>,
    lock_key: Option<String>,
}

impl InvocationRequest {
    pub fn new<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            args: args.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    /// Run the child in `cwd` instead of the configured default
    pub fn cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    /// Extra environment variable for the child (applied last)
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    /// Override the runner's default timeout for this call
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Serialize this call against others carrying the same key
    /// (only honoured when the runner has run serialization enabled)
    pub fn lock_key(mut self, key: impl Into<String>) -> Self {
        self.lock_key = Some(key.into());
        self
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn working_dir(&self) -> Option<&PathBuf> {
        self.cwd.as_ref()
    }

    pub fn env_overrides(&self) -> &[(String, String)] {
        &self.env
    }

    pub fn timeout_override(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn key(&self) -> Option<&str> {
        self.lock_key.as_deref()
    }
}

/// Why an invocation failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Executable unresolvable or unlaunchable; no process was created
    Spawn,
    /// Process ran and exited unsuccessfully
    Exit,
    /// Process exceeded its timeout and was killed
    Timeout,
}

/// Normalized outcome of one invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum InvocationResult {
    Success {
        stdout: String,
        stderr: String,
    },
    Failure {
        kind: FailureKind,
        message: String,
        #[serde(rename = "exitCode", skip_serializing_if = "Option::is_none")]
        exit_code: Option<i32>,
    },
}

impl InvocationResult {
    pub fn success(stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self::Success {
            stdout: stdout.into(),
            stderr: stderr.into(),
        }
    }

    /// Result for a process that exited with `code`.
    ///
    /// The failure message is stderr, falling back to stdout when stderr is empty.
    pub fn from_exit(code: Option<i32>, stdout: String, stderr: String) -> Self {
        if code == Some(0) {
            return Self::Success { stdout, stderr };
        }
        FlowError::exit(code, stdout, stderr).into()
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn exit_code(&self) -> Option<i32> {
        match self {
            Self::Success { .. } => Some(0),
            Self::Failure { exit_code, .. } => *exit_code,
        }
    }
}

impl From<FlowError> for InvocationResult {
    fn from(err: FlowError) -> Self {
        Self::Failure {
            kind: err.kind(),
            exit_code: err.exit_code(),
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_exit_is_success() {
        let result = InvocationResult::from_exit(Some(0), "out".into(), "warn".into());
        assert_eq!(result, InvocationResult::success("out", "warn"));
        assert_eq!(result.exit_code(), Some(0));
    }

    #[test]
    fn nonzero_exit_prefers_stderr() {
        let result = InvocationResult::from_exit(Some(3), "out".into(), "bad flow".into());
        assert_eq!(
            result,
            InvocationResult::Failure {
                kind: FailureKind::Exit,
                message: "bad flow".into(),
                exit_code: Some(3),
            }
        );
    }

    #[test]
    fn nonzero_exit_falls_back_to_stdout() {
        let result = InvocationResult::from_exit(Some(1), "flow not found".into(), String::new());
        match result {
            InvocationResult::Failure { message, exit_code, .. } => {
                assert_eq!(message, "flow not found");
                assert_eq!(exit_code, Some(1));
            }
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[test]
    fn timeout_error_becomes_codeless_failure() {
        let result: InvocationResult = FlowError::Timeout {
            after: Duration::from_secs(120),
        }
        .into();
        assert_eq!(
            result,
            InvocationResult::Failure {
                kind: FailureKind::Timeout,
                message: "timed out after 120s".into(),
                exit_code: None,
            }
        );
    }

    #[test]
    fn failure_serializes_with_camel_case_exit_code() {
        let result = InvocationResult::from_exit(Some(2), String::new(), "nope".into());
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["status"], "failure");
        assert_eq!(json["kind"], "exit");
        assert_eq!(json["exitCode"], 2);
    }

    #[test]
    fn request_builder_keeps_options() {
        let req = InvocationRequest::new(["run", "g1"])
            .timeout(Duration::from_secs(5))
            .env("A", "b")
            .lock_key("g1");
        assert_eq!(req.args(), ["run", "g1"]);
        assert_eq!(req.timeout_override(), Some(Duration::from_secs(5)));
        assert_eq!(req.env_overrides(), [("A".to_string(), "b".to_string())]);
        assert_eq!(req.key(), Some("g1"));
    }
}
