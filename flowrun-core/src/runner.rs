//! Process runner for the flow CLI
//!
//! Spawns one child per invocation with:
//! - `FORCE_COLOR=0` so output is plain text
//! - the configured data directory forwarded as flag and env var
//! - concurrent, size-capped capture of stdout/stderr
//! - a single timeout that both kills the child and fails the call

use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tokio::time::{timeout_at, Instant};
use tracing::{debug, info, warn};

use crate::config::{RunnerConfig, DATA_DIR_ENV};
use crate::error::{FlowError, Result};
use crate::invocation::{InvocationRequest, InvocationResult};
use crate::lock::FlowLocks;
use crate::resolve::resolve_cli;

const READ_CHUNK: usize = 8 * 1024;

/// Executes flow CLI invocations as child processes.
///
/// Cheap to clone; clones share configuration and run locks.
#[derive(Clone)]
pub struct ProcessRunner {
    config: Arc<RunnerConfig>,
    locks: FlowLocks,
}

impl ProcessRunner {
    pub fn new(config: RunnerConfig) -> Self {
        Self {
            config: Arc::new(config),
            locks: FlowLocks::new(),
        }
    }

    /// Run one invocation to completion.
    ///
    /// Never fails: spawn errors, nonzero exits and timeouts all come back as
    /// [`InvocationResult::Failure`]. The timeout starts at call time and also
    /// covers any wait for the flow's run lock.
    pub async fn run(&self, request: InvocationRequest) -> InvocationResult {
        let timeout = request.timeout_override().unwrap_or(self.config.default_timeout);
        let deadline = Instant::now() + timeout;

        match self.run_until(&request, deadline, timeout).await {
            Ok(result) => result,
            Err(err) => {
                match &err {
                    FlowError::Timeout { .. } => warn!(args = ?request.args(), "flow CLI {}", err),
                    FlowError::NonZeroExit { code, .. } => {
                        warn!(args = ?request.args(), code = ?code, "flow CLI exited with failure")
                    }
                    _ => warn!(args = ?request.args(), "flow CLI failed: {}", err),
                }
                err.into()
            }
        }
    }

    async fn run_until(
        &self,
        request: &InvocationRequest,
        deadline: Instant,
        timeout: Duration,
    ) -> Result<InvocationResult> {
        let _guard = match request.key() {
            Some(key) if self.config.serialize_runs => Some(
                timeout_at(deadline, self.locks.acquire(key))
                    .await
                    .map_err(|_| FlowError::Timeout { after: timeout })?,
            ),
            _ => None,
        };

        self.execute(request, deadline, timeout).await
    }

    fn build_command(&self, request: &InvocationRequest) -> Result<(Command, String)> {
        let resolved = resolve_cli(&self.config.cli_path)?;

        let mut args = request.args().to_vec();
        if let Some(dir) = &self.config.data_dir {
            args.push("--data-dir".to_string());
            args.push(dir.display().to_string());
        }

        let mut cmd = Command::new(&resolved.program);
        cmd.args(&resolved.leading_args)
            .args(&args)
            .env("FORCE_COLOR", "0")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        if let Some(dir) = &self.config.data_dir {
            cmd.env(DATA_DIR_ENV, dir);
        }
        for (key, value) in request.env_overrides() {
            cmd.env(key, value);
        }
        if let Some(cwd) = request.working_dir().or(self.config.working_dir.as_ref()) {
            cmd.current_dir(cwd);
        }

        Ok((cmd, resolved.display_with(&args)))
    }

    async fn execute(
        &self,
        request: &InvocationRequest,
        deadline: Instant,
        timeout: Duration,
    ) -> Result<InvocationResult> {
        let (mut cmd, command_line) = self.build_command(request)?;
        let limit = self.config.output_limit;

        info!("[CLI] {}", command_line);
        let start = Instant::now();

        let mut child = cmd
            .spawn()
            .map_err(|e| FlowError::spawn(&self.config.cli_path, e))?;
        let stdout = child.stdout.take();
        let stderr = child.stderr.take();

        let completion = async {
            let (status, stdout, stderr) = tokio::join!(
                child.wait(),
                capture(stdout, limit),
                capture(stderr, limit)
            );
            Ok::<_, FlowError>((status?, stdout?, stderr?))
        };
        let outcome = timeout_at(deadline, completion).await;

        let (status, stdout, stderr) = match outcome {
            Ok(finished) => finished?,
            Err(_) => {
                match child.try_wait() {
                    // exited, but a descendant still holds the output pipes
                    Ok(Some(status)) => {
                        debug!(code = ?status.code(), "flow CLI exited but its output never closed")
                    }
                    _ => {
                        if let Err(e) = child.kill().await {
                            warn!("failed to kill timed out flow CLI: {}", e);
                        }
                    }
                }
                return Err(FlowError::Timeout { after: timeout });
            }
        };

        for (stream, captured) in [("stdout", &stdout), ("stderr", &stderr)] {
            if captured.dropped > 0 {
                warn!(stream, dropped = captured.dropped, limit, "flow CLI output truncated");
            }
        }

        debug!(
            code = ?status.code(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "flow CLI finished"
        );

        let (stdout, stderr) = (stdout.into_text(), stderr.into_text());
        if status.success() {
            Ok(InvocationResult::success(stdout, stderr))
        } else {
            Err(FlowError::exit(status.code(), stdout, stderr))
        }
    }
}

/// Bytes read from one stream, capped at a limit
#[derive(Debug, Default)]
struct Captured {
    bytes: Vec<u8>,
    dropped: usize,
}

impl Captured {
    fn into_text(self) -> String {
        let mut text = String::from_utf8_lossy(&self.bytes).into_owned();
        if self.dropped > 0 {
            if !text.ends_with('\n') {
                text.push('\n');
            }
            text.push_str(&format!("[output truncated: {} bytes omitted]", self.dropped));
        }
        text
    }
}

/// Read a stream to EOF in arrival order, keeping at most `limit` bytes.
///
/// Bytes past the limit are still drained so the child never blocks on a full pipe.
async fn capture<R>(reader: Option<R>, limit: usize) -> std::io::Result<Captured>
where
    R: AsyncRead + Unpin,
{
    let mut captured = Captured::default();
    let Some(mut reader) = reader else {
        return Ok(captured);
    };

    let mut chunk = vec![0u8; READ_CHUNK];
    loop {
        let n = reader.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        let room = limit.saturating_sub(captured.bytes.len());
        let keep = room.min(n);
        captured.bytes.extend_from_slice(&chunk[..keep]);
        captured.dropped += n - keep;
    }

    Ok(captured)
}
