//! Typed argv construction for the flow CLI subcommands

use std::time::Duration;

use crate::invocation::InvocationRequest;

/// Timeout for `run`, which executes a whole flow
pub const RUN_TIMEOUT: Duration = Duration::from_secs(120);

/// The CLI operations exposed over HTTP
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowCommand {
    /// `list`
    List,
    /// `show <id> -e`
    Show { id: String },
    /// `run <id> [-i <input>] [-m <max>]`
    Run {
        id: String,
        input: Option<String>,
        max_iterations: Option<u32>,
    },
}

impl FlowCommand {
    pub fn args(&self) -> Vec<String> {
        match self {
            Self::List => vec!["list".to_string()],
            Self::Show { id } => vec!["show".to_string(), id.clone(), "-e".to_string()],
            Self::Run {
                id,
                input,
                max_iterations,
            } => {
                let mut args = vec!["run".to_string(), id.clone()];
                if let Some(input) = input.as_deref().filter(|s| !s.is_empty()) {
                    args.push("-i".to_string());
                    args.push(input.to_string());
                }
                if let Some(max) = max_iterations.filter(|&m| m > 0) {
                    args.push("-m".to_string());
                    args.push(max.to_string());
                }
                args
            }
        }
    }

    /// Build the invocation: `run` gets the long timeout and a per-flow lock key
    pub fn into_request(self) -> InvocationRequest {
        let request = InvocationRequest::new(self.args());
        match self {
            Self::Run { id, .. } => request.timeout(RUN_TIMEOUT).lock_key(id),
            Self::List | Self::Show { .. } => request,
        }
    }
}
