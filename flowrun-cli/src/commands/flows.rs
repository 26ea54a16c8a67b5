//! One-shot flow commands: list, show, run
//!
//! These call the runner directly, without the HTTP layer, and print JSON
//! (`run` prints the CLI output as-is).

use anyhow::{bail, Context, Result};
use clap::Parser;
use flowrun_core::{
    parse_flow_list, parse_flow_show_report, CliInvoker, FlowCommand, InvocationResult,
    ParseCompleteness,
};
use serde_json::json;

/// Arguments for the show command
#[derive(Parser, Debug)]
pub struct ShowArgs {
    /// Flow ID
    pub id: String,
}

/// Arguments for the run command
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Flow ID
    pub id: String,

    /// Input passed to the flow
    #[arg(long, short = 'i')]
    pub input: Option<String>,

    /// Maximum number of iterations
    #[arg(long, short = 'm')]
    pub max_iterations: Option<u32>,
}

/// Stdout of a successful invocation, or the failure as an error
fn stdout_of(result: InvocationResult) -> Result<String> {
    match result {
        InvocationResult::Success { stdout, .. } => Ok(stdout),
        InvocationResult::Failure {
            kind,
            message,
            exit_code: Some(code),
        } => bail!("flow CLI failed ({:?}, exit code {}): {}", kind, code, message.trim_end()),
        InvocationResult::Failure { kind, message, .. } => {
            bail!("flow CLI failed ({:?}): {}", kind, message.trim_end())
        }
    }
}

fn print_json(value: &serde_json::Value) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", text);
    Ok(())
}

/// List flows as JSON
pub async fn run_list(invoker: &dyn CliInvoker) -> Result<()> {
    let stdout = stdout_of(invoker.invoke(FlowCommand::List.into_request()).await)?;
    let flows = parse_flow_list(&stdout);
    tracing::debug!(count = flows.len(), "parsed flow list");
    print_json(&json!(flows))
}

/// Show one flow as JSON
pub async fn run_show(invoker: &dyn CliInvoker, args: ShowArgs) -> Result<()> {
    let request = FlowCommand::Show {
        id: args.id.clone(),
    }
    .into_request();
    let stdout = stdout_of(invoker.invoke(request).await)?;

    let report = parse_flow_show_report(&stdout);
    let completeness = report.presence.completeness();
    if completeness != ParseCompleteness::Complete {
        tracing::warn!(flow = %args.id, ?completeness, "show output only partly recognized");
    }
    print_json(&json!({
        "data": report.detail,
        "parse": completeness,
    }))
}

/// Run a flow and print its output
pub async fn run_flow(invoker: &dyn CliInvoker, args: RunArgs) -> Result<()> {
    let command = FlowCommand::Run {
        id: args.id,
        input: args.input,
        max_iterations: args.max_iterations,
    };
    let stdout = stdout_of(invoker.invoke(command.into_request()).await)?;
    print!("{}", stdout);
    Ok(())
}
