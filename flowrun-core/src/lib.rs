//! flowrun-core: run the najie-flow CLI and make sense of what it prints.
//!
//! - [`ProcessRunner`] executes one CLI invocation with a timeout and captured output
//! - [`parser`] turns `list` / `show` text into [`FlowSummary`] / [`FlowDetail`]

pub mod command;
pub mod config;
pub mod error;
pub mod invocation;
pub mod invoker;
pub mod lock;
pub mod models;
pub mod parser;
pub mod resolve;
pub mod runner;

pub use command::{FlowCommand, RUN_TIMEOUT};
pub use config::{load_dotenv, RunnerConfig};
pub use error::{FlowError, Result};
pub use invocation::{FailureKind, InvocationRequest, InvocationResult};
pub use invoker::{CliInvoker, MockInvoker};
pub use lock::FlowLocks;
pub use models::{FieldPresence, FlowDetail, FlowSummary, NodeInfo, ParseCompleteness};
pub use parser::{parse_flow_list, parse_flow_show, parse_flow_show_report};
pub use runner::ProcessRunner;
