//! flowrun - HTTP front-end and command line for najie-flow
//!
//! Provides:
//! - `serve`: the flow API (list, show, run) plus the UI bundle
//! - `list` / `show` / `run`: the same operations from the terminal, as JSON

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use flowrun_core::{load_dotenv, ProcessRunner, RunnerConfig};
use tracing::info;

mod commands;
mod tracing_setup;

#[derive(Parser, Debug)]
#[command(
    name = "flowrun",
    author,
    version,
    about = "Run and inspect najie-flow flows over HTTP or from the terminal"
)]
struct Cli {
    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(long, global = true)]
    debug: bool,

    /// Flow data directory passed to the flow CLI
    #[arg(long, global = true, env = "NAJIE_USER_DATA_PATH")]
    data_dir: Option<PathBuf>,

    /// Path or name of the flow CLI executable
    #[arg(long, global = true, env = "NAJIE_FLOW_CLI")]
    cli_path: Option<String>,

    /// Default timeout for CLI invocations, in seconds
    #[arg(long, global = true, value_parser = clap::value_parser!(u64).range(1..))]
    timeout_secs: Option<u64>,

    /// Serialize concurrent runs of the same flow
    #[arg(long, global = true)]
    serialize_runs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API server (and UI, when built)
    Serve(commands::serve::ServeArgs),
    /// List flows as JSON
    List,
    /// Show a flow's details and nodes as JSON
    Show(commands::flows::ShowArgs),
    /// Run a flow and print its output
    Run(commands::flows::RunArgs),
}

impl Cli {
    /// Environment config with command-line overrides applied
    fn runner_config(&self) -> Result<RunnerConfig> {
        let mut config = RunnerConfig::from_env().context("Invalid runner configuration")?;

        if let Some(path) = &self.cli_path {
            config = config.with_cli_path(path.clone());
        }
        if let Some(dir) = &self.data_dir {
            config = config.with_data_dir(dir.clone());
        }
        if let Some(secs) = self.timeout_secs {
            config = config.with_timeout(Duration::from_secs(secs));
        }
        if self.serialize_runs {
            config = config.with_serialize_runs(true);
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // before parsing so clap's env fallbacks see .env values
    let env_files = load_dotenv();
    let cli = Cli::parse();

    tracing_setup::init(&tracing_setup::TracingConfig { debug: cli.debug }).ok();

    if !env_files.is_empty() {
        let paths: Vec<String> = env_files.iter().map(|p| p.display().to_string()).collect();
        info!("Loaded configuration from: {}", paths.join(", "));
    }

    let config = cli.runner_config()?;
    match &config.data_dir {
        Some(dir) => info!("Flow data directory: {}", dir.display()),
        None => info!("Flow data directory: (flow CLI default)"),
    }

    match cli.command {
        Commands::Serve(args) => commands::run_serve(args, config).await?,
        Commands::List => commands::run_list(&ProcessRunner::new(config)).await?,
        Commands::Show(args) => commands::run_show(&ProcessRunner::new(config), args).await?,
        Commands::Run(args) => commands::run_flow(&ProcessRunner::new(config), args).await?,
    }
    Ok(())
}
