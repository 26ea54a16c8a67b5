//! HTTP server command
//!
//! Serves the flow API and, when built, the UI bundle.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use flowrun_core::{ProcessRunner, RunnerConfig};
use flowrun_server::http::{run_server, ServerConfig};

/// UI bundle location used when `--ui-dir` is not given
const DEFAULT_UI_DIR: &str = "ui/dist";

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to
    #[arg(long, short = 'b', default_value = "127.0.0.1:5176")]
    pub bind: SocketAddr,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,

    /// Directory with the built UI (default: ui/dist when present)
    #[arg(long, env = "FLOWRUN_UI_DIR")]
    pub ui_dir: Option<PathBuf>,
}

impl ServeArgs {
    fn ui_dir(&self) -> Option<PathBuf> {
        match &self.ui_dir {
            Some(dir) => Some(dir.clone()),
            None => {
                let default = PathBuf::from(DEFAULT_UI_DIR);
                default.is_dir().then_some(default)
            }
        }
    }
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs, runner_config: RunnerConfig) -> Result<()> {
    let ui_dir = args.ui_dir();
    if let Some(dir) = &ui_dir {
        anyhow::ensure!(
            dir.join("index.html").is_file(),
            "UI directory {} has no index.html",
            dir.display()
        );
    } else {
        tracing::info!("No UI directory, serving API only");
    }

    let config = ServerConfig {
        bind_addr: args.bind,
        cors_permissive: args.cors_permissive,
        ui_dir,
    };
    let runner = ProcessRunner::new(runner_config);

    // Run server (blocks until shutdown)
    run_server(Arc::new(runner), config)
        .await
        .context("Server error")?;

    Ok(())
}
