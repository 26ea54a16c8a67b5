//! flowrun-server: HTTP API for the Flow Runner UI
//!
//! Exposes the najie-flow CLI's `list`, `show` and `run` subcommands as JSON
//! endpoints under `/api`, and serves the built UI for everything else.

pub mod http;

pub use http::{build_router, run_server, ApiError, AppState, ServerConfig, ServerError};
