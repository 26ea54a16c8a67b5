//! Axum server setup
//!
//! Server skeleton with:
//! - Localhost-only CORS by default
//! - Tracing middleware
//! - Graceful shutdown on SIGTERM/Ctrl+C

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::http::HeaderValue;
use axum::Router;
use flowrun_core::CliInvoker;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::routes;

/// Port the UI expects the backend on
pub const DEFAULT_PORT: u16 = 5176;

/// Origins allowed when CORS is not permissive
const LOCAL_ORIGINS: &[&str] = &[
    "http://localhost:5176",
    "http://127.0.0.1:5176",
    "http://localhost:5173",
    "http://127.0.0.1:5173",
];

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to (default: 127.0.0.1:5176)
    pub bind_addr: SocketAddr,

    /// Allow permissive CORS (default: false = localhost only)
    pub cors_permissive: bool,

    /// Built UI to serve for non-API paths (index.html fallback)
    pub ui_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], DEFAULT_PORT)),
            cors_permissive: false,
            ui_dir: None,
        }
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub invoker: Arc<dyn CliInvoker>,
}

impl AppState {
    pub fn new(invoker: Arc<dyn CliInvoker>) -> Self {
        Self { invoker }
    }
}

/// Build the application router
pub fn build_router(state: AppState, config: &ServerConfig) -> Router {
    let cors = if config.cors_permissive {
        tracing::warn!("CORS: Permissive mode enabled - all origins allowed");
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(
                LOCAL_ORIGINS.iter().copied().map(HeaderValue::from_static),
            ))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    let api = Router::new()
        .merge(routes::health::router())
        .merge(routes::flows::router());

    let mut app = Router::new().nest("/api", api);
    if let Some(dir) = &config.ui_dir {
        tracing::info!(path = %dir.display(), "Serving UI");
        app = app.fallback_service(routes::ui::service(dir));
    }

    app.layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

/// Run the HTTP server until Ctrl+C or SIGTERM.
///
/// # Example
///
/// ```ignore
/// let runner = ProcessRunner::new(RunnerConfig::from_env()?);
/// run_server(Arc::new(runner), ServerConfig::default()).await?;
/// ```
pub async fn run_server(
    invoker: Arc<dyn CliInvoker>,
    config: ServerConfig,
) -> Result<(), ServerError> {
    let app = build_router(AppState::new(invoker), &config);

    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!("Flow Runner listening on http://{}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting shutdown");
        }
    }
}

/// Server error type
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use flowrun_core::MockInvoker;
    use tower::ServiceExt;

    #[test]
    fn default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr.port(), 5176);
        assert!(!config.cors_permissive);
        assert!(config.ui_dir.is_none());
    }

    #[tokio::test]
    async fn serves_ui_with_index_fallback() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<html>flow runner</html>").unwrap();
        std::fs::write(dir.path().join("app.js"), "console.log('ui')").unwrap();

        let config = ServerConfig {
            ui_dir: Some(dir.path().to_path_buf()),
            ..Default::default()
        };
        let app = build_router(AppState::new(Arc::new(MockInvoker::new())), &config);

        let response = app
            .clone()
            .oneshot(Request::builder().uri("/app.js").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        // client-side route falls back to index.html
        let response = app
            .oneshot(Request::builder().uri("/flows/g1").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"<html>flow runner</html>");
    }

    #[tokio::test]
    async fn unknown_path_without_ui_is_404() {
        let app = build_router(
            AppState::new(Arc::new(MockInvoker::new())),
            &ServerConfig::default(),
        );
        let response = app
            .oneshot(Request::builder().uri("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
