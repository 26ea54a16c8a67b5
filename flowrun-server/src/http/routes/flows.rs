//! Flow endpoints - `list`, `show` and `run` of the flow CLI
//!
//! CLI failures (nonzero exit, timeout, missing executable) are reported in
//! the body as `success: false` with status 200; the UI renders the message.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    routing::{get, post},
    Json, Router,
};
use flowrun_core::{
    parse_flow_list, parse_flow_show_report, FailureKind, FlowCommand, FlowDetail, FlowSummary,
    InvocationResult, ParseCompleteness,
};
use serde::{Deserialize, Serialize};

use crate::http::error::ApiError;
use crate::http::extractors::ValidFlowId;
use crate::http::server::AppState;

/// Error half of a response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Failure {
    pub error: String,
    pub error_kind: FailureKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
}

/// `{success, data}` envelope for parsed endpoints
#[derive(Debug, Serialize)]
pub struct FlowResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// How much of the CLI output was understood (`show` only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parse: Option<ParseCompleteness>,
    #[serde(flatten)]
    pub failure: Option<Failure>,
}

impl<T> FlowResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            parse: None,
            failure: None,
        }
    }

    fn failed(failure: Failure) -> Self {
        Self {
            success: false,
            data: None,
            parse: None,
            failure: Some(failure),
        }
    }
}

/// Body of `POST /api/flows/{id}/run`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunRequest {
    #[serde(default)]
    pub input: Option<String>,
    #[serde(default)]
    pub max_iterations: Option<u32>,
}

/// Raw passthrough of a `run` invocation
#[derive(Debug, Serialize)]
pub struct RunResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(flatten)]
    pub failure: Option<Failure>,
}

/// Split an invocation result into stdout or a failure body
fn split(result: InvocationResult) -> Result<String, Failure> {
    match result {
        InvocationResult::Success { stdout, .. } => Ok(stdout),
        InvocationResult::Failure {
            kind,
            message,
            exit_code,
        } => Err(Failure {
            error: message,
            error_kind: kind,
            exit_code,
        }),
    }
}

/// GET /api/flows - list flows
async fn list_flows(State(state): State<Arc<AppState>>) -> Json<FlowResponse<Vec<FlowSummary>>> {
    let result = state.invoker.invoke(FlowCommand::List.into_request()).await;

    Json(match split(result) {
        Ok(stdout) => {
            let flows = parse_flow_list(&stdout);
            tracing::debug!(count = flows.len(), "parsed flow list");
            FlowResponse::ok(flows)
        }
        Err(failure) => FlowResponse::failed(failure),
    })
}

/// GET /api/flows/{id} - flow detail with nodes
async fn show_flow(
    State(state): State<Arc<AppState>>,
    ValidFlowId(id): ValidFlowId,
) -> Json<FlowResponse<FlowDetail>> {
    let result = state
        .invoker
        .invoke(FlowCommand::Show { id: id.clone() }.into_request())
        .await;

    Json(match split(result) {
        Ok(stdout) => {
            let report = parse_flow_show_report(&stdout);
            let completeness = report.presence.completeness();
            if completeness == ParseCompleteness::Empty {
                tracing::warn!(flow = %id, "show output not recognized");
            }
            FlowResponse {
                parse: Some(completeness),
                ..FlowResponse::ok(report.detail)
            }
        }
        Err(failure) => FlowResponse::failed(failure),
    })
}

/// POST /api/flows/{id}/run - execute a flow, output passed through unparsed
async fn run_flow(
    State(state): State<Arc<AppState>>,
    ValidFlowId(id): ValidFlowId,
    body: Bytes,
) -> Result<Json<RunResponse>, ApiError> {
    let req: RunRequest = if body.iter().all(u8::is_ascii_whitespace) {
        RunRequest::default()
    } else {
        serde_json::from_slice(&body).map_err(|e| ApiError::BadRequest {
            message: format!("invalid JSON body: {}", e),
        })?
    };

    tracing::info!(flow = %id, max_iterations = ?req.max_iterations, "running flow");
    let command = FlowCommand::Run {
        id,
        input: req.input,
        max_iterations: req.max_iterations,
    };
    let result = state.invoker.invoke(command.into_request()).await;

    Ok(Json(match split(result) {
        Ok(stdout) => RunResponse {
            success: true,
            output: Some(stdout),
            failure: None,
        },
        Err(failure) => RunResponse {
            success: false,
            output: None,
            failure: Some(failure),
        },
    }))
}

/// Flow routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/flows", get(list_flows))
        .route("/flows/{id}", get(show_flow))
        .route("/flows/{id}/run", post(run_flow))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use flowrun_core::{FlowError, MockInvoker, RUN_TIMEOUT};
    use std::time::Duration;
    use tower::ServiceExt;

    use crate::http::server::{build_router, ServerConfig};

    fn app(mock: &Arc<MockInvoker>) -> Router {
        build_router(AppState::new(mock.clone()), &ServerConfig::default())
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_req(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn list_parses_cli_output() {
        let mock = Arc::new(MockInvoker::new());
        mock.add_response(InvocationResult::success(
            "ℹ 找到 2 个流程\nProd\n  graph-1  My Flow\n未分组\n  graph-2  Scratch\n",
            "",
        ));

        let (status, json) = send(app(&mock), get_req("/api/flows")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["success"], true);
        assert_eq!(
            json["data"],
            serde_json::json!([
                {"id": "graph-1", "name": "My Flow", "group": "Prod"},
                {"id": "graph-2", "name": "Scratch", "group": null},
            ])
        );
        assert_eq!(mock.calls()[0].args(), ["list"]);
    }

    #[tokio::test]
    async fn list_failure_is_success_false() {
        let mock = Arc::new(MockInvoker::new());
        mock.add_response(InvocationResult::from_exit(
            Some(2),
            String::new(),
            "data dir missing".into(),
        ));

        let (status, json) = send(app(&mock), get_req("/api/flows")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "data dir missing");
        assert_eq!(json["errorKind"], "exit");
        assert_eq!(json["exitCode"], 2);
        assert!(json.get("data").is_none());
    }

    #[tokio::test]
    async fn show_parses_detail() {
        let mock = Arc::new(MockInvoker::new());
        mock.add_response(InvocationResult::success(
            "ID: g1\n名称: Demo\n节点数: 3\n边数: 2\n节点列表:\n- n1 (start): Begin\n- n2 (task): Work",
            "",
        ));

        let (status, json) = send(app(&mock), get_req("/api/flows/g1")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["success"], true);
        assert_eq!(json["parse"], "complete");
        assert_eq!(
            json["data"],
            serde_json::json!({
                "id": "g1",
                "name": "Demo",
                "nodeCount": 3,
                "edgeCount": 2,
                "nodes": [
                    {"id": "n1", "type": "start", "label": "Begin"},
                    {"id": "n2", "type": "task", "label": "Work"},
                ],
            })
        );
        assert_eq!(mock.calls()[0].args(), ["show", "g1", "-e"]);
    }

    #[tokio::test]
    async fn show_unrecognized_output_is_empty_parse() {
        let mock = Arc::new(MockInvoker::new());
        mock.add_response(InvocationResult::success("something else entirely", ""));

        let (_, json) = send(app(&mock), get_req("/api/flows/g1")).await;
        assert_eq!(json["success"], true);
        assert_eq!(json["parse"], "empty");
        assert_eq!(json["data"]["nodes"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn show_rejects_flag_like_id() {
        let mock = Arc::new(MockInvoker::new());
        let (status, json) = send(app(&mock), get_req("/api/flows/-e")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["success"], false);
        assert!(mock.calls().is_empty());
    }

    #[tokio::test]
    async fn run_passes_output_through() {
        let mock = Arc::new(MockInvoker::new());
        mock.add_response(InvocationResult::success("step 1\nstep 2\n", ""));

        let (status, json) = send(
            app(&mock),
            post_req("/api/flows/g1/run", r#"{"input": "hello", "maxIterations": 3}"#),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["success"], true);
        assert_eq!(json["output"], "step 1\nstep 2\n");
        assert!(json.get("error").is_none());

        let calls = mock.calls();
        assert_eq!(calls[0].args(), ["run", "g1", "-i", "hello", "-m", "3"]);
        assert_eq!(calls[0].timeout_override(), Some(RUN_TIMEOUT));
        assert_eq!(calls[0].key(), Some("g1"));
    }

    #[tokio::test]
    async fn run_with_empty_body() {
        let mock = Arc::new(MockInvoker::new());
        let request = Request::builder()
            .method("POST")
            .uri("/api/flows/g1/run")
            .body(Body::empty())
            .unwrap();

        let (status, json) = send(app(&mock), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["success"], true);
        assert_eq!(mock.calls()[0].args(), ["run", "g1"]);
    }

    #[tokio::test]
    async fn run_timeout_is_reported() {
        let mock = Arc::new(MockInvoker::new());
        mock.add_response(
            FlowError::Timeout {
                after: Duration::from_secs(120),
            }
            .into(),
        );

        let (status, json) = send(app(&mock), post_req("/api/flows/g1/run", "{}")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["success"], false);
        assert_eq!(json["errorKind"], "timeout");
        assert_eq!(json["error"], "timed out after 120s");
        assert!(json.get("output").is_none());
        assert!(json.get("exitCode").is_none());
    }

    #[tokio::test]
    async fn run_rejects_malformed_body() {
        let mock = Arc::new(MockInvoker::new());
        let (status, json) =
            send(app(&mock), post_req("/api/flows/g1/run", r#"{"maxIterations": "lots"}"#)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["success"], false);
        assert!(mock.calls().is_empty());
    }

    #[tokio::test]
    async fn health_under_api() {
        let mock = Arc::new(MockInvoker::new());
        let (status, json) = send(app(&mock), get_req("/api/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "ok");
    }
}
