//! Command proxy handler that routes HTTP requests to dashboard and assistant commands
//!
//! A single /api/invoke endpoint carries every page action. Command routing
//! lives in the `routes/` directory:
//! - dashboard_routes: scenario selection and recommendation toggles
//! - assistant_routes: transcript, send, retry and reset

use super::routes;
use super::ServerAppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Request body for /api/invoke endpoint
#[derive(Debug, Deserialize)]
pub struct InvokeRequest {
    /// Command name (e.g., "select_scenario", "send_chat_message")
    pub cmd: String,
    /// Command arguments as JSON object
    #[serde(default)]
    pub args: Value,
}

/// Response body for /api/invoke endpoint
#[derive(Debug, Serialize)]
pub struct InvokeResponse {
    /// Whether the command succeeded
    pub success: bool,
    /// Result data (on success)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    /// Error message (on failure)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Error type for invoke handler
pub struct InvokeError {
    status: StatusCode,
    message: String,
}

impl IntoResponse for InvokeError {
    fn into_response(self) -> Response {
        let body = InvokeResponse {
            success: false,
            data: None,
            error: Some(self.message),
        };
        (self.status, Json(body)).into_response()
    }
}

/// Main invoke handler - routes commands to their implementations
pub async fn invoke_handler(
    State(state): State<ServerAppState>,
    Json(req): Json<InvokeRequest>,
) -> Result<Json<InvokeResponse>, InvokeError> {
    log::debug!("Invoke command: {} with args: {:?}", req.cmd, req.args);

    match routes::route_command(&req.cmd, req.args, &state).await {
        Ok(data) => Ok(Json(InvokeResponse {
            success: true,
            data: Some(data),
            error: None,
        })),
        Err(e) => {
            log::warn!("Command {} failed: {}", req.cmd, e);
            Err(InvokeError {
                status: StatusCode::BAD_REQUEST,
                message: e,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::test_support::test_state;
    use serde_json::json;

    #[test]
    fn test_invoke_request_args_default() {
        let req: InvokeRequest = serde_json::from_value(json!({ "cmd": "list_scenarios" })).unwrap();
        assert_eq!(req.cmd, "list_scenarios");
        assert!(req.args.is_null());
    }

    #[test]
    fn test_error_response_omits_data() {
        let body = InvokeResponse {
            success: false,
            data: None,
            error: Some("Unknown command: nope".to_string()),
        };
        let json = serde_json::to_value(body).unwrap();
        assert_eq!(json, json!({ "success": false, "error": "Unknown command: nope" }));
    }

    #[tokio::test]
    async fn test_unknown_command_is_bad_request() {
        let state = test_state(None);
        let result = invoke_handler(
            State(state),
            Json(InvokeRequest {
                cmd: "drop_tables".to_string(),
                args: Value::Null,
            }),
        )
        .await;

        let response = match result {
            Ok(_) => panic!("unknown command should fail"),
            Err(e) => e.into_response(),
        };
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_known_command_succeeds() {
        let state = test_state(None);
        let Json(body) = invoke_handler(
            State(state),
            Json(InvokeRequest {
                cmd: "get_scenario_view".to_string(),
                args: Value::Null,
            }),
        )
        .await
        .unwrap_or_else(|_| panic!("command should succeed"));

        assert!(body.success);
        assert_eq!(body.data.unwrap()["id"], "serverless");
    }
}
