//! Assistant command routing
//!
//! Handles: get_transcript, get_assistant_status, send_chat_message,
//! retry_chat_message, reset_chat
//!
//! Sending is bracketed by `begin_send`/`complete_send` so the session lock
//! is released while the hosted model is working.

use crate::assistant::{AssistantStatus, SendPlan};
use crate::models::ChatMessage;
use crate::server::events::{
    ASSISTANT_FAILED, ASSISTANT_MESSAGE, ASSISTANT_RESET, ASSISTANT_SENDING,
};
use serde::Serialize;
use serde_json::Value;

use super::{get_arg, route_sync, ServerAppState};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistantStatusInfo {
    pub status: AssistantStatus,
    pub has_credential: bool,
    pub model: String,
    pub conversation_id: Option<String>,
    pub unanswered: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageResponse {
    /// Model reply; `None` when the call failed and nothing was appended
    pub reply: Option<String>,
    pub status: AssistantStatus,
}

/// Route assistant commands
pub async fn route_assistant_command(
    cmd: &str,
    args: Value,
    state: &ServerAppState,
) -> Result<Value, String> {
    match cmd {
        "get_transcript" => route_sync!(state.lock_assistant().map(|a| a.transcript().to_vec())),

        "get_assistant_status" => {
            let info = {
                let assistant = state.lock_assistant()?;
                AssistantStatusInfo {
                    status: assistant.status(),
                    has_credential: assistant.has_credential(),
                    model: assistant.model().to_string(),
                    conversation_id: assistant.conversation().map(|c| c.id().to_string()),
                    unanswered: assistant.unanswered().map(str::to_string),
                }
            };
            serde_json::to_value(info).map_err(|e| e.to_string())
        }

        "send_chat_message" => {
            let text: String = get_arg(&args, "text")?;
            let (plan, user_message) = {
                let mut assistant = state.lock_assistant()?;
                let plan = assistant.begin_send(&text).map_err(|e| e.to_string())?;
                (plan, assistant.transcript().last().cloned())
            };
            state.broadcaster.broadcast(ASSISTANT_SENDING, &user_message);
            run_plan(state, plan).await
        }

        "retry_chat_message" => {
            let plan = {
                let mut assistant = state.lock_assistant()?;
                assistant.retry().map_err(|e| e.to_string())?
            };
            state.broadcaster.broadcast(ASSISTANT_SENDING, Value::Null);
            run_plan(state, plan).await
        }

        "reset_chat" => {
            let transcript = {
                let mut assistant = state.lock_assistant()?;
                assistant.reset();
                assistant.transcript().to_vec()
            };
            state.broadcaster.broadcast(ASSISTANT_RESET, &transcript);
            serde_json::to_value(transcript).map_err(|e| e.to_string())
        }

        _ => Err(format!("Unknown assistant command: {}", cmd)),
    }
}

/// Carry out a send plan without holding the session lock across the remote call
async fn run_plan(state: &ServerAppState, plan: SendPlan) -> Result<Value, String> {
    let (reply, status) = match plan {
        SendPlan::Immediate(reply) => {
            let message = state.lock_assistant()?.transcript().last().cloned();
            state.broadcaster.broadcast(ASSISTANT_MESSAGE, &message);
            (Some(reply), AssistantStatus::Idle)
        }
        SendPlan::Remote(request) => {
            let client = state
                .lock_assistant()?
                .client()
                .ok_or_else(|| "No model client configured".to_string())?;

            let result = client.generate(&request).await;

            let (message, status): (Option<ChatMessage>, AssistantStatus) = {
                let mut assistant = state.lock_assistant()?;
                let message = assistant.complete_send(request, result);
                (message, assistant.status())
            };

            match &message {
                Some(m) => state.broadcaster.broadcast(ASSISTANT_MESSAGE, m),
                None if status == AssistantStatus::Failed => {
                    state.broadcaster.broadcast(ASSISTANT_FAILED, status)
                }
                // Discarded after a reset; the reset event already went out
                None => {}
            }
            (message.map(|m| m.text), status)
        }
    };

    serde_json::to_value(SendMessageResponse { reply, status }).map_err(|e| e.to_string())
}

/// Check if a command is an assistant command
pub fn is_assistant_command(cmd: &str) -> bool {
    matches!(
        cmd,
        "get_transcript"
            | "get_assistant_status"
            | "send_chat_message"
            | "retry_chat_message"
            | "reset_chat"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assistant::prompt::MISSING_KEY_REPLY;
    use crate::server::test_support::{test_state, FixedClient};
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_send_without_credential() {
        let state = test_state(None);
        let response = route_assistant_command(
            "send_chat_message",
            json!({ "text": "Why the cold starts?" }),
            &state,
        )
        .await
        .unwrap();

        assert_eq!(response["reply"], MISSING_KEY_REPLY);
        assert_eq!(response["status"], "idle");

        let transcript = route_assistant_command("get_transcript", Value::Null, &state)
            .await
            .unwrap();
        assert_eq!(transcript.as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_send_with_client() {
        let state = test_state(Some(Arc::new(FixedClient::ok("Scale CoreDNS."))));
        let mut events = state.broadcaster.subscribe();

        let response = route_assistant_command(
            "send_chat_message",
            json!({ "text": "Fix the DNS errors?" }),
            &state,
        )
        .await
        .unwrap();
        assert_eq!(response["reply"], "Scale CoreDNS.");

        assert_eq!(events.recv().await.unwrap().event, ASSISTANT_SENDING);
        let message = events.recv().await.unwrap();
        assert_eq!(message.event, ASSISTANT_MESSAGE);
        assert_eq!(message.payload["text"], "Scale CoreDNS.");
    }

    #[tokio::test]
    async fn test_failure_then_retry() {
        let state = test_state(Some(Arc::new(FixedClient::failing())));

        let response = route_assistant_command("send_chat_message", json!({ "text": "hi" }), &state)
            .await
            .unwrap();
        assert!(response["reply"].is_null());
        assert_eq!(response["status"], "failed");

        let status = route_assistant_command("get_assistant_status", Value::Null, &state)
            .await
            .unwrap();
        assert_eq!(status["unanswered"], "hi");
        assert_eq!(status["hasCredential"], true);

        // Still failing, but the user message is not duplicated
        route_assistant_command("retry_chat_message", Value::Null, &state)
            .await
            .unwrap();
        let transcript = route_assistant_command("get_transcript", Value::Null, &state)
            .await
            .unwrap();
        assert_eq!(transcript.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_reset_chat() {
        let state = test_state(None);
        route_assistant_command("send_chat_message", json!({ "text": "hello" }), &state)
            .await
            .unwrap();

        let transcript = route_assistant_command("reset_chat", Value::Null, &state)
            .await
            .unwrap();
        let transcript = transcript.as_array().unwrap();
        assert_eq!(transcript.len(), 1);
        assert_eq!(transcript[0]["id"], "welcome");
    }

    #[tokio::test]
    async fn test_blank_message_rejected() {
        let state = test_state(None);
        let err = route_assistant_command("send_chat_message", json!({ "text": "  " }), &state)
            .await
            .unwrap_err();
        assert_eq!(err, "Message is empty");
    }
}
