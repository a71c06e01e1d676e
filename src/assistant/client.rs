// Hosted model client
//
// One logical operation: send a conversational turn and get text back.
// The Gemini implementation talks to the public generateContent endpoint;
// tests substitute their own `ModelClient`.

use super::AssistantError;
use crate::models::MessageRole;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Default endpoint for the hosted model API
pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com";

/// An accepted exchange already retained by the conversation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Turn {
    pub role: MessageRole,
    pub text: String,
}

/// Everything needed for one remote call
#[derive(Debug, Clone)]
pub struct TurnRequest {
    /// Session epoch the request was issued in; stale completions are dropped
    pub epoch: u64,
    pub model: String,
    pub system_instruction: String,
    /// Turns the conversation already retains
    pub history: Vec<Turn>,
    /// Raw user text for this turn
    pub message: String,
}

#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Send one turn and return the model's text reply
    async fn generate(&self, request: &TurnRequest) -> Result<String, AssistantError>;
}

// =============================================================================
// Gemini wire types
// =============================================================================

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    fn text(role: Option<&str>, text: &str) -> Self {
        Self {
            role: role.map(|r| r.to_string()),
            parts: vec![Part {
                text: Some(text.to_string()),
            }],
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub system_instruction: Content,
    pub contents: Vec<Content>,
}

impl GenerateContentRequest {
    pub fn from_turn(request: &TurnRequest) -> Self {
        let mut contents: Vec<Content> = request
            .history
            .iter()
            .map(|t| Content::text(Some(t.role.as_str()), &t.text))
            .collect();
        contents.push(Content::text(
            Some(MessageRole::User.as_str()),
            &request.message,
        ));

        Self {
            system_instruction: Content::text(None, &request.system_instruction),
            contents,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
}

#[derive(Debug, Deserialize, Default)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate
    pub fn text(&self) -> Result<String, AssistantError> {
        let text: String = self
            .candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|c| c.parts.iter().filter_map(|p| p.text.as_deref()).collect())
            .unwrap_or_default();

        if text.is_empty() {
            return Err(AssistantError::EmptyResponse);
        }
        Ok(text)
    }
}

// =============================================================================
// Gemini client
// =============================================================================

/// Client for the hosted Gemini API
pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(base_url: &str, api_key: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    pub fn endpoint(&self, model: &str) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, model)
    }
}

#[async_trait]
impl ModelClient for GeminiClient {
    async fn generate(&self, request: &TurnRequest) -> Result<String, AssistantError> {
        let url = self.endpoint(&request.model);
        log::debug!(
            "Sending turn to {} ({} retained turns)",
            request.model,
            request.history.len()
        );

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&GenerateContentRequest::from_turn(request))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(AssistantError::Api { status, body });
        }

        let parsed: GenerateContentResponse = response.json().await?;
        parsed.text()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> TurnRequest {
        TurnRequest {
            epoch: 0,
            model: "gemini-2.5-flash".to_string(),
            system_instruction: "be brief".to_string(),
            history: vec![
                Turn {
                    role: MessageRole::User,
                    text: "What is SnapStart?".to_string(),
                },
                Turn {
                    role: MessageRole::Model,
                    text: "A Lambda snapshot feature.".to_string(),
                },
            ],
            message: "Does it help cold starts?".to_string(),
        }
    }

    #[test]
    fn test_request_body_shape() {
        let body = serde_json::to_value(GenerateContentRequest::from_turn(&request())).unwrap();

        assert_eq!(body["systemInstruction"]["parts"][0]["text"], "be brief");
        assert!(body["systemInstruction"].get("role").is_none());

        let contents = body["contents"].as_array().unwrap();
        assert_eq!(contents.len(), 3);
        assert_eq!(contents[0]["role"], "user");
        assert_eq!(contents[1]["role"], "model");
        assert_eq!(contents[2]["role"], "user");
        assert_eq!(contents[2]["parts"][0]["text"], "Does it help cold starts?");
    }

    #[test]
    fn test_response_text_joins_parts() {
        let json = r#"{
            "candidates": [
                {"content": {"role": "model", "parts": [{"text": "Scale "}, {"text": "CoreDNS."}]}},
                {"content": {"role": "model", "parts": [{"text": "ignored"}]}}
            ]
        }"#;
        let parsed: GenerateContentResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.text().unwrap(), "Scale CoreDNS.");
    }

    #[test]
    fn test_response_without_text_is_error() {
        let parsed: GenerateContentResponse =
            serde_json::from_str(r#"{"candidates": []}"#).unwrap();
        assert!(matches!(parsed.text(), Err(AssistantError::EmptyResponse)));

        let blocked: GenerateContentResponse =
            serde_json::from_str(r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#).unwrap();
        assert!(blocked.text().is_err());
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let client = GeminiClient::new("http://localhost:9999/", "key".to_string());
        assert_eq!(
            client.endpoint("gemini-2.5-flash"),
            "http://localhost:9999/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }
}
