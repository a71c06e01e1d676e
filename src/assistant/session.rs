// Assistant session - transcript plus the idle/sending/failed state machine
//
// A send is split into `begin_send` and `complete_send` so a caller that
// shares the session behind a lock never holds it across the remote await.

use super::client::{ModelClient, Turn, TurnRequest};
use super::prompt::{DEFAULT_MODEL, MISSING_KEY_REPLY, SYSTEM_INSTRUCTION, WELCOME_MESSAGE};
use super::AssistantError;
use crate::models::{ChatMessage, MessageRole};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AssistantStatus {
    Idle,
    Sending,
    /// The last remote call failed; nothing was added to the transcript and
    /// the unanswered message can be retried
    Failed,
}

/// The long-lived conversation with the hosted model.
///
/// Created on the first remote send and reused until the session is reset.
#[derive(Debug, Clone)]
pub struct Conversation {
    id: String,
    model: String,
    system_instruction: String,
    history: Vec<Turn>,
}

impl Conversation {
    pub fn new(model: &str, system_instruction: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            model: model.to_string(),
            system_instruction: system_instruction.to_string(),
            history: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn history(&self) -> &[Turn] {
        &self.history
    }

    fn request(&self, epoch: u64, message: &str) -> TurnRequest {
        TurnRequest {
            epoch,
            model: self.model.clone(),
            system_instruction: self.system_instruction.clone(),
            history: self.history.clone(),
            message: message.to_string(),
        }
    }

    fn record(&mut self, message: &str, reply: &str) {
        self.history.push(Turn {
            role: MessageRole::User,
            text: message.to_string(),
        });
        self.history.push(Turn {
            role: MessageRole::Model,
            text: reply.to_string(),
        });
    }
}

/// What the caller has to do after `begin_send`
#[derive(Debug)]
pub enum SendPlan {
    /// Answered locally; the reply is already in the transcript
    Immediate(String),
    /// Issue this request, then hand the result to `complete_send`
    Remote(TurnRequest),
}

pub struct AssistantSession {
    model: String,
    system_instruction: String,
    /// `None` when no credential is configured
    client: Option<Arc<dyn ModelClient>>,
    conversation: Option<Conversation>,
    transcript: Vec<ChatMessage>,
    status: AssistantStatus,
    unanswered: Option<String>,
    epoch: u64,
}

fn welcome() -> ChatMessage {
    ChatMessage {
        id: "welcome".to_string(),
        ..ChatMessage::model(WELCOME_MESSAGE)
    }
}

impl AssistantSession {
    pub fn new(client: Option<Arc<dyn ModelClient>>) -> Self {
        Self::with_model(client, DEFAULT_MODEL)
    }

    pub fn with_model(client: Option<Arc<dyn ModelClient>>, model: &str) -> Self {
        Self {
            model: model.to_string(),
            system_instruction: SYSTEM_INSTRUCTION.to_string(),
            client,
            conversation: None,
            transcript: vec![welcome()],
            status: AssistantStatus::Idle,
            unanswered: None,
            epoch: 0,
        }
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    pub fn status(&self) -> AssistantStatus {
        self.status
    }

    pub fn has_credential(&self) -> bool {
        self.client.is_some()
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn conversation(&self) -> Option<&Conversation> {
        self.conversation.as_ref()
    }

    /// Text of the last message whose remote call failed
    pub fn unanswered(&self) -> Option<&str> {
        self.unanswered.as_deref()
    }

    pub fn client(&self) -> Option<Arc<dyn ModelClient>> {
        self.client.clone()
    }

    /// Append the user's message and decide how it gets answered
    pub fn begin_send(&mut self, text: &str) -> Result<SendPlan, AssistantError> {
        if self.status == AssistantStatus::Sending {
            return Err(AssistantError::Busy);
        }
        if text.trim().is_empty() {
            return Err(AssistantError::EmptyMessage);
        }

        self.transcript.push(ChatMessage::user(text));
        self.unanswered = None;

        if self.client.is_none() {
            self.transcript.push(ChatMessage::model(MISSING_KEY_REPLY));
            self.status = AssistantStatus::Idle;
            return Ok(SendPlan::Immediate(MISSING_KEY_REPLY.to_string()));
        }

        Ok(SendPlan::Remote(self.start_remote(text)))
    }

    /// Re-issue the unanswered message without appending it again
    pub fn retry(&mut self) -> Result<SendPlan, AssistantError> {
        if self.status == AssistantStatus::Sending {
            return Err(AssistantError::Busy);
        }
        let text = self
            .unanswered
            .take()
            .ok_or(AssistantError::NothingToRetry)?;

        if self.client.is_none() {
            self.transcript.push(ChatMessage::model(MISSING_KEY_REPLY));
            self.status = AssistantStatus::Idle;
            return Ok(SendPlan::Immediate(MISSING_KEY_REPLY.to_string()));
        }

        Ok(SendPlan::Remote(self.start_remote(&text)))
    }

    fn start_remote(&mut self, text: &str) -> TurnRequest {
        let (model, instruction) = (self.model.clone(), self.system_instruction.clone());
        let conversation = self
            .conversation
            .get_or_insert_with(|| Conversation::new(&model, &instruction));
        let request = conversation.request(self.epoch, text);
        self.status = AssistantStatus::Sending;
        request
    }

    /// Apply the outcome of a remote call.
    ///
    /// A reply is appended and returned. A failure is logged and leaves the
    /// transcript untouched.
    pub fn complete_send(
        &mut self,
        request: TurnRequest,
        result: Result<String, AssistantError>,
    ) -> Option<ChatMessage> {
        if request.epoch != self.epoch {
            log::debug!("Discarding reply from before the session was reset");
            return None;
        }

        match result {
            Ok(text) => {
                if let Some(conversation) = self.conversation.as_mut() {
                    conversation.record(&request.message, &text);
                }
                let message = ChatMessage::model(text);
                self.transcript.push(message.clone());
                self.status = AssistantStatus::Idle;
                Some(message)
            }
            Err(e) => {
                log::error!("Assistant API error: {}", e);
                self.unanswered = Some(request.message);
                self.status = AssistantStatus::Failed;
                None
            }
        }
    }

    /// Send a message and wait for the reply.
    ///
    /// `Ok(None)` means the remote call failed and nothing was appended.
    pub async fn send(&mut self, text: &str) -> Result<Option<String>, AssistantError> {
        let plan = self.begin_send(text)?;
        self.run(plan).await
    }

    /// Retry the unanswered message and wait for the reply
    pub async fn send_retry(&mut self) -> Result<Option<String>, AssistantError> {
        let plan = self.retry()?;
        self.run(plan).await
    }

    async fn run(&mut self, plan: SendPlan) -> Result<Option<String>, AssistantError> {
        match plan {
            SendPlan::Immediate(reply) => Ok(Some(reply)),
            SendPlan::Remote(request) => {
                let Some(client) = self.client.clone() else {
                    return Ok(None);
                };
                let result = client.generate(&request).await;
                Ok(self.complete_send(request, result).map(|m| m.text))
            }
        }
    }

    /// Drop the conversation and start over from the welcome message
    pub fn reset(&mut self) {
        self.conversation = None;
        self.transcript = vec![welcome()];
        self.status = AssistantStatus::Idle;
        self.unanswered = None;
        self.epoch += 1;
        log::info!("Assistant session reset");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Replies from a script and records every request it sees
    struct ScriptedClient {
        replies: Mutex<Vec<Result<String, AssistantError>>>,
        seen: Mutex<Vec<TurnRequest>>,
    }

    impl ScriptedClient {
        fn new(replies: Vec<Result<String, AssistantError>>) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies),
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl ModelClient for ScriptedClient {
        async fn generate(&self, request: &TurnRequest) -> Result<String, AssistantError> {
            self.seen.lock().unwrap().push(request.clone());
            self.replies.lock().unwrap().remove(0)
        }
    }

    fn api_error() -> AssistantError {
        AssistantError::Api {
            status: 429,
            body: "quota".to_string(),
        }
    }

    #[test]
    fn test_new_session_has_welcome() {
        let session = AssistantSession::new(None);
        assert_eq!(session.transcript().len(), 1);
        assert_eq!(session.transcript()[0].id, "welcome");
        assert_eq!(session.transcript()[0].role, MessageRole::Model);
        assert_eq!(session.status(), AssistantStatus::Idle);
        assert!(session.conversation().is_none());
    }

    #[tokio::test]
    async fn test_missing_key_short_circuits() {
        let mut session = AssistantSession::new(None);
        let reply = session.send("why is latency high?").await.unwrap();

        assert_eq!(reply.as_deref(), Some(MISSING_KEY_REPLY));
        assert_eq!(session.transcript().len(), 3);
        assert_eq!(session.transcript()[1].text, "why is latency high?");
        assert_eq!(session.transcript()[2].text, MISSING_KEY_REPLY);
        assert_eq!(session.status(), AssistantStatus::Idle);
        assert!(session.conversation().is_none());
    }

    #[tokio::test]
    async fn test_successful_send_appends_reply() {
        let client = ScriptedClient::new(vec![Ok("Enable SnapStart.".to_string())]);
        let mut session = AssistantSession::new(Some(client.clone()));

        let reply = session.send("How do I fix cold starts?").await.unwrap();
        assert_eq!(reply.as_deref(), Some("Enable SnapStart."));

        let transcript = session.transcript();
        assert_eq!(transcript.len(), 3);
        assert_eq!(transcript[1].role, MessageRole::User);
        assert_eq!(transcript[2].role, MessageRole::Model);
        assert_eq!(session.status(), AssistantStatus::Idle);

        let seen = client.seen.lock().unwrap();
        assert_eq!(seen[0].message, "How do I fix cold starts?");
        assert_eq!(seen[0].model, DEFAULT_MODEL);
        assert!(seen[0].history.is_empty());
        assert!(seen[0].system_instruction.contains("Voting Application"));
    }

    #[tokio::test]
    async fn test_conversation_is_reused_and_retains_turns() {
        let client = ScriptedClient::new(vec![Ok("one".to_string()), Ok("two".to_string())]);
        let mut session = AssistantSession::new(Some(client.clone()));

        session.send("first").await.unwrap();
        let id = session.conversation().unwrap().id().to_string();
        session.send("second").await.unwrap();

        assert_eq!(session.conversation().unwrap().id(), id);
        let seen = client.seen.lock().unwrap();
        assert_eq!(seen[1].history.len(), 2);
        assert_eq!(seen[1].history[0].text, "first");
        assert_eq!(seen[1].history[1].text, "one");
    }

    #[tokio::test]
    async fn test_failure_is_silent() {
        let client = ScriptedClient::new(vec![Err(api_error())]);
        let mut session = AssistantSession::new(Some(client));

        let reply = session.send("hello?").await.unwrap();
        assert!(reply.is_none());
        // Only the welcome and the unanswered user message
        assert_eq!(session.transcript().len(), 2);
        assert_eq!(session.status(), AssistantStatus::Failed);
        assert_eq!(session.unanswered(), Some("hello?"));
        assert!(session.conversation().unwrap().history().is_empty());
    }

    #[tokio::test]
    async fn test_retry_reuses_unanswered_message() {
        let client = ScriptedClient::new(vec![Err(api_error()), Ok("Recovered.".to_string())]);
        let mut session = AssistantSession::new(Some(client.clone()));

        session.send("scale coredns?").await.unwrap();
        let reply = session.send_retry().await.unwrap();

        assert_eq!(reply.as_deref(), Some("Recovered."));
        let users = session
            .transcript()
            .iter()
            .filter(|m| m.role == MessageRole::User)
            .count();
        assert_eq!(users, 1);
        assert_eq!(session.status(), AssistantStatus::Idle);
        assert_eq!(client.seen.lock().unwrap()[1].message, "scale coredns?");
    }

    #[tokio::test]
    async fn test_retry_without_failure_is_rejected() {
        let mut session = AssistantSession::new(None);
        assert!(matches!(
            session.send_retry().await,
            Err(AssistantError::NothingToRetry)
        ));
    }

    #[test]
    fn test_blank_and_concurrent_sends_rejected() {
        let client = ScriptedClient::new(vec![]);
        let mut session = AssistantSession::new(Some(client));

        assert!(matches!(
            session.begin_send("   "),
            Err(AssistantError::EmptyMessage)
        ));

        let plan = session.begin_send("first").unwrap();
        assert!(matches!(plan, SendPlan::Remote(_)));
        assert_eq!(session.status(), AssistantStatus::Sending);
        assert!(matches!(
            session.begin_send("second"),
            Err(AssistantError::Busy)
        ));
        // The optimistic user message is already visible
        assert_eq!(session.transcript().last().unwrap().text, "first");
    }

    #[test]
    fn test_reset_discards_in_flight_reply() {
        let client = ScriptedClient::new(vec![]);
        let mut session = AssistantSession::new(Some(client));

        let SendPlan::Remote(request) = session.begin_send("question").unwrap() else {
            panic!("expected a remote plan");
        };
        session.reset();

        assert!(session
            .complete_send(request, Ok("late answer".to_string()))
            .is_none());
        assert_eq!(session.transcript().len(), 1);
        assert_eq!(session.status(), AssistantStatus::Idle);
        assert!(session.conversation().is_none());
    }
}
