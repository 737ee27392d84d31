//! Client-side chat session.
//!
//! Owns everything a chat front-end keeps in memory for one tab or terminal:
//! the visible conversation, the memory digest, the selected model and the
//! busy flag. Nothing here is persisted.

pub mod client;
pub mod extract;
pub mod memory;

pub use client::{GenerateOutcome, RelayClient};
pub use extract::{extract_content, NO_RESPONSE};
pub use memory::{MemoryEntry, MemoryLog, MEMORY_CAP};

use crate::models::ModelKey;
use crate::services::HealthReport;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

pub const WELCOME_MESSAGE: &str = "Hello. I am the Modular Unified Machine for Understanding. How can I assist with your academic research today?";

/// Content of the transient assistant message shown while a send is in flight.
pub const PENDING_PLACEHOLDER: &str = "Thinking...";

pub const MISSING_KEY_NOTICE: &str =
    "System Notice: API key not configured. Please contact your administrator.";

pub const QUICK_PROMPTS: [&str; 4] = [
    "Explain quantum entanglement in simple terms",
    "Help me structure a research paper on climate change",
    "Summarize recent breakthroughs in AI",
    "Generate a thesis statement about renewable energy",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub role: MessageRole,
    pub content: String,
    /// Placeholder awaiting a relay reply.
    pub pending: bool,
}

impl ChatMessage {
    fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            content: content.into(),
            pending: false,
        }
    }

    fn placeholder() -> Self {
        Self {
            pending: true,
            ..Self::new(MessageRole::Assistant, PENDING_PLACEHOLDER)
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("Prompt is empty")]
    EmptyPrompt,

    #[error("A generation is already in progress")]
    Busy,

    #[error("No pending generation matches this turn")]
    UnknownTurn,
}

/// A send that has been accepted and is waiting for the relay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingTurn {
    id: Uuid,
    placeholder: Uuid,
    prompt: String,
    model: ModelKey,
}

impl PendingTurn {
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn model(&self) -> ModelKey {
        self.model
    }
}

#[derive(Debug, Clone)]
pub struct ChatSession {
    messages: Vec<ChatMessage>,
    memories: MemoryLog,
    current_model: ModelKey,
    pending: Option<Uuid>,
    welcome: bool,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatSession {
    pub fn new() -> Self {
        Self::with_memory(MemoryLog::default())
    }

    pub fn with_memory(memories: MemoryLog) -> Self {
        Self {
            messages: Vec::new(),
            memories,
            current_model: ModelKey::DEFAULT,
            pending: None,
            welcome: true,
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn memories(&self) -> &MemoryLog {
        &self.memories
    }

    pub fn current_model(&self) -> ModelKey {
        self.current_model
    }

    /// True while a generation is in flight; sends are refused meanwhile.
    pub fn is_sending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn is_welcome(&self) -> bool {
        self.welcome
    }

    /// The placeholder shown while a generation is in flight.
    pub fn pending_message(&self) -> Option<&ChatMessage> {
        self.messages.iter().find(|m| m.pending)
    }

    /// Suggested prompts, offered only on an untouched welcome screen.
    pub fn quick_prompts(&self) -> Option<&'static [&'static str]> {
        (self.welcome && self.messages.is_empty()).then_some(&QUICK_PROMPTS[..])
    }

    /// Select a model profile for subsequent sends and announce the switch.
    pub fn switch_model(&mut self, key: ModelKey) -> &ChatMessage {
        self.current_model = key;
        let profile = key.profile();
        self.push(
            MessageRole::Assistant,
            format!(
                "Switched to {} ({}) for optimized responses.",
                profile.description, profile.display_name
            ),
        )
    }

    /// Surface a missing upstream credential as an inline notice.
    pub fn apply_health(&mut self, report: &HealthReport) -> Option<&ChatMessage> {
        if report.credential_configured {
            None
        } else {
            Some(self.push(MessageRole::Assistant, MISSING_KEY_NOTICE))
        }
    }

    /// Accept a prompt: record the user message, show the pending
    /// placeholder and mark the session busy.
    pub fn begin_send(&mut self, prompt: &str) -> Result<PendingTurn, SessionError> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(SessionError::EmptyPrompt);
        }
        if self.pending.is_some() {
            return Err(SessionError::Busy);
        }

        self.push(MessageRole::User, prompt);
        self.welcome = false;

        let placeholder = ChatMessage::placeholder();
        let placeholder_id = placeholder.id;
        self.messages.push(placeholder);

        let turn = PendingTurn {
            id: Uuid::new_v4(),
            placeholder: placeholder_id,
            prompt: prompt.to_string(),
            model: self.current_model,
        };
        self.pending = Some(turn.id);
        Ok(turn)
    }

    /// Settle a pending turn with the relay's outcome and clear the busy flag.
    ///
    /// The reply replaces the turn's placeholder, or is appended if the chat
    /// was cleared meanwhile. Successes also record a memory entry.
    pub fn complete(
        &mut self,
        turn: PendingTurn,
        outcome: GenerateOutcome,
    ) -> Result<&ChatMessage, SessionError> {
        if self.pending != Some(turn.id) {
            return Err(SessionError::UnknownTurn);
        }
        self.pending = None;

        let content = match outcome {
            GenerateOutcome::Success(body) => {
                let content = extract_content(&body);
                let model_name = selected_model_name(&body)
                    .unwrap_or(turn.model.profile().display_name)
                    .to_string();
                self.memories
                    .insert(MemoryEntry::new(&turn.prompt, &content, &model_name));
                content
            }
            GenerateOutcome::Failure { error, .. } => format!("Error: {}", error),
            GenerateOutcome::Connection(detail) => format!(
                "Connection Error: {}. Please check your network and try again.",
                detail
            ),
        };

        let reply = ChatMessage::new(MessageRole::Assistant, content);
        match self.messages.iter().position(|m| m.id == turn.placeholder) {
            Some(index) => {
                self.messages[index] = reply;
                Ok(&self.messages[index])
            }
            None => {
                self.messages.push(reply);
                Ok(&self.messages[self.messages.len() - 1])
            }
        }
    }

    /// Send `prompt` through `client` and settle the turn.
    pub async fn send(
        &mut self,
        client: &RelayClient,
        prompt: &str,
    ) -> Result<&ChatMessage, SessionError> {
        let turn = self.begin_send(prompt)?;
        let outcome = client.generate(turn.prompt(), turn.model()).await;
        self.complete(turn, outcome)
    }

    /// Query relay health and add a notice if the credential is missing.
    pub async fn check_health(&mut self, client: &RelayClient) {
        match client.health().await {
            Ok(report) => {
                self.apply_health(&report);
            }
            Err(e) => tracing::warn!(error = %e, "Health check failed"),
        }
    }

    /// Clear the conversation and return to the welcome state. Memories stay.
    pub fn new_chat(&mut self) {
        self.messages.clear();
        self.welcome = true;
    }

    /// Stored prompt preview of a memory, for reuse as input.
    pub fn recall(&self, id: Uuid) -> Option<&str> {
        self.memories.get(id).map(|m| m.prompt.as_str())
    }

    fn push(&mut self, role: MessageRole, content: impl Into<String>) -> &ChatMessage {
        self.messages.push(ChatMessage::new(role, content));
        &self.messages[self.messages.len() - 1]
    }
}

fn selected_model_name(body: &Value) -> Option<&str> {
    body.get("selected_model_name")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::health::HEALTHY;
    use serde_json::json;

    fn success(content: &str) -> GenerateOutcome {
        GenerateOutcome::Success(json!({
            "choices": [{ "message": { "content": content } }],
            "selected_model_name": "RVM 1.0"
        }))
    }

    #[test]
    fn new_session_starts_in_welcome_state() {
        let session = ChatSession::new();
        assert!(session.is_welcome());
        assert!(!session.is_sending());
        assert_eq!(session.current_model(), ModelKey::DEFAULT);
        assert_eq!(session.quick_prompts(), Some(&QUICK_PROMPTS[..]));
    }

    #[test]
    fn successful_turn_appends_reply_and_memory() {
        let mut session = ChatSession::new();
        let turn = session.begin_send("  Explain X  ").unwrap();
        assert!(session.is_sending());
        assert!(!session.is_welcome());
        assert_eq!(turn.prompt(), "Explain X");

        let placeholder = session.pending_message().unwrap();
        assert_eq!(placeholder.role, MessageRole::Assistant);
        assert_eq!(placeholder.content, PENDING_PLACEHOLDER);
        assert_eq!(session.messages().len(), 2);

        let reply = session.complete(turn, success("X is ...")).unwrap();
        assert_eq!(reply.role, MessageRole::Assistant);
        assert_eq!(reply.content, "X is ...");

        assert!(!session.is_sending());
        assert!(session.pending_message().is_none());
        assert_eq!(session.messages().len(), 2);
        assert!(!session.messages()[1].pending);
        assert_eq!(session.messages()[0].role, MessageRole::User);
        assert_eq!(session.messages()[0].content, "Explain X");

        let memory = session.memories().iter().next().unwrap();
        assert_eq!(memory.prompt, "Explain X");
        assert_eq!(memory.model_name, "RVM 1.0");
    }

    #[test]
    fn busy_session_refuses_second_send() {
        let mut session = ChatSession::new();
        let turn = session.begin_send("first").unwrap();
        assert_eq!(session.begin_send("second"), Err(SessionError::Busy));

        session.complete(turn, success("ok")).unwrap();
        assert!(session.begin_send("second").is_ok());
    }

    #[test]
    fn empty_prompt_is_rejected() {
        let mut session = ChatSession::new();
        assert_eq!(session.begin_send("   "), Err(SessionError::EmptyPrompt));
        assert!(session.messages().is_empty());
        assert!(!session.is_sending());
    }

    #[test]
    fn failure_renders_error_without_memory() {
        let mut session = ChatSession::new();
        let turn = session.begin_send("hello").unwrap();
        let reply = session
            .complete(
                turn,
                GenerateOutcome::Failure {
                    status: 429,
                    error: "HTTP 429: slow down".to_string(),
                },
            )
            .unwrap();

        assert_eq!(reply.content, "Error: HTTP 429: slow down");
        assert!(session.memories().is_empty());
        assert!(!session.is_sending());
    }

    #[test]
    fn connection_failure_is_not_fatal() {
        let mut session = ChatSession::new();
        let turn = session.begin_send("hello").unwrap();
        let reply = session
            .complete(turn, GenerateOutcome::Connection("refused".to_string()))
            .unwrap();
        assert_eq!(
            reply.content,
            "Connection Error: refused. Please check your network and try again."
        );

        let turn = session.begin_send("again").unwrap();
        assert!(session.complete(turn, success("fine")).is_ok());
        assert_eq!(session.memories().len(), 1);
    }

    #[test]
    fn stale_turn_is_rejected() {
        let mut session = ChatSession::new();
        let turn = session.begin_send("hello").unwrap();
        let stale = turn.clone();
        session.complete(turn, success("ok")).unwrap();

        assert_eq!(
            session.complete(stale, success("again")).unwrap_err(),
            SessionError::UnknownTurn
        );
    }

    #[test]
    fn memory_falls_back_to_turn_model_name() {
        let mut session = ChatSession::new();
        session.switch_model(ModelKey::Rvm);
        let turn = session.begin_send("hello").unwrap();
        session
            .complete(turn, GenerateOutcome::Success(json!({ "response": "plain" })))
            .unwrap();

        let memory = session.memories().iter().next().unwrap();
        assert_eq!(memory.model_name, "RVM 1.0");
        assert_eq!(memory.response, "plain");
    }

    #[test]
    fn success_without_content_uses_placeholder() {
        let mut session = ChatSession::new();
        let turn = session.begin_send("hello").unwrap();
        let reply = session
            .complete(turn, GenerateOutcome::Success(json!({})))
            .unwrap();
        assert_eq!(reply.content, NO_RESPONSE);
    }

    #[test]
    fn failure_replaces_placeholder() {
        let mut session = ChatSession::new();
        let turn = session.begin_send("hello").unwrap();
        session
            .complete(turn, GenerateOutcome::Connection("refused".to_string()))
            .unwrap();

        assert_eq!(session.messages().len(), 2);
        assert!(session.pending_message().is_none());
        assert!(session.messages()[1].content.starts_with("Connection Error: "));
    }

    #[test]
    fn reply_after_new_chat_is_appended() {
        let mut session = ChatSession::new();
        let turn = session.begin_send("hello").unwrap();
        session.new_chat();
        assert!(session.pending_message().is_none());

        session.complete(turn, success("late")).unwrap();
        assert_eq!(session.messages().len(), 1);
        assert_eq!(session.messages()[0].content, "late");
        assert!(!session.is_sending());
    }

    #[test]
    fn new_chat_clears_messages_but_keeps_memories() {
        let mut session = ChatSession::new();
        let turn = session.begin_send("hello").unwrap();
        session.complete(turn, success("ok")).unwrap();

        session.new_chat();
        assert!(session.messages().is_empty());
        assert!(session.is_welcome());
        assert_eq!(session.memories().len(), 1);
        assert!(session.quick_prompts().is_some());
    }

    #[test]
    fn switch_model_announces_profile() {
        let mut session = ChatSession::new();
        let notice = session.switch_model(ModelKey::Rvm).content.clone();
        assert_eq!(
            notice,
            "Switched to Research Verifying Model (RVM 1.0) for optimized responses."
        );
        assert_eq!(session.current_model(), ModelKey::Rvm);

        let turn = session.begin_send("hello").unwrap();
        assert_eq!(turn.model(), ModelKey::Rvm);
    }

    #[test]
    fn missing_credential_adds_notice() {
        let mut session = ChatSession::new();
        let healthy = HealthReport {
            status: HEALTHY.to_string(),
            credential_configured: true,
        };
        assert!(session.apply_health(&healthy).is_none());

        let missing = HealthReport {
            credential_configured: false,
            ..healthy
        };
        assert_eq!(
            session.apply_health(&missing).unwrap().content,
            MISSING_KEY_NOTICE
        );
    }

    #[test]
    fn recall_returns_stored_prompt() {
        let mut session = ChatSession::new();
        let turn = session.begin_send("What is entropy?").unwrap();
        session.complete(turn, success("ok")).unwrap();

        let id = session.memories().iter().next().unwrap().id;
        assert_eq!(session.recall(id), Some("What is entropy?"));
        assert_eq!(session.recall(Uuid::new_v4()), None);
    }
}
