//! Scripted provider for testing.

use super::{ChatCompletionRequest, ChatProvider, ProviderError};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

enum Reply {
    Body(Value),
    Error(ProviderError),
}

/// Mock chat provider that returns a fixed reply and records every call.
pub struct MockChatProvider {
    reply: Reply,
    calls: AtomicUsize,
    last_request: Mutex<Option<ChatCompletionRequest>>,
    last_credential: Mutex<Option<String>>,
}

impl MockChatProvider {
    fn with_reply(reply: Reply) -> Self {
        Self {
            reply,
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
            last_credential: Mutex::new(None),
        }
    }

    /// Answer every call with `body`.
    pub fn replying(body: Value) -> Self {
        Self::with_reply(Reply::Body(body))
    }

    /// Fail every call with `error`.
    pub fn failing(error: ProviderError) -> Self {
        Self::with_reply(Reply::Error(error))
    }

    /// Number of upstream calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<ChatCompletionRequest> {
        self.last_request
            .lock()
            .ok()
            .and_then(|guard| guard.clone())
    }

    pub fn last_credential(&self) -> Option<String> {
        self.last_credential
            .lock()
            .ok()
            .and_then(|guard| guard.clone())
    }
}

#[async_trait]
impl ChatProvider for MockChatProvider {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn complete(
        &self,
        credential: &str,
        request: &ChatCompletionRequest,
    ) -> Result<Value, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut guard) = self.last_request.lock() {
            *guard = Some(request.clone());
        }
        if let Ok(mut guard) = self.last_credential.lock() {
            *guard = Some(credential.to_string());
        }

        match &self.reply {
            Reply::Body(body) => Ok(body.clone()),
            Reply::Error(err) => Err(err.clone()),
        }
    }
}
