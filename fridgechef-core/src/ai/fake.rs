//! Fake AI client for testing.
//!
//! Replies are registered per prompt name, so tests can script each step of
//! the pipeline without network access or API costs. Every request is
//! recorded for later inspection.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use super::{AiClient, AiError, ChatRequest, ChatResponse, Usage};

/// A scripted reply.
#[derive(Debug, Clone)]
pub enum FakeReply {
    /// Reply successfully with this content.
    Content(String),
    /// Fail as a transport error with this message.
    RequestError(String),
    /// Fail as a non-2xx API response.
    ApiError { status: u16, message: String },
}

/// A fake AI client for testing.
#[derive(Debug, Default)]
pub struct FakeAiClient {
    /// Map of prompt name -> reply
    replies: HashMap<String, FakeReply>,
    /// Every request seen, in order.
    requests: Mutex<Vec<(String, ChatRequest)>>,
}

impl FakeAiClient {
    /// Create a new FakeAiClient with no registered replies.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the reply for a prompt name.
    pub fn with_reply(mut self, prompt_name: &str, reply: FakeReply) -> Self {
        self.replies.insert(prompt_name.to_string(), reply);
        self
    }

    /// Reply to `prompt_name` with `content`.
    pub fn with_content(self, prompt_name: &str, content: &str) -> Self {
        self.with_reply(prompt_name, FakeReply::Content(content.to_string()))
    }

    /// Fail `prompt_name` with a transport error.
    pub fn with_request_error(self, prompt_name: &str, message: &str) -> Self {
        self.with_reply(prompt_name, FakeReply::RequestError(message.to_string()))
    }

    /// All requests seen so far, paired with their prompt names.
    pub fn requests(&self) -> Vec<(String, ChatRequest)> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of requests made for `prompt_name`.
    pub fn call_count(&self, prompt_name: &str) -> usize {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|(name, _)| name == prompt_name)
            .count()
    }
}

#[async_trait]
impl AiClient for FakeAiClient {
    async fn complete(
        &self,
        prompt_name: &str,
        request: ChatRequest,
    ) -> Result<ChatResponse, AiError> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((prompt_name.to_string(), request));

        match self.replies.get(prompt_name) {
            Some(FakeReply::Content(content)) => Ok(ChatResponse {
                content: content.clone(),
                usage: Usage::default(),
            }),
            Some(FakeReply::RequestError(message)) => Err(AiError::Request(message.clone())),
            Some(FakeReply::ApiError { status, message }) => Err(AiError::Api {
                status: *status,
                message: message.clone(),
            }),
            None => Err(AiError::Request(format!(
                "FakeAiClient: no reply configured for prompt {}",
                prompt_name
            ))),
        }
    }
}
