//! AI request and response types.

use base64::Engine;
use serde::Serialize;
use serde_json::Value as JsonValue;

use crate::types::CapturedImage;

/// Role in a chat conversation. Every request is a single user turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
}

/// An image attached to a message, already in transport encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData {
    pub mime_type: String,
    /// Standard base64 of the encoded image bytes.
    pub base64: String,
}

impl ImageData {
    pub fn from_bytes(data: &[u8], mime_type: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            base64: base64::engine::general_purpose::STANDARD.encode(data),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.base64.is_empty()
    }

    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.base64)
    }
}

impl From<CapturedImage> for ImageData {
    fn from(image: CapturedImage) -> Self {
        Self {
            base64: image.to_base64(),
            mime_type: image.mime_type,
        }
    }
}

/// A message in a chat conversation.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
    pub images: Vec<ImageData>,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            images: Vec::new(),
        }
    }

    /// A user message carrying images ahead of the text instruction.
    pub fn user_with_images(content: impl Into<String>, images: Vec<ImageData>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            images,
        }
    }
}

/// Output schema declared to the endpoint, constraining the shape of its reply.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseSchema {
    /// Schema name, reported to the endpoint.
    pub name: String,
    /// JSON Schema document.
    pub schema: JsonValue,
}

/// Request for a chat completion.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    /// If set, the endpoint must reply with JSON matching this schema.
    pub response_schema: Option<ResponseSchema>,
}

/// Token usage information.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Response from a chat completion.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatResponse {
    /// The generated content. Untrusted model output.
    pub content: String,
    /// Token usage statistics.
    pub usage: Usage,
}
