//! AI client implementation for OpenAI-compatible chat completion endpoints
//! (OpenRouter by default).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::time::Duration;
use thiserror::Error;

use super::config::AiConfig;
use super::types::{ChatMessage, ChatRequest, ChatResponse, Role, Usage};

#[derive(Error, Debug)]
pub enum AiError {
    #[error("Request failed: {0}")]
    Request(String),

    #[error("Request timeout after {}s", .0.as_secs_f32())]
    Timeout(Duration),

    #[error("API returned error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Rate limited, retry after {retry_after_secs:?} seconds")]
    RateLimited { retry_after_secs: Option<u64> },

    #[error("Failed to parse response: {0}")]
    ParseError(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Configuration error: {0}")]
    Config(#[from] super::config::ConfigError),
}

/// Trait for AI clients.
#[async_trait]
pub trait AiClient: Send + Sync {
    /// Complete a chat request.
    ///
    /// The `prompt_name` identifies the prompt template for logging and for
    /// fakes that answer per prompt.
    async fn complete(
        &self,
        prompt_name: &str,
        request: ChatRequest,
    ) -> Result<ChatResponse, AiError>;
}

/// AI client talking to a remote chat completions endpoint over HTTP.
pub struct HttpAiClient {
    client: reqwest::Client,
    config: AiConfig,
}

impl HttpAiClient {
    /// Create a new client from environment configuration.
    pub fn from_env() -> Result<Self, AiError> {
        let config = AiConfig::from_env()?;
        Self::new(config)
    }

    /// Create a new client with the given configuration.
    pub fn new(config: AiConfig) -> Result<Self, AiError> {
        let mut builder = reqwest::Client::builder().timeout(config.timeout);

        // Local gateways are reached directly, never through a system proxy.
        if is_loopback_url(&config.base_url) {
            builder = builder.no_proxy();
        }

        let client = builder
            .build()
            .map_err(|e| AiError::Request(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    fn map_send_error(&self, e: reqwest::Error) -> AiError {
        if e.is_timeout() {
            AiError::Timeout(self.config.timeout)
        } else {
            AiError::Request(e.to_string())
        }
    }
}

#[async_trait]
impl AiClient for HttpAiClient {
    async fn complete(
        &self,
        prompt_name: &str,
        request: ChatRequest,
    ) -> Result<ChatResponse, AiError> {
        let wire_request = to_wire_request(&self.config.model, &request);

        tracing::debug!(
            prompt_name = prompt_name,
            model = &self.config.model,
            "Calling AI API"
        );

        let response = self
            .client
            .post(self.config.completions_url())
            .bearer_auth(&self.config.api_key)
            .header("X-Title", "fridgechef")
            .json(&wire_request)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status().as_u16();

        if status == 429 {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok());
            return Err(AiError::RateLimited {
                retry_after_secs: retry_after,
            });
        }

        let body = response.text().await.map_err(|e| self.map_send_error(e))?;

        if !(200..300).contains(&status) {
            // Try to parse error response
            if let Ok(error_response) = serde_json::from_str::<WireErrorResponse>(&body) {
                return Err(AiError::Api {
                    status,
                    message: error_response.error.message,
                });
            }
            return Err(AiError::Api {
                status,
                message: body,
            });
        }

        let chat_response = parse_wire_response(&body)?;

        tracing::debug!(
            prompt_name = prompt_name,
            total_tokens = chat_response.usage.total_tokens,
            "AI API call complete"
        );

        Ok(chat_response)
    }
}

fn is_loopback_url(url: &str) -> bool {
    reqwest::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.to_string()))
        .map(|host| matches!(host.as_str(), "localhost" | "127.0.0.1" | "[::1]"))
        .unwrap_or(false)
}

/// Chat completions request body.
#[derive(Debug, Serialize)]
struct WireRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<WireResponseFormat<'a>>,
}

#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    role: Role,
    content: WireContent<'a>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum WireContent<'a> {
    Text(&'a str),
    Parts(Vec<WireContentPart<'a>>),
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum WireContentPart<'a> {
    Text { text: &'a str },
    ImageUrl { image_url: WireImageUrl },
}

#[derive(Debug, Serialize)]
struct WireImageUrl {
    url: String,
}

#[derive(Debug, Serialize)]
struct WireResponseFormat<'a> {
    #[serde(rename = "type")]
    format_type: &'static str,
    json_schema: WireJsonSchema<'a>,
}

#[derive(Debug, Serialize)]
struct WireJsonSchema<'a> {
    name: &'a str,
    strict: bool,
    schema: &'a JsonValue,
}

/// Chat completions response body (only the fields we read).
#[derive(Debug, Deserialize)]
struct WireResponse {
    #[serde(default)]
    choices: Vec<WireChoice>,
    #[serde(default)]
    usage: Option<WireUsage>,
}

#[derive(Debug, Deserialize)]
struct WireChoice {
    message: WireChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct WireChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct WireUsage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
    #[serde(default)]
    total_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct WireApiError {
    message: String,
}

/// Error response from the API.
#[derive(Debug, Deserialize)]
struct WireErrorResponse {
    error: WireApiError,
}

fn to_wire_message(msg: &ChatMessage) -> WireMessage<'_> {
    let content = if msg.images.is_empty() {
        WireContent::Text(&msg.content)
    } else {
        let mut parts: Vec<WireContentPart<'_>> = msg
            .images
            .iter()
            .map(|image| WireContentPart::ImageUrl {
                image_url: WireImageUrl {
                    url: image.to_data_url(),
                },
            })
            .collect();
        parts.push(WireContentPart::Text { text: &msg.content });
        WireContent::Parts(parts)
    };

    WireMessage {
        role: msg.role,
        content,
    }
}

fn to_wire_request<'a>(model: &'a str, request: &'a ChatRequest) -> WireRequest<'a> {
    WireRequest {
        model,
        messages: request.messages.iter().map(to_wire_message).collect(),
        max_tokens: request.max_tokens,
        temperature: request.temperature,
        response_format: request
            .response_schema
            .as_ref()
            .map(|schema| WireResponseFormat {
                format_type: "json_schema",
                json_schema: WireJsonSchema {
                    name: &schema.name,
                    strict: true,
                    schema: &schema.schema,
                },
            }),
    }
}

fn parse_wire_response(body: &str) -> Result<ChatResponse, AiError> {
    let response: WireResponse = serde_json::from_str(body)
        .map_err(|e| AiError::ParseError(format!("Invalid completion response: {}", e)))?;

    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| AiError::ParseError("Completion response had no choices".to_string()))?;

    let usage = response
        .usage
        .map(|u| Usage {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
            total_tokens: u.total_tokens,
        })
        .unwrap_or_default();

    Ok(ChatResponse {
        content: choice.message.content.unwrap_or_default(),
        usage,
    })
}
