//! AI client module for the remote inference endpoint.
//!
//! This module provides:
//! - `AiClient` trait for abstracting AI providers
//! - `HttpAiClient` for OpenAI-compatible chat completion endpoints (OpenRouter by default)
//! - `FakeAiClient` for tests
//! - Configuration via environment variables
//! - Prompt templates with strict output schemas
//! - `identify_ingredients` and `generate_recipes`, the two calls the app makes
//!
//! # Configuration
//!
//! Set these environment variables:
//!
//! - `OPENROUTER_API_KEY` (required): Your OpenRouter API key
//! - `FRIDGECHEF_AI_MODEL` (optional): Model name, e.g., "google/gemini-2.5-flash"
//! - `FRIDGECHEF_AI_BASE_URL` (optional): API base URL
//! - `FRIDGECHEF_AI_TIMEOUT_SECS` (optional): Per-request timeout in seconds
//!
//! # Example
//!
//! ```ignore
//! use fridgechef_core::ai::{identify_ingredients, HttpAiClient, ImageData};
//!
//! let client = HttpAiClient::from_env()?;
//! let image = ImageData::from_bytes(&jpeg_bytes, "image/jpeg");
//!
//! let result = identify_ingredients(&client, image).await?;
//! println!("Found: {:?}", result.ingredients);
//! ```

mod client;
mod config;
mod decode;
mod fake;
mod identify;
pub mod prompts;
mod recipes;
mod types;

pub use client::{AiClient, AiError, HttpAiClient};
pub use config::{AiConfig, ConfigError};
pub use fake::{FakeAiClient, FakeReply};
pub use identify::{identify_ingredients, IdentifyResult};
pub use recipes::{generate_recipes, RecipesResult};
pub use types::{
    ChatMessage, ChatRequest, ChatResponse, ImageData, ResponseSchema, Role, Usage,
};
