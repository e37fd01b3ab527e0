//! Ingredient identification from a single photo using vision AI.

use crate::ai::decode::decode_list_field;
use crate::ai::prompts::identify::{identify_schema, render_identify_prompt, IDENTIFY_PROMPT_NAME};
use crate::ai::{AiClient, AiError, ChatMessage, ChatRequest, ImageData, ResponseSchema, Usage};

/// Result of ingredient identification.
#[derive(Debug, Clone)]
pub struct IdentifyResult {
    /// Item names in the order the endpoint returned them. Empty means nothing
    /// usable was found.
    pub ingredients: Vec<String>,
    pub usage: Usage,
}

/// Ask the endpoint which edible items appear in `image`.
///
/// One request, no retry. Names are returned as-is: no trimming, dedup or
/// sorting.
pub async fn identify_ingredients(
    ai_client: &dyn AiClient,
    image: ImageData,
) -> Result<IdentifyResult, AiError> {
    if image.is_empty() {
        return Err(AiError::InvalidRequest("image is empty".to_string()));
    }

    let request = ChatRequest {
        messages: vec![ChatMessage::user_with_images(
            render_identify_prompt(),
            vec![image],
        )],
        max_tokens: Some(1024),
        temperature: Some(0.1),
        response_schema: Some(ResponseSchema {
            name: "identified_ingredients".to_string(),
            schema: identify_schema(),
        }),
    };

    let response = ai_client.complete(IDENTIFY_PROMPT_NAME, request).await?;
    tracing::debug!(content = %response.content, "Raw ingredients response");

    let ingredients: Vec<String> = decode_list_field(&response.content, "ingredients")?;

    if ingredients.is_empty() {
        tracing::warn!("Ingredient response contained no items");
    }

    Ok(IdentifyResult {
        ingredients,
        usage: response.usage,
    })
}
