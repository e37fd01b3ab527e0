//! Recipe suggestions for a list of identified ingredients.

use crate::ai::decode::decode_list_field;
use crate::ai::prompts::recipes::{recipes_schema, render_recipes_prompt, RECIPES_PROMPT_NAME};
use crate::ai::{AiClient, AiError, ChatMessage, ChatRequest, ResponseSchema, Usage};
use crate::types::Recipe;

/// Result of recipe generation.
#[derive(Debug, Clone)]
pub struct RecipesResult {
    /// Recipes in the order the endpoint returned them. Usually three, but
    /// any count is accepted; empty means nothing usable came back.
    pub recipes: Vec<Recipe>,
    pub usage: Usage,
}

/// Ask the endpoint for quick recipes using `ingredients`.
///
/// `ingredients` must not be empty.
pub async fn generate_recipes(
    ai_client: &dyn AiClient,
    ingredients: &[String],
) -> Result<RecipesResult, AiError> {
    if ingredients.is_empty() {
        return Err(AiError::InvalidRequest(
            "no ingredients to generate recipes from".to_string(),
        ));
    }

    tracing::info!(ingredients = %ingredients.join(", "), "Requesting recipes");

    let request = ChatRequest {
        messages: vec![ChatMessage::user(render_recipes_prompt(ingredients))],
        max_tokens: Some(4096),
        temperature: Some(0.7),
        response_schema: Some(ResponseSchema {
            name: "recipe_suggestions".to_string(),
            schema: recipes_schema(),
        }),
    };

    let response = ai_client.complete(RECIPES_PROMPT_NAME, request).await?;
    tracing::debug!(content = %response.content, "Raw recipes response");

    let recipes: Vec<Recipe> = decode_list_field(&response.content, "recipes")?;

    if recipes.is_empty() {
        tracing::warn!("Recipe response contained no recipes");
    } else {
        let titles: Vec<&str> = recipes.iter().map(|r| r.title.as_str()).collect();
        tracing::debug!(titles = ?titles, "Parsed recipes");
    }

    Ok(RecipesResult {
        recipes,
        usage: response.usage,
    })
}
