//! Prompt for suggesting quick recipes from a list of ingredients.

use serde_json::{json, Value as JsonValue};

/// Prompt name used for logging and fake lookups.
pub const RECIPES_PROMPT_NAME: &str = "generate_recipes";

/// Number of recipes requested. The reply may contain a different number.
pub const RECIPE_COUNT: usize = 3;

/// Upper bound on preparation time asked of the model, in minutes.
pub const MAX_COOKING_MINUTES: u32 = 45;

/// Render the recipe prompt with the given ingredients.
pub fn render_recipes_prompt(ingredients: &[String]) -> String {
    let ingredient_list = ingredients.join(", ");

    format!(
        r#"You are a recipe assistant for busy professionals. Given these ingredients: {ingredient_list}, suggest {count} quick and easy recipes that take less than {minutes} minutes to prepare. Respond ONLY with a JSON object in the format: {{"recipes": [{{"title": "...", "description": "...", "cookingTime": ..., "ingredients": ["...", ...], "instructions": ["...", ...]}}]}}. Do not include any other text or explanations."#,
        ingredient_list = ingredient_list,
        count = RECIPE_COUNT,
        minutes = MAX_COOKING_MINUTES,
    )
}

pub fn recipes_schema() -> JsonValue {
    let string_array = json!({
        "type": "array",
        "items": { "type": "string" }
    });

    json!({
        "type": "object",
        "properties": {
            "recipes": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "title": { "type": "string" },
                        "description": { "type": "string" },
                        "cookingTime": {
                            "type": "integer",
                            "description": "Total time in minutes."
                        },
                        "ingredients": string_array.clone(),
                        "instructions": string_array
                    },
                    "required": ["title", "description", "cookingTime", "ingredients", "instructions"],
                    "additionalProperties": false
                }
            }
        },
        "required": ["recipes"],
        "additionalProperties": false
    })
}
