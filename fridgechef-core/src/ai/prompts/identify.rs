//! Prompt for identifying edible items in a fridge or pantry photo.

use serde_json::{json, Value as JsonValue};

/// Prompt name used for logging and fake lookups.
pub const IDENTIFY_PROMPT_NAME: &str = "identify_ingredients";

pub fn render_identify_prompt() -> String {
    r#"Identify all edible food items in this image. Respond ONLY with a JSON object in the format: {"ingredients": ["item1", "item2", ...]}. Do not include any other text or explanations."#
        .to_string()
}

/// Strict schema: an object with a required array of strings.
pub fn identify_schema() -> JsonValue {
    json!({
        "type": "object",
        "properties": {
            "ingredients": {
                "type": "array",
                "items": {
                    "type": "string",
                    "description": "The name of an edible food item."
                }
            }
        },
        "required": ["ingredients"],
        "additionalProperties": false
    })
}
