//! AI prompt templates and the output schemas declared alongside them.

pub mod identify;
pub mod recipes;

pub use identify::{identify_schema, render_identify_prompt, IDENTIFY_PROMPT_NAME};
pub use recipes::{recipes_schema, render_recipes_prompt, RECIPES_PROMPT_NAME};
