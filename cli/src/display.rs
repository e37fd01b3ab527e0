//! Terminal rendering of session outcomes.

use anyhow::Result;
use fridgechef_core::ai::AiConfig;
use fridgechef_core::{Recipe, Session, SessionView};
use serde::Serialize;

/// Loading status, written to stderr.
pub fn print_status(status: &str) {
    eprintln!("{}", status);
}

pub fn print_ingredients(ingredients: &[String]) {
    println!("Ingredients found:");
    for ingredient in ingredients {
        println!("  - {}", ingredient);
    }
}

pub fn print_recipes(recipes: &[Recipe]) {
    for (i, recipe) in recipes.iter().enumerate() {
        println!();
        println!("{}. {} ({} min)", i + 1, recipe.title, recipe.cooking_time);
        if !recipe.description.is_empty() {
            println!("   {}", recipe.description);
        }

        println!("   Ingredients:");
        for ingredient in &recipe.ingredients {
            println!("     - {}", ingredient);
        }

        println!("   Steps:");
        for (n, step) in recipe.instructions.iter().enumerate() {
            println!("     {}. {}", n + 1, step);
        }
    }
}

pub fn print_session(session: &Session) {
    match session.view() {
        SessionView::Results {
            ingredients,
            recipes,
        } => {
            print_ingredients(ingredients);
            print_recipes(recipes);
        }
        SessionView::Error { message } => eprintln!("Error: {}", message),
        SessionView::Loading { status } => eprintln!("{}", status),
        SessionView::Welcome | SessionView::Capturing => {}
    }
}

#[derive(Serialize)]
struct SessionJson<'a> {
    session_id: String,
    state: &'static str,
    ingredients: &'a [String],
    recipes: &'a [Recipe],
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
}

pub fn print_session_json(session: &Session) -> Result<()> {
    let json = SessionJson {
        session_id: session.id().to_string(),
        state: session.state().as_str(),
        ingredients: session.ingredients(),
        recipes: session.recipes(),
        error: session.error(),
    };
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}

pub fn print_config(config: &AiConfig) {
    println!("model:    {}", config.model);
    println!("base_url: {}", config.base_url);
    println!("timeout:  {}s", config.timeout.as_secs());
    println!("api_key:  set");
}
