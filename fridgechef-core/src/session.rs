//! Per-interaction session state.

use serde::Serialize;
use uuid::Uuid;

use crate::types::Recipe;

/// Which screen the app is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AppState {
    Welcome,
    Capturing,
    Loading,
    Results,
    Error,
}

impl AppState {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppState::Welcome => "welcome",
            AppState::Capturing => "capturing",
            AppState::Loading => "loading",
            AppState::Results => "results",
            AppState::Error => "error",
        }
    }
}

impl std::fmt::Display for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The session data that is meaningful in the current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionView<'a> {
    Welcome,
    Capturing,
    Loading {
        status: &'a str,
    },
    Results {
        ingredients: &'a [String],
        recipes: &'a [Recipe],
    },
    Error {
        message: &'a str,
    },
}

/// Owned snapshot of a session's position in the flow, published to
/// observers while a run is in flight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub session_id: Uuid,
    pub state: AppState,
    /// Loading status ("Identifying Ingredients..." etc.), if any.
    pub status: Option<String>,
}

/// Mutable client state for one capture → identify → generate → display cycle.
///
/// Only the orchestrator mutates a session; everything else reads it.
#[derive(Debug, Clone)]
pub struct Session {
    id: Uuid,
    state: AppState,
    ingredients: Vec<String>,
    recipes: Vec<Recipe>,
    error: Option<String>,
    status_message: Option<String>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            state: AppState::Welcome,
            ingredients: Vec::new(),
            recipes: Vec::new(),
            error: None,
            status_message: None,
        }
    }

    /// Identifier for log correlation. Changes on every reset.
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> AppState {
        self.state
    }

    pub fn ingredients(&self) -> &[String] {
        &self.ingredients
    }

    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    pub fn progress(&self) -> Progress {
        Progress {
            session_id: self.id,
            state: self.state,
            status: self.status_message.clone(),
        }
    }

    pub fn view(&self) -> SessionView<'_> {
        match self.state {
            AppState::Welcome => SessionView::Welcome,
            AppState::Capturing => SessionView::Capturing,
            AppState::Loading => SessionView::Loading {
                status: self.status_message.as_deref().unwrap_or_default(),
            },
            AppState::Results => SessionView::Results {
                ingredients: &self.ingredients,
                recipes: &self.recipes,
            },
            AppState::Error => SessionView::Error {
                message: self
                    .error
                    .as_deref()
                    .unwrap_or("An unknown error occurred."),
            },
        }
    }

    pub(crate) fn enter_capturing(&mut self) {
        self.state = AppState::Capturing;
        self.error = None;
        self.status_message = None;
    }

    pub(crate) fn enter_loading(&mut self, status: &str) {
        self.state = AppState::Loading;
        self.ingredients.clear();
        self.recipes.clear();
        self.status_message = Some(status.to_string());
    }

    pub(crate) fn set_status(&mut self, status: &str) {
        self.status_message = Some(status.to_string());
    }

    pub(crate) fn store_ingredients(&mut self, ingredients: Vec<String>) {
        self.ingredients = ingredients;
    }

    pub(crate) fn enter_results(&mut self, recipes: Vec<Recipe>) {
        self.state = AppState::Results;
        self.recipes = recipes;
        self.status_message = None;
    }

    /// Enter `Error`. Partial results from this run are dropped so that
    /// ingredients and recipes only ever appear together.
    pub(crate) fn enter_error(&mut self, message: String) {
        self.state = AppState::Error;
        self.ingredients.clear();
        self.recipes.clear();
        self.status_message = None;
        self.error = Some(message);
    }

    /// Back to a fresh `Welcome` session with a new id.
    pub(crate) fn reset(&mut self) {
        *self = Self::new();
    }
}
