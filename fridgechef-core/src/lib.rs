//! Fridge photo to recipe suggestions.
//!
//! A photo of a fridge or pantry is sent to a hosted multimodal model to
//! identify edible items; the same model then proposes quick recipes using
//! them. [`Orchestrator`] sequences the steps over a single [`Session`].

pub mod ai;
pub mod capture;
pub mod error;
pub mod orchestrator;
pub mod session;
pub mod types;

pub use error::SessionError;
pub use orchestrator::{
    Orchestrator, FINDING_RECIPES_STATUS, IDENTIFYING_STATUS, NO_INGREDIENTS_MESSAGE,
    NO_RECIPES_MESSAGE,
};
pub use session::{AppState, Progress, Session, SessionView};
pub use types::{CapturedImage, Recipe};
