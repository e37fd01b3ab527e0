//! Session orchestrator: sequences capture, identification and recipe
//! generation, and maps every outcome to one of the five app states.
//!
//! ```text
//! Welcome --start--> Capturing --image--> Loading --+--> Results
//!    ^                  ^  |                        |
//!    |                  |  +--cancel--> Welcome     +--> Error
//!    +------reset-------+---------retry--------------------+
//! ```
//!
//! The pipeline is strictly sequential: recipe generation never starts
//! before identification has produced a non-empty list. Dropping the
//! future returned by [`Orchestrator::process_image`] abandons the run and
//! aborts the in-flight request; call [`Orchestrator::reset`] afterwards.
//!
//! While `process_image` holds the orchestrator, every transition and status
//! change is published as a [`Progress`] snapshot on a `watch` channel; see
//! [`Orchestrator::subscribe`].

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{info_span, Instrument};

use crate::ai::{generate_recipes, identify_ingredients, AiClient};
use crate::capture::{Camera, CaptureProvider};
use crate::error::SessionError;
use crate::session::{AppState, Progress, Session};
use crate::types::CapturedImage;

pub const IDENTIFYING_STATUS: &str = "Identifying Ingredients...";
pub const FINDING_RECIPES_STATUS: &str = "Finding Recipes...";

pub const NO_INGREDIENTS_MESSAGE: &str =
    "We couldn't find any ingredients in your photo. Please try again with a clearer picture.";
pub const NO_RECIPES_MESSAGE: &str =
    "We couldn't generate recipes for the identified ingredients. Please try again.";

/// Drives one user's session through the capture → identify → generate flow.
pub struct Orchestrator {
    ai_client: Arc<dyn AiClient>,
    session: Session,
    progress: watch::Sender<Progress>,
}

impl Orchestrator {
    pub fn new(ai_client: Arc<dyn AiClient>) -> Self {
        let session = Session::new();
        let (progress, _) = watch::channel(session.progress());
        Self {
            ai_client,
            session,
            progress,
        }
    }

    /// Observe state and status changes, including those made during a run.
    ///
    /// The receiver starts at the current snapshot. Intermediate snapshots
    /// may be coalesced if the receiver falls behind.
    pub fn subscribe(&self) -> watch::Receiver<Progress> {
        self.progress.subscribe()
    }

    fn publish(&self) {
        self.progress.send_replace(self.session.progress());
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn state(&self) -> AppState {
        self.session.state()
    }

    /// `Welcome`/`Error` → `Capturing`. Clears any previous error.
    pub fn start(&mut self) -> Result<(), SessionError> {
        match self.session.state() {
            AppState::Welcome | AppState::Error => {
                self.session.enter_capturing();
                self.publish();
                tracing::debug!(session_id = %self.session.id(), "Capturing");
                Ok(())
            }
            state => Err(SessionError::InvalidTransition {
                state,
                action: "start capturing",
            }),
        }
    }

    /// `Error` → `Capturing`, keeping the session.
    pub fn retry(&mut self) -> Result<(), SessionError> {
        match self.session.state() {
            AppState::Error => self.start(),
            state => Err(SessionError::InvalidTransition {
                state,
                action: "retry",
            }),
        }
    }

    /// `Capturing` → `Welcome`.
    pub fn cancel_capture(&mut self) -> Result<(), SessionError> {
        match self.session.state() {
            AppState::Capturing => {
                self.reset();
                Ok(())
            }
            state => Err(SessionError::InvalidTransition {
                state,
                action: "cancel capture",
            }),
        }
    }

    /// Start over from `Welcome` with empty ingredients, recipes and error.
    ///
    /// Allowed from any state, including `Loading` after an abandoned run.
    pub fn reset(&mut self) {
        if self.session.state() == AppState::Loading {
            tracing::info!(session_id = %self.session.id(), "Abandoning in-flight run");
        }
        self.session.reset();
        self.publish();
        tracing::debug!(session_id = %self.session.id(), "Session reset");
    }

    /// Grab a still from `provider` and run the pipeline on it.
    ///
    /// A capture failure stays local: the session remains in `Capturing` and
    /// the [`CaptureError`](crate::capture::CaptureError) is returned for the
    /// capture screen to show. On success the camera is released before the
    /// pipeline starts.
    pub async fn capture_and_process<C: Camera>(
        &mut self,
        provider: &mut CaptureProvider<C>,
    ) -> Result<AppState, SessionError> {
        self.expect_capturing("capture a photo")?;

        let image = provider.capture()?;
        provider.deactivate();

        self.process_image(image).await
    }

    /// `Capturing` → `Loading` → `Results` | `Error`.
    ///
    /// Every pipeline failure is resolved into the `Error` state; `Err` is only
    /// returned when called outside `Capturing`.
    pub async fn process_image(&mut self, image: CapturedImage) -> Result<AppState, SessionError> {
        self.expect_capturing("process a photo")?;

        let span = info_span!("pipeline", session_id = %self.session.id());
        self.run_pipeline(image).instrument(span).await;
        self.publish();

        Ok(self.session.state())
    }

    fn expect_capturing(&self, action: &'static str) -> Result<(), SessionError> {
        match self.session.state() {
            AppState::Capturing => Ok(()),
            state => Err(SessionError::InvalidTransition { state, action }),
        }
    }

    async fn run_pipeline(&mut self, image: CapturedImage) {
        tracing::info!(
            width = image.width,
            height = image.height,
            bytes = image.data.len(),
            "Starting image processing"
        );
        self.session.enter_loading(IDENTIFYING_STATUS);
        self.publish();

        // The image is moved into the request and dropped once it completes.
        let identified = identify_ingredients(self.ai_client.as_ref(), image.into()).await;
        let ingredients = match identified {
            Ok(result) if result.ingredients.is_empty() => {
                tracing::warn!("No ingredients found in image");
                self.session.enter_error(NO_INGREDIENTS_MESSAGE.to_string());
                return;
            }
            Ok(result) => result.ingredients,
            Err(e) => {
                tracing::error!(error = %e, "Ingredient identification failed");
                self.session
                    .enter_error(format!("Failed to identify ingredients. {}", e));
                return;
            }
        };

        tracing::info!(count = ingredients.len(), "Identified ingredients");
        self.session.store_ingredients(ingredients);
        self.session.set_status(FINDING_RECIPES_STATUS);
        self.publish();

        let generated = generate_recipes(self.ai_client.as_ref(), self.session.ingredients()).await;
        let recipes = match generated {
            Ok(result) if result.recipes.is_empty() => {
                tracing::warn!("No recipes generated for ingredients");
                self.session.enter_error(NO_RECIPES_MESSAGE.to_string());
                return;
            }
            Ok(result) => result.recipes,
            Err(e) => {
                tracing::error!(error = %e, "Recipe generation failed");
                self.session
                    .enter_error(format!("Failed to generate recipes. {}", e));
                return;
            }
        };

        tracing::info!(count = recipes.len(), "Image processing successful");
        self.session.enter_results(recipes);
    }
}
