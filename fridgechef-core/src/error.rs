use thiserror::Error;

use crate::capture::CaptureError;
use crate::session::AppState;

/// Errors from driving the orchestrator.
///
/// Pipeline failures (empty results, endpoint errors) are not errors here:
/// they move the session into `AppState::Error` instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("Cannot {action} while in the {state} state")]
    InvalidTransition {
        state: AppState,
        action: &'static str,
    },

    #[error(transparent)]
    Capture(#[from] CaptureError),
}
