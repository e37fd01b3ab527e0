//! Image capture: acquire a camera, grab one still, release the camera.
//!
//! Failures here are local to the capture screen. They are recorded on the
//! [`CaptureProvider`] and never move the session out of `Capturing`.

mod camera;
mod error;
mod fake;
mod provider;
mod still;

pub use camera::{Camera, FacingMode, VideoStream};
pub use error::CaptureError;
pub use fake::{FakeCamera, FakeCameraHandle};
pub use provider::{CaptureProvider, CaptureStatus, JPEG_MIME_TYPE, JPEG_QUALITY};
pub use still::{StillImageCamera, MAX_FRAME_FILE_SIZE};
