//! Camera capability: acquire a stream, read frames, release.

use image::DynamicImage;

use super::CaptureError;

/// Which way the requested camera should face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FacingMode {
    /// Rear-facing, pointed away from the user.
    Environment,
    /// Front-facing.
    User,
    /// Whatever camera is available.
    #[default]
    Any,
}

impl FacingMode {
    /// True if a camera facing `self` satisfies a request for `requested`.
    pub fn satisfies(self, requested: FacingMode) -> bool {
        requested == FacingMode::Any || self == requested
    }
}

/// A source of video streams.
pub trait Camera: Send {
    /// False if this environment has no camera API at all.
    fn is_supported(&self) -> bool {
        true
    }

    /// Acquire a live stream from a camera facing `facing`.
    fn open(&mut self, facing: FacingMode) -> Result<Box<dyn VideoStream>, CaptureError>;
}

/// A live video stream holding camera hardware until stopped.
pub trait VideoStream: Send {
    /// Native frame size as (width, height).
    fn resolution(&self) -> (u32, u32);

    /// The most recent frame at native resolution.
    fn current_frame(&mut self) -> Result<DynamicImage, CaptureError>;

    /// Release the hardware. Must be idempotent.
    fn stop(&mut self);
}
