//! The capture component: owns the camera stream while the capture screen is
//! active and turns the live feed into a single JPEG still.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;

use super::{Camera, CaptureError, FacingMode, VideoStream};
use crate::types::CapturedImage;

/// JPEG quality for captured stills.
pub const JPEG_QUALITY: u8 = 90;

pub const JPEG_MIME_TYPE: &str = "image/jpeg";

/// What the capture screen should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureStatus<'a> {
    /// Not activated, or deactivated.
    Inactive,
    /// A stream is live and capture is enabled.
    Ready,
    /// Camera could not be acquired; capture is disabled.
    Failed(&'a CaptureError),
}

/// Holds at most one camera stream, released on every exit path.
pub struct CaptureProvider<C: Camera> {
    camera: C,
    stream: Option<Box<dyn VideoStream>>,
    error: Option<CaptureError>,
}

impl<C: Camera> CaptureProvider<C> {
    pub fn new(camera: C) -> Self {
        Self {
            camera,
            stream: None,
            error: None,
        }
    }

    /// Acquire the camera, preferring a rear-facing one.
    ///
    /// Any previously held stream is released first. Failure is recorded on
    /// the provider (see [`CaptureProvider::error`]) and also returned.
    pub fn activate(&mut self) -> Result<(), CaptureError> {
        self.deactivate();
        self.error = None;

        match self.acquire() {
            Ok(stream) => {
                let (width, height) = stream.resolution();
                tracing::info!(width, height, "Camera stream started");
                self.stream = Some(stream);
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, "Could not access camera");
                self.error = Some(e.clone());
                Err(e)
            }
        }
    }

    fn acquire(&mut self) -> Result<Box<dyn VideoStream>, CaptureError> {
        if !self.camera.is_supported() {
            return Err(CaptureError::Unsupported);
        }

        match self.camera.open(FacingMode::Environment) {
            Ok(stream) => Ok(stream),
            Err(e) => {
                tracing::warn!(error = %e, "Rear camera unavailable, falling back to any camera");
                self.camera.open(FacingMode::Any)
            }
        }
    }

    /// Grab the current frame as a JPEG at the stream's native resolution.
    pub fn capture(&mut self) -> Result<CapturedImage, CaptureError> {
        if self.error.is_some() {
            return Err(CaptureError::Disabled);
        }
        let stream = self.stream.as_mut().ok_or(CaptureError::Disabled)?;

        let frame = stream.current_frame()?.to_rgb8();
        let (width, height) = frame.dimensions();

        let mut buf = Cursor::new(Vec::new());
        JpegEncoder::new_with_quality(&mut buf, JPEG_QUALITY)
            .encode_image(&frame)
            .map_err(|e| CaptureError::Encode(e.to_string()))?;

        let data = buf.into_inner();
        tracing::debug!(width, height, bytes = data.len(), "Captured still frame");

        Ok(CapturedImage {
            data,
            mime_type: JPEG_MIME_TYPE.to_string(),
            width,
            height,
        })
    }

    /// Stop the stream, if any. Safe to call repeatedly.
    pub fn deactivate(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            stream.stop();
            tracing::debug!("Camera stream released");
        }
    }

    pub fn status(&self) -> CaptureStatus<'_> {
        match (&self.error, &self.stream) {
            (Some(e), _) => CaptureStatus::Failed(e),
            (None, Some(_)) => CaptureStatus::Ready,
            (None, None) => CaptureStatus::Inactive,
        }
    }

    /// The failure to show inline on the capture screen, if any.
    pub fn error(&self) -> Option<&CaptureError> {
        self.error.as_ref()
    }

    pub fn can_capture(&self) -> bool {
        matches!(self.status(), CaptureStatus::Ready)
    }

    pub fn is_active(&self) -> bool {
        self.stream.is_some()
    }
}

impl<C: Camera> Drop for CaptureProvider<C> {
    fn drop(&mut self) {
        self.deactivate();
    }
}
