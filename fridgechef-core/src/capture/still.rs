//! A camera whose "live feed" is a still image on disk.
//!
//! Lets the command-line front end run the capture flow against a snapshot
//! taken by a phone or webcam tool.

use std::fs;
use std::io::{Cursor, ErrorKind};
use std::path::PathBuf;

use image::{DynamicImage, ImageReader};

use super::{Camera, CaptureError, FacingMode, VideoStream};

/// Maximum file size accepted as a camera frame (20MB).
pub const MAX_FRAME_FILE_SIZE: u64 = 20 * 1024 * 1024;

pub struct StillImageCamera {
    path: PathBuf,
    facing: FacingMode,
}

impl StillImageCamera {
    /// A camera reading `path`, with no known facing direction.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            facing: FacingMode::Any,
        }
    }

    /// Declare which way the photo was taken.
    pub fn facing(mut self, facing: FacingMode) -> Self {
        self.facing = facing;
        self
    }
}

impl Camera for StillImageCamera {
    fn open(&mut self, facing: FacingMode) -> Result<Box<dyn VideoStream>, CaptureError> {
        if facing != FacingMode::Any && self.facing != facing {
            return Err(CaptureError::ConstraintsUnsatisfiable);
        }

        let metadata = fs::metadata(&self.path).map_err(io_to_capture_error)?;
        if !metadata.is_file() {
            return Err(CaptureError::NoDevice);
        }
        if metadata.len() > MAX_FRAME_FILE_SIZE {
            return Err(CaptureError::Unreadable(format!(
                "image too large: {} bytes (max {})",
                metadata.len(),
                MAX_FRAME_FILE_SIZE
            )));
        }

        let data = fs::read(&self.path).map_err(io_to_capture_error)?;
        let frame = ImageReader::new(Cursor::new(data))
            .with_guessed_format()
            .map_err(|e| CaptureError::Unreadable(e.to_string()))?
            .decode()
            .map_err(|e| CaptureError::Unreadable(e.to_string()))?;

        tracing::debug!(path = %self.path.display(), "Opened still image as camera feed");

        Ok(Box::new(StillStream { frame: Some(frame) }))
    }
}

fn io_to_capture_error(e: std::io::Error) -> CaptureError {
    match e.kind() {
        ErrorKind::NotFound => CaptureError::NoDevice,
        ErrorKind::PermissionDenied => CaptureError::PermissionDenied,
        _ => CaptureError::Unreadable(e.to_string()),
    }
}

struct StillStream {
    frame: Option<DynamicImage>,
}

impl VideoStream for StillStream {
    fn resolution(&self) -> (u32, u32) {
        self.frame
            .as_ref()
            .map(|f| (f.width(), f.height()))
            .unwrap_or((0, 0))
    }

    fn current_frame(&mut self) -> Result<DynamicImage, CaptureError> {
        self.frame.clone().ok_or(CaptureError::Disabled)
    }

    fn stop(&mut self) {
        self.frame = None;
    }
}
