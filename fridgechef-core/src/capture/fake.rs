//! Scriptable in-memory camera for tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use image::{DynamicImage, Rgb, RgbImage};

use super::{Camera, CaptureError, FacingMode, VideoStream};

#[derive(Debug, Default)]
struct FakeCameraState {
    open_requests: Mutex<Vec<FacingMode>>,
    live_streams: AtomicUsize,
    streams_opened: AtomicUsize,
}

/// A fake camera producing a synthetic gradient frame.
///
/// Tracks open requests and live streams through a [`FakeCameraHandle`] so
/// tests can check that hardware is released.
#[derive(Debug)]
pub struct FakeCamera {
    width: u32,
    height: u32,
    facing: FacingMode,
    supported: bool,
    failure: Option<CaptureError>,
    /// Remaining failing opens; `None` means fail forever.
    failures_left: Option<usize>,
    state: Arc<FakeCameraState>,
}

/// Observer for a [`FakeCamera`] that outlives the provider owning it.
#[derive(Debug, Clone)]
pub struct FakeCameraHandle {
    state: Arc<FakeCameraState>,
}

impl FakeCamera {
    /// A rear-facing camera with the given native resolution.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            facing: FacingMode::Environment,
            supported: true,
            failure: None,
            failures_left: None,
            state: Arc::new(FakeCameraState::default()),
        }
    }

    pub fn facing(mut self, facing: FacingMode) -> Self {
        self.facing = facing;
        self
    }

    /// Every open fails with `error`.
    pub fn failing(mut self, error: CaptureError) -> Self {
        self.failure = Some(error);
        self.failures_left = None;
        self
    }

    /// The next `times` opens fail with `error`, later ones succeed.
    pub fn failing_times(mut self, error: CaptureError, times: usize) -> Self {
        self.failure = Some(error);
        self.failures_left = Some(times);
        self
    }

    /// Behave like an environment with no camera API.
    pub fn unsupported(mut self) -> Self {
        self.supported = false;
        self
    }

    pub fn handle(&self) -> FakeCameraHandle {
        FakeCameraHandle {
            state: Arc::clone(&self.state),
        }
    }

    fn next_failure(&mut self) -> Option<CaptureError> {
        let error = self.failure.clone()?;
        match self.failures_left {
            None => Some(error),
            Some(0) => None,
            Some(n) => {
                self.failures_left = Some(n - 1);
                Some(error)
            }
        }
    }
}

impl Camera for FakeCamera {
    fn is_supported(&self) -> bool {
        self.supported
    }

    fn open(&mut self, facing: FacingMode) -> Result<Box<dyn VideoStream>, CaptureError> {
        self.state
            .open_requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(facing);

        if let Some(error) = self.next_failure() {
            return Err(error);
        }
        if !self.facing.satisfies(facing) {
            return Err(CaptureError::ConstraintsUnsatisfiable);
        }

        self.state.live_streams.fetch_add(1, Ordering::SeqCst);
        self.state.streams_opened.fetch_add(1, Ordering::SeqCst);

        Ok(Box::new(FakeStream {
            width: self.width,
            height: self.height,
            stopped: false,
            state: Arc::clone(&self.state),
        }))
    }
}

impl FakeCameraHandle {
    /// Facing modes requested, in order.
    pub fn open_requests(&self) -> Vec<FacingMode> {
        self.state
            .open_requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Streams opened and not yet stopped.
    pub fn live_streams(&self) -> usize {
        self.state.live_streams.load(Ordering::SeqCst)
    }

    /// Streams opened in total.
    pub fn streams_opened(&self) -> usize {
        self.state.streams_opened.load(Ordering::SeqCst)
    }
}

struct FakeStream {
    width: u32,
    height: u32,
    stopped: bool,
    state: Arc<FakeCameraState>,
}

impl VideoStream for FakeStream {
    fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn current_frame(&mut self) -> Result<DynamicImage, CaptureError> {
        let frame = RgbImage::from_fn(self.width, self.height, |x, y| {
            Rgb([(x % 256) as u8, (y % 256) as u8, 128])
        });
        Ok(DynamicImage::ImageRgb8(frame))
    }

    fn stop(&mut self) {
        if !self.stopped {
            self.stopped = true;
            self.state.live_streams.fetch_sub(1, Ordering::SeqCst);
        }
    }
}

impl Drop for FakeStream {
    fn drop(&mut self) {
        self.stop();
    }
}
