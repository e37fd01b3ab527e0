use thiserror::Error;

/// Why the camera could not be used. `Display` is the message shown to the user.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CaptureError {
    #[error("Camera access was denied. Please check your camera permissions and try again.")]
    PermissionDenied,

    #[error("No camera was found on this device.")]
    NoDevice,

    #[error("The camera is already in use by another application.")]
    DeviceBusy,

    #[error("No available camera supports the requested settings.")]
    ConstraintsUnsatisfiable,

    #[error("Camera access is not supported in this environment.")]
    Unsupported,

    #[error("The camera feed could not be read: {0}")]
    Unreadable(String),

    #[error("Failed to encode the captured photo: {0}")]
    Encode(String),

    #[error("Capture is unavailable until the camera is working.")]
    Disabled,
}
