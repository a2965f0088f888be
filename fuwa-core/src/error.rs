//! Error type for microphone acquisition
//!
//! A failed start is terminal for that attempt: the error is surfaced to the
//! user and the only recovery path is a user-initiated restart.

#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    /// The host refused access to the capture device.
    #[error("microphone permission denied: {0}")]
    PermissionDenied(String),

    /// No usable input device is present.
    #[error("no usable input device")]
    DeviceUnavailable,

    /// Any other backend failure while wiring the capture stream.
    #[error("audio backend error: {0}")]
    Backend(String),
}
