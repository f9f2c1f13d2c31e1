//! Error types for brickcam.

use thiserror::Error;

/// The main error type for brickcam operations.
#[derive(Error, Debug)]
pub enum CaptureError {
    /// The bounding box is empty or carries non-finite coordinates.
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    /// A numeric parameter is outside its accepted range.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// The camera sits exactly on its look-at target.
    #[error("degenerate orientation: camera position coincides with look-at target")]
    DegenerateOrientation,

    /// An injected collaborator (renderer, physics engine) failed.
    #[error("collaborator error: {0}")]
    Collaborator(String),

    /// Failed to encode or write an image.
    #[error("image error: {0}")]
    Image(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl CaptureError {
    pub(crate) fn invalid_parameter(message: impl Into<String>) -> Self {
        Self::InvalidParameter(message.into())
    }

    pub(crate) fn invalid_geometry(message: impl Into<String>) -> Self {
        Self::InvalidGeometry(message.into())
    }
}

/// A specialized Result type for brickcam operations.
pub type Result<T> = std::result::Result<T, CaptureError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CaptureError::invalid_parameter("fov must be in (0, pi)");
        assert_eq!(err.to_string(), "invalid parameter: fov must be in (0, pi)");

        let err = CaptureError::DegenerateOrientation;
        assert!(err.to_string().starts_with("degenerate orientation"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: CaptureError = io.into();
        assert!(matches!(err, CaptureError::IoError(_)));
    }
}
