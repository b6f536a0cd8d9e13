// SPDX-License-Identifier: GPL-3.0-only

//! Error types for the tracking viewer

use crate::tracking::ReturnCode;
use std::fmt;

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Main application error type
#[derive(Debug, Clone)]
pub enum AppError {
    /// Camera session errors
    Tracking(TrackingError),
    /// Configuration errors
    Config(ConfigError),
    /// Rendering or snapshot errors
    Render(String),
    /// Terminal or filesystem I/O errors
    Io(String),
    /// Generic error with message
    Other(String),
}

/// Camera session errors
///
/// Every variant that carries a [`ReturnCode`] stems from an SDK call that did
/// not return the success sentinel.
#[derive(Debug, Clone, PartialEq)]
pub enum TrackingError {
    /// Opening the camera failed
    OpenFailed(ReturnCode),
    /// Enabling positional tracking failed
    TrackingFailed(ReturnCode),
    /// A grab call did not succeed
    GrabFailed(ReturnCode),
    /// The session was used after it was closed
    Closed,
    /// Source specific failure (bad replay file, ...)
    Source(String),
}

/// Configuration errors
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A world-frame dimension is zero, negative or not finite
    InvalidDimension { name: &'static str, value: f64 },
    /// Grid line spacing in pixels must be at least one
    InvalidGridPixels,
    /// Polling interval must be non-zero
    InvalidInterval,
    /// The config file could not be parsed
    Parse(String),
    /// The config file could not be read or written
    Io(String),
    /// The canvas would exceed the largest supported side
    CanvasTooLarge { width: u64, height: u64 },
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Tracking(e) => write!(f, "Tracking error: {}", e),
            AppError::Config(e) => write!(f, "Configuration error: {}", e),
            AppError::Render(msg) => write!(f, "Render error: {}", msg),
            AppError::Io(msg) => write!(f, "I/O error: {}", msg),
            AppError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl fmt::Display for TrackingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackingError::OpenFailed(code) => write!(f, "Camera open failed: {}", code),
            TrackingError::TrackingFailed(code) => {
                write!(f, "Enabling positional tracking failed: {}", code)
            }
            TrackingError::GrabFailed(code) => write!(f, "Grab failed: {}", code),
            TrackingError::Closed => write!(f, "Camera session is closed"),
            TrackingError::Source(msg) => write!(f, "Pose source error: {}", msg),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidDimension { name, value } => {
                write!(f, "{} must be a positive number of meters, got {}", name, value)
            }
            ConfigError::InvalidGridPixels => write!(f, "Pixels per grid line must be at least 1"),
            ConfigError::InvalidInterval => write!(f, "Polling interval must be non-zero"),
            ConfigError::Parse(msg) => write!(f, "Failed to parse config: {}", msg),
            ConfigError::Io(msg) => write!(f, "Config I/O failed: {}", msg),
            ConfigError::CanvasTooLarge { width, height } => write!(
                f,
                "World frame too large: canvas would be {}x{} px",
                width, height
            ),
        }
    }
}

impl std::error::Error for AppError {}
impl std::error::Error for TrackingError {}
impl std::error::Error for ConfigError {}

impl From<TrackingError> for AppError {
    fn from(err: TrackingError) -> Self {
        AppError::Tracking(err)
    }
}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        AppError::Config(err)
    }
}

impl From<image::ImageError> for AppError {
    fn from(err: image::ImageError) -> Self {
        AppError::Render(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Io(err.to_string())
    }
}

impl From<ctrlc::Error> for AppError {
    fn from(err: ctrlc::Error) -> Self {
        AppError::Other(format!("Failed to install Ctrl+C handler: {}", err))
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}
