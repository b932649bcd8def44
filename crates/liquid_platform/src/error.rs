//! Platform error types

use thiserror::Error;

/// Errors raised while interpreting host events
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlatformError {
    /// Viewport dimensions are negative or not finite
    #[error("Invalid viewport size: {width}x{height}")]
    InvalidViewport { width: f32, height: f32 },

    /// Device pixel ratio is zero, negative or not finite
    #[error("Invalid scale factor: {0}")]
    InvalidScaleFactor(f64),
}

/// Result type for platform operations
pub type Result<T> = std::result::Result<T, PlatformError>;
