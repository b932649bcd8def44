//! Synthesis error types

use thiserror::Error;

/// Errors raised while configuring or running synthesis
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FieldError {
    /// A synthesis parameter is out of range
    #[error("Invalid synthesis parameter {name}: {value}")]
    InvalidConfig { name: &'static str, value: f32 },

    /// Panel geometry was rejected
    #[error(transparent)]
    Geometry(#[from] liquid_core::CoreError),

    /// The raster would exceed the supported size
    #[error("Raster {width}x{height} exceeds the {max} pixel side limit")]
    RasterTooLarge { width: u32, height: u32, max: u32 },

    /// Raw pixel data does not match the declared dimensions
    #[error("Invalid pixel data length: expected {expected}, got {actual}")]
    PixelLength { expected: usize, actual: usize },

    /// The fragment panicked mid-pass; no field was produced
    #[error("Fragment '{0}' panicked during synthesis")]
    FragmentPanicked(String),
}

/// Result type for synthesis operations
pub type Result<T> = std::result::Result<T, FieldError>;
