//! Error types for the compositor binding

use liquid_field::FieldError;
use thiserror::Error;

use crate::filter::FilterId;

/// Errors raised while preparing or publishing a displacement map
#[derive(Error, Debug)]
pub enum CompositorError {
    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Invalid data URI: {0}")]
    InvalidDataUri(String),

    #[error(transparent)]
    Field(#[from] FieldError),

    #[error("Cannot encode an empty bitmap ({width}x{height})")]
    EmptyBitmap { width: u32, height: u32 },

    #[error("Rendering surface unavailable")]
    Unavailable,

    #[error("Unknown filter: {0}")]
    UnknownFilter(FilterId),
}

/// Result type for compositor operations
pub type Result<T> = std::result::Result<T, CompositorError>;
