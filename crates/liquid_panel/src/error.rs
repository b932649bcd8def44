//! Panel error types

use liquid_compositor::CompositorError;
use liquid_core::CoreError;
use liquid_field::FieldError;
use liquid_platform::PlatformError;
use thiserror::Error;

/// Panel-related errors
#[derive(Error, Debug)]
pub enum PanelError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Field(#[from] FieldError),

    #[error(transparent)]
    Compositor(#[from] CompositorError),

    #[error(transparent)]
    Platform(#[from] PlatformError),

    /// A construction parameter is out of range
    #[error("Invalid panel config: {name} = {value}")]
    InvalidConfig { name: &'static str, value: f64 },
}

/// Result type for panel operations
pub type Result<T> = std::result::Result<T, PanelError>;
