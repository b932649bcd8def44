//! Core error types

use thiserror::Error;

/// Errors raised while building geometry or fragment parameters
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// A geometry field is negative or not a finite number
    #[error("Invalid panel {name}: {value}")]
    InvalidGeometry { name: &'static str, value: f32 },

    /// A smoothing curve was asked to interpolate over an empty range
    #[error("Degenerate smoothing edges: edge0 == edge1 == {0}")]
    DegenerateEdges(f32),

    /// A fragment parameter is outside its usable range
    #[error("Invalid fragment parameter {name}: {value}")]
    InvalidParameter { name: &'static str, value: f32 },
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
