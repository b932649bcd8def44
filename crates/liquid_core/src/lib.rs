//! Liquid Glass Core
//!
//! Numeric building blocks for the liquid glass effect:
//!
//! - **Geometry**: viewport points and rects, normalized panel coordinates
//! - **SDF**: rounded-rectangle distance field and smoothing curves
//! - **Fragments**: per-pixel programs mapping a surface coordinate and the
//!   pointer to a backdrop sample coordinate
//! - **Clocks**: injectable time for animated fragments
//!
//! Nothing here touches a rendering surface. The displacement field built on
//! top of these lives in `liquid_field`.
//!
//! # Example
//!
//! ```rust
//! use liquid_core::prelude::*;
//!
//! let ripple = HeaderRipple::new(0.3).unwrap();
//! let env = FragmentEnv::at_time(1.25).hovered(true);
//! let sample = ripple.sample(Uv::new(0.2, 0.4), Uv::new(0.8, 0.5), &env);
//! assert!(sample.is_finite());
//! ```

pub mod clock;
pub mod error;
pub mod fragment;
pub mod geometry;
pub mod sdf;

pub use clock::{Clock, ManualClock, SharedClock, SystemClock};
pub use error::{CoreError, Result};
pub use fragment::{
    fragment_fn, FnFragment, Fragment, FragmentEnv, FragmentPreset, GlassBulge, HeaderRipple,
    Identity, PointerInfluence, PointerWave, PressBulge, SharedFragment,
};
pub use geometry::{PanelGeometry, PanelPosition, Point, Rect, SampleResult, Size, Uv};
pub use sdf::{rounded_rect_sdf, smooth_step, try_smooth_step, vector_length};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::clock::{Clock, ManualClock, SystemClock};
    pub use crate::fragment::{
        fragment_fn, Fragment, FragmentEnv, GlassBulge, HeaderRipple, Identity, PressBulge,
    };
    pub use crate::geometry::{PanelGeometry, Point, Rect, Size, Uv};
}
