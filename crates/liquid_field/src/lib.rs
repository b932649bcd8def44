//! Liquid Glass Field
//!
//! Turns a fragment function into a displacement map a compositor can apply:
//!
//! - [`synth`]: per-pixel evaluation into a [`DisplacementField`] and the
//!   adaptive scale factor
//! - [`encode`]: RGBA8 encoding of the field ([`EncodedBitmap`])
//! - [`config`]: headroom, device pixel ratio and sampling origin
//!
//! # Example
//!
//! ```rust
//! use liquid_core::{GlassBulge, PanelGeometry};
//! use liquid_field::{render, RenderState};
//!
//! let bulge = GlassBulge::default();
//! let synthesis = render(&RenderState::new(PanelGeometry::new(120.0, 80.0, 40.0), &bulge)).unwrap();
//!
//! assert_eq!(synthesis.bitmap.dimensions(), (120, 80));
//! assert!(synthesis.scale > 0.0);
//! ```

pub mod config;
pub mod encode;
pub mod error;
pub mod field;
pub mod synth;

pub use config::{PixelOrigin, SynthesisConfig, DEFAULT_HEADROOM, MAX_RASTER_SIDE};
pub use encode::{decode_channel, encode_channel, EncodedBitmap, Rgba8, NEUTRAL_CHANNEL};
pub use error::{FieldError, Result};
pub use field::DisplacementField;
pub use synth::{render, synthesize, synthesize_field, RenderState, Synthesis, NOISE_FLOOR};
