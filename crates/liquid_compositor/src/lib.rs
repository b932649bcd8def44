//! Liquid Glass Compositor Binding
//!
//! Publishes displacement maps to whatever actually refracts the backdrop.
//!
//! - [`Compositor`]: the sink panels publish into
//! - [`SvgCompositor`]: SVG `<filter>` markup with PNG data URIs
//! - [`RecordingCompositor`]: headless sink that records every publish
//! - [`FilterChain`]: static blur/contrast/brightness/saturation presets
//! - [`FilterSlot`]: atomic bitmap + scale swap with stale-write rejection

pub mod compositor;
pub mod error;
pub mod filter;
pub mod resource;
pub mod slot;

pub use compositor::{Compositor, RecordingCompositor, SharedCompositor, SvgCompositor};
pub use error::{CompositorError, Result};
pub use filter::{FilterChain, FilterId, FilterIdGenerator};
pub use resource::{decode_png, encode_png, from_data_uri, to_data_uri};
pub use slot::{DisplacementMap, FilterSlot};
