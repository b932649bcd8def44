//! Liquid Glass Platform Events
//!
//! The event vocabulary panels consume from a host UI: pointer input in
//! viewport coordinates, viewport changes and frame ticks. Hosts translate
//! their native events into [`Event`]s and feed them to a stage.

pub mod error;
pub mod event;
pub mod input;

pub use error::{PlatformError, Result};
pub use event::{Event, Viewport, ViewportEvent};
pub use input::{InputEvent, PointerButton, PointerEvent};
