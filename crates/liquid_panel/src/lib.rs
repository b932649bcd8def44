//! Liquid Glass Panels
//!
//! Interactive lifecycle around the displacement field:
//!
//! - [`PanelController`]: one panel's pointer state, drag, viewport
//!   constraint and synthesis triggers
//! - [`Stage`]: many panels sharing a viewport, with hit testing, pointer
//!   capture and frame-driven timers
//! - [`PanelConfig`]: panel, button, decoration and card presets
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use liquid_compositor::RecordingCompositor;
//! use liquid_panel::{PanelConfig, Stage};
//! use liquid_platform::{Event, Viewport};
//!
//! let recorder = RecordingCompositor::new();
//! let mut stage = Stage::new(Viewport::default(), Arc::new(recorder.clone()));
//! let panel = stage.mount(PanelConfig::panel()).unwrap();
//!
//! stage.handle_event(&Event::pointer_down(960.0, 540.0)).unwrap();
//! stage.handle_event(&Event::pointer_moved(50.0, 50.0)).unwrap();
//! stage.handle_event(&Event::pointer_up(50.0, 50.0)).unwrap();
//!
//! assert_eq!(stage.panel(panel).unwrap().position().x, 10.0);
//! assert_eq!(recorder.publish_count(), 1);
//! ```

pub mod config;
pub mod constrain;
pub mod controller;
pub mod error;
pub mod stage;
pub mod state;
pub mod timer;

pub use config::{
    ButtonSize, CardSize, PanelConfig, Positioning, SynthesisMode, AUTO_WIDTH_MIN,
    CARD_HOVER_BOOST, DECORATION_TICK_MS,
};
pub use constrain::{centered_position, constrain_position, drag_position, DEFAULT_INSET};
pub use controller::{PanelController, PositionCallback};
pub use error::{PanelError, Result};
pub use stage::{PanelKey, Stage};
pub use state::{pointer_events, PanelState, StateTransitions};
pub use timer::{TimerId, TimerQueue};
