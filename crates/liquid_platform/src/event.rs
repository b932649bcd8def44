//! Host events and the viewport they describe

use liquid_core::{Point, Size};

use crate::error::{PlatformError, Result};
use crate::input::{InputEvent, PointerButton, PointerEvent};

/// Events delivered by the host
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Viewport-related event
    Viewport(ViewportEvent),
    /// Input event
    Input(InputEvent),
    /// Frame tick
    ///
    /// Sent once per animation frame. Timers and coalesced synthesis are
    /// driven from here.
    Frame {
        /// Host clock in seconds
        now: f64,
    },
}

impl Event {
    pub fn pointer_moved(x: f32, y: f32) -> Self {
        Event::Input(InputEvent::Pointer(PointerEvent::Moved { x, y }))
    }

    pub fn pointer_down(x: f32, y: f32) -> Self {
        Event::Input(InputEvent::Pointer(PointerEvent::ButtonPressed {
            button: PointerButton::Primary,
            x,
            y,
        }))
    }

    pub fn pointer_up(x: f32, y: f32) -> Self {
        Event::Input(InputEvent::Pointer(PointerEvent::ButtonReleased {
            button: PointerButton::Primary,
            x,
            y,
        }))
    }

    pub fn pointer_left() -> Self {
        Event::Input(InputEvent::Pointer(PointerEvent::Left))
    }

    pub fn resized(width: f32, height: f32) -> Self {
        Event::Viewport(ViewportEvent::Resized { width, height })
    }

    pub fn frame(now: f64) -> Self {
        Event::Frame { now }
    }
}

/// Viewport events
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ViewportEvent {
    /// Viewport was resized
    Resized {
        /// New width in logical pixels
        width: f32,
        /// New height in logical pixels
        height: f32,
    },
    /// Device pixel ratio changed
    ScaleFactorChanged { scale_factor: f64 },
}

/// Visible area panels are laid out in
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    size: Size,
    scale_factor: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            size: Size::new(1920.0, 1080.0),
            scale_factor: 1.0,
        }
    }
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Result<Self> {
        Ok(Self {
            size: validate_size(width, height)?,
            scale_factor: 1.0,
        })
    }

    pub fn with_scale_factor(mut self, scale_factor: f64) -> Result<Self> {
        self.scale_factor = validate_scale(scale_factor)?;
        Ok(self)
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn width(&self) -> f32 {
        self.size.width
    }

    pub fn height(&self) -> f32 {
        self.size.height
    }

    pub fn scale_factor(&self) -> f64 {
        self.scale_factor
    }

    pub fn center(&self) -> Point {
        Point::new(self.size.width / 2.0, self.size.height / 2.0)
    }

    /// Apply a viewport event, returning whether anything changed
    pub fn apply(&mut self, event: &ViewportEvent) -> Result<bool> {
        match *event {
            ViewportEvent::Resized { width, height } => {
                let size = validate_size(width, height)?;
                let changed = size != self.size;
                self.size = size;
                Ok(changed)
            }
            ViewportEvent::ScaleFactorChanged { scale_factor } => {
                let scale_factor = validate_scale(scale_factor)?;
                let changed = scale_factor != self.scale_factor;
                self.scale_factor = scale_factor;
                Ok(changed)
            }
        }
    }
}

fn validate_size(width: f32, height: f32) -> Result<Size> {
    if !(width.is_finite() && height.is_finite()) || width < 0.0 || height < 0.0 {
        return Err(PlatformError::InvalidViewport { width, height });
    }
    Ok(Size::new(width, height))
}

fn validate_scale(scale_factor: f64) -> Result<f64> {
    if !scale_factor.is_finite() || scale_factor <= 0.0 {
        return Err(PlatformError::InvalidScaleFactor(scale_factor));
    }
    Ok(scale_factor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_constructors() {
        match Event::pointer_down(3.0, 4.0) {
            Event::Input(InputEvent::Pointer(p)) => {
                assert_eq!(p.position(), Some(Point::new(3.0, 4.0)));
                assert_eq!(p.button(), Some(PointerButton::Primary));
            }
            other => panic!("unexpected event {other:?}"),
        }
        assert_eq!(
            Event::resized(800.0, 600.0),
            Event::Viewport(ViewportEvent::Resized {
                width: 800.0,
                height: 600.0
            })
        );
    }

    #[test]
    fn test_viewport_apply() {
        let mut viewport = Viewport::new(1920.0, 1080.0).unwrap();
        assert_eq!(viewport.center(), Point::new(960.0, 540.0));

        let resize = ViewportEvent::Resized {
            width: 1280.0,
            height: 720.0,
        };
        assert!(viewport.apply(&resize).unwrap());
        assert!(!viewport.apply(&resize).unwrap());
        assert_eq!(viewport.size(), Size::new(1280.0, 720.0));

        assert!(viewport
            .apply(&ViewportEvent::ScaleFactorChanged { scale_factor: 2.0 })
            .unwrap());
        assert_eq!(viewport.scale_factor(), 2.0);
    }

    #[test]
    fn test_invalid_viewport() {
        assert!(Viewport::new(-1.0, 10.0).is_err());
        assert!(Viewport::new(f32::NAN, 10.0).is_err());
        assert!(Viewport::default().with_scale_factor(0.0).is_err());

        let mut viewport = Viewport::default();
        assert!(viewport
            .apply(&ViewportEvent::Resized {
                width: f32::INFINITY,
                height: 1.0
            })
            .is_err());
        // Rejected events leave the viewport untouched
        assert_eq!(viewport, Viewport::default());
    }
}
