//! Pointer input

use liquid_core::Point;

/// Input events
#[derive(Clone, Debug, PartialEq)]
pub enum InputEvent {
    /// Pointer event (mouse, pen or primary touch)
    Pointer(PointerEvent),
}

/// Pointer events in viewport (client) coordinates
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerEvent {
    /// Pointer moved to position
    Moved {
        /// X position in viewport coordinates
        x: f32,
        /// Y position in viewport coordinates
        y: f32,
    },
    /// Pointer button pressed
    ButtonPressed {
        button: PointerButton,
        x: f32,
        y: f32,
    },
    /// Pointer button released
    ButtonReleased {
        button: PointerButton,
        x: f32,
        y: f32,
    },
    /// Pointer left the viewport
    Left,
}

impl PointerEvent {
    /// Client position carried by the event, if any
    pub fn position(&self) -> Option<Point> {
        match *self {
            PointerEvent::Moved { x, y }
            | PointerEvent::ButtonPressed { x, y, .. }
            | PointerEvent::ButtonReleased { x, y, .. } => Some(Point::new(x, y)),
            PointerEvent::Left => None,
        }
    }

    /// Button involved in a press or release
    pub fn button(&self) -> Option<PointerButton> {
        match *self {
            PointerEvent::ButtonPressed { button, .. }
            | PointerEvent::ButtonReleased { button, .. } => Some(button),
            _ => None,
        }
    }
}

/// Pointer buttons
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PointerButton {
    /// Left mouse button or touch contact
    Primary,
    /// Right mouse button
    Secondary,
    /// Middle mouse button (scroll wheel click)
    Middle,
    /// Other button with index
    Other(u16),
}

impl PointerButton {
    pub fn is_primary(&self) -> bool {
        matches!(self, PointerButton::Primary)
    }
}
