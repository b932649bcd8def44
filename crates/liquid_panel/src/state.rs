//! Panel interaction state machine
//!
//! ```text
//!   Idle ──enter──▶ Hovering ──down──▶ Dragging
//!    ▲  ◀──leave───    │                 │
//!    │                 └──down──────────▶│   (draggable panels only)
//!    └───────────────────up──────────────┘
//! ```
//!
//! Leaving the panel while dragging does not end the drag; only the
//! pointer-up does, wherever it happens.

use std::hash::Hash;

/// Pointer event kinds the state machine understands
pub mod pointer_events {
    pub const POINTER_ENTER: u32 = 1;
    pub const POINTER_LEAVE: u32 = 2;
    pub const POINTER_DOWN: u32 = 3;
    pub const POINTER_UP: u32 = 4;
}

/// States that react to pointer events
pub trait StateTransitions:
    Clone + Copy + PartialEq + Eq + Hash + Send + Sync + std::fmt::Debug + 'static
{
    /// Handle an event and return the new state, or None if no transition
    fn on_event(&self, event: u32) -> Option<Self>;
}

/// Interaction state of one panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PanelState {
    #[default]
    Idle,
    /// Pointer inside the bounds, not dragging
    Hovering,
    /// Pointer captured by a drag
    Dragging,
}

impl PanelState {
    /// Hover-dependent fragments see the panel as hovered
    pub fn is_hovered(&self) -> bool {
        !matches!(self, PanelState::Idle)
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self, PanelState::Dragging)
    }

    /// Pointer moves update the pointer coordinate in this state
    pub fn tracks_pointer(&self) -> bool {
        self.is_hovered()
    }
}

impl StateTransitions for PanelState {
    fn on_event(&self, event: u32) -> Option<Self> {
        use pointer_events::*;
        match (self, event) {
            (PanelState::Idle, POINTER_ENTER) => Some(PanelState::Hovering),
            (PanelState::Hovering, POINTER_LEAVE) => Some(PanelState::Idle),

            // Callers only send POINTER_DOWN to draggable panels
            (PanelState::Idle | PanelState::Hovering, POINTER_DOWN) => Some(PanelState::Dragging),
            (PanelState::Dragging, POINTER_UP) => Some(PanelState::Idle),

            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::pointer_events::*;
    use super::*;

    #[test]
    fn test_hover_cycle() {
        let state = PanelState::default();
        let hovering = state.on_event(POINTER_ENTER).unwrap();
        assert_eq!(hovering, PanelState::Hovering);
        assert_eq!(hovering.on_event(POINTER_LEAVE), Some(PanelState::Idle));
        assert_eq!(hovering.on_event(POINTER_ENTER), None);
    }

    #[test]
    fn test_drag_survives_leave() {
        let dragging = PanelState::Hovering.on_event(POINTER_DOWN).unwrap();
        assert!(dragging.is_dragging());
        assert!(dragging.is_hovered());
        assert_eq!(dragging.on_event(POINTER_LEAVE), None);
        assert_eq!(dragging.on_event(POINTER_ENTER), None);
        assert_eq!(dragging.on_event(POINTER_UP), Some(PanelState::Idle));
    }

    #[test]
    fn test_up_without_drag_is_ignored() {
        assert_eq!(PanelState::Idle.on_event(POINTER_UP), None);
        assert_eq!(PanelState::Hovering.on_event(POINTER_UP), None);
        assert!(!PanelState::Idle.tracks_pointer());
    }
}
