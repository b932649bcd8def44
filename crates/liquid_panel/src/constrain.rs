//! Keeping free panels inside the viewport

use liquid_core::{Point, Size};

/// Default gap kept between a panel and the viewport edge
pub const DEFAULT_INSET: f32 = 10.0;

/// Clamp a panel's top-left corner into `[inset, viewport - size - inset]`
///
/// When the viewport is too small for the panel plus insets the range is
/// inverted; the minimum bound wins and the panel is pinned to the top-left
/// inset.
pub fn constrain_position(position: Point, panel: Size, viewport: Size, inset: f32) -> Point {
    let max_x = viewport.width - panel.width - inset;
    let max_y = viewport.height - panel.height - inset;
    Point::new(
        inset.max(position.x.min(max_x)),
        inset.max(position.y.min(max_y)),
    )
}

/// Top-left corner that centres a panel on the pointer
pub fn drag_position(client: Point, panel: Size) -> Point {
    Point::new(
        client.x - panel.width / 2.0,
        client.y - panel.height / 2.0,
    )
}

/// Top-left corner that centres a panel in the viewport
pub fn centered_position(panel: Size, viewport: Size) -> Point {
    Point::new(
        viewport.width / 2.0 - panel.width / 2.0,
        viewport.height / 2.0 - panel.height / 2.0,
    )
}
