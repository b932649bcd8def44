//! Geometry types shared by every layer of the effect
//!
//! Two coordinate spaces are in play:
//!
//! - **Viewport space** ([`Point`], [`Size`], [`Rect`]): logical pixels, origin at the
//!   top-left of the host viewport. Panel positions and pointer client coordinates live here.
//! - **Normalized space** ([`Uv`]): `[0, 1]` relative to a panel's own bounding box,
//!   origin top-left. Fragment functions consume and produce these.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

// ─────────────────────────────────────────────────────────────────────────────
// Viewport Space
// ─────────────────────────────────────────────────────────────────────────────

/// 2D point in viewport pixels
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Top-left corner of a freely positioned panel, in viewport pixels
pub type PanelPosition = Point;

/// 2D size
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const ZERO: Size = Size {
        width: 0.0,
        height: 0.0,
    };

    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// True when either side has no area
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }
}

/// 2D rectangle
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    pub const ZERO: Rect = Rect {
        origin: Point::ZERO,
        size: Size::ZERO,
    };

    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            origin: Point::new(x, y),
            size: Size::new(width, height),
        }
    }

    pub fn from_origin_size(origin: Point, size: Size) -> Self {
        Self { origin, size }
    }

    pub fn x(&self) -> f32 {
        self.origin.x
    }

    pub fn y(&self) -> f32 {
        self.origin.y
    }

    pub fn width(&self) -> f32 {
        self.size.width
    }

    pub fn height(&self) -> f32 {
        self.size.height
    }

    pub fn center(&self) -> Point {
        Point::new(
            self.origin.x + self.size.width / 2.0,
            self.origin.y + self.size.height / 2.0,
        )
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.origin.x
            && point.x <= self.origin.x + self.size.width
            && point.y >= self.origin.y
            && point.y <= self.origin.y + self.size.height
    }

    /// Offset the rect by a delta
    pub fn offset(&self, dx: f32, dy: f32) -> Self {
        Rect {
            origin: Point::new(self.origin.x + dx, self.origin.y + dy),
            size: self.size,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Normalized Space
// ─────────────────────────────────────────────────────────────────────────────

/// Normalized coordinate relative to a panel's bounding box
///
/// Surface and pointer positions are inside `[0, 1]`. Sample results returned by a
/// fragment may fall outside that range; how the compositor samples out-of-range
/// coordinates is its own business.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Uv {
    pub x: f32,
    pub y: f32,
}

/// Sample coordinate returned by a fragment function
pub type SampleResult = Uv;

impl Uv {
    pub const ZERO: Uv = Uv { x: 0.0, y: 0.0 };
    pub const CENTER: Uv = Uv { x: 0.5, y: 0.5 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Normalize a viewport-space point against a panel's bounding box
    ///
    /// A bounding box without area has no meaningful interior, so the pointer
    /// is reported at the panel centre instead of dividing by zero.
    pub fn from_client(client: Point, bounds: Rect) -> Self {
        if bounds.size.is_empty() {
            return Self::CENTER;
        }
        Self {
            x: (client.x - bounds.origin.x) / bounds.size.width,
            y: (client.y - bounds.origin.y) / bounds.size.height,
        }
    }

    /// Both components are finite numbers
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Offset from the panel centre, `(x - 0.5, y - 0.5)`
    pub fn centered(&self) -> (f32, f32) {
        (self.x - 0.5, self.y - 0.5)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Panel Geometry
// ─────────────────────────────────────────────────────────────────────────────

/// Size and corner rounding of one glass panel, in logical pixels
///
/// Immutable for the duration of a synthesis pass. Any change invalidates the
/// displacement field and forces a full re-synthesis.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PanelGeometry {
    pub width: f32,
    pub height: f32,
    #[serde(default)]
    pub corner_radius: f32,
}

impl Default for PanelGeometry {
    fn default() -> Self {
        Self {
            width: 300.0,
            height: 200.0,
            corner_radius: 150.0,
        }
    }
}

impl PanelGeometry {
    pub const fn new(width: f32, height: f32, corner_radius: f32) -> Self {
        Self {
            width,
            height,
            corner_radius,
        }
    }

    /// Reject values no panel can have
    ///
    /// Zero-sized panels are accepted: they are degenerate but must keep
    /// rendering (undistorted) rather than fail.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("width", self.width),
            ("height", self.height),
            ("corner_radius", self.corner_radius),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(CoreError::InvalidGeometry { name, value });
            }
        }
        Ok(())
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// True when the panel covers no pixels
    pub fn is_degenerate(&self) -> bool {
        self.size().is_empty()
    }

    /// Corner radius clamped to what the panel can actually display
    pub fn effective_radius(&self) -> f32 {
        self.corner_radius
            .min(self.width / 2.0)
            .min(self.height / 2.0)
            .max(0.0)
    }

    /// Bounding box of the panel placed at `position`
    pub fn bounds_at(&self, position: Point) -> Rect {
        Rect::from_origin_size(position, self.size())
    }
}
