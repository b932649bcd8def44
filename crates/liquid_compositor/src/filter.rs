//! Filter identity and the static backdrop adjustments
//!
//! The displacement map is only one stage of what the host applies behind a
//! panel. The rest ([`FilterChain`]) is fixed per widget kind and never
//! computed by the engine.

use std::fmt;

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Filter Identity
// ─────────────────────────────────────────────────────────────────────────────

/// Opaque handle naming one displacement filter
///
/// Rendered as `liquid-glass-<n>`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FilterId(u64);

impl FilterId {
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u64 {
        self.0
    }

    /// Result name of the map image inside the filter
    pub fn map_name(&self) -> String {
        format!("{self}-map")
    }
}

impl fmt::Display for FilterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "liquid-glass-{}", self.0)
    }
}

/// Issues monotonically increasing filter ids
#[derive(Debug, Default)]
pub struct FilterIdGenerator {
    next: u64,
}

impl FilterIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self) -> FilterId {
        self.next += 1;
        FilterId(self.next)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Filter Chain
// ─────────────────────────────────────────────────────────────────────────────

/// Static backdrop adjustments layered after the displacement
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterChain {
    /// Blur radius in logical pixels
    pub blur: f32,
    /// Contrast multiplier (1.0 = unchanged)
    pub contrast: f32,
    /// Brightness multiplier (1.0 = unchanged)
    pub brightness: f32,
    /// Saturation multiplier (1.0 = unchanged)
    pub saturate: f32,
}

impl Default for FilterChain {
    fn default() -> Self {
        Self::panel()
    }
}

impl FilterChain {
    /// Displacement only, no adjustments
    pub const fn none() -> Self {
        Self {
            blur: 0.0,
            contrast: 1.0,
            brightness: 1.0,
            saturate: 1.0,
        }
    }

    pub fn blur(mut self, blur: f32) -> Self {
        self.blur = blur;
        self
    }

    pub fn contrast(mut self, contrast: f32) -> Self {
        self.contrast = contrast;
        self
    }

    pub fn brightness(mut self, brightness: f32) -> Self {
        self.brightness = brightness;
        self
    }

    pub fn saturate(mut self, saturate: f32) -> Self {
        self.saturate = saturate;
        self
    }

    // Presets

    /// Draggable glass panel
    pub fn panel() -> Self {
        Self::none()
            .blur(0.25)
            .contrast(1.2)
            .brightness(1.05)
            .saturate(1.1)
    }

    /// Glass button
    pub fn button() -> Self {
        Self::none()
            .blur(8.0)
            .contrast(1.1)
            .brightness(1.1)
            .saturate(1.2)
    }

    /// Animated header decoration
    pub fn decoration() -> Self {
        Self::none().blur(2.0).brightness(1.1)
    }

    /// CSS `backdrop-filter` value applying the displacement filter `id`
    /// followed by this chain
    ///
    /// Neutral adjustments are left out.
    pub fn css(&self, id: FilterId) -> String {
        let mut css = format!("url(#{id})");
        if self.blur != 0.0 {
            css.push_str(&format!(" blur({}px)", self.blur));
        }
        if self.contrast != 1.0 {
            css.push_str(&format!(" contrast({})", self.contrast));
        }
        if self.brightness != 1.0 {
            css.push_str(&format!(" brightness({})", self.brightness));
        }
        if self.saturate != 1.0 {
            css.push_str(&format!(" saturate({})", self.saturate));
        }
        css
    }
}
