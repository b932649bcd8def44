//! Published displacement maps
//!
//! The bitmap and its scale always travel together as one [`DisplacementMap`]
//! value. A [`FilterSlot`] replaces the whole value at once, so a consumer can
//! never observe a new bitmap paired with a stale scale.

use std::sync::Arc;

use liquid_core::Size;
use liquid_field::{EncodedBitmap, Synthesis};
use tracing::trace;

/// Immutable bitmap + scale pair
#[derive(Debug, Clone, PartialEq)]
pub struct DisplacementMap {
    pub bitmap: Arc<EncodedBitmap>,
    /// Filter scale in logical pixels
    pub scale: f32,
    /// Logical size the map covers
    pub size: Size,
    /// Monotonic per-panel pass counter
    pub generation: u64,
}

impl DisplacementMap {
    pub fn new(bitmap: EncodedBitmap, scale: f32, size: Size, generation: u64) -> Self {
        Self {
            bitmap: Arc::new(bitmap),
            scale,
            size,
            generation,
        }
    }

    /// Package a synthesis result for publishing
    pub fn from_synthesis(synthesis: &Synthesis, size: Size, generation: u64) -> Self {
        Self::new(synthesis.bitmap.clone(), synthesis.scale, size, generation)
    }

    /// Nothing to displace
    pub fn is_neutral(&self) -> bool {
        self.scale == 0.0 || self.bitmap.pixels().is_empty()
    }
}

/// Holds the map currently applied by one filter
#[derive(Debug, Default)]
pub struct FilterSlot {
    current: Option<DisplacementMap>,
}

impl FilterSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Swap in `map` unless an equal or newer generation is already there
    ///
    /// Returns `true` when the map was applied.
    pub fn publish(&mut self, map: DisplacementMap) -> bool {
        if let Some(current) = &self.current {
            if map.generation <= current.generation {
                trace!(
                    "Dropping stale displacement map (generation {} <= {})",
                    map.generation,
                    current.generation
                );
                return false;
            }
        }
        self.current = Some(map);
        true
    }

    pub fn current(&self) -> Option<&DisplacementMap> {
        self.current.as_ref()
    }

    pub fn generation(&self) -> Option<u64> {
        self.current.as_ref().map(|m| m.generation)
    }

    pub fn clear(&mut self) {
        self.current = None;
    }
}
