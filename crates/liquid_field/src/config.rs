//! Synthesis parameters

use serde::{Deserialize, Serialize};

use crate::error::{FieldError, Result};

/// Largest raster side the synthesizer accepts
pub const MAX_RASTER_SIDE: u32 = 8192;

/// Headroom applied to the maximum offset before encoding
pub const DEFAULT_HEADROOM: f32 = 0.5;

/// Where inside a raster pixel the surface coordinate is taken
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PixelOrigin {
    /// `uv = x / width`, offsets measured from the pixel's top-left corner
    #[default]
    TopLeft,
    /// `uv = (x + 0.5) / width`, offsets measured from the pixel centre
    ///
    /// Mirror-symmetric fragments then produce exactly mirror-symmetric fields.
    Center,
}

impl PixelOrigin {
    #[inline]
    pub(crate) fn bias(self) -> f32 {
        match self {
            PixelOrigin::TopLeft => 0.0,
            PixelOrigin::Center => 0.5,
        }
    }
}

/// Parameters of one synthesis pass
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthesisConfig {
    /// Multiplier applied to the largest offset to obtain the scale factor
    pub headroom: f32,
    /// Raster pixels per logical pixel
    pub device_pixel_ratio: f32,
    pub pixel_origin: PixelOrigin,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            headroom: DEFAULT_HEADROOM,
            device_pixel_ratio: 1.0,
            pixel_origin: PixelOrigin::TopLeft,
        }
    }
}

impl SynthesisConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn headroom(mut self, headroom: f32) -> Self {
        self.headroom = headroom;
        self
    }

    pub fn device_pixel_ratio(mut self, ratio: f32) -> Self {
        self.device_pixel_ratio = ratio;
        self
    }

    pub fn pixel_origin(mut self, origin: PixelOrigin) -> Self {
        self.pixel_origin = origin;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.headroom.is_finite() && self.headroom > 0.0) {
            return Err(FieldError::InvalidConfig {
                name: "headroom",
                value: self.headroom,
            });
        }
        if !(self.device_pixel_ratio.is_finite() && self.device_pixel_ratio > 0.0) {
            return Err(FieldError::InvalidConfig {
                name: "device_pixel_ratio",
                value: self.device_pixel_ratio,
            });
        }
        Ok(())
    }

    /// Raster dimensions for a panel of `width` × `height` logical pixels
    pub fn raster_size(&self, width: f32, height: f32) -> Result<(u32, u32)> {
        let w = (width * self.device_pixel_ratio).round().max(0.0);
        let h = (height * self.device_pixel_ratio).round().max(0.0);
        if w > MAX_RASTER_SIDE as f32 || h > MAX_RASTER_SIDE as f32 {
            return Err(FieldError::RasterTooLarge {
                width: w.min(u32::MAX as f32) as u32,
                height: h.min(u32::MAX as f32) as u32,
                max: MAX_RASTER_SIDE,
            });
        }
        Ok((w as u32, h as u32))
    }
}
