//! Bitmap encoding of displacement fields
//!
//! Each pixel stores its horizontal offset in the red channel and its
//! vertical offset in the green channel:
//!
//! ```text
//! R = clamp(round((dx / scale + 0.5) * 255), 0, 255)
//! G = clamp(round((dy / scale + 0.5) * 255), 0, 255)
//! B = 0, A = 255
//! ```
//!
//! A displacement filter reads the channels back as `(c / 255 - 0.5) * scale`.
//! Offsets with `|d| <= scale / 2` survive the round trip to within one
//! quantization step; larger ones saturate at 0 or 255.

use bytemuck::{Pod, Zeroable};

use crate::error::{FieldError, Result};
use crate::field::DisplacementField;

/// Channel value for a zero offset
pub const NEUTRAL_CHANNEL: u8 = 128;

/// One RGBA8 pixel
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    /// Encoded pixel of a zero offset
    pub const NEUTRAL: Rgba8 = Rgba8 {
        r: NEUTRAL_CHANNEL,
        g: NEUTRAL_CHANNEL,
        b: 0,
        a: 255,
    };

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

/// Encode one offset component
#[inline]
pub fn encode_channel(offset: f32, scale: f32) -> u8 {
    let value = ((offset / scale + 0.5) * 255.0).round();
    if value.is_nan() {
        return NEUTRAL_CHANNEL;
    }
    value.clamp(0.0, 255.0) as u8
}

/// Decode one channel back to an offset
#[inline]
pub fn decode_channel(channel: u8, scale: f32) -> f32 {
    (channel as f32 / 255.0 - 0.5) * scale
}

/// RGBA8 displacement map
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedBitmap {
    width: u32,
    height: u32,
    pixels: Vec<Rgba8>,
}

impl EncodedBitmap {
    /// Bitmap that displaces nothing
    pub fn neutral(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Rgba8::NEUTRAL; width as usize * height as usize],
        }
    }

    /// Encode a field with the given scale factor
    ///
    /// A scale of zero (or any non-positive scale) cannot be divided by; the
    /// result is the neutral bitmap.
    pub fn encode(field: &DisplacementField, scale: f32) -> Self {
        if !(scale > 0.0) {
            return Self::neutral(field.width(), field.height());
        }
        let pixels = field
            .offsets()
            .iter()
            .map(|&[dx, dy]| Rgba8 {
                r: encode_channel(dx, scale),
                g: encode_channel(dy, scale),
                b: 0,
                a: 255,
            })
            .collect();
        Self {
            width: field.width(),
            height: field.height(),
            pixels,
        }
    }

    /// Wrap raw RGBA bytes
    pub fn from_rgba(bytes: &[u8], width: u32, height: u32) -> Result<Self> {
        let expected = width as usize * height as usize * 4;
        if bytes.len() != expected {
            return Err(FieldError::PixelLength {
                expected,
                actual: bytes.len(),
            });
        }
        let pixels = bytes
            .chunks_exact(4)
            .map(|p| Rgba8::new(p[0], p[1], p[2], p[3]))
            .collect();
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Decode back into a field using the scale the bitmap was encoded with
    pub fn decode(&self, scale: f32) -> DisplacementField {
        let offsets = self
            .pixels
            .iter()
            .map(|p| [decode_channel(p.r, scale), decode_channel(p.g, scale)])
            .collect();
        DisplacementField::from_offsets(self.width, self.height, offsets)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    pub fn pixels(&self) -> &[Rgba8] {
        &self.pixels
    }

    /// Raw RGBA bytes, row-major
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    pub fn byte_len(&self) -> usize {
        self.pixels.len() * 4
    }

    /// Every pixel encodes a zero offset
    pub fn is_neutral(&self) -> bool {
        self.pixels.iter().all(|p| *p == Rgba8::NEUTRAL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_encoding() {
        assert_eq!(encode_channel(0.0, 10.0), 128);
        assert_eq!(encode_channel(5.0, 10.0), 255);
        assert_eq!(encode_channel(-5.0, 10.0), 0);
        // Saturates beyond the representable band
        assert_eq!(encode_channel(40.0, 10.0), 255);
        assert_eq!(encode_channel(-40.0, 10.0), 0);
        assert_eq!(encode_channel(f32::NAN, 10.0), NEUTRAL_CHANNEL);
    }

    #[test]
    fn test_channel_decoding() {
        assert!((decode_channel(255, 10.0) - 5.0).abs() < 1e-6);
        assert!((decode_channel(0, 10.0) + 5.0).abs() < 1e-6);
        assert!(decode_channel(128, 10.0).abs() < 10.0 / 255.0);
    }

    #[test]
    fn test_zero_scale_is_neutral() {
        let field = DisplacementField::from_offsets(2, 1, vec![[1.0, 2.0], [3.0, 4.0]]);
        let bitmap = EncodedBitmap::encode(&field, 0.0);
        assert!(bitmap.is_neutral());
        assert_eq!(bitmap.pixel(1, 0), Some(Rgba8::new(128, 128, 0, 255)));
    }

    #[test]
    fn test_bytes_layout() {
        let field = DisplacementField::from_offsets(2, 1, vec![[5.0, -5.0], [0.0, 0.0]]);
        let bitmap = EncodedBitmap::encode(&field, 10.0);
        assert_eq!(bitmap.as_bytes(), &[255, 0, 0, 255, 128, 128, 0, 255]);
        assert_eq!(bitmap.byte_len(), 8);

        let copy = EncodedBitmap::from_rgba(bitmap.as_bytes(), 2, 1).unwrap();
        assert_eq!(copy, bitmap);
    }

    #[test]
    fn test_from_rgba_rejects_wrong_length() {
        let result = EncodedBitmap::from_rgba(&[0, 0, 0, 255], 2, 2);
        assert_eq!(
            result,
            Err(FieldError::PixelLength {
                expected: 16,
                actual: 4
            })
        );
    }

    #[test]
    fn test_decode_within_band_is_within_one_step() {
        let scale = 12.0;
        let offsets: Vec<[f32; 2]> = (0..=60)
            .map(|i| {
                let d = -6.0 + i as f32 * 0.2;
                [d, -d]
            })
            .collect();
        let field = DisplacementField::from_offsets(61, 1, offsets);
        let decoded = EncodedBitmap::encode(&field, scale).decode(scale);

        for (orig, back) in field.offsets().iter().zip(decoded.offsets()) {
            assert!((orig[0] - back[0]).abs() <= scale / 255.0);
            assert!((orig[1] - back[1]).abs() <= scale / 255.0);
        }
    }
}
