//! Bitmap resources handed to the compositor
//!
//! Displacement maps travel to the filter as PNG images, usually inlined as
//! `data:image/png;base64,...` URIs.

use base64::Engine;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, GenericImageView, ImageEncoder};
use liquid_field::EncodedBitmap;

use crate::error::{CompositorError, Result};

const DATA_URI_PREFIX: &str = "data:image/png;base64,";

/// Encode a displacement map as PNG bytes
pub fn encode_png(bitmap: &EncodedBitmap) -> Result<Vec<u8>> {
    let (width, height) = bitmap.dimensions();
    if width == 0 || height == 0 {
        return Err(CompositorError::EmptyBitmap { width, height });
    }

    let mut out = Vec::with_capacity(bitmap.byte_len() / 4);
    PngEncoder::new(&mut out).write_image(
        bitmap.as_bytes(),
        width,
        height,
        ExtendedColorType::Rgba8,
    )?;
    Ok(out)
}

/// Decode PNG bytes back into a displacement map
pub fn decode_png(data: &[u8]) -> Result<EncodedBitmap> {
    let img = image::load_from_memory(data)?;
    let (width, height) = img.dimensions();
    let raw = img.to_rgba8().into_raw();
    Ok(EncodedBitmap::from_rgba(&raw, width, height)?)
}

/// Encode a displacement map as a PNG data URI
pub fn to_data_uri(bitmap: &EncodedBitmap) -> Result<String> {
    let png = encode_png(bitmap)?;
    let encoded = base64::engine::general_purpose::STANDARD.encode(png);
    Ok(format!("{DATA_URI_PREFIX}{encoded}"))
}

/// Decode a displacement map from a data URI or plain base64
pub fn from_data_uri(data: &str) -> Result<EncodedBitmap> {
    let payload = if data.starts_with("data:") {
        data.find(";base64,")
            .map(|pos| &data[pos + 8..])
            .ok_or_else(|| CompositorError::InvalidDataUri("missing ;base64, marker".to_string()))?
    } else {
        data
    };

    let bytes = base64::engine::general_purpose::STANDARD.decode(payload)?;
    decode_png(&bytes)
}
