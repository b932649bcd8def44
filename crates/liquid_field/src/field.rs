//! Dense per-pixel displacement field

/// One `(dx, dy)` offset per raster pixel, in raster pixels
///
/// Always rebuilt from scratch by a synthesis pass; never patched in place.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplacementField {
    width: u32,
    height: u32,
    offsets: Vec<[f32; 2]>,
    max_magnitude: f32,
    invalid_pixels: usize,
}

impl DisplacementField {
    /// Field of zero offsets
    pub fn zero(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            offsets: vec![[0.0, 0.0]; width as usize * height as usize],
            max_magnitude: 0.0,
            invalid_pixels: 0,
        }
    }

    /// Build from row-major offsets
    ///
    /// Non-finite offsets are replaced with zero and counted as invalid. The
    /// maximum magnitude is taken over the remaining finite offsets.
    pub fn from_offsets(width: u32, height: u32, mut offsets: Vec<[f32; 2]>) -> Self {
        debug_assert_eq!(offsets.len(), width as usize * height as usize);
        let mut max_magnitude = 0.0f32;
        let mut invalid_pixels = 0;
        for offset in offsets.iter_mut() {
            if offset[0].is_finite() && offset[1].is_finite() {
                max_magnitude = max_magnitude.max(offset[0].abs()).max(offset[1].abs());
            } else {
                *offset = [0.0, 0.0];
                invalid_pixels += 1;
            }
        }
        Self {
            width,
            height,
            offsets,
            max_magnitude,
            invalid_pixels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Largest `|dx|` or `|dy|` across the field
    pub fn max_magnitude(&self) -> f32 {
        self.max_magnitude
    }

    /// Pixels whose sample was not a finite coordinate
    pub fn invalid_pixels(&self) -> usize {
        self.invalid_pixels
    }

    /// Offset at raster pixel `(x, y)`
    pub fn get(&self, x: u32, y: u32) -> Option<[f32; 2]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.offsets
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    /// Row-major offsets
    pub fn offsets(&self) -> &[[f32; 2]] {
        &self.offsets
    }

    /// Every offset is zero
    pub fn is_identity(&self) -> bool {
        self.max_magnitude == 0.0
    }
}
