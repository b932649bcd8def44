//! Signed distance field helpers
//!
//! Scalar counterparts of the WGSL helpers used by the renderer: a rounded
//! rectangle distance, vector length, and the cubic smoothing curve used to
//! turn distances into soft transitions.

use crate::error::{CoreError, Result};

/// Hermite smoothing between `edge0` and `edge1`
///
/// `t` is first mapped through `(t - edge0) / (edge1 - edge0)` and clamped to
/// `[0, 1]`, then eased with `3t² - 2t³`. Reversed edges (`edge0 > edge1`)
/// are valid and produce a falling curve.
///
/// Callers must guarantee `edge0 != edge1`; use [`try_smooth_step`] when the
/// edges come from untrusted input.
#[inline]
pub fn smooth_step(edge0: f32, edge1: f32, t: f32) -> f32 {
    debug_assert!(edge0 != edge1, "smooth_step edges must differ");
    let t = ((t - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// [`smooth_step`] that rejects an empty edge range instead of dividing by zero
pub fn try_smooth_step(edge0: f32, edge1: f32, t: f32) -> Result<f32> {
    if edge0 == edge1 {
        return Err(CoreError::DegenerateEdges(edge0));
    }
    Ok(smooth_step(edge0, edge1, t))
}

/// Euclidean length of `(x, y)`
#[inline]
pub fn vector_length(x: f32, y: f32) -> f32 {
    (x * x + y * y).sqrt()
}

/// Signed distance from `(x, y)` to an axis-aligned rounded rectangle centred at the origin
///
/// Negative inside, positive outside. `half_width`/`half_height` are the half
/// extents; `radius` rounds the corners.
#[inline]
pub fn rounded_rect_sdf(x: f32, y: f32, half_width: f32, half_height: f32, radius: f32) -> f32 {
    let qx = x.abs() - half_width + radius;
    let qy = y.abs() - half_height + radius;
    qx.max(qy).min(0.0) + vector_length(qx.max(0.0), qy.max(0.0)) - radius
}
