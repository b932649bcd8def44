//! Displacement field synthesis
//!
//! [`render`] is the single entry point panels use: a pure function from a
//! [`RenderState`] snapshot to a [`Synthesis`] (bitmap + scale). It never
//! touches a rendering surface, so the whole numeric path can be tested in
//! isolation.
//!
//! Per pass:
//!
//! 1. For every raster pixel `(x, y)` evaluate the fragment at
//!    `(u, v) = (x / w, y / h)` and record `dx = (sample.x - u) * w`,
//!    `dy = (sample.y - v) * h`, which is `sample.x * w - x` without the
//!    rounding residue.
//! 2. `scale_factor = max(|dx|, |dy|) * headroom`.
//! 3. Encode every offset against `scale_factor` (neutral bitmap when the
//!    largest offset is below [`NOISE_FLOOR`]).
//! 4. Publish `scale_factor / device_pixel_ratio` so the filter works in logical pixels.
//!
//! The maximum is recomputed independently each pass; there is no smoothing
//! between passes.

use std::panic::{catch_unwind, AssertUnwindSafe};

use liquid_core::{Fragment, FragmentEnv, PanelGeometry, Size, Uv};
use tracing::{debug, trace, warn};

use crate::config::SynthesisConfig;
use crate::encode::EncodedBitmap;
use crate::error::{FieldError, Result};
use crate::field::DisplacementField;

/// Largest offset, in raster pixels, still treated as no displacement
pub const NOISE_FLOOR: f32 = 1e-3;

/// Everything a synthesis pass reads
#[derive(Clone, Copy)]
pub struct RenderState<'a> {
    pub geometry: PanelGeometry,
    pub pointer: Uv,
    pub hovered: bool,
    /// Animation time in seconds
    pub time: f64,
    pub fragment: &'a dyn Fragment,
    pub config: SynthesisConfig,
}

impl<'a> RenderState<'a> {
    pub fn new(geometry: PanelGeometry, fragment: &'a dyn Fragment) -> Self {
        Self {
            geometry,
            pointer: Uv::CENTER,
            hovered: false,
            time: 0.0,
            fragment,
            config: SynthesisConfig::default(),
        }
    }

    pub fn pointer(mut self, pointer: Uv) -> Self {
        self.pointer = pointer;
        self
    }

    pub fn hovered(mut self, hovered: bool) -> Self {
        self.hovered = hovered;
        self
    }

    pub fn time(mut self, time: f64) -> Self {
        self.time = time;
        self
    }

    pub fn config(mut self, config: SynthesisConfig) -> Self {
        self.config = config;
        self
    }

    fn env(&self) -> FragmentEnv {
        FragmentEnv {
            time: self.time,
            hovered: self.hovered,
            size: self.geometry.size(),
        }
    }
}

/// Output of one synthesis pass
#[derive(Debug, Clone, PartialEq)]
pub struct Synthesis {
    pub bitmap: EncodedBitmap,
    pub field: DisplacementField,
    /// Largest offset times headroom, in raster pixels
    pub scale_factor: f32,
    /// Scale handed to the compositor, in logical pixels
    pub scale: f32,
}

impl Synthesis {
    /// Result that displaces nothing
    pub fn neutral(width: u32, height: u32) -> Self {
        Self {
            bitmap: EncodedBitmap::neutral(width, height),
            field: DisplacementField::zero(width, height),
            scale_factor: 0.0,
            scale: 0.0,
        }
    }

    /// No pixel is displaced
    pub fn is_neutral(&self) -> bool {
        self.scale_factor == 0.0
    }

    /// Offset at `(x, y)` as the compositor will see it after decoding
    pub fn decoded(&self, x: u32, y: u32) -> Option<[f32; 2]> {
        let pixel = self.bitmap.pixel(x, y)?;
        Some([
            crate::encode::decode_channel(pixel.r, self.scale_factor),
            crate::encode::decode_channel(pixel.g, self.scale_factor),
        ])
    }
}

/// Evaluate a fragment over a `width` × `height` raster
///
/// This is the raw loop; non-finite offsets become zero and are counted.
pub fn synthesize_field(
    width: u32,
    height: u32,
    fragment: &dyn Fragment,
    pointer: Uv,
    env: &FragmentEnv,
    config: &SynthesisConfig,
) -> DisplacementField {
    if width == 0 || height == 0 {
        return DisplacementField::zero(width, height);
    }

    let w = width as f32;
    let h = height as f32;
    let bias = config.pixel_origin.bias();
    let mut offsets = Vec::with_capacity(width as usize * height as usize);

    for y in 0..height {
        let py = y as f32 + bias;
        let v = py / h;
        for x in 0..width {
            let u = (x as f32 + bias) / w;
            let sample = fragment.sample(Uv::new(u, v), pointer, env);
            offsets.push([(sample.x - u) * w, (sample.y - v) * h]);
        }
    }

    DisplacementField::from_offsets(width, height, offsets)
}

/// Synthesize and encode a raster with default parameters
///
/// Convenience form of [`render`] for callers that already know the raster
/// size and do not animate.
pub fn synthesize(width: u32, height: u32, fragment: &dyn Fragment, pointer: Uv) -> Synthesis {
    let config = SynthesisConfig::default();
    let env = FragmentEnv::default().with_size(Size::new(width as f32, height as f32));
    let field = synthesize_field(width, height, fragment, pointer, &env, &config);
    finish(field, &config)
}

/// Run a full synthesis pass for a panel
///
/// Degenerate geometry is not an error: it yields the neutral result and a
/// warning, so the panel keeps rendering undistorted. A fragment that panics
/// fails the pass with [`FieldError::FragmentPanicked`]; callers keep their
/// previous map.
pub fn render(state: &RenderState<'_>) -> Result<Synthesis> {
    state.config.validate()?;
    state.geometry.validate()?;

    let (width, height) = state
        .config
        .raster_size(state.geometry.width, state.geometry.height)?;

    if width == 0 || height == 0 {
        warn!(
            "Degenerate panel geometry {}x{}, emitting neutral displacement map",
            state.geometry.width, state.geometry.height
        );
        return Ok(Synthesis::neutral(width, height));
    }

    let env = state.env();
    let field = catch_unwind(AssertUnwindSafe(|| {
        synthesize_field(
            width,
            height,
            state.fragment,
            state.pointer,
            &env,
            &state.config,
        )
    }))
    .map_err(|_| FieldError::FragmentPanicked(state.fragment.name().to_string()))?;

    if field.invalid_pixels() > 0 {
        warn!(
            "Fragment '{}' produced {} non-finite samples; treated as zero offset",
            state.fragment.name(),
            field.invalid_pixels()
        );
    }

    let synthesis = finish(field, &state.config);
    debug!(
        fragment = state.fragment.name(),
        width,
        height,
        max = synthesis.field.max_magnitude(),
        scale = synthesis.scale,
        "synthesized displacement map"
    );
    Ok(synthesis)
}

fn finish(field: DisplacementField, config: &SynthesisConfig) -> Synthesis {
    let max = field.max_magnitude();
    if !(max >= NOISE_FLOOR) {
        trace!(max, "identity field, publishing neutral map");
        return Synthesis {
            bitmap: EncodedBitmap::neutral(field.width(), field.height()),
            field,
            scale_factor: 0.0,
            scale: 0.0,
        };
    }

    let scale_factor = max * config.headroom;
    let bitmap = EncodedBitmap::encode(&field, scale_factor);
    Synthesis {
        bitmap,
        field,
        scale_factor,
        scale: scale_factor / config.device_pixel_ratio,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PixelOrigin;
    use crate::encode::{decode_channel, Rgba8};
    use liquid_core::{fragment_fn, GlassBulge, HeaderRipple, Identity, PressBulge};

    #[test]
    fn test_identity_fragment_gives_zero_field() {
        let synthesis = synthesize(32, 16, &Identity, Uv::CENTER);
        assert!(synthesis.field.is_identity());
        assert_eq!(synthesis.scale_factor, 0.0);
        assert_eq!(synthesis.scale, 0.0);
        assert!(synthesis
            .bitmap
            .pixels()
            .iter()
            .all(|p| *p == Rgba8::new(128, 128, 0, 255)));
    }

    fn assert_neutral(synthesis: &Synthesis) {
        assert!(synthesis.is_neutral());
        assert_eq!(synthesis.scale, 0.0);
        assert!(synthesis.bitmap.is_neutral());
    }

    #[test]
    fn test_identity_is_exactly_zero_at_any_size() {
        for (w, h) in [(300, 200), (301, 199), (7, 3), (1000, 1)] {
            let synthesis = synthesize(w, h, &Identity, Uv::new(0.2, 0.9));
            assert!(synthesis.field.is_identity(), "{w}x{h}");
            assert_eq!(synthesis.field.max_magnitude(), 0.0);
            assert_neutral(&synthesis);
        }
    }

    #[test]
    fn test_identity_at_fractional_pixel_ratio() {
        let config = SynthesisConfig::new().device_pixel_ratio(1.5);
        let state =
            RenderState::new(PanelGeometry::new(300.0, 200.0, 150.0), &Identity).config(config);
        let synthesis = render(&state).unwrap();
        assert_eq!(synthesis.bitmap.dimensions(), (450, 300));
        assert!(synthesis.field.is_identity());
        assert_neutral(&synthesis);
    }

    #[test]
    fn test_rounding_residue_stays_neutral() {
        // Zero intensity recentres through `(u - 0.5) + 0.5`, which is not bit-exact
        let still = HeaderRipple::new(0.0).unwrap();
        let state = RenderState::new(PanelGeometry::new(300.0, 200.0, 0.0), &still).time(3.7);
        let synthesis = render(&state).unwrap();
        assert!(synthesis.field.max_magnitude() < NOISE_FLOOR);
        assert_neutral(&synthesis);
    }

    #[test]
    fn test_panicking_fragment_fails_the_pass() {
        let broken = fragment_fn(|uv: Uv, _p: Uv, _e: &FragmentEnv| {
            if uv.x > 0.5 {
                panic!("out of range");
            }
            uv
        })
        .named("broken");
        let state = RenderState::new(PanelGeometry::new(20.0, 10.0, 0.0), &broken);
        match render(&state) {
            Err(FieldError::FragmentPanicked(name)) => assert_eq!(name, "broken"),
            other => panic!("unexpected result {other:?}"),
        }
    }

    #[test]
    fn test_offsets_follow_sample_definition() {
        // Constant shift by a quarter of the panel
        let shift = fragment_fn(|uv: Uv, _p: Uv, _e: &FragmentEnv| Uv::new(uv.x + 0.25, uv.y));
        let synthesis = synthesize(8, 4, &shift, Uv::CENTER);
        for y in 0..4 {
            for x in 0..8 {
                let [dx, dy] = synthesis.field.get(x, y).unwrap();
                assert!((dx - 2.0).abs() < 1e-5);
                assert!(dy.abs() < 1e-5);
            }
        }
        assert!((synthesis.field.max_magnitude() - 2.0).abs() < 1e-5);
        assert!((synthesis.scale_factor - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_round_trip_within_representable_band() {
        let bulge = GlassBulge::default();
        let state = RenderState::new(PanelGeometry::new(120.0, 80.0, 40.0), &bulge);
        let synthesis = render(&state).unwrap();
        assert!(synthesis.scale_factor > 0.0);

        let scale = synthesis.scale_factor;
        let mut checked = 0;
        for y in 0..synthesis.field.height() {
            for x in 0..synthesis.field.width() {
                let [dx, dy] = synthesis.field.get(x, y).unwrap();
                let pixel = synthesis.bitmap.pixel(x, y).unwrap();
                if dx.abs() <= scale / 2.0 {
                    assert!((decode_channel(pixel.r, scale) - dx).abs() <= scale / 255.0);
                    checked += 1;
                } else {
                    assert_eq!(pixel.r, if dx > 0.0 { 255 } else { 0 });
                }
                if dy.abs() <= scale / 2.0 {
                    assert!((decode_channel(pixel.g, scale) - dy).abs() <= scale / 255.0);
                } else {
                    assert_eq!(pixel.g, if dy > 0.0 { 255 } else { 0 });
                }
                assert_eq!(pixel.b, 0);
                assert_eq!(pixel.a, 255);
            }
        }
        assert!(checked > 0);
    }

    #[test]
    fn test_bulge_field_is_point_symmetric() {
        let config = SynthesisConfig::new().pixel_origin(PixelOrigin::Center);
        let geometry = PanelGeometry::new(300.0, 200.0, 150.0);
        let bulge = GlassBulge::default();
        let state = RenderState::new(geometry, &bulge).config(config);
        let synthesis = render(&state).unwrap();
        let (w, h) = (synthesis.field.width(), synthesis.field.height());

        for y in (0..h).step_by(7) {
            for x in (0..w).step_by(5) {
                let [dx, dy] = synthesis.field.get(x, y).unwrap();
                let [mx, my] = synthesis.field.get(w - 1 - x, h - 1 - y).unwrap();
                assert!((dx + mx).abs() < 1e-2, "dx at ({x},{y}): {dx} vs {mx}");
                assert!((dy + my).abs() < 1e-2, "dy at ({x},{y}): {dy} vs {my}");
            }
        }
    }

    #[test]
    fn test_bulge_field_is_nearly_symmetric_with_top_left_origin() {
        let geometry = PanelGeometry::new(300.0, 200.0, 150.0);
        let bulge = GlassBulge::default();
        let state = RenderState::new(geometry, &bulge);
        let synthesis = render(&state).unwrap();
        let (w, h) = (synthesis.field.width(), synthesis.field.height());

        // Sampling at pixel corners shifts the mirror image by one pixel
        for y in (0..h).step_by(11) {
            for x in (0..w).step_by(13) {
                let [dx, _] = synthesis.field.get(x, y).unwrap();
                let [mx, _] = synthesis.field.get(w - 1 - x, h - 1 - y).unwrap();
                assert!((dx + mx).abs() < 4.0);
            }
        }
    }

    #[test]
    fn test_scale_factor_scales_linearly() {
        let single = fragment_fn(|uv: Uv, _p: Uv, _e: &FragmentEnv| {
            let (ix, iy) = uv.centered();
            Uv::new(uv.x + ix * 0.1, uv.y - iy * iy * 0.2)
        });
        let double = fragment_fn(|uv: Uv, _p: Uv, _e: &FragmentEnv| {
            let (ix, iy) = uv.centered();
            Uv::new(uv.x + ix * 0.2, uv.y - iy * iy * 0.4)
        });

        let a = synthesize(64, 48, &single, Uv::CENTER);
        let b = synthesize(64, 48, &double, Uv::CENTER);

        assert!((b.scale_factor - 2.0 * a.scale_factor).abs() < 1e-3);

        // Normalized offsets are unchanged, so the encoded maps agree
        for (pa, pb) in a.bitmap.pixels().iter().zip(b.bitmap.pixels()) {
            assert!((pa.r as i16 - pb.r as i16).abs() <= 1);
            assert!((pa.g as i16 - pb.g as i16).abs() <= 1);
        }
    }

    #[test]
    fn test_device_pixel_ratio_divides_published_scale() {
        let geometry = PanelGeometry::new(60.0, 40.0, 10.0);
        let bulge = GlassBulge::default();

        let one = render(&RenderState::new(geometry, &bulge)).unwrap();
        let two = render(
            &RenderState::new(geometry, &bulge)
                .config(SynthesisConfig::new().device_pixel_ratio(2.0)),
        )
        .unwrap();

        assert_eq!(two.bitmap.dimensions(), (120, 80));
        assert!((two.scale - two.scale_factor / 2.0).abs() < 1e-6);
        // Offsets double in raster space, so the logical scale stays put
        assert!((two.scale - one.scale).abs() / one.scale < 0.1);
    }

    #[test]
    fn test_headroom_is_configurable() {
        let geometry = PanelGeometry::new(40.0, 40.0, 0.0);
        let bulge = GlassBulge::default();
        let half = render(&RenderState::new(geometry, &bulge)).unwrap();
        let button = render(
            &RenderState::new(geometry, &bulge).config(SynthesisConfig::new().headroom(0.8)),
        )
        .unwrap();
        let max = half.field.max_magnitude();
        assert!((half.scale_factor - max * 0.5).abs() < 1e-5);
        assert!((button.scale_factor - max * 0.8).abs() < 1e-5);
    }

    #[test]
    fn test_degenerate_geometry_is_neutral() {
        for geometry in [
            PanelGeometry::new(0.0, 0.0, 0.0),
            PanelGeometry::new(0.0, 100.0, 0.0),
            PanelGeometry::new(100.0, 0.0, 20.0),
        ] {
            let synthesis = render(&RenderState::new(geometry, &GlassBulge::default())).unwrap();
            assert!(synthesis.is_neutral());
            assert_eq!(synthesis.scale, 0.0);
            assert!(synthesis.bitmap.pixels().is_empty());
        }
    }

    #[test]
    fn test_invalid_geometry_is_an_error() {
        let state = RenderState::new(PanelGeometry::new(-5.0, 10.0, 0.0), &Identity);
        assert!(render(&state).is_err());
    }

    #[test]
    fn test_non_finite_pixels_do_not_poison_the_field() {
        let flaky = fragment_fn(|uv: Uv, _p: Uv, _e: &FragmentEnv| {
            if uv.x < 0.25 {
                Uv::new(f32::NAN, uv.y)
            } else {
                Uv::new(uv.x + 0.1, uv.y)
            }
        });
        let synthesis = synthesize(20, 10, &flaky, Uv::CENTER);
        assert_eq!(synthesis.field.invalid_pixels(), 5 * 10);
        assert!((synthesis.field.max_magnitude() - 2.0).abs() < 1e-4);
        // Invalid pixels carry the neutral encoding
        assert_eq!(synthesis.bitmap.pixel(0, 0), Some(Rgba8::NEUTRAL));
        assert_eq!(synthesis.field.get(0, 0), Some([0.0, 0.0]));
    }

    #[test]
    fn test_time_and_hover_reach_the_fragment() {
        let geometry = PanelGeometry::new(50.0, 30.0, 10.0);
        let ripple = HeaderRipple::default();
        let a = render(&RenderState::new(geometry, &ripple).time(0.0)).unwrap();
        let b = render(&RenderState::new(geometry, &ripple).time(2.0)).unwrap();
        assert_ne!(a.field, b.field);

        let press = PressBulge::default();
        let pointer = Uv::new(0.9, 0.1);
        let idle = render(&RenderState::new(geometry, &press).pointer(pointer)).unwrap();
        let hovered = render(
            &RenderState::new(geometry, &press)
                .pointer(pointer)
                .hovered(true),
        )
        .unwrap();
        assert_ne!(idle.field, hovered.field);
    }

    #[test]
    fn test_decoded_accessor_matches_channel_decode() {
        let synthesis = render(&RenderState::new(
            PanelGeometry::new(30.0, 20.0, 5.0),
            &GlassBulge::default(),
        ))
        .unwrap();
        let pixel = synthesis.bitmap.pixel(3, 4).unwrap();
        let [dx, dy] = synthesis.decoded(3, 4).unwrap();
        assert_eq!(dx, decode_channel(pixel.r, synthesis.scale_factor));
        assert_eq!(dy, decode_channel(pixel.g, synthesis.scale_factor));
        assert!(synthesis.decoded(30, 0).is_none());
    }
}
