//! Fragment functions
//!
//! A fragment maps a surface coordinate and the pointer coordinate (both
//! normalized to the panel) to the coordinate the backdrop should be sampled
//! from. It is the per-pixel program that shapes the glass.
//!
//! ```rust
//! use liquid_core::fragment::{Fragment, FragmentEnv, GlassBulge};
//! use liquid_core::geometry::Uv;
//!
//! let env = FragmentEnv::default();
//! let bulge = GlassBulge::default();
//!
//! // The centre is a fixed point of the bulge
//! let sample = bulge.sample(Uv::CENTER, Uv::CENTER, &env);
//! assert_eq!(sample, Uv::CENTER);
//! ```
//!
//! Fragments declare up front whether they read the pointer or the time.
//! Panels use those flags to decide when a pointer move or a timer tick has
//! to re-synthesize the field; a fragment that lies about them is simply not
//! refreshed.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::geometry::{SampleResult, Size, Uv};
use crate::sdf::{rounded_rect_sdf, smooth_step, vector_length};

/// Per-pass inputs shared by every pixel
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FragmentEnv {
    /// Animation time in seconds, read once per synthesis pass
    pub time: f64,
    /// Pointer is over the panel (or dragging it)
    pub hovered: bool,
    /// Logical size of the panel being shaded
    pub size: Size,
}

impl Default for FragmentEnv {
    fn default() -> Self {
        Self {
            time: 0.0,
            hovered: false,
            size: Size::new(300.0, 200.0),
        }
    }
}

impl FragmentEnv {
    pub fn at_time(time: f64) -> Self {
        Self {
            time,
            ..Self::default()
        }
    }

    pub fn hovered(mut self, hovered: bool) -> Self {
        self.hovered = hovered;
        self
    }

    pub fn with_size(mut self, size: Size) -> Self {
        self.size = size;
        self
    }

    /// `time * rate` in radians, reduced to `[0, 2π)` before narrowing
    ///
    /// Fragments feed this to `sin`/`cos` instead of multiplying an `f32`
    /// time, which loses millisecond resolution after a few hours.
    pub fn phase(&self, rate: f32) -> f32 {
        (self.time * rate as f64).rem_euclid(std::f64::consts::TAU) as f32
    }
}

/// Per-pixel sampling program
pub trait Fragment: Send + Sync {
    /// Coordinate to sample for surface position `uv`
    ///
    /// Returning a non-finite coordinate marks the pixel as invalid; the
    /// synthesizer then leaves that pixel undisplaced.
    fn sample(&self, uv: Uv, pointer: Uv, env: &FragmentEnv) -> SampleResult;

    /// Output depends on the pointer position or hover state
    fn pointer_sensitive(&self) -> bool {
        false
    }

    /// Output depends on [`FragmentEnv::time`]
    fn time_dependent(&self) -> bool {
        false
    }

    /// Short name for logs
    fn name(&self) -> &str {
        "custom"
    }
}

/// Shared, type-erased fragment
pub type SharedFragment = Arc<dyn Fragment>;

// ─────────────────────────────────────────────────────────────────────────────
// Pointer Influence
// ─────────────────────────────────────────────────────────────────────────────

/// How strongly the pointer drags the sample position
///
/// `offset = (pointer - 0.5) * base * (hovered ? hovered_weight : idle_weight)`
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PointerInfluence {
    pub base: f32,
    pub hovered_weight: f32,
    pub idle_weight: f32,
}

impl PointerInfluence {
    /// Same weight whether hovered or not
    pub const fn uniform(weight: f32) -> Self {
        Self {
            base: 1.0,
            hovered_weight: weight,
            idle_weight: weight,
        }
    }

    pub const fn hover(hovered_weight: f32, idle_weight: f32) -> Self {
        Self {
            base: 1.0,
            hovered_weight,
            idle_weight,
        }
    }

    pub fn scaled(mut self, base: f32) -> Self {
        self.base = base;
        self
    }

    pub fn weight(&self, hovered: bool) -> f32 {
        self.base
            * if hovered {
                self.hovered_weight
            } else {
                self.idle_weight
            }
    }

    pub fn offset(&self, pointer: Uv, hovered: bool) -> (f32, f32) {
        let weight = self.weight(hovered);
        ((pointer.x - 0.5) * weight, (pointer.y - 0.5) * weight)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Built-in Fragments
// ─────────────────────────────────────────────────────────────────────────────

/// Leaves every pixel where it is
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Identity;

impl Fragment for Identity {
    fn sample(&self, uv: Uv, _pointer: Uv, _env: &FragmentEnv) -> SampleResult {
        uv
    }

    fn name(&self) -> &str {
        "identity"
    }
}

/// Default magnifying bulge
///
/// Inside the rounded rectangle the sample position is left alone; moving
/// out through the fade band it is pulled progressively towards the centre,
/// so the rim of the panel shows a compressed view of the backdrop. The
/// distance is smoothed twice so the fade band does not band.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GlassBulge {
    pub half_width: f32,
    pub half_height: f32,
    pub radius: f32,
    /// Distance over which the bulge fades out
    pub falloff: f32,
    /// Shifts the fade band outwards from the shape boundary
    pub edge_offset: f32,
}

impl Default for GlassBulge {
    fn default() -> Self {
        Self {
            half_width: 0.3,
            half_height: 0.2,
            radius: 0.6,
            falloff: 0.8,
            edge_offset: 0.15,
        }
    }
}

impl GlassBulge {
    pub fn validate(&self) -> Result<()> {
        if !(self.falloff.is_finite() && self.falloff != 0.0) {
            return Err(CoreError::InvalidParameter {
                name: "falloff",
                value: self.falloff,
            });
        }
        Ok(())
    }
}

impl Fragment for GlassBulge {
    fn sample(&self, uv: Uv, _pointer: Uv, _env: &FragmentEnv) -> SampleResult {
        let (ix, iy) = uv.centered();
        let distance = rounded_rect_sdf(ix, iy, self.half_width, self.half_height, self.radius);
        let displacement = smooth_step(self.falloff, 0.0, distance - self.edge_offset);
        let scaled = smooth_step(0.0, 1.0, displacement);
        Uv::new(ix * scaled + 0.5, iy * scaled + 0.5)
    }

    fn name(&self) -> &str {
        "glass-bulge"
    }
}

/// Button bulge that leans towards the pointer and ripples over time
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PressBulge {
    pub influence: PointerInfluence,
    /// Ripple amplitude in normalized units
    pub ripple: f32,
    /// How much of the centre is pulled in (0 = none, 1 = all)
    pub strength: f32,
}

impl Default for PressBulge {
    fn default() -> Self {
        Self {
            influence: PointerInfluence::hover(0.08, 0.03),
            ripple: 0.005,
            strength: 0.3,
        }
    }
}

impl Fragment for PressBulge {
    fn sample(&self, uv: Uv, pointer: Uv, env: &FragmentEnv) -> SampleResult {
        let (ix, iy) = uv.centered();
        let (mx, my) = self.influence.offset(pointer, env.hovered);

        let distance = rounded_rect_sdf(ix, iy, 0.45, 0.35, 0.4);
        let displacement = smooth_step(0.1, -0.1, distance);
        let scaled = smooth_step(0.0, 1.0, displacement * 0.5);

        let ripple = (env.phase(2.0) + vector_length(ix, iy) * 8.0).sin() * self.ripple;
        let pull = 1.0 - scaled * self.strength;

        Uv::new(
            ix * pull + mx + ripple + 0.5,
            iy * pull + my + ripple + 0.5,
        )
    }

    fn pointer_sensitive(&self) -> bool {
        true
    }

    fn time_dependent(&self) -> bool {
        self.ripple != 0.0
    }

    fn name(&self) -> &str {
        "press-bulge"
    }
}

/// Slow travelling waves for decorative headers and cards
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct HeaderRipple {
    pub intensity: f32,
    /// Intensity multiplier applied while hovered
    pub hover_boost: f32,
}

impl Default for HeaderRipple {
    fn default() -> Self {
        Self {
            intensity: 0.3,
            hover_boost: 1.0,
        }
    }
}

impl HeaderRipple {
    pub fn new(intensity: f32) -> Result<Self> {
        if !intensity.is_finite() || intensity < 0.0 {
            return Err(CoreError::InvalidParameter {
                name: "intensity",
                value: intensity,
            });
        }
        Ok(Self {
            intensity,
            hover_boost: 1.0,
        })
    }

    pub fn hover_boost(mut self, boost: f32) -> Self {
        self.hover_boost = boost;
        self
    }

    pub fn effective_intensity(&self, hovered: bool) -> f32 {
        if hovered {
            self.intensity * self.hover_boost
        } else {
            self.intensity
        }
    }
}

impl Fragment for HeaderRipple {
    fn sample(&self, uv: Uv, pointer: Uv, env: &FragmentEnv) -> SampleResult {
        let (ix, iy) = uv.centered();
        let intensity = self.effective_intensity(env.hovered);
        let (mx, my) = PointerInfluence::uniform(0.05)
            .scaled(intensity)
            .offset(pointer, env.hovered);

        let wave_x = (env.phase(0.8) + ix * 3.0).sin() * 0.008 * intensity;
        let wave_y = (env.phase(1.2) + iy * 4.0).cos() * 0.006 * intensity;
        let radial = smooth_step(0.5, 0.0, vector_length(ix, iy)) * 0.02 * intensity;

        Uv::new(
            ix + mx + wave_x + radial + 0.5,
            iy + my + wave_y + radial + 0.5,
        )
    }

    fn pointer_sensitive(&self) -> bool {
        true
    }

    fn time_dependent(&self) -> bool {
        true
    }

    fn name(&self) -> &str {
        "header-ripple"
    }
}

/// Concentric wave that follows the pointer
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PointerWave {
    pub influence: PointerInfluence,
    pub amplitude: f32,
    pub frequency: f32,
    pub speed: f32,
}

impl Default for PointerWave {
    fn default() -> Self {
        Self {
            influence: PointerInfluence::uniform(0.1),
            amplitude: 0.02,
            frequency: 10.0,
            speed: 2.0,
        }
    }
}

impl Fragment for PointerWave {
    fn sample(&self, uv: Uv, pointer: Uv, env: &FragmentEnv) -> SampleResult {
        let (ix, iy) = uv.centered();
        let (mx, my) = self.influence.offset(pointer, env.hovered);
        let wave =
            (env.phase(self.speed) + vector_length(ix, iy) * self.frequency).sin() * self.amplitude;
        Uv::new(ix + mx + wave + 0.5, iy + my + wave + 0.5)
    }

    fn pointer_sensitive(&self) -> bool {
        true
    }

    fn time_dependent(&self) -> bool {
        self.amplitude != 0.0
    }

    fn name(&self) -> &str {
        "pointer-wave"
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Closure Fragments
// ─────────────────────────────────────────────────────────────────────────────

/// Fragment backed by a closure
///
/// The capability flags default to `false` and must be set by the author;
/// nothing inspects the closure to guess them.
pub struct FnFragment<F> {
    func: F,
    pointer_sensitive: bool,
    time_dependent: bool,
    name: String,
}

/// Wrap a closure as a fragment
///
/// ```rust
/// use liquid_core::fragment::{fragment_fn, Fragment, FragmentEnv};
/// use liquid_core::geometry::Uv;
///
/// let shift = fragment_fn(|uv: Uv, pointer: Uv, _env: &FragmentEnv| {
///     Uv::new(uv.x + (pointer.x - 0.5) * 0.1, uv.y)
/// })
/// .with_pointer(true);
///
/// assert!(shift.pointer_sensitive());
/// ```
pub fn fragment_fn<F>(func: F) -> FnFragment<F>
where
    F: Fn(Uv, Uv, &FragmentEnv) -> Uv + Send + Sync,
{
    FnFragment {
        func,
        pointer_sensitive: false,
        time_dependent: false,
        name: "custom".to_string(),
    }
}

impl<F> FnFragment<F> {
    pub fn with_pointer(mut self, sensitive: bool) -> Self {
        self.pointer_sensitive = sensitive;
        self
    }

    pub fn with_time(mut self, dependent: bool) -> Self {
        self.time_dependent = dependent;
        self
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

impl<F> Fragment for FnFragment<F>
where
    F: Fn(Uv, Uv, &FragmentEnv) -> Uv + Send + Sync,
{
    fn sample(&self, uv: Uv, pointer: Uv, env: &FragmentEnv) -> SampleResult {
        (self.func)(uv, pointer, env)
    }

    fn pointer_sensitive(&self) -> bool {
        self.pointer_sensitive
    }

    fn time_dependent(&self) -> bool {
        self.time_dependent
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl<F> fmt::Debug for FnFragment<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnFragment")
            .field("name", &self.name)
            .field("pointer_sensitive", &self.pointer_sensitive)
            .field("time_dependent", &self.time_dependent)
            .finish()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Presets
// ─────────────────────────────────────────────────────────────────────────────

/// Serializable choice of built-in fragment
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FragmentPreset {
    Identity,
    GlassBulge(GlassBulge),
    PressBulge(PressBulge),
    HeaderRipple(HeaderRipple),
    PointerWave(PointerWave),
}

impl Default for FragmentPreset {
    fn default() -> Self {
        FragmentPreset::GlassBulge(GlassBulge::default())
    }
}

impl FragmentPreset {
    /// Instantiate the fragment
    pub fn build(&self) -> SharedFragment {
        match *self {
            FragmentPreset::Identity => Arc::new(Identity),
            FragmentPreset::GlassBulge(f) => Arc::new(f),
            FragmentPreset::PressBulge(f) => Arc::new(f),
            FragmentPreset::HeaderRipple(f) => Arc::new(f),
            FragmentPreset::PointerWave(f) => Arc::new(f),
        }
    }

    /// Look up a preset by name with default parameters
    pub fn by_name(name: &str) -> Option<Self> {
        match name {
            "identity" => Some(FragmentPreset::Identity),
            "glass-bulge" | "bulge" | "panel" => Some(Self::default()),
            "press-bulge" | "button" => Some(FragmentPreset::PressBulge(PressBulge::default())),
            "header-ripple" | "decoration" => {
                Some(FragmentPreset::HeaderRipple(HeaderRipple::default()))
            }
            "pointer-wave" | "wave" => Some(FragmentPreset::PointerWave(PointerWave::default())),
            _ => None,
        }
    }
}
