//! Panel construction parameters

use liquid_compositor::FilterChain;
use liquid_core::{FragmentPreset, HeaderRipple, PanelGeometry, Point, PressBulge};
use liquid_field::SynthesisConfig;
use serde::{Deserialize, Serialize};

use crate::constrain::DEFAULT_INSET;
use crate::error::{PanelError, Result};

/// How a panel's position is owned
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Positioning {
    /// Freely positioned and kept inside the viewport
    #[default]
    Fixed,
    /// Laid out by the host; never reclamped
    Inline,
}

/// When a synthesis request actually runs
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SynthesisMode {
    /// Synthesize inside the handler that requested it
    #[default]
    Immediate,
    /// Mark dirty and synthesize once on the next frame
    Coalesced,
}

/// Button presets
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonSize {
    Sm,
    #[default]
    Md,
    Lg,
}

impl ButtonSize {
    pub fn dimensions(&self) -> (f32, f32) {
        match self {
            ButtonSize::Sm => (120.0, 32.0),
            ButtonSize::Md => (160.0, 40.0),
            ButtonSize::Lg => (180.0, 48.0),
        }
    }
}

/// Card presets
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardSize {
    Sm,
    #[default]
    Md,
    Lg,
}

impl CardSize {
    pub fn dimensions(&self) -> (f32, f32) {
        match self {
            CardSize::Sm => (200.0, 120.0),
            CardSize::Md => (320.0, 180.0),
            CardSize::Lg => (400.0, 240.0),
        }
    }
}

/// Minimum width of an auto-width button
pub const AUTO_WIDTH_MIN: f32 = 200.0;

/// Re-synthesis interval of animated decorations, in milliseconds
pub const DECORATION_TICK_MS: u64 = 100;

/// Intensity multiplier of a hovered card
pub const CARD_HOVER_BOOST: f32 = 1.5;

/// Everything needed to construct a panel
///
/// Custom closure fragments and the position callback are attached to the
/// controller directly since they cannot be serialized.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelConfig {
    pub geometry: PanelGeometry,
    /// Initial top-left corner; `None` centres the panel in the viewport
    pub position: Option<Point>,
    pub draggable: bool,
    pub positioning: Positioning,
    /// Receives pointer enter/leave/move
    pub interactive: bool,
    /// Gap kept from the viewport edge
    pub inset: f32,
    pub fragment: FragmentPreset,
    pub synthesis: SynthesisConfig,
    pub mode: SynthesisMode,
    /// Periodic re-synthesis for animated fragments
    pub tick_interval_ms: Option<u64>,
    /// Pointer snaps back to the centre when it leaves the panel
    pub reset_pointer_on_leave: bool,
    pub filter: FilterChain,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self::panel()
    }
}

impl PanelConfig {
    /// Draggable glass panel, 300×200, centred
    pub fn panel() -> Self {
        Self {
            geometry: PanelGeometry::default(),
            position: None,
            draggable: true,
            positioning: Positioning::Fixed,
            interactive: true,
            inset: DEFAULT_INSET,
            fragment: FragmentPreset::default(),
            synthesis: SynthesisConfig::default(),
            mode: SynthesisMode::Immediate,
            tick_interval_ms: None,
            reset_pointer_on_leave: false,
            filter: FilterChain::panel(),
        }
    }

    /// Glass button with a pill shape
    pub fn button(size: ButtonSize) -> Self {
        let (width, height) = size.dimensions();
        Self {
            geometry: PanelGeometry::new(width, height, height / 2.0),
            draggable: false,
            positioning: Positioning::Inline,
            fragment: FragmentPreset::PressBulge(PressBulge::default()),
            synthesis: SynthesisConfig::new().headroom(0.8),
            reset_pointer_on_leave: true,
            filter: FilterChain::button(),
            ..Self::panel()
        }
    }

    /// Non-interactive animated header decoration
    pub fn decoration(width: f32, height: f32, intensity: f32) -> Self {
        Self {
            geometry: PanelGeometry::new(width, height, 0.0),
            draggable: false,
            positioning: Positioning::Inline,
            interactive: false,
            fragment: FragmentPreset::HeaderRipple(HeaderRipple {
                intensity,
                hover_boost: 1.0,
            }),
            tick_interval_ms: Some(DECORATION_TICK_MS),
            filter: FilterChain::decoration(),
            ..Self::panel()
        }
    }

    /// Card backed by a decoration that intensifies on hover
    pub fn card(size: CardSize) -> Self {
        let (width, height) = size.dimensions();
        let mut config = Self::decoration(width, height, 0.3);
        config.geometry.corner_radius = 16.0;
        config.interactive = true;
        config.fragment = FragmentPreset::HeaderRipple(HeaderRipple {
            intensity: 0.3,
            hover_boost: CARD_HOVER_BOOST,
        });
        config
    }

    pub fn geometry(mut self, geometry: PanelGeometry) -> Self {
        self.geometry = geometry;
        self
    }

    pub fn position(mut self, position: Point) -> Self {
        self.position = Some(position);
        self
    }

    pub fn draggable(mut self, draggable: bool) -> Self {
        self.draggable = draggable;
        self
    }

    pub fn positioning(mut self, positioning: Positioning) -> Self {
        self.positioning = positioning;
        self
    }

    pub fn inset(mut self, inset: f32) -> Self {
        self.inset = inset;
        self
    }

    pub fn fragment(mut self, fragment: FragmentPreset) -> Self {
        self.fragment = fragment;
        self
    }

    pub fn synthesis(mut self, synthesis: SynthesisConfig) -> Self {
        self.synthesis = synthesis;
        self
    }

    pub fn mode(mut self, mode: SynthesisMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn tick_interval_ms(mut self, interval: Option<u64>) -> Self {
        self.tick_interval_ms = interval;
        self
    }

    pub fn filter(mut self, filter: FilterChain) -> Self {
        self.filter = filter;
        self
    }

    /// Widen to at least [`AUTO_WIDTH_MIN`]
    pub fn auto_width(mut self) -> Self {
        self.geometry.width = self.geometry.width.max(AUTO_WIDTH_MIN);
        self
    }

    /// Card or decoration intensity
    pub fn intensity(mut self, intensity: f32) -> Self {
        if let FragmentPreset::HeaderRipple(ripple) = &mut self.fragment {
            ripple.intensity = intensity;
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        self.geometry.validate()?;
        self.synthesis.validate()?;
        if !self.inset.is_finite() || self.inset < 0.0 {
            return Err(PanelError::InvalidConfig {
                name: "inset",
                value: self.inset as f64,
            });
        }
        if self.tick_interval_ms == Some(0) {
            return Err(PanelError::InvalidConfig {
                name: "tick_interval_ms",
                value: 0.0,
            });
        }
        if let FragmentPreset::GlassBulge(bulge) = &self.fragment {
            bulge.validate()?;
        }
        if let FragmentPreset::HeaderRipple(ripple) = &self.fragment {
            if !ripple.intensity.is_finite() || ripple.intensity < 0.0 {
                return Err(PanelError::InvalidConfig {
                    name: "intensity",
                    value: ripple.intensity as f64,
                });
            }
        }
        Ok(())
    }

    /// Tick interval in seconds
    pub fn tick_interval(&self) -> Option<f64> {
        self.tick_interval_ms.map(|ms| ms as f64 / 1000.0)
    }
}
