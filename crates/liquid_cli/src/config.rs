//! `liquid.toml` handling
//!
//! Every section is optional. Missing values fall back to the preset chosen in
//! `[panel]`, and command-line flags override whatever the file says.
//!
//! ```toml
//! [panel]
//! preset = "button"
//! button_size = "lg"
//!
//! [synthesis]
//! headroom = 0.8
//! device_pixel_ratio = 2.0
//!
//! [viewport]
//! width = 1280
//! height = 720
//!
//! [filter]
//! blur = 4.0
//! ```

use anyhow::{Context, Result};
use clap::ValueEnum;
use liquid_compositor::FilterChain;
use liquid_core::{FragmentPreset, PointerWave};
use liquid_field::SynthesisConfig;
use liquid_panel::{ButtonSize, CardSize, PanelConfig};
use liquid_platform::Viewport;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// File picked up from the working directory when `--config` is not given
pub const CONFIG_FILE: &str = "liquid.toml";

/// Built-in panel kinds
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
    /// Draggable glass panel
    #[default]
    Panel,
    /// Pill-shaped button reacting to the pointer
    Button,
    /// Animated header decoration
    Decoration,
    /// Card that intensifies on hover
    Card,
    /// Panel with no displacement
    Identity,
    /// Panel driven by the pointer wave fragment
    Wave,
}

/// Top-level `liquid.toml` contents
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct LiquidConfig {
    pub panel: PanelSection,
    /// Replaces the preset's synthesis parameters when present
    pub synthesis: Option<SynthesisConfig>,
    pub viewport: ViewportSection,
    /// Replaces the preset's filter chain when present
    pub filter: Option<FilterChain>,
}

/// `[panel]` section
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct PanelSection {
    pub preset: Preset,
    pub button_size: ButtonSize,
    pub card_size: CardSize,
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub corner_radius: Option<f32>,
    /// Decoration and card intensity
    pub intensity: Option<f32>,
    pub inset: Option<f32>,
}

/// `[viewport]` section
#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct ViewportSection {
    pub width: f32,
    pub height: f32,
    pub scale_factor: f64,
}

impl Default for ViewportSection {
    fn default() -> Self {
        Self {
            width: 1920.0,
            height: 1080.0,
            scale_factor: 1.0,
        }
    }
}

impl LiquidConfig {
    /// Load `path`, or `./liquid.toml` if it exists, or the defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from_file(path),
            None => {
                let default = Path::new(CONFIG_FILE);
                if default.exists() {
                    Self::load_from_file(default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_toml(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Resolve the `[panel]`, `[synthesis]` and `[filter]` sections into a
    /// validated panel configuration
    pub fn panel_config(&self) -> Result<PanelConfig> {
        let section = &self.panel;
        let width = section.width.unwrap_or(300.0);
        let height = section.height.unwrap_or(200.0);

        let mut config = match section.preset {
            Preset::Panel => PanelConfig::panel(),
            Preset::Button => PanelConfig::button(section.button_size),
            Preset::Decoration => PanelConfig::decoration(width, height, 0.3),
            Preset::Card => PanelConfig::card(section.card_size),
            Preset::Identity => PanelConfig::panel().fragment(FragmentPreset::Identity),
            Preset::Wave => {
                PanelConfig::panel().fragment(FragmentPreset::PointerWave(PointerWave::default()))
            }
        };

        let mut geometry = config.geometry;
        if let Some(width) = section.width {
            geometry.width = width;
        }
        if let Some(height) = section.height {
            geometry.height = height;
        }
        if let Some(radius) = section.corner_radius {
            geometry.corner_radius = radius;
        }
        config = config.geometry(geometry);

        if let Some(intensity) = section.intensity {
            config = config.intensity(intensity);
        }
        if let Some(inset) = section.inset {
            config = config.inset(inset);
        }
        if let Some(synthesis) = self.synthesis {
            config = config.synthesis(synthesis);
        }
        if let Some(filter) = self.filter {
            config = config.filter(filter);
        }

        config.validate().context("Invalid panel configuration")?;
        Ok(config)
    }

    pub fn viewport(&self) -> Result<Viewport> {
        let viewport = Viewport::new(self.viewport.width, self.viewport.height)
            .and_then(|v| v.with_scale_factor(self.viewport.scale_factor))
            .context("Invalid viewport configuration")?;
        Ok(viewport)
    }

    /// Serialize to TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }
}
