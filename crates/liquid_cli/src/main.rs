//! Liquid CLI
//!
//! Render displacement maps and SVG filters, and replay drags against a
//! headless stage.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use liquid_compositor::{
    encode_png, Compositor, DisplacementMap, FilterIdGenerator, RecordingCompositor, SvgCompositor,
};
use liquid_core::{Point, Uv};
use liquid_field::{render, RenderState};
use liquid_panel::{PanelConfig, Positioning, Stage};
use liquid_platform::{Event, Viewport};
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod config;

use config::{LiquidConfig, Preset, ViewportSection};

#[derive(Parser)]
#[command(name = "liquid")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Liquid glass displacement map tool", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file (defaults to ./liquid.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Synthesize a displacement map once
    Render {
        /// Panel preset
        #[arg(short, long, value_enum)]
        preset: Option<Preset>,

        /// Panel width in logical pixels
        #[arg(long)]
        width: Option<f32>,

        /// Panel height in logical pixels
        #[arg(long)]
        height: Option<f32>,

        /// Normalized pointer position, e.g. 0.25,0.75
        #[arg(long, value_parser = parse_pair)]
        pointer: Option<(f32, f32)>,

        /// Animation time in seconds
        #[arg(short, long, default_value = "0")]
        time: f64,

        /// Render as if the pointer hovers the panel
        #[arg(long)]
        hovered: bool,

        /// Device pixel ratio
        #[arg(long)]
        dpr: Option<f32>,

        /// Write the encoded map as PNG
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Write an SVG document defining the filter
        #[arg(long)]
        svg: Option<PathBuf>,
    },

    /// Drag a panel through a sequence of pointer positions
    Drag {
        /// Viewport size, e.g. 1920x1080
        #[arg(long, value_parser = parse_size)]
        viewport: Option<(f32, f32)>,

        /// Pointer positions to drag through, e.g. 50,50
        #[arg(long = "to", value_parser = parse_pair, required = true, num_args = 1..)]
        to: Vec<(f32, f32)>,
    },

    /// Show the effective configuration
    Info {
        /// Print JSON instead of TOML
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    let mut config = LiquidConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Render {
            preset,
            width,
            height,
            pointer,
            time,
            hovered,
            dpr,
            out,
            svg,
        } => {
            if let Some(preset) = preset {
                config.panel.preset = preset;
            }
            if width.is_some() {
                config.panel.width = width;
            }
            if height.is_some() {
                config.panel.height = height;
            }
            let options = RenderOptions {
                pointer: pointer.map(|(x, y)| Uv::new(x, y)).unwrap_or(Uv::CENTER),
                time,
                hovered,
                dpr,
                out,
                svg,
            };
            cmd_render(&config, options)
        }

        Commands::Drag { viewport, to } => {
            if let Some((width, height)) = viewport {
                config.viewport.width = width;
                config.viewport.height = height;
            }
            cmd_drag(&config, &to)
        }

        Commands::Info { json } => cmd_info(&config, json),
    }
}

struct RenderOptions {
    pointer: Uv,
    time: f64,
    hovered: bool,
    dpr: Option<f32>,
    out: Option<PathBuf>,
    svg: Option<PathBuf>,
}

fn cmd_render(config: &LiquidConfig, options: RenderOptions) -> Result<()> {
    let mut panel = config.panel_config()?;
    if let Some(dpr) = options.dpr {
        panel.synthesis = panel.synthesis.device_pixel_ratio(dpr);
    }

    let fragment = panel.fragment.build();
    info!(
        "Rendering '{}' at {}x{} (dpr {})",
        fragment.name(),
        panel.geometry.width,
        panel.geometry.height,
        panel.synthesis.device_pixel_ratio
    );

    let state = RenderState::new(panel.geometry, fragment.as_ref())
        .pointer(options.pointer)
        .hovered(options.hovered)
        .time(options.time)
        .config(panel.synthesis);
    let synthesis = render(&state).context("Synthesis failed")?;

    let (width, height) = synthesis.bitmap.dimensions();
    println!("Raster:        {}x{}", width, height);
    println!("Max magnitude: {:.4}", synthesis.field.max_magnitude());
    println!("Scale factor:  {:.4}", synthesis.scale_factor);
    println!("Scale:         {:.4}", synthesis.scale);
    println!("Invalid:       {}", synthesis.field.invalid_pixels());
    if synthesis.is_neutral() {
        warn!("Fragment produced no displacement");
    }

    if let Some(out) = &options.out {
        let png = encode_png(&synthesis.bitmap)?;
        fs::write(out, png).with_context(|| format!("Failed to write {}", out.display()))?;
        info!("Map written to {}", out.display());
    }

    if let Some(svg) = &options.svg {
        let compositor = SvgCompositor::new();
        let id = FilterIdGenerator::new().next_id();
        let map = DisplacementMap::from_synthesis(&synthesis, panel.geometry.size(), 1);
        compositor.publish(id, map)?;
        fs::write(svg, compositor.document())
            .with_context(|| format!("Failed to write {}", svg.display()))?;
        info!("Filter written to {}", svg.display());
        println!("backdrop-filter: {}", panel.filter.css(id));
    }

    Ok(())
}

fn cmd_drag(config: &LiquidConfig, targets: &[(f32, f32)]) -> Result<()> {
    let panel = config
        .panel_config()?
        .positioning(Positioning::Fixed)
        .draggable(true);
    let viewport = config.viewport()?;
    let positions = replay_drag(panel, viewport, targets)?;

    for ((x, y), position) in targets.iter().zip(&positions) {
        println!(
            "pointer ({}, {}) -> panel ({}, {})",
            x, y, position.x, position.y
        );
    }
    Ok(())
}

/// Press at the panel centre, move through `targets`, release at the last one
fn replay_drag(panel: PanelConfig, viewport: Viewport, targets: &[(f32, f32)]) -> Result<Vec<Point>> {
    let mut stage = Stage::new(viewport, Arc::new(RecordingCompositor::new()));
    let key = stage.mount(panel)?;

    let start = stage
        .panel(key)
        .map(|p| p.bounds().center())
        .context("Mounted panel missing from stage")?;
    debug!("Starting drag at ({}, {})", start.x, start.y);
    stage.handle_event(&Event::pointer_down(start.x, start.y))?;
    if stage.captured() != Some(key) {
        anyhow::bail!("Panel did not capture the pointer at ({}, {})", start.x, start.y);
    }

    let mut positions = Vec::with_capacity(targets.len());
    for &(x, y) in targets {
        stage.handle_event(&Event::pointer_moved(x, y))?;
        if let Some(panel) = stage.panel(key) {
            positions.push(panel.position());
        }
    }

    let (x, y) = targets.last().copied().unwrap_or((start.x, start.y));
    stage.handle_event(&Event::pointer_up(x, y))?;
    Ok(positions)
}

#[derive(Serialize)]
struct EffectiveConfig<'a> {
    viewport: &'a ViewportSection,
    panel: PanelConfig,
}

fn cmd_info(config: &LiquidConfig, json: bool) -> Result<()> {
    let effective = EffectiveConfig {
        viewport: &config.viewport,
        panel: config.panel_config()?,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&effective)?);
    } else {
        println!("Liquid {}", env!("CARGO_PKG_VERSION"));
        println!();
        println!(
            "{}",
            toml::to_string_pretty(&effective).context("Failed to serialize config")?
        );
    }
    Ok(())
}

/// Parse `x,y`
fn parse_pair(value: &str) -> Result<(f32, f32), String> {
    parse_two(value, ',')
}

/// Parse `WxH`
fn parse_size(value: &str) -> Result<(f32, f32), String> {
    parse_two(value, 'x')
}

fn parse_two(value: &str, separator: char) -> Result<(f32, f32), String> {
    let (a, b) = value
        .split_once(separator)
        .ok_or_else(|| format!("expected two numbers separated by '{separator}'"))?;
    let a: f32 = a.trim().parse().map_err(|e| format!("'{a}': {e}"))?;
    let b: f32 = b.trim().parse().map_err(|e| format!("'{b}': {e}"))?;
    Ok((a, b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pairs() {
        assert_eq!(parse_pair("0.25,0.75"), Ok((0.25, 0.75)));
        assert_eq!(parse_pair(" 50 , 60 "), Ok((50.0, 60.0)));
        assert_eq!(parse_size("1920x1080"), Ok((1920.0, 1080.0)));
        assert!(parse_pair("50").is_err());
        assert!(parse_size("wide x tall").is_err());
    }

    #[test]
    fn test_replay_drag_clamps() {
        let viewport = Viewport::new(1920.0, 1080.0).unwrap();
        let positions = replay_drag(
            PanelConfig::panel(),
            viewport,
            &[(50.0, 50.0), (1900.0, 1000.0), (960.0, 540.0)],
        )
        .unwrap();
        assert_eq!(
            positions,
            vec![
                Point::new(10.0, 10.0),
                Point::new(1610.0, 870.0),
                Point::new(810.0, 440.0)
            ]
        );
    }

    #[test]
    fn test_cli_parses_commands() {
        let cli = Cli::try_parse_from([
            "liquid", "render", "--preset", "button", "--pointer", "0.2,0.8", "--dpr", "2",
        ])
        .unwrap();
        match cli.command {
            Commands::Render {
                preset, pointer, dpr, ..
            } => {
                assert_eq!(preset, Some(Preset::Button));
                assert_eq!(pointer, Some((0.2, 0.8)));
                assert_eq!(dpr, Some(2.0));
            }
            _ => panic!("expected render"),
        }

        let cli = Cli::try_parse_from([
            "liquid", "drag", "--viewport", "800x600", "--to", "1,2", "--to", "3,4",
        ])
        .unwrap();
        match cli.command {
            Commands::Drag { viewport, to } => {
                assert_eq!(viewport, Some((800.0, 600.0)));
                assert_eq!(to, vec![(1.0, 2.0), (3.0, 4.0)]);
            }
            _ => panic!("expected drag"),
        }

        assert!(Cli::try_parse_from(["liquid", "drag"]).is_err());
    }
}
