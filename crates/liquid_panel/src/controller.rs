//! Single panel lifecycle
//!
//! A [`PanelController`] owns one panel's geometry, position, pointer state
//! and last synthesized displacement map. Every mutation that can change the
//! field (pointer moves on pointer-sensitive fragments, geometry changes,
//! timer ticks) goes through [`PanelController::invalidate`], which
//! re-synthesizes synchronously and publishes the result as one bitmap + scale
//! pair.
//!
//! Event methods never return errors. A failed pass is logged and the
//! compositor keeps showing the last good map.

use std::sync::Arc;

use liquid_compositor::{DisplacementMap, FilterId, SharedCompositor};
use liquid_core::{
    Fragment, PanelGeometry, Point, Rect, SharedClock, SharedFragment, Size, SystemClock, Uv,
};
use liquid_field::{render, RenderState, Synthesis};
use smallvec::SmallVec;
use tracing::{debug, trace, warn};

use crate::config::{PanelConfig, Positioning, SynthesisMode};
use crate::constrain::{centered_position, constrain_position, drag_position};
use crate::error::Result;
use crate::state::{pointer_events, PanelState, StateTransitions};

/// Called with the new top-left corner whenever the position changes
pub type PositionCallback = Arc<dyn Fn(Point) + Send + Sync>;

/// Controller for one glass panel
pub struct PanelController {
    filter_id: FilterId,
    config: PanelConfig,
    fragment: SharedFragment,
    compositor: SharedCompositor,
    clock: SharedClock,
    viewport: Size,
    position: Point,
    state: PanelState,
    pointer: Uv,
    dirty: bool,
    generation: u64,
    last_synthesis: Option<Arc<Synthesis>>,
    listeners: SmallVec<[PositionCallback; 2]>,
    disposed: bool,
}

impl PanelController {
    /// Create a controller for a panel shown in `viewport`
    ///
    /// Nothing is synthesized until the first [`invalidate`](Self::invalidate).
    pub fn new(
        config: PanelConfig,
        filter_id: FilterId,
        compositor: SharedCompositor,
        viewport: Size,
    ) -> Result<Self> {
        config.validate()?;

        let size = config.geometry.size();
        let position = match (config.position, config.positioning) {
            (Some(position), Positioning::Inline) => position,
            (None, Positioning::Inline) => Point::ZERO,
            (position, Positioning::Fixed) => constrain_position(
                position.unwrap_or_else(|| centered_position(size, viewport)),
                size,
                viewport,
                config.inset,
            ),
        };

        let fragment = config.fragment.build();
        debug!(
            "Created panel {} ({}x{}, fragment '{}') at ({}, {})",
            filter_id,
            config.geometry.width,
            config.geometry.height,
            fragment.name(),
            position.x,
            position.y
        );

        Ok(Self {
            filter_id,
            config,
            fragment,
            compositor,
            clock: Arc::new(SystemClock::new()),
            viewport,
            position,
            state: PanelState::Idle,
            pointer: Uv::CENTER,
            dirty: true,
            generation: 0,
            last_synthesis: None,
            listeners: SmallVec::new(),
            disposed: false,
        })
    }

    /// Replace the configured fragment with a custom one
    pub fn with_fragment(mut self, fragment: SharedFragment) -> Self {
        self.fragment = fragment;
        self.dirty = true;
        self
    }

    /// Read animation time from `clock`
    pub fn with_clock(mut self, clock: SharedClock) -> Self {
        self.clock = clock;
        self
    }

    /// Register a position-change callback
    pub fn on_position_change<F>(&mut self, callback: F)
    where
        F: Fn(Point) + Send + Sync + 'static,
    {
        self.listeners.push(Arc::new(callback));
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn filter_id(&self) -> FilterId {
        self.filter_id
    }

    pub fn config(&self) -> &PanelConfig {
        &self.config
    }

    pub fn geometry(&self) -> PanelGeometry {
        self.config.geometry
    }

    pub fn fragment(&self) -> &dyn Fragment {
        self.fragment.as_ref()
    }

    pub fn position(&self) -> Point {
        self.position
    }

    /// Bounding box in viewport coordinates
    pub fn bounds(&self) -> Rect {
        self.config.geometry.bounds_at(self.position)
    }

    pub fn state(&self) -> PanelState {
        self.state
    }

    /// Last pointer coordinate, normalized to the panel
    pub fn pointer(&self) -> Uv {
        self.pointer
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    /// Result of the last pass that reached the compositor
    pub fn last_synthesis(&self) -> Option<&Synthesis> {
        self.last_synthesis.as_deref()
    }

    /// Number of passes handed to the compositor
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// A synthesis request is pending
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn is_interactive(&self) -> bool {
        self.config.interactive && !self.disposed
    }

    /// Periodic re-synthesis interval in seconds
    pub fn tick_interval(&self) -> Option<f64> {
        self.config.tick_interval()
    }

    /// `backdrop-filter` value hosts apply to the panel element
    pub fn backdrop_filter_css(&self) -> String {
        self.config.filter.css(self.filter_id)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Synthesis
    // ─────────────────────────────────────────────────────────────────────────

    /// Request a fresh displacement map
    ///
    /// In [`SynthesisMode::Immediate`] the pass runs before this returns. In
    /// [`SynthesisMode::Coalesced`] the panel is only marked dirty and the next
    /// [`frame`](Self::frame) runs one pass for any number of requests.
    pub fn invalidate(&mut self) -> Result<bool> {
        if self.disposed {
            return Ok(false);
        }
        self.dirty = true;
        match self.config.mode {
            SynthesisMode::Immediate => self.flush(),
            SynthesisMode::Coalesced => Ok(false),
        }
    }

    /// Run a pending pass, if any
    ///
    /// Returns `true` when a new map was published.
    pub fn flush(&mut self) -> Result<bool> {
        if !self.dirty || self.disposed {
            return Ok(false);
        }

        if !self.compositor.is_ready() {
            debug!(
                "Rendering surface unavailable, keeping last map for {}",
                self.filter_id
            );
            return Ok(false);
        }

        let state = RenderState::new(self.config.geometry, self.fragment.as_ref())
            .pointer(self.pointer)
            .hovered(self.state.is_hovered())
            .time(self.clock.now())
            .config(self.config.synthesis);
        let synthesis = match render(&state) {
            Ok(synthesis) => synthesis,
            Err(err) => {
                // Retried on the next trigger, not every frame
                self.dirty = false;
                return Err(err.into());
            }
        };

        let map = DisplacementMap::from_synthesis(
            &synthesis,
            self.config.geometry.size(),
            self.generation + 1,
        );
        let applied = match self.compositor.publish(self.filter_id, map) {
            Ok(applied) => applied,
            Err(liquid_compositor::CompositorError::Unavailable) => {
                debug!("Compositor went away mid-pass for {}", self.filter_id);
                return Ok(false);
            }
            Err(err) => return Err(err.into()),
        };

        self.generation += 1;
        self.dirty = false;
        self.last_synthesis = Some(Arc::new(synthesis));
        trace!("Panel {} at generation {}", self.filter_id, self.generation);
        Ok(applied)
    }

    /// Frame tick: flush any pending pass, whether coalesced or left over
    /// from a surface that was not ready
    pub fn frame(&mut self) {
        self.log_failure(|panel| panel.flush());
    }

    /// Timer tick for animated fragments
    pub fn tick(&mut self) {
        self.log_failure(|panel| panel.invalidate());
    }

    fn refresh_if_pointer_sensitive(&mut self) {
        if self.fragment.pointer_sensitive() {
            self.log_failure(|panel| panel.invalidate());
        }
    }

    fn log_failure(&mut self, pass: impl FnOnce(&mut Self) -> Result<bool>) {
        if let Err(err) = pass(self) {
            warn!("Synthesis failed for {}: {}", self.filter_id, err);
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Pointer Input
    // ─────────────────────────────────────────────────────────────────────────

    fn transition(&mut self, event: u32) -> bool {
        match self.state.on_event(event) {
            Some(next) => {
                trace!("Panel {}: {:?} -> {:?}", self.filter_id, self.state, next);
                self.state = next;
                true
            }
            None => false,
        }
    }

    /// Pointer entered the panel bounds
    pub fn pointer_enter(&mut self, client: Point) {
        if !self.is_interactive() {
            return;
        }
        if self.transition(pointer_events::POINTER_ENTER) {
            self.pointer = Uv::from_client(client, self.bounds());
            self.refresh_if_pointer_sensitive();
        }
    }

    /// Pointer left the panel bounds
    pub fn pointer_leave(&mut self) {
        if !self.is_interactive() {
            return;
        }
        if self.transition(pointer_events::POINTER_LEAVE) {
            if self.config.reset_pointer_on_leave {
                self.pointer = Uv::CENTER;
            }
            self.refresh_if_pointer_sensitive();
        }
    }

    /// Pointer moved to `client`
    ///
    /// Ignored unless hovering or dragging. While dragging the panel follows
    /// the pointer, centred on it and kept inside the viewport.
    pub fn pointer_move(&mut self, client: Point) {
        if !self.is_interactive() || !self.state.tracks_pointer() {
            return;
        }

        self.pointer = Uv::from_client(client, self.bounds());

        if self.state.is_dragging() {
            let size = self.config.geometry.size();
            let target = drag_position(client, size);
            let next = match self.config.positioning {
                Positioning::Fixed => {
                    constrain_position(target, size, self.viewport, self.config.inset)
                }
                Positioning::Inline => target,
            };
            self.move_to(next);
        }

        self.refresh_if_pointer_sensitive();
    }

    /// Pointer pressed at `client`
    ///
    /// Returns `true` when the press started a drag, i.e. the panel is
    /// draggable and `client` is inside its bounds. The caller then routes all
    /// moves and the release to this panel until [`pointer_up`](Self::pointer_up).
    pub fn pointer_down(&mut self, client: Point) -> bool {
        if !self.is_interactive() || !self.config.draggable {
            return false;
        }
        if !self.bounds().contains(client) {
            return false;
        }
        if !self.transition(pointer_events::POINTER_DOWN) {
            return false;
        }
        self.pointer = Uv::from_client(client, self.bounds());
        self.refresh_if_pointer_sensitive();
        true
    }

    /// Pointer released, wherever it is
    pub fn pointer_up(&mut self) {
        if self.disposed {
            return;
        }
        if self.transition(pointer_events::POINTER_UP) {
            self.refresh_if_pointer_sensitive();
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Geometry & Position
    // ─────────────────────────────────────────────────────────────────────────

    fn move_to(&mut self, position: Point) -> bool {
        if position == self.position {
            return false;
        }
        self.position = position;
        for listener in &self.listeners {
            listener(position);
        }
        true
    }

    fn reclamp(&mut self) -> bool {
        if self.config.positioning != Positioning::Fixed {
            return false;
        }
        let clamped = constrain_position(
            self.position,
            self.config.geometry.size(),
            self.viewport,
            self.config.inset,
        );
        self.move_to(clamped)
    }

    /// Place the panel, clamped for fixed panels
    ///
    /// Returns `true` if the position changed.
    pub fn set_position(&mut self, position: Point) -> bool {
        if self.disposed {
            return false;
        }
        let position = match self.config.positioning {
            Positioning::Fixed => constrain_position(
                position,
                self.config.geometry.size(),
                self.viewport,
                self.config.inset,
            ),
            Positioning::Inline => position,
        };
        self.move_to(position)
    }

    /// Viewport changed size
    ///
    /// Fixed panels are reclamped; listeners hear about it only if the
    /// position actually moved. The field itself does not depend on the
    /// viewport and is left alone.
    pub fn resize_viewport(&mut self, viewport: Size) -> bool {
        if self.disposed {
            return false;
        }
        self.viewport = viewport;
        let moved = self.reclamp();
        if moved {
            debug!(
                "Panel {} reclamped to ({}, {})",
                self.filter_id, self.position.x, self.position.y
            );
        }
        moved
    }

    /// Device pixel ratio changed
    pub fn set_scale_factor(&mut self, scale_factor: f32) -> Result<()> {
        let synthesis = self.config.synthesis.device_pixel_ratio(scale_factor);
        synthesis.validate()?;
        self.config.synthesis = synthesis;
        self.invalidate()?;
        Ok(())
    }

    /// Resize the panel itself
    pub fn set_geometry(&mut self, geometry: PanelGeometry) -> Result<()> {
        geometry.validate()?;
        if geometry == self.config.geometry {
            return Ok(());
        }
        self.config.geometry = geometry;
        self.reclamp();
        self.invalidate()?;
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Lifecycle
    // ─────────────────────────────────────────────────────────────────────────

    /// Release the compositor resource; later events are ignored
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        self.dirty = false;
        self.listeners.clear();
        self.compositor.release(self.filter_id);
        debug!("Disposed panel {}", self.filter_id);
    }
}

impl Drop for PanelController {
    fn drop(&mut self) {
        self.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ButtonSize;
    use liquid_compositor::RecordingCompositor;
    use liquid_core::{fragment_fn, FragmentEnv, FragmentPreset, ManualClock};
    use std::sync::Mutex;

    const VIEWPORT: Size = Size::new(1920.0, 1080.0);

    fn controller(config: PanelConfig) -> (PanelController, RecordingCompositor) {
        let recorder = RecordingCompositor::new();
        let panel = PanelController::new(
            config,
            FilterId::from_raw(1),
            Arc::new(recorder.clone()),
            VIEWPORT,
        )
        .unwrap();
        (panel, recorder)
    }

    fn record_positions(panel: &mut PanelController) -> Arc<Mutex<Vec<Point>>> {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        panel.on_position_change(move |p| sink.lock().unwrap().push(p));
        seen
    }

    #[test]
    fn test_default_panel_is_centered() {
        let (panel, _) = controller(PanelConfig::panel());
        assert_eq!(panel.position(), Point::new(810.0, 440.0));
        assert_eq!(panel.bounds(), Rect::new(810.0, 440.0, 300.0, 200.0));
        assert_eq!(panel.state(), PanelState::Idle);
        assert!(panel.is_dirty());
    }

    #[test]
    fn test_initial_position_is_constrained() {
        let (panel, _) = controller(PanelConfig::panel().position(Point::new(-50.0, 5000.0)));
        assert_eq!(panel.position(), Point::new(10.0, 870.0));
    }

    #[test]
    fn test_invalidate_publishes() {
        let (mut panel, recorder) = controller(PanelConfig::panel());
        assert!(panel.invalidate().unwrap());
        assert_eq!(recorder.publish_count(), 1);

        let map = recorder.current(FilterId::from_raw(1)).unwrap();
        let synthesis = panel.last_synthesis().unwrap();
        assert_eq!(map.scale, synthesis.scale);
        assert_eq!(*map.bitmap, synthesis.bitmap);
        assert_eq!(map.size, Size::new(300.0, 200.0));
        assert_eq!(panel.generation(), 1);
        assert!(!panel.is_dirty());
    }

    #[test]
    fn test_drag_scenario() {
        let (mut panel, _) = controller(PanelConfig::panel());
        let seen = record_positions(&mut panel);

        let center = panel.bounds().center();
        panel.pointer_enter(center);
        assert!(panel.pointer_down(center));
        assert_eq!(panel.state(), PanelState::Dragging);

        panel.pointer_move(Point::new(50.0, 50.0));
        assert_eq!(panel.position(), Point::new(10.0, 10.0));

        panel.pointer_move(Point::new(1900.0, 1000.0));
        assert_eq!(panel.position(), Point::new(1610.0, 870.0));

        panel.pointer_up();
        assert_eq!(panel.state(), PanelState::Idle);

        // Moves after release no longer drag
        panel.pointer_move(Point::new(500.0, 500.0));
        assert_eq!(panel.position(), Point::new(1610.0, 870.0));

        assert_eq!(
            *seen.lock().unwrap(),
            vec![Point::new(10.0, 10.0), Point::new(1610.0, 870.0)]
        );
    }

    #[test]
    fn test_pointer_down_outside_or_not_draggable() {
        let (mut panel, _) = controller(PanelConfig::panel());
        assert!(!panel.pointer_down(Point::new(0.0, 0.0)));
        assert_eq!(panel.state(), PanelState::Idle);

        let (mut button, _) = controller(PanelConfig::button(ButtonSize::Md));
        let inside = button.bounds().center();
        button.pointer_enter(inside);
        assert!(!button.pointer_down(inside));
        assert_eq!(button.state(), PanelState::Hovering);
    }

    #[test]
    fn test_resize_reclamps_and_notifies_on_change() {
        let (mut panel, _) = controller(PanelConfig::panel().position(Point::new(1600.0, 860.0)));
        let seen = record_positions(&mut panel);

        // Still fits: no change, no notification
        assert!(!panel.resize_viewport(Size::new(1920.0, 1080.0)));
        assert!(seen.lock().unwrap().is_empty());

        assert!(panel.resize_viewport(Size::new(1280.0, 720.0)));
        assert_eq!(panel.position(), Point::new(970.0, 510.0));

        // Too small: pinned to the inset
        assert!(panel.resize_viewport(Size::new(200.0, 150.0)));
        assert_eq!(panel.position(), Point::new(10.0, 10.0));

        assert_eq!(seen.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_inline_panels_are_not_reclamped() {
        let config = PanelConfig::button(ButtonSize::Md).position(Point::new(1900.0, 1000.0));
        let (mut button, _) = controller(config);
        assert_eq!(button.position(), Point::new(1900.0, 1000.0));
        assert!(!button.resize_viewport(Size::new(800.0, 600.0)));
        assert_eq!(button.position(), Point::new(1900.0, 1000.0));
    }

    #[test]
    fn test_pointer_insensitive_fragment_skips_synthesis() {
        let (mut panel, recorder) = controller(PanelConfig::panel());
        panel.invalidate().unwrap();

        let center = panel.bounds().center();
        panel.pointer_enter(center);
        panel.pointer_move(Point::new(center.x + 20.0, center.y));
        panel.pointer_leave();

        assert_eq!(recorder.publish_count(), 1);
        assert!((panel.pointer().x - (170.0 / 300.0)).abs() < 1e-5);
    }

    #[test]
    fn test_pointer_sensitive_fragment_resynthesizes() {
        let (mut button, recorder) = controller(PanelConfig::button(ButtonSize::Md));
        button.invalidate().unwrap();

        let origin = button.position();
        button.pointer_enter(Point::new(origin.x + 40.0, origin.y + 10.0));
        assert_eq!(button.pointer(), Uv::new(0.25, 0.25));
        button.pointer_move(Point::new(origin.x + 120.0, origin.y + 30.0));
        assert_eq!(button.pointer(), Uv::new(0.75, 0.75));
        assert_eq!(recorder.publish_count(), 3);

        // Buttons snap the pointer back to the centre on leave
        button.pointer_leave();
        assert_eq!(button.pointer(), Uv::CENTER);
        assert_eq!(recorder.publish_count(), 4);

        let generations: Vec<u64> = recorder
            .published()
            .iter()
            .map(|(_, map)| map.generation)
            .collect();
        assert_eq!(generations, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_coalesced_mode_flushes_once_per_frame() {
        let config = PanelConfig::button(ButtonSize::Md).mode(SynthesisMode::Coalesced);
        let (mut button, recorder) = controller(config);
        let origin = button.position();

        button.pointer_enter(Point::new(origin.x + 10.0, origin.y + 10.0));
        for i in 0..20 {
            button.pointer_move(Point::new(origin.x + 10.0 + i as f32, origin.y + 10.0));
        }
        assert_eq!(recorder.publish_count(), 0);
        assert!(button.is_dirty());

        button.frame();
        assert_eq!(recorder.publish_count(), 1);
        button.frame();
        assert_eq!(recorder.publish_count(), 1);
    }

    #[test]
    fn test_unavailable_surface_keeps_last_good_map() {
        let (mut panel, recorder) = controller(PanelConfig::panel());
        panel.invalidate().unwrap();
        let good = recorder.current(FilterId::from_raw(1)).unwrap();

        recorder.set_ready(false);
        panel.set_geometry(PanelGeometry::new(200.0, 100.0, 20.0)).unwrap();
        assert!(panel.is_dirty());
        assert_eq!(recorder.current(FilterId::from_raw(1)).unwrap(), good);

        // Next frame retries without a fresh trigger
        recorder.set_ready(true);
        panel.frame();
        assert!(!panel.is_dirty());
        let fresh = recorder.current(FilterId::from_raw(1)).unwrap();
        assert_eq!(fresh.size, Size::new(200.0, 100.0));
        assert_eq!(fresh.generation, 2);
    }

    #[test]
    fn test_panicking_fragment_keeps_last_map() {
        let (panel, recorder) = controller(PanelConfig::panel());
        let calls = Arc::new(Mutex::new(0usize));
        let counter = Arc::clone(&calls);
        let broken = fragment_fn(move |uv: Uv, pointer: Uv, _e: &FragmentEnv| {
            *counter.lock().unwrap() += 1;
            if pointer.x < 0.1 {
                panic!("pointer too far left");
            }
            uv
        })
        .with_pointer(true)
        .named("broken");
        let mut panel = panel.with_fragment(Arc::new(broken));

        panel.invalidate().unwrap();
        let good = recorder.current(FilterId::from_raw(1)).unwrap();

        let origin = panel.position();
        panel.pointer_enter(Point::new(origin.x + 1.0, origin.y + 100.0));
        assert!(!panel.is_dirty());
        assert_eq!(recorder.current(FilterId::from_raw(1)).unwrap(), good);
        assert_eq!(panel.generation(), 1);

        // Not retried on the next frame
        let after_failure = *calls.lock().unwrap();
        panel.frame();
        assert_eq!(*calls.lock().unwrap(), after_failure);
    }

    #[test]
    fn test_animated_fragment_reads_injected_clock() {
        let clock = ManualClock::new(0.0);
        let (panel, _) = controller(PanelConfig::decoration(40.0, 20.0, 0.5));
        let mut panel = panel.with_clock(Arc::new(clock.clone()));

        panel.invalidate().unwrap();
        let first = panel.last_synthesis().unwrap().field.clone();

        // Same instant, same field
        panel.tick();
        assert_eq!(panel.last_synthesis().unwrap().field, first);

        clock.advance(0.75);
        panel.tick();
        assert_ne!(panel.last_synthesis().unwrap().field, first);
    }

    #[test]
    fn test_custom_fragment() {
        let (panel, recorder) = controller(PanelConfig::panel().geometry(PanelGeometry::new(
            20.0, 10.0, 0.0,
        )));
        let shift = fragment_fn(|uv: Uv, _p: Uv, _e: &FragmentEnv| Uv::new(uv.x + 0.1, uv.y));
        let mut panel = panel.with_fragment(Arc::new(shift));
        panel.invalidate().unwrap();

        let synthesis = panel.last_synthesis().unwrap();
        assert!((synthesis.field.max_magnitude() - 2.0).abs() < 1e-4);
        assert!((synthesis.scale - 1.0).abs() < 1e-4);
        assert_eq!(recorder.publish_count(), 1);
    }

    #[test]
    fn test_identity_panel_publishes_neutral_map() {
        let config = PanelConfig::panel().fragment(FragmentPreset::Identity);
        let (mut panel, recorder) = controller(config);
        panel.invalidate().unwrap();
        let map = recorder.current(FilterId::from_raw(1)).unwrap();
        assert_eq!(map.scale, 0.0);
        assert!(map.bitmap.is_neutral());
    }

    #[test]
    fn test_scale_factor_change() {
        let (mut panel, _) = controller(PanelConfig::panel().geometry(PanelGeometry::new(
            30.0, 20.0, 5.0,
        )));
        panel.set_scale_factor(2.0).unwrap();
        assert_eq!(
            panel.last_synthesis().unwrap().bitmap.dimensions(),
            (60, 40)
        );
        assert!(panel.set_scale_factor(0.0).is_err());
        assert_eq!(panel.config().synthesis.device_pixel_ratio, 2.0);
    }

    #[test]
    fn test_dispose_releases_and_ignores_events() {
        let (mut panel, recorder) = controller(PanelConfig::panel());
        let seen = record_positions(&mut panel);
        panel.invalidate().unwrap();

        panel.dispose();
        assert!(panel.is_disposed());
        assert_eq!(recorder.released(), vec![FilterId::from_raw(1)]);
        assert!(!recorder.is_live(FilterId::from_raw(1)));

        assert!(!panel.invalidate().unwrap());
        let center = panel.bounds().center();
        panel.pointer_enter(center);
        assert!(!panel.pointer_down(center));
        assert!(!panel.set_position(Point::new(100.0, 100.0)));
        assert_eq!(recorder.publish_count(), 1);
        assert!(seen.lock().unwrap().is_empty());

        // Dropping after dispose does not release twice
        drop(panel);
        assert_eq!(recorder.released().len(), 1);
    }

    #[test]
    fn test_backdrop_filter_css() {
        let (panel, _) = controller(PanelConfig::panel());
        assert_eq!(
            panel.backdrop_filter_css(),
            "url(#liquid-glass-1) blur(0.25px) contrast(1.2) brightness(1.05) saturate(1.1)"
        );
    }
}
