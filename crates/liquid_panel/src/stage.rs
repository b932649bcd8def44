//! Multi-panel host
//!
//! A [`Stage`] owns every mounted panel, the viewport they live in and their
//! animation timers, and turns host [`Event`]s into calls on the right
//! controller:
//!
//! - pointer moves are hit-tested; the topmost interactive panel under the
//!   pointer is hovered, every other one is left
//! - a press on a draggable panel captures the pointer; until the release,
//!   moves and the release go to that panel wherever they happen
//! - viewport resizes reclamp every fixed panel
//! - frame ticks fire due timers and flush coalesced panels
//!
//! Panels are stacked in mount order, the last mounted on top.

use std::sync::Arc;

use liquid_compositor::{FilterIdGenerator, SharedCompositor};
use liquid_core::{Point, SharedClock, SharedFragment, SystemClock};
use liquid_platform::{Event, InputEvent, PointerEvent, Viewport, ViewportEvent};
use slotmap::{new_key_type, SlotMap};
use tracing::{debug, warn};

use crate::config::PanelConfig;
use crate::controller::PanelController;
use crate::error::Result;
use crate::timer::{TimerId, TimerQueue};

new_key_type! {
    /// Handle to a mounted panel
    pub struct PanelKey;
}

struct PanelEntry {
    controller: PanelController,
    timer: Option<TimerId>,
}

/// Host for any number of panels sharing one viewport and compositor
pub struct Stage {
    panels: SlotMap<PanelKey, PanelEntry>,
    order: Vec<PanelKey>,
    ids: FilterIdGenerator,
    viewport: Viewport,
    compositor: SharedCompositor,
    clock: SharedClock,
    timers: TimerQueue<PanelKey>,
    capture: Option<PanelKey>,
}

impl Stage {
    pub fn new(viewport: Viewport, compositor: SharedCompositor) -> Self {
        Self {
            panels: SlotMap::with_key(),
            order: Vec::new(),
            ids: FilterIdGenerator::new(),
            viewport,
            compositor,
            clock: Arc::new(SystemClock::new()),
            timers: TimerQueue::new(),
            capture: None,
        }
    }

    /// Clock handed to every panel mounted afterwards
    pub fn with_clock(mut self, clock: SharedClock) -> Self {
        self.clock = clock;
        self
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mounting
    // ─────────────────────────────────────────────────────────────────────────

    /// Mount a panel on top of the stack and run its first synthesis pass
    pub fn mount(&mut self, config: PanelConfig) -> Result<PanelKey> {
        self.mount_inner(config, None)
    }

    /// Mount a panel driven by a custom fragment
    pub fn mount_with_fragment(
        &mut self,
        config: PanelConfig,
        fragment: SharedFragment,
    ) -> Result<PanelKey> {
        self.mount_inner(config, Some(fragment))
    }

    fn mount_inner(
        &mut self,
        mut config: PanelConfig,
        fragment: Option<SharedFragment>,
    ) -> Result<PanelKey> {
        // Panels render at the stage's density, not whatever the preset carried
        config.synthesis = config
            .synthesis
            .device_pixel_ratio(self.viewport.scale_factor() as f32);
        let id = self.ids.next_id();
        let mut controller = PanelController::new(
            config,
            id,
            Arc::clone(&self.compositor),
            self.viewport.size(),
        )?
        .with_clock(Arc::clone(&self.clock));
        if let Some(fragment) = fragment {
            controller = controller.with_fragment(fragment);
        }

        if let Err(err) = controller.invalidate() {
            warn!("Initial synthesis failed for {}: {}", id, err);
        }

        let interval = controller.tick_interval();
        let key = self.panels.insert(PanelEntry {
            controller,
            timer: None,
        });
        if let Some(interval) = interval {
            let timer = self.timers.add(key, interval, self.clock.now());
            if let Some(entry) = self.panels.get_mut(key) {
                entry.timer = Some(timer);
            }
        }
        self.order.push(key);
        debug!("Mounted panel {} ({} on stage)", id, self.panels.len());
        Ok(key)
    }

    /// Remove a panel, its timer and any pointer capture it holds
    pub fn unmount(&mut self, key: PanelKey) -> bool {
        let Some(mut entry) = self.panels.remove(key) else {
            return false;
        };
        if let Some(timer) = entry.timer {
            self.timers.remove(timer);
        }
        if self.capture == Some(key) {
            self.capture = None;
        }
        self.order.retain(|k| *k != key);
        entry.controller.dispose();
        true
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn panel(&self, key: PanelKey) -> Option<&PanelController> {
        self.panels.get(key).map(|e| &e.controller)
    }

    pub fn panel_mut(&mut self, key: PanelKey) -> Option<&mut PanelController> {
        self.panels.get_mut(key).map(|e| &mut e.controller)
    }

    /// Panel keys bottom to top
    pub fn keys(&self) -> &[PanelKey] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.panels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Panel currently holding the pointer capture
    pub fn captured(&self) -> Option<PanelKey> {
        self.capture
    }

    /// Active interval timers
    pub fn timer_count(&self) -> usize {
        self.timers.len()
    }

    /// Topmost interactive panel containing `point`
    pub fn hit_test(&self, point: Point) -> Option<PanelKey> {
        self.order.iter().rev().copied().find(|key| {
            self.panels
                .get(*key)
                .map(|e| e.controller.is_interactive() && e.controller.bounds().contains(point))
                .unwrap_or(false)
        })
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Event Routing
    // ─────────────────────────────────────────────────────────────────────────

    /// Route one host event
    ///
    /// Only a malformed viewport event is an error; synthesis problems are
    /// logged by the panels themselves.
    pub fn handle_event(&mut self, event: &Event) -> Result<()> {
        match event {
            Event::Viewport(viewport) => self.handle_viewport(viewport)?,
            Event::Input(InputEvent::Pointer(pointer)) => self.handle_pointer(pointer),
            Event::Frame { now } => self.handle_frame(*now),
        }
        Ok(())
    }

    fn handle_viewport(&mut self, event: &ViewportEvent) -> Result<()> {
        if !self.viewport.apply(event)? {
            return Ok(());
        }
        match *event {
            ViewportEvent::Resized { .. } => {
                let size = self.viewport.size();
                debug!("Viewport resized to {}x{}", size.width, size.height);
                for entry in self.panels.values_mut() {
                    entry.controller.resize_viewport(size);
                }
            }
            ViewportEvent::ScaleFactorChanged { scale_factor } => {
                for entry in self.panels.values_mut() {
                    if let Err(err) = entry.controller.set_scale_factor(scale_factor as f32) {
                        warn!(
                            "Scale factor change failed for {}: {}",
                            entry.controller.filter_id(),
                            err
                        );
                    }
                }
            }
        }
        Ok(())
    }

    fn handle_pointer(&mut self, event: &PointerEvent) {
        match *event {
            PointerEvent::Moved { x, y } => {
                let point = Point::new(x, y);
                match self.capture {
                    Some(key) => {
                        if let Some(entry) = self.panels.get_mut(key) {
                            entry.controller.pointer_move(point);
                        }
                    }
                    None => self.update_hover(Some(point)),
                }
            }
            PointerEvent::ButtonPressed { button, x, y } => {
                if !button.is_primary() || self.capture.is_some() {
                    return;
                }
                let point = Point::new(x, y);
                self.update_hover(Some(point));
                if let Some(key) = self.hit_test(point) {
                    let captured = self
                        .panels
                        .get_mut(key)
                        .map(|e| e.controller.pointer_down(point))
                        .unwrap_or(false);
                    if captured {
                        self.capture = Some(key);
                    }
                }
            }
            PointerEvent::ButtonReleased { button, x, y } => {
                if !button.is_primary() {
                    return;
                }
                if let Some(key) = self.capture.take() {
                    if let Some(entry) = self.panels.get_mut(key) {
                        entry.controller.pointer_up();
                    }
                }
                self.update_hover(Some(Point::new(x, y)));
            }
            PointerEvent::Left => {
                if self.capture.is_none() {
                    self.update_hover(None);
                }
            }
        }
    }

    /// Deliver enter/leave/move so only the topmost panel under `point` is hovered
    fn update_hover(&mut self, point: Option<Point>) {
        let target = point.and_then(|p| self.hit_test(p));

        for key in self.order.clone() {
            let Some(entry) = self.panels.get_mut(key) else {
                continue;
            };
            let controller = &mut entry.controller;
            if Some(key) == target {
                if let Some(point) = point {
                    if !controller.state().is_hovered() {
                        controller.pointer_enter(point);
                    }
                    controller.pointer_move(point);
                }
            } else if controller.state().is_hovered() {
                controller.pointer_leave();
            }
        }
    }

    fn handle_frame(&mut self, now: f64) {
        for key in self.timers.advance(now) {
            if let Some(entry) = self.panels.get_mut(key) {
                entry.controller.tick();
            }
        }
        for entry in self.panels.values_mut() {
            entry.controller.frame();
        }
    }
}

impl Drop for Stage {
    fn drop(&mut self) {
        let keys: Vec<_> = self.order.drain(..).collect();
        for key in keys {
            self.unmount(key);
        }
    }
}
