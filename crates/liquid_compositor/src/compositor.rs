//! Compositor trait and implementations
//!
//! A compositor owns the filter resources that actually refract the backdrop.
//! Panels only ever hand it complete [`DisplacementMap`]s; it decides how to
//! materialize them.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::debug;

use crate::error::{CompositorError, Result};
use crate::filter::FilterId;
use crate::resource::to_data_uri;
use crate::slot::{DisplacementMap, FilterSlot};

/// Sink for displacement maps
pub trait Compositor: Send + Sync {
    /// The rendering surface can accept maps right now
    fn is_ready(&self) -> bool;

    /// Apply `map` to filter `id`, creating the filter on first use
    ///
    /// Returns `Ok(false)` when the map is older than the one already applied.
    /// Fails with [`CompositorError::Unavailable`] while not ready.
    fn publish(&self, id: FilterId, map: DisplacementMap) -> Result<bool>;

    /// Drop every resource held for `id`
    fn release(&self, id: FilterId);
}

/// Shared, type-erased compositor
pub type SharedCompositor = Arc<dyn Compositor>;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// ─────────────────────────────────────────────────────────────────────────────
// SVG Compositor
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Default)]
struct SvgFilter {
    slot: FilterSlot,
    href: Option<String>,
}

/// Materializes maps as SVG `<filter>` elements
///
/// Each filter pairs an `<feImage>` carrying the map as a PNG data URI with an
/// `<feDisplacementMap>` reading red as the horizontal and green as the
/// vertical offset. Hosts reference a filter through
/// [`FilterChain::css`](crate::FilterChain::css).
pub struct SvgCompositor {
    filters: Mutex<HashMap<FilterId, SvgFilter>>,
    ready: AtomicBool,
}

impl Default for SvgCompositor {
    fn default() -> Self {
        Self {
            filters: Mutex::new(HashMap::new()),
            ready: AtomicBool::new(true),
        }
    }
}

impl SvgCompositor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the surface as (un)available
    pub fn set_ready(&self, ready: bool) {
        self.ready.store(ready, Ordering::Release);
    }

    /// Number of live filters
    pub fn len(&self) -> usize {
        lock(&self.filters).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Map currently applied by `id`
    pub fn current(&self, id: FilterId) -> Option<DisplacementMap> {
        lock(&self.filters)
            .get(&id)
            .and_then(|f| f.slot.current().cloned())
    }

    /// `<filter>` element for `id`
    pub fn markup(&self, id: FilterId) -> Result<String> {
        let filters = lock(&self.filters);
        let filter = filters
            .get(&id)
            .ok_or(CompositorError::UnknownFilter(id))?;
        Ok(filter_markup(id, filter))
    }

    /// Standalone `<svg>` document defining every live filter
    pub fn document(&self) -> String {
        let filters = lock(&self.filters);
        let mut ids: Vec<_> = filters.keys().copied().collect();
        ids.sort();

        let mut svg = String::from(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="0" height="0" style="position:absolute;overflow:hidden"><defs>"#,
        );
        for id in ids {
            if let Some(filter) = filters.get(&id) {
                svg.push_str(&filter_markup(id, filter));
            }
        }
        svg.push_str("</defs></svg>");
        svg
    }
}

fn filter_markup(id: FilterId, filter: &SvgFilter) -> String {
    let (width, height, scale) = filter
        .slot
        .current()
        .map(|m| (m.size.width, m.size.height, m.scale))
        .unwrap_or((0.0, 0.0, 0.0));

    let open = format!(
        r#"<filter id="{id}" filterUnits="userSpaceOnUse" color-interpolation-filters="sRGB" x="0" y="0" width="{width}" height="{height}">"#
    );

    let body = match &filter.href {
        Some(href) => format!(
            r#"<feImage result="{map}" x="0" y="0" width="{width}" height="{height}" preserveAspectRatio="none" href="{href}"/><feDisplacementMap in="SourceGraphic" in2="{map}" scale="{scale}" xChannelSelector="R" yChannelSelector="G"/>"#,
            map = id.map_name(),
        ),
        None => r#"<feOffset in="SourceGraphic" dx="0" dy="0"/>"#.to_string(),
    };

    format!("{open}{body}</filter>")
}

impl Compositor for SvgCompositor {
    fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    fn publish(&self, id: FilterId, map: DisplacementMap) -> Result<bool> {
        if !self.is_ready() {
            return Err(CompositorError::Unavailable);
        }

        // Encode outside the lock; the slot swap below is the only mutation
        let href = if map.is_neutral() {
            None
        } else {
            Some(to_data_uri(&map.bitmap)?)
        };

        let mut filters = lock(&self.filters);
        let filter = filters.entry(id).or_default();
        let generation = map.generation;
        if !filter.slot.publish(map) {
            return Ok(false);
        }
        filter.href = href;
        debug!("Published displacement map for {} (generation {})", id, generation);
        Ok(true)
    }

    fn release(&self, id: FilterId) {
        if lock(&self.filters).remove(&id).is_some() {
            debug!("Released filter {}", id);
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Recording Compositor
// ─────────────────────────────────────────────────────────────────────────────

struct RecordingState {
    ready: bool,
    published: Vec<(FilterId, DisplacementMap)>,
    rejected: usize,
    released: Vec<FilterId>,
    slots: HashMap<FilterId, FilterSlot>,
}

/// Headless compositor that remembers everything it was given
///
/// Clones share the same record, so a test can keep one handle while a panel
/// owns another.
#[derive(Clone)]
pub struct RecordingCompositor {
    state: Arc<Mutex<RecordingState>>,
}

impl Default for RecordingCompositor {
    fn default() -> Self {
        Self {
            state: Arc::new(Mutex::new(RecordingState {
                ready: true,
                published: Vec::new(),
                rejected: 0,
                released: Vec::new(),
                slots: HashMap::new(),
            })),
        }
    }
}

impl RecordingCompositor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_ready(&self, ready: bool) {
        lock(&self.state).ready = ready;
    }

    /// Every applied publish, oldest first
    pub fn published(&self) -> Vec<(FilterId, DisplacementMap)> {
        lock(&self.state).published.clone()
    }

    pub fn publish_count(&self) -> usize {
        lock(&self.state).published.len()
    }

    /// Publishes dropped as stale
    pub fn rejected(&self) -> usize {
        lock(&self.state).rejected
    }

    pub fn released(&self) -> Vec<FilterId> {
        lock(&self.state).released.clone()
    }

    pub fn current(&self, id: FilterId) -> Option<DisplacementMap> {
        lock(&self.state)
            .slots
            .get(&id)
            .and_then(|slot| slot.current().cloned())
    }

    pub fn is_live(&self, id: FilterId) -> bool {
        lock(&self.state).slots.contains_key(&id)
    }
}

impl Compositor for RecordingCompositor {
    fn is_ready(&self) -> bool {
        lock(&self.state).ready
    }

    fn publish(&self, id: FilterId, map: DisplacementMap) -> Result<bool> {
        let mut state = lock(&self.state);
        if !state.ready {
            return Err(CompositorError::Unavailable);
        }
        let applied = state.slots.entry(id).or_default().publish(map.clone());
        if applied {
            state.published.push((id, map));
        } else {
            state.rejected += 1;
        }
        Ok(applied)
    }

    fn release(&self, id: FilterId) {
        let mut state = lock(&self.state);
        state.slots.remove(&id);
        state.released.push(id);
    }
}
