//! Interval timers driven by frame ticks
//!
//! Timers never fire on their own. Each frame the host reports the current
//! time and [`TimerQueue::advance`] returns the owners whose interval has
//! elapsed. A timer that fell behind fires once and re-anchors on the current
//! frame instead of replaying every missed interval.

use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;
use tracing::trace;

new_key_type! {
    /// Handle to a registered interval timer
    pub struct TimerId;
}

#[derive(Debug, Clone, Copy)]
struct IntervalTimer<K> {
    owner: K,
    interval: f64,
    next_due: f64,
}

/// Set of interval timers keyed by owner
#[derive(Debug)]
pub struct TimerQueue<K: Copy> {
    timers: SlotMap<TimerId, IntervalTimer<K>>,
}

impl<K: Copy> Default for TimerQueue<K> {
    fn default() -> Self {
        Self {
            timers: SlotMap::with_key(),
        }
    }
}

impl<K: Copy + PartialEq> TimerQueue<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a timer firing every `interval` seconds, first at `now + interval`
    pub fn add(&mut self, owner: K, interval: f64, now: f64) -> TimerId {
        self.timers.insert(IntervalTimer {
            owner,
            interval,
            next_due: now + interval,
        })
    }

    pub fn remove(&mut self, id: TimerId) -> bool {
        self.timers.remove(id).is_some()
    }

    /// Drop every timer belonging to `owner`
    pub fn remove_owner(&mut self, owner: K) -> usize {
        let before = self.timers.len();
        self.timers.retain(|_, timer| timer.owner != owner);
        before - self.timers.len()
    }

    /// Owners whose timer is due at `now`
    pub fn advance(&mut self, now: f64) -> SmallVec<[K; 4]> {
        let mut due = SmallVec::new();
        for (_, timer) in self.timers.iter_mut() {
            if now < timer.next_due {
                continue;
            }
            due.push(timer.owner);
            timer.next_due += timer.interval;
            if timer.next_due <= now {
                trace!("Timer fell behind by {:.3}s, re-anchoring", now - timer.next_due);
                timer.next_due = now + timer.interval;
            }
        }
        due
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }
}
