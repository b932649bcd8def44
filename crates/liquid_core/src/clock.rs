//! Time sources for animated fragments
//!
//! Fragments never read the wall clock themselves. The synthesizer asks a
//! [`Clock`] once per pass and hands the value to every pixel through
//! [`FragmentEnv`](crate::fragment::FragmentEnv), so a whole field is shaded
//! at a single instant and tests can freeze time.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Source of animation time, in seconds
pub trait Clock: Send + Sync {
    /// Seconds elapsed since the clock's origin
    fn now(&self) -> f64;
}

/// Monotonic clock anchored at its creation
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }
}

/// Manually driven clock
///
/// Clones share the same time value, so a test can keep one handle and give
/// another to a panel.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    bits: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new(seconds: f64) -> Self {
        Self {
            bits: Arc::new(AtomicU64::new(seconds.to_bits())),
        }
    }

    /// Jump to an absolute time
    pub fn set(&self, seconds: f64) {
        self.bits.store(seconds.to_bits(), Ordering::Release);
    }

    /// Move time forward by `seconds`
    pub fn advance(&self, seconds: f64) {
        self.set(self.now() + seconds);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> f64 {
        f64::from_bits(self.bits.load(Ordering::Acquire))
    }
}

/// Shared clock handle
pub type SharedClock = Arc<dyn Clock>;
