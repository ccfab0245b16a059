//! Wall-clock abstraction.
//!
//! RULE: Nothing in the engine reads the platform clock directly.
//! Every time-dependent operation takes its "now" from a Clock, so
//! cooldowns and accrual are reproducible under test.

use crate::types::Millis;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

pub trait Clock: Send + Sync {
    /// Current wall-clock time in unix milliseconds.
    fn now_ms(&self) -> Millis;
}

/// Production clock backed by the system time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> Millis {
        chrono::Utc::now().timestamp_millis()
    }
}

/// Hand-driven clock for tests. Clones share the same instant, so a test
/// can keep a handle and advance time while the engine holds another.
#[derive(Debug, Clone)]
pub struct ManualClock(Arc<AtomicI64>);

impl ManualClock {
    pub fn new(start_ms: Millis) -> Self {
        Self(Arc::new(AtomicI64::new(start_ms)))
    }

    pub fn set(&self, now_ms: Millis) {
        self.0.store(now_ms, Ordering::SeqCst);
    }

    pub fn advance(&self, delta_ms: Millis) {
        self.0.fetch_add(delta_ms, Ordering::SeqCst);
    }

    /// Inherent mirror of [`Clock::now_ms`], so callers holding a
    /// concrete handle don't need the trait in scope.
    pub fn now_ms(&self) -> Millis {
        self.0.load(Ordering::SeqCst)
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> Millis {
        self.0.load(Ordering::SeqCst)
    }
}
