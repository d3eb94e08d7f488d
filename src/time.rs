//! Wall-clock access and countdowns.
//!
//! Game logic never reads the clock itself: every operation takes `now_ms`
//! (epoch milliseconds) from a [`Clock`], so accrual and timers are fully
//! deterministic under test.

use std::cell::Cell;

/// Source of "now" in epoch milliseconds.
pub trait Clock {
    fn now_ms(&self) -> u64;
}

/// Real clock: `Date.now()` in the browser, `SystemTime` elsewhere.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    #[cfg(target_arch = "wasm32")]
    fn now_ms(&self) -> u64 {
        js_sys::Date::now() as u64
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn now_ms(&self) -> u64 {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}

/// Hand-driven clock for tests and replays.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<u64>,
}

impl ManualClock {
    pub fn new(now_ms: u64) -> Self {
        Self {
            now: Cell::new(now_ms),
        }
    }

    pub fn set(&self, now_ms: u64) {
        self.now.set(now_ms);
    }

    pub fn advance(&self, ms: u64) {
        self.now.set(self.now.get() + ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.get()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_ms(&self) -> u64 {
        (**self).now_ms()
    }
}

/// Fixed-length wall-clock countdown.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Countdown {
    started_at: u64,
    duration_ms: u64,
}

impl Countdown {
    pub fn start(now_ms: u64, duration_ms: u64) -> Self {
        Self {
            started_at: now_ms,
            duration_ms,
        }
    }

    /// Milliseconds left, 0 once expired. A clock that went backwards counts
    /// as no time elapsed.
    pub fn remaining_ms(&self, now_ms: u64) -> u64 {
        let elapsed = now_ms.saturating_sub(self.started_at);
        self.duration_ms.saturating_sub(elapsed)
    }

    /// Whole seconds left, rounded up (what a timer label shows).
    pub fn remaining_secs(&self, now_ms: u64) -> u64 {
        self.remaining_ms(now_ms).div_ceil(1000)
    }

    pub fn is_expired(&self, now_ms: u64) -> bool {
        self.remaining_ms(now_ms) == 0
    }
}
