//! Wall-clock pacing of sample ticks.
//!
//! Deadlines are accumulated from an anchor (`deadline += period`) instead of
//! being recomputed from "now", so per-tick processing cost never drifts the
//! long-run sample rate. Sleeping goes through embedded-hal's [`DelayNs`], which
//! lets tests substitute a [`VirtualClock`] that advances time instantly.

use core::time::Duration;
use std::time::Instant;

use embedded_hal::delay::DelayNs;

/// Monotonic time source that can also block.
pub trait Clock: DelayNs {
    /// Time elapsed since an arbitrary, fixed epoch.
    fn now(&self) -> Duration;

    /// Block for `duration`.
    ///
    /// `DelayNs::delay_ns` takes a `u32`, so long waits are split into
    /// millisecond and nanosecond parts.
    fn sleep(&mut self, duration: Duration) {
        let millis = duration.as_millis();
        let rest = duration.subsec_nanos() % 1_000_000;
        if millis > 0 {
            self.delay_ms(millis.min(u32::MAX as u128) as u32);
        }
        if rest > 0 {
            self.delay_ns(rest);
        }
    }
}

/// Real time: `Instant` for reading, `thread::sleep` for waiting.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    epoch: Instant,
}

impl SystemClock {
    /// Create a clock whose epoch is now.
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl DelayNs for SystemClock {
    fn delay_ns(&mut self, ns: u32) {
        std::thread::sleep(Duration::from_nanos(ns as u64));
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.epoch.elapsed()
    }
}

/// Simulated time that only moves when someone sleeps.
///
/// A run paced by this clock produces exactly the sample sequence of a real
/// run, without waiting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VirtualClock {
    now: Duration,
}

impl VirtualClock {
    /// Create a clock at time zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Move time forward without sleeping, e.g. to model processing cost.
    pub fn advance(&mut self, by: Duration) {
        self.now += by;
    }
}

impl DelayNs for VirtualClock {
    fn delay_ns(&mut self, ns: u32) {
        self.now += Duration::from_nanos(ns as u64);
    }
}

impl Clock for VirtualClock {
    fn now(&self) -> Duration {
        self.now
    }
}

/// Fixed-rate tick scheduler.
#[derive(Debug, Clone, Copy)]
pub struct Ticker {
    period: Duration,
    started: Duration,
    next_deadline: Duration,
}

impl Ticker {
    /// Anchor a ticker at the clock's current time.
    pub fn start<C: Clock>(clock: &C, period: Duration) -> Self {
        let now = clock.now();
        Self {
            period,
            started: now,
            next_deadline: now,
        }
    }

    /// Tick period.
    #[inline]
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Time since the ticker was anchored.
    pub fn elapsed<C: Clock>(&self, clock: &C) -> Duration {
        clock.now().saturating_sub(self.started)
    }

    /// Advance the deadline by one period and sleep until it, if it is still
    /// in the future. Returns the time slept.
    pub fn wait<C: Clock>(&mut self, clock: &mut C) -> Duration {
        self.next_deadline += self.period;
        let residual = self.next_deadline.saturating_sub(clock.now());
        if !residual.is_zero() {
            clock.sleep(residual);
        }
        residual
    }
}
