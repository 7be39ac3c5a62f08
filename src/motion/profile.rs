//! Constant feed motion profile.
//!
//! The emulated axis has no acceleration phase: it starts at the programmed
//! feed rate and stops dead at the target. A profile is therefore fully
//! described by its endpoints and the distance covered per tick.

use core::time::Duration;

use crate::config::units::{Meters, MillimetersPerMinute};

/// Direction of axis travel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Towards larger positions.
    Forward,
    /// Towards smaller positions.
    Reverse,
}

impl Direction {
    /// Direction from `from` to `to`. A zero-length move counts as forward.
    #[inline]
    pub fn between(from: Meters, to: Meters) -> Self {
        if to.0 >= from.0 {
            Direction::Forward
        } else {
            Direction::Reverse
        }
    }

    /// Get the sign multiplier.
    #[inline]
    pub fn sign(self) -> f64 {
        match self {
            Direction::Forward => 1.0,
            Direction::Reverse => -1.0,
        }
    }

    /// Whether `position` has reached or passed `target` travelling this way.
    #[inline]
    pub fn reached(self, position: Meters, target: Meters) -> bool {
        match self {
            Direction::Forward => position.0 >= target.0,
            Direction::Reverse => position.0 <= target.0,
        }
    }
}

/// Computed profile for a single move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionProfile {
    /// Position at the start of the move.
    pub from: Meters,

    /// Position the move ends at.
    pub target: Meters,

    /// Direction of motion.
    pub direction: Direction,

    /// Signed distance advanced per tick.
    pub increment: Meters,
}

impl MotionProfile {
    /// Create a constant feed profile sampled every `tick`.
    pub fn constant_feed(
        from: Meters,
        target: Meters,
        feed: MillimetersPerMinute,
        tick: Duration,
    ) -> Self {
        let direction = Direction::between(from, target);
        let increment = feed.distance_in(tick) * direction.sign();

        Self {
            from,
            target,
            direction,
            increment,
        }
    }

    /// Absolute travel distance.
    #[inline]
    pub fn distance(&self) -> Meters {
        Meters((self.target.0 - self.from.0).abs())
    }

    /// Check if this is a zero-length move.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.distance().0 == 0.0
    }

    /// Number of ticks the move emits, including the final one at the target.
    pub fn tick_count(&self) -> u64 {
        let per_tick = self.increment.0.abs();
        if self.is_zero() || per_tick == 0.0 {
            return 1;
        }
        (self.distance().0 / per_tick).ceil() as u64 + 1
    }

    /// Estimated duration of the move.
    pub fn estimated_duration(&self, tick: Duration) -> Duration {
        tick.saturating_mul(self.tick_count().saturating_sub(1).min(u32::MAX as u64) as u32)
    }
}
