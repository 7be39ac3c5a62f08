//! Motion execution - per-tick position stepping.

use crate::config::units::Meters;

use super::profile::MotionProfile;

/// One sampling tick of a move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveTick {
    /// Axis position to sample at this tick.
    pub position: Meters,
    /// Set on the final tick, emitted at the snapped target.
    pub last: bool,
}

/// Runtime state during a move.
///
/// Yields the current position, then advances by one increment, clamping at
/// the target. Once the target is reached the exact target is yielded one
/// last time and the iterator is exhausted.
#[derive(Debug, Clone)]
pub struct LinearMove {
    /// The profile being executed.
    profile: MotionProfile,

    /// Position to report at the next tick.
    position: Meters,

    /// Ticks yielded so far.
    ticks: u64,

    done: bool,
}

impl LinearMove {
    /// Create a new executor for a motion profile.
    pub fn new(profile: MotionProfile) -> Self {
        Self {
            position: profile.from,
            profile,
            ticks: 0,
            done: false,
        }
    }

    /// Check if motion is complete.
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.done
    }

    /// Ticks yielded so far.
    #[inline]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Get the motion profile.
    #[inline]
    pub fn profile(&self) -> &MotionProfile {
        &self.profile
    }

    /// Get progress as a fraction (0.0 to 1.0).
    pub fn progress(&self) -> f64 {
        let total = self.profile.distance().0;
        if total == 0.0 {
            return if self.done { 1.0 } else { 0.0 };
        }
        ((self.position.0 - self.profile.from.0).abs() / total).min(1.0)
    }
}

impl Iterator for LinearMove {
    type Item = MoveTick;

    fn next(&mut self) -> Option<MoveTick> {
        if self.done {
            return None;
        }
        self.ticks += 1;

        let target = self.profile.target;
        let direction = self.profile.direction;

        if direction.reached(self.position, target) {
            self.position = target;
            self.done = true;
            return Some(MoveTick {
                position: target,
                last: true,
            });
        }

        let current = self.position;
        self.position = self.position + self.profile.increment;
        // Overshoot protection; an increment lost to rounding also snaps
        if direction.reached(self.position, target) || self.position == current {
            self.position = target;
        }

        Some(MoveTick {
            position: current,
            last: false,
        })
    }
}
