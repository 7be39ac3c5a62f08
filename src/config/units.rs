//! Unit types for physical quantities.
//!
//! Configuration is written in millimetres, millimetres per minute and hertz;
//! motion and emitted samples are in metres. The newtypes keep the two sides
//! from being mixed up.

use core::ops::{Add, Mul, Sub};
use core::time::Duration;

/// Length in millimetres (configuration side).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Millimeters(pub f64);

impl Millimeters {
    /// Create a new Millimeters value.
    #[inline]
    pub const fn new(value: f64) -> Self {
        Self(value)
    }

    /// Get the raw value.
    #[inline]
    pub const fn value(self) -> f64 {
        self.0
    }

    /// Convert to metres.
    #[inline]
    pub fn to_meters(self) -> Meters {
        Meters(self.0 / 1000.0)
    }
}

/// Length in metres (motion and output side).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Meters(pub f64);

impl Meters {
    /// Create a new Meters value.
    #[inline]
    pub const fn new(value: f64) -> Self {
        Self(value)
    }

    /// Get the raw value.
    #[inline]
    pub const fn value(self) -> f64 {
        self.0
    }

    /// Convert to millimetres.
    #[inline]
    pub fn to_millimeters(self) -> Millimeters {
        Millimeters(self.0 * 1000.0)
    }

    /// Larger of two lengths.
    #[inline]
    pub fn max(self, other: Self) -> Self {
        Self(self.0.max(other.0))
    }
}

impl Add for Meters {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Meters {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl Mul<f64> for Meters {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self::Output {
        Self(self.0 * rhs)
    }
}

/// Feed rate in millimetres per minute, the unit machine tools quote.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct MillimetersPerMinute(pub f64);

impl MillimetersPerMinute {
    /// Create a new MillimetersPerMinute value.
    #[inline]
    pub const fn new(value: f64) -> Self {
        Self(value)
    }

    /// Get the raw value.
    #[inline]
    pub const fn value(self) -> f64 {
        self.0
    }

    /// Convert to metres per second.
    #[inline]
    pub fn meters_per_sec(self) -> f64 {
        self.0 / 1000.0 / 60.0
    }

    /// Distance covered in one period.
    #[inline]
    pub fn distance_in(self, period: Duration) -> Meters {
        Meters(self.meters_per_sec() * period.as_secs_f64())
    }
}

/// Frequency in hertz.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Hertz(pub f64);

impl Hertz {
    /// Create a new Hertz value.
    #[inline]
    pub const fn new(value: f64) -> Self {
        Self(value)
    }

    /// Get the raw value.
    #[inline]
    pub const fn value(self) -> f64 {
        self.0
    }

    /// Length of one tick.
    ///
    /// Only meaningful for a validated, strictly positive rate.
    #[inline]
    pub fn period(self) -> Duration {
        Duration::from_secs_f64(1.0 / self.0)
    }
}

/// Extension trait for creating unit types from primitives.
pub trait UnitExt {
    /// Convert to Millimeters.
    fn mm(self) -> Millimeters;
    /// Convert to MillimetersPerMinute.
    fn mm_per_min(self) -> MillimetersPerMinute;
    /// Convert to Hertz.
    fn hz(self) -> Hertz;
}

impl UnitExt for f64 {
    #[inline]
    fn mm(self) -> Millimeters {
        Millimeters(self)
    }

    #[inline]
    fn mm_per_min(self) -> MillimetersPerMinute {
        MillimetersPerMinute(self)
    }

    #[inline]
    fn hz(self) -> Hertz {
        Hertz(self)
    }
}
