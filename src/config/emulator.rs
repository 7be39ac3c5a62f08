//! Axis emulator configuration.

use core::time::Duration;

use super::noise::NoiseConfig;
use super::units::{Hertz, Meters, Millimeters, MillimetersPerMinute};

/// Shape of the bidirectional measurement campaign.
#[derive(Debug, Clone, PartialEq)]
pub struct CampaignConfig {
    /// Start of the travel range; the axis also begins here.
    pub start: Millimeters,

    /// Last measurement point (inclusive).
    pub end: Millimeters,

    /// Spacing between measurement points.
    pub step: Millimeters,

    /// Approach/retract repetitions at each point.
    pub cycles_per_point: u32,

    /// Stationary time at a measurement point.
    pub dwell_at_point: Duration,

    /// Stationary time after a retract (and at the reversal position).
    pub dwell_after_retract: Duration,
}

impl CampaignConfig {
    /// Start of the range in metres.
    #[inline]
    pub fn start_m(&self) -> Meters {
        self.start.to_meters()
    }

    /// End of the range in metres.
    #[inline]
    pub fn end_m(&self) -> Meters {
        self.end.to_meters()
    }

    /// Point spacing in metres.
    #[inline]
    pub fn step_m(&self) -> Meters {
        self.step.to_meters()
    }
}

impl Default for CampaignConfig {
    fn default() -> Self {
        Self {
            start: Millimeters(0.0),
            end: Millimeters(100.0),
            step: Millimeters(20.0),
            cycles_per_point: 5,
            dwell_at_point: Duration::from_secs(10),
            dwell_after_retract: Duration::from_secs(2),
        }
    }
}

/// Complete axis emulator configuration.
///
/// Noise parameters are in millimetres, like the rest of the configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct EmulatorConfig {
    /// Campaign layout.
    pub campaign: CampaignConfig,

    /// Constant traversal speed during moves.
    pub feed_rate: MillimetersPerMinute,

    /// Samples per second, while moving and while dwelling.
    pub sample_rate: Hertz,

    /// Per-sample measurement noise.
    pub measurement_noise: NoiseConfig,

    /// Per-dwell stop position error.
    pub stop_error: NoiseConfig,

    /// Decimal places kept in the emitted distance.
    pub precision: u32,
}

impl EmulatorConfig {
    /// Measurement noise in metres.
    pub fn measurement_noise_m(&self) -> NoiseConfig {
        self.measurement_noise.scaled(1e-3)
    }

    /// Stop error in metres.
    pub fn stop_error_m(&self) -> NoiseConfig {
        self.stop_error.scaled(1e-3)
    }

    /// Configuration with every noise source switched off.
    pub fn noiseless(mut self) -> Self {
        self.measurement_noise = NoiseConfig::none();
        self.stop_error = NoiseConfig::none();
        self
    }
}

impl Default for EmulatorConfig {
    fn default() -> Self {
        Self {
            campaign: CampaignConfig::default(),
            feed_rate: MillimetersPerMinute(200.0),
            sample_rate: Hertz(30.0),
            measurement_noise: NoiseConfig::symmetric(0.002, 0.002),
            stop_error: NoiseConfig::symmetric(0.05, 0.05),
            precision: 12,
        }
    }
}
