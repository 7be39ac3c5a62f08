//! Configuration for the motionless variants: noise stream and sensor poller.

use core::time::Duration;

use super::noise::NoiseConfig;
use super::units::Hertz;

/// Statistical noise stream settings. Values are in metres.
#[derive(Debug, Clone, PartialEq)]
pub struct NoiseStreamConfig {
    /// Distribution of emitted distances.
    pub distribution: NoiseConfig,

    /// Time between samples.
    pub interval: Duration,

    /// Stop after this many samples; run until cancelled when `None`.
    pub limit: Option<u64>,

    /// Decimal places kept in the emitted distance.
    pub precision: u32,
}

impl Default for NoiseStreamConfig {
    fn default() -> Self {
        Self {
            distribution: NoiseConfig {
                mean: 0.055,
                sigma: 0.018,
                low: 0.01,
                high: 0.099999,
            },
            interval: Duration::from_millis(200),
            limit: None,
            precision: 6,
        }
    }
}

/// Sensor polling loop settings.
#[derive(Debug, Clone, PartialEq)]
pub struct PollerConfig {
    /// Poll rate.
    pub sample_rate: Hertz,

    /// Stop after this many samples; run until cancelled when `None`.
    pub limit: Option<u64>,

    /// Decimal places kept in the emitted distance.
    pub precision: u32,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            sample_rate: Hertz(30.0),
            limit: None,
            precision: 6,
        }
    }
}
