//! Configuration validation.

use core::time::Duration;

use crate::error::{ConfigError, Error, Result};

use super::{CampaignConfig, EmulatorConfig, NoiseConfig, NoiseStreamConfig, PollerConfig};

/// Validate an emulator configuration.
///
/// Checks:
/// - Step is positive and the range is not reversed
/// - Sample rate gives a representable, non-zero tick period
/// - Feed rate advances the axis by a non-zero distance per tick
/// - At least one cycle per point
/// - Both noise windows are well formed
pub fn validate_config(config: &EmulatorConfig) -> Result<()> {
    validate_campaign(&config.campaign)?;

    let tick = validate_sample_rate(config.sample_rate.value())?;

    let feed = config.feed_rate.value();
    if !(feed.is_finite() && feed > 0.0) || config.feed_rate.distance_in(tick).value() == 0.0 {
        return Err(Error::Config(ConfigError::InvalidFeedRate(feed)));
    }

    validate_noise(&config.measurement_noise)?;
    validate_noise(&config.stop_error)?;

    Ok(())
}

/// Validate a noise stream configuration.
pub fn validate_noise_stream(config: &NoiseStreamConfig) -> Result<()> {
    validate_noise(&config.distribution)?;

    if config.interval.is_zero() {
        return Err(Error::Config(ConfigError::InvalidDuration(0.0)));
    }

    Ok(())
}

/// Validate a poller configuration.
pub fn validate_poller(config: &PollerConfig) -> Result<()> {
    validate_sample_rate(config.sample_rate.value()).map(|_| ())
}

/// Convert user-supplied seconds into a `Duration`.
///
/// # Errors
///
/// Returns `ConfigError::InvalidDuration` for negative, NaN or infinite input.
pub fn duration_from_secs(secs: f64) -> Result<Duration> {
    Duration::try_from_secs_f64(secs).map_err(|_| Error::Config(ConfigError::InvalidDuration(secs)))
}

fn validate_campaign(campaign: &CampaignConfig) -> Result<()> {
    let step = campaign.step.value();
    if !(step.is_finite() && step > 0.0) {
        return Err(Error::Config(ConfigError::InvalidStep(step)));
    }

    let (start, end) = (campaign.start.value(), campaign.end.value());
    if !(start.is_finite() && end.is_finite()) || start > end {
        return Err(Error::Config(ConfigError::InvalidRange { start, end }));
    }

    if campaign.cycles_per_point == 0 {
        return Err(Error::Config(ConfigError::InvalidCycles(0)));
    }

    Ok(())
}

/// Tick period of `hz`, rejecting rates whose period overflows `Duration` or
/// rounds down to zero.
fn validate_sample_rate(hz: f64) -> Result<Duration> {
    let invalid = || Error::Config(ConfigError::InvalidSampleRate(hz));
    if !(hz.is_finite() && hz > 0.0) {
        return Err(invalid());
    }
    match Duration::try_from_secs_f64(1.0 / hz) {
        Ok(period) if !period.is_zero() => Ok(period),
        _ => Err(invalid()),
    }
}

fn validate_noise(noise: &NoiseConfig) -> Result<()> {
    if !noise.is_valid() {
        return Err(Error::Config(ConfigError::InvalidNoise {
            sigma: noise.sigma,
            low: noise.low,
            high: noise.high,
        }));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::units::UnitExt;

    #[test]
    fn test_default_is_valid() {
        assert!(validate_config(&EmulatorConfig::default()).is_ok());
        assert!(validate_noise_stream(&NoiseStreamConfig::default()).is_ok());
        assert!(validate_poller(&PollerConfig::default()).is_ok());
    }

    #[test]
    fn test_invalid_step() {
        let mut config = EmulatorConfig::default();
        config.campaign.step = 0.0.mm();

        let result = validate_config(&config);
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::InvalidStep(_)))
        ));
    }

    #[test]
    fn test_reversed_range() {
        let mut config = EmulatorConfig::default();
        config.campaign.start = 50.0.mm();
        config.campaign.end = 10.0.mm();

        assert!(matches!(
            validate_config(&config),
            Err(Error::Config(ConfigError::InvalidRange { .. }))
        ));
    }

    #[test]
    fn test_zero_feed_and_rate() {
        let mut config = EmulatorConfig::default();
        config.feed_rate = 0.0.mm_per_min();
        assert!(matches!(
            validate_config(&config),
            Err(Error::Config(ConfigError::InvalidFeedRate(_)))
        ));

        let mut config = EmulatorConfig::default();
        config.sample_rate = (-1.0).hz();
        assert!(matches!(
            validate_config(&config),
            Err(Error::Config(ConfigError::InvalidSampleRate(_)))
        ));
    }

    #[test]
    fn test_sample_rate_period_bounds() {
        let mut config = EmulatorConfig::default();
        config.sample_rate = 1e-21.hz();
        assert!(matches!(
            validate_config(&config),
            Err(Error::Config(ConfigError::InvalidSampleRate(_)))
        ));

        config.sample_rate = 1e10.hz();
        assert!(matches!(
            validate_config(&config),
            Err(Error::Config(ConfigError::InvalidSampleRate(_)))
        ));

        let poller = PollerConfig {
            sample_rate: 1e10.hz(),
            ..PollerConfig::default()
        };
        assert!(validate_poller(&poller).is_err());

        config.sample_rate = 1e6.hz();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_feed_too_slow_to_move() {
        let mut config = EmulatorConfig::default();
        config.feed_rate = 1e-320.mm_per_min();
        assert!(matches!(
            validate_config(&config),
            Err(Error::Config(ConfigError::InvalidFeedRate(_)))
        ));
    }

    #[test]
    fn test_zero_cycles() {
        let mut config = EmulatorConfig::default();
        config.campaign.cycles_per_point = 0;
        assert!(matches!(
            validate_config(&config),
            Err(Error::Config(ConfigError::InvalidCycles(0)))
        ));
    }

    #[test]
    fn test_inverted_noise_window() {
        let mut config = EmulatorConfig::default();
        config.stop_error = NoiseConfig { mean: 0.0, sigma: 0.05, low: 0.05, high: -0.05 };
        assert!(matches!(
            validate_config(&config),
            Err(Error::Config(ConfigError::InvalidNoise { .. }))
        ));
    }

    #[test]
    fn test_duration_from_secs() {
        assert_eq!(duration_from_secs(2.5).unwrap(), Duration::from_millis(2500));
        assert!(duration_from_secs(-1.0).is_err());
        assert!(duration_from_secs(f64::NAN).is_err());
    }
}
