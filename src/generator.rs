//! Motionless noise stream.
//!
//! Emits distances drawn independently from a truncated normal at a fixed
//! interval. Useful for exercising a consumer of the stream without any
//! motion model behind it.

use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::Distribution;
use tracing::info;

use crate::cancel::CancelToken;
use crate::config::{validate_noise_stream, NoiseStreamConfig};
use crate::error::Result;
use crate::noise::TruncatedNormal;
use crate::output::{Sample, SampleSink};
use crate::pacing::{Clock, SystemClock, Ticker};

/// Statistical distance stream.
pub struct NoiseGenerator<S, C = SystemClock>
where
    S: SampleSink,
    C: Clock,
{
    config: NoiseStreamConfig,
    distribution: TruncatedNormal,
    sink: S,
    clock: C,
    rng: StdRng,
    cancel: CancelToken,
    emitted: u64,
}

impl<S, C> NoiseGenerator<S, C>
where
    S: SampleSink,
    C: Clock,
{
    /// Create a generator, seeded for reproducibility when `seed` is given.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the distribution or interval is
    /// invalid.
    pub fn new(
        config: NoiseStreamConfig,
        sink: S,
        clock: C,
        seed: Option<u64>,
        cancel: CancelToken,
    ) -> Result<Self> {
        validate_noise_stream(&config)?;

        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        Ok(Self {
            distribution: config.distribution.distribution(),
            config,
            sink,
            clock,
            rng,
            cancel,
            emitted: 0,
        })
    }

    /// Samples emitted so far.
    #[inline]
    pub fn emitted(&self) -> u64 {
        self.emitted
    }

    /// Consume the generator, returning its sink.
    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Emit samples until the configured limit is reached.
    ///
    /// Without a limit this only returns through cancellation or an output
    /// error. Returns the number of samples emitted by this call.
    pub fn run(&mut self) -> Result<u64> {
        info!(
            mean = self.config.distribution.mean,
            sigma = self.config.distribution.sigma,
            interval_ms = self.config.interval.as_millis() as u64,
            "Starting noise stream"
        );

        let first = self.emitted;
        let mut ticker = Ticker::start(&self.clock, self.config.interval);
        loop {
            if self.config.limit.is_some_and(|limit| self.emitted >= limit) {
                break;
            }
            self.cancel.check()?;

            let distance = self.distribution.sample(&mut self.rng);
            self.sink.emit(Sample::new(distance))?;
            self.emitted += 1;

            ticker.wait(&mut self.clock);
        }

        Ok(self.emitted - first)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::pacing::VirtualClock;
    use core::time::Duration;

    fn limited(limit: u64) -> NoiseStreamConfig {
        NoiseStreamConfig {
            limit: Some(limit),
            ..NoiseStreamConfig::default()
        }
    }

    #[test]
    fn test_limited_run() {
        let mut generator = NoiseGenerator::new(
            limited(50),
            Vec::<Sample>::new(),
            VirtualClock::new(),
            Some(9),
            CancelToken::new(),
        )
        .unwrap();

        assert_eq!(generator.run().unwrap(), 50);
        let samples = generator.into_sink();
        assert_eq!(samples.len(), 50);
        assert!(samples
            .iter()
            .all(|s| s.distance >= 0.01 && s.distance <= 0.099999));
    }

    #[test]
    fn test_paced_at_interval() {
        let mut generator = NoiseGenerator::new(
            limited(10),
            Vec::<Sample>::new(),
            VirtualClock::new(),
            Some(1),
            CancelToken::new(),
        )
        .unwrap();

        generator.run().unwrap();
        assert_eq!(generator.clock.now(), Duration::from_secs(2));
    }

    #[test]
    fn test_cancelled_before_first_sample() {
        let cancel = CancelToken::new();
        cancel.cancel();
        let mut generator = NoiseGenerator::new(
            NoiseStreamConfig::default(),
            Vec::<Sample>::new(),
            VirtualClock::new(),
            None,
            cancel,
        )
        .unwrap();

        assert_eq!(generator.run(), Err(Error::Cancelled));
        assert_eq!(generator.emitted(), 0);
    }

    #[test]
    fn test_rejects_zero_interval() {
        let config = NoiseStreamConfig {
            interval: Duration::ZERO,
            ..NoiseStreamConfig::default()
        };
        let result = NoiseGenerator::new(
            config,
            Vec::<Sample>::new(),
            VirtualClock::new(),
            None,
            CancelToken::new(),
        );
        assert!(result.is_err());
    }
}
