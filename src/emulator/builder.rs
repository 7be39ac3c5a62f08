//! Builder pattern for AxisEmulator.

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::cancel::CancelToken;
use crate::config::{validate_config, EmulatorConfig};
use crate::error::{ConfigError, Error, Result};
use crate::output::SampleSink;
use crate::pacing::{Clock, SystemClock};

use super::driver::AxisEmulator;

/// Builder for creating AxisEmulator instances.
///
/// The sink and clock are type parameters, so setting them changes the
/// builder's type; `build()` becomes available once a sink is set.
pub struct AxisEmulatorBuilder<S = (), C = SystemClock> {
    config: EmulatorConfig,
    sink: Option<S>,
    clock: C,
    seed: Option<u64>,
    cancel: CancelToken,
}

impl Default for AxisEmulatorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AxisEmulatorBuilder {
    /// Create a new builder with default configuration and a real-time clock.
    pub fn new() -> Self {
        Self {
            config: EmulatorConfig::default(),
            sink: None,
            clock: SystemClock::new(),
            seed: None,
            cancel: CancelToken::new(),
        }
    }
}

impl<S, C> AxisEmulatorBuilder<S, C> {
    /// Set the full configuration.
    pub fn config(mut self, config: EmulatorConfig) -> Self {
        self.config = config;
        self
    }

    /// Seed the noise generator for a reproducible run.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Share a cancellation token with the emulator.
    pub fn cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = token;
        self
    }

    /// Set the sample sink.
    pub fn sink<S2: SampleSink>(self, sink: S2) -> AxisEmulatorBuilder<S2, C> {
        AxisEmulatorBuilder {
            config: self.config,
            sink: Some(sink),
            clock: self.clock,
            seed: self.seed,
            cancel: self.cancel,
        }
    }

    /// Set the pacing clock.
    pub fn clock<C2: Clock>(self, clock: C2) -> AxisEmulatorBuilder<S, C2> {
        AxisEmulatorBuilder {
            config: self.config,
            sink: self.sink,
            clock,
            seed: self.seed,
            cancel: self.cancel,
        }
    }
}

impl<S, C> AxisEmulatorBuilder<S, C>
where
    S: SampleSink,
    C: Clock,
{
    /// Build the AxisEmulator.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration fails validation or no sink was
    /// supplied.
    pub fn build(self) -> Result<AxisEmulator<S, C>> {
        validate_config(&self.config)?;

        let sink = self
            .sink
            .ok_or(Error::Config(ConfigError::Missing("sample sink")))?;

        let rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        Ok(AxisEmulator::new(self.config, sink, self.clock, rng, self.cancel))
    }
}
