//! Fixed-rate sensor polling loop.

use tracing::{error, info, warn};

use crate::cancel::CancelToken;
use crate::config::{validate_poller, PollerConfig};
use crate::error::{ConfigError, DeviceError, Error, Result};
use crate::output::{Sample, SampleSink};
use crate::pacing::{Clock, SystemClock, Ticker};

use super::Sensor;

/// Reads a sensor once per tick and forwards each reading to a sink.
pub struct Poller<D, S, C = SystemClock>
where
    D: Sensor,
    S: SampleSink,
    C: Clock,
{
    /// Open device; taken when the loop finishes and the device is closed.
    sensor: Option<D>,
    sink: S,
    clock: C,
    cancel: CancelToken,
    config: PollerConfig,
    polled: u64,
}

impl<D, S, C> Poller<D, S, C>
where
    D: Sensor,
    S: SampleSink,
    C: Clock,
{
    /// Create a poller around an already opened sensor.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for a non-positive sample rate.
    pub fn new(
        sensor: D,
        sink: S,
        clock: C,
        config: PollerConfig,
        cancel: CancelToken,
    ) -> Result<Self> {
        validate_poller(&config)?;
        Ok(Self {
            sensor: Some(sensor),
            sink,
            clock,
            cancel,
            config,
            polled: 0,
        })
    }

    /// Readings forwarded so far.
    #[inline]
    pub fn polled(&self) -> u64 {
        self.polled
    }

    /// Consume the poller, returning its sink.
    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Poll until the limit, the end of a recording, or cancellation.
    ///
    /// The sensor is closed on every exit path. A recording running out
    /// ends the loop normally; any other device failure is returned.
    pub fn run(&mut self) -> Result<u64> {
        let mut sensor = self
            .sensor
            .take()
            .ok_or(Error::Config(ConfigError::Missing("open sensor")))?;

        info!(hz = self.config.sample_rate.value(), "Polling sensor");
        let result = self.poll(&mut sensor);
        let closed = sensor.close();

        match result {
            Ok(()) | Err(Error::Device(DeviceError::EndOfStream)) => {
                closed?;
                info!(readings = self.polled, "Polling finished");
                Ok(self.polled)
            }
            Err(e) => {
                if let Err(close_err) = closed {
                    warn!("Failed to close sensor: {}", close_err);
                }
                if !e.is_clean_stop() {
                    error!("Polling stopped: {}", e);
                }
                Err(e)
            }
        }
    }

    fn poll(&mut self, sensor: &mut D) -> Result<()> {
        let mut ticker = Ticker::start(&self.clock, self.config.sample_rate.period());
        loop {
            if self.config.limit.is_some_and(|limit| self.polled >= limit) {
                return Ok(());
            }
            self.cancel.check()?;

            let distance = sensor.read_distance()?;
            self.sink.emit(Sample::new(distance))?;
            self.polled += 1;

            ticker.wait(&mut self.clock);
        }
    }
}
