//! Simulated linear axis.

use core::time::Duration;

use rand::rngs::StdRng;
use rand_distr::Distribution;
use tracing::{debug, info, trace};

use crate::campaign::{Action, CampaignPlan};
use crate::cancel::CancelToken;
use crate::config::units::Meters;
use crate::config::EmulatorConfig;
use crate::error::Result;
use crate::motion::{LinearMove, MotionProfile};
use crate::noise::TruncatedNormal;
use crate::output::{Sample, SampleSink};
use crate::pacing::{Clock, SystemClock, Ticker};

/// Counters for a completed campaign.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Samples emitted during the run.
    pub samples: u64,
    /// Moves executed.
    pub moves: u64,
    /// Dwells executed.
    pub dwells: u64,
}

/// Emulated axis with an attached position sensor.
///
/// Generic over:
/// - `S`: where samples go (must implement [`SampleSink`])
/// - `C`: time source used for pacing (defaults to [`SystemClock`])
///
/// Every emitted distance is `nominal + bias + noise`: `bias` is zero while
/// moving and fixed for the length of a dwell, `noise` is drawn per sample.
pub struct AxisEmulator<S, C = SystemClock>
where
    S: SampleSink,
    C: Clock,
{
    /// Sample destination.
    sink: S,

    /// Pacing clock.
    clock: C,

    /// Source for noise and bias draws.
    rng: StdRng,

    /// Stop flag, polled between ticks.
    cancel: CancelToken,

    /// Configuration, validated by the builder.
    config: EmulatorConfig,

    /// Campaign expanded from the configuration.
    plan: CampaignPlan,

    /// Sampling period.
    tick: Duration,

    /// Per-sample measurement noise, in metres.
    noise: TruncatedNormal,

    /// Per-dwell stop error, in metres.
    stop_error: TruncatedNormal,

    /// Current axis position.
    nominal: Meters,

    /// Samples emitted over the emulator's lifetime.
    samples: u64,
}

impl<S, C> AxisEmulator<S, C>
where
    S: SampleSink,
    C: Clock,
{
    /// Create an emulator with the axis parked at the campaign start.
    pub(crate) fn new(
        config: EmulatorConfig,
        sink: S,
        clock: C,
        rng: StdRng,
        cancel: CancelToken,
    ) -> Self {
        let plan = CampaignPlan::new(&config.campaign);
        Self {
            sink,
            clock,
            rng,
            cancel,
            tick: config.sample_rate.period(),
            noise: config.measurement_noise_m().distribution(),
            stop_error: config.stop_error_m().distribution(),
            nominal: plan.start(),
            plan,
            config,
            samples: 0,
        }
    }

    /// Current nominal axis position.
    #[inline]
    pub fn position(&self) -> Meters {
        self.nominal
    }

    /// Samples emitted so far.
    #[inline]
    pub fn samples_emitted(&self) -> u64 {
        self.samples
    }

    /// Sampling period.
    #[inline]
    pub fn tick_period(&self) -> Duration {
        self.tick
    }

    /// Get the configuration.
    #[inline]
    pub fn config(&self) -> &EmulatorConfig {
        &self.config
    }

    /// Get the campaign plan.
    #[inline]
    pub fn plan(&self) -> &CampaignPlan {
        &self.plan
    }

    /// Get the pacing clock.
    #[inline]
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Get the sample sink.
    #[inline]
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Consume the emulator, returning its sink.
    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Draw a fresh stop-position bias.
    pub fn draw_stop_bias(&mut self) -> Meters {
        Meters(self.stop_error.sample(&mut self.rng))
    }

    /// Travel to `target` at the configured feed rate, sampling every tick.
    ///
    /// The last sample is taken at exactly `target`. Calling this while
    /// already at `target` emits one sample and does not move.
    pub fn move_to(&mut self, target: Meters) -> Result<()> {
        let profile =
            MotionProfile::constant_feed(self.nominal, target, self.config.feed_rate, self.tick);
        trace!(
            from = self.nominal.0,
            to = target.0,
            ticks = profile.tick_count(),
            "move"
        );

        let mut ticker = Ticker::start(&self.clock, self.tick);
        for tick in LinearMove::new(profile) {
            self.cancel.check()?;
            self.nominal = tick.position;
            self.emit(Meters(0.0))?;
            if !tick.last {
                ticker.wait(&mut self.clock);
            }
        }

        Ok(())
    }

    /// Stand still for `duration`, sampling every tick with a fixed `bias`.
    pub fn dwell(&mut self, duration: Duration, bias: Meters) -> Result<()> {
        trace!(secs = duration.as_secs_f64(), bias = bias.0, "dwell");

        let mut ticker = Ticker::start(&self.clock, self.tick);
        while ticker.elapsed(&self.clock) < duration {
            self.cancel.check()?;
            self.emit(bias)?;
            ticker.wait(&mut self.clock);
        }

        Ok(())
    }

    /// Execute the full forward, reversal and reverse campaign once.
    ///
    /// # Errors
    ///
    /// Returns `Error::Cancelled` if the cancel token fires, or the sink's
    /// error if a sample cannot be delivered.
    pub fn run(&mut self) -> Result<RunSummary> {
        let first_sample = self.samples;
        let mut summary = RunSummary::default();

        info!(
            points = self.plan.points().len(),
            cycles = self.config.campaign.cycles_per_point,
            actions = self.plan.actions().len(),
            "Starting campaign"
        );

        let mut pass = None;
        for i in 0..self.plan.actions().len() {
            let action = self.plan.actions()[i];
            if pass != Some(action.pass()) {
                pass = Some(action.pass());
                debug!(pass = ?action.pass(), position = self.nominal.0, "Entering pass");
            }

            match action {
                Action::MoveTo { target, .. } => {
                    self.move_to(target)?;
                    summary.moves += 1;
                }
                Action::Dwell { duration, kind, .. } => {
                    let bias = self.draw_stop_bias();
                    debug!(?kind, position = self.nominal.0, bias = bias.0, "Dwell");
                    self.dwell(duration, bias)?;
                    summary.dwells += 1;
                }
            }
        }

        summary.samples = self.samples - first_sample;
        info!(
            samples = summary.samples,
            moves = summary.moves,
            dwells = summary.dwells,
            "Campaign complete"
        );
        Ok(summary)
    }

    fn emit(&mut self, bias: Meters) -> Result<()> {
        let noise = self.noise.sample(&mut self.rng);
        let distance = self.nominal.0 + bias.0 + noise;
        self.sink.emit(Sample::new(distance))?;
        self.samples += 1;
        Ok(())
    }
}
