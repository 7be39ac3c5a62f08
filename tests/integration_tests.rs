//! Integration tests for picoscale-emu.
//!
//! Campaigns run on a `VirtualClock`, so a full default campaign completes
//! instantly while producing the same sample sequence as a real-time run.

use std::io::{self, Write};
use std::time::Duration;

use picoscale_emu::config::units::UnitExt;
use picoscale_emu::error::OutputError;
use picoscale_emu::{
    Action, AxisEmulator, AxisEmulatorBuilder, CampaignConfig, CampaignPlan, CancelToken, Clock,
    DwellKind, EmulatorConfig, Error, JsonLineWriter, Locator, Meters, NoiseConfig,
    NoiseGenerator, NoiseStreamConfig, Pass, Poller, PollerConfig, ReplaySensor, Result, Sample,
    SampleReader, SampleSink, Sensor, VirtualClock,
};

// =============================================================================
// Helpers
// =============================================================================

/// Two points, two cycles, sub-second dwells.
fn short_config() -> EmulatorConfig {
    EmulatorConfig {
        campaign: CampaignConfig {
            start: 0.0.mm(),
            end: 2.0.mm(),
            step: 1.0.mm(),
            cycles_per_point: 2,
            dwell_at_point: Duration::from_millis(500),
            dwell_after_retract: Duration::from_millis(200),
        },
        feed_rate: 60.0.mm_per_min(),
        ..EmulatorConfig::default()
    }
}

fn emulator<S: SampleSink>(config: EmulatorConfig, sink: S) -> AxisEmulator<S, VirtualClock> {
    AxisEmulatorBuilder::new()
        .config(config)
        .seed(7)
        .sink(sink)
        .clock(VirtualClock::new())
        .build()
        .expect("valid configuration")
}

/// Number of maximal runs of consecutive samples equal to `value`.
fn runs_of(samples: &[Sample], value: f64) -> usize {
    let mut runs = 0;
    let mut inside = false;
    for s in samples {
        let hit = s.distance == value;
        if hit && !inside {
            runs += 1;
        }
        inside = hit;
    }
    runs
}

/// Captures samples and cancels a token once `after` samples are in.
struct CancellingSink {
    samples: Vec<Sample>,
    cancel: CancelToken,
    after: usize,
}

impl SampleSink for CancellingSink {
    fn emit(&mut self, sample: Sample) -> Result<()> {
        self.samples.push(sample);
        if self.samples.len() >= self.after {
            self.cancel.cancel();
        }
        Ok(())
    }
}

/// Accepts `capacity` writes, then behaves like a pipe whose reader left.
struct ClosingPipe {
    data: Vec<u8>,
    capacity: usize,
}

impl Write for ClosingPipe {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.capacity == 0 {
            return Err(io::Error::from(io::ErrorKind::BrokenPipe));
        }
        self.capacity -= 1;
        self.data.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

// =============================================================================
// Campaign shape
// =============================================================================

#[test]
fn test_default_forward_pass_visits() {
    let config = EmulatorConfig::default();
    let plan = CampaignPlan::new(&config.campaign);

    let expected: Vec<f64> = vec![0.02, 0.04, 0.06, 0.08, 0.1];
    assert_eq!(plan.points().len(), expected.len());
    for (p, e) in plan.points().iter().zip(&expected) {
        assert!((p.0 - e).abs() < 1e-12);
    }

    let forward: Vec<&Action> = plan.actions_in(Pass::Forward).collect();
    for &point in plan.points() {
        let approaches = forward
            .windows(2)
            .filter(|w| {
                w[0].target() == Some(point)
                    && matches!(w[1], Action::Dwell { kind: DwellKind::AtPoint, .. })
            })
            .count();
        let retract = Meters((point.0 - 0.02).max(0.0));
        let retracts = forward
            .windows(4)
            .filter(|w| {
                w[0].target() == Some(point)
                    && matches!(w[1], Action::Dwell { kind: DwellKind::AtPoint, .. })
                    && w[2].target() == Some(retract)
                    && matches!(w[3], Action::Dwell { kind: DwellKind::AfterRetract, .. })
            })
            .count();

        assert_eq!(approaches, 5, "point {:?}", point);
        assert_eq!(retracts, 4, "point {:?}", point);
    }

    let overshoot = plan.overshoot();
    assert!((overshoot.0 - 0.12).abs() < 1e-12);
    assert!(forward.iter().all(|a| a.target() != Some(overshoot)));
    let reversal: Vec<&Action> = plan.actions_in(Pass::Reversal).collect();
    assert_eq!(reversal.len(), 2);
    assert_eq!(reversal[0].target(), Some(overshoot));
}

#[test]
fn test_default_campaign_overshoot_visits() {
    let config = EmulatorConfig::default().noiseless();
    let cycles = config.campaign.cycles_per_point as usize;
    let mut emu = emulator(config, Vec::<Sample>::new());

    let summary = emu.run().unwrap();
    let overshoot = emu.plan().overshoot();
    let samples = emu.into_sink();

    assert_eq!(summary.samples, samples.len() as u64);

    let max = samples.iter().map(|s| s.distance).fold(f64::MIN, f64::max);
    assert_eq!(max, overshoot.0);
    // Once for the reversal, then once per retract of the top point on the
    // way back.
    assert_eq!(runs_of(&samples, overshoot.0), 1 + (cycles - 1));
}

#[test]
fn test_run_summary_matches_plan() {
    let mut emu = emulator(short_config(), Vec::<Sample>::new());
    let summary = emu.run().unwrap();

    let plan = emu.plan();
    assert_eq!(summary.moves as usize, plan.move_count());
    assert_eq!(
        (summary.moves + summary.dwells) as usize,
        plan.actions().len()
    );
    assert_eq!(summary.samples, emu.samples_emitted());
}

#[test]
fn test_run_ends_at_first_point() {
    let mut emu = emulator(short_config().noiseless(), Vec::<Sample>::new());
    emu.run().unwrap();

    let first = emu.plan().points()[0];
    assert_eq!(emu.position(), first);
    assert_eq!(emu.into_sink().last().unwrap().distance, first.0);
}

// =============================================================================
// Primitive operations
// =============================================================================

#[test]
fn test_dwell_sample_count() {
    let mut emu = emulator(EmulatorConfig::default(), Vec::<Sample>::new());
    emu.dwell(Duration::from_secs(10), Meters(0.0)).unwrap();

    assert_eq!(emu.tick_period(), Duration::from_nanos(33_333_333));
    let n = emu.samples_emitted();
    assert!((299..=301).contains(&n), "got {} samples", n);
    assert!(emu.clock().now() >= Duration::from_secs(10));
}

#[test]
fn test_dwell_holds_one_bias() {
    let config = EmulatorConfig {
        measurement_noise: NoiseConfig::none(),
        ..EmulatorConfig::default()
    };
    let mut emu = emulator(config, Vec::<Sample>::new());

    let bias = emu.draw_stop_bias();
    emu.dwell(Duration::from_secs(1), bias).unwrap();

    let samples = emu.into_sink();
    assert!(samples.len() >= 30);
    let first = samples[0].distance;
    assert!(samples.iter().all(|s| s.distance == first));
    assert_eq!(first, bias.0);
}

#[test]
fn test_run_draws_fresh_bias_per_dwell() {
    let biased = EmulatorConfig {
        measurement_noise: NoiseConfig::none(),
        ..short_config()
    };
    let mut emu = emulator(biased, Vec::<Sample>::new());
    emu.run().unwrap();
    let dwells = emu.plan().actions().len() - emu.plan().move_count();
    let measured = emu.into_sink();

    // Same timing, no stop error: the nominal position of every sample
    let mut emu = emulator(short_config().noiseless(), Vec::<Sample>::new());
    emu.run().unwrap();
    let nominal = emu.into_sink();
    assert_eq!(measured.len(), nominal.len());

    let residuals: Vec<f64> = measured
        .iter()
        .zip(&nominal)
        .map(|(m, n)| m.distance - n.distance)
        .collect();

    // While moving the position changes from tick to tick; no bias there
    for i in 1..nominal.len() {
        if nominal[i].distance != nominal[i - 1].distance {
            assert_eq!(residuals[i], 0.0, "sample {} carries a bias while moving", i);
        }
    }

    // Every dwell is one run of a constant, non-zero residual
    let mut biases: Vec<f64> = Vec::new();
    let mut inside = false;
    for (i, &r) in residuals.iter().enumerate() {
        if r == 0.0 {
            inside = false;
            continue;
        }
        if inside {
            assert_eq!(r, *biases.last().unwrap(), "bias changed inside a dwell");
            assert_eq!(nominal[i].distance, nominal[i - 1].distance);
        } else {
            biases.push(r);
            inside = true;
        }
    }

    assert_eq!(biases.len(), dwells);
    assert!(biases.windows(2).all(|w| w[0] != w[1]));
}

#[test]
fn test_move_to_current_position() {
    let mut emu = emulator(EmulatorConfig::default(), Vec::<Sample>::new());
    let start = emu.position();

    emu.move_to(start).unwrap();

    assert_eq!(emu.position(), start);
    assert_eq!(emu.samples_emitted(), 1);
    assert_eq!(emu.clock().now(), Duration::ZERO);
}

#[test]
fn test_move_to_is_monotonic_and_exact() {
    let mut emu = emulator(EmulatorConfig::default().noiseless(), Vec::<Sample>::new());
    let target = Meters(0.02);

    emu.move_to(target).unwrap();
    let samples = emu.into_sink();

    // 20 mm at 200 mm/min is 6 s, 180 ticks at 30 Hz
    assert!((180..=182).contains(&samples.len()), "{}", samples.len());
    assert!(samples.windows(2).all(|w| w[0].distance <= w[1].distance));
    assert_eq!(samples.last().unwrap().distance, target.0);
    assert!(samples.iter().all(|s| s.distance <= target.0));
}

// =============================================================================
// Noise
// =============================================================================

#[test]
fn test_noiseless_runs_are_identical() {
    let run = || {
        let config = short_config().noiseless();
        let precision = config.precision;
        let mut emu = AxisEmulatorBuilder::new()
            .config(config)
            .sink(JsonLineWriter::new(Vec::<u8>::new(), precision))
            .clock(VirtualClock::new())
            .build()
            .unwrap();
        emu.run().unwrap();
        emu.into_sink().into_inner()
    };

    let a = run();
    let b = run();
    assert!(!a.is_empty());
    assert_eq!(a, b);
}

#[test]
fn test_seeded_runs_are_identical() {
    let run = |seed| {
        let mut emu = AxisEmulatorBuilder::new()
            .config(short_config())
            .seed(seed)
            .sink(Vec::<Sample>::new())
            .clock(VirtualClock::new())
            .build()
            .unwrap();
        emu.run().unwrap();
        emu.into_sink()
    };

    assert_eq!(run(11), run(11));
    assert_ne!(run(11), run(12));
}

#[test]
fn test_noisy_samples_stay_near_range() {
    let config = short_config();
    let slack = (config.measurement_noise.high + config.stop_error.high) * 1e-3;
    let mut emu = emulator(config, Vec::<Sample>::new());
    emu.run().unwrap();

    let low = emu.plan().start().0 - slack - 1e-15;
    let high = emu.plan().overshoot().0 + slack + 1e-15;
    assert!(emu
        .into_sink()
        .iter()
        .all(|s| s.distance >= low && s.distance <= high));
}

#[test]
fn test_noise_stream_output() {
    let config = NoiseStreamConfig {
        limit: Some(200),
        ..NoiseStreamConfig::default()
    };
    let (low, high) = (config.distribution.low, config.distribution.high);
    let sink = JsonLineWriter::new(Vec::<u8>::new(), config.precision);
    let mut generator =
        NoiseGenerator::new(config, sink, VirtualClock::new(), Some(5), CancelToken::new())
            .unwrap();

    assert_eq!(generator.run().unwrap(), 200);

    let bytes = generator.into_sink().into_inner();
    let samples: Vec<Sample> = SampleReader::new(bytes.as_slice())
        .collect::<Result<_>>()
        .unwrap();
    assert_eq!(samples.len(), 200);
    assert!(samples
        .iter()
        .all(|s| s.distance >= low && s.distance <= high));
}

// =============================================================================
// Stopping
// =============================================================================

#[test]
fn test_precancelled_run_emits_nothing() {
    let cancel = CancelToken::new();
    cancel.cancel();

    let mut emu = AxisEmulatorBuilder::new()
        .sink(Vec::<Sample>::new())
        .clock(VirtualClock::new())
        .cancel_token(cancel)
        .build()
        .unwrap();

    assert_eq!(emu.run(), Err(Error::Cancelled));
    assert!(emu.into_sink().is_empty());
}

#[test]
fn test_cancel_mid_run() {
    let cancel = CancelToken::new();
    let sink = CancellingSink {
        samples: Vec::new(),
        cancel: cancel.clone(),
        after: 50,
    };

    let mut emu = AxisEmulatorBuilder::new()
        .config(short_config())
        .sink(sink)
        .clock(VirtualClock::new())
        .cancel_token(cancel)
        .build()
        .unwrap();

    let err = emu.run().unwrap_err();
    assert_eq!(err, Error::Cancelled);
    assert!(err.is_clean_stop());
    assert_eq!(emu.samples_emitted(), 50);
    assert_eq!(emu.into_sink().samples.len(), 50);
}

#[test]
fn test_closed_output_stops_cleanly() {
    let pipe = ClosingPipe {
        data: Vec::new(),
        capacity: 10,
    };
    let mut emu = emulator(short_config(), JsonLineWriter::new(pipe, 12));

    let err = emu.run().unwrap_err();
    assert_eq!(err, Error::Output(OutputError::Closed));
    assert!(err.is_clean_stop());

    let data = emu.into_sink().into_inner().data;
    let text = String::from_utf8(data).unwrap();
    assert!(text.ends_with('\n'));
    assert_eq!(text.lines().count(), 10);
}

#[test]
fn test_invalid_config_rejected() {
    let mut config = short_config();
    config.campaign.cycles_per_point = 0;

    let result = AxisEmulatorBuilder::new()
        .config(config)
        .sink(Vec::<Sample>::new())
        .build();
    assert!(matches!(result, Err(Error::Config(_))));
}

// =============================================================================
// Device polling
// =============================================================================

#[test]
fn test_poll_replays_emulator_recording() {
    let config = short_config().noiseless();
    let mut emu = AxisEmulatorBuilder::new()
        .config(config)
        .sink(JsonLineWriter::new(Vec::<u8>::new(), 12))
        .clock(VirtualClock::new())
        .build()
        .unwrap();
    emu.run().unwrap();
    let recording = emu.into_sink().into_inner();

    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(&recording).unwrap();
    file.flush().unwrap();

    let locator: Locator = file.path().to_str().unwrap().parse().unwrap();
    let sensor = <ReplaySensor as Sensor>::open(&locator).unwrap();
    let mut poller = Poller::new(
        sensor,
        Vec::<Sample>::new(),
        VirtualClock::new(),
        PollerConfig::default(),
        CancelToken::new(),
    )
    .unwrap();

    let polled = poller.run().unwrap();
    let replayed = poller.into_sink();
    let original: Vec<Sample> = SampleReader::new(recording.as_slice())
        .collect::<Result<_>>()
        .unwrap();

    assert_eq!(polled as usize, original.len());
    assert_eq!(replayed, original);
}
