//! # picoscale-emu
//!
//! Command-line front end. Samples go to stdout, one JSON object per line;
//! logs go to stderr.
//!
//! - `axis`: emulate the full forward/reverse measurement campaign
//! - `noise`: stream independent draws from a clipped Gaussian
//! - `poll`: stream a simulated or recorded sensor at a fixed rate

use std::process;

use clap::{Args, Parser, Subcommand};
use picoscale_emu::config::duration_from_secs;
use picoscale_emu::{
    install_ctrlc_handler, AnySensor, AxisEmulatorBuilder, CampaignConfig, CancelToken, Clock,
    EmulatorConfig, JsonLineWriter, Locator, NoiseConfig, NoiseGenerator, NoiseStreamConfig,
    Poller, PollerConfig, Result, Sensor, SystemClock, UnitExt, VirtualClock,
};
use tracing::{error, info, warn, Level};
use tracing_subscriber::EnvFilter;

/// Linear position sensor emulator
#[derive(Parser, Debug)]
#[command(name = "picoscale-emu")]
#[command(version)]
#[command(about = "Streams emulated distance samples as line-delimited JSON")]
struct Cli {
    /// Enable verbose logging (DEBUG level).
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format.
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Emulate an axis running the bidirectional measurement campaign.
    Axis(AxisArgs),
    /// Emit motionless noise samples.
    Noise(NoiseArgs),
    /// Poll a distance sensor and forward its readings.
    Poll(PollArgs),
}

#[derive(Args, Debug)]
struct AxisArgs {
    /// First bound of the campaign (mm).
    #[arg(long, default_value_t = 0.0)]
    start_mm: f64,

    /// Last measurement point (mm).
    #[arg(long, default_value_t = 100.0)]
    end_mm: f64,

    /// Spacing between measurement points (mm).
    #[arg(long, default_value_t = 20.0)]
    step_mm: f64,

    /// Traversal speed (mm/min).
    #[arg(long, default_value_t = 200.0)]
    feed_mm_min: f64,

    /// Dwell at each measurement point (s).
    #[arg(long, default_value_t = 10.0)]
    dwell_at_point_s: f64,

    /// Dwell after each retract (s).
    #[arg(long, default_value_t = 2.0)]
    dwell_after_retract_s: f64,

    /// Sample rate (Hz).
    #[arg(long, default_value_t = 30.0)]
    hz: f64,

    /// Approach cycles per point.
    #[arg(long, default_value_t = 5)]
    cycles: u32,

    /// Measurement noise sigma (mm).
    #[arg(long, default_value_t = 0.002, allow_negative_numbers = true)]
    noise_sigma_mm: f64,

    /// Measurement noise lower bound (mm).
    #[arg(long, default_value_t = -0.002, allow_negative_numbers = true)]
    noise_low_mm: f64,

    /// Measurement noise upper bound (mm).
    #[arg(long, default_value_t = 0.002, allow_negative_numbers = true)]
    noise_high_mm: f64,

    /// Stop error sigma (mm).
    #[arg(long, default_value_t = 0.05, allow_negative_numbers = true)]
    error_sigma_mm: f64,

    /// Stop error lower bound (mm).
    #[arg(long, default_value_t = -0.05, allow_negative_numbers = true)]
    error_low_mm: f64,

    /// Stop error upper bound (mm).
    #[arg(long, default_value_t = 0.05, allow_negative_numbers = true)]
    error_high_mm: f64,

    /// Seed for reproducible noise.
    #[arg(long)]
    seed: Option<u64>,

    /// Run on simulated time: same samples, no waiting.
    #[arg(long)]
    virtual_time: bool,
}

impl AxisArgs {
    fn to_config(&self) -> Result<EmulatorConfig> {
        Ok(EmulatorConfig {
            campaign: CampaignConfig {
                start: self.start_mm.mm(),
                end: self.end_mm.mm(),
                step: self.step_mm.mm(),
                cycles_per_point: self.cycles,
                dwell_at_point: duration_from_secs(self.dwell_at_point_s)?,
                dwell_after_retract: duration_from_secs(self.dwell_after_retract_s)?,
            },
            feed_rate: self.feed_mm_min.mm_per_min(),
            sample_rate: self.hz.hz(),
            measurement_noise: NoiseConfig {
                mean: 0.0,
                sigma: self.noise_sigma_mm,
                low: self.noise_low_mm,
                high: self.noise_high_mm,
            },
            stop_error: NoiseConfig {
                mean: 0.0,
                sigma: self.error_sigma_mm,
                low: self.error_low_mm,
                high: self.error_high_mm,
            },
            ..EmulatorConfig::default()
        })
    }
}

#[derive(Args, Debug)]
struct NoiseArgs {
    /// Mean distance (m).
    #[arg(long, default_value_t = 0.055)]
    mean: f64,

    /// Standard deviation (m).
    #[arg(long, default_value_t = 0.018)]
    sigma: f64,

    /// Lower clipping bound (m).
    #[arg(long, default_value_t = 0.01, allow_negative_numbers = true)]
    low: f64,

    /// Upper clipping bound (m).
    #[arg(long, default_value_t = 0.099999, allow_negative_numbers = true)]
    high: f64,

    /// Time between samples (s).
    #[arg(long, default_value_t = 0.2)]
    interval_s: f64,

    /// Stop after this many samples.
    #[arg(long)]
    count: Option<u64>,

    /// Seed for reproducible noise.
    #[arg(long)]
    seed: Option<u64>,
}

impl NoiseArgs {
    fn to_config(&self) -> Result<NoiseStreamConfig> {
        Ok(NoiseStreamConfig {
            distribution: NoiseConfig {
                mean: self.mean,
                sigma: self.sigma,
                low: self.low,
                high: self.high,
            },
            interval: duration_from_secs(self.interval_s)?,
            limit: self.count,
            ..NoiseStreamConfig::default()
        })
    }
}

#[derive(Args, Debug)]
struct PollArgs {
    /// Sensor to poll: `sim:<m>[:<sigma_m>]`, `file:<path>` or a path.
    #[arg(default_value = "sim:0.05")]
    locator: Locator,

    /// Polling rate (Hz).
    #[arg(long, default_value_t = 30.0)]
    hz: f64,

    /// Stop after this many readings.
    #[arg(long)]
    count: Option<u64>,
}

fn main() {
    let cli = Cli::parse();
    setup_tracing(&cli);

    info!("picoscale-emu v{} starting", env!("CARGO_PKG_VERSION"));

    let cancel = CancelToken::new();
    if let Err(e) = install_ctrlc_handler(&cancel) {
        warn!("Ctrl-C handler not installed: {e}");
    }

    match run(cli.command, cancel) {
        Ok(()) => info!("Done"),
        Err(e) if e.is_clean_stop() => info!("Stopped: {e}"),
        Err(e) => {
            error!("FATAL: {e}");
            process::exit(1);
        }
    }
}

fn run(command: Command, cancel: CancelToken) -> Result<()> {
    match command {
        Command::Axis(args) => {
            let config = args.to_config()?;
            if args.virtual_time {
                run_axis(config, args.seed, VirtualClock::new(), cancel)
            } else {
                run_axis(config, args.seed, SystemClock::new(), cancel)
            }
        }
        Command::Noise(args) => {
            let config = args.to_config()?;
            let sink = JsonLineWriter::stdout(config.precision);
            let mut generator =
                NoiseGenerator::new(config, sink, SystemClock::new(), args.seed, cancel)?;
            generator.run()?;
            Ok(())
        }
        Command::Poll(args) => {
            let config = PollerConfig {
                sample_rate: args.hz.hz(),
                limit: args.count,
                ..PollerConfig::default()
            };
            info!(locator = %args.locator, "Opening sensor");
            let sensor = AnySensor::open(&args.locator)?;
            let sink = JsonLineWriter::stdout(config.precision);
            let mut poller = Poller::new(sensor, sink, SystemClock::new(), config, cancel)?;
            poller.run()?;
            Ok(())
        }
    }
}

fn run_axis<C: Clock>(
    config: EmulatorConfig,
    seed: Option<u64>,
    clock: C,
    cancel: CancelToken,
) -> Result<()> {
    let sink = JsonLineWriter::stdout(config.precision);
    let mut builder = AxisEmulatorBuilder::new()
        .config(config)
        .cancel_token(cancel);
    if let Some(seed) = seed {
        builder = builder.seed(seed);
    }

    let mut emulator = builder.sink(sink).clock(clock).build()?;
    emulator.run()?;
    Ok(())
}

/// Setup tracing subscriber based on CLI arguments.
///
/// Logs always go to stderr; stdout carries only samples.
fn setup_tracing(cli: &Cli) {
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    if cli.json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .compact()
            .init();
    }
}
