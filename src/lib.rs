//! # picoscale-emu
//!
//! Emulator of a linear position sensor mounted on a moving axis. Samples
//! are streamed as newline-delimited JSON (`{"distance": <metres>}`) at a
//! fixed tick rate, for exercising consumers of a real sensor stream.
//!
//! ## Features
//!
//! - **Campaign emulation**: forward sweep, reversal and reverse sweep over
//!   evenly spaced points with repeated approach cycles
//! - **Noise model**: per-sample measurement noise plus a per-dwell stop bias,
//!   both clipped Gaussians
//! - **Drift-free pacing**: deadline-accumulating ticker over embedded-hal's
//!   `DelayNs`, with a virtual clock for instant, deterministic runs
//! - **Device polling**: stream a simulated or recorded sensor at a fixed rate
//! - **Cooperative cancellation**: Ctrl-C stops between ticks, never mid-line
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use picoscale_emu::{AxisEmulatorBuilder, EmulatorConfig, JsonLineWriter};
//!
//! let config = EmulatorConfig::default();
//! let mut emulator = AxisEmulatorBuilder::new()
//!     .config(config.clone())
//!     .sink(JsonLineWriter::stdout(config.precision))
//!     .build()?;
//!
//! let summary = emulator.run()?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

// Core modules
pub mod campaign;
pub mod cancel;
pub mod config;
pub mod device;
pub mod emulator;
pub mod error;
pub mod generator;
pub mod motion;
pub mod noise;
pub mod output;
pub mod pacing;

// Re-exports for ergonomic API
pub use campaign::{Action, CampaignPlan, DwellKind, Pass};
pub use cancel::{install_ctrlc_handler, CancelToken};
pub use config::{
    validate_config, CampaignConfig, EmulatorConfig, NoiseConfig, NoiseStreamConfig, PollerConfig,
};
pub use device::{AnySensor, Locator, Poller, ReplaySensor, Sensor, SimulatedSensor};
pub use emulator::{AxisEmulator, AxisEmulatorBuilder, RunSummary};
pub use error::{Error, Result};
pub use generator::NoiseGenerator;
pub use motion::{Direction, LinearMove, MotionProfile, MoveTick};
pub use noise::TruncatedNormal;
pub use output::{decode_line, JsonLineWriter, Sample, SampleReader, SampleSink};
pub use pacing::{Clock, SystemClock, Ticker, VirtualClock};

// Unit types
pub use config::units::{Hertz, Meters, Millimeters, MillimetersPerMinute, UnitExt};
