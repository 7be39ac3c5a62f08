//! Configuration module for picoscale-emu.
//!
//! Typed configuration for the three variants, with defaults matching the
//! bench setup the emulator was calibrated against and a validation pass applied at construction.
//! There is no file format; the CLI maps its flags onto these types.

mod emulator;
mod noise;
mod stream;
pub mod units;
mod validation;

pub use emulator::{CampaignConfig, EmulatorConfig};
pub use noise::NoiseConfig;
pub use stream::{NoiseStreamConfig, PollerConfig};
pub use validation::{duration_from_secs, validate_config, validate_noise_stream, validate_poller};

// Re-export unit types at config level
pub use units::{Hertz, Meters, Millimeters, MillimetersPerMinute};
