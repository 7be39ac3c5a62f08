//! Emulator module for picoscale-emu.
//!
//! Provides the simulated axis and its builder.

mod builder;
mod driver;

pub use builder::AxisEmulatorBuilder;
pub use driver::{AxisEmulator, RunSummary};
