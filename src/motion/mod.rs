//! Motion module for picoscale-emu.
//!
//! Provides the constant feed motion profile and per-tick move execution.

mod executor;
mod profile;

pub use executor::{LinearMove, MoveTick};
pub use profile::{Direction, MotionProfile};
