//! Device module for picoscale-emu.
//!
//! A real sensor is an external collaborator: anything that can be opened
//! from a locator, polled for one distance at a time, and closed. The
//! [`Poller`] streams such a sensor at a fixed rate.

mod locator;
mod poller;
mod replay;
mod simulated;

pub use locator::{Locator, DEFAULT_SIM_SIGMA};
pub use poller::Poller;
pub use replay::ReplaySensor;
pub use simulated::SimulatedSensor;

use crate::error::Result;

/// Distance sensor handle.
pub trait Sensor: Sized {
    /// Open the sensor at `locator`.
    ///
    /// # Errors
    ///
    /// Returns `DeviceError::Open` if the device is unavailable.
    fn open(locator: &Locator) -> Result<Self>;

    /// Take one reading, in metres.
    ///
    /// # Errors
    ///
    /// Returns a `DeviceError` if the device fails to answer.
    fn read_distance(&mut self) -> Result<f64>;

    /// Release the device.
    fn close(self) -> Result<()>;
}

/// Any of the sensors this crate can open, chosen by locator.
#[derive(Debug)]
pub enum AnySensor {
    /// See [`SimulatedSensor`].
    Simulated(SimulatedSensor),
    /// See [`ReplaySensor`].
    Replay(ReplaySensor),
}

impl Sensor for AnySensor {
    fn open(locator: &Locator) -> Result<Self> {
        match locator {
            Locator::Simulated { .. } => SimulatedSensor::open(locator).map(AnySensor::Simulated),
            Locator::Replay(_) => ReplaySensor::open(locator).map(AnySensor::Replay),
        }
    }

    fn read_distance(&mut self) -> Result<f64> {
        match self {
            AnySensor::Simulated(s) => s.read_distance(),
            AnySensor::Replay(s) => s.read_distance(),
        }
    }

    fn close(self) -> Result<()> {
        match self {
            AnySensor::Simulated(s) => s.close(),
            AnySensor::Replay(s) => s.close(),
        }
    }
}
