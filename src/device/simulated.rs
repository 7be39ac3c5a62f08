//! In-process sensor at a fixed position.

use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::Distribution;

use crate::config::units::Meters;
use crate::error::{DeviceError, Result};
use crate::noise::TruncatedNormal;

use super::{Locator, Sensor};

/// Reports a fixed position plus Gaussian noise clipped to ±3σ.
#[derive(Debug, Clone)]
pub struct SimulatedSensor {
    nominal: Meters,
    noise: TruncatedNormal,
    rng: StdRng,
    reads: u64,
}

impl SimulatedSensor {
    /// Create a sensor with a seeded noise source.
    pub fn with_seed(nominal: Meters, sigma: f64, seed: u64) -> Self {
        Self::with_rng(nominal, sigma, StdRng::seed_from_u64(seed))
    }

    fn with_rng(nominal: Meters, sigma: f64, rng: StdRng) -> Self {
        let limit = 3.0 * sigma;
        Self {
            nominal,
            noise: TruncatedNormal::new(0.0, sigma, -limit, limit),
            rng,
            reads: 0,
        }
    }

    /// Position the sensor reports around.
    #[inline]
    pub fn nominal(&self) -> Meters {
        self.nominal
    }

    /// Readings taken so far.
    #[inline]
    pub fn reads(&self) -> u64 {
        self.reads
    }
}

impl Sensor for SimulatedSensor {
    fn open(locator: &Locator) -> Result<Self> {
        match locator {
            Locator::Simulated { nominal, sigma } => {
                Ok(Self::with_rng(*nominal, *sigma, StdRng::from_os_rng()))
            }
            other => Err(DeviceError::Open {
                locator: other.to_string(),
                reason: "not a simulated sensor locator".to_string(),
            }
            .into()),
        }
    }

    fn read_distance(&mut self) -> Result<f64> {
        self.reads += 1;
        Ok(self.nominal.0 + self.noise.sample(&mut self.rng))
    }

    fn close(self) -> Result<()> {
        Ok(())
    }
}
