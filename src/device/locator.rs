//! Sensor locators.
//!
//! Accepted forms:
//!
//! | Locator               | Sensor                                  |
//! |-----------------------|-----------------------------------------|
//! | `sim:<m>`             | simulated, fixed position `<m>` metres  |
//! | `sim:<m>:<sigma_m>`   | same, with explicit noise sigma         |
//! | `file:<path>`         | replay of a recorded stream             |
//! | `<path>`              | same as `file:<path>`                   |

use core::fmt;
use core::str::FromStr;
use std::path::PathBuf;

use crate::config::units::Meters;
use crate::error::{ConfigError, Error};

/// Default noise sigma of a simulated sensor (2 µm).
pub const DEFAULT_SIM_SIGMA: f64 = 2e-6;

/// Where to find a distance sensor.
#[derive(Debug, Clone, PartialEq)]
pub enum Locator {
    /// In-process sensor at a fixed position.
    Simulated {
        /// Reported position.
        nominal: Meters,
        /// Noise standard deviation in metres.
        sigma: f64,
    },
    /// Recording replayed line by line.
    Replay(PathBuf),
}

impl FromStr for Locator {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::Config(ConfigError::InvalidLocator(s.to_string()));
        let s_trim = s.trim();

        if let Some(rest) = s_trim.strip_prefix("sim:") {
            let mut parts = rest.split(':');
            let nominal = parts
                .next()
                .and_then(|v| v.parse::<f64>().ok())
                .filter(|v| v.is_finite())
                .ok_or_else(invalid)?;
            let sigma = match parts.next() {
                Some(v) => v
                    .parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite() && *v >= 0.0)
                    .ok_or_else(invalid)?,
                None => DEFAULT_SIM_SIGMA,
            };
            if parts.next().is_some() {
                return Err(invalid());
            }
            return Ok(Locator::Simulated {
                nominal: Meters(nominal),
                sigma,
            });
        }

        let path = s_trim.strip_prefix("file:").unwrap_or(s_trim);
        if path.is_empty() {
            return Err(invalid());
        }
        Ok(Locator::Replay(PathBuf::from(path)))
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Simulated { nominal, sigma } => write!(f, "sim:{}:{}", nominal.0, sigma),
            Locator::Replay(path) => write!(f, "file:{}", path.display()),
        }
    }
}
