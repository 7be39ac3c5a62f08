//! Truncated-normal noise parameters.

use crate::noise::TruncatedNormal;

/// Parameters of a clipped Gaussian.
///
/// Values are in the unit of the quantity being perturbed: millimetres for
/// the axis emulator, metres for the noise stream.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoiseConfig {
    /// Mean of the underlying normal distribution.
    pub mean: f64,
    /// Standard deviation. Zero disables randomness.
    pub sigma: f64,
    /// Lower clipping bound.
    pub low: f64,
    /// Upper clipping bound.
    pub high: f64,
}

impl NoiseConfig {
    /// Zero-mean noise clipped symmetrically to `±limit`.
    pub const fn symmetric(sigma: f64, limit: f64) -> Self {
        Self {
            mean: 0.0,
            sigma,
            low: -limit,
            high: limit,
        }
    }

    /// Noise that always yields exactly zero.
    pub const fn none() -> Self {
        Self::symmetric(0.0, 0.0)
    }

    /// Check the parameters describe a non-empty window.
    pub fn is_valid(&self) -> bool {
        self.sigma.is_finite()
            && self.sigma >= 0.0
            && self.mean.is_finite()
            && self.low <= self.high
    }

    /// Multiply every parameter by `factor` (unit conversion).
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            mean: self.mean * factor,
            sigma: self.sigma * factor,
            low: self.low * factor,
            high: self.high * factor,
        }
    }

    /// Build the sampler for these parameters.
    pub fn distribution(&self) -> TruncatedNormal {
        TruncatedNormal::new(self.mean, self.sigma, self.low, self.high)
    }
}
