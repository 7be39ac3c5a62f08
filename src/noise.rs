//! Clipped Gaussian sampling.
//!
//! Measurement noise, stop-position error and the statistical noise stream all
//! draw from a normal distribution restricted to a closed window. Samples are
//! produced by rejection, so the shape inside the window is the untouched
//! Gaussian rather than one with probability mass piled up at the bounds.

use rand::Rng;
use rand_distr::{Distribution, Normal};

/// Draws attempted before giving up on rejection sampling.
///
/// Only reachable when the window sits far out in a tail; the fallback is the
/// clamped mean, which still respects the bounds.
pub const MAX_REJECTIONS: u32 = 10_000;

/// Normal distribution truncated to `[low, high]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TruncatedNormal {
    normal: Option<Normal<f64>>,
    mean: f64,
    low: f64,
    high: f64,
}

impl TruncatedNormal {
    /// Create a new sampler.
    ///
    /// A non-positive `sigma` makes the sampler deterministic: every draw is
    /// `mean` clamped into the window.
    pub fn new(mean: f64, sigma: f64, low: f64, high: f64) -> Self {
        let normal = if sigma > 0.0 {
            Normal::new(mean, sigma).ok()
        } else {
            None
        };

        Self {
            normal,
            mean,
            low,
            high,
        }
    }

    /// Lower bound of the window.
    #[inline]
    pub fn low(&self) -> f64 {
        self.low
    }

    /// Upper bound of the window.
    #[inline]
    pub fn high(&self) -> f64 {
        self.high
    }

    /// Whether every draw returns the same value.
    #[inline]
    pub fn is_deterministic(&self) -> bool {
        self.normal.is_none()
    }

    fn clamped_mean(&self) -> f64 {
        self.mean.max(self.low).min(self.high)
    }
}

impl Distribution<f64> for TruncatedNormal {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let Some(normal) = self.normal else {
            return self.clamped_mean();
        };

        for _ in 0..MAX_REJECTIONS {
            let value = normal.sample(rng);
            if value >= self.low && value <= self.high {
                return value;
            }
        }

        self.clamped_mean()
    }
}
