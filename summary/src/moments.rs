//! Running count, min, max, mean and variance
//!
//! Uses Welford's online update so the mean does not drift when values share a
//! large common offset or when the count grows into the millions, and Chan's
//! pairwise formula to combine partial results.

use crate::errors::{Error, Result};
use serde::{Deserialize, Serialize};

/// Streaming moment accumulator.
///
/// ```
/// use colstat_summary::moments::Moments;
///
/// let mut moments = Moments::new();
/// for value in [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0] {
///     moments.observe(value).unwrap();
/// }
/// assert!((moments.mean().unwrap() - 5.0).abs() < 1e-12);
/// assert!((moments.sigma().unwrap() - 2.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Moments {
    count: u64,
    mean: f64,
    /// Sum of squared deviations from the mean
    m2: f64,
    min: f64,
    max: f64,
}

impl Default for Moments {
    fn default() -> Self {
        Self::new()
    }
}

impl Moments {
    pub fn new() -> Self {
        Self {
            count: 0,
            mean: 0.0,
            m2: 0.0,
            min: f64::MAX,
            max: f64::MIN,
        }
    }

    #[allow(clippy::cast_precision_loss)]
    pub fn observe(&mut self, value: f64) -> Result<()> {
        if !value.is_finite() {
            return Err(Error::NonNumericInput(value));
        }
        self.count += 1;
        if value < self.min {
            self.min = value;
        }
        if value > self.max {
            self.max = value;
        }
        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (value - self.mean);
        Ok(())
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn mean(&self) -> Result<f64> {
        self.defined(self.mean)
    }

    /// Population variance, `M2 / count`
    #[allow(clippy::cast_precision_loss)]
    pub fn variance(&self) -> Result<f64> {
        self.defined(self.m2 / self.count as f64)
    }

    pub fn sigma(&self) -> Result<f64> {
        Ok(self.variance()?.sqrt())
    }

    pub fn min(&self) -> Result<f64> {
        self.defined(self.min)
    }

    pub fn max(&self) -> Result<f64> {
        self.defined(self.max)
    }

    pub fn m2(&self) -> f64 {
        self.m2
    }

    fn defined(&self, value: f64) -> Result<f64> {
        if self.count == 0 {
            Err(Error::EmptySummary)
        } else {
            Ok(value)
        }
    }

    /// Combines two accumulators as if every value had been observed by one of them.
    #[allow(clippy::cast_precision_loss)]
    pub fn combine(&self, other: &Self) -> Self {
        if other.count == 0 {
            return self.clone();
        }
        if self.count == 0 {
            return other.clone();
        }
        let count = self.count + other.count;
        let n_a = self.count as f64;
        let n_b = other.count as f64;
        let n = count as f64;
        let delta = other.mean - self.mean;
        Self {
            count,
            mean: self.mean + delta * n_b / n,
            m2: self.m2 + other.m2 + delta * delta * n_a * n_b / n,
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }
}
