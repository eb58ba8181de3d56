use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Shape of a synthetic dataset. The seed is part of the configuration: two
/// generators built from equal configurations produce the same rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyntheticConfig {
    pub rows: usize,
    pub columns: usize,
    pub low: f64,
    pub high: f64,
    pub mode: f64,
    pub seed: u64,
}

impl SyntheticConfig {
    /// Integers in {0, 1} drawn around a mode of 0.5
    pub fn binary(rows: usize, columns: usize, seed: u64) -> Self {
        Self {
            rows,
            columns,
            low: 0.0,
            high: 1.0,
            mode: 0.5,
            seed,
        }
    }
}

/// Draws from the triangular distribution on `[low, high]` by inverting its CDF.
pub fn triangular(rng: &mut impl Rng, low: f64, high: f64, mode: f64) -> f64 {
    let u: f64 = rng.gen_range(0.0..1.0);
    let span = high - low;
    if span <= 0.0 {
        return low;
    }
    let split = (mode - low) / span;
    if u < split {
        low + (u * span * (mode - low)).sqrt()
    } else {
        high - ((1.0 - u) * span * (high - mode)).sqrt()
    }
}

/// Rounds half away from zero.
#[allow(clippy::cast_possible_truncation)]
pub fn randint_triangular(rng: &mut impl Rng, low: f64, high: f64, mode: f64) -> i64 {
    triangular(rng, low, high, mode).round() as i64
}

/// Iterator over rows of triangular integers.
pub struct TriangularRows {
    config: SyntheticConfig,
    rng: StdRng,
    emitted: usize,
}

impl TriangularRows {
    pub fn new(config: SyntheticConfig) -> Self {
        let rng = StdRng::seed_from_u64(config.seed);
        Self {
            config,
            rng,
            emitted: 0,
        }
    }
}

impl Iterator for TriangularRows {
    type Item = Vec<i64>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.emitted >= self.config.rows {
            return None;
        }
        self.emitted += 1;
        let SyntheticConfig {
            columns,
            low,
            high,
            mode,
            ..
        } = self.config;
        Some(
            (0..columns)
                .map(|_| randint_triangular(&mut self.rng, low, high, mode))
                .collect(),
        )
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.config.rows - self.emitted;
        (left, Some(left))
    }
}
