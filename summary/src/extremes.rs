use serde::{Deserialize, Serialize};

/// The `k` smallest and `k` largest distinct values seen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Extremes {
    k: usize,
    /// ascending
    lows: Vec<f64>,
    /// descending
    highs: Vec<f64>,
}

impl Extremes {
    pub fn new(k: usize) -> Self {
        let k = k.max(1);
        Self {
            k,
            lows: Vec::with_capacity(k + 1),
            highs: Vec::with_capacity(k + 1),
        }
    }

    pub fn observe(&mut self, value: f64) {
        insert_bounded(&mut self.lows, value, self.k, |a, b| a.total_cmp(b));
        insert_bounded(&mut self.highs, value, self.k, |a, b| b.total_cmp(a));
    }

    pub fn lows(&self) -> &[f64] {
        &self.lows
    }

    pub fn highs(&self) -> &[f64] {
        &self.highs
    }

    pub fn combine(&self, other: &Self) -> Self {
        let mut combined = Self::new(self.k.min(other.k));
        for value in self.lows.iter().chain(&self.highs) {
            combined.observe(*value);
        }
        for value in other.lows.iter().chain(&other.highs) {
            combined.observe(*value);
        }
        combined
    }
}

fn insert_bounded(
    sorted: &mut Vec<f64>,
    value: f64,
    k: usize,
    cmp: impl Fn(&f64, &f64) -> std::cmp::Ordering,
) {
    if let Err(position) = sorted.binary_search_by(|held| cmp(held, &value))
        && position < k
    {
        sorted.insert(position, value);
        sorted.truncate(k);
    }
}
