use super::layout::{BinLayout, MIN_SCALE};
use crate::config::{SummaryConfig, is_valid_bin_size};
use crate::errors::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// A sparse fixed-width histogram.
///
/// Bins are allocated on demand, keyed by bin index, so memory follows the number of
/// distinct bins hit rather than the value range.
///
/// The bin width is always the finest power of two, at or above a floor, at which
/// every value gets an in-range index and at most `max_bins` bins are allocated. The
/// floor is the configured width when there is one. Otherwise it is 1 while all values
/// are integers (one bin per integer) and the smallest positive f64 afterwards. The
/// layout therefore only depends on the set of values observed: presentation order
/// and sharding do not change it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    max_bins: usize,
    /// Width configured up front rather than adapted to the data
    hinted: bool,
    /// Every value observed so far is an integer
    integral: bool,
    layout: BinLayout,
    bins: BTreeMap<i64, u64>,
}

impl Histogram {
    /// An unusable `bin_size_hint` (see [`SummaryConfig::validate`]) is ignored.
    pub fn new(config: &SummaryConfig) -> Self {
        let hint = config.bin_size_hint.filter(|width| is_valid_bin_size(*width));
        if hint.is_none() && config.bin_size_hint.is_some() {
            warn!(
                "ignoring bin_size_hint {:?}, bin width will follow the data",
                config.bin_size_hint
            );
        }
        Self {
            max_bins: config.max_bins.max(1),
            hinted: hint.is_some(),
            integral: true,
            layout: hint.map_or_else(BinLayout::unit, |width| BinLayout::new(0.0, width)),
            bins: BTreeMap::new(),
        }
    }

    /// Histogram whose layout can only coarsen, never refine.
    pub fn with_layout(layout: BinLayout, max_bins: usize) -> Self {
        Self {
            max_bins: max_bins.max(1),
            hinted: true,
            integral: true,
            layout,
            bins: BTreeMap::new(),
        }
    }

    pub fn observe(&mut self, value: f64) -> Result<()> {
        if !value.is_finite() {
            return Err(Error::NonNumericInput(value));
        }
        if self.integral && value.fract() != 0.0 {
            let exact = self.is_exact();
            self.integral = false;
            if exact {
                self.refine(self.floor());
            }
        }
        self.record(value, 1);
        Ok(())
    }

    /// Adds `count` to the bin holding `value`, coarsening first if `value` is out
    /// of reach of the current scale.
    pub(crate) fn record(&mut self, value: f64, count: u64) {
        let scale = self.layout.scale;
        while !self.layout.holds(value) && self.layout.can_coarsen() {
            self.coarsen(1);
        }
        *self.bins.entry(self.layout.index_of(value)).or_default() += count;
        self.coarsen_to_fit();
        if self.layout.scale != scale {
            debug!(
                "coarsened histogram to {}, {} bins",
                self.layout,
                self.bins.len()
            );
        }
    }

    /// Finest scale this histogram may use
    fn floor(&self) -> i32 {
        if self.hinted || self.integral {
            0
        } else {
            MIN_SCALE
        }
    }

    /// One bin per value: every bin holds exactly the integer equal to its index.
    fn is_exact(&self) -> bool {
        !self.hinted && self.integral && self.layout.scale == 0
    }

    /// Moves an exact histogram down towards `floor`, as far as bin indices stay in range.
    fn refine(&mut self, floor: i32) {
        let depth = (self.layout.scale - floor).max(0).unsigned_abs();
        let steps = match self.bins.keys().map(|index| index.unsigned_abs()).max() {
            None => depth,
            Some(largest) => {
                depth.min(62_u32.saturating_sub(u64::BITS - largest.leading_zeros()))
            }
        };
        if steps == 0 {
            return;
        }
        if !self.bins.is_empty() {
            let factor = 1_i64 << steps;
            self.bins = std::mem::take(&mut self.bins)
                .into_iter()
                .map(|(index, count)| (index * factor, count))
                .collect();
        }
        #[allow(clippy::cast_possible_wrap)]
        let layout = self.layout.with_scale(self.layout.scale - steps as i32);
        self.layout = layout;
    }

    fn coarsen_to_fit(&mut self) {
        while self.bins.len() > self.max_bins && self.layout.can_coarsen() {
            self.coarsen(1);
        }
    }

    fn coarsen(&mut self, steps: u32) {
        if steps == 0 {
            return;
        }
        let mut coarse = BTreeMap::new();
        for (index, count) in std::mem::take(&mut self.bins) {
            *coarse
                .entry(BinLayout::coarse_index(index, steps))
                .or_insert(0_u64) += count;
        }
        #[allow(clippy::cast_possible_wrap)]
        let layout = self.layout.with_scale(self.layout.scale + steps as i32);
        self.layout = layout;
        self.bins = coarse;
    }

    /// Sums two histograms bin by bin.
    ///
    /// Compatible layouts at different scales are brought to a common scale first;
    /// the result is then coarsened further if the union does not fit in `max_bins`.
    pub fn merge(&self, other: &Self) -> Result<Self> {
        if !self.layout.is_compatible(&other.layout) {
            debug!(
                "refusing to merge histograms {} and {}",
                self.layout, other.layout
            );
            return Err(Error::IncompatibleHistograms {
                left: self.layout,
                right: other.layout,
            });
        }
        let mut merged = self.clone();
        let mut right = other.clone();
        merged.max_bins = self.max_bins.min(other.max_bins);
        merged.hinted = self.hinted || other.hinted;
        merged.integral = self.integral && other.integral;
        let floor = merged.floor();
        for side in [&mut merged, &mut right] {
            if side.is_exact() {
                side.refine(floor);
            }
        }
        let scale = merged.layout.scale.max(right.layout.scale);
        merged.coarsen(scale.abs_diff(merged.layout.scale));
        let steps = scale.abs_diff(right.layout.scale);
        for (index, count) in right.bins {
            *merged
                .bins
                .entry(BinLayout::coarse_index(index, steps))
                .or_insert(0) += count;
        }
        merged.coarsen_to_fit();
        Ok(merged)
    }

    pub fn layout(&self) -> BinLayout {
        self.layout
    }

    pub fn bin_size(&self) -> f64 {
        self.layout.bin_size()
    }

    pub fn max_bins(&self) -> usize {
        self.max_bins
    }

    pub fn total(&self) -> u64 {
        self.bins.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    /// Allocated bins in ascending index order
    pub fn bins(&self) -> impl Iterator<Item = (i64, u64)> + '_ {
        self.bins.iter().map(|(index, count)| (*index, *count))
    }

    pub fn nb_bins(&self) -> usize {
        self.bins.len()
    }
}
