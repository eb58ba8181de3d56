use crate::cell::{Cell, RawCell};
use crate::config::SummaryConfig;
use crate::errors::Result;
use crate::extremes::Extremes;
use crate::histogram::accumulator::Histogram;
use crate::histogram::expand::histogram_report;
use crate::histogram::quantile::estimate_percentiles;
use crate::moments::Moments;
use crate::report::{NumberReport, PercentileReport};
use serde::{Deserialize, Serialize};

/// Single-pass summary of one numeric column, or of one shard of it.
///
/// `count` covers numbers and zeros; missing cells are only counted in
/// `missing_count`. Zeros are tracked in `zero_count` and kept out of the
/// histogram, so `histogram.total() + zero_count == count` at all times.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSummary {
    pub(crate) moments: Moments,
    pub(crate) zero_count: u64,
    pub(crate) missing_count: u64,
    pub(crate) extremes: Extremes,
    pub(crate) histogram: Histogram,
}

impl ColumnSummary {
    /// Like [`ColumnSummary::new`], but refuses a config that fails
    /// [`SummaryConfig::validate`] instead of falling back on defaults.
    pub fn try_new(config: &SummaryConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(config))
    }

    pub fn new(config: &SummaryConfig) -> Self {
        Self {
            moments: Moments::new(),
            zero_count: 0,
            missing_count: 0,
            extremes: Extremes::new(config.extremes),
            histogram: Histogram::new(config),
        }
    }

    pub fn observe(&mut self, cell: Cell) -> Result<()> {
        match cell {
            Cell::Missing => self.missing_count += 1,
            Cell::Zero => self.observe_zero()?,
            Cell::Number(value) if value == 0.0 => self.observe_zero()?,
            Cell::Number(value) => {
                // histogram first: it rejects non-finite values before any state changes
                self.histogram.observe(value)?;
                self.moments.observe(value)?;
                self.extremes.observe(value);
            }
        }
        Ok(())
    }

    fn observe_zero(&mut self) -> Result<()> {
        self.moments.observe(0.0)?;
        self.extremes.observe(0.0);
        self.zero_count += 1;
        Ok(())
    }

    pub fn observe_raw(&mut self, raw: RawCell<'_>) -> Result<()> {
        self.observe(Cell::classify(raw))
    }

    pub fn observe_all<'a>(&mut self, cells: impl IntoIterator<Item = RawCell<'a>>) -> Result<()> {
        for raw in cells {
            self.observe_raw(raw)?;
        }
        Ok(())
    }

    pub fn count(&self) -> u64 {
        self.moments.count()
    }

    pub fn is_empty(&self) -> bool {
        self.moments.is_empty()
    }

    pub fn zero_count(&self) -> u64 {
        self.zero_count
    }

    pub fn missing_count(&self) -> u64 {
        self.missing_count
    }

    pub fn min(&self) -> Result<f64> {
        self.moments.min()
    }

    pub fn max(&self) -> Result<f64> {
        self.moments.max()
    }

    pub fn mean(&self) -> Result<f64> {
        self.moments.mean()
    }

    pub fn variance(&self) -> Result<f64> {
        self.moments.variance()
    }

    pub fn sigma(&self) -> Result<f64> {
        self.moments.sigma()
    }

    pub fn moments(&self) -> &Moments {
        &self.moments
    }

    pub fn extremes(&self) -> &Extremes {
        &self.extremes
    }

    /// Histogram of the non-zero numbers
    pub fn histogram(&self) -> &Histogram {
        &self.histogram
    }

    /// Histogram of every counted value: the non-zero bins plus the zeros folded into
    /// the bin holding 0.
    pub fn distribution(&self) -> Histogram {
        let mut distribution = self.histogram.clone();
        if self.zero_count > 0 {
            distribution.record(0.0, self.zero_count);
        }
        distribution
    }

    pub fn percentiles(&self, thresholds: &[f64]) -> Result<Vec<f64>> {
        estimate_percentiles(self, thresholds)
    }

    /// Renders the summary; undefined statistics of an empty column are reported as
    /// absent rather than zero.
    pub fn report(&self, name: &str, thresholds: &[f64]) -> Result<NumberReport> {
        let percentiles = if self.is_empty() {
            None
        } else {
            Some(PercentileReport {
                thresholds: thresholds.to_vec(),
                values: self.percentiles(thresholds)?,
            })
        };
        Ok(NumberReport {
            name: name.to_owned(),
            n: self.count(),
            zeros: self.zero_count,
            na: self.missing_count,
            min: self.extremes.lows().to_vec(),
            max: self.extremes.highs().to_vec(),
            mean: self.mean().ok(),
            sigma: self.sigma().ok(),
            histogram: histogram_report(&self.distribution()),
            percentiles,
        })
    }
}
