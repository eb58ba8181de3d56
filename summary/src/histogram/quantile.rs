use super::accumulator::Histogram;
use super::layout::BinLayout;
use crate::column::ColumnSummary;
use crate::errors::{Error, Result};

/// Rejects any threshold outside `[0, 1]`, NaN included.
pub fn validate_thresholds(thresholds: &[f64]) -> Result<()> {
    match thresholds
        .iter()
        .find(|ratio| !(0.0..=1.0).contains(*ratio))
    {
        Some(ratio) => Err(Error::InvalidThreshold(*ratio)),
        None => Ok(()),
    }
}

/// Walks the bins as an empirical CDF and interpolates inside the bin where the
/// running count reaches `ratio * count`.
///
/// Bin edges are clamped to `[min, max]`, so the estimate never leaves the observed
/// range. A target rank falling exactly on the end of a bin yields that bin's upper
/// edge.
#[allow(clippy::cast_precision_loss)]
pub fn estimate_quantile(
    ratio: f64,
    layout: &BinLayout,
    bins: impl IntoIterator<Item = (i64, u64)>,
    count_values: u64,
    min: f64,
    max: f64,
) -> f64 {
    let quant_count = count_values as f64 * ratio;
    let mut count = 0;
    for (index, this_bucket_count) in bins {
        if this_bucket_count == 0 {
            continue;
        }
        let pop_bucket_start = count as f64;
        count += this_bucket_count;
        if count as f64 >= quant_count {
            let bucket_ratio =
                ((quant_count - pop_bucket_start) / this_bucket_count as f64).clamp(0.0, 1.0);
            let begin_bucket = layout.lower_edge(index).max(min);
            let end_bucket = layout.upper_edge(index).min(max).max(begin_bucket);
            let estimate = (1.0 - bucket_ratio) * begin_bucket + bucket_ratio * end_bucket;
            return estimate.clamp(min, max);
        }
    }
    max
}

/// Estimates the value at each threshold, in input order.
pub fn estimate_percentiles(summary: &ColumnSummary, thresholds: &[f64]) -> Result<Vec<f64>> {
    validate_thresholds(thresholds)?;
    let min = summary.min()?;
    let max = summary.max()?;
    let distribution: Histogram = summary.distribution();
    let layout = distribution.layout();
    Ok(thresholds
        .iter()
        .map(|ratio| {
            estimate_quantile(
                *ratio,
                &layout,
                distribution.bins(),
                summary.count(),
                min,
                max,
            )
        })
        .collect())
}
