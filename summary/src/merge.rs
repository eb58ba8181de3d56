//! Associative, commutative merge of partial summaries
//!
//! Shards are accumulated independently and combined once they are complete. Merging
//! is pure: both operands are left untouched, so a failed merge cannot corrupt a
//! partially reduced result.

use crate::category::EnumSummary;
use crate::column::ColumnSummary;
use crate::errors::Result;
use crate::extremes::Extremes;
use crate::histogram::accumulator::Histogram;
use crate::moments::Moments;

/// A partial result that can be combined with another one of the same kind.
///
/// Implementations are associative and commutative (up to floating-point rounding),
/// and an empty value is an identity element.
pub trait Mergeable: Sized {
    fn merge(&self, other: &Self) -> Result<Self>;
}

impl Mergeable for Moments {
    fn merge(&self, other: &Self) -> Result<Self> {
        Ok(self.combine(other))
    }
}

impl Mergeable for Extremes {
    fn merge(&self, other: &Self) -> Result<Self> {
        Ok(self.combine(other))
    }
}

impl Mergeable for Histogram {
    fn merge(&self, other: &Self) -> Result<Self> {
        Histogram::merge(self, other)
    }
}

impl Mergeable for EnumSummary {
    fn merge(&self, other: &Self) -> Result<Self> {
        Ok(self.combine(other))
    }
}

impl Mergeable for ColumnSummary {
    /// Counts add up, moments combine with the parallel-variance formula and
    /// histograms add up bin by bin.
    ///
    /// An operand without any counted value is an identity: the other operand is
    /// returned as is, apart from its missing count which absorbs the empty side's.
    fn merge(&self, other: &Self) -> Result<Self> {
        if other.is_empty() {
            return Ok(self.with_extra_missing(other.missing_count));
        }
        if self.is_empty() {
            return Ok(other.with_extra_missing(self.missing_count));
        }
        Ok(ColumnSummary {
            histogram: self.histogram.merge(&other.histogram)?,
            moments: self.moments.combine(&other.moments),
            zero_count: self.zero_count + other.zero_count,
            missing_count: self.missing_count + other.missing_count,
            extremes: self.extremes.combine(&other.extremes),
        })
    }
}

impl ColumnSummary {
    fn with_extra_missing(&self, missing_count: u64) -> Self {
        let mut summary = self.clone();
        summary.missing_count += missing_count;
        summary
    }
}

/// Merges two column summaries; see [`Mergeable`].
pub fn merge(a: &ColumnSummary, b: &ColumnSummary) -> Result<ColumnSummary> {
    a.merge(b)
}

/// Reduces partial results pairwise, level by level: `k` parts take `ceil(log2(k))`
/// levels. Returns `None` for an empty input.
pub fn tree_reduce<T: Mergeable>(parts: Vec<T>) -> Result<Option<T>> {
    let mut level = parts;
    while level.len() > 1 {
        let mut next = Vec::with_capacity(level.len().div_ceil(2));
        let mut iter = level.into_iter();
        while let Some(left) = iter.next() {
            match iter.next() {
                Some(right) => next.push(left.merge(&right)?),
                None => next.push(left),
            }
        }
        level = next;
    }
    Ok(level.pop())
}
