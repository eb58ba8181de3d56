/// Bin edges and the power-of-two coarsening ladder
pub mod layout;

/// Sparse fixed-width histogram accumulation and merge
pub mod accumulator;

/// Estimate percentiles based on a histogram
pub mod quantile;

/// Expand a histogram into labelled bins
pub mod expand;
