//! colstat summary: single-pass, mergeable summaries of numeric and categorical columns.
//!
//! Each shard of a column is accumulated independently into a [`column::ColumnSummary`]
//! (count, zeros, missing values, min, max, Welford mean/variance and a bounded
//! fixed-width histogram). Shard summaries are combined with [`merge::Mergeable`],
//! which reproduces the single-pass result regardless of how rows were partitioned,
//! and percentiles are then read off the merged histogram.
//!
//! ```
//! use colstat_summary::{cell::RawCell, column::ColumnSummary, config::SummaryConfig, merge::Mergeable};
//!
//! let config = SummaryConfig::default();
//! let mut left = ColumnSummary::new(&config);
//! let mut right = ColumnSummary::new(&config);
//! for v in [1.0, 2.0, 3.0] {
//!     left.observe_raw(RawCell::Float(v)).unwrap();
//! }
//! for v in [4.0, 5.0, 6.0] {
//!     right.observe_raw(RawCell::Float(v)).unwrap();
//! }
//! let merged = left.merge(&right).unwrap();
//! assert_eq!(merged.count(), 6);
//! assert!((merged.mean().unwrap() - 3.5).abs() < 1e-12);
//! ```

// crate-specific lint exceptions:
#![allow(clippy::missing_errors_doc)]

/// Categorical (enum) column summaries
pub mod category;
/// Classification of raw cells into numbers, zeros and missing values
pub mod cell;
/// Summary of one numeric column
pub mod column;
/// Recognized options and their defaults
pub mod config;
/// Error type shared by the crate
pub mod errors;
/// Bounded tracking of the smallest and largest distinct values
pub mod extremes;
/// Fixed-width histograms and the percentile estimates derived from them
pub mod histogram;
/// Associative merge of partial summaries
pub mod merge;
/// Streaming count, min, max, mean and variance
pub mod moments;
/// Strongly typed output structures
pub mod report;
/// Seeded triangular-distribution rows for tests and benchmarks
pub mod synthetic;
/// Row-oriented summaries of several columns
pub mod table;

pub use errors::{Error, Result};
