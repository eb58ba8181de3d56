//! Error types for summary accumulation, merging and estimation

use crate::histogram::layout::BinLayout;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("summary is empty: no numeric value was observed")]
    EmptySummary,

    #[error("incompatible histograms: {left} vs {right}")]
    IncompatibleHistograms { left: BinLayout, right: BinLayout },

    #[error("percentile threshold {0} is outside [0, 1]")]
    InvalidThreshold(f64),

    #[error("non-numeric value {0} reached the accumulator")]
    NonNumericInput(f64),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("row has {found} cells, table has {expected} columns")]
    RowWidthMismatch { expected: usize, found: usize },

    #[error("column mismatch: {0}")]
    ColumnMismatch(String),
}

pub type Result<T> = std::result::Result<T, Error>;
