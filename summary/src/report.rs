use serde::{Deserialize, Serialize};

/// Fixed-width histogram as reported: parallel bin labels and counts, non-empty bins only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramReport {
    pub bin_size: f64,
    pub bin_names: Vec<String>,
    pub bins: Vec<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PercentileReport {
    pub thresholds: Vec<f64>,
    pub values: Vec<f64>,
}

/// Report of a numeric column. Statistics that are undefined for an empty column
/// serialize as `null` (or an empty sequence for `min`/`max`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumberReport {
    pub name: String,
    pub n: u64,
    pub zeros: u64,
    pub na: u64,
    /// Smallest distinct values, ascending
    pub min: Vec<f64>,
    /// Largest distinct values, descending
    pub max: Vec<f64>,
    pub mean: Option<f64>,
    pub sigma: Option<f64>,
    pub histogram: HistogramReport,
    pub percentiles: Option<PercentileReport>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumReport {
    pub name: String,
    pub n: u64,
    pub na: u64,
    pub cardinality: usize,
    /// One bin per category, in category order
    pub histogram: HistogramReport,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ColumnReport {
    Number(NumberReport),
    Enum(EnumReport),
}

impl ColumnReport {
    pub fn name(&self) -> &str {
        match self {
            ColumnReport::Number(report) => &report.name,
            ColumnReport::Enum(report) => &report.name,
        }
    }

    pub fn n(&self) -> u64 {
        match self {
            ColumnReport::Number(report) => report.n,
            ColumnReport::Enum(report) => report.n,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryReport {
    pub columns: Vec<ColumnReport>,
}
