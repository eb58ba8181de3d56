use crate::errors::{Error, Result};
use crate::histogram::quantile::validate_thresholds;
use serde::{Deserialize, Serialize};

pub const DEFAULT_PERCENTILE_THRESHOLDS: [f64; 7] = [0.01, 0.1, 0.25, 0.5, 0.75, 0.9, 0.99];
pub const DEFAULT_MAX_BINS: usize = 1024;

/// Options recognized by the summarizer.
///
/// Every shard of a column must be built with the same `bin_size_hint`, otherwise
/// their histograms cannot be merged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryConfig {
    /// Base bin width; follows the data when absent
    pub bin_size_hint: Option<f64>,
    pub percentile_thresholds: Vec<f64>,
    /// Upper bound on allocated bins, exceeding it coarsens the histogram
    pub max_bins: usize,
    /// Number of distinct extreme values reported in `min` and `max`
    pub extremes: usize,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            bin_size_hint: None,
            percentile_thresholds: DEFAULT_PERCENTILE_THRESHOLDS.to_vec(),
            max_bins: DEFAULT_MAX_BINS,
            extremes: 1,
        }
    }
}

/// A usable bin width is finite and positive.
pub fn is_valid_bin_size(bin_size: f64) -> bool {
    bin_size.is_finite() && bin_size > 0.0
}

impl SummaryConfig {
    pub fn validate(&self) -> Result<()> {
        if let Some(bin_size) = self.bin_size_hint
            && !is_valid_bin_size(bin_size)
        {
            return Err(Error::InvalidConfig(format!(
                "bin_size_hint must be a positive number, found {bin_size}"
            )));
        }
        if self.max_bins < 2 {
            return Err(Error::InvalidConfig(format!(
                "max_bins must be at least 2, found {}",
                self.max_bins
            )));
        }
        if self.extremes == 0 {
            return Err(Error::InvalidConfig("extremes must be at least 1".into()));
        }
        validate_thresholds(&self.percentile_thresholds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(SummaryConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_values() {
        let bad_hint = SummaryConfig {
            bin_size_hint: Some(0.0),
            ..SummaryConfig::default()
        };
        assert!(matches!(bad_hint.validate(), Err(Error::InvalidConfig(_))));
        for width in [-1.0, f64::NAN, f64::INFINITY] {
            assert!(!is_valid_bin_size(width), "{width}");
        }
        assert!(is_valid_bin_size(1e-300));

        let bad_bins = SummaryConfig {
            max_bins: 1,
            ..SummaryConfig::default()
        };
        assert!(matches!(bad_bins.validate(), Err(Error::InvalidConfig(_))));

        let bad_threshold = SummaryConfig {
            percentile_thresholds: vec![0.5, 2.0],
            ..SummaryConfig::default()
        };
        assert_eq!(bad_threshold.validate(), Err(Error::InvalidThreshold(2.0)));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: SummaryConfig = serde_json::from_str(r#"{"max_bins": 64}"#).unwrap();
        assert_eq!(config.max_bins, 64);
        assert_eq!(config.bin_size_hint, None);
        assert_eq!(
            config.percentile_thresholds,
            DEFAULT_PERCENTILE_THRESHOLDS.to_vec()
        );
    }
}
