use crate::cell::{MISSING_MARKERS, RawCell};
use crate::report::{EnumReport, HistogramReport};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Summary of a categorical column: exact count per distinct category.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnumSummary {
    count: u64,
    missing_count: u64,
    categories: BTreeMap<String, u64>,
}

impl EnumSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe_raw(&mut self, raw: RawCell<'_>) {
        let category = match raw {
            RawCell::Null => None,
            RawCell::Text(text) => {
                let text = text.trim();
                (!MISSING_MARKERS.contains(&text)).then(|| text.to_owned())
            }
            RawCell::Int(v) => Some(v.to_string()),
            RawCell::Float(v) if v.is_nan() => None,
            RawCell::Float(v) => Some(v.to_string()),
        };
        match category {
            Some(category) => self.observe_category(category),
            None => self.missing_count += 1,
        }
    }

    pub fn observe_category(&mut self, category: String) {
        self.count += 1;
        *self.categories.entry(category).or_insert(0) += 1;
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn missing_count(&self) -> u64 {
        self.missing_count
    }

    pub fn cardinality(&self) -> usize {
        self.categories.len()
    }

    pub fn categories(&self) -> impl Iterator<Item = (&str, u64)> + '_ {
        self.categories
            .iter()
            .map(|(name, count)| (name.as_str(), *count))
    }

    pub fn combine(&self, other: &Self) -> Self {
        let mut combined = self.clone();
        combined.count += other.count;
        combined.missing_count += other.missing_count;
        for (category, count) in &other.categories {
            *combined.categories.entry(category.clone()).or_insert(0) += count;
        }
        combined
    }

    pub fn report(&self, name: &str) -> EnumReport {
        EnumReport {
            name: name.to_owned(),
            n: self.count,
            na: self.missing_count,
            cardinality: self.cardinality(),
            histogram: HistogramReport {
                bin_size: 1.0,
                bin_names: self.categories.keys().cloned().collect(),
                bins: self.categories.values().copied().collect(),
            },
        }
    }
}
