use crate::category::EnumSummary;
use crate::cell::RawCell;
use crate::column::ColumnSummary;
use crate::config::SummaryConfig;
use crate::errors::{Error, Result};
use crate::merge::Mergeable;
use crate::report::{ColumnReport, SummaryReport};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Number,
    Enum,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub name: String,
    pub kind: ColumnKind,
}

impl ColumnSpec {
    pub fn number(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ColumnKind::Number,
        }
    }

    pub fn category(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ColumnKind::Enum,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ColumnAccumulator {
    Number(ColumnSummary),
    Enum(EnumSummary),
}

impl ColumnAccumulator {
    pub fn new(kind: ColumnKind, config: &SummaryConfig) -> Self {
        match kind {
            ColumnKind::Number => Self::Number(ColumnSummary::new(config)),
            ColumnKind::Enum => Self::Enum(EnumSummary::new()),
        }
    }

    pub fn kind(&self) -> ColumnKind {
        match self {
            Self::Number(_) => ColumnKind::Number,
            Self::Enum(_) => ColumnKind::Enum,
        }
    }

    pub fn observe_raw(&mut self, raw: RawCell<'_>) -> Result<()> {
        match self {
            Self::Number(summary) => summary.observe_raw(raw),
            Self::Enum(summary) => {
                summary.observe_raw(raw);
                Ok(())
            }
        }
    }

    pub fn as_number(&self) -> Option<&ColumnSummary> {
        match self {
            Self::Number(summary) => Some(summary),
            Self::Enum(_) => None,
        }
    }

    pub fn as_enum(&self) -> Option<&EnumSummary> {
        match self {
            Self::Enum(summary) => Some(summary),
            Self::Number(_) => None,
        }
    }

    pub fn report(&self, name: &str, thresholds: &[f64]) -> Result<ColumnReport> {
        Ok(match self {
            Self::Number(summary) => ColumnReport::Number(summary.report(name, thresholds)?),
            Self::Enum(summary) => ColumnReport::Enum(summary.report(name)),
        })
    }
}

impl Mergeable for ColumnAccumulator {
    fn merge(&self, other: &Self) -> Result<Self> {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => Ok(Self::Number(a.merge(b)?)),
            (Self::Enum(a), Self::Enum(b)) => Ok(Self::Enum(a.combine(b))),
            (a, b) => Err(Error::ColumnMismatch(format!(
                "cannot merge {:?} column with {:?} column",
                a.kind(),
                b.kind()
            ))),
        }
    }
}

/// Row-oriented summary of several columns; every column owns its own accumulator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSummary {
    specs: Vec<ColumnSpec>,
    columns: Vec<ColumnAccumulator>,
}

impl TableSummary {
    pub fn new(specs: Vec<ColumnSpec>, config: &SummaryConfig) -> Self {
        let columns = specs
            .iter()
            .map(|spec| ColumnAccumulator::new(spec.kind, config))
            .collect();
        Self { specs, columns }
    }

    /// Same as [`TableSummary::new`], after checking `config` with [`SummaryConfig::validate`].
    pub fn try_new(specs: Vec<ColumnSpec>, config: &SummaryConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(specs, config))
    }

    /// Cells beyond the end of a short row are counted as missing.
    pub fn observe_row(&mut self, row: &[RawCell<'_>]) -> Result<()> {
        if row.len() > self.columns.len() {
            return Err(Error::RowWidthMismatch {
                expected: self.columns.len(),
                found: row.len(),
            });
        }
        for (index, column) in self.columns.iter_mut().enumerate() {
            column.observe_raw(row.get(index).copied().unwrap_or(RawCell::Null))?;
        }
        Ok(())
    }

    pub fn specs(&self) -> &[ColumnSpec] {
        &self.specs
    }

    pub fn columns(&self) -> &[ColumnAccumulator] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&ColumnAccumulator> {
        self.specs
            .iter()
            .position(|spec| spec.name == name)
            .map(|index| &self.columns[index])
    }

    pub fn report(&self, thresholds: &[f64]) -> Result<SummaryReport> {
        let columns = self
            .specs
            .iter()
            .zip(&self.columns)
            .map(|(spec, column)| column.report(&spec.name, thresholds))
            .collect::<Result<Vec<_>>>()?;
        Ok(SummaryReport { columns })
    }
}

impl Mergeable for TableSummary {
    fn merge(&self, other: &Self) -> Result<Self> {
        if self.specs != other.specs {
            return Err(Error::ColumnMismatch(format!(
                "tables have different columns: {:?} vs {:?}",
                self.specs, other.specs
            )));
        }
        let columns = self
            .columns
            .iter()
            .zip(&other.columns)
            .map(|(a, b)| a.merge(b))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            specs: self.specs.clone(),
            columns,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn specs() -> Vec<ColumnSpec> {
        vec![ColumnSpec::number("x"), ColumnSpec::category("color")]
    }

    #[test]
    fn test_rows_feed_their_own_columns() {
        let mut table = TableSummary::new(specs(), &SummaryConfig::default());
        table
            .observe_row(&[RawCell::Int(3), RawCell::Text("red")])
            .unwrap();
        table
            .observe_row(&[RawCell::Text("NA"), RawCell::Text("blue")])
            .unwrap();
        table.observe_row(&[RawCell::Int(5)]).unwrap();
        let x = table.column("x").and_then(ColumnAccumulator::as_number).unwrap();
        assert_eq!(x.count(), 2);
        assert_eq!(x.missing_count(), 1);
        let color = table.column("color").and_then(ColumnAccumulator::as_enum).unwrap();
        assert_eq!(color.count(), 2);
        assert_eq!(color.missing_count(), 1);
    }

    #[test]
    fn test_row_too_wide() {
        let mut table = TableSummary::new(specs(), &SummaryConfig::default());
        assert_eq!(
            table.observe_row(&[RawCell::Int(1), RawCell::Int(2), RawCell::Int(3)]),
            Err(Error::RowWidthMismatch {
                expected: 2,
                found: 3
            })
        );
    }

    #[test]
    fn test_try_new_rejects_bad_hint() {
        let config = SummaryConfig {
            bin_size_hint: Some(-2.0),
            ..SummaryConfig::default()
        };
        assert!(matches!(
            TableSummary::try_new(specs(), &config),
            Err(Error::InvalidConfig(_))
        ));
        assert!(TableSummary::try_new(specs(), &SummaryConfig::default()).is_ok());
    }

    #[test]
    fn test_merge_requires_same_columns() {
        let config = SummaryConfig::default();
        let a = TableSummary::new(specs(), &config);
        let b = TableSummary::new(vec![ColumnSpec::number("x")], &config);
        assert!(matches!(a.merge(&b), Err(Error::ColumnMismatch(_))));
        assert!(a.merge(&a.clone()).is_ok());
    }

    #[test]
    fn test_report_is_tagged() {
        let mut table = TableSummary::new(specs(), &SummaryConfig::default());
        table
            .observe_row(&[RawCell::Int(1), RawCell::Text("red")])
            .unwrap();
        let report = table.report(&[0.5]).unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["columns"][0]["type"], "number");
        assert_eq!(json["columns"][0]["name"], "x");
        assert_eq!(json["columns"][1]["type"], "enum");
        assert_eq!(json["columns"][1]["cardinality"], 1);
    }
}
