/// Text markers treated as missing values, compared after trimming.
pub const MISSING_MARKERS: &[&str] = &["", "NA", "N/A", "na", "null", "NULL", "?"];

/// One input datum, as handed over by the ingestion layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawCell<'a> {
    Float(f64),
    Int(i64),
    Text(&'a str),
    Null,
}

/// Classification of a raw cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cell {
    /// A finite, non-zero number
    Number(f64),
    Zero,
    Missing,
}

impl Cell {
    #[allow(clippy::cast_precision_loss)]
    pub fn classify(raw: RawCell<'_>) -> Self {
        match raw {
            RawCell::Float(v) => Self::from_f64(v),
            RawCell::Int(0) => Self::Zero,
            RawCell::Int(v) => Self::Number(v as f64),
            RawCell::Text(text) => Self::parse(text),
            RawCell::Null => Self::Missing,
        }
    }

    /// `NaN` and infinities are missing; both signed zeros are `Zero`.
    pub fn from_f64(value: f64) -> Self {
        if !value.is_finite() {
            Self::Missing
        } else if value == 0.0 {
            Self::Zero
        } else {
            Self::Number(value)
        }
    }

    pub fn parse(text: &str) -> Self {
        let text = text.trim();
        if MISSING_MARKERS.contains(&text) {
            return Self::Missing;
        }
        match text.parse::<f64>() {
            Ok(value) => Self::from_f64(value),
            Err(_) => Self::Missing,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }
}
