use std::fmt;

/// Relation the importer writes and the bot reads.
pub const LISTINGS_TABLE: &str = "listings";

/// Columns every listings relation must provide.
pub const REQUIRED_COLUMNS: [&str; 4] = ["name", "neighbourhood", "neighbourhood_group", "price"];

/// A single cell as returned by the listing store.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Null => Ok(()),
            FieldValue::Integer(v) => write!(f, "{}", v),
            // 整數值的浮點數保留一位小數（40.0 而非 40）
            FieldValue::Real(v) if v.is_finite() && v.fract() == 0.0 => write!(f, "{:.1}", v),
            FieldValue::Real(v) => write!(f, "{}", v),
            FieldValue::Text(v) => f.write_str(v),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

/// One projected row; positions follow the requested column order.
pub type Row = Vec<FieldValue>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub rows: usize,
    pub columns: usize,
}
