// src/extractors/fields.rs
use std::fmt;

use chrono::NaiveDate;
use indexmap::IndexMap;

use crate::extractors::role::TableRole;

/// Column name of the period in every output table.
pub const PERIOD_COLUMN: &str = "date";
pub const FILENAME_COLUMN: &str = "filename";

/// One extracted cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    /// Normalized decimal text, e.g. `-1234` or `5.6`.
    Decimal(String),
    Percent(f64),
}

impl FieldValue {
    pub fn is_zero(&self) -> bool {
        match self {
            FieldValue::Null => false,
            FieldValue::Decimal(text) => text.parse::<f64>().map(|v| v == 0.0).unwrap_or(false),
            FieldValue::Percent(value) => *value == 0.0,
        }
    }

    /// Text written into a CSV cell; `Null` is an empty cell.
    pub fn to_csv_field(&self) -> String {
        match self {
            FieldValue::Null => String::new(),
            FieldValue::Decimal(text) => text.clone(),
            FieldValue::Percent(value) if value.fract() == 0.0 => format!("{:.1}", value),
            FieldValue::Percent(value) => value.to_string(),
        }
    }
}

/// Values extracted from one table role of one document.
///
/// `period` and `filename` are always present; everything else is added as
/// label rows are recognized, in recognition order.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDictionary {
    pub period: Option<NaiveDate>,
    pub filename: String,
    fields: IndexMap<String, FieldValue>,
}

impl FieldDictionary {
    pub fn new(period: Option<NaiveDate>, filename: impl Into<String>) -> Self {
        Self {
            period,
            filename: filename.into(),
            fields: IndexMap::new(),
        }
    }

    /// Sets a field, keeping its first position if it was already set.
    pub fn insert(&mut self, key: impl Into<String>, value: FieldValue) {
        self.fields.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    /// Extracted fields, excluding the period and filename.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// False when nothing beyond the base keys was recognized.
    pub fn has_data(&self) -> bool {
        !self.fields.is_empty()
    }
}

/// Structured record of something that went wrong or was skipped.
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    PeriodUnresolved,
    RoleNotFound { role: TableRole },
    MalformedRow { role: TableRole, row: Vec<String> },
    /// A section sub-label appeared before any section header.
    SectionMissing { role: TableRole, label: String },
    DocumentFailed { cause: String },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::PeriodUnresolved => write!(f, "no month/year token in filename"),
            Diagnostic::RoleNotFound { role } => write!(f, "{} not found", role),
            Diagnostic::MalformedRow { role, row } => {
                write!(f, "{}: fewer than two numeric values in row {:?}", role, row)
            }
            Diagnostic::SectionMissing { role, label } => {
                write!(f, "{}: '{}' row appears before any section header", role, label)
            }
            Diagnostic::DocumentFailed { cause } => write!(f, "document skipped: {}", cause),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_keys_only_has_no_data() {
        let mut dict = FieldDictionary::new(NaiveDate::from_ymd_opt(2021, 12, 1), "a.pdf");
        assert!(!dict.has_data());
        dict.insert("claims_k", FieldValue::Null);
        assert!(dict.has_data());
    }

    #[test]
    fn reinserting_keeps_position() {
        let mut dict = FieldDictionary::new(None, "a.pdf");
        dict.insert("a", FieldValue::Decimal("1".into()));
        dict.insert("b", FieldValue::Decimal("2".into()));
        dict.insert("a", FieldValue::Decimal("3".into()));
        let keys: Vec<&str> = dict.fields().map(|(k, _)| k).collect();
        assert_eq!(keys, ["a", "b"]);
        assert_eq!(dict.get("a"), Some(&FieldValue::Decimal("3".into())));
    }

    #[test]
    fn csv_rendering() {
        assert_eq!(FieldValue::Percent(45.0).to_csv_field(), "45.0");
        assert_eq!(FieldValue::Percent(12.35).to_csv_field(), "12.35");
        assert_eq!(FieldValue::Decimal("-1234".into()).to_csv_field(), "-1234");
        assert_eq!(FieldValue::Null.to_csv_field(), "");
    }

    #[test]
    fn zero_detection() {
        assert!(FieldValue::Decimal("0".into()).is_zero());
        assert!(FieldValue::Percent(0.0).is_zero());
        assert!(!FieldValue::Null.is_zero());
        assert!(!FieldValue::Decimal("0.5".into()).is_zero());
    }
}
