// src/extractors/numeric.rs
//! Cell-level number handling for report tables.
//!
//! Values are kept as their cleaned decimal text rather than parsed into
//! floats so that dollar amounts survive untouched into the CSV output.

/// Normalizes one cell token into a canonical decimal string.
///
/// Removes whitespace, thousands separators and `$`, turns accounting
/// negatives `(123)` into `-123`, and maps a lone `-` placeholder to `"0"`.
/// Returns `None` when the result is not a finite number.
pub fn normalize(token: &str) -> Option<String> {
    let filtered: String = token.chars().filter(|c| *c != ',' && *c != '$').collect();
    // "$ 18.2" leaves a gap between the marker and the digits
    let mut cleaned = filtered.trim().to_string();

    if cleaned.len() >= 2 && cleaned.starts_with('(') && cleaned.ends_with(')') {
        cleaned = format!("-{}", &cleaned[1..cleaned.len() - 1]);
    }
    if cleaned == "-" {
        cleaned = "0".to_string();
    }

    if is_finite_decimal(&cleaned) {
        Some(cleaned)
    } else {
        None
    }
}

fn is_finite_decimal(text: &str) -> bool {
    // f64 parsing accepts "inf"/"nan"; those are not report values
    !text.is_empty()
        && text.chars().any(|c| c.is_ascii_digit())
        && text.parse::<f64>().map(f64::is_finite).unwrap_or(false)
}

/// Result of pulling a `(thousands, billions)` style pair out of a row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowPair {
    Found(String, String),
    /// Fewer than two numeric cells; the caller records a diagnostic.
    Malformed,
}

impl RowPair {
    pub fn first(&self) -> Option<&str> {
        match self {
            RowPair::Found(first, _) => Some(first),
            RowPair::Malformed => None,
        }
    }
}

/// Normalizes each present cell and returns the first two numeric values.
pub fn row_values<S: AsRef<str>>(cells: &[Option<S>]) -> RowPair {
    let mut values = cells
        .iter()
        .flatten()
        .filter_map(|cell| normalize(cell.as_ref()));
    match (values.next(), values.next()) {
        (Some(first), Some(second)) => RowPair::Found(first, second),
        _ => RowPair::Malformed,
    }
}

/// Returns the first percentage-looking token of a row.
///
/// A token qualifies when it carries a `%` sign, or when it is a bare
/// decimal with a fractional point (digits, `.` and `-` only).
pub fn row_percentage<S: AsRef<str>>(cells: &[Option<S>]) -> Option<f64> {
    cells.iter().flatten().find_map(|cell| {
        let token = cell.as_ref().trim();
        let bare: String = token.chars().filter(|c| *c != '.' && *c != '-').collect();
        let bare_decimal =
            !bare.is_empty() && bare.chars().all(|c| c.is_ascii_digit()) && token.contains('.');
        if !(token.contains('%') || bare_decimal) {
            return None;
        }
        token
            .replace('%', "")
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
    })
}
