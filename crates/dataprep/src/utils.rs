//! Shared utilities for the cleaning pipeline.
//!
//! Stages never rely on a declared column type; these helpers give every
//! stage the same best-effort reading of loosely-typed values.

use crate::types::{Dataset, Value};

// =============================================================================
// Missing Values
// =============================================================================

/// Check whether a value counts as missing: null or the empty string.
///
/// Whitespace-only text is *not* missing here; the empty-string stage is
/// responsible for turning it into null.
#[inline]
pub fn is_missing(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Text(s) => s.is_empty(),
        _ => false,
    }
}

/// Check whether a text value is empty once trimmed.
#[inline]
pub fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

// =============================================================================
// Numeric Parsing
// =============================================================================

/// Largest integer an `f64` represents exactly.
pub const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Parse a string as a number, the lenient way spreadsheet exports need.
///
/// Surrounding whitespace is ignored, exponents and a leading sign are
/// accepted, as are unsigned `0x`/`0o`/`0b` integer literals. Blank input
/// and non-finite results are rejected.
///
/// # Example
///
/// ```rust
/// use dataprep::utils::parse_numeric;
///
/// assert_eq!(parse_numeric(" 42 "), Some(42.0));
/// assert_eq!(parse_numeric("1e3"), Some(1000.0));
/// assert_eq!(parse_numeric("0x1F"), Some(31.0));
/// assert_eq!(parse_numeric("abc"), None);
/// ```
pub fn parse_numeric(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }

    let radix = match trimmed.get(..2) {
        Some("0x") | Some("0X") => Some(16),
        Some("0o") | Some("0O") => Some(8),
        Some("0b") | Some("0B") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        return u64::from_str_radix(&trimmed[2..], radix)
            .ok()
            .map(|n| n as f64);
    }

    // Rust accepts "inf"/"nan" spellings; only plain decimal notation counts here
    if trimmed
        .chars()
        .any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E')
    {
        return None;
    }

    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Best-effort numeric reading of a value.
///
/// Numbers are returned as-is, text is parsed with [`parse_numeric`];
/// nulls and booleans have no numeric reading.
#[inline]
pub fn numeric_value(value: &Value) -> Option<f64> {
    match value {
        Value::Integer(i) => Some(*i as f64),
        Value::Float(f) => Some(*f),
        Value::Text(s) => parse_numeric(s),
        Value::Null | Value::Bool(_) => None,
    }
}

/// Narrow a number to [`Value::Integer`] when it has no fractional part.
pub fn number_to_value(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER {
        Value::Integer(n as i64)
    } else {
        Value::Float(n)
    }
}

// =============================================================================
// Column Classification
// =============================================================================

/// Columns where every non-missing value has a numeric reading.
///
/// Columns with no non-missing values at all are not numeric.
pub fn numeric_columns(dataset: &Dataset) -> Vec<String> {
    dataset
        .column_names()
        .into_iter()
        .filter(|column| {
            let mut present = dataset
                .column_values(column)
                .filter(|v| !is_missing(v))
                .peekable();
            present.peek().is_some() && present.all(|v| numeric_value(v).is_some())
        })
        .collect()
}

/// Numeric readings of a column, skipping missing and non-numeric values.
pub fn column_numbers(dataset: &Dataset, column: &str) -> Vec<f64> {
    dataset
        .column_values(column)
        .filter_map(numeric_value)
        .collect()
}
