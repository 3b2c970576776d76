//! Row ordering by a configured column.

use crate::config::{CleaningConfig, SortOrder};
use crate::types::{Dataset, Row, Value};
use std::cmp::Ordering;
use tracing::{debug, warn};

/// Stable sort by `config.sort_column`.
///
/// Missing values (null or absent) go last in both directions.
pub fn sort_rows(dataset: Dataset, config: &CleaningConfig) -> Dataset {
    let Some(column) = config.sort_column.as_deref() else {
        return dataset;
    };

    if !dataset.iter().any(|row| row.contains(column)) {
        warn!("Sort column '{}' not found, leaving row order unchanged", column);
        return dataset;
    }

    debug!("Sorting by '{}' ({:?})", column, config.sort_order);

    let mut rows = dataset.into_rows();
    rows.sort_by(|a, b| compare_rows(a, b, column, config.sort_order));
    Dataset::new(rows)
}

fn compare_rows(a: &Row, b: &Row, column: &str, order: SortOrder) -> Ordering {
    let a = a.get(column).filter(|v| !v.is_null());
    let b = b.get(column).filter(|v| !v.is_null());

    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => {
            let ordering = compare_values(a, b);
            match order {
                SortOrder::Ascending => ordering,
                SortOrder::Descending => ordering.reverse(),
            }
        }
    }
}

/// Total order over non-null values.
///
/// Numbers compare numerically (booleans as 0 and 1) and text compares
/// lexicographically. Text is never coerced, so a number always sorts
/// before text in ascending order.
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (sort_number(a), sort_number(b)) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.to_string().cmp(&b.to_string()),
    }
}

fn sort_number(value: &Value) -> Option<f64> {
    match value {
        Value::Integer(i) => Some(*i as f64),
        Value::Float(f) => Some(*f),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::Null | Value::Text(_) => None,
    }
}
