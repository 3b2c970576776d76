//! Text sanitization stages.
//!
//! Each function only touches [`Value::Text`] fields; numbers, booleans and
//! nulls pass through untouched.

use crate::config::{CleaningConfig, TextCase};
use crate::types::{Dataset, Value};
use crate::utils::is_blank;
use tracing::debug;

/// Turn empty and whitespace-only text into null.
pub fn normalize_empty_strings(dataset: Dataset, config: &CleaningConfig) -> Dataset {
    if !config.handle_empty_strings {
        return dataset;
    }

    let mut nulled = 0usize;
    let out = dataset.map_rows(|row| {
        row.map_values(|_, value| match value {
            Value::Text(s) if is_blank(s) => {
                nulled += 1;
                Value::Null
            }
            other => other.clone(),
        })
    });

    debug!("Normalized {} empty strings to null", nulled);
    out
}

/// Strip leading and trailing whitespace from text fields.
pub fn trim_whitespace(dataset: Dataset, config: &CleaningConfig) -> Dataset {
    if !config.trim_whitespace {
        return dataset;
    }

    dataset.map_rows(|row| {
        row.map_values(|_, value| match value {
            Value::Text(s) => Value::Text(s.trim().to_string()),
            other => other.clone(),
        })
    })
}

/// Lowercase or uppercase every text field.
pub fn normalize_text_case(dataset: Dataset, config: &CleaningConfig) -> Dataset {
    let convert: fn(&str) -> String = match config.text_case {
        TextCase::None => return dataset,
        TextCase::Lowercase => str::to_lowercase,
        TextCase::Uppercase => str::to_uppercase,
    };

    dataset.map_rows(|row| {
        row.map_values(|_, value| match value {
            Value::Text(s) => Value::Text(convert(s)),
            other => other.clone(),
        })
    })
}
