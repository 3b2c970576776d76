//! Row- and column-level cleaning stages.
//!
//! This module provides:
//! - Removing duplicate rows
//! - Dropping columns with high missing rates
//! - Text sanitization (empty strings, whitespace, case)
//! - Conversion of numeric-looking text into numbers

mod converters;
mod sanitizers;

pub use converters::TypeConverter;
pub use sanitizers::{normalize_empty_strings, normalize_text_case, trim_whitespace};

use crate::config::CleaningConfig;
use crate::pipeline::StageContext;
use crate::types::{Dataset, Row};
use crate::utils::is_missing;
use std::collections::{BTreeMap, HashSet};
use tracing::debug;

/// Data cleaner for dataset-wide structural operations.
pub struct DataCleaner;

impl DataCleaner {
    /// Remove duplicate rows, keeping the first occurrence of each.
    ///
    /// Rows are compared on raw content, so two rows differing only in
    /// formatting (`" a"` vs `"a"`, `"1"` vs `1`) are distinct.
    pub fn remove_duplicates(
        dataset: Dataset,
        config: &CleaningConfig,
        ctx: &mut StageContext,
    ) -> Dataset {
        if !config.handle_duplicates {
            return dataset;
        }

        let before = dataset.len();
        let mut seen: HashSet<String> = HashSet::with_capacity(before);
        let unique: Dataset = dataset
            .into_iter()
            .filter(|row| seen.insert(row_key(row)))
            .collect();

        let removed = before - unique.len();
        debug!("Removed {} duplicate rows", removed);
        ctx.stats.record("Duplicates Removed", removed);
        unique
    }

    /// Drop columns whose missing rate is strictly above `missing_threshold` percent.
    ///
    /// Missing means null, absent from the row, or the empty string. A column
    /// at exactly the threshold is kept, so a threshold of 100 never drops.
    pub fn drop_high_missing_columns(
        dataset: Dataset,
        config: &CleaningConfig,
        ctx: &mut StageContext,
    ) -> Dataset {
        if !config.drop_high_missing_cols || dataset.is_empty() {
            return dataset;
        }

        let threshold = f64::from(config.missing_threshold) / 100.0;
        let row_count = dataset.len() as f64;
        let columns = dataset
            .rows()
            .first()
            .map(|row| row.columns().map(str::to_string).collect::<Vec<_>>())
            .unwrap_or_default();

        let (kept, dropped): (Vec<String>, Vec<String>) =
            columns.into_iter().partition(|column| {
                let missing = dataset
                    .iter()
                    .filter(|row| row.get(column).is_none_or(is_missing))
                    .count();
                missing as f64 / row_count <= threshold
            });

        if !dropped.is_empty() {
            debug!(
                "Dropping {} columns above {}% missing: {:?}",
                dropped.len(),
                config.missing_threshold,
                dropped
            );
        }

        ctx.stats.record("Columns Dropped (High Missing)", dropped.len());
        ctx.changes.dropped = dropped;

        dataset.map_rows(|row| row.project(&kept))
    }
}

/// Canonical value-equality key of a row, independent of field order.
fn row_key(row: &Row) -> String {
    let sorted: BTreeMap<&str, &crate::types::Value> = row.iter().collect();
    // Serializing plain values into a string cannot fail
    serde_json::to_string(&sorted).unwrap_or_default()
}
