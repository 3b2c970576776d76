//! Outlier handling module.
//!
//! Removes rows whose numeric values fall outside the interquartile fences
//! of their column.

use crate::config::{CleaningConfig, OutlierMethod};
use crate::pipeline::StageContext;
use crate::types::Dataset;
use crate::utils::{column_numbers, numeric_columns, numeric_value};
use tracing::debug;

/// Fewest numeric values a column needs before its bounds are trusted.
const MIN_VALUES: usize = 4;

/// Inclusive acceptance range derived from a column's quartiles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IqrBounds {
    pub q1: f64,
    pub q3: f64,
    pub lower: f64,
    pub upper: f64,
}

impl IqrBounds {
    /// Compute bounds from unsorted values, or `None` with fewer than four.
    ///
    /// Quartiles are taken at indices `floor(n * 0.25)` and `floor(n * 0.75)`
    /// of the sorted values, without interpolation.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.len() < MIN_VALUES {
            return None;
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);
        let n = sorted.len() as f64;
        let q1 = sorted[(n * 0.25).floor() as usize];
        let q3 = sorted[(n * 0.75).floor() as usize];
        let iqr = q3 - q1;

        Some(Self {
            q1,
            q3,
            lower: q1 - 1.5 * iqr,
            upper: q3 + 1.5 * iqr,
        })
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }
}

/// Handles outlier detection and removal.
pub struct OutlierHandler;

impl OutlierHandler {
    /// Remove outlier rows column by column.
    ///
    /// Columns are checked in order and the effect is cumulative: bounds for
    /// a later column are computed only over rows that survived earlier
    /// columns. Rows with a missing or non-numeric value in the column under
    /// check are kept.
    pub fn remove_outliers(
        dataset: Dataset,
        config: &CleaningConfig,
        ctx: &mut StageContext,
    ) -> Dataset {
        if config.outlier_method != OutlierMethod::Iqr || dataset.is_empty() {
            return dataset;
        }

        let before = dataset.len();
        let columns = numeric_columns(&dataset);

        let filtered = columns.iter().fold(dataset, |data, column| {
            let Some(bounds) = IqrBounds::from_values(&column_numbers(&data, column)) else {
                debug!("Skipping outlier check for '{}': too few values", column);
                return data;
            };

            debug!(
                "'{}': Q1={}, Q3={}, bounds [{}, {}]",
                column, bounds.q1, bounds.q3, bounds.lower, bounds.upper
            );

            data.into_iter()
                .filter(|row| {
                    row.get(column)
                        .and_then(numeric_value)
                        .is_none_or(|v| bounds.contains(v))
                })
                .collect()
        });

        let removed = before - filtered.len();
        debug!("Removed {} outlier rows", removed);
        ctx.stats.record("Outlier Rows Removed (IQR)", removed);
        filtered
    }
}
