//! Statistical imputation methods.
//!
//! Provides mean, median and mode fill values for numeric columns and a
//! constant fill for everything else.

use crate::config::{CleaningConfig, NumericImputeStrategy};
use crate::pipeline::StageContext;
use crate::types::{Dataset, Value};
use crate::utils::{is_missing, number_to_value, numeric_value};
use std::collections::BTreeMap;
use tracing::debug;

/// Share of present values that must parse as numbers for a column to be
/// imputed as numeric.
const NUMERIC_SHARE: f64 = 0.8;

/// The fill value chosen for one column.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnFill {
    pub column: String,
    pub value: Value,
}

/// Statistical imputation methods for filling missing values.
pub struct StatisticalImputer;

impl StatisticalImputer {
    /// Fill missing values column by column.
    ///
    /// Records `Missing Values Imputed` with the total number of fields
    /// filled. Does nothing when neither a numeric strategy nor a string
    /// fill value is configured.
    pub fn impute_missing(
        dataset: Dataset,
        config: &CleaningConfig,
        ctx: &mut StageContext,
    ) -> Dataset {
        if !config.imputation_enabled() || dataset.is_empty() {
            return dataset;
        }

        let fills = Self::plan(&dataset, config);
        for fill in &fills {
            debug!("Imputing '{}' with {}", fill.column, fill.value);
        }

        let mut imputed = 0usize;
        let out = dataset.map_rows(|row| {
            row.map_values(|column, value| {
                if !is_missing(value) {
                    return value.clone();
                }
                match fills.iter().find(|fill| fill.column == column) {
                    Some(fill) => {
                        imputed += 1;
                        fill.value.clone()
                    }
                    None => value.clone(),
                }
            })
        });

        ctx.stats.record("Missing Values Imputed", imputed);
        out
    }

    /// Choose a fill value for every column that gets one.
    ///
    /// Columns without any present value, and text columns when no string
    /// fill is configured, are left out.
    pub fn plan(dataset: &Dataset, config: &CleaningConfig) -> Vec<ColumnFill> {
        dataset
            .column_names()
            .into_iter()
            .filter_map(|column| {
                let present: Vec<&Value> = dataset
                    .column_values(&column)
                    .filter(|v| !is_missing(v))
                    .collect();
                if present.is_empty() {
                    return None;
                }

                let numbers: Vec<f64> = present.iter().filter_map(|v| numeric_value(v)).collect();
                let is_numeric = numbers.len() as f64 >= present.len() as f64 * NUMERIC_SHARE;

                let value = match config.numeric_impute_strategy {
                    NumericImputeStrategy::Mean if is_numeric => Self::mean(&numbers),
                    NumericImputeStrategy::Median if is_numeric => Self::median(&numbers),
                    NumericImputeStrategy::Mode if is_numeric => Self::mode(&numbers),
                    _ if !config.string_impute_value.is_empty() => {
                        Some(Value::from(config.string_impute_value.as_str()))
                    }
                    _ => None,
                }?;

                Some(ColumnFill { column, value })
            })
            .collect()
    }

    /// Arithmetic average.
    pub fn mean(values: &[f64]) -> Option<Value> {
        if values.is_empty() {
            return None;
        }
        let sum: f64 = values.iter().sum();
        Some(number_to_value(sum / values.len() as f64))
    }

    /// Middle value, or the average of the two middle values for an even count.
    pub fn median(values: &[f64]) -> Option<Value> {
        if values.is_empty() {
            return None;
        }
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);
        let mid = sorted.len() / 2;
        let median = if sorted.len() % 2 == 1 {
            sorted[mid]
        } else {
            (sorted[mid - 1] + sorted[mid]) / 2.0
        };
        Some(number_to_value(median))
    }

    /// Most frequent value. Ties go to the smallest string form.
    pub fn mode(values: &[f64]) -> Option<Value> {
        // Keyed by string form so ties resolve deterministically
        let mut counts: BTreeMap<String, (usize, f64)> = BTreeMap::new();
        for &v in values {
            let entry = counts.entry(number_to_value(v).to_string()).or_insert((0, v));
            entry.0 += 1;
        }

        let mut best: Option<(usize, f64)> = None;
        for &(count, value) in counts.values() {
            if best.is_none_or(|(best_count, _)| count > best_count) {
                best = Some((count, value));
            }
        }
        best.map(|(_, value)| number_to_value(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Row;
    use pretty_assertions::assert_eq;

    fn column(values: Vec<Value>) -> Dataset {
        values
            .into_iter()
            .map(|v| Row::from_iter([("c", v)]))
            .collect()
    }

    fn config(strategy: NumericImputeStrategy, fill: &str) -> CleaningConfig {
        CleaningConfig::builder()
            .numeric_impute_strategy(strategy)
            .string_impute_value(fill)
            .build()
            .unwrap()
    }

    // ==================== Statistic tests ====================

    #[test]
    fn test_mean() {
        assert_eq!(StatisticalImputer::mean(&[1.0, 2.0, 4.0, 5.0]), Some(Value::Integer(3)));
        assert_eq!(StatisticalImputer::mean(&[1.0, 2.0]), Some(Value::Float(1.5)));
        assert_eq!(StatisticalImputer::mean(&[]), None);
    }

    #[test]
    fn test_median_odd_and_even() {
        assert_eq!(StatisticalImputer::median(&[5.0, 1.0, 3.0]), Some(Value::Integer(3)));
        assert_eq!(StatisticalImputer::median(&[4.0, 1.0, 2.0, 3.0]), Some(Value::Float(2.5)));
    }

    #[test]
    fn test_mode_most_frequent() {
        assert_eq!(
            StatisticalImputer::mode(&[1.0, 7.0, 7.0, 2.0]),
            Some(Value::Integer(7))
        );
    }

    #[test]
    fn test_mode_tie_breaking_uses_smallest_string_form() {
        // "10" < "9" as strings
        assert_eq!(
            StatisticalImputer::mode(&[9.0, 10.0, 9.0, 10.0]),
            Some(Value::Integer(10))
        );
    }

    // ==================== impute_missing tests ====================

    #[test]
    fn test_impute_numeric_median() {
        let ds = column(vec![
            Value::Integer(1),
            Value::Null,
            Value::Integer(3),
            Value::from(""),
            Value::Integer(10),
        ]);
        let mut ctx = StageContext::default();

        let out = StatisticalImputer::impute_missing(
            ds,
            &config(NumericImputeStrategy::Median, ""),
            &mut ctx,
        );

        assert_eq!(out.rows()[1].get("c"), Some(&Value::Integer(3)));
        assert_eq!(out.rows()[3].get("c"), Some(&Value::Integer(3)));
        assert_eq!(ctx.stats.count("Missing Values Imputed"), Some(2));
    }

    #[test]
    fn test_text_column_uses_string_fill() {
        let ds = column(vec![Value::from("a"), Value::Null, Value::from("b")]);
        let mut ctx = StageContext::default();

        let out = StatisticalImputer::impute_missing(
            ds,
            &config(NumericImputeStrategy::Mean, "Unknown"),
            &mut ctx,
        );

        assert_eq!(out.rows()[1].get("c"), Some(&Value::from("Unknown")));
    }

    #[test]
    fn test_numeric_column_without_strategy_uses_string_fill() {
        let ds = column(vec![Value::Integer(1), Value::Null]);
        let out = StatisticalImputer::impute_missing(
            ds,
            &config(NumericImputeStrategy::None, "n/a"),
            &mut StageContext::default(),
        );
        assert_eq!(out.rows()[1].get("c"), Some(&Value::from("n/a")));
    }

    #[test]
    fn test_eighty_percent_numeric_is_numeric() {
        // 4 of 5 present values are numeric
        let ds = column(vec![
            Value::from("1"),
            Value::from("2"),
            Value::from("3"),
            Value::from("4"),
            Value::from("x"),
            Value::Null,
        ]);
        let fills = StatisticalImputer::plan(&ds, &config(NumericImputeStrategy::Mean, "Unknown"));
        assert_eq!(fills[0].value, Value::Float(2.5));
    }

    #[test]
    fn test_text_column_without_fill_is_untouched() {
        let ds = column(vec![Value::from("a"), Value::Null]);
        let mut ctx = StageContext::default();
        let out = StatisticalImputer::impute_missing(
            ds.clone(),
            &config(NumericImputeStrategy::Median, ""),
            &mut ctx,
        );
        assert_eq!(out, ds);
        assert_eq!(ctx.stats.count("Missing Values Imputed"), Some(0));
    }

    #[test]
    fn test_all_missing_column_gets_no_fill() {
        let ds = column(vec![Value::Null, Value::from("")]);
        let fills = StatisticalImputer::plan(&ds, &config(NumericImputeStrategy::Mean, "Unknown"));
        assert!(fills.is_empty());
    }

    #[test]
    fn test_imputation_disabled_records_nothing() {
        let ds = column(vec![Value::Integer(1), Value::Null]);
        let mut ctx = StageContext::default();
        let out = StatisticalImputer::impute_missing(ds.clone(), &CleaningConfig::disabled(), &mut ctx);
        assert_eq!(out, ds);
        assert!(ctx.stats.is_empty());
    }
}
