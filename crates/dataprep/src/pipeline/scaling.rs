//! Feature scaling for numeric columns.

use crate::config::{CleaningConfig, ScalingMethod};
use crate::pipeline::StageContext;
use crate::types::{Dataset, Value};
use crate::utils::{column_numbers, numeric_columns, numeric_value};
use tracing::debug;

/// Per-column parameters of an affine rescaling `(x - offset) / divisor`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleParams {
    pub offset: f64,
    pub divisor: f64,
}

impl ScaleParams {
    /// Parameters for `method` over `values`, or `None` when the column is
    /// constant or empty.
    /// Constancy is `min == max`, not a zero computed spread.
    pub fn fit(method: ScalingMethod, values: &[f64]) -> Option<Self> {
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if values.is_empty() || min == max {
            return None;
        }
        let n = values.len() as f64;

        let params = match method {
            ScalingMethod::None => return None,
            ScalingMethod::Standardization => {
                let mean = values.iter().sum::<f64>() / n;
                let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
                Self {
                    offset: mean,
                    divisor: variance.sqrt(),
                }
            }
            ScalingMethod::Normalization => Self {
                offset: min,
                divisor: max - min,
            },
        };

        (params.divisor != 0.0).then_some(params)
    }

    pub fn apply(&self, value: f64) -> f64 {
        (value - self.offset) / self.divisor
    }
}

/// Scales all-numeric columns in place of their original values.
pub struct FeatureScaler;

impl FeatureScaler {
    /// Rescale every numeric column with the configured method.
    ///
    /// Scaled fields become [`Value::Float`]. Constant columns, missing
    /// values and non-numeric columns are left untouched. Records
    /// `Feature Scaling Applied` with the method name.
    pub fn scale(dataset: Dataset, config: &CleaningConfig, ctx: &mut StageContext) -> Dataset {
        if config.scaling_method == ScalingMethod::None || dataset.is_empty() {
            return dataset;
        }

        let params: Vec<(String, ScaleParams)> = numeric_columns(&dataset)
            .into_iter()
            .filter_map(|column| {
                let fitted = ScaleParams::fit(config.scaling_method, &column_numbers(&dataset, &column));
                if fitted.is_none() {
                    debug!("Leaving constant column '{}' unscaled", column);
                }
                fitted.map(|p| (column, p))
            })
            .collect();

        let out = dataset.map_rows(|row| {
            row.map_values(|column, value| {
                let scaled = params
                    .iter()
                    .find(|(name, _)| name == column)
                    .zip(numeric_value(value))
                    .map(|((_, p), x)| Value::Float(p.apply(x)));
                scaled.unwrap_or_else(|| value.clone())
            })
        });

        ctx.stats
            .record("Feature Scaling Applied", config.scaling_method.as_str());
        out
    }
}
