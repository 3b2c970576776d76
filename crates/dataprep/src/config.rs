//! Configuration types for the cleaning pipeline.
//!
//! A [`CleaningConfig`] is an immutable value handed to the pipeline; stages
//! read only the options they care about. Use [`CleaningConfig::builder()`]
//! for a fluent setup or one of the presets.

use crate::error::{PrepError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Whether the configuration is a preset or user-driven.
///
/// Does not affect stage logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Automated,
    Interactive,
}

/// Direction for the sort stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

/// Case normalization applied to text fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TextCase {
    #[default]
    None,
    Lowercase,
    Uppercase,
}

/// Strategy for imputing missing values in numeric columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum NumericImputeStrategy {
    /// Numeric columns fall back to the string fill value
    #[default]
    None,
    /// Arithmetic average of present values
    Mean,
    /// Middle value, or the average of the two middles
    Median,
    /// Most frequent value
    Mode,
}

/// Outlier detection method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutlierMethod {
    #[default]
    None,
    /// Remove rows outside `[Q1 - 1.5*IQR, Q3 + 1.5*IQR]`
    Iqr,
}

/// Feature scaling applied to numeric columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ScalingMethod {
    #[default]
    None,
    /// `(x - mean) / std`
    Standardization,
    /// `(x - min) / (max - min)`
    Normalization,
}

impl ScalingMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Standardization => "standardization",
            Self::Normalization => "normalization",
        }
    }
}

/// Configuration for the cleaning pipeline.
///
/// Every option is always present; a stage is disabled by `false` or a
/// `None` variant rather than by absence. Field names serialize in
/// camelCase so that settings files written by other tools load as-is.
///
/// # Example
///
/// ```rust
/// use dataprep::config::{CleaningConfig, OutlierMethod};
///
/// let config = CleaningConfig::builder()
///     .handle_duplicates(true)
///     .outlier_method(OutlierMethod::Iqr)
///     .build()
///     .unwrap();
/// assert!(config.handle_duplicates);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CleaningConfig {
    /// Preset vs. free configuration.
    pub mode: Mode,

    /// Remove exact duplicate rows, keeping the first occurrence.
    pub handle_duplicates: bool,

    /// Column to sort by; `None` disables sorting.
    pub sort_column: Option<String>,

    /// Sort direction.
    pub sort_order: SortOrder,

    /// Drop columns whose missing rate exceeds `missing_threshold`.
    pub drop_high_missing_cols: bool,

    /// Missing-rate cutoff in percent (1 - 100). Only rates strictly above
    /// the cutoff are dropped.
    pub missing_threshold: u8,

    /// Case normalization for text fields.
    pub text_case: TextCase,

    /// Strip leading/trailing whitespace from text fields.
    pub trim_whitespace: bool,

    /// Turn empty and whitespace-only text into null.
    pub handle_empty_strings: bool,

    /// Imputation strategy for numeric columns.
    pub numeric_impute_strategy: NumericImputeStrategy,

    /// Fill value for text columns; empty disables text imputation.
    pub string_impute_value: String,

    /// Convert numeric-looking text into numbers.
    pub convert_data_types: bool,

    /// Outlier removal method.
    pub outlier_method: OutlierMethod,

    /// Feature scaling method.
    pub scaling_method: ScalingMethod,

    /// Reject rows failing the heuristic validation rules.
    pub perform_validation: bool,
}

impl Default for CleaningConfig {
    fn default() -> Self {
        Self::automated()
    }
}

impl CleaningConfig {
    /// The preset applied in automated mode.
    pub fn automated() -> Self {
        Self {
            mode: Mode::Automated,
            handle_duplicates: true,
            sort_column: None,
            sort_order: SortOrder::Ascending,
            drop_high_missing_cols: true,
            missing_threshold: 90,
            text_case: TextCase::Lowercase,
            trim_whitespace: true,
            handle_empty_strings: true,
            numeric_impute_strategy: NumericImputeStrategy::Median,
            string_impute_value: "Unknown".to_string(),
            convert_data_types: true,
            outlier_method: OutlierMethod::Iqr,
            scaling_method: ScalingMethod::None,
            perform_validation: true,
        }
    }

    /// Every stage switched off. Running this config returns the input unchanged.
    pub fn disabled() -> Self {
        Self {
            mode: Mode::Interactive,
            handle_duplicates: false,
            sort_column: None,
            sort_order: SortOrder::Ascending,
            drop_high_missing_cols: false,
            missing_threshold: 90,
            text_case: TextCase::None,
            trim_whitespace: false,
            handle_empty_strings: false,
            numeric_impute_strategy: NumericImputeStrategy::None,
            string_impute_value: String::new(),
            convert_data_types: false,
            outlier_method: OutlierMethod::None,
            scaling_method: ScalingMethod::None,
            perform_validation: false,
        }
    }

    /// The starting configuration for a mode.
    pub fn for_mode(mode: Mode) -> Self {
        match mode {
            Mode::Automated => Self::automated(),
            Mode::Interactive => Self::disabled(),
        }
    }

    /// Create a new configuration builder starting from [`CleaningConfig::disabled()`].
    pub fn builder() -> CleaningConfigBuilder {
        CleaningConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> std::result::Result<(), ConfigValidationError> {
        if !(1..=100).contains(&self.missing_threshold) {
            return Err(ConfigValidationError::InvalidThreshold(
                self.missing_threshold,
            ));
        }

        if matches!(self.sort_column.as_deref(), Some(col) if col.trim().is_empty()) {
            return Err(ConfigValidationError::EmptySortColumn);
        }

        Ok(())
    }

    /// Parse and validate a JSON configuration.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: CleaningConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            PrepError::Io(e).with_context(format!("Reading config {}", path.display()))
        })?;
        Self::from_json_str(&content)
    }

    /// Whether the imputation stage has anything to do.
    pub fn imputation_enabled(&self) -> bool {
        self.numeric_impute_strategy != NumericImputeStrategy::None
            || !self.string_impute_value.is_empty()
    }

    /// Number of cleaning operations this configuration turns on.
    pub fn active_operations(&self) -> usize {
        [
            self.handle_duplicates,
            self.sort_column.is_some(),
            self.drop_high_missing_cols,
            self.text_case != TextCase::None,
            self.trim_whitespace,
            self.handle_empty_strings,
            self.numeric_impute_strategy != NumericImputeStrategy::None,
            self.convert_data_types,
            self.outlier_method != OutlierMethod::None,
            self.scaling_method != ScalingMethod::None,
            self.perform_validation,
        ]
        .iter()
        .filter(|enabled| **enabled)
        .count()
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid missing threshold: {0} (must be between 1 and 100)")]
    InvalidThreshold(u8),

    #[error("Sort column must not be empty")]
    EmptySortColumn,
}

/// Builder for [`CleaningConfig`] with fluent API.
#[derive(Debug)]
pub struct CleaningConfigBuilder {
    config: CleaningConfig,
}

impl Default for CleaningConfigBuilder {
    fn default() -> Self {
        Self {
            config: CleaningConfig::disabled(),
        }
    }
}

impl CleaningConfigBuilder {
    /// Start from an existing configuration instead of the disabled one.
    pub fn from_config(config: CleaningConfig) -> Self {
        Self { config }
    }

    pub fn mode(mut self, mode: Mode) -> Self {
        self.config.mode = mode;
        self
    }

    pub fn handle_duplicates(mut self, enable: bool) -> Self {
        self.config.handle_duplicates = enable;
        self
    }

    /// Sort by `column`.
    pub fn sort_by(mut self, column: impl Into<String>, order: SortOrder) -> Self {
        self.config.sort_column = Some(column.into());
        self.config.sort_order = order;
        self
    }

    /// Enable column pruning with a cutoff in percent (1 - 100).
    pub fn drop_high_missing_cols(mut self, threshold: u8) -> Self {
        self.config.drop_high_missing_cols = true;
        self.config.missing_threshold = threshold;
        self
    }

    /// Switch column pruning on or off, keeping the current cutoff.
    pub fn drop_high_missing(mut self, enable: bool) -> Self {
        self.config.drop_high_missing_cols = enable;
        self
    }

    /// Missing-rate cutoff in percent (1 - 100).
    pub fn missing_threshold(mut self, threshold: u8) -> Self {
        self.config.missing_threshold = threshold;
        self
    }

    pub fn text_case(mut self, case: TextCase) -> Self {
        self.config.text_case = case;
        self
    }

    pub fn trim_whitespace(mut self, enable: bool) -> Self {
        self.config.trim_whitespace = enable;
        self
    }

    pub fn handle_empty_strings(mut self, enable: bool) -> Self {
        self.config.handle_empty_strings = enable;
        self
    }

    pub fn numeric_impute_strategy(mut self, strategy: NumericImputeStrategy) -> Self {
        self.config.numeric_impute_strategy = strategy;
        self
    }

    pub fn string_impute_value(mut self, value: impl Into<String>) -> Self {
        self.config.string_impute_value = value.into();
        self
    }

    pub fn convert_data_types(mut self, enable: bool) -> Self {
        self.config.convert_data_types = enable;
        self
    }

    pub fn outlier_method(mut self, method: OutlierMethod) -> Self {
        self.config.outlier_method = method;
        self
    }

    pub fn scaling_method(mut self, method: ScalingMethod) -> Self {
        self.config.scaling_method = method;
        self
    }

    pub fn perform_validation(mut self, enable: bool) -> Self {
        self.config.perform_validation = enable;
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `CleaningConfig` or an error if validation fails.
    pub fn build(self) -> std::result::Result<CleaningConfig, ConfigValidationError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
