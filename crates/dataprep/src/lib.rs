//! Tabular Data Cleaning Library
//!
//! A configurable data-cleaning pipeline for row-oriented tabular data.
//!
//! # Overview
//!
//! A [`Dataset`] is an ordered list of [`Row`]s, each an ordered mapping from
//! column name to a loosely-typed [`Value`]. The [`Pipeline`] runs a fixed
//! sequence of stages over it, each switched on or off by [`CleaningConfig`]:
//!
//! - **Cleaning**: duplicate removal, dropping mostly-empty columns, empty
//!   string normalization, whitespace trimming, text case normalization
//! - **Typing**: conversion of numeric-looking text into numbers
//! - **Imputation**: mean/median/mode for numeric columns, a constant for text
//! - **Outliers**: IQR-based row removal
//! - **Ordering and scaling**: stable sort by one column, min-max or z-score scaling
//! - **Validation**: heuristic row rules, failing rows are set aside with a reason
//!
//! Every run produces a [`ProcessingResult`] holding the cleaned data, a
//! statistics ledger, the rejected rows and a log of column changes. The
//! pipeline itself never fails; errors only arise in [`io`] and [`reporting`].
//!
//! # Quick Start
//!
//! ```rust
//! use dataprep::config::NumericImputeStrategy;
//! use dataprep::{CleaningConfig, Dataset, Pipeline, Row, Value};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let data = Dataset::new(vec![
//!     Row::from_iter([("name", Value::from(" Ann ")), ("age", Value::from("30"))]),
//!     Row::from_iter([("name", Value::from(" Ann ")), ("age", Value::from("30"))]),
//!     Row::from_iter([("name", Value::from("Bob")), ("age", Value::Null)]),
//! ]);
//!
//! let config = CleaningConfig::builder()
//!     .handle_duplicates(true)
//!     .trim_whitespace(true)
//!     .convert_data_types(true)
//!     .numeric_impute_strategy(NumericImputeStrategy::Mean)
//!     .build()?;
//!
//! let result = Pipeline::builder()
//!     .config(config)
//!     .on_progress(|update| println!("[{}%] {}", update.percent(), update.message))
//!     .build()?
//!     .process(&data);
//!
//! assert_eq!(result.cleaned_data.len(), 2);
//! assert_eq!(result.stats.count("Duplicates Removed"), Some(1));
//! assert_eq!(result.cleaned_data.rows()[0].get("name"), Some(&Value::from("Ann")));
//! assert_eq!(result.cleaned_data.rows()[1].get("age"), Some(&Value::Integer(30)));
//! # Ok(())
//! # }
//! ```
//!
//! # Files
//!
//! CSV, JSON and Excel datasets are read and written through [`io`]:
//!
//! ```rust,no_run
//! use dataprep::io::{read_dataset, write_dataset, ExportFormat};
//! use dataprep::{CleaningConfig, Pipeline};
//!
//! # fn main() -> dataprep::Result<()> {
//! let data = read_dataset("customers.csv")?;
//! let result = Pipeline::builder()
//!     .config(CleaningConfig::automated())
//!     .build()?
//!     .process(&data);
//! write_dataset(&result.cleaned_data, "customers_cleaned.json", ExportFormat::Json)?;
//! # Ok(())
//! # }
//! ```

pub mod cleaner;
pub mod config;
pub mod error;
pub mod imputers;
pub mod io;
pub mod pipeline;
pub mod profiler;
pub mod quality;
pub mod reporting;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use cleaner::{DataCleaner, TypeConverter};
pub use config::{
    CleaningConfig, CleaningConfigBuilder, ConfigValidationError, Mode, NumericImputeStrategy,
    OutlierMethod, ScalingMethod, SortOrder, TextCase,
};
pub use error::{PrepError, Result, ResultExt};
pub use imputers::StatisticalImputer;
pub use io::{ExportFormat, read_dataset, write_dataset};
pub use pipeline::{
    ClosureProgressReporter, OutlierHandler, Pipeline, PipelineBuilder, PipelineStage,
    ProgressReporter, ProgressUpdate, process,
};
pub use profiler::{DataProfiler, DatasetProfile};
pub use quality::DataValidator;
pub use reporting::{ProcessingReport, ReportGenerator};
pub use types::{
    ColumnChangeLog, Dataset, ProcessingResult, Row, StatValue, StatisticsLedger,
    ValidationError, Value,
};
