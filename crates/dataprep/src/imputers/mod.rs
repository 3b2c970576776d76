//! Imputation module for handling missing values.
//!
//! Numeric columns are filled with a statistic (mean, median, mode) of
//! their present values; text columns with a configured constant.

mod statistical;

pub use statistical::{ColumnFill, StatisticalImputer};
