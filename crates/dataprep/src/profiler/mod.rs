//! Data profiling module for dataset analysis.
//!
//! A profile is a quick overview of a dataset before or after cleaning:
//! its shape, how many cells are missing, and whether each column looks
//! numeric or textual.

use crate::types::Dataset;
use crate::utils::{is_missing, numeric_value};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse classification of a column by its present values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Numeric,
    Text,
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric => write!(f, "Numeric"),
            Self::Text => write!(f, "Text"),
        }
    }
}

/// Overall data quality, banded by the share of missing cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityBand {
    /// Under 10% missing
    Good,
    /// Under 30% missing
    Fair,
    Poor,
}

impl QualityBand {
    pub fn from_missing_ratio(ratio: f64) -> Self {
        if ratio < 0.1 {
            Self::Good
        } else if ratio < 0.3 {
            Self::Fair
        } else {
            Self::Poor
        }
    }
}

/// Profile of a single column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnProfile {
    pub name: String,
    pub missing: usize,
    pub kind: ColumnKind,
}

/// Profile of an entire dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetProfile {
    pub rows: usize,
    pub columns: usize,
    pub total_cells: usize,
    pub missing_cells: usize,
    /// Share of present cells (0.0 - 1.0)
    pub completeness: f64,
    pub quality: QualityBand,
    pub column_profiles: Vec<ColumnProfile>,
}

impl DatasetProfile {
    /// Completeness as a percentage with one decimal, e.g. `"97.5%"`.
    pub fn completeness_label(&self) -> String {
        format!("{:.1}%", self.completeness * 100.0)
    }
}

/// Data profiler for analyzing dataset structure.
pub struct DataProfiler;

impl DataProfiler {
    /// Profile a dataset. Columns are taken from the first row.
    ///
    /// Absent fields count as missing. An empty dataset has zero
    /// completeness and a poor quality band.
    pub fn profile(dataset: &Dataset) -> DatasetProfile {
        let columns: Vec<String> = dataset
            .rows()
            .first()
            .map(|row| row.columns().map(str::to_string).collect())
            .unwrap_or_default();

        let column_profiles: Vec<ColumnProfile> = columns
            .into_iter()
            .map(|name| Self::profile_column(dataset, name))
            .collect();

        let total_cells = dataset.len() * column_profiles.len();
        let missing_cells: usize = column_profiles.iter().map(|c| c.missing).sum();
        let missing_ratio = if total_cells > 0 {
            missing_cells as f64 / total_cells as f64
        } else {
            1.0
        };

        DatasetProfile {
            rows: dataset.len(),
            columns: column_profiles.len(),
            total_cells,
            missing_cells,
            completeness: 1.0 - missing_ratio,
            quality: QualityBand::from_missing_ratio(missing_ratio),
            column_profiles,
        }
    }

    fn profile_column(dataset: &Dataset, name: String) -> ColumnProfile {
        let mut missing = 0usize;
        let mut numeric = 0usize;
        let mut text = 0usize;

        for row in dataset {
            match row.get(&name) {
                None => missing += 1,
                Some(value) if is_missing(value) => missing += 1,
                Some(value) if numeric_value(value).is_some() => numeric += 1,
                Some(_) => text += 1,
            }
        }

        let kind = if numeric > text {
            ColumnKind::Numeric
        } else {
            ColumnKind::Text
        };

        ColumnProfile {
            name,
            missing,
            kind,
        }
    }
}
