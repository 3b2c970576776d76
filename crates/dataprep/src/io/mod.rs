//! Reading and writing datasets.
//!
//! The pipeline itself only works on in-memory [`Dataset`]s; this module is
//! the boundary where files come in and go out. CSV goes through polars,
//! JSON through serde_json, workbooks through calamine and rust_xlsxwriter.

mod csv;
mod excel;
mod frame;
mod json;

pub use frame::{dataset_from_frame, frame_from_dataset};

use crate::error::{PrepError, Result};
use crate::types::Dataset;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use tracing::info;

/// File formats the codecs understand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
    /// `.xlsx` or `.xls` on input; always written as `.xlsx`.
    Excel,
}

impl ExportFormat {
    /// Pick a format from a path's extension (case-insensitive).
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();
        Self::from_extension(extension)
    }

    pub fn from_extension(extension: &str) -> Result<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            "xlsx" | "xls" => Ok(Self::Excel),
            other => Err(PrepError::UnsupportedFormat(other.to_string())),
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Excel => "xlsx",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Read a dataset, choosing the codec by file extension.
///
/// Fails with [`PrepError::EmptyDataset`] when the file holds no rows.
pub fn read_dataset(path: impl AsRef<Path>) -> Result<Dataset> {
    let path = path.as_ref();
    let format = ExportFormat::from_path(path)?;

    let dataset = match format {
        ExportFormat::Csv => csv::read_csv(path),
        ExportFormat::Json => json::read_json(path),
        ExportFormat::Excel => excel::read_excel(path),
    }
    .map_err(|e| e.with_context(format!("Reading {}", path.display())))?;

    if dataset.is_empty() {
        return Err(PrepError::EmptyDataset.with_context(format!("Reading {}", path.display())));
    }

    info!(
        "Loaded {}: {} rows x {} columns",
        path.display(),
        dataset.len(),
        dataset.column_count()
    );
    Ok(dataset)
}

/// Write a dataset in the given format.
pub fn write_dataset(dataset: &Dataset, path: impl AsRef<Path>, format: ExportFormat) -> Result<()> {
    let path = path.as_ref();
    match format {
        ExportFormat::Csv => csv::write_csv(dataset, path),
        ExportFormat::Json => json::write_json(dataset, path),
        ExportFormat::Excel => excel::write_excel(dataset, path),
    }
    .map_err(|e| e.with_context(format!("Writing {}", path.display())))?;

    info!("Dataset saved: {}", path.display());
    Ok(())
}
