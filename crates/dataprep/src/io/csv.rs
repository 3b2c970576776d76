//! CSV codec backed by polars.

use crate::error::{Result, ResultExt};
use crate::io::frame::{dataset_from_frame, frame_from_dataset};
use crate::types::Dataset;
use polars::io::csv::read::CsvReadOptions;
use polars::prelude::*;
use std::fs::File;
use std::path::Path;

/// Read a CSV with a header row. Every column is read as text so values
/// stay loosely typed until the pipeline converts them.
pub(crate) fn read_csv(path: &Path) -> Result<Dataset> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .with_parse_options(CsvParseOptions::default().with_quote_char(Some(b'"')))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .context("Opening CSV reader")?
        .finish()
        .context("Parsing CSV")?;

    dataset_from_frame(&df)
}

pub(crate) fn write_csv(dataset: &Dataset, path: &Path) -> Result<()> {
    let mut df = frame_from_dataset(dataset)?;
    let mut file = File::create(path)?;

    CsvWriter::new(&mut file)
        .include_header(true)
        .with_separator(b',')
        .with_quote_char(b'"')
        .finish(&mut df)
        .context("Writing CSV")?;

    Ok(())
}
