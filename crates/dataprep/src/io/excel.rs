//! Excel codec: calamine for reading, rust_xlsxwriter for writing.

use crate::error::{PrepError, Result};
use crate::types::{Dataset, Row, Value};
use crate::utils::{MAX_SAFE_INTEGER, number_to_value};
use calamine::{Data, Reader, open_workbook_auto};
use rust_xlsxwriter::Workbook;
use std::path::Path;
use tracing::debug;

/// Read the first worksheet of an `.xlsx` or `.xls` workbook.
///
/// The first non-empty row is the header. Blank rows are skipped, short
/// rows are padded with nulls and numeric cells keep their numeric type.
pub(crate) fn read_excel(path: &Path) -> Result<Dataset> {
    let mut workbook = open_workbook_auto(path)?;
    let Some(sheet) = workbook.sheet_names().first().cloned() else {
        return Err(PrepError::InvalidInput("workbook has no sheets".to_string()));
    };
    let range = workbook.worksheet_range(&sheet)?;

    let mut rows = range
        .rows()
        .skip_while(|row| row.iter().all(|c| matches!(c, Data::Empty)));
    let Some(header_cells) = rows.next() else {
        return Ok(Dataset::default());
    };
    let headers: Vec<String> = header_cells
        .iter()
        .enumerate()
        .map(|(idx, c)| match header_name(c) {
            name if name.is_empty() => format!("column_{}", idx + 1),
            name => name,
        })
        .collect();

    let dataset: Dataset = rows
        .filter(|row| row.iter().any(|c| !matches!(c, Data::Empty)))
        .map(|row| {
            headers
                .iter()
                .enumerate()
                .map(|(idx, name)| (name.clone(), row.get(idx).map_or(Value::Null, cell_to_value)))
                .collect::<Row>()
        })
        .collect();

    debug!("Sheet '{}': {} data rows", sheet, dataset.len());
    Ok(dataset)
}

fn header_name(c: &Data) -> String {
    match c {
        Data::String(s) => s.trim().to_string(),
        Data::Float(f) if f.fract() == 0.0 => (*f as i64).to_string(),
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

fn cell_to_value(c: &Data) -> Value {
    match c {
        Data::Empty => Value::Null,
        Data::String(s) => Value::Text(s.clone()),
        Data::Int(i) => Value::Integer(*i),
        Data::Float(f) => number_to_value(*f),
        Data::Bool(b) => Value::Bool(*b),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Value::Text(s.clone()),
        other => Value::Text(other.to_string()),
    }
}

/// Write a single worksheet with a header row of every column name.
pub(crate) fn write_excel(dataset: &Dataset, path: &Path) -> Result<()> {
    let columns = dataset.column_names();
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    for (col, name) in columns.iter().enumerate() {
        worksheet.write_string(0, sheet_col(col)?, name)?;
    }

    for (idx, row) in dataset.iter().enumerate() {
        let sheet_row = u32::try_from(idx + 1)
            .map_err(|_| PrepError::InvalidInput("too many rows for a worksheet".to_string()))?;
        for (col, name) in columns.iter().enumerate() {
            let col = sheet_col(col)?;
            match row.get(name) {
                None | Some(Value::Null) => {}
                Some(Value::Bool(b)) => {
                    worksheet.write_boolean(sheet_row, col, *b)?;
                }
                Some(Value::Integer(i)) if (*i as f64).abs() <= MAX_SAFE_INTEGER => {
                    worksheet.write_number(sheet_row, col, *i as f64)?;
                }
                Some(Value::Float(f)) => {
                    worksheet.write_number(sheet_row, col, *f)?;
                }
                // integers beyond f64 precision are kept exact as text
                Some(other) => {
                    worksheet.write_string(sheet_row, col, other.to_string())?;
                }
            }
        }
    }

    workbook.save(path)?;
    Ok(())
}

fn sheet_col(idx: usize) -> Result<u16> {
    u16::try_from(idx)
        .map_err(|_| PrepError::InvalidInput("too many columns for a worksheet".to_string()))
}
