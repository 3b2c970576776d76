//! Conversions between polars `DataFrame`s and [`Dataset`]s.

use crate::error::{Result, ResultExt};
use crate::types::{Dataset, Row, Value};
use polars::prelude::*;

/// Convert a `DataFrame` into rows, keeping column order.
///
/// Integer and float columns map to numbers, strings to text. Other
/// logical types (dates, lists, ...) are kept as their display text.
pub fn dataset_from_frame(df: &DataFrame) -> Result<Dataset> {
    let columns = df.get_columns();
    let mut rows = Vec::with_capacity(df.height());

    for idx in 0..df.height() {
        let mut row = Row::with_capacity(columns.len());
        for column in columns {
            let value = column.get(idx).context("Reading cell")?;
            row.insert(column.name().as_str(), any_value_to_value(value));
        }
        rows.push(row);
    }

    Ok(Dataset::new(rows))
}

fn any_value_to_value(value: AnyValue) -> Value {
    match value {
        AnyValue::Null => Value::Null,
        AnyValue::Boolean(b) => Value::Bool(b),

        AnyValue::Int8(i) => Value::Integer(i.into()),
        AnyValue::Int16(i) => Value::Integer(i.into()),
        AnyValue::Int32(i) => Value::Integer(i.into()),
        AnyValue::Int64(i) => Value::Integer(i),
        AnyValue::UInt8(u) => Value::Integer(u.into()),
        AnyValue::UInt16(u) => Value::Integer(u.into()),
        AnyValue::UInt32(u) => Value::Integer(u.into()),
        AnyValue::UInt64(u) => i64::try_from(u)
            .map(Value::Integer)
            .unwrap_or(Value::Float(u as f64)),

        // NaN and infinities have no place in a cleaned dataset
        AnyValue::Float32(f) if f.is_finite() => Value::Float(f.into()),
        AnyValue::Float64(f) if f.is_finite() => Value::Float(f),
        AnyValue::Float32(_) | AnyValue::Float64(_) => Value::Null,

        AnyValue::String(s) => Value::Text(s.to_string()),
        AnyValue::StringOwned(s) => Value::Text(s.to_string()),

        other => Value::Text(format!("{}", other)),
    }
}

/// Storage type chosen for a column when building a `DataFrame`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnType {
    Int64,
    Float64,
    Boolean,
    String,
}

impl ColumnType {
    /// Narrowest type holding every non-null value of the column.
    fn infer<'a>(values: impl Iterator<Item = &'a Value>) -> Self {
        let mut current: Option<Self> = None;
        for value in values {
            let kind = match value {
                Value::Null => continue,
                Value::Integer(_) => Self::Int64,
                Value::Float(_) => Self::Float64,
                Value::Bool(_) => Self::Boolean,
                Value::Text(_) => return Self::String,
            };
            current = Some(match (current, kind) {
                (None, k) => k,
                (Some(a), b) if a == b => a,
                (Some(Self::Int64), Self::Float64) | (Some(Self::Float64), Self::Int64) => {
                    Self::Float64
                }
                _ => return Self::String,
            });
        }
        current.unwrap_or(Self::String)
    }
}

/// Convert rows into a typed `DataFrame`.
///
/// Each column becomes Int64, Float64, Boolean or String depending on the
/// values it holds; mixed columns fall back to String. Fields absent from
/// a row become null.
pub fn frame_from_dataset(dataset: &Dataset) -> Result<DataFrame> {
    let columns: Vec<Column> = dataset
        .column_names()
        .into_iter()
        .map(|name| {
            let cells: Vec<Option<&Value>> = dataset.iter().map(|row| row.get(&name)).collect();
            let present = cells.iter().flatten().copied();

            let series = match ColumnType::infer(present) {
                ColumnType::Int64 => {
                    let values: Vec<Option<i64>> = cells
                        .iter()
                        .map(|cell| match cell {
                            Some(Value::Integer(i)) => Some(*i),
                            _ => None,
                        })
                        .collect();
                    Series::new(name.as_str().into(), values)
                }
                ColumnType::Float64 => {
                    let values: Vec<Option<f64>> = cells
                        .iter()
                        .map(|cell| cell.and_then(Value::as_f64))
                        .collect();
                    Series::new(name.as_str().into(), values)
                }
                ColumnType::Boolean => {
                    let values: Vec<Option<bool>> = cells
                        .iter()
                        .map(|cell| match cell {
                            Some(Value::Bool(b)) => Some(*b),
                            _ => None,
                        })
                        .collect();
                    Series::new(name.as_str().into(), values)
                }
                ColumnType::String => {
                    let values: Vec<Option<String>> = cells
                        .iter()
                        .map(|cell| cell.filter(|v| !v.is_null()).map(ToString::to_string))
                        .collect();
                    Series::new(name.as_str().into(), values)
                }
            };
            series.into_column()
        })
        .collect();

    DataFrame::new(columns).context("Building DataFrame")
}
