//! JSON codec: a top-level array of flat objects.

use crate::error::{PrepError, Result};
use crate::types::{Dataset, Row, Value};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Read an array of objects. Key order is preserved; nested arrays and
/// objects are kept as their JSON text.
pub(crate) fn read_json(path: &Path) -> Result<Dataset> {
    let reader = BufReader::new(File::open(path)?);
    let document: serde_json::Value = serde_json::from_reader(reader)?;
    parse_records(document)
}

pub(crate) fn parse_records(document: serde_json::Value) -> Result<Dataset> {
    let serde_json::Value::Array(records) = document else {
        return Err(PrepError::InvalidInput(
            "expected a JSON array of objects".to_string(),
        ));
    };

    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| match record {
            serde_json::Value::Object(fields) => Ok(fields
                .into_iter()
                .map(|(key, value)| (key, Value::from(value)))
                .collect::<Row>()),
            other => Err(PrepError::InvalidInput(format!(
                "record {} is not an object: {}",
                index, other
            ))),
        })
        .collect()
}

pub(crate) fn write_json(dataset: &Dataset, path: &Path) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, dataset)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_parse_records_preserves_key_order() {
        let ds = parse_records(json!([{"b": 1, "a": "x"}])).unwrap();
        assert_eq!(ds.rows()[0].columns().collect::<Vec<_>>(), vec!["b", "a"]);
    }

    #[test]
    fn test_parse_records_nested_values_become_text() {
        let ds = parse_records(json!([{"tags": ["a", "b"]}])).unwrap();
        assert_eq!(ds.rows()[0].get("tags"), Some(&Value::from(r#"["a","b"]"#)));
    }

    #[test]
    fn test_parse_records_rejects_non_arrays() {
        let err = parse_records(json!({"a": 1})).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");

        let err = parse_records(json!([{"a": 1}, 2])).unwrap_err();
        assert!(err.to_string().contains("record 1"));
    }
}
