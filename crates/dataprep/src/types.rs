use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::fmt;

// ============================================================================
// Field Values
// ============================================================================

/// A single loosely-typed field value.
///
/// Values arrive from codecs mostly as text; stages classify them lazily
/// (see [`crate::utils::numeric_value`]) instead of relying on a declared
/// column type.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Missing value.
    Null,
    /// Boolean, as produced by JSON sources.
    Bool(bool),
    /// Integral number.
    Integer(i64),
    /// Floating point number.
    Float(f64),
    /// Free text, including numbers that have not been converted yet.
    Text(String),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns true for numeric variants (not numeric-looking text).
    pub fn is_number(&self) -> bool {
        matches!(self, Value::Integer(_) | Value::Float(_))
    }

    /// The numeric payload of a numeric variant.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Short type name used in logs and reports.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::Text(_) => "string",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map(Into::into).unwrap_or(Value::Null)
    }
}

impl From<serde_json::Value> for Value {
    /// Nested arrays and objects are kept as their JSON text.
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Integer(i),
                None => n.as_f64().map(Value::Float).unwrap_or(Value::Null),
            },
            serde_json::Value::String(s) => Value::Text(s),
            other => Value::Text(other.to_string()),
        }
    }
}

// ============================================================================
// Rows and Datasets
// ============================================================================

/// An ordered mapping from column name to [`Value`].
///
/// Field order is preserved so that a dataset passing through a pipeline
/// with every stage disabled comes out structurally identical.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    fields: Vec<(String, Value)>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            fields: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    pub fn contains(&self, column: &str) -> bool {
        self.get(column).is_some()
    }

    /// Set a field, replacing an existing value in place or appending a new column.
    pub fn insert(&mut self, column: impl Into<String>, value: Value) {
        let column = column.into();
        match self.fields.iter_mut().find(|(name, _)| *name == column) {
            Some((_, existing)) => *existing = value,
            None => self.fields.push((column, value)),
        }
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Build a new row by transforming every value.
    pub fn map_values<F>(&self, mut f: F) -> Row
    where
        F: FnMut(&str, &Value) -> Value,
    {
        self.fields
            .iter()
            .map(|(name, value)| (name.clone(), f(name, value)))
            .collect()
    }

    /// Build a new row holding only `columns`, in the order given.
    /// Columns absent from this row are skipped.
    pub fn project(&self, columns: &[String]) -> Row {
        columns
            .iter()
            .filter_map(|col| self.get(col).map(|value| (col.clone(), value.clone())))
            .collect()
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        let mut row = Row::new();
        for (name, value) in iter {
            row.insert(name, value);
        }
        row
    }
}

impl Serialize for Row {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// An ordered sequence of rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Dataset {
    rows: Vec<Row>,
}

impl Dataset {
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Row> {
        self.rows.iter()
    }

    /// Number of columns, taken from the first row.
    pub fn column_count(&self) -> usize {
        self.rows.first().map(Row::len).unwrap_or(0)
    }

    /// Column names in order of first appearance across all rows.
    ///
    /// For rectangular data this is simply the first row's key order.
    pub fn column_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for row in &self.rows {
            for column in row.columns() {
                if !names.iter().any(|n| n == column) {
                    names.push(column.to_string());
                }
            }
        }
        names
    }

    /// Iterate the values of one column; rows lacking the column are skipped.
    pub fn column_values<'a>(&'a self, column: &'a str) -> impl Iterator<Item = &'a Value> + 'a {
        self.rows.iter().filter_map(move |row| row.get(column))
    }

    /// Build a new dataset by transforming every row.
    pub fn map_rows<F>(&self, f: F) -> Dataset
    where
        F: FnMut(&Row) -> Row,
    {
        Dataset::new(self.rows.iter().map(f).collect())
    }
}

impl FromIterator<Row> for Dataset {
    fn from_iter<I: IntoIterator<Item = Row>>(iter: I) -> Self {
        Dataset::new(iter.into_iter().collect())
    }
}

impl IntoIterator for Dataset {
    type Item = Row;
    type IntoIter = std::vec::IntoIter<Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a Row;
    type IntoIter = std::slice::Iter<'a, Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

// ============================================================================
// Run Ledger
// ============================================================================

/// A statistic recorded during a run: a count or a label.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StatValue {
    Count(usize),
    Label(String),
}

impl StatValue {
    pub fn as_count(&self) -> Option<usize> {
        match self {
            StatValue::Count(n) => Some(*n),
            StatValue::Label(_) => None,
        }
    }
}

impl fmt::Display for StatValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatValue::Count(n) => write!(f, "{}", n),
            StatValue::Label(s) => write!(f, "{}", s),
        }
    }
}

impl From<usize> for StatValue {
    fn from(n: usize) -> Self {
        StatValue::Count(n)
    }
}

impl From<&str> for StatValue {
    fn from(s: &str) -> Self {
        StatValue::Label(s.to_string())
    }
}

/// Human-readable run statistics in the order they were recorded.
///
/// Keys are written once per run; a second write to the same key is ignored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatisticsLedger {
    entries: Vec<(String, StatValue)>,
}

impl StatisticsLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a statistic. Returns false if the key was already recorded.
    pub fn record(&mut self, key: impl Into<String>, value: impl Into<StatValue>) -> bool {
        let key = key.into();
        if self.get(&key).is_some() {
            tracing::warn!("Statistic '{}' already recorded, keeping first value", key);
            return false;
        }
        self.entries.push((key, value.into()));
        true
    }

    pub fn get(&self, key: &str) -> Option<&StatValue> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, value)| value)
    }

    /// Shorthand for a count-valued statistic.
    pub fn count(&self, key: &str) -> Option<usize> {
        self.get(key).and_then(StatValue::as_count)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &StatValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl Serialize for StatisticsLedger {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Structural changes applied to columns during a run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnChangeLog {
    /// Columns dropped for exceeding the missing-value threshold, in column order.
    pub dropped: Vec<String>,
    /// Sample of conversions applied to the first row, e.g. `"string → integer"`.
    /// Descriptive only; no stage reads it.
    #[serde(serialize_with = "serialize_pairs")]
    pub type_conversions: Vec<(String, String)>,
}

fn serialize_pairs<S>(pairs: &[(String, String)], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let mut map = serializer.serialize_map(Some(pairs.len()))?;
    for (key, value) in pairs {
        map.serialize_entry(key, value)?;
    }
    map.end()
}

impl ColumnChangeLog {
    pub fn record_conversion(&mut self, column: impl Into<String>, description: impl Into<String>) {
        let column = column.into();
        let description = description.into();
        match self.type_conversions.iter_mut().find(|(c, _)| *c == column) {
            Some((_, existing)) => *existing = description,
            None => self.type_conversions.push((column, description)),
        }
    }

    pub fn conversion_for(&self, column: &str) -> Option<&str> {
        self.type_conversions
            .iter()
            .find(|(c, _)| c == column)
            .map(|(_, d)| d.as_str())
    }
}

// ============================================================================
// Results
// ============================================================================

/// A row rejected by validation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationError {
    /// Index of the row in the dataset handed to validation.
    pub row_index: usize,
    /// Every triggered rule message, joined by `", "`.
    pub error: String,
    /// Snapshot of the offending row.
    pub data: Row,
}

/// The terminal artifact of one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessingResult {
    pub cleaned_data: Dataset,
    pub stats: StatisticsLedger,
    pub validation_errors: Vec<ValidationError>,
    pub column_changes: ColumnChangeLog,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(fields: &[(&str, Value)]) -> Row {
        fields.iter().cloned().collect()
    }

    #[test]
    fn test_row_preserves_insertion_order() {
        let r = row(&[("b", Value::from("1")), ("a", Value::from("2"))]);
        assert_eq!(r.columns().collect::<Vec<_>>(), vec!["b", "a"]);
    }

    #[test]
    fn test_row_insert_replaces_existing() {
        let mut r = row(&[("a", Value::from("1"))]);
        r.insert("a", Value::Integer(1));
        assert_eq!(r.len(), 1);
        assert_eq!(r.get("a"), Some(&Value::Integer(1)));
    }

    #[test]
    fn test_row_project_keeps_requested_order() {
        let r = row(&[("a", Value::Null), ("b", Value::Null), ("c", Value::Null)]);
        let p = r.project(&["c".to_string(), "a".to_string(), "missing".to_string()]);
        assert_eq!(p.columns().collect::<Vec<_>>(), vec!["c", "a"]);
    }

    #[test]
    fn test_row_serializes_as_ordered_map() {
        let r = row(&[
            ("z", Value::Integer(1)),
            ("a", Value::Null),
            ("m", Value::from("x")),
        ]);
        let json = serde_json::to_string(&r).unwrap();
        assert_eq!(json, r#"{"z":1,"a":null,"m":"x"}"#);
    }

    #[test]
    fn test_value_from_json() {
        assert_eq!(Value::from(serde_json::json!(3)), Value::Integer(3));
        assert_eq!(Value::from(serde_json::json!(2.5)), Value::Float(2.5));
        assert_eq!(Value::from(serde_json::json!(null)), Value::Null);
        assert_eq!(Value::from(serde_json::json!([1, 2])), Value::Text("[1,2]".to_string()));
    }

    #[test]
    fn test_value_display() {
        assert_eq!(Value::Integer(-3).to_string(), "-3");
        assert_eq!(Value::Float(2.5).to_string(), "2.5");
        assert_eq!(Value::from("bad").to_string(), "bad");
    }

    #[test]
    fn test_dataset_column_names_union_in_order() {
        let ds = Dataset::new(vec![
            row(&[("a", Value::Null)]),
            row(&[("a", Value::Null), ("b", Value::Null)]),
        ]);
        assert_eq!(ds.column_names(), vec!["a".to_string(), "b".to_string()]);
        assert_eq!(ds.column_count(), 1);
    }

    #[test]
    fn test_ledger_keeps_first_value() {
        let mut ledger = StatisticsLedger::new();
        assert!(ledger.record("Initial Rows", 3));
        assert!(!ledger.record("Initial Rows", 5));
        assert_eq!(ledger.count("Initial Rows"), Some(3));
    }

    #[test]
    fn test_ledger_serializes_in_recording_order() {
        let mut ledger = StatisticsLedger::new();
        ledger.record("Initial Rows", 2);
        ledger.record("Feature Scaling Applied", "normalization");
        let json = serde_json::to_string(&ledger).unwrap();
        assert_eq!(
            json,
            r#"{"Initial Rows":2,"Feature Scaling Applied":"normalization"}"#
        );
    }
}
