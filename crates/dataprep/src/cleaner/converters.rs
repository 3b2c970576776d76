//! Conversion of numeric-looking values into numbers.

use crate::config::CleaningConfig;
use crate::pipeline::StageContext;
use crate::types::{Dataset, Value};
use crate::utils::{is_missing, number_to_value, parse_numeric};
use tracing::debug;

/// Converts string-encoded numerics into [`Value::Integer`] or [`Value::Float`].
pub struct TypeConverter;

impl TypeConverter {
    /// Convert every non-missing field.
    ///
    /// Text that parses as a number becomes that number and integral floats
    /// narrow to integers; anything else non-numeric becomes its string form.
    /// For the first row only, every field whose type changes is sampled
    /// into the change log as `"<from> → <to>"`.
    pub fn convert_types(
        dataset: Dataset,
        config: &CleaningConfig,
        ctx: &mut StageContext,
    ) -> Dataset {
        if !config.convert_data_types {
            return dataset;
        }

        if let Some(first) = dataset.rows().first() {
            for (column, value) in first.iter() {
                let target = Self::convert_value(value);
                if target.type_name() != value.type_name() {
                    ctx.changes.record_conversion(
                        column,
                        format!("{} → {}", value.type_name(), target.type_name()),
                    );
                }
            }
        }

        let mut converted = 0usize;
        let out = dataset.map_rows(|row| {
            row.map_values(|_, value| {
                let result = Self::convert_value(value);
                if result.is_number() && !value.is_number() {
                    converted += 1;
                }
                result
            })
        });

        debug!("Converted {} fields to numbers", converted);
        out
    }

    /// Convert a single value; missing values and integers are returned
    /// unchanged.
    pub fn convert_value(value: &Value) -> Value {
        match value {
            v if is_missing(v) => v.clone(),
            Value::Integer(_) => value.clone(),
            Value::Float(f) => number_to_value(*f),
            _ => {
                let text = value.to_string();
                match parse_numeric(&text) {
                    Some(n) => number_to_value(n),
                    None => Value::Text(text),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Row;
    use pretty_assertions::assert_eq;

    fn config() -> CleaningConfig {
        CleaningConfig::builder().convert_data_types(true).build().unwrap()
    }

    #[test]
    fn test_convert_value() {
        assert_eq!(TypeConverter::convert_value(&Value::from("25")), Value::Integer(25));
        assert_eq!(TypeConverter::convert_value(&Value::from("2.50")), Value::Float(2.5));
        assert_eq!(TypeConverter::convert_value(&Value::from(" 7 ")), Value::Integer(7));
        assert_eq!(TypeConverter::convert_value(&Value::from("abc")), Value::from("abc"));
        assert_eq!(TypeConverter::convert_value(&Value::Float(3.0)), Value::Integer(3));
        assert_eq!(TypeConverter::convert_value(&Value::Null), Value::Null);
        assert_eq!(TypeConverter::convert_value(&Value::from("")), Value::from(""));
    }

    #[test]
    fn test_convert_value_coerces_non_text_to_string_form() {
        assert_eq!(TypeConverter::convert_value(&Value::Bool(true)), Value::from("true"));
    }

    #[test]
    fn test_convert_types_samples_first_row() {
        let ds = Dataset::new(vec![
            Row::from_iter([
                ("age", Value::from("25")),
                ("score", Value::from("9.5")),
                ("name", Value::from("ann")),
                ("n", Value::Integer(1)),
            ]),
            Row::from_iter([
                ("age", Value::from("30")),
                ("score", Value::from("8")),
                ("name", Value::from("bob")),
                ("n", Value::Integer(2)),
            ]),
        ]);
        let mut ctx = StageContext::default();

        let out = TypeConverter::convert_types(ds, &config(), &mut ctx);

        assert_eq!(out.rows()[1].get("score"), Some(&Value::Integer(8)));
        assert_eq!(ctx.changes.conversion_for("age"), Some("string → integer"));
        assert_eq!(ctx.changes.conversion_for("score"), Some("string → float"));
        assert_eq!(ctx.changes.conversion_for("name"), None);
        assert_eq!(ctx.changes.conversion_for("n"), None);
    }

    #[test]
    fn test_convert_value_keeps_large_integers_exact() {
        let big = Value::Integer(9_007_199_254_740_993);
        assert_eq!(TypeConverter::convert_value(&big), big);
        assert_eq!(TypeConverter::convert_value(&Value::Integer(i64::MIN)), Value::Integer(i64::MIN));
        assert_eq!(TypeConverter::convert_value(&Value::Float(2.5)), Value::Float(2.5));
    }

    #[test]
    fn test_convert_types_samples_non_text_changes() {
        let ds = Dataset::new(vec![Row::from_iter([
            ("ratio", Value::Float(2.0)),
            ("score", Value::Float(2.5)),
            ("active", Value::Bool(true)),
        ])]);
        let mut ctx = StageContext::default();

        let out = TypeConverter::convert_types(ds, &config(), &mut ctx);

        assert_eq!(out.rows()[0].get("ratio"), Some(&Value::Integer(2)));
        assert_eq!(ctx.changes.conversion_for("ratio"), Some("float → integer"));
        assert_eq!(ctx.changes.conversion_for("score"), None);
        assert_eq!(ctx.changes.conversion_for("active"), Some("boolean → string"));
    }

    #[test]
    fn test_convert_types_disabled() {
        let ds = Dataset::new(vec![Row::from_iter([("a", Value::from("1"))])]);
        let mut ctx = StageContext::default();
        let out = TypeConverter::convert_types(ds.clone(), &CleaningConfig::disabled(), &mut ctx);
        assert_eq!(out, ds);
        assert!(ctx.changes.type_conversions.is_empty());
    }
}
