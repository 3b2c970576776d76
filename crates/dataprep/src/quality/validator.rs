//! Heuristic row validation.

use crate::config::CleaningConfig;
use crate::pipeline::StageContext;
use crate::types::{Dataset, Row, ValidationError, Value};
use crate::utils::numeric_value;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Invalid regex: email")
});

/// Magnitude above which a number is considered implausible.
const LARGE_VALUE_LIMIT: f64 = 1e15;

/// Applies column-name keyed sanity rules to every field.
pub struct DataValidator;

impl DataValidator {
    /// Split rows into accepted and rejected.
    ///
    /// A row triggering any rule is removed from the output and reported
    /// with all of its messages. Records `Rows Failing Validation`.
    pub fn validate(
        dataset: Dataset,
        config: &CleaningConfig,
        ctx: &mut StageContext,
    ) -> (Dataset, Vec<ValidationError>) {
        if !config.perform_validation {
            return (dataset, Vec::new());
        }

        let mut accepted = Vec::with_capacity(dataset.len());
        let mut rejected = Vec::new();

        for (row_index, row) in dataset.into_iter().enumerate() {
            let messages = Self::check_row(&row);
            if messages.is_empty() {
                accepted.push(row);
            } else {
                debug!("Row {} failed validation: {}", row_index, messages.join(", "));
                rejected.push(ValidationError {
                    row_index,
                    error: messages.join(", "),
                    data: row,
                });
            }
        }

        ctx.stats.record("Rows Failing Validation", rejected.len());
        (Dataset::new(accepted), rejected)
    }

    /// Messages for every rule a row triggers, in field order.
    pub fn check_row(row: &Row) -> Vec<String> {
        row.iter()
            .flat_map(|(column, value)| Self::check_field(column, value))
            .collect()
    }

    /// Messages for every rule a single field triggers.
    pub fn check_field(column: &str, value: &Value) -> Vec<String> {
        let name = column.to_lowercase();
        let number = numeric_value(value);
        let mut messages = Vec::new();

        if name.contains("age") && number.is_some_and(|n| n < 0.0) {
            messages.push(format!("Invalid age: {}", value));
        }

        if name.contains("email")
            && let Value::Text(s) = value
            && s.contains('@')
            && !EMAIL_PATTERN.is_match(s)
        {
            messages.push(format!("Invalid email format: {}", value));
        }

        if number.is_some_and(|n| n != 0.0 && n.abs() > LARGE_VALUE_LIMIT) {
            messages.push(format!("Extremely large value: {}", value));
        }

        messages
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn enabled() -> CleaningConfig {
        CleaningConfig::builder().perform_validation(true).build().unwrap()
    }

    #[test]
    fn test_negative_age() {
        assert_eq!(
            DataValidator::check_field("Age", &Value::from("-3")),
            vec!["Invalid age: -3".to_string()]
        );
        assert!(DataValidator::check_field("age", &Value::Integer(0)).is_empty());
        assert!(DataValidator::check_field("age", &Value::from("unknown")).is_empty());
    }

    #[test]
    fn test_age_matches_by_substring() {
        // "page_count" contains "age"
        assert_eq!(DataValidator::check_field("page_count", &Value::Integer(-1)).len(), 1);
    }

    #[test]
    fn test_email_rule() {
        assert!(DataValidator::check_field("email", &Value::from("a@b.com")).is_empty());
        assert!(DataValidator::check_field("email", &Value::from("bad")).is_empty());
        assert_eq!(
            DataValidator::check_field("Work Email", &Value::from("a@b")),
            vec!["Invalid email format: a@b".to_string()]
        );
        assert_eq!(DataValidator::check_field("email", &Value::from("a b@c.com")).len(), 1);
    }

    #[test]
    fn test_extremely_large_value() {
        assert_eq!(
            DataValidator::check_field("amount", &Value::Float(2e15)),
            vec!["Extremely large value: 2000000000000000".to_string()]
        );
        assert!(DataValidator::check_field("amount", &Value::Float(1e15)).is_empty());
        assert_eq!(DataValidator::check_field("amount", &Value::from("-1e16")).len(), 1);
    }

    #[test]
    fn test_messages_are_joined_and_indexed() {
        let ds = Dataset::new(vec![
            Row::from_iter([("age", Value::from("25")), ("email", Value::from("a@b.com"))]),
            Row::from_iter([("age", Value::from("-3")), ("email", Value::from("x@y"))]),
        ]);
        let mut ctx = StageContext::default();

        let (accepted, rejected) = DataValidator::validate(ds, &enabled(), &mut ctx);

        assert_eq!(accepted.len(), 1);
        assert_eq!(rejected.len(), 1);
        assert_eq!(rejected[0].row_index, 1);
        assert_eq!(rejected[0].error, "Invalid age: -3, Invalid email format: x@y");
        assert_eq!(rejected[0].data.get("email"), Some(&Value::from("x@y")));
        assert_eq!(ctx.stats.count("Rows Failing Validation"), Some(1));
    }

    #[test]
    fn test_disabled_accepts_everything() {
        let ds = Dataset::new(vec![Row::from_iter([("age", Value::Integer(-1))])]);
        let mut ctx = StageContext::default();
        let (accepted, rejected) = DataValidator::validate(ds.clone(), &CleaningConfig::disabled(), &mut ctx);
        assert_eq!(accepted, ds);
        assert!(rejected.is_empty());
        assert!(ctx.stats.is_empty());
    }
}
