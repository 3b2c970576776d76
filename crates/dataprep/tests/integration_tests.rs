//! Integration tests for the data cleaning pipeline.
//!
//! These tests verify end-to-end behavior of the pipeline using fixture
//! datasets and hand-built rows.

use dataprep::io::{read_dataset, write_dataset};
use dataprep::{
    CleaningConfig, Dataset, ExportFormat, NumericImputeStrategy, OutlierMethod, Pipeline,
    PipelineStage, ProgressUpdate, ReportGenerator, Row, ScalingMethod, SortOrder, TextCase,
    Value, process,
};
use pretty_assertions::assert_eq;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, mpsc};

// ============================================================================
// Helper Functions
// ============================================================================

fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn load(filename: &str) -> Dataset {
    read_dataset(fixtures_path().join(filename)).expect("Failed to read fixture")
}

fn rows(records: &[&[(&str, &str)]]) -> Dataset {
    records
        .iter()
        .map(|fields| {
            fields
                .iter()
                .map(|(k, v)| (*k, Value::from(*v)))
                .collect::<Row>()
        })
        .collect()
}

fn run(dataset: &Dataset, config: CleaningConfig) -> dataprep::ProcessingResult {
    Pipeline::builder()
        .config(config)
        .build()
        .unwrap()
        .process(dataset)
}

// ============================================================================
// Automated Preset on a Fixture
// ============================================================================

#[test]
fn test_automated_preset_on_customers() {
    let data = load("customers.csv");
    assert_eq!(data.len(), 7);

    let result = run(&data, CleaningConfig::automated());
    let stats = &result.stats;

    assert_eq!(stats.count("Initial Rows"), Some(7));
    assert_eq!(stats.count("Initial Columns"), Some(6));
    assert_eq!(stats.count("Duplicates Removed"), Some(1));
    assert_eq!(stats.count("Columns Dropped (High Missing)"), Some(1));
    assert_eq!(stats.count("Missing Values Imputed"), Some(3));
    // Bob's negative age, then Frank's income
    assert_eq!(stats.count("Outlier Rows Removed (IQR)"), Some(2));
    assert_eq!(stats.count("Rows Failing Validation"), Some(1));
    assert_eq!(stats.count("Final Rows"), Some(3));
    assert_eq!(stats.count("Final Columns"), Some(5));

    assert_eq!(result.column_changes.dropped, vec!["notes".to_string()]);
    assert_eq!(result.column_changes.conversion_for("age"), Some("string → integer"));

    let rejected = &result.validation_errors[0];
    assert_eq!(rejected.row_index, 1);
    assert_eq!(rejected.error, "Invalid email format: carol@bad");

    let cleaned = result.cleaned_data.rows();
    assert_eq!(cleaned[0].get("name"), Some(&Value::from("alice")));
    assert_eq!(cleaned[0].get("id"), Some(&Value::Integer(1)));
    // Dave's missing age and income take the column medians
    assert_eq!(cleaned[1].get("age"), Some(&Value::Integer(34)));
    assert_eq!(cleaned[1].get("income"), Some(&Value::Integer(51000)));
    // Whitespace-only name becomes null, then the string fill
    assert_eq!(cleaned[2].get("name"), Some(&Value::from("Unknown")));
    assert!(cleaned.iter().all(|row| !row.contains("notes")));
}

#[test]
fn test_conservation_of_rows() {
    let data = load("customers.csv");
    let result = run(&data, CleaningConfig::automated());

    let after_transforms = result.stats.count("Initial Rows").unwrap()
        - result.stats.count("Duplicates Removed").unwrap()
        - result.stats.count("Outlier Rows Removed (IQR)").unwrap();

    assert_eq!(
        result.cleaned_data.len() + result.validation_errors.len(),
        after_transforms
    );
}

#[test]
fn test_determinism() {
    let data = load("customers.csv");
    let config = CleaningConfig::builder()
        .handle_duplicates(true)
        .convert_data_types(true)
        .numeric_impute_strategy(NumericImputeStrategy::Mode)
        .sort_by("name", SortOrder::Descending)
        .scaling_method(ScalingMethod::Standardization)
        .perform_validation(true)
        .build()
        .unwrap();

    let first = serde_json::to_string(&run(&data, config.clone())).unwrap();
    let second = serde_json::to_string(&run(&data, config)).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_disabled_pipeline_returns_input_unchanged() {
    let data = load("customers.csv");
    let result = run(&data, CleaningConfig::disabled());

    assert_eq!(result.cleaned_data, data);
    assert!(result.validation_errors.is_empty());
    assert_eq!(
        result.stats.keys().collect::<Vec<_>>(),
        vec!["Initial Rows", "Initial Columns", "Final Rows", "Final Columns"]
    );
}

#[test]
fn test_input_dataset_is_not_mutated() {
    let data = load("customers.csv");
    let snapshot = data.clone();
    let _ = run(&data, CleaningConfig::automated());
    assert_eq!(data, snapshot);
}

#[test]
fn test_runs_do_not_share_ledgers() {
    let pipeline = Pipeline::builder().build().unwrap();
    let data = load("customers.csv");

    let first = pipeline.process(&data);
    let second = pipeline.process(&data);
    assert_eq!(first.stats, second.stats);
}

// ============================================================================
// Worked Examples
// ============================================================================

#[test]
fn test_validation_example() {
    let data = rows(&[
        &[("age", "25"), ("email", "a@b.com")],
        &[("age", "-3"), ("email", "bad")],
    ]);
    let config = CleaningConfig::builder().perform_validation(true).build().unwrap();
    let result = process(&data, &config, None);

    assert_eq!(result.cleaned_data.len(), 1);
    assert_eq!(result.cleaned_data.rows()[0].get("age"), Some(&Value::from("25")));
    assert_eq!(result.validation_errors.len(), 1);
    assert_eq!(result.validation_errors[0].row_index, 1);
    assert!(result.validation_errors[0].error.contains("Invalid age: -3"));
}

#[test]
fn test_outlier_example_uses_lower_index_quartiles() {
    // n=4: Q1 at index 1 (2), Q3 at index 3 (100), bounds [-145, 247]
    let data = rows(&[&[("x", "1")], &[("x", "2")], &[("x", "3")], &[("x", "100")]]);
    let config = CleaningConfig::builder()
        .outlier_method(OutlierMethod::Iqr)
        .build()
        .unwrap();
    let result = process(&data, &config, None);

    assert_eq!(result.cleaned_data.len(), 4);
    assert_eq!(result.stats.count("Outlier Rows Removed (IQR)"), Some(0));
}

#[test]
fn test_duplicates_example() {
    let data = rows(&[&[("a", "1")], &[("a", "1")], &[("a", "2")]]);
    let config = CleaningConfig::builder().handle_duplicates(true).build().unwrap();
    let result = process(&data, &config, None);

    assert_eq!(result.cleaned_data.len(), 2);
    assert_eq!(result.stats.count("Duplicates Removed"), Some(1));
}

#[test]
fn test_dedup_runs_before_normalization() {
    let data = rows(&[&[("a", "x")], &[("a", " X ")]]);
    let config = CleaningConfig::builder()
        .handle_duplicates(true)
        .trim_whitespace(true)
        .text_case(TextCase::Lowercase)
        .build()
        .unwrap();
    let result = process(&data, &config, None);

    assert_eq!(result.stats.count("Duplicates Removed"), Some(0));
    assert_eq!(
        result.cleaned_data,
        rows(&[&[("a", "x")], &[("a", "x")]])
    );
}

#[test]
fn test_threshold_boundary_is_strict() {
    // "b" is missing in exactly half of the rows
    let data = rows(&[&[("a", "1"), ("b", "")], &[("a", "2"), ("b", "y")]]);
    let config = CleaningConfig::builder()
        .drop_high_missing_cols(50)
        .build()
        .unwrap();
    let result = process(&data, &config, None);

    assert_eq!(result.stats.count("Columns Dropped (High Missing)"), Some(0));
    assert!(result.column_changes.dropped.is_empty());
}

#[test]
fn test_constant_column_survives_scaling() {
    let data = rows(&[&[("x", "5")], &[("x", "5")], &[("x", "5")]]);
    for method in [ScalingMethod::Standardization, ScalingMethod::Normalization] {
        let config = CleaningConfig::builder()
            .convert_data_types(true)
            .scaling_method(method)
            .build()
            .unwrap();
        let result = process(&data, &config, None);

        assert!(
            result
                .cleaned_data
                .column_values("x")
                .all(|v| *v == Value::Integer(5))
        );
    }
}

#[test]
fn test_constant_float_column_survives_standardization() {
    let data = rows(&[&[("x", "0.1")], &[("x", "0.1")], &[("x", "0.1")]]);
    let config = CleaningConfig::builder()
        .convert_data_types(true)
        .scaling_method(ScalingMethod::Standardization)
        .build()
        .unwrap();
    let result = process(&data, &config, None);

    assert_eq!(
        result.cleaned_data.column_values("x").cloned().collect::<Vec<_>>(),
        vec![Value::Float(0.1); 3]
    );
}

// ============================================================================
// Progress Reporting Tests
// ============================================================================

#[test]
fn test_progress_reports_every_stage_in_order() {
    let (tx, rx) = mpsc::channel::<ProgressUpdate>();
    let pipeline = Pipeline::builder()
        .config(CleaningConfig::disabled())
        .progress_reporter(Arc::new(tx))
        .build()
        .unwrap();

    pipeline.process(&load("customers.csv"));
    drop(pipeline);

    let updates: Vec<ProgressUpdate> = rx.iter().collect();
    assert_eq!(updates.len(), 11);

    for (i, update) in updates.iter().enumerate() {
        assert_eq!(update.stage, PipelineStage::ALL[i]);
        assert_eq!(update.message, update.stage.display_name());
    }
    for (i, update) in updates[..10].iter().enumerate() {
        assert!((update.progress - (i + 1) as f32 / 11.0).abs() < 1e-6);
    }
    assert_eq!(updates[10].progress, 1.0);
    assert_eq!(updates[10].message, "Validating Data");
    assert_eq!(updates[0].message, "Handling Duplicates");
}

#[test]
fn test_progress_callback_counts() {
    let counter = Arc::new(AtomicUsize::new(0));
    let seen = counter.clone();

    Pipeline::builder()
        .on_progress(move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
        })
        .build()
        .unwrap()
        .process(&load("customers.csv"));

    assert_eq!(counter.load(Ordering::SeqCst), 11);
}

// ============================================================================
// Codec Boundary Tests
// ============================================================================

#[test]
fn test_csv_reads_all_columns_as_text() {
    let data = load("customers.csv");
    let first = &data.rows()[0];

    assert_eq!(first.get("id"), Some(&Value::from("1")));
    assert_eq!(first.get("name"), Some(&Value::from(" Alice ")));
    assert_eq!(first.get("notes"), Some(&Value::Null));
    assert_eq!(
        first.columns().collect::<Vec<_>>(),
        vec!["id", "name", "age", "email", "notes", "income"]
    );
}

#[test]
fn test_json_sort_and_normalize() {
    let data = load("measurements.json");
    assert_eq!(data.rows()[0].get("tags"), Some(&Value::from(r#"["outdoor"]"#)));

    let config = CleaningConfig::builder()
        .sort_by("reading", SortOrder::Descending)
        .scaling_method(ScalingMethod::Normalization)
        .build()
        .unwrap();
    let result = run(&data, config);

    let sensors: Vec<&Value> = result.cleaned_data.column_values("sensor").collect();
    assert_eq!(
        sensors,
        vec![
            &Value::from("b-2"),
            &Value::from("c-3"),
            &Value::from("d-4"),
            &Value::from("a-1")
        ]
    );

    let readings: Vec<Option<f64>> = result
        .cleaned_data
        .column_values("reading")
        .map(Value::as_f64)
        .collect();
    assert_eq!(readings[0], Some(1.0));
    assert!((readings[1].unwrap() - 0.45).abs() < 1e-9);
    assert_eq!(readings[2], Some(0.0));
    assert_eq!(readings[3], None);

    // Booleans have no numeric reading and are left alone
    assert_eq!(result.cleaned_data.rows()[0].get("active"), Some(&Value::Bool(true)));
    assert_eq!(
        result.stats.get("Feature Scaling Applied").map(ToString::to_string),
        Some("normalization".to_string())
    );
}

#[test]
fn test_cleaned_csv_reads_back() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cleaned.csv");

    let result = run(&load("customers.csv"), CleaningConfig::automated());
    write_dataset(&result.cleaned_data, &path, ExportFormat::Csv).unwrap();

    let back = read_dataset(&path).unwrap();
    assert_eq!(back.len(), result.cleaned_data.len());
    assert_eq!(back.rows()[0].get("id"), Some(&Value::from("1")));
    assert_eq!(back.rows()[2].get("name"), Some(&Value::from("Unknown")));
}

#[test]
fn test_header_only_csv_is_empty_dataset() {
    let err = read_dataset(fixtures_path().join("header_only.csv")).unwrap_err();
    assert_eq!(err.error_code(), "EMPTY_DATASET");
    assert!(err.is_user_error());
}

#[test]
fn test_unsupported_extension() {
    let err = read_dataset(fixtures_path().join("customers.xml")).unwrap_err();
    assert_eq!(err.error_code(), "UNSUPPORTED_FORMAT");
}

#[test]
fn test_excel_reads_typed_cells_below_blank_rows() {
    // header sits on row 2; a blank row follows Dave
    let data = load("customers.xlsx");

    assert_eq!(data.len(), 7);
    assert_eq!(
        data.column_names(),
        vec!["id", "name", "age", "email", "notes", "income"]
    );
    assert_eq!(data.rows()[0].get("name"), Some(&Value::from(" Alice ")));
    assert_eq!(data.rows()[0].get("age"), Some(&Value::Integer(34)));
    assert_eq!(data.rows()[0].get("notes"), Some(&Value::Null));
    assert_eq!(data.rows()[4].get("income"), Some(&Value::Null));
    assert_eq!(data.rows()[5].get("email"), Some(&Value::from("eve@example.com")));
}

#[test]
fn test_excel_input_cleans_like_csv() {
    let from_csv = run(&load("customers.csv"), CleaningConfig::automated());
    let from_excel = run(&load("customers.xlsx"), CleaningConfig::automated());

    assert_eq!(from_excel.cleaned_data, from_csv.cleaned_data);
    assert_eq!(from_excel.validation_errors, from_csv.validation_errors);
    for key in ["Duplicates Removed", "Outlier Rows Removed (IQR)", "Final Rows"] {
        assert_eq!(from_excel.stats.count(key), from_csv.stats.count(key));
    }
    // cells are already numeric, so nothing is sampled for age
    assert_eq!(from_excel.column_changes.conversion_for("age"), None);
}

#[test]
fn test_excel_write_then_read() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cleaned.xlsx");
    let result = run(&load("measurements.json"), CleaningConfig::automated());

    write_dataset(&result.cleaned_data, &path, ExportFormat::Excel).unwrap();
    let back = read_dataset(&path).unwrap();

    assert_eq!(back.len(), result.cleaned_data.len());
    assert_eq!(back.column_names(), result.cleaned_data.column_names());
}

// ============================================================================
// Reporting Tests
// ============================================================================

#[test]
fn test_report_generator_writes_all_outputs() {
    let dir = tempfile::tempdir().unwrap();
    let input_path = fixtures_path().join("customers.csv");
    let data = read_dataset(&input_path).unwrap();
    let config = CleaningConfig::automated();
    let result = run(&data, config.clone());

    let generator = ReportGenerator::new(dir.path().to_path_buf(), None);
    let stem = generator.output_stem(&input_path);
    let cleaned = generator
        .write_outputs(&stem, &result, ExportFormat::Json)
        .unwrap();
    let report = ReportGenerator::build_report(
        &input_path,
        Some(cleaned.as_path()),
        &data,
        &result,
        &config,
        std::time::Duration::from_millis(5),
    );
    generator.write_report_to_file(&report, &stem).unwrap();

    assert!(dir.path().join("customers_cleaned.json").exists());
    assert!(dir.path().join("customers_rejected.json").exists());
    assert!(dir.path().join("customers_report.json").exists());

    assert_eq!(read_dataset(&cleaned).unwrap().len(), 3);
    assert!(report.completeness_change > 0.0);
    assert_eq!(report.profile_after.missing_cells, 0);
}
