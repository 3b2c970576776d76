//! CLI entry point for the data cleaning pipeline.

use anyhow::{Context, Result, anyhow};
use clap::{Parser, ValueEnum};
use dataprep::config::CleaningConfigBuilder;
use dataprep::{
    CleaningConfig, DataProfiler, Dataset, ExportFormat, Mode, NumericImputeStrategy,
    OutlierMethod, Pipeline, ProcessingReport, ReportGenerator, ScalingMethod, SortOrder,
    TextCase, read_dataset,
};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

/// CLI-compatible operation names for `--enable` / `--disable`
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum CliOperation {
    /// Remove exact duplicate rows
    Duplicates,
    /// Drop columns above the missing threshold
    DropMissingCols,
    /// Turn empty strings into nulls
    EmptyStrings,
    /// Trim leading and trailing whitespace
    Trim,
    /// Convert numeric-looking text into numbers
    Convert,
    /// Reject rows failing validation rules
    Validation,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliMode {
    /// Start from the automated preset
    Automated,
    /// Start with every operation disabled
    Interactive,
}

impl From<CliMode> for Mode {
    fn from(cli: CliMode) -> Self {
        match cli {
            CliMode::Automated => Mode::Automated,
            CliMode::Interactive => Mode::Interactive,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliFormat {
    Csv,
    Json,
    Excel,
}

impl From<CliFormat> for ExportFormat {
    fn from(cli: CliFormat) -> Self {
        match cli {
            CliFormat::Csv => ExportFormat::Csv,
            CliFormat::Json => ExportFormat::Json,
            CliFormat::Excel => ExportFormat::Excel,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliTextCase {
    None,
    Lower,
    Upper,
}

impl From<CliTextCase> for TextCase {
    fn from(cli: CliTextCase) -> Self {
        match cli {
            CliTextCase::None => TextCase::None,
            CliTextCase::Lower => TextCase::Lowercase,
            CliTextCase::Upper => TextCase::Uppercase,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliImpute {
    None,
    Mean,
    Median,
    Mode,
}

impl From<CliImpute> for NumericImputeStrategy {
    fn from(cli: CliImpute) -> Self {
        match cli {
            CliImpute::None => NumericImputeStrategy::None,
            CliImpute::Mean => NumericImputeStrategy::Mean,
            CliImpute::Median => NumericImputeStrategy::Median,
            CliImpute::Mode => NumericImputeStrategy::Mode,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliOutliers {
    None,
    Iqr,
}

impl From<CliOutliers> for OutlierMethod {
    fn from(cli: CliOutliers) -> Self {
        match cli {
            CliOutliers::None => OutlierMethod::None,
            CliOutliers::Iqr => OutlierMethod::Iqr,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliScaling {
    None,
    Standardization,
    Normalization,
}

impl From<CliScaling> for ScalingMethod {
    fn from(cli: CliScaling) -> Self {
        match cli {
            CliScaling::None => ScalingMethod::None,
            CliScaling::Standardization => ScalingMethod::Standardization,
            CliScaling::Normalization => ScalingMethod::Normalization,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Configurable tabular data cleaning pipeline",
    long_about = "Cleans a CSV, JSON or Excel dataset and writes the cleaned data, the rows \
                  rejected by validation and an optional JSON report.\n\n\
                  EXAMPLES:\n  \
                  # Automated preset\n  \
                  dataprep -i data.csv\n\n  \
                  # Start from nothing and pick operations\n  \
                  dataprep -i data.csv --mode interactive --enable duplicates,trim --scaling normalization\n\n  \
                  # Settings from a JSON file\n  \
                  dataprep -i data.json --config settings.json --format csv\n\n  \
                  # Excel in, Excel out\n  \
                  dataprep -i data.xlsx --format excel\n\n  \
                  # Preview without writing anything\n  \
                  dataprep -i data.csv --dry-run"
)]
struct Args {
    /// Path to the CSV, JSON, .xlsx or .xls file to clean
    #[arg(short, long)]
    input: PathBuf,

    /// Output directory for results
    #[arg(short, long, default_value = "./outputs")]
    output: PathBuf,

    /// Custom output file stem (defaults to the input file stem)
    #[arg(long)]
    output_name: Option<String>,

    /// Output format (defaults to the input format)
    #[arg(short, long, value_enum)]
    format: Option<CliFormat>,

    /// JSON settings file; takes the place of `--mode`
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Starting configuration when no settings file is given
    #[arg(long, value_enum, default_value = "automated")]
    mode: CliMode,

    /// Operations to switch on
    #[arg(long, value_enum, value_delimiter = ',')]
    enable: Vec<CliOperation>,

    /// Operations to switch off
    #[arg(long, value_enum, value_delimiter = ',')]
    disable: Vec<CliOperation>,

    /// Missing-rate cutoff in percent for dropping columns (1 - 100)
    #[arg(long)]
    missing_threshold: Option<u8>,

    /// Column to sort by
    #[arg(long)]
    sort_column: Option<String>,

    /// Sort in descending order
    #[arg(long)]
    descending: bool,

    /// Text case normalization
    #[arg(long, value_enum)]
    text_case: Option<CliTextCase>,

    /// Imputation strategy for numeric columns
    #[arg(long, value_enum)]
    numeric_impute: Option<CliImpute>,

    /// Fill value for missing text (empty disables)
    #[arg(long)]
    string_impute: Option<String>,

    /// Outlier removal method
    #[arg(long, value_enum)]
    outliers: Option<CliOutliers>,

    /// Feature scaling method
    #[arg(long, value_enum)]
    scaling: Option<CliScaling>,

    /// Preview the dataset and configuration without processing
    #[arg(long)]
    dry_run: bool,

    /// Output JSON to stdout instead of human-readable summary
    ///
    /// Disables all progress logs; only outputs the final JSON report.
    #[arg(long)]
    json: bool,

    /// Write a detailed JSON report to the output directory
    ///
    /// The report will be saved as <name>_report.json
    #[arg(short = 'r', long)]
    emit_report: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show warnings and the final result)
    #[arg(short, long)]
    quiet: bool,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled to ensure
/// only JSON is written to stdout.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level, args.quiet, args.json);

    if !args.input.exists() {
        return Err(anyhow!("Input file not found: {}", args.input.display()));
    }

    let config = resolve_config(&args)?;
    debug!("Resolved configuration: {:?}", config);

    let data = read_dataset(&args.input)?;

    let format = match args.format {
        Some(format) => format.into(),
        None => ExportFormat::from_path(&args.input)?,
    };

    if args.dry_run {
        run_dry_run(&args, &data, &config, format);
        return Ok(());
    }

    run_pipeline(&args, &data, config, format)
}

/// Build the configuration: settings file or mode preset, then CLI overrides.
fn resolve_config(args: &Args) -> Result<CleaningConfig> {
    let base = match &args.config {
        Some(path) => CleaningConfig::from_json_file(path)?,
        None => CleaningConfig::for_mode(args.mode.into()),
    };

    let mut builder = CleaningConfigBuilder::from_config(base);

    for (ops, enable) in [(&args.enable, true), (&args.disable, false)] {
        for op in ops {
            builder = match op {
                CliOperation::Duplicates => builder.handle_duplicates(enable),
                CliOperation::DropMissingCols => builder.drop_high_missing(enable),
                CliOperation::EmptyStrings => builder.handle_empty_strings(enable),
                CliOperation::Trim => builder.trim_whitespace(enable),
                CliOperation::Convert => builder.convert_data_types(enable),
                CliOperation::Validation => builder.perform_validation(enable),
            };
        }
    }

    if let Some(threshold) = args.missing_threshold {
        builder = builder.missing_threshold(threshold);
    }
    if let Some(column) = &args.sort_column {
        let order = if args.descending {
            SortOrder::Descending
        } else {
            SortOrder::Ascending
        };
        builder = builder.sort_by(column, order);
    }
    if let Some(case) = args.text_case {
        builder = builder.text_case(case.into());
    }
    if let Some(strategy) = args.numeric_impute {
        builder = builder.numeric_impute_strategy(strategy.into());
    }
    if let Some(value) = &args.string_impute {
        builder = builder.string_impute_value(value);
    }
    if let Some(method) = args.outliers {
        builder = builder.outlier_method(method.into());
    }
    if let Some(method) = args.scaling {
        builder = builder.scaling_method(method.into());
    }

    builder.build().context("Invalid cleaning configuration")
}

/// Run dry-run mode - show what would happen without processing
///
/// Note: This function uses `println!` intentionally for user-facing CLI output.
/// It should always be visible regardless of log level settings.
fn run_dry_run(args: &Args, data: &Dataset, config: &CleaningConfig, format: ExportFormat) {
    let profile = DataProfiler::profile(data);

    println!("\n{}", "=".repeat(80));
    println!("DRY RUN - Preview of cleaning operations");
    println!("{}\n", "=".repeat(80));

    println!("DATASET OVERVIEW");
    println!("{}", "-".repeat(40));
    println!("  File: {}", args.input.display());
    println!("  Rows: {}", profile.rows);
    println!("  Columns: {}", profile.columns);
    println!(
        "  Completeness: {} ({:?})",
        profile.completeness_label(),
        profile.quality
    );
    println!();

    println!("COLUMN PROFILES");
    println!("{}", "-".repeat(40));
    println!("{:<24} {:<10} {:<10}", "Column", "Type", "Missing");
    println!("{}", "-".repeat(46));
    for col in &profile.column_profiles {
        println!(
            "{:<24} {:<10} {:<10}",
            truncate_str(&col.name, 23),
            col.kind,
            col.missing
        );
    }
    println!();

    println!("CONFIGURATION ({} active operations)", config.active_operations());
    println!("{}", "-".repeat(40));
    println!("  Remove duplicates: {}", config.handle_duplicates);
    if config.drop_high_missing_cols {
        println!("  Drop columns with >{}% missing", config.missing_threshold);
    }
    println!("  Empty strings to null: {}", config.handle_empty_strings);
    println!("  Trim whitespace: {}", config.trim_whitespace);
    println!("  Text case: {:?}", config.text_case);
    println!("  Convert data types: {}", config.convert_data_types);
    println!(
        "  Imputation: numeric {:?}, text {:?}",
        config.numeric_impute_strategy, config.string_impute_value
    );
    println!("  Outliers: {:?}", config.outlier_method);
    if let Some(column) = &config.sort_column {
        println!("  Sort by: {} ({:?})", column, config.sort_order);
    }
    println!("  Scaling: {}", config.scaling_method.as_str());
    println!("  Validation: {}", config.perform_validation);
    println!();

    let generator = ReportGenerator::new(args.output.clone(), args.output_name.clone());
    let stem = generator.output_stem(&args.input);

    println!("OUTPUT FILES (will be created)");
    println!("{}", "-".repeat(40));
    println!("  - {}", generator.cleaned_path(&stem, format).display());
    if config.perform_validation {
        println!(
            "  - {}/{}_rejected.json (if any row fails validation)",
            args.output.display(),
            stem
        );
    }
    if args.emit_report {
        println!("  - {}/{}_report.json", args.output.display(), stem);
    }
    println!();

    println!("{}", "=".repeat(80));
    println!("To execute this cleaning, run without --dry-run");
    println!("{}", "=".repeat(80));
}

/// Truncate a string to max length with ellipsis
fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}

/// Run the pipeline, write outputs and print results.
fn run_pipeline(
    args: &Args,
    data: &Dataset,
    config: CleaningConfig,
    format: ExportFormat,
) -> Result<()> {
    info!("{}", "=".repeat(80));
    info!("Starting cleaning pipeline...");
    info!("{}", "=".repeat(80));

    let mut builder = Pipeline::builder().config(config.clone());
    if !args.quiet {
        builder = builder.on_progress(|update| {
            info!("[{}%] {}", update.percent(), update.message);
        });
    }
    let pipeline = builder.build()?;

    let start = Instant::now();
    let result = pipeline.process(data);
    let duration = start.elapsed();

    let generator = ReportGenerator::new(args.output.clone(), args.output_name.clone());
    let stem = generator.output_stem(&args.input);
    let cleaned_path = generator.write_outputs(&stem, &result, format)?;
    info!("Cleaned data written to: {}", cleaned_path.display());

    let report = ReportGenerator::build_report(
        &args.input,
        Some(cleaned_path.as_path()),
        data,
        &result,
        &config,
        duration,
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if args.emit_report {
        let report_path = generator.write_report_to_file(&report, &stem)?;
        info!("Report written to: {}", report_path.display());
    }

    print_human_readable_summary(&report, &cleaned_path);
    Ok(())
}

/// Print a human-readable summary of the run to stdout.
fn print_human_readable_summary(report: &ProcessingReport, cleaned_path: &Path) {
    println!("\n{}", "=".repeat(80));
    println!("CLEANING COMPLETE");
    println!("{}", "=".repeat(80));

    println!(
        "  Rows: {} -> {}",
        report.profile_before.rows, report.profile_after.rows
    );
    println!(
        "  Columns: {} -> {}",
        report.profile_before.columns, report.profile_after.columns
    );
    println!(
        "  Completeness: {} -> {} ({:+.1} pts)",
        report.profile_before.completeness_label(),
        report.profile_after.completeness_label(),
        report.completeness_change
    );
    println!("  Duration: {} ms", report.duration_ms);
    println!();

    println!("STATISTICS");
    println!("{}", "-".repeat(40));
    for line in report.summary_lines() {
        println!("  {}", line);
    }

    if !report.column_changes.dropped.is_empty() {
        println!();
        println!("DROPPED COLUMNS");
        println!("{}", "-".repeat(40));
        println!("  {}", report.column_changes.dropped.join(", "));
    }

    if !report.column_changes.type_conversions.is_empty() {
        println!();
        println!("TYPE CONVERSIONS");
        println!("{}", "-".repeat(40));
        for (column, change) in &report.column_changes.type_conversions {
            println!("  {}: {}", column, change);
        }
    }

    println!();
    println!("  Output: {}", cleaned_path.display());
    if report.rejected_rows > 0 {
        println!("  Rejected rows: {}", report.rejected_rows);
    }
    println!("{}", "=".repeat(80));
}
