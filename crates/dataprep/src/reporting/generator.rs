use crate::config::CleaningConfig;
use crate::error::{Result, ResultExt};
use crate::io::{write_dataset, ExportFormat};
use crate::profiler::{DataProfiler, DatasetProfile};
use crate::types::{ColumnChangeLog, Dataset, ProcessingResult, StatisticsLedger};
use chrono::Local;
use serde::Serialize;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

// ============================================================================
// Report Types
// ============================================================================

/// Everything worth knowing about one cleaning run.
///
/// Used for both JSON output (`--json`) and file writing (`--emit-report`).
#[derive(Debug, Clone, Serialize)]
pub struct ProcessingReport {
    /// Timestamp when the report was generated
    pub generated_at: String,
    /// Path to the input file
    pub input_file: String,
    /// Path to the cleaned output file (if written)
    pub output_file: Option<String>,
    /// Total execution time in milliseconds
    pub duration_ms: u64,
    /// Configuration the run used
    pub config: CleaningConfig,
    /// Number of cleaning operations switched on
    pub active_operations: usize,
    /// Statistics recorded by the stages, in recording order
    pub stats: StatisticsLedger,
    /// Dropped columns and sampled type conversions
    pub column_changes: ColumnChangeLog,
    /// Number of rows rejected by validation
    pub rejected_rows: usize,
    /// Profile of the input
    pub profile_before: DatasetProfile,
    /// Profile of the cleaned output
    pub profile_after: DatasetProfile,
    /// Completeness change in percentage points
    pub completeness_change: f64,
}

impl ProcessingReport {
    /// Short human-readable summary lines, one per statistic.
    pub fn summary_lines(&self) -> Vec<String> {
        self.stats
            .iter()
            .map(|(key, value)| format!("{}: {}", key, value))
            .collect()
    }
}

// ============================================================================
// Report Generator
// ============================================================================

/// Writes cleaned data, rejected rows and reports to an output directory.
#[derive(Debug, Clone)]
pub struct ReportGenerator {
    output_dir: PathBuf,
    output_name: Option<String>,
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new(PathBuf::from("outputs"), None)
    }
}

impl ReportGenerator {
    /// `output_name` overrides the file stem derived from the input path.
    pub fn new(output_dir: PathBuf, output_name: Option<String>) -> Self {
        Self {
            output_dir,
            output_name,
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// File stem used for every output of a run on `input`.
    pub fn output_stem(&self, input: &Path) -> String {
        self.output_name.clone().unwrap_or_else(|| {
            input
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("dataset")
                .to_string()
        })
    }

    /// Assemble a report from a finished run.
    pub fn build_report(
        input_file: &Path,
        output_file: Option<&Path>,
        input: &Dataset,
        result: &ProcessingResult,
        config: &CleaningConfig,
        duration: Duration,
    ) -> ProcessingReport {
        let profile_before = DataProfiler::profile(input);
        let profile_after = DataProfiler::profile(&result.cleaned_data);
        let completeness_change = (profile_after.completeness - profile_before.completeness) * 100.0;

        ProcessingReport {
            generated_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            input_file: input_file.display().to_string(),
            output_file: output_file.map(|p| p.display().to_string()),
            duration_ms: duration.as_millis() as u64,
            config: config.clone(),
            active_operations: config.active_operations(),
            stats: result.stats.clone(),
            column_changes: result.column_changes.clone(),
            rejected_rows: result.validation_errors.len(),
            profile_before,
            profile_after,
            completeness_change,
        }
    }

    /// Path the cleaned dataset is written to.
    pub fn cleaned_path(&self, stem: &str, format: ExportFormat) -> PathBuf {
        self.output_dir
            .join(format!("{}_cleaned.{}", stem, format.extension()))
    }

    /// Write the cleaned dataset and, if any, the rejected rows.
    ///
    /// Returns the path of the cleaned dataset.
    pub fn write_outputs(
        &self,
        stem: &str,
        result: &ProcessingResult,
        format: ExportFormat,
    ) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)
            .context(format!("Creating {}", self.output_dir.display()))?;

        let cleaned_path = self.cleaned_path(stem, format);
        write_dataset(&result.cleaned_data, &cleaned_path, format)?;

        if !result.validation_errors.is_empty() {
            let rejected_path = self.output_dir.join(format!("{}_rejected.json", stem));
            let json = serde_json::to_string_pretty(&result.validation_errors)?;
            fs::write(&rejected_path, json)
                .context(format!("Writing {}", rejected_path.display()))?;
            info!(
                "{} rejected rows saved: {}",
                result.validation_errors.len(),
                rejected_path.display()
            );
        }

        Ok(cleaned_path)
    }

    /// Write a report as pretty JSON to `<stem>_report.json`.
    pub fn write_report_to_file(&self, report: &ProcessingReport, stem: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)
            .context(format!("Creating {}", self.output_dir.display()))?;

        let path = self.output_dir.join(format!("{}_report.json", stem));
        let mut file = File::create(&path).context(format!("Creating {}", path.display()))?;
        file.write_all(serde_json::to_string_pretty(report)?.as_bytes())?;

        debug!("Report saved: {}", path.display());
        Ok(path)
    }
}
