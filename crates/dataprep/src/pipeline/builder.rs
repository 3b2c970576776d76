//! Main cleaning pipeline module.
//!
//! This module provides the core `Pipeline` struct and builder, plus the
//! free [`process`] function that folds a dataset through the stage table.

use crate::config::{CleaningConfig, ConfigValidationError};
use crate::pipeline::progress::{
    ClosureProgressReporter, PipelineStage, ProgressReporter, ProgressUpdate,
};
use crate::pipeline::stages::{StageContext, TRANSFORM_STAGES};
use crate::quality::DataValidator;
use crate::types::{Dataset, ProcessingResult};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Run every stage over `dataset` and assemble the result.
///
/// The input is never modified. `reporter` receives one update before each
/// transform stage and one for validation, eleven in total. The statistics
/// ledger and change log start empty on every call.
pub fn process(
    dataset: &Dataset,
    config: &CleaningConfig,
    reporter: Option<&dyn ProgressReporter>,
) -> ProcessingResult {
    let report = |stage: PipelineStage| {
        if let Some(reporter) = reporter {
            reporter.report(ProgressUpdate::new(stage));
        }
    };

    let mut ctx = StageContext::default();
    ctx.stats.record("Initial Rows", dataset.len());
    ctx.stats.record("Initial Columns", dataset.column_count());

    let transformed = TRANSFORM_STAGES
        .iter()
        .fold(dataset.clone(), |data, (stage, run)| {
            report(*stage);
            let out = run(data, config, &mut ctx);
            debug!(
                "{}: {} rows x {} columns",
                stage.display_name(),
                out.len(),
                out.column_count()
            );
            out
        });

    report(PipelineStage::Validation);
    let (cleaned_data, validation_errors) = DataValidator::validate(transformed, config, &mut ctx);

    ctx.stats.record("Final Rows", cleaned_data.len());
    ctx.stats.record("Final Columns", cleaned_data.column_count());

    ProcessingResult {
        cleaned_data,
        stats: ctx.stats,
        validation_errors,
        column_changes: ctx.changes,
    }
}

/// The main cleaning pipeline.
///
/// Use [`Pipeline::builder()`] to create a new pipeline with custom configuration.
///
/// # Example
///
/// ```rust
/// use dataprep::{CleaningConfig, Dataset, Pipeline, Row, Value};
///
/// let data: Dataset = vec![
///     Row::from_iter([("a", Value::from("1"))]),
///     Row::from_iter([("a", Value::from("1"))]),
///     Row::from_iter([("a", Value::from("2"))]),
/// ]
/// .into_iter()
/// .collect();
///
/// let config = CleaningConfig::builder().handle_duplicates(true).build().unwrap();
/// let result = Pipeline::builder()
///     .config(config)
///     .on_progress(|update| println!("[{}%] {}", update.percent(), update.message))
///     .build()
///     .unwrap()
///     .process(&data);
///
/// assert_eq!(result.cleaned_data.len(), 2);
/// assert_eq!(result.stats.count("Duplicates Removed"), Some(1));
/// ```
pub struct Pipeline {
    config: CleaningConfig,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
}

// Pipelines are handed to worker threads by UI callers
static_assertions::assert_impl_all!(Pipeline: Send, Sync);

impl Pipeline {
    /// Create a new pipeline builder.
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::default()
    }

    /// The configuration this pipeline runs with.
    pub fn config(&self) -> &CleaningConfig {
        &self.config
    }

    /// Process a dataset through every stage.
    ///
    /// A pipeline can be reused; runs share no state.
    pub fn process(&self, dataset: &Dataset) -> ProcessingResult {
        let start_time = Instant::now();
        info!(
            "Starting cleaning pipeline: {} rows, {} active operations",
            dataset.len(),
            self.config.active_operations()
        );

        let result = process(dataset, &self.config, self.progress_reporter.as_deref());

        info!(
            "Pipeline finished in {:?}: {} rows kept, {} rejected",
            start_time.elapsed(),
            result.cleaned_data.len(),
            result.validation_errors.len()
        );
        result
    }
}

/// Builder for [`Pipeline`].
#[derive(Default)]
pub struct PipelineBuilder {
    config: Option<CleaningConfig>,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
}

impl PipelineBuilder {
    /// Set the cleaning configuration. Defaults to the automated preset.
    pub fn config(mut self, config: CleaningConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set a progress reporter for receiving updates during processing.
    ///
    /// A `std::sync::mpsc::Sender<ProgressUpdate>` works as a reporter.
    pub fn progress_reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.progress_reporter = Some(reporter);
        self
    }

    /// Set a progress callback closure.
    pub fn on_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(ProgressUpdate) + Send + Sync + 'static,
    {
        self.progress_reporter = Some(Arc::new(ClosureProgressReporter::new(callback)));
        self
    }

    /// Build the pipeline.
    ///
    /// Returns an error if the configuration is invalid.
    pub fn build(self) -> Result<Pipeline, ConfigValidationError> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        Ok(Pipeline {
            config,
            progress_reporter: self.progress_reporter,
        })
    }
}
