//! Progress reporting for the cleaning pipeline.
//!
//! The pipeline reports one [`ProgressUpdate`] before each stage runs. Callers
//! observe them either through a [`ProgressReporter`] implementation, a
//! closure, or a channel.
//!
//! # Example
//!
//! ```rust
//! use dataprep::{CleaningConfig, Dataset, Pipeline};
//! use std::sync::mpsc;
//! use std::sync::Arc;
//!
//! let (tx, rx) = mpsc::channel();
//! let pipeline = Pipeline::builder()
//!     .config(CleaningConfig::disabled())
//!     .progress_reporter(Arc::new(tx))
//!     .build()
//!     .unwrap();
//!
//! pipeline.process(&Dataset::default());
//! drop(pipeline);
//!
//! let labels: Vec<_> = rx.iter().map(|u| u.message).collect();
//! assert_eq!(labels.first().map(String::as_str), Some("Handling Duplicates"));
//! assert_eq!(labels.last().map(String::as_str), Some("Validating Data"));
//! ```

use serde::{Deserialize, Serialize};
use std::sync::mpsc::Sender;

/// Stages of the cleaning pipeline, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    /// Remove exact duplicate rows
    Deduplication,
    /// Drop columns above the missing-rate threshold
    ColumnPruning,
    /// Turn blank text into null
    EmptyStrings,
    /// Strip surrounding whitespace
    Trimming,
    /// Normalize text case
    TextCase,
    /// Convert numeric-looking text into numbers
    TypeConversion,
    /// Fill missing values
    Imputation,
    /// Remove IQR outlier rows
    OutlierRemoval,
    /// Sort by the configured column
    Sorting,
    /// Scale numeric columns
    Scaling,
    /// Reject rows failing validation rules
    Validation,
}

impl PipelineStage {
    /// Every stage in execution order.
    pub const ALL: [PipelineStage; 11] = [
        Self::Deduplication,
        Self::ColumnPruning,
        Self::EmptyStrings,
        Self::Trimming,
        Self::TextCase,
        Self::TypeConversion,
        Self::Imputation,
        Self::OutlierRemoval,
        Self::Sorting,
        Self::Scaling,
        Self::Validation,
    ];

    /// Returns a human-readable name for the stage.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Deduplication => "Handling Duplicates",
            Self::ColumnPruning => "Dropping High Missing Columns",
            Self::EmptyStrings => "Handling Empty Strings",
            Self::Trimming => "Trimming Whitespace",
            Self::TextCase => "Normalizing Text Case",
            Self::TypeConversion => "Converting Data Types",
            Self::Imputation => "Imputing Missing Values",
            Self::OutlierRemoval => "Handling Outliers",
            Self::Sorting => "Sorting Data",
            Self::Scaling => "Scaling Features",
            Self::Validation => "Validating Data",
        }
    }

    /// Zero-based position in the pipeline.
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Fraction of the run complete when this stage starts.
    ///
    /// The ten transform stages report `(index + 1) / 11`; validation
    /// reports `1.0`.
    pub fn progress(&self) -> f32 {
        match self {
            Self::Validation => 1.0,
            _ => (self.index() + 1) as f32 / Self::ALL.len() as f32,
        }
    }
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// A single progress notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressUpdate {
    /// Stage about to run
    pub stage: PipelineStage,

    /// Overall progress (0.0 - 1.0)
    pub progress: f32,

    /// Stage label, e.g. "Handling Outliers"
    pub message: String,
}

impl ProgressUpdate {
    /// Creates the update announcing `stage`.
    pub fn new(stage: PipelineStage) -> Self {
        Self {
            stage,
            progress: stage.progress(),
            message: stage.display_name().to_string(),
        }
    }

    /// Progress as a whole percentage, for display.
    pub fn percent(&self) -> u32 {
        (self.progress * 100.0).round() as u32
    }
}

/// Trait for receiving progress updates from the pipeline.
///
/// Implementations must be `Send + Sync` so a pipeline running on a worker
/// thread can report to a UI thread.
pub trait ProgressReporter: Send + Sync {
    /// Called before each stage. Implementations should not block.
    fn report(&self, update: ProgressUpdate);
}

/// Wrapper that implements [`ProgressReporter`] using a closure.
pub struct ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    callback: F,
}

impl<F> ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    /// Creates a new closure-based progress reporter.
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> ProgressReporter for ClosureProgressReporter<F>
where
    F: Fn(ProgressUpdate) + Send + Sync,
{
    fn report(&self, update: ProgressUpdate) {
        (self.callback)(update);
    }
}

/// Streams updates into a channel. A disconnected receiver is ignored.
impl ProgressReporter for Sender<ProgressUpdate> {
    fn report(&self, update: ProgressUpdate) {
        self.send(update).ok();
    }
}

static_assertions::assert_impl_all!(ProgressUpdate: Send, Sync);
static_assertions::assert_impl_all!(Sender<ProgressUpdate>: ProgressReporter);
