//! Pipeline module.
//!
//! This module provides the stage orchestrator and the stages that live
//! alongside it (outliers, sorting, scaling).

mod builder;
pub mod ordering;
pub mod outliers;
pub mod progress;
pub mod scaling;
mod stages;

pub use builder::{process, Pipeline, PipelineBuilder};
pub use outliers::{IqrBounds, OutlierHandler};
pub use progress::{ClosureProgressReporter, PipelineStage, ProgressReporter, ProgressUpdate};
pub use scaling::{FeatureScaler, ScaleParams};
pub use stages::{StageContext, StageFn, TRANSFORM_STAGES};
