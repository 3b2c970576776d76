//! The fixed stage table and the per-run ledger the stages write to.

use crate::cleaner::{
    normalize_empty_strings, normalize_text_case, trim_whitespace, DataCleaner, TypeConverter,
};
use crate::config::CleaningConfig;
use crate::imputers::StatisticalImputer;
use crate::pipeline::outliers::OutlierHandler;
use crate::pipeline::ordering::sort_rows;
use crate::pipeline::progress::PipelineStage;
use crate::pipeline::scaling::FeatureScaler;
use crate::types::{ColumnChangeLog, Dataset, StatisticsLedger};

/// Mutable state local to one pipeline run.
#[derive(Debug, Clone, Default)]
pub struct StageContext {
    pub stats: StatisticsLedger,
    pub changes: ColumnChangeLog,
}

/// A transform stage: consumes a dataset and returns the next one.
pub type StageFn = fn(Dataset, &CleaningConfig, &mut StageContext) -> Dataset;

/// The ten transform stages in execution order. Validation runs after them
/// separately because it also produces rejected rows.
pub const TRANSFORM_STAGES: [(PipelineStage, StageFn); 10] = [
    (PipelineStage::Deduplication, DataCleaner::remove_duplicates),
    (PipelineStage::ColumnPruning, DataCleaner::drop_high_missing_columns),
    (PipelineStage::EmptyStrings, empty_strings),
    (PipelineStage::Trimming, trimming),
    (PipelineStage::TextCase, text_case),
    (PipelineStage::TypeConversion, TypeConverter::convert_types),
    (PipelineStage::Imputation, StatisticalImputer::impute_missing),
    (PipelineStage::OutlierRemoval, OutlierHandler::remove_outliers),
    (PipelineStage::Sorting, sorting),
    (PipelineStage::Scaling, FeatureScaler::scale),
];

fn empty_strings(dataset: Dataset, config: &CleaningConfig, _: &mut StageContext) -> Dataset {
    normalize_empty_strings(dataset, config)
}

fn trimming(dataset: Dataset, config: &CleaningConfig, _: &mut StageContext) -> Dataset {
    trim_whitespace(dataset, config)
}

fn text_case(dataset: Dataset, config: &CleaningConfig, _: &mut StageContext) -> Dataset {
    normalize_text_case(dataset, config)
}

fn sorting(dataset: Dataset, config: &CleaningConfig, _: &mut StageContext) -> Dataset {
    sort_rows(dataset, config)
}
