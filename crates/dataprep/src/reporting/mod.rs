//! Report generation module.
//!
//! This module writes the outputs of a run: the cleaned dataset, the rows
//! rejected by validation and a JSON report.
//!
//! # Example
//!
//! ```rust,no_run
//! use dataprep::io::{read_dataset, ExportFormat};
//! use dataprep::reporting::ReportGenerator;
//! use dataprep::{CleaningConfig, Pipeline};
//! use std::path::{Path, PathBuf};
//! use std::time::Instant;
//!
//! # fn main() -> dataprep::Result<()> {
//! let input_path = Path::new("data/customers.csv");
//! let input = read_dataset(input_path)?;
//! let config = CleaningConfig::automated();
//!
//! let start = Instant::now();
//! let result = Pipeline::builder().config(config.clone()).build()?.process(&input);
//!
//! let generator = ReportGenerator::new(PathBuf::from("outputs"), None);
//! let stem = generator.output_stem(input_path);
//! let cleaned = generator.write_outputs(&stem, &result, ExportFormat::Csv)?;
//!
//! let report = ReportGenerator::build_report(
//!     input_path,
//!     Some(cleaned.as_path()),
//!     &input,
//!     &result,
//!     &config,
//!     start.elapsed(),
//! );
//! generator.write_report_to_file(&report, &stem)?;
//! # Ok(())
//! # }
//! ```

mod generator;

pub use generator::{ProcessingReport, ReportGenerator};
