//! Sales analytics core: load a delimited sales file, clean it, and compute
//! descriptive business metrics.
//!
//! The pipeline is `load → validate → clean → aggregate`; a front end holds
//! a [`Session`], points it at a CSV file, and asks it for views. The crate
//! is presentation-agnostic: every view comes back as named scalars or
//! ordered label/value pairs, ready for a table, bar, line, or pie chart.

pub mod analysis;
pub mod data;
pub mod session;

pub use analysis::aggregate::{AnalysisError, SummaryStats};
pub use analysis::view::{ViewData, ViewRequest};
pub use data::cleaner::CleanReport;
pub use data::loader::LoadError;
pub use data::model::{CellValue, Column, ColumnType, Table};
pub use session::Session;
