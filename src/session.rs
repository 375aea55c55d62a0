use std::path::{Path, PathBuf};

use crate::analysis::aggregate::AnalysisError;
use crate::analysis::view::{run_view, ViewData, ViewRequest};
use crate::data::cleaner::{clean, CleanReport};
use crate::data::loader::{load, LoadError};
use crate::data::model::Table;
use crate::data::schema;

// ---------------------------------------------------------------------------
// Session – the one piece of state held across calls
// ---------------------------------------------------------------------------

/// Owns the currently loaded, cleaned table. The front end holds one
/// `Session` and routes every pipeline call through it; nothing else in the
/// crate keeps state.
///
/// A load replaces the installed table wholesale, and only after the whole
/// load → validate → clean chain succeeded. A failed load leaves the
/// previous table in place, so readers never see a partial update.
#[derive(Default)]
pub struct Session {
    cleaned: Option<Table>,
    source: Option<PathBuf>,
    last_report: Option<CleanReport>,
}

impl Session {
    pub fn new() -> Self {
        Session::default()
    }

    /// Load a file, validate its schema, clean it, and install the result.
    pub fn load(&mut self, path: &Path) -> Result<CleanReport, LoadError> {
        let raw = load(path)?;
        schema::validate(&raw)?;
        let (cleaned, report) = clean(&raw);

        log::info!(
            "loaded {}: {} rows, {} duplicates removed, {} cells imputed",
            path.display(),
            report.rows_after,
            report.duplicates_removed,
            report.cells_imputed,
        );

        self.cleaned = Some(cleaned);
        self.source = Some(path.to_path_buf());
        self.last_report = Some(report.clone());
        Ok(report)
    }

    /// The installed cleaned table, or `NoData` before the first successful
    /// load.
    pub fn table(&self) -> Result<&Table, AnalysisError> {
        self.cleaned.as_ref().ok_or(AnalysisError::NoData)
    }

    /// Run one aggregation view against the installed table.
    pub fn view(&self, request: ViewRequest) -> Result<ViewData, AnalysisError> {
        run_view(self.table()?, request)
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn last_report(&self) -> Option<&CleanReport> {
        self.last_report.as_ref()
    }
}
