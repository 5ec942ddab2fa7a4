//! Report generation port trait.

use std::path::Path;

use crate::domain::analysis::Analysis;
use crate::domain::error::TradeLensError;

/// Port for writing an analysis report.
pub trait ReportPort {
    fn write(&self, analysis: &Analysis, output_path: &Path) -> Result<(), TradeLensError>;
}
