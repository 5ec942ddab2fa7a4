//! CSV trade-log adapter.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::domain::error::TradeLensError;
use crate::domain::ledger::{self, Ledger};
use crate::domain::trade::{RawTradeRow, REQUIRED_COLUMNS};
use crate::ports::ledger_port::{LedgerSource, SourceFingerprint};

/// Reads a header-addressed CSV trade log. Columns may appear in any order;
/// extra columns are ignored.
pub struct CsvLedgerAdapter {
    path: PathBuf,
}

impl CsvLedgerAdapter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parses CSV content from any reader. `location` names the source in
    /// error messages.
    pub fn read_ledger<R: Read>(reader: R, location: &str) -> Result<Ledger, TradeLensError> {
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = rdr
            .headers()
            .map_err(|e| TradeLensError::SourceUnavailable {
                location: location.to_string(),
                reason: format!("failed to read header: {}", e),
            })?
            .clone();

        let mut index = [0usize; REQUIRED_COLUMNS.len()];
        for (slot, column) in index.iter_mut().zip(REQUIRED_COLUMNS) {
            *slot = headers
                .iter()
                .position(|h| h == column)
                .ok_or_else(|| TradeLensError::MissingColumn {
                    column: column.to_string(),
                })?;
        }

        let mut rows = Vec::new();
        for (i, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| {
                let line = e
                    .position()
                    .map(|p| p.line() as usize)
                    .unwrap_or(i + 2);
                TradeLensError::malformed(line, format!("CSV parse error: {}", e))
            })?;
            let line = record
                .position()
                .map(|p| p.line() as usize)
                .unwrap_or(i + 2);

            let cell = |col: usize| {
                record
                    .get(index[col])
                    .filter(|v| !v.is_empty())
                    .map(str::to_string)
            };

            rows.push(RawTradeRow {
                line,
                entry_time: cell(0),
                exit_time: cell(1),
                side: cell(2),
                entry_price: cell(3),
                exit_price: cell(4),
                size: cell(5),
                pnl: cell(6),
            });
        }

        ledger::parse(rows)
    }
}

impl LedgerSource for CsvLedgerAdapter {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn load(&self) -> Result<Ledger, TradeLensError> {
        let content = fs::read(&self.path).map_err(|e| TradeLensError::SourceUnavailable {
            location: self.describe(),
            reason: e.to_string(),
        })?;
        Self::read_ledger(content.as_slice(), &self.describe())
    }

    fn fingerprint(&self) -> Result<Option<SourceFingerprint>, TradeLensError> {
        let meta = fs::metadata(&self.path).map_err(|e| TradeLensError::SourceUnavailable {
            location: self.describe(),
            reason: e.to_string(),
        })?;
        Ok(Some(SourceFingerprint {
            identity: self.describe(),
            modified: meta.modified().ok(),
            len: meta.len(),
        }))
    }
}
