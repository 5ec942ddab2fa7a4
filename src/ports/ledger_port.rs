//! Ledger source port trait.

use std::time::SystemTime;

use crate::domain::error::TradeLensError;
use crate::domain::ledger::Ledger;

/// Identifies one version of a ledger source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFingerprint {
    pub identity: String,
    pub modified: Option<SystemTime>,
    pub len: u64,
}

/// Anything that can produce a validated [`Ledger`].
pub trait LedgerSource {
    /// Human-readable name of the source, used in logs and errors.
    fn describe(&self) -> String;

    fn load(&self) -> Result<Ledger, TradeLensError>;

    /// Version stamp for cache invalidation. `None` when the source cannot
    /// tell whether it changed.
    fn fingerprint(&self) -> Result<Option<SourceFingerprint>, TradeLensError> {
        Ok(None)
    }
}

/// Loads a ledger from `source`, logging its size.
pub fn load(source: &dyn LedgerSource) -> Result<Ledger, TradeLensError> {
    let ledger = source.load()?;
    tracing::info!(source = %source.describe(), trades = ledger.len(), "ledger loaded");
    Ok(ledger)
}
