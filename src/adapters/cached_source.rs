//! Memoizing wrapper around any [`LedgerSource`].
//!
//! The cached ledger is reused while the source fingerprint is unchanged.

use std::sync::{Arc, Mutex};

use crate::domain::error::TradeLensError;
use crate::domain::ledger::Ledger;
use crate::ports::ledger_port::{LedgerSource, SourceFingerprint};

pub struct CachedLedgerSource<S> {
    inner: S,
    cached: Mutex<Option<(SourceFingerprint, Arc<Ledger>)>>,
}

impl<S: LedgerSource> CachedLedgerSource<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            cached: Mutex::new(None),
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Returns the cached ledger, reloading when the source changed or
    /// cannot report a fingerprint.
    pub fn load_shared(&self) -> Result<Arc<Ledger>, TradeLensError> {
        let fingerprint = self.inner.fingerprint()?;
        let mut cached = self
            .cached
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if let (Some(current), Some((seen, ledger))) = (&fingerprint, cached.as_ref()) {
            if current == seen {
                tracing::debug!(source = %self.inner.describe(), "ledger cache hit");
                return Ok(Arc::clone(ledger));
            }
        }

        let ledger = Arc::new(self.inner.load()?);
        tracing::info!(
            source = %self.inner.describe(),
            trades = ledger.len(),
            "ledger (re)loaded"
        );
        *cached = fingerprint.map(|fp| (fp, Arc::clone(&ledger)));
        Ok(ledger)
    }

    pub fn invalidate(&self) {
        let mut cached = self
            .cached
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *cached = None;
    }
}

impl<S: LedgerSource> LedgerSource for CachedLedgerSource<S> {
    fn describe(&self) -> String {
        self.inner.describe()
    }

    fn load(&self) -> Result<Ledger, TradeLensError> {
        self.load_shared().map(|ledger| (*ledger).clone())
    }

    fn fingerprint(&self) -> Result<Option<SourceFingerprint>, TradeLensError> {
        self.inner.fingerprint()
    }
}
