//! Date-range and side filtering over a ledger.

use chrono::NaiveDate;

use super::ledger::{Ledger, LedgerEntry};
use super::trade::{Side, Trade};

/// A fully resolved filter: every bound is concrete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterCriteria {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub sides: Vec<Side>,
}

impl FilterCriteria {
    /// Criteria selecting the whole ledger: its default date range and every
    /// side it contains.
    pub fn all(ledger: &Ledger) -> Self {
        let (start_date, end_date) = ledger
            .default_date_range()
            .unwrap_or((NaiveDate::MAX, NaiveDate::MIN));
        FilterCriteria {
            start_date,
            end_date,
            sides: ledger.sides().to_vec(),
        }
    }

    pub fn apply<'a>(&self, ledger: &'a Ledger) -> FilteredView<'a> {
        filter(ledger, self.start_date, self.end_date, &self.sides)
    }
}

fn matches(trade: &Trade, start_date: NaiveDate, end_date: NaiveDate, sides: &[Side]) -> bool {
    trade.entry_date() >= start_date && trade.exit_date() <= end_date && sides.contains(&trade.side)
}

/// Selects trades entered on or after `start_date`, exited on or before
/// `end_date` and whose side is in `allowed_sides`.
///
/// An empty `allowed_sides` selects nothing, and so does `start_date >
/// end_date`. The ledger is never modified.
pub fn filter<'a>(
    ledger: &'a Ledger,
    start_date: NaiveDate,
    end_date: NaiveDate,
    allowed_sides: &[Side],
) -> FilteredView<'a> {
    let entries = ledger
        .entries()
        .iter()
        .filter(|e| matches(e.trade(), start_date, end_date, allowed_sides))
        .collect();
    FilteredView { entries }
}

/// Read-only selection of ledger entries, in ledger (load) order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilteredView<'a> {
    entries: Vec<&'a LedgerEntry>,
}

impl<'a> FilteredView<'a> {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[&'a LedgerEntry] {
        &self.entries
    }

    pub fn trades(&self) -> impl Iterator<Item = &'a Trade> + '_ {
        self.entries.iter().map(|e| e.trade())
    }

    /// Entries stably sorted by entry time, ascending.
    pub fn sorted_by_entry_time(&self) -> Vec<&'a LedgerEntry> {
        let mut entries = self.entries.clone();
        entries.sort_by_key(|e| e.trade().entry_time);
        entries
    }

    /// Trades ordered for the trade journal: most recent entry first.
    pub fn journal(&self) -> Vec<&'a Trade> {
        let mut trades: Vec<&'a Trade> = self.trades().collect();
        trades.sort_by(|a, b| b.entry_time.cmp(&a.entry_time));
        trades
    }
}
