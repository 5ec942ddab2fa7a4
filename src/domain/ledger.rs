//! The loaded trade ledger and its per-trade memoized fields.

use chrono::NaiveDate;

use super::error::TradeLensError;
use super::metrics::cumulative_pnl_series;
use super::trade::{RawTradeRow, Side, Trade};

/// A trade plus the fields derived from it once at load time.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerEntry {
    trade: Trade,
    duration_minutes: f64,
    cumulative_pnl: f64,
}

impl LedgerEntry {
    pub fn trade(&self) -> &Trade {
        &self.trade
    }

    pub fn duration_minutes(&self) -> f64 {
        self.duration_minutes
    }

    /// Running PnL of the whole ledger, ordered by entry time, up to and
    /// including this trade.
    pub fn cumulative_pnl(&self) -> f64 {
        self.cumulative_pnl
    }
}

/// Immutable, load-ordered collection of trades.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Ledger {
    entries: Vec<LedgerEntry>,
    date_range: Option<(NaiveDate, NaiveDate)>,
    sides: Vec<Side>,
}

impl Ledger {
    /// Builds a ledger from already-typed trades, validating each one.
    ///
    /// Line numbers in errors are 1-based positions in `trades`.
    pub fn from_trades(trades: Vec<Trade>) -> Result<Self, TradeLensError> {
        for (i, trade) in trades.iter().enumerate() {
            trade
                .validate()
                .map_err(|reason| TradeLensError::malformed(i + 1, reason))?;
        }
        Ok(Self::build(trades))
    }

    fn build(trades: Vec<Trade>) -> Self {
        let mut order: Vec<usize> = (0..trades.len()).collect();
        order.sort_by_key(|&i| trades[i].entry_time);

        let series = cumulative_pnl_series(order.iter().map(|&i| &trades[i]));
        let mut cumulative = vec![0.0; trades.len()];
        for (&i, value) in order.iter().zip(series) {
            cumulative[i] = value;
        }

        let date_range = trades
            .iter()
            .map(Trade::entry_date)
            .min()
            .zip(trades.iter().map(Trade::exit_date).max());

        let mut sides: Vec<Side> = Vec::new();
        for trade in &trades {
            if !sides.contains(&trade.side) {
                sides.push(trade.side.clone());
            }
        }

        let entries = trades
            .into_iter()
            .zip(cumulative)
            .map(|(trade, cumulative_pnl)| LedgerEntry {
                duration_minutes: trade.duration_minutes(),
                cumulative_pnl,
                trade,
            })
            .collect();

        Ledger {
            entries,
            date_range,
            sides,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[LedgerEntry] {
        &self.entries
    }

    pub fn trades(&self) -> impl Iterator<Item = &Trade> + '_ {
        self.entries.iter().map(LedgerEntry::trade)
    }

    /// Earliest entry date and latest exit date, `None` for an empty ledger.
    pub fn default_date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        self.date_range
    }

    /// Distinct sides in first-seen order.
    pub fn sides(&self) -> &[Side] {
        &self.sides
    }
}

/// Parses raw rows into a ledger, preserving row order.
///
/// The first invalid row aborts the load; no partial ledger is produced.
pub fn parse<I>(rows: I) -> Result<Ledger, TradeLensError>
where
    I: IntoIterator<Item = RawTradeRow>,
{
    let trades = rows
        .into_iter()
        .map(|row| row.parse())
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Ledger::build(trades))
}
