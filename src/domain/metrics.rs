//! Trade metrics: equity curve, drawdown, win rate and daily aggregation.
//!
//! Every function here is total: an empty input yields zero or an empty
//! collection, never an error. Series functions use the order they are
//! given. The view-level helpers (`summary`, `equity_curve`) read the
//! ledger-wide cumulative pnl of the selected entries in entry-time order, so
//! trades outside the selection still shape the equity line.

use chrono::{NaiveDate, NaiveDateTime};
use std::collections::BTreeMap;

use super::filter::FilteredView;
use super::trade::Trade;

/// Holding time of one trade in minutes.
pub fn duration_minutes(trade: &Trade) -> f64 {
    trade.duration_minutes()
}

/// Running sum of `pnl` in input order.
pub fn cumulative_pnl_series<'a, I>(trades: I) -> Vec<f64>
where
    I: IntoIterator<Item = &'a Trade>,
{
    trades
        .into_iter()
        .scan(0.0_f64, |running, trade| {
            *running += trade.pnl;
            Some(*running)
        })
        .collect()
}

/// Running maximum minus current value at every point of `series`.
///
/// The running maximum starts at the first element.
pub fn drawdown_series(series: &[f64]) -> Vec<f64> {
    let mut peak = f64::NEG_INFINITY;
    series
        .iter()
        .map(|&value| {
            peak = peak.max(value);
            peak - value
        })
        .collect()
}

/// Largest peak-to-trough decline of `series`; 0 when empty or never falling.
pub fn max_drawdown(series: &[f64]) -> f64 {
    drawdown_series(series).into_iter().fold(0.0, f64::max)
}

/// Percentage (0-100) of trades with positive pnl; 0 for no trades.
pub fn win_rate<'a, I>(trades: I) -> f64
where
    I: IntoIterator<Item = &'a Trade>,
{
    let (total, won) = trades.into_iter().fold((0usize, 0usize), |(total, won), t| {
        (total + 1, won + usize::from(t.is_win()))
    });
    if total > 0 {
        won as f64 / total as f64 * 100.0
    } else {
        0.0
    }
}

/// Summed pnl per exit date. Dates without trades have no entry.
pub fn daily_pnl<'a, I>(trades: I) -> BTreeMap<NaiveDate, f64>
where
    I: IntoIterator<Item = &'a Trade>,
{
    let mut daily: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for trade in trades {
        *daily.entry(trade.exit_date()).or_insert(0.0) += trade.pnl;
    }
    daily
}

/// Days whose summed pnl is strictly positive.
pub fn winning_days(daily: &BTreeMap<NaiveDate, f64>) -> BTreeMap<NaiveDate, f64> {
    daily
        .iter()
        .filter(|&(_, &pnl)| pnl > 0.0)
        .map(|(&date, &pnl)| (date, pnl))
        .collect()
}

pub fn total_pnl<'a, I>(trades: I) -> f64
where
    I: IntoIterator<Item = &'a Trade>,
{
    trades.into_iter().map(|t| t.pnl).sum()
}

/// Headline figures for a filtered view.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Summary {
    pub total_trades: usize,
    pub net_pnl: f64,
    /// Percentage, 0-100.
    pub win_rate: f64,
    pub max_drawdown: f64,
}

/// Ledger-wide cumulative pnl of the selected entries, in entry-time order.
pub fn equity_series(view: &FilteredView) -> Vec<f64> {
    view.sorted_by_entry_time()
        .iter()
        .map(|e| e.cumulative_pnl())
        .collect()
}

pub fn summary(view: &FilteredView) -> Summary {
    Summary {
        total_trades: view.len(),
        net_pnl: total_pnl(view.trades()),
        win_rate: win_rate(view.trades()),
        max_drawdown: max_drawdown(&equity_series(view)),
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DailySummary {
    pub daily_pnl: BTreeMap<NaiveDate, f64>,
    pub winning_days: BTreeMap<NaiveDate, f64>,
}

impl DailySummary {
    pub fn winning_day_count(&self) -> usize {
        self.winning_days.len()
    }

    /// Winning days, most recent first.
    pub fn winning_days_desc(&self) -> Vec<(NaiveDate, f64)> {
        self.winning_days
            .iter()
            .rev()
            .map(|(&date, &pnl)| (date, pnl))
            .collect()
    }
}

pub fn daily_summary(view: &FilteredView) -> DailySummary {
    let daily_pnl = daily_pnl(view.trades());
    let winning_days = winning_days(&daily_pnl);
    DailySummary {
        daily_pnl,
        winning_days,
    }
}

/// One point of the equity curve, stamped with the trade's exit time.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct EquityPoint {
    pub time: NaiveDateTime,
    pub cumulative_pnl: f64,
    pub drawdown: f64,
}

/// Equity curve of the view, entries ordered by entry time.
pub fn equity_curve(view: &FilteredView) -> Vec<EquityPoint> {
    let ordered = view.sorted_by_entry_time();
    let cumulative: Vec<f64> = ordered.iter().map(|e| e.cumulative_pnl()).collect();
    let drawdowns = drawdown_series(&cumulative);
    ordered
        .iter()
        .zip(cumulative)
        .zip(drawdowns)
        .map(|((entry, cumulative_pnl), drawdown)| EquityPoint {
            time: entry.trade().exit_time,
            cumulative_pnl,
            drawdown,
        })
        .collect()
}

pub fn pnl_histogram_data(view: &FilteredView) -> Vec<f64> {
    view.trades().map(|t| t.pnl).collect()
}

pub fn duration_histogram_data(view: &FilteredView) -> Vec<f64> {
    view.entries().iter().map(|e| e.duration_minutes()).collect()
}
