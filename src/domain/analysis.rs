//! All engine outputs for one filter selection, computed together.

use super::filter::FilterCriteria;
use super::ledger::Ledger;
use super::metrics::{self, DailySummary, EquityPoint, Summary};
use super::trade::Trade;

/// Owned snapshot of everything a report renders for one selection.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub criteria: FilterCriteria,
    pub ledger_trades: usize,
    pub summary: Summary,
    pub daily: DailySummary,
    pub equity_curve: Vec<EquityPoint>,
    /// Selected trades, most recent entry first.
    pub journal: Vec<Trade>,
    pub pnl_values: Vec<f64>,
    pub durations: Vec<f64>,
}

impl Analysis {
    pub fn compute(ledger: &Ledger, criteria: &FilterCriteria) -> Self {
        let view = criteria.apply(ledger);
        tracing::debug!(
            selected = view.len(),
            total = ledger.len(),
            start = %criteria.start_date,
            end = %criteria.end_date,
            "filter applied"
        );

        Analysis {
            criteria: criteria.clone(),
            ledger_trades: ledger.len(),
            summary: metrics::summary(&view),
            daily: metrics::daily_summary(&view),
            equity_curve: metrics::equity_curve(&view),
            journal: view.journal().into_iter().cloned().collect(),
            pnl_values: metrics::pnl_histogram_data(&view),
            durations: metrics::duration_histogram_data(&view),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::trade::Side;
    use approx::assert_abs_diff_eq;
    use chrono::{NaiveDate, NaiveDateTime};

    fn trade(entry: &str, exit: &str, side: &str, pnl: f64) -> Trade {
        let at = |s: &str| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap();
        Trade {
            entry_time: at(entry),
            exit_time: at(exit),
            side: Side::new(side),
            entry_price: 20.0,
            exit_price: 21.0,
            size: 3.0,
            pnl,
        }
    }

    #[test]
    fn compute_bundles_outputs_for_selection() {
        let ledger = Ledger::from_trades(vec![
            trade("2024-01-01 09:00", "2024-01-01 10:00", "long", 3.0),
            trade("2024-01-02 09:00", "2024-01-02 09:20", "short", -1.0),
            trade("2024-01-03 09:00", "2024-01-03 11:00", "long", 2.0),
        ])
        .unwrap();
        let criteria = FilterCriteria {
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(),
            sides: vec![Side::new("long")],
        };

        let analysis = Analysis::compute(&ledger, &criteria);

        assert_eq!(analysis.ledger_trades, 3);
        assert_eq!(analysis.summary.total_trades, 2);
        assert_abs_diff_eq!(analysis.summary.net_pnl, 5.0);
        assert_abs_diff_eq!(analysis.summary.win_rate, 100.0);
        assert_eq!(analysis.daily.winning_day_count(), 2);
        assert_eq!(analysis.equity_curve.len(), 2);
        // the excluded short trade still counts toward the ledger-wide equity
        assert_abs_diff_eq!(analysis.equity_curve[1].cumulative_pnl, 4.0);
        assert_abs_diff_eq!(analysis.summary.max_drawdown, 0.0);
        assert_abs_diff_eq!(analysis.journal[0].pnl, 2.0);
        assert_eq!(analysis.pnl_values, vec![3.0, 2.0]);
        assert_eq!(analysis.durations, vec![60.0, 120.0]);
    }

    #[test]
    fn compute_empty_selection() {
        let ledger = Ledger::from_trades(vec![trade(
            "2024-01-01 09:00",
            "2024-01-01 10:00",
            "long",
            3.0,
        )])
        .unwrap();
        let mut criteria = FilterCriteria::all(&ledger);
        criteria.sides.clear();

        let analysis = Analysis::compute(&ledger, &criteria);
        assert_eq!(analysis.summary.total_trades, 0);
        assert!(analysis.journal.is_empty());
        assert!(analysis.equity_curve.is_empty());
        assert!(analysis.daily.daily_pnl.is_empty());
    }
}
