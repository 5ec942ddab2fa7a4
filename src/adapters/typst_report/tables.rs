//! Table formatting for reports.
//!
//! Provides functions to generate Typst markup for:
//! - Filter summary (date range and sides)
//! - Headline KPI table
//! - Winning days table (most recent first)
//! - Trade journal (most recent entry first)

use chrono::NaiveDate;

use crate::domain::filter::FilterCriteria;
use crate::domain::metrics::{DailySummary, Summary};
use crate::domain::trade::Trade;

pub fn render_filter_summary(criteria: &FilterCriteria, ledger_trades: usize) -> String {
    let sides = if criteria.sides.is_empty() {
        "none".to_string()
    } else {
        criteria
            .sides
            .iter()
            .map(|s| escape(s.as_str()))
            .collect::<Vec<_>>()
            .join(", ")
    };

    let mut out = String::from("#table(\n  columns: 2,\n  stroke: none,\n");
    out.push_str(&format!(
        "  [*Period*], [{} to {}],\n",
        format_date(criteria.start_date),
        format_date(criteria.end_date)
    ));
    out.push_str(&format!("  [*Sides*], [{}],\n", sides));
    out.push_str(&format!("  [*Ledger trades*], [{}],\n", ledger_trades));
    out.push_str(")\n");
    out
}

pub fn render_kpi_table(summary: &Summary) -> String {
    let pnl_color = if summary.net_pnl >= 0.0 { "green" } else { "red" };
    let mut out = String::from("#table(\n  columns: 4,\n  align: center,\n");
    out.push_str("  [*Total trades*], [*Net PnL (USD)*], [*Win rate*], [*Max drawdown*],\n");
    out.push_str(&format!(
        "  [{}], text(fill: {}, [{}]), [{:.1}%], [{} USD],\n",
        summary.total_trades,
        pnl_color,
        format_money(summary.net_pnl),
        summary.win_rate,
        format_money(summary.max_drawdown)
    ));
    out.push_str(")\n");
    out
}

pub fn render_winning_days(daily: &DailySummary) -> String {
    let mut out = format!("Winning days: *{}*\n\n", daily.winning_day_count());
    let rows = daily.winning_days_desc();
    if rows.is_empty() {
        out.push_str("_No winning days in the selection._\n");
        return out;
    }

    out.push_str("#table(\n  columns: 2,\n  align: (left, right),\n");
    out.push_str("  [*Date*], [*Daily PnL*],\n");
    for (date, pnl) in rows {
        out.push_str(&format!(
            "  [{}], text(fill: green, [{}]),\n",
            format_date(date),
            format_money(pnl)
        ));
    }
    out.push_str(")\n");
    out
}

/// Trade journal table; `trades` are rendered in the order given.
pub fn render_trade_journal(trades: &[Trade]) -> String {
    if trades.is_empty() {
        return "_No trades in the selection._\n".to_string();
    }

    let mut out = String::from(
        "#table(\n  columns: 7,\n  align: (left, left, left, right, right, right, right),\n",
    );
    out.push_str(
        "  [*Entry*], [*Exit*], [*Side*], [*Entry price*], [*Exit price*], [*Size*], [*PnL*],\n",
    );
    for trade in trades {
        let pnl_color = if trade.pnl >= 0.0 { "green" } else { "red" };
        out.push_str(&format!(
            "  [{}], [{}], [{}], [{:.2}], [{:.2}], [{}], text(fill: {}, [{:.2}]),\n",
            trade.entry_time.format("%Y-%m-%d %H:%M:%S"),
            trade.exit_time.format("%Y-%m-%d %H:%M:%S"),
            escape(trade.side.as_str()),
            trade.entry_price,
            trade.exit_price,
            trade.size,
            pnl_color,
            trade.pnl
        ));
    }
    out.push_str(")\n");
    out
}

fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Two decimals with thousands separators, e.g. `-12,345.60`.
pub fn format_money(value: f64) -> String {
    let formatted = format!("{:.2}", value.abs());
    let (int_part, frac_part) = formatted.split_once('.').unwrap_or((formatted.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && formatted != "0.00" { "-" } else { "" };
    format!("{sign}{grouped}.{frac_part}")
}

/// Escapes characters that Typst treats as markup inside `[...]` content.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        if matches!(ch, '\\' | '[' | ']' | '#' | '*' | '_' | '$' | '@' | '<' | '`') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}
