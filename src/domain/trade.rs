//! Trade records and raw-row validation.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use std::fmt;

use super::error::TradeLensError;

/// Column names every ledger source must provide.
pub const REQUIRED_COLUMNS: [&str; 7] = [
    "entry_time",
    "exit_time",
    "side",
    "entry_price",
    "exit_price",
    "size",
    "pnl",
];

const TIMESTAMP_FORMATS: [&str; 5] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Trade direction label as it appears in the ledger (`long`, `short`, ...).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Side(String);

impl Side {
    pub fn new(label: impl AsRef<str>) -> Self {
        Side(label.as_ref().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Side {
    fn from(label: &str) -> Self {
        Side::new(label)
    }
}

/// One closed position.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Trade {
    pub entry_time: NaiveDateTime,
    pub exit_time: NaiveDateTime,
    pub side: Side,
    pub entry_price: f64,
    pub exit_price: f64,
    pub size: f64,
    pub pnl: f64,
}

impl Trade {
    /// Holding time in minutes, including fractional minutes.
    pub fn duration_minutes(&self) -> f64 {
        let held = self.exit_time - self.entry_time;
        held.num_seconds() as f64 / 60.0 + f64::from(held.subsec_nanos()) / 60e9
    }

    pub fn entry_date(&self) -> NaiveDate {
        self.entry_time.date()
    }

    pub fn exit_date(&self) -> NaiveDate {
        self.exit_time.date()
    }

    pub fn is_win(&self) -> bool {
        self.pnl > 0.0
    }

    /// Checks the record invariants. The error string names the violation.
    pub fn validate(&self) -> Result<(), String> {
        if self.exit_time < self.entry_time {
            return Err(format!(
                "exit_time {} is before entry_time {}",
                self.exit_time, self.entry_time
            ));
        }
        if self.side.as_str().is_empty() {
            return Err("side is empty".to_string());
        }
        for (name, value) in [
            ("entry_price", self.entry_price),
            ("exit_price", self.exit_price),
            ("size", self.size),
            ("pnl", self.pnl),
        ] {
            if !value.is_finite() {
                return Err(format!("{name} is not a finite number"));
            }
        }
        if self.size <= 0.0 {
            return Err(format!("size must be positive, got {}", self.size));
        }
        Ok(())
    }
}

/// One untyped row from a tabular source. Empty cells are `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTradeRow {
    pub line: usize,
    pub entry_time: Option<String>,
    pub exit_time: Option<String>,
    pub side: Option<String>,
    pub entry_price: Option<String>,
    pub exit_price: Option<String>,
    pub size: Option<String>,
    pub pnl: Option<String>,
}

impl RawTradeRow {
    /// Parses and validates the row into a [`Trade`].
    pub fn parse(&self) -> Result<Trade, TradeLensError> {
        let trade = Trade {
            entry_time: self.timestamp("entry_time", &self.entry_time)?,
            exit_time: self.timestamp("exit_time", &self.exit_time)?,
            side: Side::new(self.field("side", &self.side)?),
            entry_price: self.number("entry_price", &self.entry_price)?,
            exit_price: self.number("exit_price", &self.exit_price)?,
            size: self.number("size", &self.size)?,
            pnl: self.number("pnl", &self.pnl)?,
        };
        trade
            .validate()
            .map_err(|reason| TradeLensError::malformed(self.line, reason))?;
        Ok(trade)
    }

    fn field<'a>(
        &self,
        name: &str,
        value: &'a Option<String>,
    ) -> Result<&'a str, TradeLensError> {
        value
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| TradeLensError::malformed(self.line, format!("missing {name}")))
    }

    fn timestamp(
        &self,
        name: &str,
        value: &Option<String>,
    ) -> Result<NaiveDateTime, TradeLensError> {
        let raw = self.field(name, value)?;
        parse_timestamp(raw).ok_or_else(|| {
            TradeLensError::malformed(self.line, format!("unparsable {name} `{raw}`"))
        })
    }

    fn number(&self, name: &str, value: &Option<String>) -> Result<f64, TradeLensError> {
        let raw = self.field(name, value)?;
        raw.parse::<f64>().map_err(|e| {
            TradeLensError::malformed(self.line, format!("invalid {name} `{raw}`: {e}"))
        })
    }
}

/// Parses the timestamp layouts found in exported trade logs.
///
/// Offsets are dropped after parsing: the wall-clock time as written is kept.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    for format in TIMESTAMP_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(ts);
        }
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.naive_local());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .map(|d| d.and_time(NaiveTime::MIN))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn ts(s: &str) -> NaiveDateTime {
        parse_timestamp(s).unwrap()
    }

    fn sample_row() -> RawTradeRow {
        RawTradeRow {
            line: 2,
            entry_time: Some("2024-01-01 09:30:00".into()),
            exit_time: Some("2024-01-01 10:15:30".into()),
            side: Some("long".into()),
            entry_price: Some("100.5".into()),
            exit_price: Some("101.0".into()),
            size: Some("2".into()),
            pnl: Some("1.0".into()),
        }
    }

    #[test]
    fn parse_timestamp_layouts() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 5)
            .unwrap()
            .and_hms_opt(14, 7, 0)
            .unwrap();
        assert_eq!(ts("2024-03-05 14:07:00"), expected);
        assert_eq!(ts("2024-03-05T14:07:00"), expected);
        assert_eq!(ts("2024-03-05 14:07"), expected);
        assert_eq!(ts("2024-03-05T14:07:00+02:00"), expected);
        assert_eq!(
            ts("2024-03-05"),
            NaiveDate::from_ymd_opt(2024, 3, 5)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()
        );
    }

    #[test]
    fn parse_timestamp_fractional_seconds() {
        let parsed = ts("2024-03-05 14:07:00.250");
        assert_eq!(parsed.and_utc().timestamp_subsec_millis(), 250);
    }

    #[test]
    fn parse_timestamp_rejects_garbage() {
        assert!(parse_timestamp("yesterday").is_none());
        assert!(parse_timestamp("2024-13-01 00:00:00").is_none());
        assert!(parse_timestamp("").is_none());
    }

    #[test]
    fn side_trims_label() {
        assert_eq!(Side::new("  short "), Side::from("short"));
        assert_eq!(Side::new("long").to_string(), "long");
    }

    #[test]
    fn side_comparison_is_case_sensitive() {
        assert_ne!(Side::new("Long"), Side::new("long"));
    }

    #[test]
    fn row_parses_into_trade() {
        let trade = sample_row().parse().unwrap();
        assert_eq!(trade.side, Side::new("long"));
        assert_abs_diff_eq!(trade.entry_price, 100.5);
        assert_abs_diff_eq!(trade.size, 2.0);
        assert_abs_diff_eq!(trade.duration_minutes(), 45.5);
    }

    #[test]
    fn duration_zero_when_exit_equals_entry() {
        let mut row = sample_row();
        row.exit_time = row.entry_time.clone();
        let trade = row.parse().unwrap();
        assert_abs_diff_eq!(trade.duration_minutes(), 0.0);
    }

    #[test]
    fn duration_spans_days() {
        let mut row = sample_row();
        row.exit_time = Some("2024-01-03 09:30:00".into());
        let trade = row.parse().unwrap();
        assert_abs_diff_eq!(trade.duration_minutes(), 2.0 * 24.0 * 60.0);
    }

    #[test]
    fn missing_field_is_malformed() {
        let mut row = sample_row();
        row.pnl = None;
        let err = row.parse().unwrap_err();
        assert!(
            matches!(err, TradeLensError::MalformedRecord { line: 2, ref reason } if reason == "missing pnl")
        );
    }

    #[test]
    fn blank_field_is_missing() {
        let mut row = sample_row();
        row.side = Some("   ".into());
        let err = row.parse().unwrap_err();
        assert!(matches!(err, TradeLensError::MalformedRecord { ref reason, .. } if reason == "missing side"));
    }

    #[test]
    fn bad_timestamp_is_malformed() {
        let mut row = sample_row();
        row.entry_time = Some("not a date".into());
        let err = row.parse().unwrap_err();
        assert!(matches!(err, TradeLensError::MalformedRecord { ref reason, .. } if reason.contains("entry_time")));
    }

    #[test]
    fn exit_before_entry_is_malformed() {
        let mut row = sample_row();
        row.exit_time = Some("2024-01-01 09:00:00".into());
        let err = row.parse().unwrap_err();
        assert!(matches!(err, TradeLensError::MalformedRecord { ref reason, .. } if reason.contains("before entry_time")));
    }

    #[test]
    fn non_positive_size_is_malformed() {
        for size in ["0", "-1.5"] {
            let mut row = sample_row();
            row.size = Some(size.into());
            let err = row.parse().unwrap_err();
            assert!(matches!(err, TradeLensError::MalformedRecord { ref reason, .. } if reason.starts_with("size must be positive")));
        }
    }

    #[test]
    fn non_numeric_price_is_malformed() {
        let mut row = sample_row();
        row.exit_price = Some("abc".into());
        assert!(row.parse().is_err());
    }

    #[test]
    fn non_finite_pnl_is_malformed() {
        let mut row = sample_row();
        row.pnl = Some("NaN".into());
        let err = row.parse().unwrap_err();
        assert!(matches!(err, TradeLensError::MalformedRecord { ref reason, .. } if reason == "pnl is not a finite number"));
    }

    #[test]
    fn negative_pnl_is_accepted() {
        let mut row = sample_row();
        row.pnl = Some("-12.75".into());
        let trade = row.parse().unwrap();
        assert!(!trade.is_win());
        assert_abs_diff_eq!(trade.pnl, -12.75);
    }
}
