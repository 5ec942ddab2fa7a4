//! Filter selection from configuration and command-line overrides.
//!
//! A selection may leave any bound unset; [`FilterSelection::resolve`] fills
//! the gaps from the loaded ledger.

use chrono::NaiveDate;

use super::error::TradeLensError;
use super::filter::FilterCriteria;
use super::ledger::Ledger;
use super::trade::Side;
use crate::ports::config_port::ConfigPort;

const FILTER_SECTION: &str = "filter";

/// Upper bound on histogram bins, from the command line or `[report]`.
pub const MAX_HISTOGRAM_BINS: usize = 1000;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSelection {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// `None` means every side in the ledger; `Some(vec![])` selects nothing.
    pub sides: Option<Vec<Side>>,
}

impl FilterSelection {
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, TradeLensError> {
        Ok(FilterSelection {
            start_date: parse_optional_date(config, "start_date")?,
            end_date: parse_optional_date(config, "end_date")?,
            sides: config
                .get_string(FILTER_SECTION, "sides")
                .map(|raw| parse_sides(&raw)),
        })
    }

    /// Replaces configured values with any that were given explicitly.
    pub fn with_overrides(
        mut self,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
        sides: &[String],
    ) -> Self {
        if start_date.is_some() {
            self.start_date = start_date;
        }
        if end_date.is_some() {
            self.end_date = end_date;
        }
        if !sides.is_empty() {
            self.sides = Some(sides.iter().map(Side::new).collect());
        }
        self
    }

    pub fn resolve(&self, ledger: &Ledger) -> FilterCriteria {
        let defaults = FilterCriteria::all(ledger);
        FilterCriteria {
            start_date: self.start_date.unwrap_or(defaults.start_date),
            end_date: self.end_date.unwrap_or(defaults.end_date),
            sides: self.sides.clone().unwrap_or(defaults.sides),
        }
    }
}

/// Splits a comma-separated side list, dropping blank items.
pub fn parse_sides(raw: &str) -> Vec<Side> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(Side::new)
        .collect()
}

fn parse_optional_date(
    config: &dyn ConfigPort,
    key: &str,
) -> Result<Option<NaiveDate>, TradeLensError> {
    match config.get_string(FILTER_SECTION, key) {
        None => Ok(None),
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(Some)
            .map_err(|_| TradeLensError::ConfigInvalid {
                section: FILTER_SECTION.to_string(),
                key: key.to_string(),
                reason: format!("invalid {} format, expected YYYY-MM-DD", key),
            }),
    }
}

/// Checks the `[report]` section before any work is done.
pub fn validate_report_config(config: &dyn ConfigPort) -> Result<(), TradeLensError> {
    let Some(raw) = config.get_string("report", "histogram_bins") else {
        return Ok(());
    };
    match raw.trim().parse::<usize>() {
        Ok(bins) if (1..=MAX_HISTOGRAM_BINS).contains(&bins) => Ok(()),
        _ => Err(TradeLensError::ConfigInvalid {
            section: "report".to_string(),
            key: "histogram_bins".to_string(),
            reason: format!(
                "histogram_bins must be an integer in 1..={}, got `{}`",
                MAX_HISTOGRAM_BINS,
                raw.trim()
            ),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::trade::Trade;
    use chrono::NaiveDateTime;
    use std::collections::HashMap;

    struct MapConfig(HashMap<(String, String), String>);

    impl MapConfig {
        fn new(pairs: &[(&str, &str, &str)]) -> Self {
            MapConfig(
                pairs
                    .iter()
                    .map(|(s, k, v)| ((s.to_string(), k.to_string()), v.to_string()))
                    .collect(),
            )
        }
    }

    impl ConfigPort for MapConfig {
        fn get_string(&self, section: &str, key: &str) -> Option<String> {
            self.0.get(&(section.to_string(), key.to_string())).cloned()
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample_ledger() -> Ledger {
        let at = |s: &str| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap();
        let trade = |entry: &str, exit: &str, side: &str| Trade {
            entry_time: at(entry),
            exit_time: at(exit),
            side: Side::new(side),
            entry_price: 1.0,
            exit_price: 1.0,
            size: 1.0,
            pnl: 0.0,
        };
        Ledger::from_trades(vec![
            trade("2024-02-01 10:00", "2024-02-02 10:00", "long"),
            trade("2024-02-03 10:00", "2024-02-05 10:00", "short"),
        ])
        .unwrap()
    }

    #[test]
    fn empty_config_resolves_to_ledger_defaults() {
        let selection = FilterSelection::from_config(&MapConfig::new(&[])).unwrap();
        assert_eq!(selection, FilterSelection::default());

        let criteria = selection.resolve(&sample_ledger());
        assert_eq!(criteria.start_date, date(2024, 2, 1));
        assert_eq!(criteria.end_date, date(2024, 2, 5));
        assert_eq!(criteria.sides, vec![Side::new("long"), Side::new("short")]);
    }

    #[test]
    fn reads_filter_section() {
        let config = MapConfig::new(&[
            ("filter", "start_date", "2024-02-02"),
            ("filter", "end_date", "2024-02-04"),
            ("filter", "sides", "short, long"),
        ]);
        let selection = FilterSelection::from_config(&config).unwrap();
        assert_eq!(selection.start_date, Some(date(2024, 2, 2)));
        assert_eq!(selection.end_date, Some(date(2024, 2, 4)));
        assert_eq!(
            selection.sides,
            Some(vec![Side::new("short"), Side::new("long")])
        );
    }

    #[test]
    fn explicit_empty_sides_is_empty_selection() {
        let config = MapConfig::new(&[("filter", "sides", "")]);
        let selection = FilterSelection::from_config(&config).unwrap();
        assert_eq!(selection.sides, Some(vec![]));
        assert!(selection.resolve(&sample_ledger()).sides.is_empty());
    }

    #[test]
    fn invalid_date_is_config_error() {
        let config = MapConfig::new(&[("filter", "start_date", "02/01/2024")]);
        let err = FilterSelection::from_config(&config).unwrap_err();
        assert!(
            matches!(err, TradeLensError::ConfigInvalid { ref key, .. } if key == "start_date")
        );
    }

    #[test]
    fn overrides_replace_configured_values() {
        let config = MapConfig::new(&[
            ("filter", "start_date", "2024-02-02"),
            ("filter", "sides", "long"),
        ]);
        let selection = FilterSelection::from_config(&config)
            .unwrap()
            .with_overrides(None, Some(date(2024, 2, 3)), &["short".to_string()]);
        assert_eq!(selection.start_date, Some(date(2024, 2, 2)));
        assert_eq!(selection.end_date, Some(date(2024, 2, 3)));
        assert_eq!(selection.sides, Some(vec![Side::new("short")]));
    }

    #[test]
    fn parse_sides_drops_blanks() {
        assert_eq!(
            parse_sides("long,, short ,"),
            vec![Side::new("long"), Side::new("short")]
        );
    }

    #[test]
    fn report_bins_must_be_positive() {
        assert!(validate_report_config(&MapConfig::new(&[])).is_ok());
        let config = MapConfig::new(&[("report", "histogram_bins", "0")]);
        assert!(matches!(
            validate_report_config(&config),
            Err(TradeLensError::ConfigInvalid { .. })
        ));
        let config = MapConfig::new(&[("report", "histogram_bins", "many")]);
        assert!(validate_report_config(&config).is_err());
        let config = MapConfig::new(&[("report", "histogram_bins", " 12 ")]);
        assert!(validate_report_config(&config).is_ok());
    }

    #[test]
    fn report_bins_are_capped() {
        let config = MapConfig::new(&[("report", "histogram_bins", "1000")]);
        assert!(validate_report_config(&config).is_ok());
        let config = MapConfig::new(&[("report", "histogram_bins", "1001")]);
        assert!(matches!(
            validate_report_config(&config),
            Err(TradeLensError::ConfigInvalid { ref key, .. }) if key == "histogram_bins"
        ));
        let config = MapConfig::new(&[("report", "histogram_bins", "100000000000000")]);
        assert!(validate_report_config(&config).is_err());
    }
}
