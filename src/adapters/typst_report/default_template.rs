//! Default Typst report template.
//!
//! Built-in Typst markup with `{{PLACEHOLDER}}` substitution.

const TEMPLATE: &str = r#"#set page(paper: "a4", margin: 1.6cm)
#set text(size: 10pt)

= {{TITLE}}

{{FILTER_SUMMARY}}

== Key figures

{{KPI_TABLE}}

== Winning days

{{WINNING_DAYS}}

== Cumulative equity

{{EQUITY_CURVE_SVG}}

== PnL distribution per trade

{{PNL_HISTOGRAM_SVG}}

== Trade duration (minutes)

{{DURATION_HISTOGRAM_SVG}}

#pagebreak()

== Trade journal

{{TRADE_JOURNAL}}
"#;

pub fn template() -> &'static str {
    TEMPLATE
}

/// Placeholders the report adapter resolves.
pub const PLACEHOLDERS: [&str; 8] = [
    "{{TITLE}}",
    "{{FILTER_SUMMARY}}",
    "{{KPI_TABLE}}",
    "{{WINNING_DAYS}}",
    "{{EQUITY_CURVE_SVG}}",
    "{{PNL_HISTOGRAM_SVG}}",
    "{{DURATION_HISTOGRAM_SVG}}",
    "{{TRADE_JOURNAL}}",
];
