//! Typst report generation.
//!
//! Reads a Typst template (either the built-in default or a custom file via
//! `template_path`), resolves all `{{PLACEHOLDER}}` markers by calling helpers
//! from `chart_svg` and `tables`, and writes the final `.typ` file.

pub mod chart_svg;
pub mod default_template;
pub mod tables;

use std::fs;
use std::path::Path;

use crate::domain::analysis::Analysis;
use crate::domain::error::TradeLensError;
use crate::domain::selection::MAX_HISTOGRAM_BINS;
use crate::ports::report_port::ReportPort;

use chart_svg::Histogram;

pub const DEFAULT_HISTOGRAM_BINS: usize = 30;

pub struct TypstReportAdapter {
    template: Option<String>,
    histogram_bins: usize,
    title: String,
}

impl Default for TypstReportAdapter {
    fn default() -> Self {
        Self {
            template: None,
            histogram_bins: DEFAULT_HISTOGRAM_BINS,
            title: "Trade Dashboard".to_string(),
        }
    }
}

impl TypstReportAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_template(mut self, template: String) -> Self {
        self.template = Some(template);
        self
    }

    pub fn with_template_file(self, path: &Path) -> Result<Self, TradeLensError> {
        let content = fs::read_to_string(path).map_err(|e| TradeLensError::Report {
            reason: format!("failed to read template {}: {}", path.display(), e),
        })?;
        Ok(self.with_template(content))
    }

    pub fn with_histogram_bins(mut self, bins: usize) -> Self {
        self.histogram_bins = bins.clamp(1, MAX_HISTOGRAM_BINS);
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn render(&self, analysis: &Analysis) -> String {
        let template = self
            .template
            .as_deref()
            .unwrap_or(default_template::template());
        resolve(template, analysis, &self.title, self.histogram_bins)
    }
}

impl ReportPort for TypstReportAdapter {
    fn write(&self, analysis: &Analysis, output_path: &Path) -> Result<(), TradeLensError> {
        let content = self.render(analysis);
        fs::write(output_path, content).map_err(|e| TradeLensError::Report {
            reason: format!("failed to write {}: {}", output_path.display(), e),
        })?;
        tracing::info!(path = %output_path.display(), "report written");
        Ok(())
    }
}

/// Resolve all `{{PLACEHOLDER}}`s in the given template string and return
/// the final Typst markup.
pub fn resolve(template: &str, analysis: &Analysis, title: &str, bins: usize) -> String {
    let mut output = template.to_string();

    output = output.replace("{{TITLE}}", title);
    output = output.replace(
        "{{FILTER_SUMMARY}}",
        &tables::render_filter_summary(&analysis.criteria, analysis.ledger_trades),
    );
    output = output.replace("{{KPI_TABLE}}", &tables::render_kpi_table(&analysis.summary));
    output = output.replace(
        "{{WINNING_DAYS}}",
        &tables::render_winning_days(&analysis.daily),
    );

    let equity_svg = chart_svg::generate_equity_svg(&analysis.equity_curve);
    output = output.replace(
        "{{EQUITY_CURVE_SVG}}",
        &embed_svg(&equity_svg, "_No equity data._"),
    );

    let pnl_svg = chart_svg::generate_histogram_svg(
        &Histogram::from_values(&analysis.pnl_values, bins),
        "PnL per trade (USD)",
    );
    output = output.replace(
        "{{PNL_HISTOGRAM_SVG}}",
        &embed_svg(&pnl_svg, "_No PnL data._"),
    );

    let duration_svg = chart_svg::generate_histogram_svg(
        &Histogram::from_values(&analysis.durations, bins),
        "Duration (min)",
    );
    output = output.replace(
        "{{DURATION_HISTOGRAM_SVG}}",
        &embed_svg(&duration_svg, "_No duration data._"),
    );

    output = output.replace(
        "{{TRADE_JOURNAL}}",
        &tables::render_trade_journal(&analysis.journal),
    );

    output
}

fn embed_svg(svg: &str, fallback: &str) -> String {
    if svg.is_empty() {
        return fallback.to_string();
    }
    format!(
        "#image.decode(\n\"{}\",\n  width: 100%,\n)",
        svg.replace('\\', "\\\\").replace('"', "\\\"")
    )
}
