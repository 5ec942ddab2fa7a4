//! SVG chart rendering for reports: equity curve and histograms.

use crate::domain::metrics::EquityPoint;
use crate::domain::selection::MAX_HISTOGRAM_BINS;

const WIDTH: f64 = 600.0;
const HEIGHT: f64 = 240.0;
const PADDING: f64 = 40.0;

/// Equal-width bins over a set of values.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

impl Histogram {
    /// Bins `values` into `bins` equal-width buckets spanning `[min, max]`.
    /// The last bucket is closed on the right. When every value is equal the
    /// range is widened to `[v - 0.5, v + 0.5]`. `bins` is clamped to
    /// `1..=MAX_HISTOGRAM_BINS`.
    pub fn from_values(values: &[f64], bins: usize) -> Self {
        let bins = bins.clamp(1, MAX_HISTOGRAM_BINS);
        if values.is_empty() {
            return Histogram {
                edges: Vec::new(),
                counts: Vec::new(),
            };
        }

        let mut lo = values.iter().copied().fold(f64::INFINITY, f64::min);
        let mut hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if lo == hi {
            lo -= 0.5;
            hi += 0.5;
        }

        let step = (hi - lo) / bins as f64;
        let edges: Vec<f64> = (0..=bins).map(|i| lo + step * i as f64).collect();

        let mut counts = vec![0usize; bins];
        for &value in values {
            let slot = (((value - lo) / step) as usize).min(bins - 1);
            counts[slot] += 1;
        }

        Histogram { edges, counts }
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

/// Line chart of cumulative PnL. Empty input yields an empty string.
pub fn generate_equity_svg(curve: &[EquityPoint]) -> String {
    if curve.is_empty() {
        return String::new();
    }

    let min = curve
        .iter()
        .map(|p| p.cumulative_pnl)
        .fold(0.0_f64, f64::min);
    let max = curve
        .iter()
        .map(|p| p.cumulative_pnl)
        .fold(0.0_f64, f64::max);

    let plot_width = WIDTH - 2.0 * PADDING;
    let plot_height = HEIGHT - 2.0 * PADDING;
    let range = max - min;
    let scale_y = if range > 0.0 { plot_height / range } else { 1.0 };
    let scale_x = if curve.len() > 1 {
        plot_width / (curve.len() - 1) as f64
    } else {
        0.0
    };
    let y_of = |v: f64| HEIGHT - PADDING - (v - min) * scale_y;

    let points: Vec<String> = curve
        .iter()
        .enumerate()
        .map(|(i, p)| {
            format!(
                "{:.1},{:.1}",
                PADDING + i as f64 * scale_x,
                y_of(p.cumulative_pnl)
            )
        })
        .collect();

    let first = curve[0].time.format("%Y-%m-%d");
    let last = curve[curve.len() - 1].time.format("%Y-%m-%d");

    let mut svg = svg_open();
    svg.push_str(&axes());
    svg.push_str(&format!(
        r##"<line x1="{x1:.1}" y1="{y:.1}" x2="{x2:.1}" y2="{y:.1}" stroke="#bbb" stroke-dasharray="4 3"/>"##,
        x1 = PADDING,
        x2 = WIDTH - PADDING,
        y = y_of(0.0),
    ));
    svg.push_str(&format!(
        r##"<polyline fill="none" stroke="#1f77b4" stroke-width="2" points="{}"/>"##,
        points.join(" ")
    ));
    svg.push_str(&label(PADDING, HEIGHT - 12.0, "start", &first.to_string()));
    svg.push_str(&label(WIDTH - PADDING, HEIGHT - 12.0, "end", &last.to_string()));
    svg.push_str(&label(PADDING - 4.0, PADDING, "end", &format!("{:.0}", max)));
    svg.push_str(&label(
        PADDING - 4.0,
        HEIGHT - PADDING,
        "end",
        &format!("{:.0}", min),
    ));
    svg.push_str("</svg>");
    svg
}

/// Bar chart of a histogram. Empty input yields an empty string.
pub fn generate_histogram_svg(hist: &Histogram, x_label: &str) -> String {
    if hist.is_empty() {
        return String::new();
    }

    let plot_width = WIDTH - 2.0 * PADDING;
    let plot_height = HEIGHT - 2.0 * PADDING;
    let tallest = hist.counts.iter().copied().max().unwrap_or(0).max(1) as f64;
    let bar_width = plot_width / hist.counts.len() as f64;

    let mut svg = svg_open();
    svg.push_str(&axes());
    for (i, &count) in hist.counts.iter().enumerate() {
        if count == 0 {
            continue;
        }
        let h = count as f64 / tallest * plot_height;
        svg.push_str(&format!(
            r##"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="#1f77b4" stroke="white"/>"##,
            PADDING + i as f64 * bar_width,
            HEIGHT - PADDING - h,
            bar_width,
            h
        ));
    }

    let lo = hist.edges[0];
    let hi = hist.edges[hist.edges.len() - 1];
    svg.push_str(&label(PADDING, HEIGHT - 22.0, "start", &format!("{:.2}", lo)));
    svg.push_str(&label(WIDTH - PADDING, HEIGHT - 22.0, "end", &format!("{:.2}", hi)));
    svg.push_str(&label(WIDTH / 2.0, HEIGHT - 6.0, "middle", x_label));
    svg.push_str(&label(
        PADDING - 4.0,
        PADDING,
        "end",
        &format!("{:.0}", tallest),
    ));
    svg.push_str("</svg>");
    svg
}

fn svg_open() -> String {
    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w:.0}" height="{h:.0}" viewBox="0 0 {w:.0} {h:.0}" font-family="sans-serif" font-size="10">"#,
        w = WIDTH,
        h = HEIGHT
    )
}

fn axes() -> String {
    format!(
        r#"<line x1="{p:.0}" y1="{p:.0}" x2="{p:.0}" y2="{b:.0}" stroke="black"/><line x1="{p:.0}" y1="{b:.0}" x2="{r:.0}" y2="{b:.0}" stroke="black"/>"#,
        p = PADDING,
        b = HEIGHT - PADDING,
        r = WIDTH - PADDING
    )
}

fn label(x: f64, y: f64, anchor: &str, text: &str) -> String {
    format!(
        r#"<text x="{:.1}" y="{:.1}" text-anchor="{}">{}</text>"#,
        x,
        y,
        anchor,
        escape_xml(text)
    )
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
