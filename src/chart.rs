//! Chart rendering for metric series
//!
//! A [`ChartSpec`] is the renderer-neutral description of one metric chart
//! (what the JSON API returns); [`render_svg`] turns it into inline SVG for the
//! server-rendered page. The current series is always present. The optimized
//! series is added, dashed, only when the view asks for it.

use crate::models::{Metric, MetricPoint};
use serde::Serialize;
use std::fmt::Write as _;

/// Accent for metrics that represent something going wrong
pub const ALERT_COLOR: &str = "#ef4444";
/// Accent for every other metric
pub const DEFAULT_COLOR: &str = "#3b82f6";
/// Stroke used for the optimized overlay
pub const OPTIMIZED_COLOR: &str = "#10b981";
/// Dash pattern for the optimized overlay
pub const OPTIMIZED_DASH: &str = "5 5";

const WIDTH: f64 = 640.0;
const HEIGHT: f64 = 280.0;
const PAD_LEFT: f64 = 64.0;
const PAD_RIGHT: f64 = 16.0;
const PAD_TOP: f64 = 16.0;
const PAD_BOTTOM: f64 = 56.0;
const Y_INTERVALS: usize = 4;
const MAX_X_LABELS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Line,
    Area,
}

impl ChartKind {
    /// Static per-metric mapping: memory-style metrics are drawn as areas
    pub fn for_metric(key: &str) -> Self {
        if key == "memory" {
            ChartKind::Area
        } else {
            ChartKind::Line
        }
    }
}

/// Accent colour for a metric's current-state series
pub fn accent_for_metric(key: &str) -> &'static str {
    match key {
        "latency" | "dnsErrors" => ALERT_COLOR,
        _ => DEFAULT_COLOR,
    }
}

/// Y-axis tick label: raw number followed by the unit, no conversion
pub fn format_tick(value: f64, unit: &str) -> String {
    format!("{}{}", value, unit)
}

/// One drawn series
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSeries {
    pub name: String,
    /// Point field the series is read from ("value" or "optimizedValue")
    pub data_key: String,
    pub values: Vec<f64>,
    pub stroke: String,
    pub dashed: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSpec {
    pub metric_key: String,
    pub title: String,
    pub unit: String,
    pub kind: ChartKind,
    pub x_labels: Vec<String>,
    pub series: Vec<ChartSeries>,
    pub y_ticks: Vec<f64>,
}

impl ChartSpec {
    pub fn from_metric(metric: &Metric, show_optimized: bool) -> Self {
        let mut series = vec![ChartSeries {
            name: "Current State".to_string(),
            data_key: "value".to_string(),
            values: metric.data.iter().map(|p| p.value).collect(),
            stroke: accent_for_metric(&metric.key).to_string(),
            dashed: false,
        }];

        if show_optimized {
            series.push(ChartSeries {
                name: "Optimized".to_string(),
                data_key: "optimizedValue".to_string(),
                values: metric.data.iter().map(|p| p.optimized_value).collect(),
                stroke: OPTIMIZED_COLOR.to_string(),
                dashed: true,
            });
        }

        let max = series
            .iter()
            .flat_map(|s| s.values.iter().copied())
            .fold(0.0_f64, f64::max);

        Self {
            metric_key: metric.key.clone(),
            title: metric.label.clone(),
            unit: metric.unit.clone(),
            kind: ChartKind::for_metric(&metric.key),
            x_labels: metric.data.iter().map(|p: &MetricPoint| p.time.clone()).collect(),
            series,
            y_ticks: y_ticks(max),
        }
    }

    pub fn has_optimized_overlay(&self) -> bool {
        self.series.iter().any(|s| s.data_key == "optimizedValue")
    }

    /// Formatted y-axis labels, bottom to top
    pub fn tick_labels(&self) -> Vec<String> {
        self.y_ticks
            .iter()
            .map(|t| format_tick(*t, &self.unit))
            .collect()
    }
}

/// Round a raw step up to 1, 2, 2.5 or 5 times a power of ten
fn nice_step(raw: f64) -> f64 {
    if raw <= 0.0 || !raw.is_finite() {
        return 1.0;
    }
    let exp = 10f64.powf(raw.log10().floor());
    let frac = raw / exp;
    let nice = if frac <= 1.0 {
        1.0
    } else if frac <= 2.0 {
        2.0
    } else if frac <= 2.5 {
        2.5
    } else if frac <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * exp
}

/// Evenly spaced ticks from zero whose top covers `max`
fn y_ticks(max: f64) -> Vec<f64> {
    let step = nice_step(max / Y_INTERVALS as f64);
    (0..=Y_INTERVALS)
        .map(|i| ((i as f64 * step) * 1e6).round() / 1e6)
        .collect()
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

struct Plot {
    count: usize,
    y_max: f64,
}

impl Plot {
    fn width() -> f64 {
        WIDTH - PAD_LEFT - PAD_RIGHT
    }

    fn height() -> f64 {
        HEIGHT - PAD_TOP - PAD_BOTTOM
    }

    fn bottom() -> f64 {
        PAD_TOP + Self::height()
    }

    fn x(&self, i: usize) -> f64 {
        if self.count <= 1 {
            return PAD_LEFT + Self::width() / 2.0;
        }
        PAD_LEFT + Self::width() * i as f64 / (self.count - 1) as f64
    }

    fn y(&self, value: f64) -> f64 {
        PAD_TOP + Self::height() * (1.0 - (value / self.y_max).clamp(0.0, 1.0))
    }

    fn points(&self, values: &[f64]) -> String {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| format!("{:.1},{:.1}", self.x(i), self.y(*v)))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Render a chart as a standalone SVG element
pub fn render_svg(spec: &ChartSpec) -> String {
    let y_max = spec.y_ticks.last().copied().filter(|m| *m > 0.0).unwrap_or(1.0);
    let plot = Plot {
        count: spec.x_labels.len(),
        y_max,
    };

    let mut svg = String::new();
    // Writing into a String cannot fail
    let _ = write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {w} {h}" class="metric-chart" role="img" aria-label="{title}" data-kind="{kind}">"#,
        w = WIDTH,
        h = HEIGHT,
        title = escape(&spec.title),
        kind = match spec.kind {
            ChartKind::Line => "line",
            ChartKind::Area => "area",
        },
    );

    // Grid and y ticks
    for (tick, label) in spec.y_ticks.iter().zip(spec.tick_labels()) {
        let y = plot.y(*tick);
        let _ = write!(
            svg,
            r##"<line x1="{x1}" y1="{y:.1}" x2="{x2}" y2="{y:.1}" stroke="#334155" stroke-dasharray="3 3"/><text x="{tx}" y="{ty:.1}" text-anchor="end" class="tick">{label}</text>"##,
            x1 = PAD_LEFT,
            x2 = WIDTH - PAD_RIGHT,
            tx = PAD_LEFT - 6.0,
            ty = y + 4.0,
            label = escape(&label),
        );
    }

    // X labels, thinned so they stay legible
    let stride = spec.x_labels.len().div_ceil(MAX_X_LABELS).max(1);
    for (i, label) in spec.x_labels.iter().enumerate().step_by(stride) {
        let _ = write!(
            svg,
            r#"<text x="{x:.1}" y="{y:.1}" text-anchor="middle" class="tick">{label}</text>"#,
            x = plot.x(i),
            y = Plot::bottom() + 16.0,
            label = escape(label),
        );
    }

    for series in &spec.series {
        if series.values.is_empty() {
            continue;
        }
        let dash = if series.dashed {
            format!(r#" stroke-dasharray="{}""#, OPTIMIZED_DASH)
        } else {
            String::new()
        };

        if spec.kind == ChartKind::Area {
            let last = series.values.len() - 1;
            let _ = write!(
                svg,
                r#"<polygon points="{x0:.1},{b:.1} {pts} {xn:.1},{b:.1}" fill="{fill}" fill-opacity="0.25" stroke="none"/>"#,
                x0 = plot.x(0),
                xn = plot.x(last),
                b = Plot::bottom(),
                pts = plot.points(&series.values),
                fill = series.stroke,
            );
        }

        let _ = write!(
            svg,
            r#"<polyline points="{pts}" fill="none" stroke="{stroke}" stroke-width="2"{dash} data-series="{key}"/>"#,
            pts = plot.points(&series.values),
            stroke = series.stroke,
            key = series.data_key,
        );
    }

    // Legend
    let legend_y = HEIGHT - 10.0;
    for (n, series) in spec.series.iter().enumerate() {
        let x = PAD_LEFT + n as f64 * 140.0;
        let dash = if series.dashed {
            format!(r#" stroke-dasharray="{}""#, OPTIMIZED_DASH)
        } else {
            String::new()
        };
        let _ = write!(
            svg,
            r#"<line x1="{x:.1}" y1="{y:.1}" x2="{x2:.1}" y2="{y:.1}" stroke="{stroke}" stroke-width="2"{dash}/><text x="{tx:.1}" y="{ty:.1}" class="legend">{name}</text>"#,
            x = x,
            x2 = x + 18.0,
            y = legend_y - 4.0,
            stroke = series.stroke,
            tx = x + 24.0,
            ty = legend_y,
            name = escape(&series.name),
        );
    }

    svg.push_str("</svg>");
    svg
}
