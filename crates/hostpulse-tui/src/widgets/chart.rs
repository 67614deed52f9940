//! Latency chart for one monitored host.
//!
//! Series come from the poll loop already ordered and windowed; this widget
//! only projects them. Lost samples (no latency) are never interpolated
//! across: the line breaks into segments, and each lost sample gets a
//! baseline marker so outages stay visible.

use chrono::Local;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::symbols::Marker;
use ratatui::text::Span;
use ratatui::widgets::{Axis, Block, BorderType, Borders, Chart, Dataset, GraphType, Paragraph};

use hostpulse_core::Sample;

use crate::theme;

/// Precomputed render state for one host's latency series.
///
/// Rebuilt wholesale on every poll update; rendering borrows from it.
#[derive(Debug, Default)]
pub struct LatencyChart {
    /// Contiguous runs of measured samples.
    segments: Vec<Vec<(f64, f64)>>,
    /// Baseline markers for samples where every probe was lost.
    lost: Vec<(f64, f64)>,
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
    x_labels: Vec<String>,
}

impl LatencyChart {
    /// Replace the chart contents with a fresh sample window.
    pub fn replace_series(&mut self, samples: &[Sample]) {
        let (segments, lost) = split_segments(samples);
        self.segments = segments;
        self.lost = lost;

        let x_min = samples.first().map_or(0.0, |s| ts_f64(s.ts));
        let x_max = samples.last().map_or(1.0, |s| ts_f64(s.ts));
        self.x_bounds = [x_min, x_max.max(x_min + 1.0)];

        let y_peak = samples
            .iter()
            .filter_map(|s| s.latency)
            .fold(0.0_f64, f64::max);
        // Floor keeps the axis readable on idle links.
        self.y_bounds = [0.0, (y_peak * 1.2).max(10.0)];

        self.x_labels = match samples {
            [] => Vec::new(),
            [only] => vec![time_label(only.ts)],
            [first, .., last] => {
                let mid = (first.ts + last.ts) / 2;
                vec![time_label(first.ts), time_label(mid), time_label(last.ts)]
            }
        };
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty() && self.lost.is_empty()
    }

    /// Render the chart with `title` in the panel header.
    pub fn render(&self, frame: &mut Frame, area: Rect, title: &str) {
        let block = Block::default()
            .title(format!(" {title} "))
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_default());

        if self.is_empty() {
            let inner = block.inner(area);
            frame.render_widget(block, area);
            frame.render_widget(
                Paragraph::new("  Waiting for data…")
                    .style(Style::default().fg(theme::BORDER_GRAY)),
                inner,
            );
            return;
        }

        // Line segments first, lost markers on top.
        let mut datasets: Vec<Dataset> = self
            .segments
            .iter()
            .map(|segment| {
                Dataset::default()
                    .marker(Marker::Braille)
                    .graph_type(GraphType::Line)
                    .style(Style::default().fg(theme::NEON_CYAN))
                    .data(segment)
            })
            .collect();
        if !self.lost.is_empty() {
            datasets.push(
                Dataset::default()
                    .marker(Marker::Dot)
                    .graph_type(GraphType::Scatter)
                    .style(Style::default().fg(theme::ERROR_RED))
                    .data(&self.lost),
            );
        }

        let x_labels: Vec<Span> = self
            .x_labels
            .iter()
            .map(|label| Span::styled(label.as_str(), Style::default().fg(theme::BORDER_GRAY)))
            .collect();
        let y_labels = vec![
            Span::styled("0", Style::default().fg(theme::BORDER_GRAY)),
            Span::styled(
                format!("{:.0} ms", self.y_bounds[1] / 2.0),
                Style::default().fg(theme::BORDER_GRAY),
            ),
            Span::styled(
                format!("{:.0} ms", self.y_bounds[1]),
                Style::default().fg(theme::BORDER_GRAY),
            ),
        ];

        let chart = Chart::new(datasets)
            .block(block)
            .x_axis(
                Axis::default()
                    .bounds(self.x_bounds)
                    .labels(x_labels)
                    .style(Style::default().fg(theme::BORDER_GRAY)),
            )
            .y_axis(
                Axis::default()
                    .bounds(self.y_bounds)
                    .labels(y_labels)
                    .style(Style::default().fg(theme::BORDER_GRAY)),
            );

        frame.render_widget(chart, area);
    }
}

/// Split a sample window into contiguous measured runs plus baseline
/// markers for lost samples.
fn split_segments(samples: &[Sample]) -> (Vec<Vec<(f64, f64)>>, Vec<(f64, f64)>) {
    let mut segments = Vec::new();
    let mut current: Vec<(f64, f64)> = Vec::new();
    let mut lost = Vec::new();

    for sample in samples {
        match sample.latency {
            Some(latency) => current.push((ts_f64(sample.ts), latency)),
            None => {
                if !current.is_empty() {
                    segments.push(std::mem::take(&mut current));
                }
                lost.push((ts_f64(sample.ts), 0.0));
            }
        }
    }
    if !current.is_empty() {
        segments.push(current);
    }

    (segments, lost)
}

#[allow(clippy::cast_precision_loss)]
fn ts_f64(ts: i64) -> f64 {
    ts as f64
}

/// Local wall-clock label for an axis tick.
fn time_label(ts: i64) -> String {
    chrono::DateTime::from_timestamp(ts, 0).map_or_else(
        || "--:--:--".to_owned(),
        |dt| dt.with_timezone(&Local).format("%H:%M:%S").to_string(),
    )
}
