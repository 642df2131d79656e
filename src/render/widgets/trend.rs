//! Rating-trend line chart

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    symbols::Marker,
    text::Span,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, LegendPosition, Widget},
};

use crate::render::theme::Theme;
use crate::report::LineDataset;

/// Chart height in rows (borders included)
pub const TREND_HEIGHT: u16 = 18;

/// Rating scale shown even when the data is narrower
const RATING_MIN: f64 = 1.0;
const RATING_MAX: f64 = 5.0;

/// Points with a value, indexed by axis position
pub fn points(data: &[Option<f64>]) -> Vec<(f64, f64)> {
    data.iter()
        .enumerate()
        .filter_map(|(i, v)| v.map(|v| (i as f64, v)))
        .collect()
}

/// Runs of consecutive values; a `None` ends the current run
pub fn segments(data: &[Option<f64>]) -> Vec<Vec<(f64, f64)>> {
    let mut out = Vec::new();
    let mut current = Vec::new();
    for (i, value) in data.iter().enumerate() {
        match value {
            Some(v) => current.push((i as f64, *v)),
            None if !current.is_empty() => out.push(std::mem::take(&mut current)),
            None => {}
        }
    }
    if !current.is_empty() {
        out.push(current);
    }
    out
}

/// Y bounds covering the rating scale and any value outside it
pub fn y_bounds(datasets: &[LineDataset]) -> [f64; 2] {
    let values = datasets.iter().flat_map(|d| d.data.iter().flatten().copied());
    let (min, max) = values.fold((RATING_MIN, RATING_MAX), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    [min.floor(), max.ceil()]
}

/// First, middle and last axis labels
pub fn axis_labels(labels: &[String]) -> Vec<String> {
    match labels.len() {
        0 => Vec::new(),
        1 | 2 => labels.to_vec(),
        n => vec![
            labels[0].clone(),
            labels[n / 2].clone(),
            labels[n - 1].clone(),
        ],
    }
}

pub struct TrendChart<'a> {
    title: &'a str,
    labels: &'a [String],
    datasets: &'a [LineDataset],
    theme: Theme,
}

impl<'a> TrendChart<'a> {
    pub fn new(
        title: &'a str,
        labels: &'a [String],
        datasets: &'a [LineDataset],
        theme: Theme,
    ) -> Self {
        Self {
            title,
            labels,
            datasets,
            theme,
        }
    }
}

impl Widget for TrendChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let series: Vec<_> = self
            .datasets
            .iter()
            .map(|d| {
                let color = self.theme.series_color(Some(d.color.as_str()));
                (d.label.as_str(), color, points(&d.data), segments(&d.data))
            })
            .collect();

        // Named scatter per series for markers and legend, unnamed lines per run
        let mut datasets = Vec::new();
        for (label, color, pts, runs) in &series {
            datasets.push(
                Dataset::default()
                    .name(label.to_string())
                    .marker(Marker::Dot)
                    .graph_type(GraphType::Scatter)
                    .style(Style::default().fg(*color))
                    .data(pts),
            );
            for run in runs.iter().filter(|r| r.len() > 1) {
                datasets.push(
                    Dataset::default()
                        .marker(Marker::Braille)
                        .graph_type(GraphType::Line)
                        .style(Style::default().fg(*color))
                        .data(run),
                );
            }
        }

        let x_max = (self.labels.len().saturating_sub(1)).max(1) as f64;
        let y = y_bounds(self.datasets);
        let muted = Style::default().fg(self.theme.muted());

        let x_labels: Vec<Span> = axis_labels(self.labels)
            .into_iter()
            .map(|l| Span::styled(l, Style::default().fg(self.theme.date())))
            .collect();
        let y_labels: Vec<Span> = [y[0], (y[0] + y[1]) / 2.0, y[1]]
            .into_iter()
            .map(|v| Span::styled(format!("{:.1}", v), muted))
            .collect();

        Chart::new(datasets)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(muted)
                    .title(Span::styled(
                        self.title.to_string(),
                        Style::default()
                            .fg(self.theme.accent())
                            .add_modifier(Modifier::BOLD),
                    )),
            )
            .x_axis(
                Axis::default()
                    .title(Span::styled("Days", muted))
                    .style(muted)
                    .bounds([0.0, x_max])
                    .labels(x_labels),
            )
            .y_axis(
                Axis::default()
                    .title(Span::styled("Ratings", muted))
                    .style(muted)
                    .bounds(y)
                    .labels(y_labels),
            )
            .legend_position(Some(LegendPosition::TopRight))
            .hidden_legend_constraints((Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)))
            .render(area, buf);
    }
}
