//! Share bars: terminal stand-in for a totals doughnut

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use super::counters::format_count;
use crate::render::theme::Theme;
use crate::report::DoughnutChart;

/// Label column width
const LABEL_WIDTH: usize = 14;

/// Bar width in cells
const BAR_WIDTH: usize = 30;

/// Format a percentage bar with filled/empty blocks
/// Example: 50.0% with width 10 → "█████░░░░░"
pub fn format_percentage_bar(percent: f64, width: usize) -> String {
    let filled = (((percent / 100.0) * width as f64).round() as usize).min(width);
    let empty = width.saturating_sub(filled);
    format!("{}{}", "█".repeat(filled), "░".repeat(empty))
}

/// Percentage of `value` in `total`, zero when the total is zero
pub fn share_percent(value: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        value as f64 * 100.0 / total as f64
    }
}

/// One titled row per slice: label, bar, count, percentage
pub struct ShareBars<'a> {
    title: &'a str,
    chart: &'a DoughnutChart,
    theme: Theme,
}

impl<'a> ShareBars<'a> {
    pub fn new(title: &'a str, chart: &'a DoughnutChart, theme: Theme) -> Self {
        Self {
            title,
            chart,
            theme,
        }
    }

    /// Title row plus one row per slice
    pub fn height(chart: &DoughnutChart) -> u16 {
        u16::try_from(chart.labels.len())
            .unwrap_or(u16::MAX)
            .saturating_add(1)
    }

    fn build_lines(&self) -> Vec<Line<'static>> {
        let total: usize = self.chart.values.iter().sum();

        let mut lines = vec![Line::from(vec![
            Span::styled(
                self.title.to_string(),
                Style::default()
                    .fg(self.theme.accent())
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  {} {}", format_count(total), self.chart.dataset_label),
                Style::default().fg(self.theme.muted()),
            ),
        ])];

        for (i, label) in self.chart.labels.iter().enumerate() {
            let value = self.chart.values.get(i).copied().unwrap_or(0);
            let color = self
                .theme
                .series_color(self.chart.colors.get(i).and_then(|c| c.as_deref()));
            let percent = share_percent(value, total);

            lines.push(Line::from(vec![
                Span::styled(
                    format!("{:<width$}", label, width = LABEL_WIDTH),
                    Style::default().fg(self.theme.text()),
                ),
                Span::styled(
                    format_percentage_bar(percent, BAR_WIDTH),
                    Style::default().fg(color),
                ),
                Span::styled(
                    format!("{:>8}", format_count(value)),
                    Style::default().fg(self.theme.text()),
                ),
                Span::styled(
                    format!("{:>7.1}%", percent),
                    Style::default().fg(self.theme.muted()),
                ),
            ]));
        }

        lines
    }
}

impl Widget for ShareBars<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Paragraph::new(self.build_lines()).render(area, buf);
    }
}
