//! Terminal collaborator: draws each report element into its own buffer
//! and prints the buffers top to bottom.

use std::io::{self, Write};

use crossterm::{
    queue,
    style::{Attribute, Color as TermColor, Print, ResetColor, SetAttribute, SetForegroundColor},
};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::Widget,
};

use super::theme::Theme;
use super::widgets::{
    counters::CounterCards,
    legend::{badge_cells, legend_cells, wrapped_height, Legend, ProviderBadges},
    share::ShareBars,
    trend::{TrendChart, TREND_HEIGHT},
};
use crate::report::{
    targets, ChartRenderer, CounterSink, DoughnutChart, LegendItem, LegendRenderer, LineDataset,
    ProviderBadge, ReportRenderer,
};

/// Width used when the terminal size is unknown (e.g. piped output)
pub const DEFAULT_WIDTH: u16 = 100;

/// Maximum content width (keeps charts readable on wide terminals)
const MAX_WIDTH: u16 = 140;

/// Minimum width for a usable chart
const MIN_WIDTH: u16 = 40;

/// Human-facing heading for a render target
pub fn panel_title(target: &str) -> &'static str {
    match target {
        targets::LOCATIONS_COUNT => "Locations",
        targets::PUBLISHERS_COUNT => "Publishers",
        targets::PUBLISHER_DOUGHNUT => "Total Reviews by Publisher",
        targets::PUBLISHER_LEGEND => "Publishers",
        targets::PUBLISHER_TREND => "Rating Trends by Publisher",
        targets::PROVIDERS => "Providers",
        targets::PREMISE_LEGEND => "Premises",
        targets::PREMISE_DOUGHNUT => "Total Reviews by Premise",
        targets::PREMISE_TREND => "Rating Trends by Premise",
        _ => "",
    }
}

#[derive(Debug, Clone)]
enum Panel {
    Share {
        target: String,
        chart: DoughnutChart,
    },
    Legend {
        target: String,
        items: Vec<LegendItem>,
    },
    Providers {
        target: String,
        badges: Vec<ProviderBadge>,
    },
    Trend {
        target: String,
        labels: Vec<String>,
        datasets: Vec<LineDataset>,
    },
}

impl Panel {
    fn target(&self) -> &str {
        match self {
            Self::Share { target, .. }
            | Self::Legend { target, .. }
            | Self::Providers { target, .. }
            | Self::Trend { target, .. } => target,
        }
    }

    fn height(&self, width: u16) -> u16 {
        match self {
            Self::Share { chart, .. } => ShareBars::height(chart),
            // Title row plus wrapped content (one row of slack for word wrap)
            Self::Legend { items, .. } => {
                wrapped_height(legend_cells(items), width).saturating_add(2)
            }
            Self::Providers { badges, .. } => {
                wrapped_height(badge_cells(badges), width).saturating_add(2)
            }
            Self::Trend { .. } => TREND_HEIGHT,
        }
    }
}

/// Renderer that provides every collaborator and draws to the terminal
#[derive(Debug)]
pub struct TerminalReport {
    theme: Theme,
    width: u16,
    counters: Vec<(String, usize)>,
    panels: Vec<Panel>,
}

impl TerminalReport {
    pub fn new(theme: Theme, width: u16) -> Self {
        Self {
            theme,
            width: width.clamp(MIN_WIDTH, MAX_WIDTH),
            counters: Vec::new(),
            panels: Vec::new(),
        }
    }

    /// Current terminal width, or the default when it cannot be read
    pub fn terminal_width() -> u16 {
        crossterm::terminal::size()
            .map(|(w, _)| w)
            .unwrap_or(DEFAULT_WIDTH)
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    /// Number of rendered elements (counters count as one)
    pub fn panel_count(&self) -> usize {
        self.panels.len() + usize::from(!self.counters.is_empty())
    }

    /// Re-rendering a target replaces its panel in place
    fn upsert(&mut self, panel: Panel) {
        match self.panels.iter_mut().find(|p| p.target() == panel.target()) {
            Some(existing) => *existing = panel,
            None => self.panels.push(panel),
        }
    }

    /// One buffer per element, counters first
    pub fn render_buffers(&self) -> Vec<Buffer> {
        let mut buffers = Vec::with_capacity(self.panel_count());

        if !self.counters.is_empty() {
            let area = Rect::new(
                0,
                0,
                self.width,
                CounterCards::height(self.counters.len(), self.width),
            );
            let mut buf = Buffer::empty(area);
            CounterCards::new(&self.counters, self.theme).render(area, &mut buf);
            buffers.push(buf);
        }

        for panel in &self.panels {
            let area = Rect::new(0, 0, self.width, panel.height(self.width));
            let mut buf = Buffer::empty(area);
            self.render_panel(panel, area, &mut buf);
            buffers.push(buf);
        }

        buffers
    }

    fn render_panel(&self, panel: &Panel, area: Rect, buf: &mut Buffer) {
        match panel {
            Panel::Share { target, chart } => {
                ShareBars::new(panel_title(target), chart, self.theme).render(area, buf);
            }
            Panel::Legend { target, items } => {
                let body = self.render_heading(target, area, buf);
                Legend::new(items, self.theme).render(body, buf);
            }
            Panel::Providers { target, badges } => {
                let body = self.render_heading(target, area, buf);
                ProviderBadges::new(badges, self.theme).render(body, buf);
            }
            Panel::Trend {
                target,
                labels,
                datasets,
            } => {
                TrendChart::new(panel_title(target), labels, datasets, self.theme)
                    .render(area, buf);
            }
        }
    }

    /// Draw the heading row and return the area below it
    fn render_heading(&self, target: &str, area: Rect, buf: &mut Buffer) -> Rect {
        buf.set_string(
            area.x,
            area.y,
            panel_title(target),
            Style::default()
                .fg(self.theme.accent())
                .add_modifier(Modifier::BOLD),
        );
        Rect {
            y: area.y + 1,
            height: area.height.saturating_sub(1),
            ..area
        }
    }

    /// Plain text, one blank line between elements
    pub fn render_plain(&self) -> String {
        let mut out = String::new();
        for buf in self.render_buffers() {
            for line in buffer_lines(&buf) {
                out.push_str(&line);
                out.push('\n');
            }
            out.push('\n');
        }
        out
    }

    /// ANSI-colored output for an interactive terminal
    pub fn write_styled<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for buf in self.render_buffers() {
            write_buffer_styled(&buf, out)?;
            queue!(out, Print("\n"))?;
        }
        out.flush()
    }
}

impl ChartRenderer for TerminalReport {
    fn render_doughnut(&mut self, target: &str, chart: &DoughnutChart) {
        self.upsert(Panel::Share {
            target: target.to_string(),
            chart: chart.clone(),
        });
    }

    fn render_line(&mut self, target: &str, labels: &[String], datasets: &[LineDataset]) {
        self.upsert(Panel::Trend {
            target: target.to_string(),
            labels: labels.to_vec(),
            datasets: datasets.to_vec(),
        });
    }
}

impl LegendRenderer for TerminalReport {
    fn render_legend(&mut self, target: &str, items: &[LegendItem]) {
        self.upsert(Panel::Legend {
            target: target.to_string(),
            items: items.to_vec(),
        });
    }

    fn render_providers(&mut self, target: &str, badges: &[ProviderBadge]) {
        self.upsert(Panel::Providers {
            target: target.to_string(),
            badges: badges.to_vec(),
        });
    }
}

impl CounterSink for TerminalReport {
    fn set_counter(&mut self, target: &str, value: usize) {
        let title = panel_title(target).to_string();
        match self.counters.iter_mut().find(|(t, _)| *t == title) {
            Some(entry) => entry.1 = value,
            None => self.counters.push((title, value)),
        }
    }
}

impl ReportRenderer for TerminalReport {
    fn charts(&mut self) -> Option<&mut dyn ChartRenderer> {
        Some(self)
    }

    fn legends(&mut self) -> Option<&mut dyn LegendRenderer> {
        Some(self)
    }

    fn counters(&mut self) -> Option<&mut dyn CounterSink> {
        Some(self)
    }
}

/// Buffer rows as text with trailing blanks trimmed
pub fn buffer_lines(buf: &Buffer) -> Vec<String> {
    let width = buf.area.width.max(1) as usize;
    buf.content()
        .chunks(width)
        .map(|row| {
            let line: String = row.iter().map(|c| c.symbol()).collect();
            line.trim_end().to_string()
        })
        .collect()
}

fn write_buffer_styled<W: Write>(buf: &Buffer, out: &mut W) -> io::Result<()> {
    let width = buf.area.width.max(1) as usize;

    for row in buf.content().chunks(width) {
        let end = row
            .iter()
            .rposition(|c| c.symbol() != " ")
            .map_or(0, |i| i + 1);

        let mut run = String::new();
        let mut run_style: Option<(Color, bool)> = None;

        for cell in &row[..end] {
            let style = (cell.fg, cell.modifier.contains(Modifier::BOLD));
            if run_style != Some(style) {
                if let Some(prev) = run_style {
                    write_run(out, &run, prev)?;
                }
                run.clear();
                run_style = Some(style);
            }
            run.push_str(cell.symbol());
        }
        if let Some(style) = run_style {
            write_run(out, &run, style)?;
        }
        queue!(out, Print("\n"))?;
    }

    Ok(())
}

fn write_run<W: Write>(out: &mut W, text: &str, (fg, bold): (Color, bool)) -> io::Result<()> {
    if fg != Color::Reset {
        queue!(out, SetForegroundColor(to_term_color(fg)))?;
    }
    if bold {
        queue!(out, SetAttribute(Attribute::Bold))?;
    }
    queue!(out, Print(text), SetAttribute(Attribute::Reset), ResetColor)
}

/// Map a ratatui color onto the crossterm palette
pub fn to_term_color(color: Color) -> TermColor {
    match color {
        Color::Reset => TermColor::Reset,
        Color::Black => TermColor::Black,
        Color::Red => TermColor::DarkRed,
        Color::Green => TermColor::DarkGreen,
        Color::Yellow => TermColor::DarkYellow,
        Color::Blue => TermColor::DarkBlue,
        Color::Magenta => TermColor::DarkMagenta,
        Color::Cyan => TermColor::DarkCyan,
        Color::Gray => TermColor::Grey,
        Color::DarkGray => TermColor::DarkGrey,
        Color::LightRed => TermColor::Red,
        Color::LightGreen => TermColor::Green,
        Color::LightYellow => TermColor::Yellow,
        Color::LightBlue => TermColor::Blue,
        Color::LightMagenta => TermColor::Magenta,
        Color::LightCyan => TermColor::Cyan,
        Color::White => TermColor::White,
        Color::Rgb(r, g, b) => TermColor::Rgb { r, g, b },
        Color::Indexed(i) => TermColor::AnsiValue(i),
    }
}
