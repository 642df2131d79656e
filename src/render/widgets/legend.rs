//! Legend rows and provider badges

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};

use super::counters::format_count;
use crate::render::theme::Theme;
use crate::report::{LegendItem, ProviderBadge};

/// Colored swatch, label and count per item, laid out inline
pub struct Legend<'a> {
    items: &'a [LegendItem],
    theme: Theme,
}

impl<'a> Legend<'a> {
    pub fn new(items: &'a [LegendItem], theme: Theme) -> Self {
        Self { items, theme }
    }

    fn build_line(&self) -> Line<'static> {
        let mut spans = Vec::with_capacity(self.items.len() * 3);
        for item in self.items {
            spans.push(Span::styled(
                "■ ",
                Style::default().fg(self.theme.series_color(item.color.as_deref())),
            ));
            spans.push(Span::styled(
                format!("{} ", item.label),
                Style::default().fg(self.theme.text()),
            ));
            spans.push(Span::styled(
                format!("({})   ", format_count(item.value)),
                Style::default().fg(self.theme.muted()),
            ));
        }
        Line::from(spans)
    }
}

impl Widget for Legend<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Paragraph::new(self.build_line())
            .wrap(Wrap { trim: true })
            .render(area, buf);
    }
}

/// Provider badges with an on/off premises marker
pub struct ProviderBadges<'a> {
    badges: &'a [ProviderBadge],
    theme: Theme,
}

impl<'a> ProviderBadges<'a> {
    pub fn new(badges: &'a [ProviderBadge], theme: Theme) -> Self {
        Self { badges, theme }
    }

    fn premise_marker(&self, on_premises: Option<bool>) -> Span<'static> {
        match on_premises {
            Some(true) => Span::styled("on", Style::default().fg(self.theme.on_premises())),
            Some(false) => Span::styled("off", Style::default().fg(self.theme.off_premises())),
            None => Span::styled("?", Style::default().fg(self.theme.muted())),
        }
    }

    fn build_line(&self) -> Line<'static> {
        let mut spans = Vec::with_capacity(self.badges.len() * 4);
        for badge in self.badges {
            spans.push(Span::styled(
                format!("[{} ", badge.label),
                Style::default().fg(self.theme.series_color(badge.color.as_deref())),
            ));
            spans.push(self.premise_marker(badge.on_premises));
            spans.push(Span::styled(
                "]",
                Style::default().fg(self.theme.series_color(badge.color.as_deref())),
            ));
            spans.push(Span::raw("  "));
        }
        Line::from(spans)
    }
}

impl Widget for ProviderBadges<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Paragraph::new(self.build_line())
            .wrap(Wrap { trim: true })
            .render(area, buf);
    }
}

/// Rows needed to show `cells` characters of inline content at `width`
pub fn wrapped_height(cells: usize, width: u16) -> u16 {
    let width = width.max(1) as usize;
    u16::try_from(cells.div_ceil(width).max(1)).unwrap_or(u16::MAX)
}

/// Approximate inline width of a legend (used for panel sizing)
pub fn legend_cells(items: &[LegendItem]) -> usize {
    items
        .iter()
        .map(|i| 2 + i.label.chars().count() + 1 + format_count(i.value).len() + 5)
        .sum()
}

/// Approximate inline width of a badge row
pub fn badge_cells(badges: &[ProviderBadge]) -> usize {
    badges
        .iter()
        .map(|b| b.label.chars().count() + 8)
        .sum()
}
