//! Counter cards (distinct locations, distinct publishers)

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Widget},
};

use crate::render::theme::Theme;

/// Card dimensions
pub const CARD_WIDTH: u16 = 24;
pub const CARD_HEIGHT: u16 = 5;

/// Spacing between cards
const CARD_GAP: u16 = 2;

/// Format a count with thousand separators (e.g., 1234567 -> "1,234,567")
pub fn format_count(n: usize) -> String {
    let s = n.to_string();
    let len = s.len();
    let mut result = String::with_capacity(len + len / 3);

    // Digits are ASCII, so byte indexing is safe
    for (i, ch) in s.bytes().enumerate() {
        if i > 0 && (len - i).is_multiple_of(3) {
            result.push(',');
        }
        result.push(ch as char);
    }

    result
}

/// Row of bordered cards, one per counter
pub struct CounterCards<'a> {
    counters: &'a [(String, usize)],
    theme: Theme,
}

impl<'a> CounterCards<'a> {
    pub fn new(counters: &'a [(String, usize)], theme: Theme) -> Self {
        Self { counters, theme }
    }

    /// Cards per row for the available width (at least one)
    pub fn cards_per_row(width: u16) -> usize {
        (width.saturating_add(CARD_GAP) / (CARD_WIDTH + CARD_GAP)).max(1) as usize
    }

    /// Height needed to lay out every card
    pub fn height(count: usize, width: u16) -> u16 {
        let rows = u16::try_from(count.div_ceil(Self::cards_per_row(width))).unwrap_or(u16::MAX);
        rows.saturating_mul(CARD_HEIGHT + 1)
    }

    fn card_colors(&self, index: usize) -> Color {
        match index % 2 {
            0 => self.theme.accent(),
            _ => self.theme.date(),
        }
    }

    fn render_card(&self, area: Rect, buf: &mut Buffer, title: &str, value: &str, color: Color) {
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color))
            .render(area, buf);

        if area.height > 2 {
            let title_x = area.x + area.width.saturating_sub(title.len() as u16) / 2;
            buf.set_string(title_x, area.y + 1, title, Style::default().fg(color));
        }

        if area.height > 3 {
            let value_x = area.x + area.width.saturating_sub(value.len() as u16) / 2;
            buf.set_string(
                value_x,
                area.y + 3,
                value,
                Style::default()
                    .fg(self.theme.text())
                    .add_modifier(Modifier::BOLD),
            );
        }
    }
}

impl Widget for CounterCards<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let cols = Self::cards_per_row(area.width);

        for (i, (title, value)) in self.counters.iter().enumerate() {
            let row = (i / cols) as u16;
            let col = (i % cols) as u16;
            let card_area = Rect {
                x: area.x + col * (CARD_WIDTH + CARD_GAP),
                y: area.y + row * (CARD_HEIGHT + 1),
                width: CARD_WIDTH.min(area.width),
                height: CARD_HEIGHT,
            };

            // Skip if card is outside area
            if card_area.bottom() > area.bottom() {
                continue;
            }

            self.render_card(
                card_area,
                buf,
                title,
                &format_count(*value),
                self.card_colors(i),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer_text(buf: &Buffer) -> String {
        buf.content().iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1000), "1,000");
        assert_eq!(format_count(1234567), "1,234,567");
    }

    #[test]
    fn test_cards_per_row() {
        assert_eq!(CounterCards::cards_per_row(10), 1);
        assert_eq!(CounterCards::cards_per_row(50), 2);
        assert_eq!(CounterCards::cards_per_row(100), 3);
    }

    #[test]
    fn test_height_wraps_rows() {
        assert_eq!(CounterCards::height(2, 100), CARD_HEIGHT + 1);
        assert_eq!(CounterCards::height(2, 20), 2 * (CARD_HEIGHT + 1));
        assert_eq!(CounterCards::height(usize::MAX, 1), u16::MAX);
        assert!(CounterCards::cards_per_row(u16::MAX) > 1);
    }

    #[test]
    fn test_renders_titles_and_values() {
        let counters = vec![
            ("Locations".to_string(), 12),
            ("Publishers".to_string(), 1500),
        ];
        let area = Rect::new(0, 0, 60, CounterCards::height(2, 60));
        let mut buf = Buffer::empty(area);
        CounterCards::new(&counters, Theme::Dark).render(area, &mut buf);

        let content = buffer_text(&buf);
        assert!(content.contains("Locations"));
        assert!(content.contains("Publishers"));
        assert!(content.contains("12"));
        assert!(content.contains("1,500"));
    }
}
