//! Array pane rendering

use crate::demo::SortSnapshot;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Padding, Paragraph},
    Frame,
};

/// Render the array as horizontal bars, one row per element
pub fn render_array_pane(frame: &mut Frame, area: Rect, snapshot: &SortSnapshot, skipping: bool) {
    let title = if skipping {
        " Array (skipping) "
    } else {
        " Array "
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(DEFAULT_THEME.border_normal));

    if snapshot.values.is_empty() {
        let paragraph = Paragraph::new("(nothing to sort)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    }

    let block = block.padding(Padding::new(1, 0, 0, 0));
    let max = snapshot
        .values
        .iter()
        .map(|v| v.unsigned_abs())
        .max()
        .unwrap_or(1)
        .max(1);
    // Borders, padding and the index/value columns
    let bar_room = area.width.saturating_sub(18).max(1) as u64;

    let items: Vec<ListItem> = snapshot
        .values
        .iter()
        .enumerate()
        .map(|(index, value)| {
            let highlighted = snapshot
                .highlight
                .is_some_and(|(a, b)| index == a || index == b);
            let color = if highlighted {
                DEFAULT_THEME.secondary
            } else if index >= snapshot.sorted_from {
                DEFAULT_THEME.success
            } else {
                DEFAULT_THEME.primary
            };
            let width = (value.unsigned_abs() * bar_room / max).max(1) as usize;

            let mut value_style = Style::default().fg(DEFAULT_THEME.fg);
            if highlighted {
                value_style = value_style.add_modifier(Modifier::BOLD);
            }
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{:>3} ", index),
                    Style::default().fg(DEFAULT_THEME.comment),
                ),
                Span::styled("█".repeat(width), Style::default().fg(color)),
                Span::styled(format!(" {}", value), value_style),
            ]))
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}
