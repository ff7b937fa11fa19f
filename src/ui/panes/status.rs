//! Status bar rendering with keybindings and state indicators

use crate::ui::observers::RunState;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Data needed to render the status bar
pub struct StatusRenderData<'a> {
    pub message: &'a str,
    pub step_name: &'a str,
    pub on_breakpoint: bool,
    pub history_len: usize,
    pub speed: f32,
    pub run_state: RunState,
    pub exercise_mode: bool,
}

/// Render the status bar at the bottom.
pub fn render_status_bar(frame: &mut Frame, area: Rect, data: StatusRenderData) {
    let layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(area);

    // Left side: step info and status
    let step_bg = if data.on_breakpoint {
        DEFAULT_THEME.breakpoint
    } else {
        DEFAULT_THEME.primary
    };
    let left_spans = vec![
        Span::styled(
            format!(" {} ", data.step_name),
            Style::default()
                .bg(step_bg)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" ×{:.2} │ history {} ", data.speed, data.history_len),
            Style::default()
                .bg(DEFAULT_THEME.current_line_bg)
                .fg(DEFAULT_THEME.comment),
        ),
        Span::styled(
            format!(" {} ", data.message),
            Style::default()
                .bg(DEFAULT_THEME.current_line_bg)
                .fg(DEFAULT_THEME.fg),
        ),
    ];
    let left_paragraph = Paragraph::new(Line::from(left_spans))
        .style(Style::default().bg(DEFAULT_THEME.current_line_bg))
        .alignment(Alignment::Left);
    frame.render_widget(left_paragraph, layout[0]);

    // Right side: keybinds with visual grouping
    let key_style = Style::default().bg(DEFAULT_THEME.comment).fg(Color::Black);
    let desc_style = Style::default()
        .bg(DEFAULT_THEME.current_line_bg)
        .fg(DEFAULT_THEME.fg);
    let sep_style = Style::default()
        .bg(DEFAULT_THEME.current_line_bg)
        .fg(DEFAULT_THEME.comment);

    let bindings: &[(&str, &str)] = if data.exercise_mode {
        &[
            (" ⎵ ", " start "),
            (" y/n ", " answer "),
            (" g ", " give up "),
            (" s ", " stop "),
            (" e ", " exercises "),
        ]
    } else {
        &[
            (" ⎵ ", " play "),
            (" p ", " pause "),
            (" ←/→ ", " step "),
            (" b ", " break "),
            (" +/- ", " speed "),
            (" s ", " stop "),
            (" e ", " exercises "),
        ]
    };
    let mut right_spans = Vec::new();
    for (key, desc) in bindings {
        right_spans.push(Span::styled(*key, key_style));
        right_spans.push(Span::styled(*desc, desc_style));
        right_spans.push(Span::styled("│", sep_style));
    }
    right_spans.push(Span::styled("q", key_style));
    right_spans.push(Span::styled(" quit ", desc_style));

    let (label, color) = match data.run_state {
        RunState::Running => (" ▶ RUNNING ", DEFAULT_THEME.secondary),
        RunState::Paused => (" ⏸ PAUSED ", DEFAULT_THEME.primary),
        RunState::Stopped => (" ■ STOPPED ", DEFAULT_THEME.error),
    };
    right_spans.push(Span::styled("│", sep_style));
    right_spans.push(Span::styled(
        label,
        Style::default()
            .bg(color)
            .fg(Color::Black)
            .add_modifier(Modifier::BOLD),
    ));

    let right_paragraph = Paragraph::new(Line::from(right_spans))
        .style(Style::default().bg(DEFAULT_THEME.current_line_bg))
        .alignment(Alignment::Right);
    frame.render_widget(right_paragraph, layout[1]);
}
