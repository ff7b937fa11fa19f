//! Exercise pane rendering

use crate::ui::observers::PanelView;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Padding, Paragraph, Wrap},
    Frame,
};

/// Data needed to render the exercise pane
pub struct ExerciseRenderData<'a> {
    pub panel: &'a PanelView,
    pub exercise_mode: bool,
    /// Digits typed so far for a numeric answer
    pub answer: &'a str,
}

pub fn render_exercise_pane(frame: &mut Frame, area: Rect, data: ExerciseRenderData) {
    let panel = data.panel;
    let asking = panel.question.is_some();
    let border_style = if asking {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };
    let title = match &panel.owner {
        Some(owner) => format!(" Exercises: {} ", owner),
        None => " Exercises ".to_string(),
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style)
        .padding(Padding::new(1, 0, 0, 0));

    if !data.exercise_mode || !panel.visible {
        let paragraph = Paragraph::new("Exercise mode is off (press e to enable)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    }

    let mut lines = Vec::new();
    match &panel.question {
        Some(question) => {
            lines.push(Line::from(Span::styled(
                question.clone(),
                Style::default()
                    .fg(DEFAULT_THEME.fg)
                    .add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(vec![
                Span::styled("Answer: ", Style::default().fg(DEFAULT_THEME.comment)),
                Span::styled(
                    if data.answer.is_empty() {
                        "y / n / number + ↵".to_string()
                    } else {
                        data.answer.to_string()
                    },
                    Style::default().fg(DEFAULT_THEME.secondary),
                ),
            ]));
        }
        None => lines.push(Line::from(Span::styled(
            if panel.exam_active {
                "Watching..."
            } else {
                "Press space to start the exam"
            },
            Style::default().fg(DEFAULT_THEME.comment),
        ))),
    }

    if let Some((correct, solution)) = &panel.feedback {
        let (text, color) = if *correct {
            (format!("✓ {} is right", solution), DEFAULT_THEME.success)
        } else {
            (format!("✗ {} is wrong, try again", solution), DEFAULT_THEME.error)
        };
        lines.push(Line::from(Span::styled(text, Style::default().fg(color))));
    }

    lines.push(Line::from(Span::styled(
        format!(
            "Credits: {}/{}",
            panel.credits_earned, panel.credits_total
        ),
        Style::default().fg(DEFAULT_THEME.primary),
    )));

    // Most recent results last, as many as fit
    let room = (area.height as usize).saturating_sub(2 + lines.len());
    let skip = panel.log.len().saturating_sub(room);
    for entry in panel.log.iter().skip(skip) {
        lines.push(Line::from(Span::styled(
            entry.clone(),
            Style::default().fg(DEFAULT_THEME.comment),
        )));
    }

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}
