use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::model::DateField;
use crate::tui::app::App;
use crate::util::text::truncate_to_width;

/// Render the agenda: one row per dated entry, time-ordered.
pub fn render_agenda(frame: &mut Frame, app: &mut App, area: Rect) {
    let bg = app.theme.background;
    let entries = app.agenda_rows();
    let height = area.height as usize;

    if app.cursor < app.scroll_offset {
        app.scroll_offset = app.cursor;
    } else if app.cursor >= app.scroll_offset + height {
        app.scroll_offset = app.cursor + 1 - height;
    }

    let mut lines: Vec<Line> = Vec::new();
    for (index, entry) in entries
        .iter()
        .enumerate()
        .skip(app.scroll_offset)
        .take(height)
    {
        let selected = index == app.cursor;
        let row_bg = if selected { app.theme.selection_bg } else { bg };

        let field = match entry.field {
            DateField::Due => Span::styled("due   ", Style::default().fg(app.theme.red).bg(row_bg)),
            DateField::Scheduled => Span::styled(
                "sched ",
                Style::default().fg(app.theme.yellow).bg(row_bg),
            ),
        };
        let title_style = if selected {
            Style::default()
                .fg(app.theme.text_bright)
                .bg(row_bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(app.theme.text).bg(row_bg)
        };

        lines.push(Line::from(vec![
            Span::styled(
                entry.when.format("%Y-%m-%d %H:%M  ").to_string(),
                Style::default().fg(app.theme.cyan).bg(row_bg),
            ),
            field,
            Span::styled(
                truncate_to_width(&entry.title, area.width.saturating_sub(26) as usize),
                title_style,
            ),
        ]));
    }

    if entries.is_empty() {
        let span = app
            .session
            .agenda_span
            .unwrap_or(crate::ops::agenda::AgendaSpan::Week);
        lines.push(Line::from(Span::styled(
            format!("nothing scheduled ({})", span.label()),
            Style::default().fg(app.theme.dim).bg(bg),
        )));
    }

    frame.render_widget(Paragraph::new(lines).style(Style::default().bg(bg)), area);
}
