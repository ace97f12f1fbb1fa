use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::{App, View};

/// Render the status row (bottom of screen): outline name, view, filter,
/// in-flight request count, and any transient message.
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;

    let mut spans: Vec<Span> = Vec::new();

    if let Some(message) = &app.status_message {
        let style = if message.is_error {
            Style::default().fg(app.theme.red).bg(bg)
        } else {
            Style::default().fg(app.theme.green).bg(bg)
        };
        spans.push(Span::styled(message.text.clone(), style));
    } else if app.filter_entry {
        spans.push(Span::styled(
            format!("/{}", app.session.filter),
            Style::default().fg(app.theme.text_bright).bg(bg),
        ));
        spans.push(Span::styled(
            "▌",
            Style::default().fg(app.theme.highlight).bg(bg),
        ));
    } else {
        let view = match &app.view {
            View::Tree => "tree",
            View::Agenda => "agenda",
            View::Detail { .. } => "detail",
        };
        spans.push(Span::styled(
            format!("{} · {view}", app.outline.title),
            Style::default().fg(app.theme.dim).bg(bg),
        ));
        if !app.session.filter.is_empty() {
            spans.push(Span::styled(
                format!("  /{}", app.session.filter),
                Style::default().fg(app.theme.cyan).bg(bg),
            ));
        }
    }

    // Right-aligned sync indicator.
    let backlog = app.coordinator.backlog(&app.outline.id);
    let hint = if backlog > 0 {
        format!("syncing {backlog}…")
    } else {
        String::new()
    };
    let used: usize = spans.iter().map(|s| s.content.chars().count()).sum();
    let hint_width = hint.chars().count();
    if used + hint_width < width {
        spans.push(Span::styled(
            " ".repeat(width - used - hint_width),
            Style::default().bg(bg),
        ));
        spans.push(Span::styled(
            hint,
            Style::default().fg(app.theme.yellow).bg(bg),
        ));
    }

    frame.render_widget(
        Paragraph::new(Line::from(spans)).style(Style::default().bg(bg)),
        area,
    );
}
