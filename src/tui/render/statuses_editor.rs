use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::tui::app::App;

use super::helpers::centered_rect;

/// Render the outline statuses editor.
pub fn render_statuses_editor(frame: &mut Frame, app: &App, area: Rect) {
    let Some(editor) = &app.statuses_editor else {
        return;
    };
    let bg = app.theme.background;
    let popup = centered_rect(area, 52, editor.options.len() as u16 + 3);
    frame.render_widget(Clear, popup);

    let mut lines: Vec<Line> = Vec::new();
    for (index, option) in editor.options.iter().enumerate() {
        let selected = index == editor.active;
        let row_bg = if selected { app.theme.selection_bg } else { bg };
        let label_style = if selected {
            Style::default()
                .fg(app.theme.text_bright)
                .bg(row_bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(app.theme.text).bg(row_bg)
        };

        let label = match (&editor.renaming, selected) {
            (Some((buffer, _)), true) => format!("{buffer}▌"),
            _ => option.label.clone(),
        };
        let mut spans = vec![Span::styled(format!(" {label:<20}"), label_style)];
        if option.is_end_state {
            spans.push(Span::styled(
                " end-state",
                Style::default().fg(app.theme.green).bg(row_bg),
            ));
        }
        if option.requires_note {
            spans.push(Span::styled(
                " requires-note",
                Style::default().fg(app.theme.yellow).bg(row_bg),
            ));
        }
        lines.push(Line::from(spans));
    }
    lines.push(Line::from(Span::styled(
        " e rename  d end-state  n note  J/K reorder  Enter save",
        Style::default().fg(app.theme.dim).bg(bg),
    )));

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" statuses ")
        .style(Style::default().fg(app.theme.dim).bg(bg));
    frame.render_widget(Paragraph::new(lines).block(block), popup);
}
