use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::tui::app::App;
use crate::tui::picker::{PickerKind, PickerPhase};

use super::helpers::centered_rect;

const MAX_VISIBLE: usize = 12;
const POPUP_WIDTH: u16 = 40;

/// Render whichever picker is open: option list, or the note-entry line.
pub fn render_picker(frame: &mut Frame, app: &App, area: Rect) {
    let Some(picker) = &app.picker else {
        return;
    };
    let bg = app.theme.background;

    if picker.phase == PickerPhase::Note {
        let popup = centered_rect(area, POPUP_WIDTH.max(50), 3);
        frame.render_widget(Clear, popup);
        let status = picker.pending_status.as_deref().unwrap_or("");
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" note for \"{status}\" "))
            .style(Style::default().fg(app.theme.dim).bg(bg));
        let line = Line::from(vec![
            Span::styled(
                picker.note_buffer.clone(),
                Style::default().fg(app.theme.text_bright).bg(bg),
            ),
            Span::styled("▌", Style::default().fg(app.theme.highlight).bg(bg)),
        ]);
        frame.render_widget(Paragraph::new(vec![line]).block(block), popup);
        return;
    }

    let visible = picker.options.len().min(MAX_VISIBLE);
    let popup = centered_rect(area, POPUP_WIDTH, visible as u16 + 2);
    frame.render_widget(Clear, popup);

    let first = picker
        .active
        .saturating_sub(visible.saturating_sub(1))
        .min(picker.options.len().saturating_sub(visible));
    let mut lines: Vec<Line> = Vec::new();
    for (index, option) in picker.options.iter().enumerate().skip(first).take(visible) {
        let selected = index == picker.active;
        let row_bg = if selected { app.theme.selection_bg } else { bg };
        let mut spans: Vec<Span> = Vec::new();

        if picker.kind == PickerKind::Tags {
            let mark = if picker.selection.contains(&option.id) {
                "[x] "
            } else {
                "[ ] "
            };
            spans.push(Span::styled(
                mark,
                Style::default().fg(app.theme.green).bg(row_bg),
            ));
        }

        let label_style = if selected {
            Style::default()
                .fg(app.theme.text_bright)
                .bg(row_bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(app.theme.text).bg(row_bg)
        };
        spans.push(Span::styled(option.label.clone(), label_style));

        if option.is_end_state {
            spans.push(Span::styled(
                " ✓",
                Style::default().fg(app.theme.green).bg(row_bg),
            ));
        }
        if option.requires_note {
            spans.push(Span::styled(
                " requires note",
                Style::default().fg(app.theme.yellow).bg(row_bg),
            ));
        }
        lines.push(Line::from(spans));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", picker.kind.title()))
        .style(Style::default().fg(app.theme.dim).bg(bg));
    frame.render_widget(Paragraph::new(lines).block(block), popup);
}
