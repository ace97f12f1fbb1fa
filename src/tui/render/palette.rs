use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::tui::app::App;
use crate::tui::palette::EntryKind;

use super::helpers::centered_rect;

const MAX_VISIBLE: usize = 14;
const POPUP_WIDTH: u16 = 44;

/// Render the action palette overlay
pub fn render_palette(frame: &mut Frame, app: &App, area: Rect) {
    let Some(palette) = &app.palette else {
        return;
    };
    let bg = app.theme.background;

    let visible = palette.entries.len().min(MAX_VISIBLE);
    let popup = centered_rect(area, POPUP_WIDTH, visible as u16 + 2);
    frame.render_widget(Clear, popup);

    let mut lines: Vec<Line> = Vec::new();
    let first = palette
        .active
        .saturating_sub(visible.saturating_sub(1))
        .min(palette.entries.len().saturating_sub(visible));
    for (index, entry) in palette
        .entries
        .iter()
        .enumerate()
        .skip(first)
        .take(visible)
    {
        let selected = index == palette.active;
        let row_bg = if selected { app.theme.selection_bg } else { bg };
        let key_style = Style::default().fg(app.theme.highlight).bg(row_bg);
        let label_style = if selected {
            Style::default()
                .fg(app.theme.text_bright)
                .bg(row_bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(app.theme.text).bg(row_bg)
        };
        let more = match entry.kind {
            EntryKind::Nav(_) => " ›",
            EntryKind::Exec(_) => "",
        };
        lines.push(Line::from(vec![
            Span::styled(format!(" {:>2}  ", entry.key), key_style),
            Span::styled(format!("{}{more}", entry.label), label_style),
        ]));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", palette.breadcrumb()))
        .style(Style::default().fg(app.theme.dim).bg(bg));
    frame.render_widget(Paragraph::new(lines).block(block), popup);
}
