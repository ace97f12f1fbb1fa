use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::tui::app::App;

use super::helpers::centered_rect;

/// Render the free-text prompt (capture, dates, outline rename).
pub fn render_prompt(frame: &mut Frame, app: &App, area: Rect) {
    let Some(prompt) = &app.prompt else {
        return;
    };
    let bg = app.theme.background;
    let popup = centered_rect(area, 56, 3);
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", prompt.title()))
        .style(Style::default().fg(app.theme.dim).bg(bg));
    let line = Line::from(vec![
        Span::styled(
            prompt.buffer.clone(),
            Style::default().fg(app.theme.text_bright).bg(bg),
        ),
        Span::styled("▌", Style::default().fg(app.theme.highlight).bg(bg)),
    ]);
    frame.render_widget(Paragraph::new(vec![line]).block(block), popup);
}
