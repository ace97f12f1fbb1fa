use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::ops::outline_ops::find_item;
use crate::tui::app::{App, EditTarget, View};

/// Render one item's fields.
pub fn render_detail(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let View::Detail { item_id } = &app.view else {
        return;
    };
    let Some(item) = find_item(&app.outline, item_id) else {
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                "this item no longer exists",
                Style::default().fg(app.theme.dim).bg(bg),
            ))),
            area,
        );
        return;
    };

    let label = |text: &str| {
        Span::styled(
            format!("{text:>10}  "),
            Style::default().fg(app.theme.dim).bg(bg),
        )
    };
    let value = |text: String| Span::styled(text, Style::default().fg(app.theme.text).bg(bg));

    let title_span = match &app.edit {
        Some(edit) if matches!(&edit.target, EditTarget::Rename { id } if id == item_id) => {
            Span::styled(
                format!("{}▌", edit.buffer),
                Style::default().fg(app.theme.highlight).bg(bg),
            )
        }
        _ => Span::styled(
            item.title.clone(),
            Style::default()
                .fg(app.theme.text_bright)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ),
    };

    let status_label = app
        .vocab
        .status(&item.status)
        .map(|s| s.label.clone())
        .unwrap_or_else(|| item.status.clone());
    let mut lines = vec![
        Line::from(vec![label("title"), title_span]),
        Line::from(vec![label("status"), value(status_label)]),
        Line::from(vec![
            label("flags"),
            value(format!(
                "{}{}",
                if item.priority { "priority " } else { "" },
                if item.on_hold { "on-hold" } else { "" }
            )),
        ]),
        Line::from(vec![
            label("tags"),
            value(if item.tags.is_empty() {
                "—".to_string()
            } else {
                item.tags
                    .iter()
                    .map(|t| format!("#{t}"))
                    .collect::<Vec<_>>()
                    .join(" ")
            }),
        ]),
        Line::from(vec![
            label("assignee"),
            value(item.assignee.clone().unwrap_or_else(|| "—".to_string())),
        ]),
        Line::from(vec![
            label("due"),
            value(
                item.due
                    .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
                    .unwrap_or_else(|| "—".to_string()),
            ),
        ]),
        Line::from(vec![
            label("scheduled"),
            value(
                item.scheduled
                    .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
                    .unwrap_or_else(|| "—".to_string()),
            ),
        ]),
        Line::from(vec![
            label("children"),
            value(item.children.len().to_string()),
        ]),
    ];
    if !item.can_edit {
        lines.push(Line::from(Span::styled(
            "read-only",
            Style::default().fg(app.theme.yellow).bg(bg),
        )));
    }

    frame.render_widget(Paragraph::new(lines).style(Style::default().bg(bg)), area);
}
