use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::ops::outline_ops::find_item;
use crate::tui::app::{App, EditTarget};
use crate::util::text::truncate_to_width;

/// Render the outline tree with cursor, collapse markers, and inline edit.
pub fn render_tree(frame: &mut Frame, app: &mut App, area: Rect) {
    let bg = app.theme.background;
    let rows = app.tree_rows();
    let height = area.height as usize;

    // Keep the cursor in the window.
    if app.cursor < app.scroll_offset {
        app.scroll_offset = app.cursor;
    } else if app.cursor >= app.scroll_offset + height {
        app.scroll_offset = app.cursor + 1 - height;
    }

    let renaming = app.edit.as_ref().and_then(|e| match &e.target {
        EditTarget::Rename { id } => Some((id.clone(), e.buffer.clone())),
        EditTarget::NewItem { .. } => None,
    });

    let mut lines: Vec<Line> = Vec::new();
    for (index, row) in rows
        .iter()
        .enumerate()
        .skip(app.scroll_offset)
        .take(height)
    {
        let Some(item) = find_item(&app.outline, &row.id) else {
            continue;
        };
        let selected = index == app.cursor;
        let row_bg = if selected { app.theme.selection_bg } else { bg };

        let mut spans: Vec<Span> = Vec::new();
        spans.push(Span::styled(
            "  ".repeat(row.depth),
            Style::default().bg(row_bg),
        ));

        let marker = if !row.has_children {
            "· "
        } else if row.is_collapsed {
            "▸ "
        } else {
            "▾ "
        };
        spans.push(Span::styled(
            marker,
            Style::default().fg(app.theme.dim).bg(row_bg),
        ));

        let status_style = if app.vocab.status(&item.status).is_some_and(|s| s.is_end_state) {
            Style::default().fg(app.theme.green).bg(row_bg)
        } else {
            Style::default().fg(app.theme.cyan).bg(row_bg)
        };
        let status_label = app
            .vocab
            .status(&item.status)
            .map(|s| s.label.clone())
            .unwrap_or_else(|| item.status.clone());
        spans.push(Span::styled(format!("[{status_label}] "), status_style));

        if item.priority {
            spans.push(Span::styled(
                "! ",
                Style::default().fg(app.theme.red).bg(row_bg),
            ));
        }
        if item.on_hold {
            spans.push(Span::styled(
                "~ ",
                Style::default().fg(app.theme.yellow).bg(row_bg),
            ));
        }

        let title_style = if selected {
            Style::default()
                .fg(app.theme.text_bright)
                .bg(row_bg)
                .add_modifier(Modifier::BOLD)
        } else if !item.can_edit {
            Style::default().fg(app.theme.dim).bg(row_bg)
        } else {
            Style::default().fg(app.theme.text).bg(row_bg)
        };
        match &renaming {
            Some((rename_id, buffer)) if *rename_id == row.id => {
                spans.push(Span::styled(
                    format!("{buffer}▌"),
                    Style::default().fg(app.theme.highlight).bg(row_bg),
                ));
            }
            _ => {
                let title = truncate_to_width(&item.title, area.width.saturating_sub(16) as usize);
                spans.push(Span::styled(title, title_style));
            }
        }

        for tag in &item.tags {
            spans.push(Span::styled(
                format!(" #{tag}"),
                Style::default().fg(app.theme.tag_color(tag)).bg(row_bg),
            ));
        }
        if let Some(actor) = &item.assignee {
            spans.push(Span::styled(
                format!(" @{actor}"),
                Style::default().fg(app.theme.blue).bg(row_bg),
            ));
        }

        lines.push(Line::from(spans));

        // A new-item editor renders as a phantom row under its parent.
        if let Some(edit) = &app.edit {
            if let EditTarget::NewItem { parent, .. } = &edit.target {
                if parent.as_deref() == Some(row.id.as_str()) || (parent.is_none() && selected) {
                    lines.push(Line::from(vec![
                        Span::styled("  ".repeat(row.depth + 1), Style::default().bg(bg)),
                        Span::styled(
                            format!("· {}▌", edit.buffer),
                            Style::default().fg(app.theme.highlight).bg(bg),
                        ),
                    ]));
                }
            }
        }
    }

    if rows.is_empty() {
        let hint = match &app.edit {
            Some(edit) => format!("· {}▌", edit.buffer),
            None => "empty outline — o adds an item, Space opens actions".to_string(),
        };
        lines.push(Line::from(Span::styled(
            hint,
            Style::default().fg(app.theme.dim).bg(bg),
        )));
    }

    frame.render_widget(Paragraph::new(lines).style(Style::default().bg(bg)), area);
}
