use papier_engine::DocumentStore;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
};

use crate::app::{App, Mode};
use crate::editor::Editor;
use crate::preview::preview_lines;

pub fn ui<S: DocumentStore>(f: &mut Frame, app: &mut App<S>) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([Constraint::Min(0), Constraint::Length(2)])
        .split(f.area());

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
        .split(rows[0]);

    draw_document_list(f, app, columns[0]);

    if app.mode == Mode::Edit && app.editor.is_some() {
        if app.show_preview {
            let halves = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
                .split(columns[1]);
            draw_editor(f, app, halves[0]);
            let text = app.editor.as_ref().map_or("", Editor::text);
            draw_preview(f, text, halves[1]);
        } else {
            draw_editor(f, app, columns[1]);
        }
    } else {
        let text = app
            .selected_document()
            .map_or("", |doc| doc.content.as_str());
        draw_preview(f, text, columns[1]);
    }

    draw_footer(f, app, rows[1]);
}

fn draw_document_list<S: DocumentStore>(f: &mut Frame, app: &mut App<S>, area: Rect) {
    let items: Vec<ListItem> = app
        .documents
        .iter()
        .map(|doc| {
            let updated = doc.updated_at.format("%Y-%m-%d %H:%M").to_string();
            ListItem::new(vec![
                Line::from(Span::raw(doc.title.clone())),
                Line::from(Span::styled(
                    updated,
                    Style::default().add_modifier(Modifier::DIM),
                )),
            ])
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("Documents"))
        .highlight_style(Style::default().bg(Color::Yellow).fg(Color::Black));

    f.render_stateful_widget(list, area, &mut app.list_state);
}

fn draw_editor<S: DocumentStore>(f: &mut Frame, app: &mut App<S>, area: Rect) {
    let Some(editor) = app.editor.as_ref() else {
        return;
    };

    let visible = area.height.saturating_sub(2);
    let (line, column) = editor.caret_position();
    let line = u16::try_from(line).unwrap_or(u16::MAX);
    let column = u16::try_from(column).unwrap_or(u16::MAX);

    // Keep the caret on screen
    if line < app.scroll {
        app.scroll = line;
    } else if visible > 0 && line >= app.scroll.saturating_add(visible) {
        app.scroll = line - visible + 1;
    }

    let marker = if editor.is_dirty() { " *" } else { "" };
    let title = format!("{}{}", editor.title(), marker);
    let paragraph = Paragraph::new(editor_lines(editor))
        .block(Block::default().borders(Borders::ALL).title(title))
        .scroll((app.scroll, 0));
    f.render_widget(paragraph, area);

    f.set_cursor_position(cursor_in(area, line.saturating_sub(app.scroll), column));
}

/// Screen position for a caret at `row`/`column` inside a bordered `area`,
/// clamped so it never lands outside the widget
fn cursor_in(area: Rect, row: u16, column: u16) -> (u16, u16) {
    let max_x = area.x + area.width.saturating_sub(2);
    let max_y = area.y + area.height.saturating_sub(2);
    let x = (area.x + 1).saturating_add(column).min(max_x);
    let y = (area.y + 1).saturating_add(row).min(max_y);
    (x.max(area.x), y.max(area.y))
}

/// Editor text split into lines with the selection shown reversed
fn editor_lines(editor: &Editor) -> Vec<Line<'static>> {
    let text = editor.text();
    let selection = editor.selection();
    let selected = Style::default().add_modifier(Modifier::REVERSED);

    let mut lines = Vec::new();
    let mut start = 0;
    for raw in text.split('\n') {
        let end = start + raw.len();
        let sel_start = selection.start.clamp(start, end);
        let sel_end = selection.end.clamp(start, end);

        let mut spans = Vec::with_capacity(3);
        if sel_start > start {
            spans.push(Span::raw(text[start..sel_start].to_string()));
        }
        if sel_end > sel_start {
            spans.push(Span::styled(text[sel_start..sel_end].to_string(), selected));
        }
        if end > sel_end {
            spans.push(Span::raw(text[sel_end..end].to_string()));
        }
        lines.push(Line::from(spans));
        start = end + 1;
    }
    lines
}

fn draw_preview(f: &mut Frame, text: &str, area: Rect) {
    let lines = if text.is_empty() {
        vec![Line::from(Span::styled(
            "Nothing to preview",
            Style::default().add_modifier(Modifier::DIM),
        ))]
    } else {
        preview_lines(text)
    };

    let preview = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Preview"))
        .wrap(Wrap { trim: false });
    f.render_widget(preview, area);
}

fn draw_footer<S: DocumentStore>(f: &mut Frame, app: &App<S>, area: Rect) {
    let help = match &app.mode {
        Mode::List => "q: Quit | ↑/k ↓/j: Move | Enter: Edit | n: New | d: Delete | r: Reload",
        Mode::Edit => {
            "Esc: Save & close | Ctrl+s: Save | Tab: Preview | Alt+b/i: Bold/Italic | Alt+1-6: Heading | Alt+l: List | Alt+k: Link | Alt+c: Code"
        }
        Mode::NewTitle(_) => "Enter: Create | Esc: Cancel",
        Mode::ConfirmDelete(_) => "y: Delete | any other key: Cancel",
    };

    let status = match &app.mode {
        Mode::NewTitle(title) => format!("New document title: {title}_"),
        _ => app.status.clone().unwrap_or_default(),
    };

    let footer = Paragraph::new(vec![
        Line::from(Span::styled(
            status,
            Style::default().fg(Color::Yellow),
        )),
        Line::from(Span::raw(help)),
    ]);
    f.render_widget(footer, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use papier_engine::{MemoryStore, NewDocument};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_editor_lines_mark_selection() {
        let mut store = MemoryStore::new();
        let doc = store
            .create(NewDocument::new("T", "user123").with_content("ab\ncd"))
            .unwrap();
        let mut editor = Editor::open(&doc);
        // select "b\nc"
        editor.move_left(false);
        editor.move_up(true);

        let lines = editor_lines(&editor);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].spans[0].content, "a");
        assert_eq!(lines[0].spans[1].content, "b");
        assert!(lines[0].spans[1].style.add_modifier.contains(Modifier::REVERSED));
        assert_eq!(lines[1].spans[0].content, "c");
        assert!(lines[1].spans[0].style.add_modifier.contains(Modifier::REVERSED));
        assert_eq!(lines[1].spans[1].content, "d");
    }

    #[test]
    fn test_cursor_stays_inside_bordered_area() {
        let area = Rect::new(10, 5, 20, 8);
        assert_eq!(cursor_in(area, 0, 0), (11, 6));
        assert_eq!(cursor_in(area, 3, 4), (15, 9));
        assert_eq!(cursor_in(area, 50, 50), (28, 11));
    }

    #[test]
    fn test_cursor_clamped_in_tiny_area() {
        // Too short for an inner row: the caret pins to the area instead
        // of running below it
        let area = Rect::new(0, 20, 10, 2);
        let (_, y) = cursor_in(area, 4, 0);
        assert!(y >= area.y && y < area.y + area.height);

        let flat = Rect::new(0, 20, 10, 1);
        assert_eq!(cursor_in(flat, 1, 0).1, 20);
    }
}
