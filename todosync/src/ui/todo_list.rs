//! The todo list.

use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
};
use todosync_proto::todo::Todo;

use super::theme;
use crate::app::{App, Focus};

/// Marker shown while a record's request is in flight.
pub const LOADING_MARKER: &str = "\u{22ef}";

/// Renders the visible records followed by the pending-create placeholder.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let session = &app.session;
    let is_focused = matches!(app.focus, Focus::List | Focus::Editing);

    let mut items: Vec<ListItem> = session
        .visible()
        .into_iter()
        .map(|todo| ListItem::new(row(app, todo)))
        .collect();

    if let Some(placeholder) = session.pending_create() {
        items.push(ListItem::new(Line::from(vec![
            Span::styled("[ ] ", theme::dimmed()),
            Span::styled(placeholder.title.as_str(), theme::dimmed()),
            Span::raw(" "),
            Span::styled(LOADING_MARKER, theme::loading()),
        ])));
    }

    let block = Block::default()
        .title(format!("Todos ({})", session.filter().label()))
        .borders(Borders::ALL)
        .border_style(if is_focused {
            theme::highlighted()
        } else {
            theme::normal()
        });

    let list = List::new(items)
        .block(block)
        .highlight_style(if app.focus == Focus::List {
            theme::selected()
        } else {
            Style::default()
        });

    let mut state = ListState::default();
    if is_focused {
        state.select(Some(app.selected));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

fn row<'a>(app: &'a App, todo: &'a Todo) -> Line<'a> {
    let session = &app.session;
    let checkbox = if todo.completed { "[✓] " } else { "[ ] " };
    let checkbox_style = if todo.completed {
        theme::normal().fg(theme::SUCCESS)
    } else {
        theme::normal()
    };

    let editing = session.edit().filter(|e| e.id == todo.id);
    let title = match editing {
        Some(edit) => Span::styled(edit.draft.as_str(), theme::editing()),
        None if session.tracker().is_deleting(todo.id) => {
            Span::styled(todo.title.as_str(), theme::deleting())
        }
        None if todo.completed => Span::styled(todo.title.as_str(), theme::completed()),
        None => Span::styled(todo.title.as_str(), theme::normal()),
    };

    let mut spans = vec![Span::styled(checkbox, checkbox_style), title];
    if session.is_busy(todo.id) {
        spans.push(Span::raw(" "));
        spans.push(Span::styled(LOADING_MARKER, theme::loading()));
    }
    Line::from(spans)
}
