//! Title line and new-title input.

use ratatui::{
    Frame,
    layout::{Position, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use super::theme;
use crate::app::{App, Focus};

const PLACEHOLDER: &str = "What needs to be done?";

/// Renders the title and the toggle-all control.
///
/// The control is hidden while the store is empty and shows as active when
/// every record is completed.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let store = app.session.store();
    let mut spans = vec![Span::styled("todos", theme::bold().fg(theme::TITLE))];

    if !store.is_empty() {
        let (mark, style) = if store.all_completed() {
            ("[✓]", theme::normal().fg(theme::SUCCESS))
        } else {
            ("[ ]", theme::dimmed())
        };
        spans.push(Span::raw("  "));
        spans.push(Span::styled(mark, style));
        spans.push(Span::styled(" toggle all (a)", theme::dimmed()));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Renders the new-title input, disabled while a create is in flight.
pub fn render_input(frame: &mut Frame, area: Rect, app: &App) {
    let session = &app.session;
    let is_focused = app.focus == Focus::Input;
    let creating = session.is_creating();

    let text = session.new_title();
    let line = if creating {
        Line::from(Span::styled(text, theme::dimmed()))
    } else if text.is_empty() {
        Line::from(Span::styled(PLACEHOLDER, theme::dimmed()))
    } else {
        Line::from(Span::styled(text, theme::normal()))
    };

    let title = if creating { "New todo (adding…)" } else { "New todo" };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(if is_focused && !creating {
            theme::highlighted()
        } else {
            theme::normal()
        });

    frame.render_widget(Paragraph::new(line).block(block), area);

    if is_focused && !creating {
        let offset = u16::try_from(app.cursor).unwrap_or(u16::MAX);
        frame.set_cursor_position(Position::new(
            area.x.saturating_add(1).saturating_add(offset),
            area.y.saturating_add(1),
        ));
    }
}
