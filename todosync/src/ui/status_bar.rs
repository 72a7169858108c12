//! Status bar rendering.

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
};

use super::theme;
use crate::app::{App, Focus};

/// Render the status bar at the bottom of the screen.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let help_text = match app.focus {
        Focus::Input => "Enter: add | Tab: list | ^X: dismiss | Esc: quit",
        Focus::List => {
            "↑↓/jk: move | Space: toggle | Enter/e: edit | d: delete | a: all | c: clear | f/1-3: filter | x/^X: dismiss | Tab: input | q: quit"
        }
        Focus::Editing => "Enter: save | Esc: cancel | Tab: save and leave | ^X: dismiss",
    };

    let pending = app.session.pending_operations() + usize::from(app.session.is_creating());
    let sync_text = if pending == 0 {
        "synced".to_string()
    } else {
        format!("{pending} pending")
    };

    let status_line = Line::from(vec![
        Span::styled("todosync", theme::bold()),
        Span::raw(format!(" | user {} | ", app.session.user_id())),
        Span::raw(sync_text),
        Span::raw(" | "),
        Span::styled(help_text, theme::dimmed()),
    ]);

    let paragraph = Paragraph::new(status_line).style(theme::status_bar_bg());
    frame.render_widget(paragraph, area);
}
