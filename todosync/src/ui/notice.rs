//! Error banner.

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
};

use super::theme;
use crate::app::App;

/// Renders the current notification, if any.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let Some(message) = app.session.notification() else {
        return;
    };

    let line = Line::from(vec![
        Span::raw(" "),
        Span::raw(message),
        Span::raw("  "),
        Span::raw("(Ctrl+X to dismiss)"),
    ]);
    frame.render_widget(Paragraph::new(line).style(theme::error_banner()), area);
}
