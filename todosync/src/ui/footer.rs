//! Footer: remaining count, filters, clear-completed.

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
};

use super::theme;
use crate::app::App;
use crate::filter::StatusFilter;

/// Renders the footer. Nothing is drawn while the store is empty.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let session = &app.session;
    let store = session.store();
    if store.is_empty() {
        return;
    }

    let mut spans = vec![Span::styled(items_left(store.active_count()), theme::normal())];
    spans.push(Span::raw("   "));

    for (index, filter) in StatusFilter::ALL.into_iter().enumerate() {
        if index > 0 {
            spans.push(Span::raw(" "));
        }
        let style = if filter == session.filter() {
            theme::highlighted()
        } else {
            theme::dimmed()
        };
        spans.push(Span::styled(format!("{}:{}", index + 1, filter.label()), style));
    }

    spans.push(Span::raw("   "));
    spans.push(Span::styled(
        "Clear completed (c)",
        if store.any_completed() {
            theme::normal()
        } else {
            theme::dimmed()
        },
    ));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// "N items left", singular for one.
#[must_use]
pub fn items_left(count: usize) -> String {
    if count == 1 {
        "1 item left".to_string()
    } else {
        format!("{count} items left")
    }
}
