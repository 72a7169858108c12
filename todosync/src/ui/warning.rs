//! Configuration warning shown instead of the list when no user is set.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use super::theme;
use crate::session::SessionError;

/// Renders the warning for a session that could not start.
pub fn draw(frame: &mut Frame, error: &SessionError) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(frame.area());

    let hint = match error {
        SessionError::MissingUser => {
            "Set TODO_USER_ID, pass --user-id, or add `user_id` under [api] in ~/.config/todosync/config.toml."
        }
    };

    let text = vec![
        Line::from(Span::styled(error.to_string(), theme::bold().fg(theme::WARNING))),
        Line::from(""),
        Line::from(Span::styled(hint, theme::normal())),
    ];

    let block = Block::default()
        .title("todosync")
        .borders(Borders::ALL)
        .border_style(theme::normal().fg(theme::WARNING));

    frame.render_widget(
        Paragraph::new(text)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        chunks[0],
    );
    frame.render_widget(
        Paragraph::new(Span::styled("q/Esc: quit", theme::dimmed())).style(theme::status_bar_bg()),
        chunks[1],
    );
}
