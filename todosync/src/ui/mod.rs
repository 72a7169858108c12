//! Terminal UI rendering.

pub mod footer;
pub mod header;
pub mod notice;
pub mod status_bar;
pub mod theme;
pub mod todo_list;
pub mod warning;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
};

use crate::app::App;

/// Main draw function for the entire UI.
pub fn draw(frame: &mut Frame, app: &App) {
    let session = &app.session;
    let banner_height = u16::from(session.notification().is_some());
    let footer_height = u16::from(!session.store().is_empty());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),             // Title + toggle-all
            Constraint::Length(3),             // New-title input
            Constraint::Length(banner_height), // Error banner
            Constraint::Min(3),                // List
            Constraint::Length(footer_height), // Footer
            Constraint::Length(1),             // Status bar
        ])
        .split(frame.area());

    header::render(frame, chunks[0], app);
    header::render_input(frame, chunks[1], app);
    notice::render(frame, chunks[2], app);
    todo_list::render(frame, chunks[3], app);
    footer::render(frame, chunks[4], app);
    status_bar::render(frame, chunks[5], app);
}
