//! Application state and key handling.
//!
//! [`App`] wraps a [`TodoSession`] with the terminal-only state: focus,
//! cursor, and list selection. Key handlers return the [`SyncRequest`]s the
//! main loop must dispatch.

use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use todosync_proto::todo::TodoId;

use crate::filter::StatusFilter;
use crate::session::TodoSession;
use crate::sync::{SyncOutcome, SyncRequest};

/// Which part of the screen receives keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    /// The new-title input line (default).
    Input,
    /// The todo list.
    List,
    /// In-place title edit of the selected record.
    Editing,
}

/// Main application state.
pub struct App {
    /// The sync session behind the screen.
    pub session: TodoSession,
    /// Which part of the screen is focused.
    pub focus: Focus,
    /// Cursor position (character index) in the focused text field.
    pub cursor: usize,
    /// Index of the selected row among the visible records.
    pub selected: usize,
    /// Whether the app should quit.
    pub should_quit: bool,
}

impl App {
    /// Creates the app around a session.
    #[must_use]
    pub const fn new(session: TodoSession) -> Self {
        Self {
            session,
            focus: Focus::Input,
            cursor: 0,
            selected: 0,
            should_quit: false,
        }
    }

    /// Handles a key event, returning the requests to dispatch.
    pub fn handle_key_event(&mut self, key: KeyEvent, now: Instant) -> Vec<SyncRequest> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return Vec::new();
        }
        // Dismissal must not reach the text fields as a typed character.
        if key.code == KeyCode::Char('x') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.session.dismiss_notification();
            return Vec::new();
        }

        let requests = match self.focus {
            Focus::Input => self.handle_input_key(key, now),
            Focus::List => self.handle_list_key(key),
            Focus::Editing => self.handle_edit_key(key),
        };
        self.clamp_selection();
        requests
    }

    /// Applies a settled remote call.
    pub fn apply_outcome(&mut self, outcome: SyncOutcome, now: Instant) {
        let created = matches!(outcome, SyncOutcome::Created(_));
        self.session.apply(outcome, now);

        if created && self.focus != Focus::Editing {
            self.focus = Focus::Input;
            self.cursor = self.session.new_title().chars().count();
        }
        if self.focus == Focus::Editing && self.session.edit().is_none() {
            self.focus = Focus::List;
        }
        self.clamp_selection();
    }

    /// Expires the notification if due.
    pub fn tick(&mut self, now: Instant) {
        self.session.tick(now);
    }

    /// Id of the selected visible record.
    #[must_use]
    pub fn selected_id(&self) -> Option<TodoId> {
        self.session.visible().get(self.selected).map(|t| t.id)
    }

    fn handle_input_key(&mut self, key: KeyEvent, now: Instant) -> Vec<SyncRequest> {
        match key.code {
            KeyCode::Enter => {
                return self.session.submit_new(now).into_iter().collect();
            }
            KeyCode::Tab | KeyCode::Down => self.focus = Focus::List,
            KeyCode::Esc => self.should_quit = true,
            _ => {
                let cursor = &mut self.cursor;
                if let Some(text) = self.session.new_title_mut() {
                    edit_text(text, cursor, key.code);
                }
            }
        }
        Vec::new()
    }

    fn handle_list_key(&mut self, key: KeyEvent) -> Vec<SyncRequest> {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.selected = self.selected.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => self.selected += 1,
            KeyCode::Char(' ') => {
                return self.on_selected(TodoSession::toggle);
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                return self.on_selected(TodoSession::delete);
            }
            KeyCode::Enter | KeyCode::Char('e') => {
                if let Some(id) = self.selected_id() {
                    let committed = self.session.begin_edit(id);
                    if let Some(edit) = self.session.edit() {
                        self.cursor = edit.draft.chars().count();
                        self.focus = Focus::Editing;
                    }
                    return committed.into_iter().collect();
                }
            }
            KeyCode::Char('a') => return self.session.toggle_all(),
            KeyCode::Char('c') => return self.session.clear_completed(),
            KeyCode::Char('f') => self.session.set_filter(self.session.filter().next()),
            KeyCode::Char('1') => self.session.set_filter(StatusFilter::All),
            KeyCode::Char('2') => self.session.set_filter(StatusFilter::Active),
            KeyCode::Char('3') => self.session.set_filter(StatusFilter::Completed),
            KeyCode::Char('x') => self.session.dismiss_notification(),
            KeyCode::Tab | KeyCode::Char('n') => self.focus_input(),
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            _ => {}
        }
        Vec::new()
    }

    fn handle_edit_key(&mut self, key: KeyEvent) -> Vec<SyncRequest> {
        match key.code {
            KeyCode::Enter => {
                self.focus = Focus::List;
                self.session.commit_edit().into_iter().collect()
            }
            KeyCode::Esc => {
                self.focus = Focus::List;
                self.session.cancel_edit();
                Vec::new()
            }
            // Leaving the field confirms the edit.
            KeyCode::Tab => {
                self.focus_input();
                self.session.commit_edit().into_iter().collect()
            }
            KeyCode::Up | KeyCode::Down => {
                self.focus = Focus::List;
                if key.code == KeyCode::Up {
                    self.selected = self.selected.saturating_sub(1);
                } else {
                    self.selected += 1;
                }
                self.session.commit_edit().into_iter().collect()
            }
            code => {
                let cursor = &mut self.cursor;
                if let Some(draft) = self.session.edit_draft_mut() {
                    edit_text(draft, cursor, code);
                }
                Vec::new()
            }
        }
    }

    fn on_selected(
        &mut self,
        action: fn(&mut TodoSession, TodoId) -> Option<SyncRequest>,
    ) -> Vec<SyncRequest> {
        self.selected_id()
            .and_then(|id| action(&mut self.session, id))
            .into_iter()
            .collect()
    }

    fn focus_input(&mut self) {
        self.focus = Focus::Input;
        self.cursor = self.session.new_title().chars().count();
    }

    fn clamp_selection(&mut self) {
        let len = self.session.visible().len();
        self.selected = self.selected.min(len.saturating_sub(1));
    }
}

/// Applies a line-editing key to `text`; `cursor` is a character index.
fn edit_text(text: &mut String, cursor: &mut usize, code: KeyCode) {
    let len = text.chars().count();
    *cursor = (*cursor).min(len);
    match code {
        KeyCode::Char(c) => {
            text.insert(byte_index(text, *cursor), c);
            *cursor += 1;
        }
        KeyCode::Backspace if *cursor > 0 => {
            text.remove(byte_index(text, *cursor - 1));
            *cursor -= 1;
        }
        KeyCode::Delete if *cursor < len => {
            text.remove(byte_index(text, *cursor));
        }
        KeyCode::Left => *cursor = cursor.saturating_sub(1),
        KeyCode::Right if *cursor < len => *cursor += 1,
        KeyCode::Home => *cursor = 0,
        KeyCode::End => *cursor = len,
        _ => {}
    }
}

fn byte_index(text: &str, char_index: usize) -> usize {
    text.char_indices()
        .nth(char_index)
        .map_or(text.len(), |(i, _)| i)
}
