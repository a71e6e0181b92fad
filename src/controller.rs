use std::time::Duration;
use tracing::trace;

use crate::domain::{Message, RosterError, ViewConfig};
use crate::model::Model;
use ratatui::crossterm::event::{self, Event, KeyCode, KeyEvent, MouseButton, MouseEventKind};

pub struct Controller {
    event_poll_time: u64,
}

impl Controller {
    pub fn new(cfg: &ViewConfig) -> Self {
        Self {
            event_poll_time: cfg.event_poll_time,
        }
    }

    pub fn handle_event(&self, model: &Model) -> Result<Option<Message>, RosterError> {
        if event::poll(Duration::from_millis(self.event_poll_time))? {
            return Ok(self.map_event(event::read()?, model.raw_keyevents()));
        }
        Ok(None)
    }

    fn map_event(&self, event: Event, raw_keys: bool) -> Option<Message> {
        match event {
            // Crossterm also emits key release and repeat events on Windows.
            Event::Key(key) if key.kind == event::KeyEventKind::Press => {
                if raw_keys {
                    Some(Message::RawKey(key))
                } else {
                    self.handle_key(key)
                }
            }
            Event::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => {
                Some(Message::PointerDown(mouse.column, mouse.row))
            }
            Event::Resize(width, height) => Some(Message::Resize(width as usize, height as usize)),
            _ => None,
        }
    }

    fn handle_key(&self, key: KeyEvent) -> Option<Message> {
        let message = match key.code {
            KeyCode::Char('q') => Some(Message::Quit),
            KeyCode::Char('?') => Some(Message::Help),
            KeyCode::Up | KeyCode::Char('k') => Some(Message::MoveUp),
            KeyCode::Down | KeyCode::Char('j') => Some(Message::MoveDown),
            KeyCode::Left | KeyCode::Char('h') => Some(Message::MoveLeft),
            KeyCode::Right | KeyCode::Char('l') => Some(Message::MoveRight),
            KeyCode::PageDown | KeyCode::Char('n') => Some(Message::NextPage),
            KeyCode::PageUp | KeyCode::Char('p') => Some(Message::PrevPage),
            KeyCode::Char('+') => Some(Message::LargerPageSize),
            KeyCode::Char('-') => Some(Message::SmallerPageSize),
            KeyCode::Char('/') => Some(Message::Search),
            KeyCode::Char('s') => Some(Message::SortAscending),
            KeyCode::Char('S') => Some(Message::SortDescending),
            KeyCode::Char('c') => Some(Message::ToggleColumnChooser),
            KeyCode::Char(' ') => Some(Message::ToggleColumn),
            KeyCode::Char('a') => Some(Message::SelectAll),
            KeyCode::Char('o') => Some(Message::SelectNone),
            KeyCode::Char('e') => Some(Message::Export),
            KeyCode::Char('y') => Some(Message::CopyRow),
            KeyCode::Enter => Some(Message::Enter),
            KeyCode::Esc => Some(Message::Exit),
            _ => None,
        };
        trace!("Mapped: {key:?} => {message:?}");
        message
    }
}
