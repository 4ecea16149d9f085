//! Keyboard input from the controlling terminal

use crate::action::KeyPress;
use crate::display::KeySource;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal;
use lidarvis_core::Result;
use std::time::Duration;

/// Reads single key presses with the terminal in raw mode.
///
/// Raw mode is left again when the value is dropped.
pub struct TerminalKeys {
    _raw: (),
}

impl TerminalKeys {
    pub fn new() -> Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self { _raw: () })
    }
}

impl Drop for TerminalKeys {
    fn drop(&mut self) {
        if let Err(e) = terminal::disable_raw_mode() {
            log::warn!("Failed to restore terminal: {}", e);
        }
    }
}

impl KeySource for TerminalKeys {
    fn poll_key(&mut self, timeout: Duration) -> Result<Option<KeyPress>> {
        if !event::poll(timeout)? {
            return Ok(None);
        }
        let key = match event::read()? {
            Event::Key(KeyEvent {
                code,
                modifiers,
                kind: KeyEventKind::Press,
                ..
            }) => match code {
                KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                    Some(KeyPress::Interrupt)
                }
                KeyCode::Char(c) => Some(KeyPress::Char(c)),
                KeyCode::Esc => Some(KeyPress::Escape),
                _ => None,
            },
            _ => None,
        };
        Ok(key)
    }
}
