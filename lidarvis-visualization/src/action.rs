//! Keyboard actions, the pending-action mailbox and frame navigation

use lidarvis_core::{Error, Result};
use std::sync::atomic::{AtomicU8, Ordering};

/// The user's last request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Action {
    No = 0,
    Next = 1,
    Back = 2,
    Quit = 3,
    Change = 4,
}

impl Action {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => Action::Next,
            2 => Action::Back,
            3 => Action::Quit,
            4 => Action::Change,
            _ => Action::No,
        }
    }
}

/// What the scans are colored by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Label,
    Range,
    Remission,
}

/// A key as seen by the viewer, independent of the input backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPress {
    Char(char),
    Escape,
    /// Ctrl-C while the terminal is in raw mode
    Interrupt,
}

/// Effect of one key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyCommand {
    pub action: Action,
    pub mode: Option<ViewMode>,
}

/// Map a key to its command; unbound keys give `None`
pub fn map_key(key: KeyPress) -> Option<KeyCommand> {
    let command = |action, mode| Some(KeyCommand { action, mode });
    match key {
        KeyPress::Escape | KeyPress::Interrupt => command(Action::Quit, None),
        KeyPress::Char(c) => match c.to_ascii_uppercase() {
            'N' => command(Action::Next, None),
            'B' => command(Action::Back, None),
            'Q' => command(Action::Quit, None),
            '1' => command(Action::Change, Some(ViewMode::Label)),
            '2' => command(Action::Change, Some(ViewMode::Range)),
            '3' => command(Action::Change, Some(ViewMode::Remission)),
            _ => None,
        },
    }
}

/// Single-slot mailbox holding at most one pending action.
///
/// Posting overwrites whatever is pending, so key presses between two reads
/// are lost except for the last one. Reading clears the slot.
#[derive(Debug, Default)]
pub struct ActionSlot {
    pending: AtomicU8,
}

impl ActionSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn post(&self, action: Action) {
        self.pending.store(action as u8, Ordering::Release);
    }

    /// Return the pending action and reset the slot to `Action::No`
    pub fn take(&self) -> Action {
        Action::from_u8(self.pending.swap(Action::No as u8, Ordering::AcqRel))
    }

    pub fn peek(&self) -> Action {
        Action::from_u8(self.pending.load(Ordering::Acquire))
    }
}

/// What the driving loop should do after an action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Load and show this frame (also used to redraw after a mode change)
    Show(usize),
    /// Keep polling
    Wait,
    Stop,
}

/// Current frame index over a sequence of `len` frames, wrapping at both ends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Navigator {
    index: usize,
    len: usize,
}

impl Navigator {
    pub fn new(start: usize, len: usize) -> Result<Self> {
        if start >= len {
            return Err(Error::InvalidData(format!(
                "start frame {} outside sequence of {} frames",
                start, len
            )));
        }
        Ok(Self { index: start, len })
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn apply(&mut self, action: Action) -> Step {
        match action {
            Action::No => Step::Wait,
            Action::Quit => Step::Stop,
            Action::Change => Step::Show(self.index),
            Action::Next => {
                self.index = (self.index + 1) % self.len;
                Step::Show(self.index)
            }
            Action::Back => {
                self.index = self.index.checked_sub(1).unwrap_or(self.len - 1);
                Step::Show(self.index)
            }
        }
    }
}
