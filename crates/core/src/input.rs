//! Keyboard message parameters for posted WM_KEYDOWN / WM_KEYUP.

use crate::keys::{Key, KeyError};

/// Which edge of a key press is being sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyDirection {
    Down,
    Up,
}

/// Message kind handed to the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyMessage {
    KeyDown,
    KeyUp,
}

impl KeyMessage {
    /// Window message id.
    pub fn id(self) -> u32 {
        match self {
            KeyMessage::KeyDown => 0x0100,
            KeyMessage::KeyUp => 0x0101,
        }
    }
}

impl From<KeyDirection> for KeyMessage {
    fn from(d: KeyDirection) -> Self {
        match d {
            KeyDirection::Down => KeyMessage::KeyDown,
            KeyDirection::Up => KeyMessage::KeyUp,
        }
    }
}

/// Fields of the keystroke `lParam`.
///
/// A key-up must report the key as previously held and in transition,
/// otherwise the target drops the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEventParams {
    pub repeat_count: u16,
    pub scan_code: u8,
    pub extended_key: bool,
    pub previous_state: bool,
    pub transition_state: bool,
}

impl KeyEventParams {
    pub fn for_key(key: Key, direction: KeyDirection) -> Self {
        let released = direction == KeyDirection::Up;
        Self {
            repeat_count: 1,
            scan_code: key.scan,
            extended_key: false,
            previous_state: released,
            transition_state: released,
        }
    }

    /// Bits 0-15 repeat count, 16-23 scan code, 24 extended,
    /// 30 previous state, 31 transition state.
    pub fn pack(&self) -> u32 {
        let mut lparam = self.repeat_count as u32;
        lparam |= (self.scan_code as u32) << 16;
        if self.extended_key {
            lparam |= 1 << 24;
        }
        if self.previous_state {
            lparam |= 1 << 30;
        }
        if self.transition_state {
            lparam |= 1 << 31;
        }
        lparam
    }
}

/// Build the parameters for pressing or releasing the named key.
pub fn build_key_event_params(key: &str, direction: KeyDirection) -> Result<KeyEventParams, KeyError> {
    Ok(KeyEventParams::for_key(Key::lookup(key)?, direction))
}
