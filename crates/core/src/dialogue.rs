//! Dialogue detection state machine.
//!
//! The state is a counter rather than a flag:
//! - `0` while the dialogue probe matches,
//! - `1` when idle,
//! - `>1` for the ticks right after a dialogue closes, counting down to `1`.
//!   The target re-locks the cursor during that window, so the lock is
//!   released on every one of those ticks.

use crate::types::{Color, ScaledPoint};

pub const IN_DIALOGUE: u32 = 0;
pub const IDLE: u32 = 1;
pub const DEFAULT_COOLDOWN_TICKS: u32 = 24;

/// Side effects requested by one tracker step.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Intents {
    pub entered: bool,
    pub exited: bool,
    pub press_key: bool,
    pub release_cursor_lock: bool,
}

/// Advance the dialogue counter by one tick.
///
/// The exit tick stores the full `cooldown` and already requests a release;
/// every later tick decays the counter by one until it rests at `IDLE`.
/// That is `cooldown` releases in total, one more than decrementing on the
/// exit tick would give. Keep it: the counter must read `cooldown` right
/// after exit.
pub fn step(state: u32, all_points_match: bool, cooldown: u32) -> (u32, Intents) {
    let mut intents = Intents::default();

    let next = if all_points_match {
        intents.press_key = true;
        intents.entered = state > IN_DIALOGUE;
        IN_DIALOGUE
    } else if state == IN_DIALOGUE {
        intents.exited = true;
        let next = cooldown.max(IDLE);
        intents.release_cursor_lock = next > IDLE;
        next
    } else if state > IDLE {
        intents.release_cursor_lock = true;
        state - 1
    } else {
        state
    };

    (next, intents)
}

/// True only if every probe reads exactly its expected color this tick.
pub fn all_points_match<F>(points: &[ScaledPoint], mut sample: F) -> bool
where
    F: FnMut(i32, i32) -> Color,
{
    points.iter().all(|p| sample(p.x, p.y) == p.color)
}

/// Owns the counter for one session.
#[derive(Debug, Clone)]
pub struct DialogueTracker {
    state: u32,
    cooldown: u32,
}

impl DialogueTracker {
    pub fn new(cooldown: u32) -> Self {
        Self { state: IDLE, cooldown: cooldown.max(IDLE) }
    }

    pub fn state(&self) -> u32 {
        self.state
    }

    pub fn observe(&mut self, all_points_match: bool) -> Intents {
        let (next, intents) = step(self.state, all_points_match, self.cooldown);
        self.state = next;
        intents
    }

    /// Decay without a fresh sample (used while paused).
    pub fn idle_tick(&mut self) -> Intents {
        if self.state > IDLE {
            self.state -= 1;
            Intents { release_cursor_lock: true, ..Intents::default() }
        } else {
            Intents::default()
        }
    }
}

impl Default for DialogueTracker {
    fn default() -> Self {
        Self::new(DEFAULT_COOLDOWN_TICKS)
    }
}
