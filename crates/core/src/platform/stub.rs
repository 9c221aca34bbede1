use std::cell::Cell;

use anyhow::Result;

use crate::input::{KeyEventParams, KeyMessage};
use crate::keys::Key;
use crate::types::*;
use crate::logger;
use super::{Platform, WindowHandle};

const STUB_PID: ProcessId = 4242;
const STUB_WINDOW: WindowId = 0x10001;

/// Fake target for dry runs: the process appears after a few polls, the
/// window is 1600x900 and never shows a dialogue.
pub struct StubPlatform {
    polls_until_found: Cell<u32>,
}

impl Default for StubPlatform {
    fn default() -> Self {
        Self { polls_until_found: Cell::new(3) }
    }
}

impl Platform for StubPlatform {
    fn find_process(&self, names: &[String]) -> Option<ProcessId> {
        let left = self.polls_until_found.get();
        if left > 0 {
            self.polls_until_found.set(left - 1);
            return None;
        }
        logger::info_p("stub", &format!("find_process({:?}) -> {}", names, STUB_PID));
        Some(STUB_PID)
    }

    fn find_window(&self, pid: ProcessId) -> Option<(WindowId, WindowSize)> {
        logger::info_p("stub", &format!("find_window({})", pid));
        Some((STUB_WINDOW, WindowSize { width: 1600, height: 900 }))
    }

    fn open_window(&self, id: WindowId, size: WindowSize) -> Result<Box<dyn WindowHandle>> {
        logger::info_p("stub", &format!("open_window({:#x}, {}x{})", id, size.width, size.height));
        Ok(Box::new(StubWindow { id, size }))
    }

    fn keys_held(&self, _keys: &[Key]) -> bool {
        false
    }

    fn release_cursor_clip(&self) -> bool {
        logger::info_p("stub", "release_cursor_clip()");
        true
    }
}

struct StubWindow {
    id: WindowId,
    size: WindowSize,
}

impl WindowHandle for StubWindow {
    fn id(&self) -> WindowId { self.id }
    fn size(&self) -> WindowSize { self.size }

    fn sample(&mut self, _x: i32, _y: i32) -> Color {
        Color::rgb(0, 0, 0)
    }

    fn activate(&mut self) {
        logger::info_p("stub", &format!("win({:#x}).activate()", self.id));
    }

    fn post_key(&mut self, message: KeyMessage, key: Key, params: KeyEventParams) -> bool {
        logger::info_p(
            "stub",
            &format!("win({:#x}).post_key({:?}, {}, {:#010x})", self.id, message, key, params.pack()),
        );
        true
    }

    fn capture(&mut self, rect: CaptureRect) -> Option<Capture> {
        logger::info_p("stub", &format!("win({:#x}).capture({:?})", self.id, rect));
        let (w, h) = (rect.w.max(0) as u32, rect.h.max(0) as u32);
        let mut data = Vec::with_capacity((w * h * 4) as usize);
        for y in 0..h {
            for x in 0..w {
                data.extend_from_slice(&[(x % 256) as u8, (y % 256) as u8, 128, 255]);
            }
        }
        Some(Capture { data, width: w, height: h, bytes_per_row: w * 4 })
    }
}
