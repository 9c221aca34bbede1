pub mod stub;
pub mod hotkey;

#[cfg(target_os = "windows")]
pub mod win32;

use anyhow::Result;

use crate::input::{KeyEventParams, KeyMessage};
use crate::keys::Key;
use crate::types::*;
use crate::logger;

/// Handle to the target window. Holds the drawing surface for its lifetime.
pub trait WindowHandle {
    fn id(&self) -> WindowId;
    fn size(&self) -> WindowSize;
    fn sample(&mut self, x: i32, y: i32) -> Color;
    fn activate(&mut self);
    fn post_key(&mut self, message: KeyMessage, key: Key, params: KeyEventParams) -> bool;
    fn capture(&mut self, rect: CaptureRect) -> Option<Capture>;
}

/// Process-wide operations (discovery, global key state, cursor clip).
pub trait Platform {
    /// First running process whose executable matches a name, names tried in order.
    fn find_process(&self, names: &[String]) -> Option<ProcessId>;
    /// Top-level window of `pid` with its client size.
    fn find_window(&self, pid: ProcessId) -> Option<(WindowId, WindowSize)>;
    fn open_window(&self, id: WindowId, size: WindowSize) -> Result<Box<dyn WindowHandle>>;
    /// True while every key of the combination is physically held.
    fn keys_held(&self, keys: &[Key]) -> bool;
    fn release_cursor_clip(&self) -> bool;
}

/// Create the platform appropriate for the current OS.
pub fn create_platform(force_stub: bool) -> Box<dyn Platform> {
    logger::register_prefix("stub", logger::GRAY);
    if force_stub {
        return Box::new(stub::StubPlatform::default());
    }
    #[cfg(target_os = "windows")]
    {
        logger::register_prefix("win32", logger::BLUE);
        Box::new(win32::WinPlatform)
    }
    #[cfg(not(target_os = "windows"))]
    {
        logger::warn("window automation needs Windows; using the stub platform");
        Box::new(stub::StubPlatform::default())
    }
}
