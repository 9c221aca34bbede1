use serde::{Deserialize, Serialize};

/// Process identifier of the target application
pub type ProcessId = u32;

/// Window identifier (HWND on Windows)
pub type WindowId = u64;

/// Packed 24-bit color, `r | g << 8 | b << 16` (COLORREF layout)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "[u8; 3]", into = "[u8; 3]")]
pub struct Color(pub u32);

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color(r as u32 | (g as u32) << 8 | (b as u32) << 16)
    }

    pub fn r(self) -> u8 { (self.0 & 0xFF) as u8 }
    pub fn g(self) -> u8 { ((self.0 >> 8) & 0xFF) as u8 }
    pub fn b(self) -> u8 { ((self.0 >> 16) & 0xFF) as u8 }
}

impl From<[u8; 3]> for Color {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Color::rgb(r, g, b)
    }
}

impl From<Color> for [u8; 3] {
    fn from(c: Color) -> Self {
        [c.r(), c.g(), c.b()]
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "rgb({}, {}, {})", self.r(), self.g(), self.b())
    }
}

/// Pixel probe authored against the 1920x1080 reference canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferencePoint {
    pub x: i32,
    pub y: i32,
    pub color: Color,
}

/// Pixel probe in the discovered window's own pixel space
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScaledPoint {
    pub x: i32,
    pub y: i32,
    pub color: Color,
}

/// Client-area size of the target window in physical pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowSize {
    pub width: i32,
    pub height: i32,
}

/// Sub-region for partial capture (relative to window origin)
#[derive(Debug, Clone, Copy)]
pub struct CaptureRect {
    pub l: i32,
    pub t: i32,
    pub w: i32,
    pub h: i32,
}

impl CaptureRect {
    pub fn full(size: WindowSize) -> Self {
        Self { l: 0, t: 0, w: size.width, h: size.height }
    }
}

/// Raw screenshot pixel data (BGRA, top-down rows)
#[derive(Debug)]
pub struct Capture {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub bytes_per_row: u32,
}

impl Capture {
    pub fn is_empty(&self) -> bool {
        self.data.is_empty() || self.width == 0 || self.height == 0
    }
}
