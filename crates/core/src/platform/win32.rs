use std::ffi::c_void;
use std::mem::size_of;

use anyhow::{bail, Result};
use windows::Win32::Foundation::{CloseHandle, BOOL, FALSE, HWND, LPARAM, RECT, TRUE, WPARAM};
use windows::Win32::Graphics::Gdi::{
    BitBlt, CreateCompatibleBitmap, CreateCompatibleDC, DeleteDC, DeleteObject, GetDC,
    GetDIBits, GetPixel, ReleaseDC, SelectObject, BITMAPINFO, BITMAPINFOHEADER, BI_RGB,
    DIB_RGB_COLORS, HDC, SRCCOPY,
};
use windows::Win32::System::Diagnostics::ToolHelp::{
    CreateToolhelp32Snapshot, Process32FirstW, Process32NextW, PROCESSENTRY32W,
    TH32CS_SNAPPROCESS,
};
use windows::Win32::UI::HiDpi::GetDpiForWindow;
use windows::Win32::UI::WindowsAndMessaging::{
    ClipCursor, EnumWindows, GetClientRect, GetWindowThreadProcessId, IsWindow, PostMessageW,
    SetForegroundWindow, ShowWindow, SW_SHOW,
};

use crate::input::{KeyEventParams, KeyMessage};
use crate::keys::Key;
use crate::types::*;
use crate::logger;
use super::{hotkey, Platform, WindowHandle};

fn to_hwnd(id: WindowId) -> HWND {
    HWND(id as usize as *mut c_void)
}

fn from_hwnd(hwnd: HWND) -> WindowId {
    hwnd.0 as usize as WindowId
}

pub struct WinPlatform;

impl Platform for WinPlatform {
    fn find_process(&self, names: &[String]) -> Option<ProcessId> {
        let procs = match unsafe { running_processes() } {
            Ok(p) => p,
            Err(e) => {
                logger::warn_p("win32", &format!("process snapshot failed: {}", e));
                return None;
            }
        };
        names.iter().find_map(|name| {
            procs.iter().find(|(_, exe)| exe == name).map(|(pid, _)| *pid)
        })
    }

    fn find_window(&self, pid: ProcessId) -> Option<(WindowId, WindowSize)> {
        let mut state = EnumState { pid, found: None };
        unsafe {
            // stopping early makes EnumWindows report an error
            let _ = EnumWindows(Some(enum_windows_cb), LPARAM(&mut state as *mut EnumState as isize));
        }
        let hwnd = state.found?;
        let size = unsafe { client_size(hwnd) }?;
        Some((from_hwnd(hwnd), size))
    }

    fn open_window(&self, id: WindowId, size: WindowSize) -> Result<Box<dyn WindowHandle>> {
        let hwnd = to_hwnd(id);
        let hdc = unsafe { GetDC(hwnd) };
        if hdc.is_invalid() {
            bail!("GetDC failed for window {:#x}", id);
        }
        Ok(Box::new(WinWindow { hwnd, hdc, size }))
    }

    fn keys_held(&self, keys: &[Key]) -> bool {
        hotkey::combo_held(keys)
    }

    fn release_cursor_clip(&self) -> bool {
        unsafe { ClipCursor(None) }.is_ok()
    }
}

struct EnumState {
    pid: ProcessId,
    found: Option<HWND>,
}

unsafe extern "system" fn enum_windows_cb(hwnd: HWND, lparam: LPARAM) -> BOOL {
    let state = &mut *(lparam.0 as *mut EnumState);
    let mut pid: u32 = 0;
    GetWindowThreadProcessId(hwnd, Some(&mut pid));
    if pid == state.pid {
        state.found = Some(hwnd);
        FALSE
    } else {
        TRUE
    }
}

unsafe fn running_processes() -> windows::core::Result<Vec<(ProcessId, String)>> {
    let snapshot = CreateToolhelp32Snapshot(TH32CS_SNAPPROCESS, 0)?;
    let mut entry = PROCESSENTRY32W {
        dwSize: size_of::<PROCESSENTRY32W>() as u32,
        ..Default::default()
    };

    let mut procs = Vec::new();
    if Process32FirstW(snapshot, &mut entry).is_ok() {
        loop {
            let len = entry.szExeFile.iter().position(|&c| c == 0).unwrap_or(entry.szExeFile.len());
            procs.push((entry.th32ProcessID, String::from_utf16_lossy(&entry.szExeFile[..len])));
            if Process32NextW(snapshot, &mut entry).is_err() {
                break;
            }
        }
    }

    let _ = CloseHandle(snapshot);
    Ok(procs)
}

/// Client area in physical pixels (logical size scaled by the window DPI).
unsafe fn client_size(hwnd: HWND) -> Option<WindowSize> {
    let _ = ShowWindow(hwnd, SW_SHOW);
    let dpi = GetDpiForWindow(hwnd);
    let scale = if dpi == 0 { 1.0 } else { dpi as f64 / 96.0 };

    let mut rect = RECT::default();
    GetClientRect(hwnd, &mut rect).ok()?;

    Some(WindowSize {
        width: ((rect.right - rect.left) as f64 * scale).round() as i32,
        height: ((rect.bottom - rect.top) as f64 * scale).round() as i32,
    })
}

struct WinWindow {
    hwnd: HWND,
    hdc: HDC,
    size: WindowSize,
}

impl WindowHandle for WinWindow {
    fn id(&self) -> WindowId {
        from_hwnd(self.hwnd)
    }

    fn size(&self) -> WindowSize {
        self.size
    }

    fn sample(&mut self, x: i32, y: i32) -> Color {
        // CLR_INVALID (0xFFFFFFFF) never equals a 24-bit color
        Color(unsafe { GetPixel(self.hdc, x, y) }.0)
    }

    fn activate(&mut self) {
        let _ = unsafe { SetForegroundWindow(self.hwnd) };
    }

    fn post_key(&mut self, message: KeyMessage, key: Key, params: KeyEventParams) -> bool {
        unsafe {
            PostMessageW(
                self.hwnd,
                message.id(),
                WPARAM(key.vk as usize),
                LPARAM(params.pack() as isize),
            )
        }
        .is_ok()
    }

    fn capture(&mut self, rect: CaptureRect) -> Option<Capture> {
        unsafe { capture_region(self.hwnd, self.hdc, self.size, rect) }
    }
}

impl Drop for WinWindow {
    fn drop(&mut self) {
        unsafe {
            ReleaseDC(self.hwnd, self.hdc);
        }
    }
}

/// BitBlt a client region into a top-down 32-bit buffer.
unsafe fn capture_region(hwnd: HWND, window_dc: HDC, client: WindowSize, rect: CaptureRect) -> Option<Capture> {
    if !IsWindow(hwnd).as_bool() || rect.w <= 0 || rect.h <= 0 {
        return None;
    }

    let x = rect.l.max(0);
    let y = rect.t.max(0);
    let width = (rect.l + rect.w).min(client.width) - x;
    let height = (rect.t + rect.h).min(client.height) - y;
    if width <= 0 || height <= 0 {
        return None;
    }

    let mem_dc = CreateCompatibleDC(window_dc);
    if mem_dc.is_invalid() {
        return None;
    }
    let bitmap = CreateCompatibleBitmap(window_dc, width, height);
    let old_bitmap = SelectObject(mem_dc, bitmap);

    let copied = BitBlt(mem_dc, 0, 0, width, height, window_dc, x, y, SRCCOPY);

    let mut bmi = BITMAPINFO {
        bmiHeader: BITMAPINFOHEADER {
            biSize: size_of::<BITMAPINFOHEADER>() as u32,
            biWidth: width,
            biHeight: -height, // Top-down DIB
            biPlanes: 1,
            biBitCount: 32,
            biCompression: BI_RGB.0,
            biSizeImage: 0,
            biXPelsPerMeter: 0,
            biYPelsPerMeter: 0,
            biClrUsed: 0,
            biClrImportant: 0,
        },
        bmiColors: [Default::default()],
    };

    let mut data = vec![0u8; (width * height * 4) as usize];
    let lines = if copied.is_ok() {
        GetDIBits(
            mem_dc,
            bitmap,
            0,
            height as u32,
            Some(data.as_mut_ptr() as *mut _),
            &mut bmi,
            DIB_RGB_COLORS,
        )
    } else {
        0
    };

    SelectObject(mem_dc, old_bitmap);
    let _ = DeleteObject(bitmap);
    let _ = DeleteDC(mem_dc);

    if lines <= 0 {
        logger::warn_p("win32", "window capture returned no rows");
        return None;
    }

    Some(Capture {
        data,
        width: width as u32,
        height: height as u32,
        bytes_per_row: width as u32 * 4,
    })
}
