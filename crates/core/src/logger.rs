use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Mutex, OnceLock};

use anyhow::{Context, Result};
use chrono::Local;
use crossterm::{
    cursor::MoveToColumn,
    queue,
    style::{Color, Stylize},
    terminal::{Clear, ClearType},
};

static LOGGER: OnceLock<Mutex<Logger>> = OnceLock::new();

struct Logger {
    file: File,
    prefixes: HashMap<String, Color>,
    waiting: bool,
}

pub const GREEN: Color = Color::Rgb { r: 96, g: 200, b: 135 };
pub const BLUE: Color = Color::Rgb { r: 76, g: 186, b: 250 };
pub const ORANGE: Color = Color::Rgb { r: 241, g: 149, b: 88 };
pub const RED: Color = Color::Rgb { r: 247, g: 101, b: 104 };
pub const GRAY: Color = Color::Rgb { r: 140, g: 140, b: 140 };

/// Initialize the global logger. Clears the log file.
pub fn init(log_dir: &Path) -> Result<()> {
    fs::create_dir_all(log_dir)
        .with_context(|| format!("creating log dir {}", log_dir.display()))?;
    let log_path = log_dir.join("app.log");
    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(&log_path)
        .with_context(|| format!("opening {}", log_path.display()))?;

    LOGGER
        .set(Mutex::new(Logger { file, prefixes: HashMap::new(), waiting: false }))
        .ok();
    Ok(())
}

/// Register a prefix with a color used for `*_p` calls.
pub fn register_prefix(prefix: &str, color: Color) {
    if let Some(mut l) = LOGGER.get().and_then(|l| l.lock().ok()) {
        l.prefixes.insert(prefix.to_string(), color);
    }
}

fn level_color(level: &str) -> Color {
    match level {
        "ERROR" => RED,
        "WARN" => ORANGE,
        _ => GREEN,
    }
}

fn level_tag(level: &str) -> &'static str {
    match level {
        "ERROR" => "[Error]",
        "WARN" => "[Warn]",
        _ => "[Info]",
    }
}

impl Logger {
    fn log(&mut self, out: &mut impl Write, ts: &str, level: &str, prefix: &str, msg: &str) {
        // File always gets plain text
        if prefix.is_empty() {
            writeln!(self.file, "[{}] [{}] {}", ts, level, msg).ok();
        } else {
            writeln!(self.file, "[{}] [{}] [{}] {}", ts, level, prefix, msg).ok();
        }

        self.clear_waiting(out);
        let tag = level_tag(level).with(level_color(level));
        if prefix.is_empty() {
            writeln!(out, "[{}]{} {}", ts, tag, msg).ok();
        } else {
            let color = self.prefixes.get(prefix).copied().unwrap_or(GRAY);
            writeln!(out, "[{}]{} {} {}", ts, tag, format!("[{}]", prefix).with(color), msg).ok();
        }
        out.flush().ok();
    }

    fn show_waiting(&mut self, out: &mut impl Write, msg: &str) {
        queue!(out, MoveToColumn(0), Clear(ClearType::CurrentLine)).ok();
        write!(out, "{} {}", "[Waiting]".with(ORANGE), msg).ok();
        out.flush().ok();
        self.waiting = true;
    }

    fn clear_waiting(&mut self, out: &mut impl Write) {
        if !self.waiting {
            return;
        }
        queue!(out, MoveToColumn(0), Clear(ClearType::CurrentLine)).ok();
        out.flush().ok();
        self.waiting = false;
    }
}

fn write_log(level: &str, prefix: &str, msg: &str) {
    let ts = Local::now().format("%H:%M:%S").to_string();
    let Some(mut l) = LOGGER.get().and_then(|l| l.lock().ok()) else { return };
    l.log(&mut io::stdout().lock(), &ts, level, prefix, msg);
}

pub fn info(msg: &str) {
    write_log("INFO", "", msg);
}

pub fn warn(msg: &str) {
    write_log("WARN", "", msg);
}

pub fn error(msg: &str) {
    write_log("ERROR", "", msg);
}

/// Log with a registered prefix.
pub fn info_p(prefix: &str, msg: &str) {
    write_log("INFO", prefix, msg);
}

pub fn warn_p(prefix: &str, msg: &str) {
    write_log("WARN", prefix, msg);
}

/// Show a transient status on the current console line. The next log line
/// or `clear_line` erases it. Not written to the log file.
pub fn waiting(msg: &str) {
    let Some(mut l) = LOGGER.get().and_then(|l| l.lock().ok()) else { return };
    l.show_waiting(&mut io::stdout().lock(), msg);
}

/// Erase a pending `waiting` line.
pub fn clear_line() {
    let Some(mut l) = LOGGER.get().and_then(|l| l.lock().ok()) else { return };
    l.clear_waiting(&mut io::stdout().lock());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn logger_in(dir: &Path) -> Logger {
        let file = File::create(dir.join("app.log")).unwrap();
        Logger { file, prefixes: HashMap::new(), waiting: false }
    }

    #[test]
    fn test_waiting_line_stays_off_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut l = logger_in(dir.path());
        let mut out = Vec::new();

        l.show_waiting(&mut out, "waiting for process");
        assert!(l.waiting);
        let console = String::from_utf8_lossy(&out).into_owned();
        assert!(console.contains("[Waiting]"));
        assert!(console.contains("waiting for process"));
        assert!(!console.ends_with('\n'));

        l.log(&mut out, "12:00:00", "INFO", "", "Pid = 42");
        assert!(!l.waiting);
        let file = fs::read_to_string(dir.path().join("app.log")).unwrap();
        assert_eq!(file, "[12:00:00] [INFO] Pid = 42\n");
    }

    #[test]
    fn test_clear_line_only_when_waiting() {
        let dir = tempfile::tempdir().unwrap();
        let mut l = logger_in(dir.path());
        let mut out = Vec::new();

        l.clear_waiting(&mut out);
        assert!(out.is_empty());

        l.show_waiting(&mut out, "waiting for the target window");
        let shown = out.len();
        l.clear_waiting(&mut out);
        assert!(!l.waiting);
        assert!(out.len() > shown);

        let after = out.len();
        l.clear_waiting(&mut out);
        assert_eq!(out.len(), after);
    }

    #[test]
    fn test_prefixed_line() {
        let dir = tempfile::tempdir().unwrap();
        let mut l = logger_in(dir.path());
        l.prefixes.insert("stub".into(), BLUE);
        let mut out = Vec::new();

        l.log(&mut out, "08:15:00", "WARN", "stub", "no window");
        let file = fs::read_to_string(dir.path().join("app.log")).unwrap();
        assert_eq!(file, "[08:15:00] [WARN] [stub] no window\n");
        assert!(String::from_utf8_lossy(&out).contains("no window"));
    }
}
