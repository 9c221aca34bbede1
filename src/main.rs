use std::any::Any;
use std::io::{self, BufRead};
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;

use anyhow::{anyhow, Result};
use crossterm::{execute, terminal::SetTitle};

use autoskip_core::{logger, orchestrator, settings::Settings};
use autoskip_core::clock::SystemClock;
use autoskip_core::platform::create_platform;

fn main() -> Result<()> {
    let force_stub = std::env::args().any(|a| a == "--stub");

    let base_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

    // Init logger
    logger::init(&base_dir.join("logs"))?;
    panic::set_hook(Box::new(|info| logger::error(&info.to_string())));
    execute!(io::stdout(), SetTitle("autoskip")).ok();
    logger::info(&format!("autoskip v{}", env!("CARGO_PKG_VERSION")));

    // Settings are written out on first run so they can be edited
    let settings_path = base_dir.join("settings.json");
    let settings = Settings::load(&settings_path);
    if !settings_path.exists() {
        if let Err(e) = settings.save(&settings_path) {
            logger::warn(&format!("could not write {}: {:#}", settings_path.display(), e));
        }
    }

    let platform = create_platform(force_stub);
    let mut clock = SystemClock;

    if let Err(e) = catch_panics(|| orchestrator::run(platform.as_ref(), &mut clock, &settings)) {
        logger::error(&format!("{:?}", e));
    }

    // Keep the console open so the error can be read
    logger::info("press Enter to exit");
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line).ok();
    Ok(())
}

/// Run `f`, turning a panic into an error so the console still pauses.
fn catch_panics(f: impl FnOnce() -> Result<()>) -> Result<()> {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(result) => result,
        Err(payload) => Err(anyhow!("stopped after a panic: {}", panic_message(payload.as_ref()))),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s
    } else {
        "unknown cause"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catch_panics_passes_results_through() {
        assert!(catch_panics(|| Ok(())).is_ok());
        let err = catch_panics(|| Err(anyhow!("no window"))).unwrap_err();
        assert_eq!(err.to_string(), "no window");
    }

    #[test]
    fn test_catch_panics_reports_the_message() {
        let err = catch_panics(|| panic!("tick {} failed", 3)).unwrap_err();
        assert_eq!(err.to_string(), "stopped after a panic: tick 3 failed");

        let err = catch_panics(|| std::panic::panic_any(7u8)).unwrap_err();
        assert!(err.to_string().ends_with("unknown cause"));
    }
}
