use std::path::PathBuf;

use anyhow::Result;

use crate::clock::Clock;
use crate::dialogue::{self, DialogueTracker, Intents};
use crate::export;
use crate::input::{KeyDirection, KeyEventParams, KeyMessage};
use crate::keys::Key;
use crate::logger;
use crate::platform::hotkey::Hotkey;
use crate::platform::{Platform, WindowHandle};
use crate::scaler;
use crate::settings::{ResolvedKeys, Settings};
use crate::types::*;

/// A located target: process, window and its client size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Target {
    pub pid: ProcessId,
    pub window: WindowId,
    pub size: WindowSize,
}

/// Poll until the process and then a plausibly sized window exist.
/// Never gives up; absence is reported only as a transient status line.
pub fn acquire(platform: &dyn Platform, clock: &mut dyn Clock, settings: &Settings) -> Target {
    logger::waiting(&format!("waiting for process {}", settings.process_names.join(" / ")));
    let pid = loop {
        if let Some(pid) = platform.find_process(&settings.process_names) {
            break pid;
        }
        clock.sleep_ms(settings.acquire_poll_ms);
    };
    logger::clear_line();
    logger::info(&format!("Pid = {}", pid));

    logger::waiting("waiting for the target window");
    let (window, size) = loop {
        match platform.find_window(pid) {
            Some((window, size)) if size.width > settings.min_window_width => break (window, size),
            _ => clock.sleep_ms(settings.acquire_poll_ms),
        }
    };
    logger::clear_line();
    logger::info(&format!("Hwnd = {:#x}", window));
    logger::info(&format!("window size: {} x {}", size.width, size.height));

    Target { pid, window, size }
}

/// Result of a manual screenshot request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreenshotOutcome {
    Saved(PathBuf),
    CaptureFailed,
    SaveFailed,
}

/// What one tick did, for callers that want to observe the loop.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TickReport {
    pub toggled: bool,
    pub screenshot: Option<ScreenshotOutcome>,
    pub sampled: bool,
    pub intents: Intents,
}

#[derive(Debug, Clone, Copy)]
struct Timing {
    tick_ms: u64,
    key_press_ms: u64,
    debounce_ms: u64,
}

/// All mutable state of a running agent, owned by the tick loop.
pub struct Session {
    window: Box<dyn WindowHandle>,
    points: Vec<ScaledPoint>,
    advance: Key,
    pause: Hotkey,
    capture: Hotkey,
    tracker: DialogueTracker,
    activated: bool,
    timing: Timing,
    screenshot_dir: PathBuf,
    post_warned: bool,
}

impl Session {
    /// Scales the probe points to the window once; they stay fixed afterwards.
    pub fn new(settings: &Settings, keys: ResolvedKeys, window: Box<dyn WindowHandle>) -> Self {
        let points = scaler::scale_points(&settings.points, window.size());
        Self {
            window,
            points,
            advance: keys.advance,
            pause: keys.pause,
            capture: keys.capture,
            tracker: DialogueTracker::new(settings.cooldown_ticks),
            activated: true,
            timing: Timing {
                tick_ms: settings.tick_ms,
                key_press_ms: settings.key_press_ms,
                debounce_ms: settings.hotkey_debounce_ms,
            },
            screenshot_dir: settings.screenshot_dir.clone(),
            post_warned: false,
        }
    }

    pub fn points(&self) -> &[ScaledPoint] {
        &self.points
    }

    pub fn is_activated(&self) -> bool {
        self.activated
    }

    pub fn dialogue_state(&self) -> u32 {
        self.tracker.state()
    }

    pub fn pause_hotkey(&self) -> &Hotkey {
        &self.pause
    }

    pub fn capture_hotkey(&self) -> &Hotkey {
        &self.capture
    }

    /// One iteration: hotkeys, sample, decide, actuate, cursor release, sleep.
    pub fn tick(&mut self, platform: &dyn Platform, clock: &mut dyn Clock) -> TickReport {
        let mut report = TickReport::default();

        if self.pause.is_held(platform) {
            self.activated = !self.activated;
            report.toggled = true;
            logger::info(if self.activated { "resumed" } else { "paused" });
            clock.sleep_ms(self.timing.debounce_ms);
        }

        if self.capture.is_held(platform) {
            report.screenshot = Some(self.screenshot(&*clock));
            clock.sleep_ms(self.timing.debounce_ms);
        }

        report.intents = if self.activated {
            report.sampled = true;
            let window = &mut self.window;
            let matched = dialogue::all_points_match(&self.points, |x, y| window.sample(x, y));
            let intents = self.tracker.observe(matched);
            if intents.entered {
                logger::info("dialogue detected");
            }
            if intents.press_key {
                self.press_advance(clock);
            }
            if intents.exited {
                logger::info("dialogue finished");
            }
            intents
        } else {
            self.tracker.idle_tick()
        };

        if report.intents.release_cursor_lock {
            platform.release_cursor_clip();
        }

        clock.sleep_ms(self.timing.tick_ms);
        report
    }

    /// Tick forever.
    pub fn run(&mut self, platform: &dyn Platform, clock: &mut dyn Clock) -> ! {
        loop {
            self.tick(platform, clock);
        }
    }

    fn press_advance(&mut self, clock: &mut dyn Clock) {
        let key = self.advance;
        self.window.activate();

        let down = KeyEventParams::for_key(key, KeyDirection::Down);
        let sent_down = self.window.post_key(KeyMessage::KeyDown, key, down);
        clock.sleep_ms(self.timing.key_press_ms);
        let up = KeyEventParams::for_key(key, KeyDirection::Up);
        let sent_up = self.window.post_key(KeyMessage::KeyUp, key, up);

        if !(sent_down && sent_up) && !self.post_warned {
            logger::warn(&format!("window {:#x} rejected a {} key message", self.window.id(), key));
            self.post_warned = true;
        }
    }

    fn screenshot(&mut self, clock: &dyn Clock) -> ScreenshotOutcome {
        let rect = CaptureRect::full(self.window.size());
        match self.window.capture(rect) {
            Some(cap) if !cap.is_empty() => {
                let path = export::screenshot_path(&self.screenshot_dir, clock.unix_millis());
                match export::save_bitmap(&path, &cap) {
                    Ok(()) => {
                        logger::info(&format!("screenshot saved to \"{}\"", path.display()));
                        ScreenshotOutcome::Saved(path)
                    }
                    Err(e) => {
                        logger::warn(&format!("screenshot not saved: {:#}", e));
                        ScreenshotOutcome::SaveFailed
                    }
                }
            }
            _ => {
                logger::error("screenshot capture failed");
                ScreenshotOutcome::CaptureFailed
            }
        }
    }
}

/// Resolve keys, find the target, then run the tick loop until the process ends.
pub fn run(platform: &dyn Platform, clock: &mut dyn Clock, settings: &Settings) -> Result<()> {
    let keys = settings.resolve_keys()?;
    let target = acquire(platform, clock, settings);
    let window = platform.open_window(target.window, target.size)?;
    let mut session = Session::new(settings, keys, window);

    logger::info(&format!(
        "watching for dialogue, {} advances it ({} probe points)",
        session.advance,
        session.points().len()
    ));
    logger::info(&format!("press {} to pause or resume", session.pause_hotkey()));
    logger::info(&format!("press {} to take a screenshot", session.capture_hotkey()));

    session.run(platform, clock)
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use super::*;
    use crate::clock::ManualClock;

    #[derive(Default)]
    struct Log {
        posts: Vec<(KeyMessage, u8, u32)>,
        activations: u32,
    }

    struct FakeWindow {
        size: WindowSize,
        matching: Rc<Cell<bool>>,
        log: Rc<RefCell<Log>>,
    }

    impl WindowHandle for FakeWindow {
        fn id(&self) -> WindowId { 7 }
        fn size(&self) -> WindowSize { self.size }
        fn sample(&mut self, x: i32, y: i32) -> Color {
            if !self.matching.get() {
                return Color::rgb(0, 0, 0);
            }
            let s = Settings::default();
            let pts = scaler::scale_points(&s.points, self.size);
            pts.iter().find(|p| p.x == x && p.y == y).map(|p| p.color).unwrap_or(Color::rgb(0, 0, 0))
        }
        fn activate(&mut self) { self.log.borrow_mut().activations += 1; }
        fn post_key(&mut self, message: KeyMessage, key: Key, params: KeyEventParams) -> bool {
            self.log.borrow_mut().posts.push((message, key.vk, params.pack()));
            true
        }
        fn capture(&mut self, _rect: CaptureRect) -> Option<Capture> { None }
    }

    struct FakePlatform {
        held: RefCell<Vec<&'static str>>,
        releases: Cell<u32>,
    }

    impl Platform for FakePlatform {
        fn find_process(&self, _names: &[String]) -> Option<ProcessId> { Some(1) }
        fn find_window(&self, _pid: ProcessId) -> Option<(WindowId, WindowSize)> { None }
        fn open_window(&self, _id: WindowId, _size: WindowSize) -> Result<Box<dyn WindowHandle>> {
            anyhow::bail!("unused")
        }
        fn keys_held(&self, keys: &[Key]) -> bool {
            keys.iter().all(|k| self.held.borrow().contains(&k.name))
        }
        fn release_cursor_clip(&self) -> bool {
            self.releases.set(self.releases.get() + 1);
            true
        }
    }

    fn setup() -> (Session, FakePlatform, Rc<Cell<bool>>, Rc<RefCell<Log>>) {
        let matching = Rc::new(Cell::new(false));
        let log = Rc::new(RefCell::new(Log::default()));
        let window = FakeWindow {
            size: WindowSize { width: 1600, height: 900 },
            matching: Rc::clone(&matching),
            log: Rc::clone(&log),
        };
        let settings = Settings::default();
        let keys = settings.resolve_keys().unwrap();
        let session = Session::new(&settings, keys, Box::new(window));
        let platform = FakePlatform { held: RefCell::new(Vec::new()), releases: Cell::new(0) };
        (session, platform, matching, log)
    }

    #[test]
    fn test_initial_state() {
        let (session, _, _, _) = setup();
        assert!(session.is_activated());
        assert_eq!(session.dialogue_state(), dialogue::IDLE);
        assert_eq!((session.points()[0].x, session.points()[0].y), (233, 29));
    }

    #[test]
    fn test_match_presses_down_then_up() {
        let (mut session, platform, matching, log) = setup();
        let mut clock = ManualClock::default();
        matching.set(true);

        let report = session.tick(&platform, &mut clock);
        assert!(report.intents.entered && report.intents.press_key);
        assert_eq!(clock.sleeps, vec![75, 125]);

        let log = log.borrow();
        assert_eq!(log.activations, 1);
        assert_eq!(
            log.posts,
            vec![(KeyMessage::KeyDown, 0x46, 0x0021_0001), (KeyMessage::KeyUp, 0x46, 0xC021_0001)]
        );
    }

    #[test]
    fn test_no_match_only_sleeps_tick() {
        let (mut session, platform, _, log) = setup();
        let mut clock = ManualClock::default();
        let report = session.tick(&platform, &mut clock);
        assert!(report.sampled);
        assert_eq!(report.intents, Intents::default());
        assert_eq!(clock.sleeps, vec![125]);
        assert!(log.borrow().posts.is_empty());
    }

    #[test]
    fn test_pause_suspends_sampling_but_keeps_releasing() {
        let (mut session, platform, matching, log) = setup();
        let mut clock = ManualClock::default();
        matching.set(true);
        session.tick(&platform, &mut clock);
        matching.set(false);
        session.tick(&platform, &mut clock);
        assert_eq!(session.dialogue_state(), 24);

        platform.held.replace(vec!["Alt", "P"]);
        let report = session.tick(&platform, &mut clock);
        assert!(report.toggled && !report.sampled);
        assert!(!session.is_activated());
        assert!(report.intents.release_cursor_lock);
        assert_eq!(session.dialogue_state(), 23);

        platform.held.replace(Vec::new());
        matching.set(true);
        let posts_before = log.borrow().posts.len();
        session.tick(&platform, &mut clock);
        assert_eq!(log.borrow().posts.len(), posts_before);
        assert_eq!(platform.releases.get(), 3);
    }

    #[test]
    fn test_capture_failure_is_reported() {
        let (mut session, platform, _, _) = setup();
        let mut clock = ManualClock::default();
        platform.held.replace(vec!["Alt", "K"]);
        let report = session.tick(&platform, &mut clock);
        assert_eq!(report.screenshot, Some(ScreenshotOutcome::CaptureFailed));
        assert_eq!(clock.sleeps, vec![400, 125]);
    }
}
