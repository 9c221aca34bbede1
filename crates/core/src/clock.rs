use std::thread;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Source of time for the tick loop. Every wait in the agent goes through here.
pub trait Clock {
    fn sleep_ms(&mut self, ms: u64);
    fn unix_millis(&self) -> u128;
}

/// Wall clock with real blocking sleeps.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn sleep_ms(&mut self, ms: u64) {
        thread::sleep(Duration::from_millis(ms));
    }

    fn unix_millis(&self) -> u128 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or(0)
    }
}

/// Records waits instead of sleeping; time advances by the amount slept.
#[derive(Debug, Default, Clone)]
pub struct ManualClock {
    pub now_ms: u128,
    pub sleeps: Vec<u64>,
}

impl ManualClock {
    pub fn starting_at(now_ms: u128) -> Self {
        Self { now_ms, sleeps: Vec::new() }
    }
}

impl Clock for ManualClock {
    fn sleep_ms(&mut self, ms: u64) {
        self.sleeps.push(ms);
        self.now_ms += ms as u128;
    }

    fn unix_millis(&self) -> u128 {
        self.now_ms
    }
}
