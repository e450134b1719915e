//! Loop pacing and time-of-day windows.
//!
//! Both binaries run the same shape of loop:
//!
//! ```text
//!   ┌──────────────┐
//!   │ pause()      │  sleep one interval (injectable)
//!   └──────┬───────┘
//!          ▼
//!   ┌──────────────┐
//!   │ next_tick()  │  iteration += 1, maintenance every N-th
//!   └──────┬───────┘
//!          ▼
//!   runtime.iterate(tick)
//! ```
//!
//! Maintenance (directory checks and space reclamation) fires on every
//! N-th iteration.  A loop built with [`PollLoop::after_prepare`] counts
//! the startup pass as the first one, so it does not repeat it on
//! iteration 1.

use std::thread;
use std::time::Duration;

use chrono::{NaiveDateTime, Timelike};
use log::debug;

// ═══════════════════════════════════════════════════════════════
//  Cadence
// ═══════════════════════════════════════════════════════════════

/// Fires once every `every` calls.
#[derive(Debug, Clone, Copy)]
pub struct Cadence {
    every: u32,
    count: u32,
}

impl Cadence {
    /// Fires on the first call, then every `every` calls.
    pub fn new(every: u32) -> Self {
        let every = every.max(1);
        Self { every, count: every }
    }

    /// As if it had just fired: the first firing is the `every`-th call.
    pub fn after_fire(every: u32) -> Self {
        Self {
            every: every.max(1),
            count: 1,
        }
    }

    pub fn fire(&mut self) -> bool {
        if self.count >= self.every {
            self.count = 1;
            true
        } else {
            self.count += 1;
            false
        }
    }

    pub fn every(&self) -> u32 {
        self.every
    }
}

// ═══════════════════════════════════════════════════════════════
//  Poll loop
// ═══════════════════════════════════════════════════════════════

/// How the loop waits between iterations.
pub trait Sleeper {
    fn sleep(&mut self, duration: Duration);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&mut self, duration: Duration) {
        thread::sleep(duration);
    }
}

/// What one iteration should do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopTick {
    /// 1-based iteration number.
    pub iteration: u64,
    /// Re-initialise and reclaim space this iteration.
    pub maintenance: bool,
}

pub struct PollLoop<Z> {
    interval: Duration,
    cadence: Cadence,
    iteration: u64,
    sleeper: Z,
}

impl<Z: Sleeper> PollLoop<Z> {
    pub fn new(interval: Duration, maintenance_every: u32, sleeper: Z) -> Self {
        Self {
            interval,
            cadence: Cadence::new(maintenance_every),
            iteration: 0,
            sleeper,
        }
    }

    /// For loops whose maintenance already ran once during startup.
    pub fn after_prepare(interval: Duration, maintenance_every: u32, sleeper: Z) -> Self {
        Self {
            cadence: Cadence::after_fire(maintenance_every),
            ..Self::new(interval, maintenance_every, sleeper)
        }
    }

    pub fn pause(&mut self) {
        self.sleeper.sleep(self.interval);
    }

    pub fn next_tick(&mut self) -> LoopTick {
        self.iteration += 1;
        let tick = LoopTick {
            iteration: self.iteration,
            maintenance: self.cadence.fire(),
        };
        if tick.maintenance {
            debug!("iteration {}: maintenance", tick.iteration);
        }
        tick
    }

    pub fn iteration(&self) -> u64 {
        self.iteration
    }

    pub fn sleeper(&self) -> &Z {
        &self.sleeper
    }
}

// ═══════════════════════════════════════════════════════════════
//  Night window
// ═══════════════════════════════════════════════════════════════

/// Local time-of-day window in HHMM form, e.g. 2000 to 0700.
///
/// Both bounds are exclusive: at exactly `night_start` or `day_start` it
/// is still day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NightWindow {
    pub night_start_hhmm: u16,
    pub day_start_hhmm: u16,
}

impl NightWindow {
    pub fn is_night(&self, hhmm: u16) -> bool {
        if self.night_start_hhmm >= self.day_start_hhmm {
            // Wraps midnight, e.g. 2000..0700.
            hhmm > self.night_start_hhmm || hhmm < self.day_start_hhmm
        } else {
            hhmm > self.night_start_hhmm && hhmm < self.day_start_hhmm
        }
    }

    pub fn is_night_at(&self, now: NaiveDateTime) -> bool {
        self.is_night(hhmm(now))
    }
}

/// `14:05` → `1405`.
pub fn hhmm(at: NaiveDateTime) -> u16 {
    // hour <= 23 and minute <= 59, so the result always fits.
    (at.hour() * 100 + at.minute()) as u16
}
