//! Local wall-clock adapter.
//!
//! File names and log stamps use local time, like the rest of the
//! Pi's userland.

use chrono::{Local, NaiveDateTime};

use crate::app::ports::Clock;

#[derive(Debug, Default, Clone, Copy)]
pub struct LocalClock;

impl Clock for LocalClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}
