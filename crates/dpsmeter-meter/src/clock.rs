//! Wall clock abstraction

use chrono::{Local, NaiveDateTime};

/// Source of "now" in the same local time the game writes to its logs
pub trait Clock {
    fn now(&self) -> NaiveDateTime;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}
