use std::time::{Duration, Instant};

use chrono::{DateTime, Local, TimeZone};

use crate::constants::CLOCK_REFRESH;

/// Taskbar tray clock. Re-reads the wall clock at most once per refresh period.
#[derive(Debug)]
pub struct Clock {
    text: String,
    last_refresh: Option<Instant>,
    period: Duration,
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock {
    pub fn new() -> Self {
        Self {
            text: format_time(&Local::now()),
            last_refresh: None,
            period: CLOCK_REFRESH,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Refresh if the period elapsed. Returns true when the text was re-read.
    pub fn tick(&mut self, now: Instant) -> bool {
        if self
            .last_refresh
            .is_some_and(|last| now.duration_since(last) < self.period)
        {
            return false;
        }
        self.last_refresh = Some(now);
        self.text = format_time(&Local::now());
        true
    }
}

pub fn format_time<Tz: TimeZone>(time: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    time.format("%H:%M").to_string()
}
