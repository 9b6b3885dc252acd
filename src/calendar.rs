//! Calendar decomposition of event timestamps
//!
//! Events carry their time as epoch milliseconds. The time dimension and the
//! songplay partitions need that instant broken into calendar fields. This is
//! a pure function so it can be applied element-wise by the frame layer and
//! tested on its own.

use chrono::{DateTime, Datelike, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

/// Wall clock the instant is read on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Clock {
    /// Naive UTC: the epoch value is read as-is
    Utc,
    /// The host's local time zone
    #[default]
    Local,
}

impl Clock {
    fn wall_time(self, instant: DateTime<chrono::Utc>) -> NaiveDateTime {
        match self {
            Clock::Utc => instant.naive_utc(),
            Clock::Local => instant.with_timezone(&chrono::Local).naive_local(),
        }
    }
}

/// Calendar fields of one event timestamp
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarParts {
    /// 0..=23
    pub hour: i32,
    /// Day of month, 1..=31
    pub day: i32,
    /// ISO-8601 week number, 1..=53
    pub week: i32,
    /// 1..=12
    pub month: i32,
    /// Calendar year (not the ISO week-year)
    pub year: i32,
    /// Days since Monday, 0..=6
    pub weekday: i32,
}

impl CalendarParts {
    /// Decompose epoch milliseconds, or `None` when the value is outside
    /// the representable date range.
    pub fn from_epoch_millis(millis: i64, clock: Clock) -> Option<Self> {
        let instant = DateTime::from_timestamp_millis(millis)?;
        Some(Self::from_naive(clock.wall_time(instant)))
    }

    /// Decompose an already-resolved wall-clock time
    pub fn from_naive(wall: NaiveDateTime) -> Self {
        Self {
            hour: wall.hour() as i32,
            day: wall.day() as i32,
            week: wall.iso_week().week() as i32,
            month: wall.month() as i32,
            year: wall.year(),
            weekday: wall.weekday().num_days_from_monday() as i32,
        }
    }
}
