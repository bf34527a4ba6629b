// Wall-clock helpers
//
// Schedule times are `HH:MM` strings on a single day. These helpers convert
// between that representation, minutes since midnight, and weekday names.

use chrono::{Datelike, NaiveDate, NaiveTime, Timelike, Weekday};

use crate::error::{Error, Result};
use crate::types::WEEKDAYS;

pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// Parse a time string in HH:MM format
pub fn parse_time(time_str: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(time_str, "%H:%M")
        .map_err(|e| Error::InvalidInput(format!("Invalid time '{}': {}", time_str, e)))
}

/// Minutes since midnight, or `None` when the string is not a valid HH:MM time.
pub fn minutes_of_day(time_str: &str) -> Option<u32> {
    parse_time(time_str).ok().map(minutes_of_time)
}

pub fn minutes_of_time(time: NaiveTime) -> u32 {
    time.hour() * 60 + time.minute()
}

/// Render minutes since midnight as HH:MM, wrapping past midnight.
pub fn format_minutes(minutes: u32) -> String {
    let minutes = minutes % MINUTES_PER_DAY;
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// `start + minutes` on a 24-hour clock. The result wraps past midnight.
pub fn add_minutes(start: &str, minutes: u32) -> Result<String> {
    let start = minutes_of_time(parse_time(start)?);
    Ok(format_minutes(start + minutes))
}

/// Length of `start..end` in minutes.
///
/// An end earlier than the start is read as ending on the next day. Stored
/// records may still carry such spans even though the editor rejects them.
pub fn duration_minutes(start: &str, end: &str) -> Option<u32> {
    let start = minutes_of_day(start)?;
    let end = minutes_of_day(end)?;
    if end >= start {
        Some(end - start)
    } else {
        Some(end + MINUTES_PER_DAY - start)
    }
}

/// Human duration such as `1h 30m`, `2h`, `45m` or `0m`.
pub fn format_duration(minutes: u32) -> String {
    let hours = minutes / 60;
    let mins = minutes % 60;
    match (hours, mins) {
        (0, m) => format!("{}m", m),
        (h, 0) => format!("{}h", h),
        (h, m) => format!("{}h {}m", h, m),
    }
}

/// English weekday name used as the `WeeklySchedule` key.
pub fn weekday_name(date: NaiveDate) -> &'static str {
    match date.weekday() {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Canonical day name for user input such as `mon` or `TUESDAY`.
pub fn normalize_day(day: &str) -> Option<&'static str> {
    let wanted = day.trim().to_lowercase();
    if wanted.len() < 3 {
        return None;
    }
    WEEKDAYS.iter().copied().find(|d| d.to_lowercase().starts_with(&wanted))
}

/// The day after `day`, with Sunday wrapping to Monday.
pub fn next_day(day: &str) -> Option<&'static str> {
    let index = WEEKDAYS.iter().position(|d| *d == day)?;
    Some(WEEKDAYS[(index + 1) % WEEKDAYS.len()])
}

pub fn is_weekend(day: &str) -> bool {
    matches!(day, "Saturday" | "Sunday")
}
