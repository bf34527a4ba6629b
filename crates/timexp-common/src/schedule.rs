// Weekly template editing
//
// Form-layer rules for the recurring schedule: item defaults, time
// validation, and the edit operations offered by the schedule editor.

use std::collections::HashSet;

use chrono::{NaiveTime, Timelike};

use crate::clock::{self, MINUTES_PER_DAY};
use crate::conflicts;
use crate::error::{Error, Result};
use crate::types::{new_id, ActivityCategory, ScheduleItem, WeeklySchedule, WEEKDAYS};

/// Durations offered by the editor, in minutes.
pub const DURATION_CHOICES: [u32; 5] = [30, 45, 60, 90, 120];

/// Item the editor inserts when the user adds a slot.
pub fn default_item() -> ScheduleItem {
    ScheduleItem::new(ActivityCategory::Studying, "08:00", "09:00", "New Mission Target")
        .with_subject("Math")
        .with_reminder(10)
}

/// Draft for an unplanned entry covering the current hour.
pub fn new_manual_entry(now: NaiveTime) -> ScheduleItem {
    let hour = now.hour();
    let end = if hour == 23 { "23:59".to_string() } else { format!("{:02}:00", hour + 1) };

    let mut item =
        ScheduleItem::new(ActivityCategory::Other, format!("{:02}:00", hour), end, "Spontaneous Mission");
    item.completed = Some(true);
    item
}

/// Reject items the data model cannot represent.
///
/// Both times must be valid `HH:MM` and the item must end on the day it
/// starts. Zero-length items are allowed.
pub fn validate_item(item: &ScheduleItem) -> Result<()> {
    if item.label.trim().is_empty() {
        return Err(Error::InvalidInput("Item label must not be empty".to_string()));
    }

    let start = clock::parse_time(&item.start_time)?;
    let end = clock::parse_time(&item.end_time)?;
    if end < start {
        return Err(Error::InvalidInput(format!(
            "Item '{}' ends at {} before it starts at {}; spans across midnight are not supported",
            item.label, item.end_time, item.start_time
        )));
    }

    Ok(())
}

fn check_day(day: &str) -> Result<()> {
    if WEEKDAYS.contains(&day) {
        Ok(())
    } else {
        Err(Error::InvalidInput(format!("Unknown weekday '{}'", day)))
    }
}

impl WeeklySchedule {
    pub fn add_item(&mut self, day: &str, item: ScheduleItem) -> Result<()> {
        check_day(day)?;
        validate_item(&item)?;
        self.day_mut(day).push(item);
        Ok(())
    }

    pub fn update_item(&mut self, day: &str, item: ScheduleItem) -> Result<()> {
        check_day(day)?;
        validate_item(&item)?;

        let slot = self
            .day_mut(day)
            .iter_mut()
            .find(|existing| existing.id == item.id)
            .ok_or_else(|| Error::NotFound(format!("Item {} not found on {}", item.id, day)))?;
        *slot = item;
        Ok(())
    }

    pub fn remove_item(&mut self, day: &str, id: &str) -> Result<ScheduleItem> {
        check_day(day)?;

        let items = self.day_mut(day);
        let index = items
            .iter()
            .position(|existing| existing.id == id)
            .ok_or_else(|| Error::NotFound(format!("Item {} not found on {}", id, day)))?;
        Ok(items.remove(index))
    }

    /// Set the item's end to `start + minutes`.
    pub fn apply_duration(&mut self, day: &str, id: &str, minutes: u32) -> Result<()> {
        check_day(day)?;

        let item = self
            .day_mut(day)
            .iter_mut()
            .find(|existing| existing.id == id)
            .ok_or_else(|| Error::NotFound(format!("Item {} not found on {}", id, day)))?;

        let start = clock::minutes_of_time(clock::parse_time(&item.start_time)?);
        let end = start.checked_add(minutes).filter(|end| *end < MINUTES_PER_DAY).ok_or_else(|| {
            Error::InvalidInput(format!(
                "A {} minute slot starting at {} would cross midnight",
                minutes, item.start_time
            ))
        })?;

        item.end_time = clock::format_minutes(end);
        Ok(())
    }

    /// Copy `day` onto the following weekday with fresh ids, replacing its items.
    pub fn clone_day(&mut self, day: &str) -> Result<&'static str> {
        check_day(day)?;
        let next = clock::next_day(day)
            .ok_or_else(|| Error::InvalidInput(format!("Unknown weekday '{}'", day)))?;

        let cloned = self
            .day(day)
            .iter()
            .map(|item| ScheduleItem { id: new_id(), ..item.clone() })
            .collect();
        self.set_day(next, cloned);
        Ok(next)
    }

    /// Ids of the day's items that overlap another item.
    pub fn conflicts(&self, day: &str) -> HashSet<String> {
        conflicts::detect_conflicts(self.day(day))
    }

    pub fn validate(&self) -> Result<()> {
        for (day, items) in self.iter() {
            check_day(day)?;
            for item in items {
                validate_item(item)?;
            }
        }
        Ok(())
    }
}
