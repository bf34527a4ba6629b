// Reminder evaluation
//
// A planned item with `reminder_minutes` is due exactly at
// `start - reminder_minutes`. The tracker makes sure each reminder fires at
// most once per item, day, and trigger minute, however often it is polled.

use std::collections::HashSet;

use chrono::{NaiveDate, NaiveDateTime};

use crate::clock;
use crate::types::ScheduleItem;

/// Minute of the day at which the item's reminder fires, if any.
///
/// Triggers that would fall before midnight (reminder longer than the
/// start offset) never fire.
pub fn trigger_minute(item: &ScheduleItem) -> Option<u32> {
    let reminder = item.reminder_minutes?;
    let start = clock::minutes_of_day(&item.start_time)?;
    start.checked_sub(reminder)
}

/// Items whose reminder fires at `minute_of_day`.
pub fn due_items(items: &[ScheduleItem], minute_of_day: u32) -> Vec<&ScheduleItem> {
    items.iter().filter(|item| trigger_minute(item) == Some(minute_of_day)).collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReminderKey {
    pub item_id: String,
    pub date: NaiveDate,
    pub trigger_minute: u32,
}

/// Remembers which reminders already fired.
#[derive(Debug, Default)]
pub struct ReminderTracker {
    fired: HashSet<ReminderKey>,
}

impl ReminderTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Items due at `now` that have not fired yet today. They are marked as fired.
    pub fn take_due(&mut self, items: &[ScheduleItem], now: NaiveDateTime) -> Vec<ScheduleItem> {
        let date = now.date();
        self.forget_before(date);

        let minute = clock::minutes_of_time(now.time());
        let mut fired = Vec::new();
        for item in due_items(items, minute) {
            let key = ReminderKey { item_id: item.id.clone(), date, trigger_minute: minute };
            if self.fired.insert(key) {
                fired.push(item.clone());
            }
        }
        fired
    }

    pub fn has_fired(&self, key: &ReminderKey) -> bool {
        self.fired.contains(key)
    }

    pub fn len(&self) -> usize {
        self.fired.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fired.is_empty()
    }

    fn forget_before(&mut self, date: NaiveDate) {
        self.fired.retain(|key| key.date >= date);
    }
}
