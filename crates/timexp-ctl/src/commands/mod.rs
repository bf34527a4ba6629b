pub mod account;
pub mod advice;
pub mod family;
pub mod missions;
pub mod schedule;
pub mod seed;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use timexp_common::{ItemStatus, ScheduleItem, TimelineEntry};

/// `--date` value, defaulting to today in local time.
pub fn resolve_date(date: Option<&str>) -> Result<NaiveDate> {
    match date {
        Some(value) => NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", value)),
        None => Ok(Local::now().date_naive()),
    }
}

pub fn format_item(item: &ScheduleItem) -> String {
    let subject = item
        .actual_subject
        .as_deref()
        .or(item.planned_subject.as_deref())
        .map(|s| format!(" [{}]", s))
        .unwrap_or_default();
    format!(
        "{}-{} {:<10} {}{} ({})  id={}",
        item.start_time,
        item.end_time,
        item.category.as_str(),
        item.label,
        subject,
        item.duration_label(),
        item.id
    )
}

pub fn format_entry(entry: &TimelineEntry) -> String {
    let marker = match entry.status {
        ItemStatus::Logged => "✅",
        ItemStatus::Pending => "⏳",
    };
    let kind = if entry.item.is_fulfillment() || entry.status == ItemStatus::Pending {
        ""
    } else {
        " (spontaneous)"
    };
    format!("{} {}{}", marker, format_item(&entry.item), kind)
}
