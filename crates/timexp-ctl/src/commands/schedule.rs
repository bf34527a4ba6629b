use anyhow::{Context, Result};
use timexp_common::clock::{add_minutes, normalize_day};
use timexp_common::schedule::DURATION_CHOICES;
use timexp_common::{ActivityCategory, ScheduleItem, WEEKDAYS};
use timexp_daemon::Daemon;

use crate::auth::Session;
use crate::commands::format_item;

/// Fields for a new template slot; all unset means the editor default.
#[derive(Debug, Default)]
pub struct NewItem {
    pub label: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub category: Option<String>,
    pub subject: Option<String>,
    pub reminder: Option<u32>,
}

impl NewItem {
    fn into_item(self) -> Result<Option<ScheduleItem>> {
        if self.label.is_none() && self.start.is_none() {
            return Ok(None);
        }

        let category = match self.category.as_deref() {
            Some(value) => ActivityCategory::parse(value)
                .with_context(|| format!("Unknown category '{}'", value))?,
            None => ActivityCategory::Studying,
        };
        let start = self.start.unwrap_or_else(|| "08:00".to_string());
        let end = match self.end {
            Some(end) => end,
            None => add_minutes(&start, 60)?,
        };
        let label = self.label.unwrap_or_else(|| "New Mission Target".to_string());

        let mut item = ScheduleItem::new(category, start, end, label);
        item.planned_subject = self.subject;
        item.reminder_minutes = self.reminder;
        Ok(Some(item))
    }
}

pub async fn show(daemon: &Daemon, day: Option<&str>) -> Result<()> {
    let session = Session::require()?;
    let schedule = daemon.schedules().schedule(&session.user_id).await?;

    let days: Vec<&str> = match day {
        Some(day) => vec![normalize_day(day).with_context(|| format!("Unknown weekday '{}'", day))?],
        None => WEEKDAYS.to_vec(),
    };

    println!("\n🗓️  Weekly Blueprint for {}", session.handle);
    println!("═══════════════════════════════════════════════");
    for day in days {
        let mut items = schedule.day(day).to_vec();
        items.sort_by(|a, b| a.sort_key().cmp(b.sort_key()));
        let conflicts = schedule.conflicts(day);

        println!("\n{}", day);
        if items.is_empty() {
            println!("  (no missions)");
        }
        for item in &items {
            let flag = if conflicts.contains(&item.id) { "⚠️ " } else { "  " };
            println!("{} {}", flag, format_item(item));
        }
    }
    Ok(())
}

pub async fn add(daemon: &Daemon, day: &str, fields: NewItem) -> Result<()> {
    let session = Session::require()?;
    let item = daemon.schedules().add_item(&session.user_id, day, fields.into_item()?).await?;

    println!("➕ Added {}", format_item(&item));
    report_conflicts(daemon, &session, day).await
}

pub async fn remove(daemon: &Daemon, day: &str, id: &str) -> Result<()> {
    let session = Session::require()?;
    let removed = daemon.schedules().remove_item(&session.user_id, day, id).await?;

    println!("➖ Removed {}", format_item(&removed));
    Ok(())
}

pub async fn duration(daemon: &Daemon, day: &str, id: &str, minutes: u32) -> Result<()> {
    if !DURATION_CHOICES.contains(&minutes) {
        anyhow::bail!("Duration must be one of {:?} minutes", DURATION_CHOICES);
    }

    let session = Session::require()?;
    daemon.schedules().apply_duration(&session.user_id, day, id, minutes).await?;

    println!("⏱️  Set {} to {} minutes", id, minutes);
    report_conflicts(daemon, &session, day).await
}

pub async fn clone_day(daemon: &Daemon, day: &str) -> Result<()> {
    let session = Session::require()?;
    let target = daemon.schedules().clone_day(&session.user_id, day).await?;

    println!("📋 Copied {} onto {}", day, target);
    Ok(())
}

pub async fn conflicts(daemon: &Daemon, day: &str) -> Result<()> {
    let session = Session::require()?;
    report_conflicts(daemon, &session, day).await
}

async fn report_conflicts(daemon: &Daemon, session: &Session, day: &str) -> Result<()> {
    let conflicts = daemon.schedules().conflicts(&session.user_id, day).await?;
    if conflicts.is_empty() {
        println!("No scheduling conflicts.");
        return Ok(());
    }

    let schedule = daemon.schedules().schedule(&session.user_id).await?;
    let day = normalize_day(day).unwrap_or("Monday");
    println!("⚠️  {} overlapping missions:", conflicts.len());
    for item in schedule.day(day).iter().filter(|item| conflicts.contains(&item.id)) {
        println!("   {}", format_item(item));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_fields_mean_default_item() {
        assert!(NewItem::default().into_item().unwrap().is_none());
    }

    #[test]
    fn test_end_defaults_to_one_hour() {
        let fields = NewItem {
            label: Some("Chess".to_string()),
            start: Some("17:15".to_string()),
            category: Some("playtime".to_string()),
            ..NewItem::default()
        };

        let item = fields.into_item().unwrap().unwrap();
        assert_eq!(item.end_time, "18:15");
        assert_eq!(item.category, ActivityCategory::Playtime);
    }

    #[test]
    fn test_unknown_category() {
        let fields = NewItem { label: Some("x".to_string()), category: Some("gaming".to_string()), ..NewItem::default() };
        assert!(fields.into_item().is_err());
    }
}
