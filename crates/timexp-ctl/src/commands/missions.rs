use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use timexp_common::schedule::new_manual_entry;
use timexp_common::{ActivityCategory, XpAward};
use timexp_daemon::{Daemon, NotificationManager};

use crate::auth::Session;
use crate::commands::{format_entry, format_item};

/// Overrides for a logged spontaneous entry; unset fields keep the draft's values.
#[derive(Debug, Default)]
pub struct EntryFields {
    pub label: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub category: Option<String>,
    pub subject: Option<String>,
    pub notes: Option<String>,
}

fn print_award(award: &XpAward) {
    println!("⭐ +{} XP: {} (total {}, level {})", award.amount, award.reason, award.new_total, award.level);
    if award.leveled_up {
        println!("🎉 Level up! You are now level {}.", award.level);
    }
}

pub async fn today(daemon: &Daemon, date: NaiveDate) -> Result<()> {
    let session = Session::require()?;
    let view = daemon.logs().day_view(&session.user_id, date, Local::now().date_naive()).await?;

    println!("\n🛰️  Mission Log for {} ({})", date, date.format("%A"));
    println!("═══════════════════════════════════════════════\n");
    if view.day.timeline.is_empty() {
        println!("No missions planned or logged.");
    }
    for entry in &view.day.timeline {
        println!("{}", format_entry(entry));
    }

    println!();
    println!("Sync score:  {}%", view.day.sync_score);
    println!("Pending:     {}", view.day.pending);
    println!("Spontaneous: {}", view.day.spontaneous);

    if !view.unsnapshotted.is_empty() {
        println!("\n📝 Added to the blueprint after this log was created (not scored):");
        for item in &view.unsnapshotted {
            println!("   {}", format_item(item));
        }
    }
    Ok(())
}

pub async fn fulfill(daemon: &Daemon, date: NaiveDate, planned_id: &str) -> Result<()> {
    let session = Session::require()?;
    let missions = daemon.missions().with_notifications(NotificationManager::headless());
    let outcome = missions.fulfill_planned(&session.user_id, date, planned_id).await?;

    println!("✅ Mission {} accomplished on {}", planned_id, date);
    print_award(&outcome.award);
    Ok(())
}

pub async fn log(daemon: &Daemon, date: NaiveDate, fields: EntryFields) -> Result<()> {
    let session = Session::require()?;

    let mut item = new_manual_entry(Local::now().time());
    if let Some(label) = fields.label {
        item.label = label;
    }
    if let Some(start) = fields.start {
        item.start_time = start;
    }
    if let Some(end) = fields.end {
        item.end_time = end;
    }
    if let Some(category) = fields.category.as_deref() {
        item.category = ActivityCategory::parse(category)
            .with_context(|| format!("Unknown category '{}'", category))?;
    }
    item.actual_subject = fields.subject;
    item.notes = fields.notes;

    let missions = daemon.missions().with_notifications(NotificationManager::headless());
    let outcome = missions.log_spontaneous(&session.user_id, date, item).await?;

    if let Some(entry) = outcome.log.actual_activities.last() {
        println!("📌 Logged {}", format_item(entry));
    }
    print_award(&outcome.award);
    Ok(())
}

pub async fn remove(daemon: &Daemon, date: NaiveDate, id: &str) -> Result<()> {
    let session = Session::require()?;
    daemon.missions().remove_entry(&session.user_id, date, id).await?;

    println!("➖ Removed entry {} from {}", id, date);
    Ok(())
}

pub async fn history(daemon: &Daemon, end: NaiveDate, days: u32) -> Result<()> {
    let session = Session::require()?;
    let history = daemon.logs().history(&session.user_id, end, days).await?;

    println!("\n📈 Sync History ({} days ending {})", days, end);
    println!("═══════════════════════════════════════════════\n");
    for day in &history {
        match (day.sync_score, day.intensity) {
            (Some(score), Some(intensity)) => {
                println!("{} {}  {:>3}%  {}", day.date, day.date.format("%a"), score, intensity.as_str())
            }
            _ => println!("{} {}     -", day.date, day.date.format("%a")),
        }
    }

    let scored: Vec<u32> = history.iter().filter_map(|d| d.sync_score).map(u32::from).collect();
    if !scored.is_empty() {
        let average = scored.iter().sum::<u32>() / scored.len() as u32;
        println!("\nAverage sync: {}% over {} logged days", average, scored.len());
    }
    Ok(())
}
