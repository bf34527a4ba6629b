use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use serde::Serialize;
use timexp_common::reconcile::log_sync_score;
use timexp_common::{
    DailyLog, Error, ReconciledDay, Result, ScheduleItem, Store, UserAccount, WeeklySchedule,
};
use tracing::{debug, info};

pub const DEFAULT_HISTORY_DAYS: u32 = 30;

/// Ensures there is exactly one daily log per user and date.
#[derive(Clone)]
pub struct DailyLogManager {
    store: Arc<dyn Store>,
}

/// Everything needed to render one day.
#[derive(Debug, Clone, Serialize)]
pub struct DayView {
    pub log: DailyLog,
    pub day: ReconciledDay,
    /// Live template items added after the log was created. Only filled for today
    /// and never counted in the sync score.
    pub unsnapshotted: Vec<ScheduleItem>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Intensity {
    High,
    Medium,
    Low,
}

impl Intensity {
    pub fn from_score(score: u8) -> Self {
        if score >= 80 {
            Intensity::High
        } else if score >= 50 {
            Intensity::Medium
        } else {
            Intensity::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Intensity::High => "HIGH",
            Intensity::Medium => "MEDIUM",
            Intensity::Low => "LOW",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryDay {
    pub date: NaiveDate,
    /// `None` when no log exists for the date.
    pub sync_score: Option<u8>,
    pub intensity: Option<Intensity>,
}

impl DailyLogManager {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Return the stored log for `(user_id, date)`, creating it from `template` when missing.
    ///
    /// An existing log is returned as stored; its planned snapshot is not
    /// refreshed from the template.
    pub async fn get_or_create_log(
        &self,
        user_id: &str,
        date: NaiveDate,
        template: &WeeklySchedule,
    ) -> Result<DailyLog> {
        if let Some(log) = self.store.get_daily_log(user_id, date).await? {
            debug!("Found daily log {} for {} on {}", log.id, user_id, date);
            return Ok(log);
        }

        let log = DailyLog::new(user_id, date, template.for_date(date));
        self.store.save_daily_log(&log).await?;

        info!(
            "Created daily log {} for {} on {} with {} planned items",
            log.id,
            user_id,
            date,
            log.planned_snapshot.len()
        );
        Ok(log)
    }

    /// Load the user and their log for `date`.
    pub async fn user_and_log(
        &self,
        user_id: &str,
        date: NaiveDate,
    ) -> Result<(UserAccount, DailyLog)> {
        let user = self.user(user_id).await?;
        let log = self.get_or_create_log(user_id, date, &user.weekly_schedule).await?;
        Ok((user, log))
    }

    pub async fn day_view(&self, user_id: &str, date: NaiveDate, today: NaiveDate) -> Result<DayView> {
        let (user, log) = self.user_and_log(user_id, date).await?;
        let day = ReconciledDay::from_log(&log);

        let unsnapshotted = if date == today {
            user.weekly_schedule
                .for_date(date)
                .iter()
                .filter(|item| log.planned(&item.id).is_none())
                .cloned()
                .collect()
        } else {
            Vec::new()
        };

        Ok(DayView { log, day, unsnapshotted })
    }

    /// Sync scores for the `days` dates ending at `end`, oldest first.
    pub async fn history(&self, user_id: &str, end: NaiveDate, days: u32) -> Result<Vec<HistoryDay>> {
        let logs: HashMap<NaiveDate, DailyLog> = self
            .store
            .get_daily_logs(user_id)
            .await?
            .into_iter()
            .map(|log| (log.date, log))
            .collect();

        let history = (0..i64::from(days))
            .rev()
            .map(|offset| {
                let date = end - Duration::days(offset);
                let sync_score = logs.get(&date).map(log_sync_score);
                HistoryDay { date, sync_score, intensity: sync_score.map(Intensity::from_score) }
            })
            .collect();

        Ok(history)
    }

    async fn user(&self, user_id: &str) -> Result<UserAccount> {
        self.store
            .get_user_profile(user_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("User {} not found", user_id)))
    }
}
