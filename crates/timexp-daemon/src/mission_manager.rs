use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use timexp_common::schedule::validate_item;
use timexp_common::xp::apply_award;
use timexp_common::{
    new_id, DailyLog, Error, Result, ScheduleItem, Store, UserAccount, XpAward, XpEvent,
};
use tracing::{info, warn};

use crate::log_manager::DailyLogManager;
use crate::notification_manager::NotificationManager;

pub const FULFILLMENT_NOTES: &str = "Objective accomplished according to plan.";

/// Result of a completion action: the saved log and the XP credited for it.
#[derive(Debug, Clone, Serialize)]
pub struct MissionOutcome {
    pub log: DailyLog,
    pub award: XpAward,
}

/// Mutations of a day's actual activities, with the XP that goes with them.
#[derive(Clone)]
pub struct MissionManager {
    store: Arc<dyn Store>,
    logs: DailyLogManager,
    notifications: Option<NotificationManager>,
}

impl MissionManager {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { logs: DailyLogManager::new(store.clone()), store, notifications: None }
    }

    pub fn with_notifications(mut self, notifications: NotificationManager) -> Self {
        self.notifications = Some(notifications);
        self
    }

    /// Record the planned item `planned_id` as done on `date` and award +50 XP.
    pub async fn fulfill_planned(
        &self,
        user_id: &str,
        date: NaiveDate,
        planned_id: &str,
    ) -> Result<MissionOutcome> {
        let (mut user, mut log) = self.logs.user_and_log(user_id, date).await?;

        let planned = log.planned(planned_id).cloned().ok_or_else(|| {
            Error::NotFound(format!("Planned item {} not found on {}", planned_id, date))
        })?;
        if log.is_fulfilled(planned_id) {
            return Err(Error::AlreadyFulfilled(planned_id.to_string()));
        }

        log.actual_activities.push(ScheduleItem {
            id: new_id(),
            planned_id: Some(planned.id.clone()),
            completed: Some(true),
            notes: Some(FULFILLMENT_NOTES.to_string()),
            ..planned
        });
        let award = self.commit(&mut user, &mut log, XpEvent::PlannedFulfilled).await?;

        info!("{} fulfilled {} on {} (+{} XP)", user.handle, planned_id, date, award.amount);
        self.notify(user_id, &award).await;

        Ok(MissionOutcome { log, award })
    }

    /// Append an unplanned entry to `date` and award +25 XP.
    pub async fn log_spontaneous(
        &self,
        user_id: &str,
        date: NaiveDate,
        mut item: ScheduleItem,
    ) -> Result<MissionOutcome> {
        validate_item(&item)?;
        let (mut user, mut log) = self.logs.user_and_log(user_id, date).await?;

        if item.id.is_empty() || log.actual_activities.iter().any(|a| a.id == item.id) {
            item.id = new_id();
        }
        item.planned_id = None;
        item.completed = Some(true);
        let label = item.label.clone();

        log.actual_activities.push(item);
        let award = self.commit(&mut user, &mut log, XpEvent::SpontaneousLogged).await?;

        info!("{} logged '{}' on {} (+{} XP)", user.handle, label, date, award.amount);
        self.notify(user_id, &award).await;

        Ok(MissionOutcome { log, award })
    }

    /// Replace an actual entry with the same id, or failing that a snapshot entry.
    pub async fn update_entry(
        &self,
        user_id: &str,
        date: NaiveDate,
        item: ScheduleItem,
    ) -> Result<DailyLog> {
        validate_item(&item)?;
        let (_, mut log) = self.logs.user_and_log(user_id, date).await?;

        let slot = match log.actual_activities.iter_mut().find(|a| a.id == item.id) {
            Some(slot) => slot,
            None => log.planned_snapshot.iter_mut().find(|p| p.id == item.id).ok_or_else(|| {
                Error::NotFound(format!("Entry {} not found on {}", item.id, date))
            })?,
        };
        *slot = item;

        self.store.save_daily_log(&log).await?;
        Ok(log)
    }

    /// Remove an entry from the actuals, or failing that from the snapshot. XP is kept.
    pub async fn remove_entry(&self, user_id: &str, date: NaiveDate, id: &str) -> Result<DailyLog> {
        let (_, mut log) = self.logs.user_and_log(user_id, date).await?;

        if let Some(index) = log.actual_activities.iter().position(|a| a.id == id) {
            log.actual_activities.remove(index);
        } else if let Some(index) = log.planned_snapshot.iter().position(|p| p.id == id) {
            log.planned_snapshot.remove(index);
        } else {
            return Err(Error::NotFound(format!("Entry {} not found on {}", id, date)));
        }

        self.store.save_daily_log(&log).await?;
        info!("Removed entry {} from {} on {}", id, user_id, date);
        Ok(log)
    }

    /// Save `log` with its newly pushed entry, then credit the XP for it.
    /// When the XP cannot be saved the entry is taken back out of the stored log,
    /// so a retry is not refused as already fulfilled.
    async fn commit(
        &self,
        user: &mut UserAccount,
        log: &mut DailyLog,
        event: XpEvent,
    ) -> Result<XpAward> {
        self.store.save_daily_log(log).await?;

        let previous_xp = user.xp;
        let award = apply_award(user, event);
        if let Err(e) = self.store.save_user(user).await {
            user.xp = previous_xp;
            log.actual_activities.pop();
            if let Err(revert) = self.store.save_daily_log(log).await {
                warn!("Failed to roll back entry for {} on {}: {}", user.id, log.date, revert);
            }
            return Err(e);
        }

        Ok(award)
    }

    async fn notify(&self, user_id: &str, award: &XpAward) {
        let Some(notifications) = &self.notifications else {
            return;
        };

        let mut pending =
            vec![NotificationManager::create_xp_awarded_notification(user_id, award)];
        if award.leveled_up {
            pending.push(NotificationManager::create_level_up_notification(user_id, award.level));
        }

        for notification in pending {
            if let Err(e) = notifications.send_notification(notification).await {
                warn!("Failed to queue XP notification: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    use async_trait::async_trait;
    use timexp_common::{ActivityCategory, LogStore, MemoryStore, UserRole, UserStore};

    /// Memory store whose user saves can be made to fail while log saves keep working.
    #[derive(Default)]
    struct FlakyUserSaves {
        inner: MemoryStore,
        fail_user_saves: AtomicBool,
    }

    #[async_trait]
    impl UserStore for FlakyUserSaves {
        async fn get_users(&self) -> Result<Vec<UserAccount>> {
            self.inner.get_users().await
        }

        async fn get_user_profile(&self, id: &str) -> Result<Option<UserAccount>> {
            self.inner.get_user_profile(id).await
        }

        async fn save_user(&self, user: &UserAccount) -> Result<()> {
            if self.fail_user_saves.load(Ordering::SeqCst) {
                return Err(Error::StoreUnavailable("user table locked".to_string()));
            }
            self.inner.save_user(user).await
        }

        async fn delete_user(&self, id: &str) -> Result<()> {
            self.inner.delete_user(id).await
        }
    }

    #[async_trait]
    impl LogStore for FlakyUserSaves {
        async fn get_daily_logs(&self, user_id: &str) -> Result<Vec<DailyLog>> {
            self.inner.get_daily_logs(user_id).await
        }

        async fn save_daily_log(&self, log: &DailyLog) -> Result<()> {
            self.inner.save_daily_log(log).await
        }
    }

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 4).unwrap()
    }

    async fn setup() -> (Arc<MemoryStore>, MissionManager, String) {
        let store = Arc::new(MemoryStore::new());
        let mut user = UserAccount::new("alex", "Alex", UserRole::Student);
        user.weekly_schedule.day_mut("Monday").push(
            ScheduleItem::new(ActivityCategory::Studying, "08:00", "09:00", "Math").with_id("m1"),
        );
        store.save_user(&user).await.unwrap();
        (store.clone(), MissionManager::new(store), user.id)
    }

    fn evening_walk() -> ScheduleItem {
        ScheduleItem::new(ActivityCategory::Exercise, "14:00", "15:00", "Walk")
    }

    #[tokio::test]
    async fn test_fulfill_then_spontaneous_accumulates_xp() {
        let (store, missions, user_id) = setup().await;

        let outcome = missions.fulfill_planned(&user_id, monday(), "m1").await.unwrap();
        assert_eq!(outcome.award.new_total, 50);
        let entry = &outcome.log.actual_activities[0];
        assert_eq!(entry.planned_id.as_deref(), Some("m1"));
        assert_ne!(entry.id, "m1");
        assert_eq!(entry.notes.as_deref(), Some(FULFILLMENT_NOTES));

        let outcome = missions.log_spontaneous(&user_id, monday(), evening_walk()).await.unwrap();
        assert_eq!(outcome.award.new_total, 75);
        assert_eq!(outcome.award.reason, "Spontaneous Productivity");

        let user = store.get_user_profile(&user_id).await.unwrap().unwrap();
        assert_eq!(user.xp, 75);
    }

    #[tokio::test]
    async fn test_second_fulfillment_rejected_without_xp() {
        let (store, missions, user_id) = setup().await;

        missions.fulfill_planned(&user_id, monday(), "m1").await.unwrap();
        let result = missions.fulfill_planned(&user_id, monday(), "m1").await;

        assert!(matches!(result, Err(Error::AlreadyFulfilled(_))));
        let user = store.get_user_profile(&user_id).await.unwrap().unwrap();
        assert_eq!(user.xp, 50);
    }

    #[tokio::test]
    async fn test_fulfill_unknown_planned_item() {
        let (_store, missions, user_id) = setup().await;

        let result = missions.fulfill_planned(&user_id, monday(), "nope").await;
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[tokio::test]
    async fn test_spontaneous_cross_midnight_rejected() {
        let (_store, missions, user_id) = setup().await;

        let item = ScheduleItem::new(ActivityCategory::Rest, "23:00", "01:00", "Late");
        let result = missions.log_spontaneous(&user_id, monday(), item).await;
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_update_and_remove_entries() {
        let (_store, missions, user_id) = setup().await;

        let outcome = missions.log_spontaneous(&user_id, monday(), evening_walk()).await.unwrap();
        let mut entry = outcome.log.actual_activities[0].clone();
        entry.notes = Some("Felt great".to_string());

        let log = missions.update_entry(&user_id, monday(), entry.clone()).await.unwrap();
        assert_eq!(log.actual_activities[0].notes.as_deref(), Some("Felt great"));

        let log = missions.remove_entry(&user_id, monday(), &entry.id).await.unwrap();
        assert!(log.actual_activities.is_empty());

        let log = missions.remove_entry(&user_id, monday(), "m1").await.unwrap();
        assert!(log.planned_snapshot.is_empty());

        let result = missions.remove_entry(&user_id, monday(), "m1").await;
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[tokio::test]
    async fn test_failed_save_is_reported() {
        let (store, missions, user_id) = setup().await;
        store.set_offline(true);

        let result = missions.fulfill_planned(&user_id, monday(), "m1").await;
        assert!(matches!(result, Err(Error::StoreUnavailable(_))));
    }

    #[tokio::test]
    async fn test_notifications_are_optional() {
        let (_store, missions, user_id) = setup().await;
        let missions = missions.with_notifications(NotificationManager::headless());

        let outcome = missions.fulfill_planned(&user_id, monday(), "m1").await.unwrap();
        assert_eq!(outcome.award.amount, 50);
    }

    #[tokio::test]
    async fn test_failed_xp_save_allows_retry() {
        let store = Arc::new(FlakyUserSaves::default());
        let mut user = UserAccount::new("alex", "Alex", UserRole::Student);
        user.weekly_schedule.day_mut("Monday").push(
            ScheduleItem::new(ActivityCategory::Studying, "08:00", "09:00", "Math").with_id("m1"),
        );
        store.save_user(&user).await.unwrap();
        let missions = MissionManager::new(store.clone());

        store.fail_user_saves.store(true, Ordering::SeqCst);
        let result = missions.fulfill_planned(&user.id, monday(), "m1").await;
        assert!(matches!(result, Err(Error::StoreUnavailable(_))));

        let log = store.get_daily_log(&user.id, monday()).await.unwrap().unwrap();
        assert!(!log.is_fulfilled("m1"));

        let result = missions.log_spontaneous(&user.id, monday(), evening_walk()).await;
        assert!(result.is_err());
        let log = store.get_daily_log(&user.id, monday()).await.unwrap().unwrap();
        assert!(log.actual_activities.is_empty());

        store.fail_user_saves.store(false, Ordering::SeqCst);
        let outcome = missions.fulfill_planned(&user.id, monday(), "m1").await.unwrap();
        assert_eq!(outcome.award.new_total, 50);
        assert_eq!(store.get_user_profile(&user.id).await.unwrap().unwrap().xp, 50);
    }
}
