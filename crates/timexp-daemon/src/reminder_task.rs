use std::sync::Arc;

use anyhow::Result;
use chrono::NaiveDateTime;
use timexp_common::reminders::ReminderTracker;
use timexp_common::Store;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::notification_manager::NotificationManager;

/// Periodic check of every user's live template for reminders that are due.
pub struct ReminderTask {
    store: Arc<dyn Store>,
    notifications: NotificationManager,
    tracker: Arc<RwLock<ReminderTracker>>,
}

impl ReminderTask {
    pub fn new(store: Arc<dyn Store>, notifications: NotificationManager) -> Self {
        Self { store, notifications, tracker: Arc::new(RwLock::new(ReminderTracker::new())) }
    }

    /// Run one iteration at local time `now`. Returns how many reminders were sent.
    pub async fn check_and_notify(&self, now: NaiveDateTime) -> Result<usize> {
        let users = self.store.get_users().await?;
        let mut tracker = self.tracker.write().await;
        let mut sent = 0;

        for user in &users {
            let items = user.weekly_schedule.for_date(now.date());
            for item in tracker.take_due(items, now) {
                info!("Reminder for {}: '{}' at {}", user.handle, item.label, item.start_time);
                let notification =
                    NotificationManager::create_mission_reminder_notification(&user.id, &item);
                self.notifications.send_notification(notification).await?;
                sent += 1;
            }
        }

        debug!("Reminder check at {} sent {} notifications", now, sent);
        Ok(sent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use timexp_common::{
        ActivityCategory, MemoryStore, ScheduleItem, UserAccount, UserRole, UserStore,
    };

    fn monday_at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 4).unwrap().and_hms_opt(hour, minute, 0).unwrap()
    }

    async fn setup() -> ReminderTask {
        let store = Arc::new(MemoryStore::new());
        let mut user = UserAccount::new("alex", "Alex", UserRole::Student);
        user.weekly_schedule.day_mut("Monday").push(
            ScheduleItem::new(ActivityCategory::Studying, "08:00", "09:00", "Math")
                .with_id("m1")
                .with_reminder(10),
        );
        user.weekly_schedule.day_mut("Monday").push(
            ScheduleItem::new(ActivityCategory::Reading, "07:50", "08:30", "Novel").with_id("m2"),
        );
        store.save_user(&user).await.unwrap();

        ReminderTask::new(store, NotificationManager::headless())
    }

    #[tokio::test]
    async fn test_reminder_fires_once_per_day() {
        let task = setup().await;

        assert_eq!(task.check_and_notify(monday_at(7, 49)).await.unwrap(), 0);
        assert_eq!(task.check_and_notify(monday_at(7, 50)).await.unwrap(), 1);
        assert_eq!(task.check_and_notify(monday_at(7, 50)).await.unwrap(), 0);
        assert_eq!(task.check_and_notify(monday_at(7, 51)).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_other_weekday_has_no_reminders() {
        let task = setup().await;
        let tuesday = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap().and_hms_opt(7, 50, 0).unwrap();

        assert_eq!(task.check_and_notify(tuesday).await.unwrap(), 0);
    }
}
