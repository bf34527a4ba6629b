use std::collections::HashSet;
use std::sync::Arc;

use timexp_common::clock::normalize_day;
use timexp_common::schedule::default_item;
use timexp_common::{Error, Result, ScheduleItem, Store, UserAccount, WeeklySchedule};
use tracing::{debug, info};

/// Edits of a user's recurring weekly template. Every change is validated and
/// saved back through the store before it is reported as done.
#[derive(Clone)]
pub struct ScheduleManager {
    store: Arc<dyn Store>,
}

fn weekday(day: &str) -> Result<&'static str> {
    normalize_day(day).ok_or_else(|| Error::InvalidInput(format!("Unknown weekday '{}'", day)))
}

impl ScheduleManager {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn schedule(&self, user_id: &str) -> Result<WeeklySchedule> {
        Ok(self.user(user_id).await?.weekly_schedule)
    }

    /// Add `item` to `day`, or the editor's default slot when `item` is `None`.
    pub async fn add_item(
        &self,
        user_id: &str,
        day: &str,
        item: Option<ScheduleItem>,
    ) -> Result<ScheduleItem> {
        let day = weekday(day)?;
        let item = item.unwrap_or_else(default_item);

        let added = item.clone();
        self.edit(user_id, |schedule| schedule.add_item(day, item)).await?;

        info!("Added '{}' to {} for {}", added.label, day, user_id);
        Ok(added)
    }

    pub async fn update_item(&self, user_id: &str, day: &str, item: ScheduleItem) -> Result<()> {
        let day = weekday(day)?;
        self.edit(user_id, |schedule| schedule.update_item(day, item)).await
    }

    pub async fn remove_item(&self, user_id: &str, day: &str, id: &str) -> Result<ScheduleItem> {
        let day = weekday(day)?;
        let removed = self.edit(user_id, |schedule| schedule.remove_item(day, id)).await?;

        info!("Removed '{}' from {} for {}", removed.label, day, user_id);
        Ok(removed)
    }

    pub async fn apply_duration(
        &self,
        user_id: &str,
        day: &str,
        id: &str,
        minutes: u32,
    ) -> Result<()> {
        let day = weekday(day)?;
        self.edit(user_id, |schedule| schedule.apply_duration(day, id, minutes)).await
    }

    /// Copy `day` onto the next weekday. Returns the name of the overwritten day.
    pub async fn clone_day(&self, user_id: &str, day: &str) -> Result<&'static str> {
        let day = weekday(day)?;
        let target = self.edit(user_id, |schedule| schedule.clone_day(day)).await?;

        info!("Cloned {} onto {} for {}", day, target, user_id);
        Ok(target)
    }

    pub async fn conflicts(&self, user_id: &str, day: &str) -> Result<HashSet<String>> {
        let day = weekday(day)?;
        Ok(self.schedule(user_id).await?.conflicts(day))
    }

    async fn edit<T, F>(&self, user_id: &str, change: F) -> Result<T>
    where
        F: FnOnce(&mut WeeklySchedule) -> Result<T> + Send,
    {
        let mut user = self.user(user_id).await?;
        let result = change(&mut user.weekly_schedule)?;
        self.store.save_user(&user).await?;

        debug!("Saved weekly schedule for {}", user_id);
        Ok(result)
    }

    async fn user(&self, user_id: &str) -> Result<UserAccount> {
        self.store
            .get_user_profile(user_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("User {} not found", user_id)))
    }
}
