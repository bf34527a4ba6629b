// Persistence boundary
//
// Managers talk to storage only through these traits. Saves are upserts:
// users are keyed by id, daily logs by `(user_id, date)`.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::RwLock;

use crate::error::{Error, Result};
use crate::types::{DailyLog, UserAccount};

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn get_users(&self) -> Result<Vec<UserAccount>>;

    /// `Ok(None)` when no account has this id.
    async fn get_user_profile(&self, id: &str) -> Result<Option<UserAccount>>;

    async fn save_user(&self, user: &UserAccount) -> Result<()>;

    /// Removes the account and every daily log it owns.
    async fn delete_user(&self, id: &str) -> Result<()>;

    async fn get_user_by_handle(&self, handle: &str) -> Result<Option<UserAccount>> {
        let handle = crate::types::normalize_handle(handle);
        Ok(self.get_users().await?.into_iter().find(|u| u.handle == handle))
    }

    async fn get_children(&self, parent_id: &str) -> Result<Vec<UserAccount>> {
        Ok(self
            .get_users()
            .await?
            .into_iter()
            .filter(|u| u.parent_id.as_deref() == Some(parent_id))
            .collect())
    }
}

#[async_trait]
pub trait LogStore: Send + Sync {
    /// All logs of a user, newest date first.
    async fn get_daily_logs(&self, user_id: &str) -> Result<Vec<DailyLog>>;

    async fn save_daily_log(&self, log: &DailyLog) -> Result<()>;

    async fn get_daily_log(&self, user_id: &str, date: NaiveDate) -> Result<Option<DailyLog>> {
        Ok(self.get_daily_logs(user_id).await?.into_iter().find(|l| l.date == date))
    }
}

/// Combined store handed to managers.
pub trait Store: UserStore + LogStore {}

impl<T: UserStore + LogStore> Store for T {}

/// Process-local store, used for tests and offline operation.
#[derive(Debug, Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<String, UserAccount>>,
    logs: RwLock<HashMap<(String, NaiveDate), DailyLog>>,
    offline: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate the store becoming unreachable; every call then fails.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn check_online(&self) -> Result<()> {
        if self.offline.load(Ordering::SeqCst) {
            Err(Error::StoreUnavailable("memory store is offline".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn get_users(&self) -> Result<Vec<UserAccount>> {
        self.check_online()?;
        let mut users: Vec<UserAccount> = self.users.read().await.values().cloned().collect();
        users.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(users)
    }

    async fn get_user_profile(&self, id: &str) -> Result<Option<UserAccount>> {
        self.check_online()?;
        Ok(self.users.read().await.get(id).cloned())
    }

    async fn save_user(&self, user: &UserAccount) -> Result<()> {
        self.check_online()?;
        self.users.write().await.insert(user.id.clone(), user.clone());
        Ok(())
    }

    async fn delete_user(&self, id: &str) -> Result<()> {
        self.check_online()?;
        self.users.write().await.remove(id);
        self.logs.write().await.retain(|(user_id, _), _| user_id != id);
        Ok(())
    }
}

#[async_trait]
impl LogStore for MemoryStore {
    async fn get_daily_logs(&self, user_id: &str) -> Result<Vec<DailyLog>> {
        self.check_online()?;
        let mut logs: Vec<DailyLog> = self
            .logs
            .read()
            .await
            .values()
            .filter(|log| log.user_id == user_id)
            .cloned()
            .collect();
        logs.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(logs)
    }

    async fn save_daily_log(&self, log: &DailyLog) -> Result<()> {
        self.check_online()?;
        let key = (log.user_id.clone(), log.date);
        let mut logs = self.logs.write().await;
        match logs.get_mut(&key) {
            // upsert on (user_id, date) keeps the original id
            Some(existing) => {
                existing.planned_snapshot = log.planned_snapshot.clone();
                existing.actual_activities = log.actual_activities.clone();
            }
            None => {
                logs.insert(key, log.clone());
            }
        }
        Ok(())
    }

    async fn get_daily_log(&self, user_id: &str, date: NaiveDate) -> Result<Option<DailyLog>> {
        self.check_online()?;
        Ok(self.logs.read().await.get(&(user_id.to_string(), date)).cloned())
    }
}
