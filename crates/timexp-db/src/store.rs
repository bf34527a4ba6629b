// Store implementation backed by SQLite.

use async_trait::async_trait;
use chrono::NaiveDate;
use timexp_common::{DailyLog, LogStore, UserAccount, UserStore};
use tracing::debug;

use crate::connection::Database;
use crate::error::DbError;
use crate::models::{NewDailyLog, NewProfile};
use crate::queries::{DailyLogQueries, ProfileQueries};

#[derive(Clone)]
pub struct SqliteStore {
    db: Database,
}

impl SqliteStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }
}

fn found<T>(result: crate::Result<T>) -> crate::Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(DbError::NotFound(_)) => Ok(None),
        Err(e) => Err(e),
    }
}

#[async_trait]
impl UserStore for SqliteStore {
    async fn get_users(&self) -> timexp_common::Result<Vec<UserAccount>> {
        let rows = ProfileQueries::list_all(&self.db).await?;
        rows.into_iter()
            .map(|row| UserAccount::try_from(row).map_err(Into::into))
            .collect()
    }

    async fn get_user_profile(&self, id: &str) -> timexp_common::Result<Option<UserAccount>> {
        match found(ProfileQueries::get_by_id(&self.db, id).await)? {
            Some(row) => Ok(Some(UserAccount::try_from(row)?)),
            None => Ok(None),
        }
    }

    async fn save_user(&self, user: &UserAccount) -> timexp_common::Result<()> {
        ProfileQueries::upsert(&self.db, NewProfile::from_account(user)?).await?;
        debug!("Saved profile {}", user.id);
        Ok(())
    }

    async fn delete_user(&self, id: &str) -> timexp_common::Result<()> {
        let removed = DailyLogQueries::delete_by_user(&self.db, id).await?;
        found(ProfileQueries::delete(&self.db, id).await)?;
        debug!("Deleted profile {} with {} logs", id, removed);
        Ok(())
    }

    async fn get_user_by_handle(&self, handle: &str) -> timexp_common::Result<Option<UserAccount>> {
        let handle = timexp_common::normalize_handle(handle);
        match found(ProfileQueries::get_by_handle(&self.db, &handle).await)? {
            Some(row) => Ok(Some(UserAccount::try_from(row)?)),
            None => Ok(None),
        }
    }

    async fn get_children(&self, parent_id: &str) -> timexp_common::Result<Vec<UserAccount>> {
        let rows = ProfileQueries::list_children(&self.db, parent_id).await?;
        rows.into_iter()
            .map(|row| UserAccount::try_from(row).map_err(Into::into))
            .collect()
    }
}

#[async_trait]
impl LogStore for SqliteStore {
    async fn get_daily_logs(&self, user_id: &str) -> timexp_common::Result<Vec<DailyLog>> {
        let rows = DailyLogQueries::list_by_user(&self.db, user_id).await?;
        rows.into_iter()
            .map(|row| DailyLog::try_from(row).map_err(Into::into))
            .collect()
    }

    async fn save_daily_log(&self, log: &DailyLog) -> timexp_common::Result<()> {
        DailyLogQueries::upsert(&self.db, NewDailyLog::from_log(log)?).await?;
        Ok(())
    }

    async fn get_daily_log(
        &self,
        user_id: &str,
        date: NaiveDate,
    ) -> timexp_common::Result<Option<DailyLog>> {
        match found(DailyLogQueries::get_by_user_and_date(&self.db, user_id, date).await)? {
            Some(row) => Ok(Some(DailyLog::try_from(row)?)),
            None => Ok(None),
        }
    }
}
