use crate::connection::Database;
use crate::error::{DbError, Result};
use crate::models::{DbDailyLog, NewDailyLog};
use chrono::{NaiveDate, Utc};

pub struct DailyLogQueries;

impl DailyLogQueries {
    /// Insert the log for `(user_id, date)` or replace its snapshot and activities.
    /// An existing row keeps its original id.
    pub async fn upsert(db: &Database, log: NewDailyLog) -> Result<DbDailyLog> {
        let pool = db.pool()?;

        sqlx::query(
            r#"
            INSERT INTO daily_logs (id, user_id, date, planned_snapshot, actual_activities, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT(user_id, date) DO UPDATE SET
                planned_snapshot = excluded.planned_snapshot,
                actual_activities = excluded.actual_activities,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&log.id)
        .bind(&log.user_id)
        .bind(log.date)
        .bind(&log.planned_snapshot)
        .bind(&log.actual_activities)
        .bind(Utc::now())
        .execute(pool)
        .await?;

        Self::get_by_user_and_date(db, &log.user_id, log.date).await
    }

    pub async fn get_by_user_and_date(
        db: &Database,
        user_id: &str,
        date: NaiveDate,
    ) -> Result<DbDailyLog> {
        let pool = db.pool()?;

        sqlx::query_as::<_, DbDailyLog>("SELECT * FROM daily_logs WHERE user_id = ? AND date = ?")
            .bind(user_id)
            .bind(date)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| {
                DbError::NotFound(format!("Daily log for {} on {} not found", user_id, date))
            })
    }

    /// Every log of the user, newest date first.
    pub async fn list_by_user(db: &Database, user_id: &str) -> Result<Vec<DbDailyLog>> {
        let pool = db.pool()?;

        sqlx::query_as::<_, DbDailyLog>(
            "SELECT * FROM daily_logs WHERE user_id = ? ORDER BY date DESC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
        .map_err(DbError::Sqlx)
    }

    pub async fn delete_by_user(db: &Database, user_id: &str) -> Result<u64> {
        let pool = db.pool()?;

        let result = sqlx::query("DELETE FROM daily_logs WHERE user_id = ?")
            .bind(user_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected())
    }
}
