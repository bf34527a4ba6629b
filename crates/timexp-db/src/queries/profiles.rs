use crate::connection::Database;
use crate::error::{DbError, Result};
use crate::models::{DbProfile, NewProfile};
use chrono::Utc;

pub struct ProfileQueries;

impl ProfileQueries {
    /// Insert a profile or replace every column of the existing row with the same id.
    pub async fn upsert(db: &Database, profile: NewProfile) -> Result<DbProfile> {
        let pool = db.pool()?;

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO profiles (id, handle, name, role, parent_id, grade, specific_grade,
                                  weekly_schedule, xp, onboarding_completed, password_hash,
                                  created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                handle = excluded.handle,
                name = excluded.name,
                role = excluded.role,
                parent_id = excluded.parent_id,
                grade = excluded.grade,
                specific_grade = excluded.specific_grade,
                weekly_schedule = excluded.weekly_schedule,
                xp = excluded.xp,
                onboarding_completed = excluded.onboarding_completed,
                password_hash = excluded.password_hash,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&profile.id)
        .bind(&profile.handle)
        .bind(&profile.name)
        .bind(&profile.role)
        .bind(&profile.parent_id)
        .bind(&profile.grade)
        .bind(profile.specific_grade)
        .bind(&profile.weekly_schedule)
        .bind(profile.xp)
        .bind(profile.onboarding_completed)
        .bind(&profile.password_hash)
        .bind(now)
        .bind(now)
        .execute(pool)
        .await;

        match result {
            Ok(_) => Self::get_by_id(db, &profile.id).await,
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Err(DbError::Duplicate(format!("Handle '{}' already taken", profile.handle)))
            }
            Err(e) => Err(DbError::Sqlx(e)),
        }
    }

    pub async fn get_by_id(db: &Database, id: &str) -> Result<DbProfile> {
        let pool = db.pool()?;

        sqlx::query_as::<_, DbProfile>("SELECT * FROM profiles WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| DbError::NotFound(format!("Profile {} not found", id)))
    }

    pub async fn get_by_handle(db: &Database, handle: &str) -> Result<DbProfile> {
        let pool = db.pool()?;

        sqlx::query_as::<_, DbProfile>("SELECT * FROM profiles WHERE handle = ?")
            .bind(handle)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| DbError::NotFound(format!("Profile '{}' not found", handle)))
    }

    pub async fn list_all(db: &Database) -> Result<Vec<DbProfile>> {
        let pool = db.pool()?;

        sqlx::query_as::<_, DbProfile>("SELECT * FROM profiles ORDER BY name")
            .fetch_all(pool)
            .await
            .map_err(DbError::Sqlx)
    }

    pub async fn list_children(db: &Database, parent_id: &str) -> Result<Vec<DbProfile>> {
        let pool = db.pool()?;

        sqlx::query_as::<_, DbProfile>("SELECT * FROM profiles WHERE parent_id = ? ORDER BY name")
            .bind(parent_id)
            .fetch_all(pool)
            .await
            .map_err(DbError::Sqlx)
    }

    /// Delete a profile; its daily logs go with it through the foreign key cascade.
    pub async fn delete(db: &Database, id: &str) -> Result<()> {
        let pool = db.pool()?;

        let result = sqlx::query("DELETE FROM profiles WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound(format!("Profile {} not found", id)));
        }

        Ok(())
    }

    pub async fn count(db: &Database) -> Result<i64> {
        let pool = db.pool()?;

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM profiles").fetch_one(pool).await?;

        Ok(count)
    }
}
