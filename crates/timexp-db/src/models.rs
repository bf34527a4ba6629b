use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use timexp_common::{DailyLog, GradeLevel, UserAccount, UserRole};

use crate::error::{DbError, Result};

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct DbProfile {
    pub id: String,
    pub handle: String,
    pub name: String,
    pub role: String, // "STUDENT" or "PARENT"
    pub parent_id: Option<String>,
    pub grade: Option<String>,
    pub specific_grade: Option<i64>,
    pub weekly_schedule: String, // JSON object keyed by weekday
    pub xp: i64,
    pub onboarding_completed: bool,
    pub password_hash: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<DbProfile> for UserAccount {
    type Error = DbError;

    fn try_from(row: DbProfile) -> Result<Self> {
        let role = UserRole::parse(&row.role)
            .ok_or_else(|| DbError::InvalidData(format!("Unknown role '{}'", row.role)))?;
        let grade = match row.grade.as_deref() {
            Some(value) => Some(
                GradeLevel::parse(value)
                    .ok_or_else(|| DbError::InvalidData(format!("Unknown grade '{}'", value)))?,
            ),
            None => None,
        };

        Ok(UserAccount {
            id: row.id,
            handle: row.handle,
            name: row.name,
            role,
            parent_id: row.parent_id,
            weekly_schedule: serde_json::from_str(&row.weekly_schedule)?,
            xp: u64::try_from(row.xp).unwrap_or(0),
            grade,
            specific_grade: row.specific_grade.and_then(|g| u8::try_from(g).ok()),
            onboarding_completed: row.onboarding_completed,
            password_hash: row.password_hash,
        })
    }
}

/// Column values for an insert-or-update of a profile.
#[derive(Debug, Clone)]
pub struct NewProfile {
    pub id: String,
    pub handle: String,
    pub name: String,
    pub role: String,
    pub parent_id: Option<String>,
    pub grade: Option<String>,
    pub specific_grade: Option<i64>,
    pub weekly_schedule: String,
    pub xp: i64,
    pub onboarding_completed: bool,
    pub password_hash: Option<String>,
}

impl NewProfile {
    pub fn from_account(user: &UserAccount) -> Result<Self> {
        let xp = i64::try_from(user.xp)
            .map_err(|_| DbError::InvalidData(format!("XP total {} out of range", user.xp)))?;

        Ok(Self {
            id: user.id.clone(),
            handle: user.handle.clone(),
            name: user.name.clone(),
            role: user.role.as_str().to_string(),
            parent_id: user.parent_id.clone(),
            grade: user.grade.map(|g| g.as_str().to_string()),
            specific_grade: user.specific_grade.map(i64::from),
            weekly_schedule: serde_json::to_string(&user.weekly_schedule)?,
            xp,
            onboarding_completed: user.onboarding_completed,
            password_hash: user.password_hash.clone(),
        })
    }
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct DbDailyLog {
    pub id: String,
    pub user_id: String,
    pub date: NaiveDate,
    pub planned_snapshot: String,  // JSON array
    pub actual_activities: String, // JSON array
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<DbDailyLog> for DailyLog {
    type Error = DbError;

    fn try_from(row: DbDailyLog) -> Result<Self> {
        Ok(DailyLog {
            id: row.id,
            user_id: row.user_id,
            date: row.date,
            planned_snapshot: serde_json::from_str(&row.planned_snapshot)?,
            actual_activities: serde_json::from_str(&row.actual_activities)?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct NewDailyLog {
    pub id: String,
    pub user_id: String,
    pub date: NaiveDate,
    pub planned_snapshot: String,
    pub actual_activities: String,
}

impl NewDailyLog {
    pub fn from_log(log: &DailyLog) -> Result<Self> {
        Ok(Self {
            id: log.id.clone(),
            user_id: log.user_id.clone(),
            date: log.date,
            planned_snapshot: serde_json::to_string(&log.planned_snapshot)?,
            actual_activities: serde_json::to_string(&log.actual_activities)?,
        })
    }
}
