use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use secrecy::SecretString;
use timexp_common::{
    new_id, DailyLog, GradeLevel, Result, ScheduleItem, Store, UserAccount, UserRole,
};
use tracing::info;

use crate::account_manager::{AccountManager, Registration};
use crate::mission_manager::FULFILLMENT_NOTES;

pub const DEMO_PARENT_HANDLE: &str = "mentor";
pub const DEMO_STUDENT_HANDLE: &str = "student";
pub const DEMO_PASSWORD: &str = "demo123";
pub const DEMO_DAYS: i64 = 14;

#[derive(Debug, Clone)]
pub struct DemoAccounts {
    pub parent: UserAccount,
    pub student: UserAccount,
}

/// How many of `planned` items a demo day fulfils.
pub fn demo_fulfilled_count(planned: usize) -> usize {
    (planned * 9 / 10 + 1).min(planned)
}

/// Create the demo parent and student with two weeks of mostly fulfilled logs.
pub async fn seed_demo(
    store: Arc<dyn Store>,
    grade: GradeLevel,
    specific_grade: u8,
    today: NaiveDate,
) -> Result<DemoAccounts> {
    let accounts = AccountManager::new(store.clone());
    let password = || SecretString::from(DEMO_PASSWORD.to_string());

    let parent = accounts
        .register(Registration {
            handle: DEMO_PARENT_HANDLE.to_string(),
            name: "Mission Control".to_string(),
            password: password(),
            role: UserRole::Parent,
            grade: None,
            specific_grade: None,
        })
        .await?;

    let mut student = accounts
        .register(Registration {
            handle: DEMO_STUDENT_HANDLE.to_string(),
            name: "Cadet Alex".to_string(),
            password: password(),
            role: UserRole::Student,
            grade: Some(grade),
            specific_grade: Some(specific_grade),
        })
        .await?;
    student.parent_id = Some(parent.id.clone());
    store.save_user(&student).await?;

    for offset in 0..DEMO_DAYS {
        let date = today - Duration::days(offset);
        let mut log = DailyLog::new(&student.id, date, student.weekly_schedule.for_date(date));

        let count = demo_fulfilled_count(log.planned_snapshot.len());
        log.actual_activities = log.planned_snapshot[..count]
            .iter()
            .map(|planned| ScheduleItem {
                id: new_id(),
                planned_id: Some(planned.id.clone()),
                completed: Some(true),
                notes: Some(FULFILLMENT_NOTES.to_string()),
                ..planned.clone()
            })
            .collect();

        store.save_daily_log(&log).await?;
    }

    info!("Seeded demo accounts {} and {} with {} days of logs", parent.handle, student.handle, DEMO_DAYS);
    Ok(DemoAccounts { parent, student })
}
