use std::sync::Arc;

use chrono::NaiveDate;
use tempfile::tempdir;
use timexp_common::{
    ActivityCategory, ItemStatus, MemoryStore, ScheduleItem, Store, UserAccount, UserRole,
};
use timexp_daemon::{DailyLogManager, MissionManager};
use timexp_db::{Database, DatabaseConfig, SqliteStore};

fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 4).unwrap()
}

fn student() -> UserAccount {
    let mut user = UserAccount::new("alex", "Alex", UserRole::Student);
    user.weekly_schedule.day_mut("Monday").push(
        ScheduleItem::new(ActivityCategory::Studying, "08:00", "09:00", "Math").with_id("m1"),
    );
    user
}

async fn sqlite_store(dir: &std::path::Path) -> Arc<dyn Store> {
    let path = dir.join("timexp.db");
    let db = Database::new(DatabaseConfig::at_path(path.to_string_lossy())).await.unwrap();
    db.run_migrations().await.unwrap();
    Arc::new(SqliteStore::new(db))
}

async fn run_monday_scenario(store: Arc<dyn Store>) {
    let user = student();
    store.save_user(&user).await.unwrap();

    let logs = DailyLogManager::new(store.clone());
    let missions = MissionManager::new(store.clone());

    // First access creates the log from the template.
    let view = logs.day_view(&user.id, monday(), monday()).await.unwrap();
    assert_eq!(view.log.planned_snapshot.len(), 1);
    assert_eq!(view.log.planned_snapshot[0].id, "m1");
    assert!(view.log.actual_activities.is_empty());
    assert_eq!(view.day.sync_score, 0);
    assert_eq!(view.day.timeline[0].status, ItemStatus::Pending);

    let outcome = missions.fulfill_planned(&user.id, monday(), "m1").await.unwrap();
    assert_eq!(outcome.log.actual_activities.len(), 1);
    assert_eq!(outcome.log.actual_activities[0].planned_id.as_deref(), Some("m1"));
    assert_eq!(outcome.award.new_total, 50);

    let view = logs.day_view(&user.id, monday(), monday()).await.unwrap();
    assert_eq!(view.day.sync_score, 100);

    let walk = ScheduleItem::new(ActivityCategory::Exercise, "14:00", "15:00", "Walk");
    let outcome = missions.log_spontaneous(&user.id, monday(), walk).await.unwrap();
    assert_eq!(outcome.award.new_total, 75);

    let view = logs.day_view(&user.id, monday(), monday()).await.unwrap();
    assert_eq!(view.day.timeline.len(), 2);
    assert!(view.day.timeline.iter().all(|entry| entry.status == ItemStatus::Logged));
    assert_eq!(view.day.timeline[1].item.start_time, "14:00");
    assert_eq!(view.day.sync_score, 100);

    let stored = store.get_user_profile(&user.id).await.unwrap().unwrap();
    assert_eq!(stored.xp, 75);
    assert_eq!(store.get_daily_logs(&user.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_monday_scenario_in_memory() {
    run_monday_scenario(Arc::new(MemoryStore::new())).await;
}

#[tokio::test]
async fn test_monday_scenario_sqlite() {
    let dir = tempdir().unwrap();
    run_monday_scenario(sqlite_store(dir.path()).await).await;
}

#[tokio::test]
async fn test_concurrent_creation_yields_one_log() {
    let dir = tempdir().unwrap();
    let store = sqlite_store(dir.path()).await;
    let user = student();
    store.save_user(&user).await.unwrap();

    let manager = DailyLogManager::new(store.clone());
    let (a, b) = tokio::join!(
        manager.get_or_create_log(&user.id, monday(), &user.weekly_schedule),
        manager.get_or_create_log(&user.id, monday(), &user.weekly_schedule),
    );
    let (a, b) = (a.unwrap(), b.unwrap());

    assert_eq!(a.id, b.id);
    assert_eq!(a.planned_snapshot, b.planned_snapshot);
    assert_eq!(store.get_daily_logs(&user.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_history_uses_frozen_snapshots() {
    let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
    let mut user = student();
    store.save_user(&user).await.unwrap();

    let logs = DailyLogManager::new(store.clone());
    let missions = MissionManager::new(store.clone());
    missions.fulfill_planned(&user.id, monday(), "m1").await.unwrap();

    // A later template edit must not change the stored day's score.
    user.weekly_schedule.day_mut("Monday").push(
        ScheduleItem::new(ActivityCategory::Reading, "18:00", "19:00", "Novel").with_id("m2"),
    );
    store.save_user(&user).await.unwrap();

    let history = logs.history(&user.id, monday(), 1).await.unwrap();
    assert_eq!(history[0].sync_score, Some(100));

    let view = logs.day_view(&user.id, monday(), monday()).await.unwrap();
    assert_eq!(view.day.sync_score, 100);
    assert_eq!(view.unsnapshotted.len(), 1);
}
