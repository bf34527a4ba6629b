// Step definitions for the daily mission log scenarios

use chrono::NaiveDate;
use cucumber::{given, then, when};
use timexp_common::{ActivityCategory, Error, ScheduleItem, UserAccount, UserRole, UserStore};

use crate::DailyLogWorld;

fn mission(id: &str, start: &str, end: &str) -> ScheduleItem {
    ScheduleItem::new(ActivityCategory::Studying, start, end, format!("Mission {}", id)).with_id(id)
}

#[given(expr = "a student whose Monday blueprint has mission {string} from {string} to {string}")]
async fn student_with_mission(world: &mut DailyLogWorld, id: String, start: String, end: String) {
    let mut user = UserAccount::new("cadet", "Cadet", UserRole::Student);
    user.weekly_schedule.day_mut("Monday").push(mission(&id, &start, &end));
    world.store.save_user(&user).await.expect("save student");
    world.user = Some(user);
}

#[given(expr = "the Monday blueprint also has mission {string} from {string} to {string}")]
async fn another_mission(world: &mut DailyLogWorld, id: String, start: String, end: String) {
    world
        .schedules()
        .add_item(&world.user_id(), "Monday", Some(mission(&id, &start, &end)))
        .await
        .expect("add mission");
}

#[when(regex = r#"^the student opens the log for "(\d{4}-\d{2}-\d{2})"(?: again)?$"#)]
async fn open_log(world: &mut DailyLogWorld, date: String) {
    let date = NaiveDate::parse_from_str(&date, "%Y-%m-%d").expect("valid date");
    world.date = Some(date);
    world.refresh().await;

    let id = world.view.as_ref().map(|v| v.log.id.clone()).expect("view loaded");
    world.opened_log_ids.push(id);
}

#[when(regex = r#"^the student fulfils mission "([^"]+)"(?: again)?$"#)]
async fn fulfil(world: &mut DailyLogWorld, id: String) {
    match world.missions().fulfill_planned(&world.user_id(), world.date(), &id).await {
        Ok(_) => world.last_error = None,
        Err(e) => world.last_error = Some(e),
    }
    world.refresh().await;
}

#[when(expr = "the student logs a spontaneous activity from {string} to {string}")]
async fn log_spontaneous(world: &mut DailyLogWorld, start: String, end: String) {
    let item = ScheduleItem::new(ActivityCategory::Exercise, start, end, "Bike ride");
    world
        .missions()
        .log_spontaneous(&world.user_id(), world.date(), item)
        .await
        .expect("log spontaneous activity");
    world.refresh().await;
}

#[when("the Monday conflicts are checked")]
async fn check_conflicts(world: &mut DailyLogWorld) {
    world.conflicts =
        world.schedules().conflicts(&world.user_id(), "Monday").await.expect("conflict check");
}

#[then(expr = "the log has {int} planned item(s) and {int} actual entr(y)(ies)")]
async fn log_counts(world: &mut DailyLogWorld, planned: usize, actual: usize) {
    let view = world.view.as_ref().expect("view loaded");
    assert_eq!(view.log.planned_snapshot.len(), planned);
    assert_eq!(view.log.actual_activities.len(), actual);
}

#[then(expr = "the sync score is {int}")]
async fn sync_score(world: &mut DailyLogWorld, score: u8) {
    let view = world.view.as_ref().expect("view loaded");
    assert_eq!(view.day.sync_score, score);
}

#[then(expr = "the timeline has {int} entries")]
async fn timeline_len(world: &mut DailyLogWorld, len: usize) {
    let view = world.view.as_ref().expect("view loaded");
    assert_eq!(view.day.timeline.len(), len);
}

#[then(expr = "the student has {int} XP")]
async fn student_xp(world: &mut DailyLogWorld, xp: u64) {
    let user = world.store.get_user_profile(&world.user_id()).await.expect("load student");
    assert_eq!(user.map(|u| u.xp), Some(xp));
}

#[then("both logs have the same id")]
async fn same_log_id(world: &mut DailyLogWorld) {
    assert_eq!(world.opened_log_ids.len(), 2);
    assert_eq!(world.opened_log_ids[0], world.opened_log_ids[1]);
}

#[then("the request is rejected as already fulfilled")]
async fn rejected(world: &mut DailyLogWorld) {
    assert!(matches!(world.last_error, Some(Error::AlreadyFulfilled(_))));
}

#[then(expr = "missions {string} and {string} are flagged")]
async fn flagged(world: &mut DailyLogWorld, a: String, b: String) {
    assert!(world.conflicts.contains(&a));
    assert!(world.conflicts.contains(&b));
}

#[then("no missions are flagged")]
async fn none_flagged(world: &mut DailyLogWorld) {
    assert!(world.conflicts.is_empty());
}
