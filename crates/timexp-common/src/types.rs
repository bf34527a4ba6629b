use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::clock;

/// Days in the order the schedule editor presents them.
pub const WEEKDAYS: [&str; 7] =
    ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday", "Sunday"];

/// Fixed activity categories a schedule slot can belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityCategory {
    Studying,
    Reading,
    Playtime,
    Exercise,
    Chores,
    Rest,
    Other,
}

impl ActivityCategory {
    pub const ALL: [ActivityCategory; 7] = [
        ActivityCategory::Studying,
        ActivityCategory::Reading,
        ActivityCategory::Playtime,
        ActivityCategory::Exercise,
        ActivityCategory::Chores,
        ActivityCategory::Rest,
        ActivityCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityCategory::Studying => "STUDYING",
            ActivityCategory::Reading => "READING",
            ActivityCategory::Playtime => "PLAYTIME",
            ActivityCategory::Exercise => "EXERCISE",
            ActivityCategory::Chores => "CHORES",
            ActivityCategory::Rest => "REST",
            ActivityCategory::Other => "OTHER",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.as_str().eq_ignore_ascii_case(value.trim()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GradeLevel {
    Elementary,
    Middle,
    High,
    University,
}

impl GradeLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            GradeLevel::Elementary => "ELEMENTARY",
            GradeLevel::Middle => "MIDDLE",
            GradeLevel::High => "HIGH",
            GradeLevel::University => "UNIVERSITY",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "ELEMENTARY" => Some(GradeLevel::Elementary),
            "MIDDLE" => Some(GradeLevel::Middle),
            "HIGH" => Some(GradeLevel::High),
            "UNIVERSITY" => Some(GradeLevel::University),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Student,
    Parent,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Student => "STUDENT",
            UserRole::Parent => "PARENT",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "STUDENT" => Some(UserRole::Student),
            "PARENT" => Some(UserRole::Parent),
            _ => None,
        }
    }
}

/// One planned or logged activity slot.
///
/// Times are wall-clock `HH:MM` strings. They are compared as strings, which
/// is only chronological for zero-padded values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleItem {
    pub id: String,
    pub category: ActivityCategory,
    #[serde(default)]
    pub start_time: String,
    #[serde(default)]
    pub end_time: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub planned_subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reminder_minutes: Option<u32>,
    /// Set on actual entries that fulfil the planned entry with this id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub planned_id: Option<String>,
}

impl ScheduleItem {
    pub fn new(
        category: ActivityCategory,
        start_time: impl Into<String>,
        end_time: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        Self {
            id: new_id(),
            category,
            start_time: start_time.into(),
            end_time: end_time.into(),
            label: label.into(),
            planned_subject: None,
            actual_subject: None,
            topic: None,
            notes: None,
            completed: None,
            reminder_minutes: None,
            planned_id: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.planned_subject = Some(subject.into());
        self
    }

    pub fn with_reminder(mut self, minutes: u32) -> Self {
        self.reminder_minutes = Some(minutes);
        self
    }

    /// Start time used for ordering; missing starts sort as midnight.
    pub fn sort_key(&self) -> &str {
        if self.start_time.is_empty() {
            "00:00"
        } else {
            &self.start_time
        }
    }

    pub fn is_fulfillment(&self) -> bool {
        self.planned_id.is_some()
    }

    pub fn is_spontaneous(&self) -> bool {
        self.planned_id.is_none()
    }

    pub fn duration_label(&self) -> String {
        match clock::duration_minutes(&self.start_time, &self.end_time) {
            Some(minutes) => clock::format_duration(minutes),
            None => "--".to_string(),
        }
    }
}

/// Reconciliation status of a timeline entry. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemStatus {
    Logged,
    Pending,
}

/// Recurring weekly plan keyed by weekday name.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeeklySchedule {
    days: BTreeMap<String, Vec<ScheduleItem>>,
}

impl WeeklySchedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule with an empty entry for every weekday.
    pub fn empty_week() -> Self {
        let days = WEEKDAYS.iter().map(|day| (day.to_string(), Vec::new())).collect();
        Self { days }
    }

    pub fn day(&self, day: &str) -> &[ScheduleItem] {
        self.days.get(day).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn day_mut(&mut self, day: &str) -> &mut Vec<ScheduleItem> {
        self.days.entry(day.to_string()).or_default()
    }

    pub fn for_date(&self, date: NaiveDate) -> &[ScheduleItem] {
        self.day(clock::weekday_name(date))
    }

    pub fn set_day(&mut self, day: &str, items: Vec<ScheduleItem>) {
        self.days.insert(day.to_string(), items);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[ScheduleItem])> {
        self.days.iter().map(|(day, items)| (day.as_str(), items.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.days.values().all(Vec::is_empty)
    }

    pub fn item_count(&self) -> usize {
        self.days.values().map(Vec::len).sum()
    }
}

/// One record per user and calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyLog {
    pub id: String,
    pub user_id: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub planned_snapshot: Vec<ScheduleItem>,
    #[serde(default)]
    pub actual_activities: Vec<ScheduleItem>,
}

impl DailyLog {
    /// Fresh log whose planned snapshot is a copy of `planned`.
    pub fn new(user_id: &str, date: NaiveDate, planned: &[ScheduleItem]) -> Self {
        Self {
            id: Self::id_for(user_id, date),
            user_id: user_id.to_string(),
            date,
            planned_snapshot: planned.to_vec(),
            actual_activities: Vec::new(),
        }
    }

    /// Log ids are derived from `(user_id, date)` so concurrent creators agree.
    pub fn id_for(user_id: &str, date: NaiveDate) -> String {
        let name = format!("{}/{}", user_id, date.format("%Y-%m-%d"));
        Uuid::new_v5(&Uuid::NAMESPACE_OID, name.as_bytes()).to_string()
    }

    pub fn fulfilled_count(&self) -> usize {
        self.actual_activities.iter().filter(|a| a.is_fulfillment()).count()
    }

    pub fn is_fulfilled(&self, planned_id: &str) -> bool {
        self.actual_activities.iter().any(|a| a.planned_id.as_deref() == Some(planned_id))
    }

    pub fn planned(&self, id: &str) -> Option<&ScheduleItem> {
        self.planned_snapshot.iter().find(|p| p.id == id)
    }
}

/// Account and gamification state for a student or parent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccount {
    pub id: String,
    /// Login handle, stored lower-cased.
    pub handle: String,
    pub name: String,
    pub role: UserRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub weekly_schedule: WeeklySchedule,
    #[serde(default)]
    pub xp: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grade: Option<GradeLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specific_grade: Option<u8>,
    #[serde(default)]
    pub onboarding_completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,
}

impl UserAccount {
    pub fn new(handle: &str, name: &str, role: UserRole) -> Self {
        Self {
            id: new_id(),
            handle: normalize_handle(handle),
            name: name.to_string(),
            role,
            parent_id: None,
            weekly_schedule: WeeklySchedule::empty_week(),
            xp: 0,
            grade: None,
            specific_grade: None,
            onboarding_completed: false,
            password_hash: None,
        }
    }

    pub fn level(&self) -> u64 {
        crate::xp::level_for(self.xp)
    }

    pub fn is_parent(&self) -> bool {
        self.role == UserRole::Parent
    }
}

/// Handles are matched case-insensitively and without surrounding spaces.
pub fn normalize_handle(handle: &str) -> String {
    handle.trim().to_lowercase()
}

/// Fresh opaque identifier for users and schedule items.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

// ============================================================================
// Notification System
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationType {
    /// A planned item starts in `minutes_before` minutes
    MissionReminder { item_id: String, start_time: String, minutes_before: u32 },
    /// XP was credited to the account
    XpAwarded { amount: u64, reason: String },
    /// Cumulative XP crossed a level boundary
    LevelUp { level: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationStatus {
    Pending,
    Sent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationPriority {
    Low,
    Normal,
    High,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationChannel {
    Desktop,
    InApp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Option<String>,
    pub notification_type: NotificationType,
    pub title: String,
    pub message: String,
    pub status: NotificationStatus,
    pub created_at: DateTime<Utc>,
    pub sent_at: Option<DateTime<Utc>>,
    pub priority: NotificationPriority,
    pub channels: Vec<NotificationChannel>,
}

impl Notification {
    pub fn new(
        user_id: Option<String>,
        notification_type: NotificationType,
        title: String,
        message: String,
        priority: NotificationPriority,
        channels: Vec<NotificationChannel>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            notification_type,
            title,
            message,
            status: NotificationStatus::Pending,
            created_at: Utc::now(),
            sent_at: None,
            priority,
            channels,
        }
    }

    pub fn mark_sent(&mut self) {
        self.status = NotificationStatus::Sent;
        self.sent_at = Some(Utc::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_lifecycle_ends_at_sent() {
        let mut notification = Notification::new(
            Some("u1".to_string()),
            NotificationType::LevelUp { level: 2 },
            "Level Up!".to_string(),
            "You reached level 2".to_string(),
            NotificationPriority::Normal,
            vec![NotificationChannel::Desktop],
        );
        assert_eq!(notification.status, NotificationStatus::Pending);
        assert!(notification.sent_at.is_none());

        notification.mark_sent();
        assert_eq!(notification.status, NotificationStatus::Sent);
        assert!(notification.sent_at.is_some());
    }

    #[test]
    fn test_category_serializes_upper_case() {
        let json = serde_json::to_string(&ActivityCategory::Studying).unwrap();
        assert_eq!(json, "\"STUDYING\"");
        assert_eq!(ActivityCategory::parse("reading"), Some(ActivityCategory::Reading));
        assert_eq!(ActivityCategory::parse("gaming"), None);
    }

    #[test]
    fn test_schedule_item_missing_times_deserialize() {
        let item: ScheduleItem =
            serde_json::from_str(r#"{"id":"a","category":"OTHER","label":"x"}"#).unwrap();
        assert_eq!(item.start_time, "");
        assert_eq!(item.sort_key(), "00:00");
        assert!(item.is_spontaneous());
    }

    #[test]
    fn test_weekly_schedule_roundtrips_as_day_map() {
        let mut schedule = WeeklySchedule::new();
        schedule.day_mut("Monday").push(
            ScheduleItem::new(ActivityCategory::Studying, "08:00", "09:00", "Math").with_id("m1"),
        );

        let json = serde_json::to_value(&schedule).unwrap();
        assert!(json.get("Monday").is_some());
        assert_eq!(schedule.day("Tuesday").len(), 0);

        let parsed: WeeklySchedule = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, schedule);
    }

    #[test]
    fn test_daily_log_id_is_keyed_by_user_and_date() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let other = NaiveDate::from_ymd_opt(2024, 1, 16).unwrap();

        assert_eq!(DailyLog::id_for("u1", date), DailyLog::id_for("u1", date));
        assert_ne!(DailyLog::id_for("u1", date), DailyLog::id_for("u2", date));
        assert_ne!(DailyLog::id_for("u1", date), DailyLog::id_for("u1", other));
    }

    #[test]
    fn test_new_account_normalizes_handle() {
        let user = UserAccount::new("  Alice ", "Alice", UserRole::Student);
        assert_eq!(user.handle, "alice");
        assert_eq!(user.weekly_schedule.iter().count(), 7);
        assert_eq!(user.level(), 1);
    }
}
