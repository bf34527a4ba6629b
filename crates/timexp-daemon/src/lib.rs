pub mod account_manager;
pub mod advice;
pub mod config;
pub mod daemon;
pub mod demo;
pub mod family_manager;
pub mod log_manager;
pub mod mission_manager;
pub mod notification_manager;
pub mod reminder_task;
pub mod schedule_manager;

pub use account_manager::{AccountManager, Registration};
pub use advice::{AdviceGenerator, GeminiAdvice};
pub use config::DaemonConfig;
pub use daemon::Daemon;
pub use family_manager::{ChildSummary, FamilyManager};
pub use log_manager::{DailyLogManager, DayView, HistoryDay, Intensity};
pub use mission_manager::{MissionManager, MissionOutcome};
pub use notification_manager::NotificationManager;
pub use reminder_task::ReminderTask;
pub use schedule_manager::ScheduleManager;
