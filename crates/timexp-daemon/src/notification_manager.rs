use anyhow::Result;
use notify_rust::{Notification as SystemNotification, Urgency};
use timexp_common::types::{
    Notification, NotificationChannel, NotificationPriority, NotificationType,
};
use timexp_common::{ScheduleItem, XpAward};
use tokio::sync::mpsc;
use tracing::{info, warn};

#[derive(Clone)]
pub struct NotificationManager {
    sender: mpsc::UnboundedSender<NotificationRequest>,
}

struct NotificationRequest {
    notification: Notification,
}

impl NotificationManager {
    pub fn new() -> Self {
        Self::spawn(true)
    }

    /// Manager that never talks to the desktop; every channel is logged only.
    pub fn headless() -> Self {
        Self::spawn(false)
    }

    fn spawn(desktop: bool) -> Self {
        let (sender, mut receiver) = mpsc::unbounded_channel::<NotificationRequest>();

        tokio::spawn(async move {
            while let Some(request) = receiver.recv().await {
                if let Err(e) = Self::send_notification_internal(request.notification, desktop).await
                {
                    warn!("Failed to send notification: {}", e);
                }
            }
        });

        Self { sender }
    }

    pub async fn send_notification(&self, mut notification: Notification) -> Result<()> {
        notification.mark_sent();

        let request = NotificationRequest { notification };

        self.sender
            .send(request)
            .map_err(|e| anyhow::anyhow!("Failed to queue notification: {}", e))?;

        Ok(())
    }

    async fn send_notification_internal(notification: Notification, desktop: bool) -> Result<()> {
        for channel in &notification.channels {
            match channel {
                NotificationChannel::Desktop if desktop => {
                    Self::send_desktop_notification(&notification).await?;
                }
                NotificationChannel::Desktop | NotificationChannel::InApp => {
                    info!("Notification: {} - {}", notification.title, notification.message);
                }
            }
        }

        Ok(())
    }

    async fn send_desktop_notification(notification: &Notification) -> Result<()> {
        let urgency = match notification.priority {
            NotificationPriority::Low => Urgency::Low,
            NotificationPriority::Normal => Urgency::Normal,
            NotificationPriority::High => Urgency::Critical,
        };

        let mut desktop_notification = SystemNotification::new();
        desktop_notification
            .appname("TimeXP")
            .summary(&notification.title)
            .body(&notification.message)
            .icon(Self::get_icon_for_type(&notification.notification_type))
            .urgency(urgency)
            .timeout(Self::get_timeout_for_priority(&notification.priority));

        desktop_notification.show()?;
        info!("Desktop notification sent: {}", notification.title);

        Ok(())
    }

    fn get_timeout_for_priority(priority: &NotificationPriority) -> notify_rust::Timeout {
        match priority {
            NotificationPriority::Low => notify_rust::Timeout::Milliseconds(5000),
            NotificationPriority::Normal => notify_rust::Timeout::Milliseconds(8000),
            NotificationPriority::High => notify_rust::Timeout::Milliseconds(15000),
        }
    }

    fn get_icon_for_type(notification_type: &NotificationType) -> &'static str {
        match notification_type {
            NotificationType::MissionReminder { .. } => "appointment-soon",
            NotificationType::XpAwarded { .. } => "emblem-default",
            NotificationType::LevelUp { .. } => "starred",
        }
    }

    /// Create the "starts soon" alert for a planned item
    pub fn create_mission_reminder_notification(user_id: &str, item: &ScheduleItem) -> Notification {
        Notification::new(
            Some(user_id.to_string()),
            NotificationType::MissionReminder {
                item_id: item.id.clone(),
                start_time: item.start_time.clone(),
                minutes_before: item.reminder_minutes.unwrap_or(0),
            },
            "Mission Alert!".to_string(),
            format!("\"{}\" starts soon.", item.label),
            NotificationPriority::High,
            vec![NotificationChannel::Desktop, NotificationChannel::InApp],
        )
    }

    /// Create a notification for credited XP
    pub fn create_xp_awarded_notification(user_id: &str, award: &XpAward) -> Notification {
        Notification::new(
            Some(user_id.to_string()),
            NotificationType::XpAwarded { amount: award.amount, reason: award.reason.clone() },
            format!("+{} XP", award.amount),
            format!("{} ({} XP total)", award.reason, award.new_total),
            NotificationPriority::Low,
            vec![NotificationChannel::InApp],
        )
    }

    /// Create a notification for reaching a new level
    pub fn create_level_up_notification(user_id: &str, level: u64) -> Notification {
        Notification::new(
            Some(user_id.to_string()),
            NotificationType::LevelUp { level },
            "Level Up!".to_string(),
            format!("You reached level {}.", level),
            NotificationPriority::Normal,
            vec![NotificationChannel::Desktop, NotificationChannel::InApp],
        )
    }
}

impl Default for NotificationManager {
    fn default() -> Self {
        Self::new()
    }
}
