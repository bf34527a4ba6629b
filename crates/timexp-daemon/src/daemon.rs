use anyhow::{Context, Result};
use chrono::Local;
use std::sync::Arc;
use tokio::signal;
use tokio::time::{interval, Duration};
use tracing::{info, warn};

use crate::account_manager::AccountManager;
use crate::advice::GeminiAdvice;
use crate::config::DaemonConfig;
use crate::family_manager::FamilyManager;
use crate::log_manager::DailyLogManager;
use crate::mission_manager::MissionManager;
use crate::notification_manager::NotificationManager;
use crate::reminder_task::ReminderTask;
use crate::schedule_manager::ScheduleManager;
use timexp_common::Store;
use timexp_db::{Database, DatabaseConfig as DbConfig, SqliteStore};

/// Configuration plus the store every manager is built on.
#[derive(Clone)]
pub struct Daemon {
    config: DaemonConfig,
    store: Arc<dyn Store>,
}

impl Daemon {
    /// Open the configured SQLite database and wrap it as the store.
    pub async fn new(config: DaemonConfig) -> Result<Self> {
        info!("Initializing daemon");

        let database = initialize_database(&config).await?;
        let store: Arc<dyn Store> = Arc::new(SqliteStore::new(database));

        Ok(Self { config, store })
    }

    pub fn with_store(config: DaemonConfig, store: Arc<dyn Store>) -> Self {
        Self { config, store }
    }

    pub fn config(&self) -> &DaemonConfig {
        &self.config
    }

    pub fn store(&self) -> Arc<dyn Store> {
        self.store.clone()
    }

    pub fn accounts(&self) -> AccountManager {
        AccountManager::new(self.store())
    }

    pub fn family(&self) -> FamilyManager {
        FamilyManager::new(self.store())
    }

    pub fn schedules(&self) -> ScheduleManager {
        ScheduleManager::new(self.store())
    }

    pub fn logs(&self) -> DailyLogManager {
        DailyLogManager::new(self.store())
    }

    pub fn missions(&self) -> MissionManager {
        MissionManager::new(self.store())
    }

    pub fn advice(&self) -> GeminiAdvice {
        GeminiAdvice::new(self.config.advice.clone(), self.config.advice_api_key())
    }
}

pub async fn initialize_database(config: &DaemonConfig) -> Result<Database> {
    info!("Initializing database");

    let database_config = DbConfig {
        path: config.database_path(),
        encryption_key: config.database.encryption_key.clone(),
        ..DbConfig::default()
    };
    let database = Database::new(database_config).await.context("Failed to connect to database")?;

    database.run_migrations().await.context("Failed to run migrations")?;

    info!("Database initialized successfully");
    Ok(database)
}

pub async fn run(config: DaemonConfig) -> Result<()> {
    config.validate()?;
    let daemon = Daemon::new(config).await?;

    if daemon.config.reminders.enabled {
        let poll = Duration::from_secs(daemon.config.reminders.poll_interval_secs);
        let reminders = ReminderTask::new(daemon.store(), NotificationManager::new());

        tokio::spawn(async move {
            let mut interval_timer = interval(poll);

            loop {
                interval_timer.tick().await;

                if let Err(e) = reminders.check_and_notify(Local::now().naive_local()).await {
                    warn!("Reminder check failed: {}", e);
                }
            }
        });
        info!("Reminder task started, polling every {:?}", poll);
    } else {
        info!("Reminders disabled in configuration");
    }

    info!("Daemon running, waiting for shutdown signal...");

    #[cfg(unix)]
    {
        let mut sigterm = signal::unix::signal(signal::unix::SignalKind::terminate())?;

        tokio::select! {
            _ = sigterm.recv() => {
                info!("Received SIGTERM, shutting down gracefully...");
            }
            _ = signal::ctrl_c() => {
                info!("Received Ctrl+C, shutting down gracefully...");
            }
        }
    }

    #[cfg(not(unix))]
    {
        signal::ctrl_c().await?;
        info!("Received Ctrl+C, shutting down gracefully...");
    }

    info!("Daemon shutdown complete");

    Ok(())
}
