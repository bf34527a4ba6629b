use std::collections::HashSet;
use std::sync::Arc;

use chrono::NaiveDate;
use cucumber::World;
use timexp_common::{MemoryStore, UserAccount};
use timexp_daemon::{DailyLogManager, DayView, MissionManager, ScheduleManager};

/// BDD World for the daily log flow, backed by the in-memory store
#[derive(Debug, World)]
#[world(init = Self::new)]
pub struct DailyLogWorld {
    pub store: Arc<MemoryStore>,

    /// Student under test
    pub user: Option<UserAccount>,

    /// Date of the log being viewed
    pub date: Option<NaiveDate>,

    /// Latest day view
    pub view: Option<DayView>,

    /// Ids of every log returned by "opens the log" steps, in order
    pub opened_log_ids: Vec<String>,

    /// Error from the last rejected action
    pub last_error: Option<timexp_common::Error>,

    /// Result of the last conflict check
    pub conflicts: HashSet<String>,
}

impl DailyLogWorld {
    pub fn new() -> Self {
        Self {
            store: Arc::new(MemoryStore::new()),
            user: None,
            date: None,
            view: None,
            opened_log_ids: Vec::new(),
            last_error: None,
            conflicts: HashSet::new(),
        }
    }

    pub fn user_id(&self) -> String {
        self.user.as_ref().map(|u| u.id.clone()).expect("no student in this scenario")
    }

    pub fn date(&self) -> NaiveDate {
        self.date.expect("no log opened in this scenario")
    }

    pub fn logs(&self) -> DailyLogManager {
        DailyLogManager::new(self.store.clone())
    }

    pub fn missions(&self) -> MissionManager {
        MissionManager::new(self.store.clone())
    }

    pub fn schedules(&self) -> ScheduleManager {
        ScheduleManager::new(self.store.clone())
    }

    /// Re-read the current day into `view`.
    pub async fn refresh(&mut self) {
        let view = self
            .logs()
            .day_view(&self.user_id(), self.date(), self.date())
            .await
            .expect("day view failed");
        self.view = Some(view);
    }
}

impl Default for DailyLogWorld {
    fn default() -> Self {
        Self::new()
    }
}
