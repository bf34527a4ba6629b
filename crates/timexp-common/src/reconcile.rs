// Plan/actual reconciliation
//
// Joins a day's frozen planned snapshot with the activities actually logged
// that day, producing one timeline ordered by start time, and derives the
// day's sync score from it.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::{DailyLog, ItemStatus, ScheduleItem};

/// One row of the unified day timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEntry {
    pub item: ScheduleItem,
    pub status: ItemStatus,
}

impl TimelineEntry {
    pub fn is_logged(&self) -> bool {
        self.status == ItemStatus::Logged
    }
}

/// Merge `planned` and `actual` into a single timeline.
///
/// Each planned item appears exactly once: as the actual entry that fulfils
/// it (LOGGED) or as itself (PENDING). Spontaneous actual entries follow as
/// LOGGED. The result is stably sorted by start time, so ties keep this
/// emission order. When several actual entries fulfil the same planned id the
/// last one wins.
pub fn reconcile(planned: &[ScheduleItem], actual: &[ScheduleItem]) -> Vec<TimelineEntry> {
    let fulfilled: HashMap<&str, &ScheduleItem> = actual
        .iter()
        .filter_map(|a| a.planned_id.as_deref().map(|planned_id| (planned_id, a)))
        .collect();

    let mut timeline: Vec<TimelineEntry> = planned
        .iter()
        .map(|p| match fulfilled.get(p.id.as_str()) {
            Some(actual) => {
                TimelineEntry { item: (*actual).clone(), status: ItemStatus::Logged }
            }
            None => TimelineEntry { item: p.clone(), status: ItemStatus::Pending },
        })
        .collect();

    timeline.extend(
        actual
            .iter()
            .filter(|a| a.is_spontaneous())
            .map(|a| TimelineEntry { item: a.clone(), status: ItemStatus::Logged }),
    );

    timeline.sort_by(|a, b| a.item.sort_key().cmp(b.item.sort_key()));
    timeline
}

/// Percentage of `planned` obligations covered by `fulfilled` entries.
///
/// A day without plans is fully synced. Fulfilment counts above the plan
/// size (duplicate fulfilments) are clamped so the score stays within 0..=100.
pub fn sync_score(planned: usize, fulfilled: usize) -> u8 {
    if planned == 0 {
        return 100;
    }
    let covered = fulfilled.min(planned);
    // round-half-up of 100 * covered / planned
    let score = (200 * covered + planned) / (2 * planned);
    score.min(100) as u8
}

/// Sync score of a stored log, counting actual entries that carry a planned id.
pub fn log_sync_score(log: &DailyLog) -> u8 {
    sync_score(log.planned_snapshot.len(), log.fulfilled_count())
}

/// Reconciled view of one day's log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciledDay {
    pub timeline: Vec<TimelineEntry>,
    pub sync_score: u8,
    pub pending: usize,
    pub spontaneous: usize,
}

impl ReconciledDay {
    pub fn from_log(log: &DailyLog) -> Self {
        let timeline = reconcile(&log.planned_snapshot, &log.actual_activities);
        let pending = timeline.iter().filter(|e| !e.is_logged()).count();
        let spontaneous = log.actual_activities.iter().filter(|a| a.is_spontaneous()).count();

        Self { timeline, sync_score: log_sync_score(log), pending, spontaneous }
    }
}
