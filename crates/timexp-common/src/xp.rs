use serde::{Deserialize, Serialize};

use crate::types::UserAccount;

pub const XP_PER_LEVEL: u64 = 1000;

/// Completion events that earn experience points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum XpEvent {
    /// A planned item was marked as done ("activate mission")
    PlannedFulfilled,
    /// An unplanned activity was logged
    SpontaneousLogged,
}

impl XpEvent {
    pub fn amount(&self) -> u64 {
        match self {
            XpEvent::PlannedFulfilled => 50,
            XpEvent::SpontaneousLogged => 25,
        }
    }

    pub fn reason(&self) -> &'static str {
        match self {
            XpEvent::PlannedFulfilled => "Mission Success",
            XpEvent::SpontaneousLogged => "Spontaneous Productivity",
        }
    }
}

/// Outcome of crediting one event to an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct XpAward {
    pub event: XpEvent,
    pub amount: u64,
    pub reason: String,
    pub previous_total: u64,
    pub new_total: u64,
    pub level: u64,
    pub leveled_up: bool,
}

/// Level derived from cumulative XP, starting at 1.
pub fn level_for(xp: u64) -> u64 {
    xp / XP_PER_LEVEL + 1
}

/// XP still needed to reach the next level.
pub fn xp_to_next_level(xp: u64) -> u64 {
    XP_PER_LEVEL - xp % XP_PER_LEVEL
}

/// Add the event's fixed amount to `user.xp`. Persisting the account is the caller's job.
pub fn apply_award(user: &mut UserAccount, event: XpEvent) -> XpAward {
    let previous_total = user.xp;
    let amount = event.amount();
    user.xp = previous_total.saturating_add(amount);

    let level = level_for(user.xp);
    XpAward {
        event,
        amount,
        reason: event.reason().to_string(),
        previous_total,
        new_total: user.xp,
        level,
        leveled_up: level > level_for(previous_total),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::UserRole;

    #[test]
    fn test_fixed_amounts() {
        assert_eq!(XpEvent::PlannedFulfilled.amount(), 50);
        assert_eq!(XpEvent::SpontaneousLogged.amount(), 25);
    }

    #[test]
    fn test_accumulation() {
        let mut user = UserAccount::new("kid", "Kid", UserRole::Student);

        let first = apply_award(&mut user, XpEvent::PlannedFulfilled);
        assert_eq!(first.new_total, 50);

        let second = apply_award(&mut user, XpEvent::SpontaneousLogged);
        assert_eq!(second.previous_total, 50);
        assert_eq!(user.xp, 75);
    }

    #[test]
    fn test_level_boundaries() {
        assert_eq!(level_for(0), 1);
        assert_eq!(level_for(999), 1);
        assert_eq!(level_for(1000), 2);
        assert_eq!(level_for(8000), 9);
        assert_eq!(xp_to_next_level(950), 50);
        assert_eq!(xp_to_next_level(1000), 1000);
    }

    #[test]
    fn test_level_up_detected() {
        let mut user = UserAccount::new("kid", "Kid", UserRole::Student);
        user.xp = 980;

        let award = apply_award(&mut user, XpEvent::SpontaneousLogged);
        assert!(award.leveled_up);
        assert_eq!(award.level, 2);

        let award = apply_award(&mut user, XpEvent::SpontaneousLogged);
        assert!(!award.leveled_up);
    }
}
