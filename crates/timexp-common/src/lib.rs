pub mod clock;
pub mod config;
pub mod conflicts;
pub mod error;
pub mod reconcile;
pub mod reminders;
pub mod schedule;
pub mod security;
pub mod store;
pub mod templates;
pub mod types;
pub mod xp;

pub use error::{Error, Result};
pub use reconcile::{reconcile, sync_score, ReconciledDay, TimelineEntry};
pub use store::{LogStore, MemoryStore, Store, UserStore};
pub use types::*;
pub use xp::{XpAward, XpEvent};
