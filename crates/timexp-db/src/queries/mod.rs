pub mod daily_logs;
pub mod profiles;

pub use daily_logs::DailyLogQueries;
pub use profiles::ProfileQueries;
