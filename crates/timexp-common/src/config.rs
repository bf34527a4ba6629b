use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    pub data_dir: Option<String>,
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self { data_dir: None, log_level: "info".to_string() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReminderConfig {
    pub enabled: bool,
    /// How often the reminder task polls the clock
    pub poll_interval_secs: u64,
}

impl Default for ReminderConfig {
    fn default() -> Self {
        Self { enabled: true, poll_interval_secs: 30 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdviceConfig {
    pub endpoint: String,
    pub model: String,
    pub retries: u32,
    pub base_backoff_ms: u64,
}

impl Default for AdviceConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://generativelanguage.googleapis.com/v1beta/models".to_string(),
            model: "gemini-3-flash-preview".to_string(),
            retries: 2,
            base_backoff_ms: 1000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_general_config_default() {
        let config = GeneralConfig::default();
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_reminder_config_default() {
        let config = ReminderConfig::default();
        assert!(config.enabled);
        assert_eq!(config.poll_interval_secs, 30);
    }

    #[test]
    fn test_advice_config_default() {
        let config = AdviceConfig::default();
        assert_eq!(config.retries, 2);
        assert_eq!(config.base_backoff_ms, 1000);
    }
}
