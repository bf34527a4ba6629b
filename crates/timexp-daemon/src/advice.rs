// Coaching text for a weekly schedule from a hosted text-generation model.
//
// The result is a display string only. Every failure path returns one of the
// fixed messages below instead of an error.

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use timexp_common::config::AdviceConfig;
use timexp_common::WeeklySchedule;
use tracing::{debug, error, warn};

pub const OFFLINE_ADVICE: &str =
    "Mission Control is currently offline. Follow your standard protocols and stay consistent, Commander!";
pub const EMPTY_SCHEDULE_ADVICE: &str =
    "Your mission board is empty. Head to the Blueprint tab to draft your first operations!";
pub const EMPTY_RESPONSE_ADVICE: &str = "Optimal trajectory achieved. Proceed with mission.";
pub const FALLBACK_ADVICE: &str = "Tactical link unstable. Rely on your core training for now!";

#[async_trait]
pub trait AdviceGenerator: Send + Sync {
    async fn get_advice(&self, schedule: &WeeklySchedule) -> String;
}

/// One line per non-empty day: `Monday: Math (STUDYING) at 08:00, ...`.
pub fn schedule_summary(schedule: &WeeklySchedule) -> String {
    schedule
        .iter()
        .filter(|(_, items)| !items.is_empty())
        .map(|(day, items)| {
            let slots: Vec<String> = items
                .iter()
                .map(|i| format!("{} ({}) at {}", i.label, i.category.as_str(), i.start_time))
                .collect();
            format!("{}: {}", day, slots.join(", "))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn build_prompt(summary: &str) -> String {
    format!(
        "As an expert student coach, analyze this weekly schedule and provide 3 concise, \
         encouraging tips.\nSchedule:\n{}\n\nMake it punchy, student-friendly, and use space \
         exploration metaphors. Max 150 characters.",
        summary
    )
}

/// Delay before retry number `attempt` (0-based).
pub fn backoff(base_ms: u64, attempt: u32) -> Duration {
    Duration::from_millis(base_ms.saturating_mul(2u64.saturating_pow(attempt)))
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 1],
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Deserialize, Default)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl GenerateResponse {
    fn text(&self) -> String {
        self.candidates
            .iter()
            .filter_map(|c| c.content.as_ref())
            .flat_map(|c| c.parts.iter())
            .filter_map(|p| p.text.as_deref())
            .collect::<String>()
            .trim()
            .to_string()
    }
}

/// HTTP client for the generateContent endpoint.
pub struct GeminiAdvice {
    client: reqwest::Client,
    config: AdviceConfig,
    api_key: Option<SecretString>,
}

impl GeminiAdvice {
    pub fn new(config: AdviceConfig, api_key: Option<SecretString>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_default();
        Self { client, config, api_key }
    }

    fn url(&self) -> String {
        format!("{}/{}:generateContent", self.config.endpoint.trim_end_matches('/'), self.config.model)
    }

    async fn generate(&self, key: &SecretString, prompt: &str) -> Result<String, reqwest::Error> {
        let body = GenerateRequest { contents: [Content { parts: [Part { text: prompt }] }] };

        let response: GenerateResponse = self
            .client
            .post(self.url())
            .header("x-goog-api-key", key.expose_secret())
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(response.text())
    }
}

#[async_trait]
impl AdviceGenerator for GeminiAdvice {
    async fn get_advice(&self, schedule: &WeeklySchedule) -> String {
        let Some(key) = &self.api_key else {
            warn!("Advice API key missing; advice is offline");
            return OFFLINE_ADVICE.to_string();
        };

        let summary = schedule_summary(schedule);
        if summary.is_empty() {
            return EMPTY_SCHEDULE_ADVICE.to_string();
        }
        let prompt = build_prompt(&summary);

        for attempt in 0..=self.config.retries {
            match self.generate(key, &prompt).await {
                Ok(text) if text.is_empty() => return EMPTY_RESPONSE_ADVICE.to_string(),
                Ok(text) => return text,
                Err(e) if attempt == self.config.retries => {
                    error!("Advice request failed after {} attempts: {}", attempt + 1, e);
                }
                Err(e) => {
                    let delay = backoff(self.config.base_backoff_ms, attempt);
                    debug!("Advice request failed ({}), retrying in {:?}", e, delay);
                    tokio::time::sleep(delay).await;
                }
            }
        }

        FALLBACK_ADVICE.to_string()
    }
}
