//! # Diet Suggestions
//!
//! A chat-completion endpoint writes a meal plan from the pet profile and its
//! latest health report. When the call fails, a pre-written plan is served
//! instead and the response says so through its `source` field.
//!
//! | Upstream | `DIET_FALLBACK` | Result |
//! |----------|-----------------|--------|
//! | ok | any | `source: ai` |
//! | failed or not configured | true | `source: fallback` |
//! | failed or not configured | false | 502 |
//!
//! There is no retry and no backoff.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use rand::{Rng, seq::SliceRandom};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};
use vitals::{
    catalog::DIET_TEMPLATES,
    models::{DietSource, HealthReport, Pet},
};

use crate::{config::DietConfig, error::AppError};

const SYSTEM_PROMPT: &str = "You are a veterinary nutrition expert specializing in personalized pet diet recommendations. Provide detailed, scientific, yet easy-to-understand dietary advice.";
const TEMPERATURE: f32 = 0.7;
const MAX_TOKENS: u32 = 1000;

#[derive(Error, Debug)]
pub enum DietError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("upstream returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("upstream returned no content")]
    EmptyResponse,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DietModel: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, DietError>;
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Deserialize)]
struct ReplyMessage {
    content: Option<String>,
}

pub struct ChatCompletionClient {
    client: Client,
    url: String,
    model: String,
    api_key: String,
}

impl ChatCompletionClient {
    pub fn new(config: &DietConfig, api_key: String) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| AppError::Config(format!("diet client: {e}")))?;

        Ok(Self {
            client,
            url: config.api_url.clone(),
            model: config.model.clone(),
            api_key,
        })
    }
}

#[async_trait]
impl DietModel for ChatCompletionClient {
    async fn complete(&self, prompt: &str) -> Result<String, DietError> {
        let request = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DietError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let reply: ChatResponse = response.json().await?;

        reply
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(DietError::EmptyResponse)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Suggestion {
    pub content: String,
    pub source: DietSource,
}

pub struct DietService {
    model: Option<Arc<dyn DietModel>>,
    fallback: bool,
}

impl DietService {
    pub fn new(model: Option<Arc<dyn DietModel>>, fallback: bool) -> Self {
        Self { model, fallback }
    }

    pub fn from_config(config: &DietConfig) -> Result<Self, AppError> {
        let model: Option<Arc<dyn DietModel>> = match &config.api_key {
            Some(key) => {
                info!(url = %config.api_url, model = %config.model, "Diet model configured");
                Some(Arc::new(ChatCompletionClient::new(config, key.clone())?))
            }
            None => {
                warn!("No DIET_API_KEY, diet suggestions will use templates");
                None
            }
        };

        Ok(Self::new(model, config.fallback))
    }

    pub async fn suggest(&self, prompt: &str) -> Result<Suggestion, AppError> {
        let reason = match &self.model {
            Some(model) => match model.complete(prompt).await {
                Ok(text) => match strip_prompt(&text, prompt) {
                    Some(content) => {
                        return Ok(Suggestion {
                            content,
                            source: DietSource::Ai,
                        });
                    }
                    None => DietError::EmptyResponse.to_string(),
                },
                Err(e) => e.to_string(),
            },
            None => "no diet model configured".to_string(),
        };

        if !self.fallback {
            warn!(%reason, "Diet suggestion failed");
            return Err(AppError::DietUnavailable(reason));
        }

        warn!(%reason, "Serving template diet plan");
        Ok(pick_fallback(&mut rand::thread_rng()))
    }
}

pub fn pick_fallback<R: Rng + ?Sized>(rng: &mut R) -> Suggestion {
    let content = DIET_TEMPLATES.choose(rng).copied().unwrap_or_default();

    Suggestion {
        content: content.to_string(),
        source: DietSource::Fallback,
    }
}

pub fn build_prompt(pet: &Pet, report: &HealthReport) -> String {
    format!(
        "Instruction: Create a detailed daily diet plan for a pet based on the provided information.
Input:
- Name: {name}
- Type: {kind}
- Breed: {breed}
- Age: {age} years
- Weight: {weight} kg
- Heart Rate: {heart_rate} bpm
- Temperature: {temperature:.1}°C
- Blood Oxygen: {sp_o2}%
- Activity Level: {activity}

Output Format:
Morning Meal: [details]
Afternoon Meal: [details]
Evening Meal: [details]
",
        name = pet.name,
        kind = pet.kind,
        breed = pet.breed,
        age = pet.age,
        weight = pet.weight,
        heart_rate = report.average_heart_rate,
        temperature = report.average_temperature,
        sp_o2 = report.average_sp_o2,
        activity = report.activity_level.as_str(),
    )
}

/// Drops an echoed prompt; `None` when nothing is left.
pub fn strip_prompt(text: &str, prompt: &str) -> Option<String> {
    let cleaned = text.replace(prompt, "");
    let cleaned = cleaned.trim();

    (!cleaned.is_empty()).then(|| cleaned.to_string())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rand::{SeedableRng, rngs::StdRng};
    use vitals::{
        catalog::pets,
        models::{ActivityLevel, HealthReport},
    };

    use super::*;

    fn report() -> HealthReport {
        HealthReport {
            date: NaiveDate::from_ymd_opt(2024, 6, 10).unwrap(),
            average_heart_rate: 88,
            average_temperature: 38.46,
            average_sp_o2: 97,
            activity_level: ActivityLevel::High,
            alerts: 0,
        }
    }

    fn service(model: MockDietModel, fallback: bool) -> DietService {
        DietService::new(Some(Arc::new(model)), fallback)
    }

    #[test]
    fn test_prompt_contains_profile_and_vitals() {
        let prompt = build_prompt(&pets()[0], &report());

        assert!(prompt.contains("- Name: Buddy"));
        assert!(prompt.contains("- Breed: Golden Retriever"));
        assert!(prompt.contains("- Heart Rate: 88 bpm"));
        assert!(prompt.contains("- Temperature: 38.5°C"));
        assert!(prompt.contains("- Activity Level: high"));
    }

    #[test]
    fn test_strip_prompt() {
        assert_eq!(
            strip_prompt("PROMPT\nMorning Meal: kibble", "PROMPT"),
            Some("Morning Meal: kibble".to_string())
        );
        assert_eq!(strip_prompt("PROMPT  ", "PROMPT"), None);
    }

    #[test]
    fn test_pick_fallback_uses_templates() {
        let mut rng = StdRng::seed_from_u64(4);

        for _ in 0..20 {
            let suggestion = pick_fallback(&mut rng);
            assert_eq!(suggestion.source, DietSource::Fallback);
            assert!(DIET_TEMPLATES.contains(&suggestion.content.as_str()));
        }
    }

    #[tokio::test]
    async fn test_ai_response_is_tagged() {
        let mut model = MockDietModel::new();
        model
            .expect_complete()
            .times(1)
            .returning(|_| Ok("Morning Meal: chicken and rice".to_string()));

        let suggestion = service(model, true).suggest("prompt").await.unwrap();

        assert_eq!(suggestion.source, DietSource::Ai);
        assert_eq!(suggestion.content, "Morning Meal: chicken and rice");
    }

    #[tokio::test]
    async fn test_failure_falls_back() {
        let mut model = MockDietModel::new();
        model.expect_complete().times(1).returning(|_| {
            Err(DietError::Status {
                status: 503,
                body: "overloaded".into(),
            })
        });

        let suggestion = service(model, true).suggest("prompt").await.unwrap();

        assert_eq!(suggestion.source, DietSource::Fallback);
        assert!(DIET_TEMPLATES.contains(&suggestion.content.as_str()));
    }

    #[tokio::test]
    async fn test_echo_only_response_falls_back() {
        let mut model = MockDietModel::new();
        model
            .expect_complete()
            .returning(|prompt| Ok(prompt.to_string()));

        let suggestion = service(model, true).suggest("prompt").await.unwrap();

        assert_eq!(suggestion.source, DietSource::Fallback);
    }

    #[tokio::test]
    async fn test_failure_without_fallback_errors() {
        let mut model = MockDietModel::new();
        model
            .expect_complete()
            .returning(|_| Err(DietError::EmptyResponse));

        let result = service(model, false).suggest("prompt").await;

        assert!(matches!(result, Err(AppError::DietUnavailable(_))));
    }

    #[tokio::test]
    async fn test_no_model_uses_templates() {
        let suggestion = DietService::new(None, true).suggest("prompt").await.unwrap();

        assert_eq!(suggestion.source, DietSource::Fallback);
        assert!(DietService::new(None, false).suggest("prompt").await.is_err());
    }
}
