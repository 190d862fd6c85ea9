use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::Provider;
use crate::errors::PlanError;
use crate::prompt::PromptBlocks;

/// Google Generative Language (Gemini/Gemma) REST client.
///
/// The gemma family takes no system role, so the system and user blocks are
/// sent as two parts of a single user turn, mirroring the reference
/// implementation's `generateContent([system, user])` call.
pub struct Gemini {
    model: String,
    api_base: String,
    api_key: Option<String>,
    client: Client,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

/// Fixed sampling parameters: temperature favors variety over literal
/// compliance; topP/topK truncate the sampling distribution.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_p: f32,
    top_k: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 0.9,
            top_p: 0.95,
            top_k: 40,
        }
    }
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<TextPart>,
}

#[derive(Deserialize)]
struct TextPart {
    #[serde(default)]
    text: String,
}

#[derive(Deserialize)]
struct ApiErrorResponse {
    error: ApiError,
}

#[derive(Deserialize)]
struct ApiError {
    message: String,
}

impl Gemini {
    pub fn new(
        model: String,
        api_base: String,
        api_key: Option<String>,
        timeout_secs: u64,
    ) -> Result<Self, PlanError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| PlanError::Generation(e.to_string()))?;
        Ok(Self {
            model,
            api_base,
            api_key,
            client,
        })
    }
}

#[async_trait]
impl Provider for Gemini {
    async fn generate(&self, blocks: &PromptBlocks) -> Result<String, PlanError> {
        let key = self
            .api_key
            .as_deref()
            .ok_or_else(|| PlanError::Configuration("GEMINI_API_KEY not configured".into()))?;

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.api_base.trim_end_matches('/'),
            self.model
        );
        let body = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![
                    Part {
                        text: &blocks.system,
                    },
                    Part { text: &blocks.user },
                ],
            }],
            generation_config: GenerationConfig::default(),
        };

        tracing::debug!(model = %self.model, "calling generateContent");

        let resp = self
            .client
            .post(&url)
            .query(&[("key", key)])
            .json(&body)
            .send()
            .await
            .map_err(|e| PlanError::Generation(format!("request failed: {e}")))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| PlanError::Generation(format!("read body failed: {e}")))?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorResponse>(&text)
                .map(|e| e.error.message)
                .unwrap_or(text);
            return Err(PlanError::Generation(format!("upstream {status}: {message}")));
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&text)
            .map_err(|e| PlanError::Generation(format!("unexpected response shape: {e}")))?;

        let content: String = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().map(|p| p.text).collect())
            .unwrap_or_default();

        if content.trim().is_empty() {
            return Err(PlanError::Generation("model returned empty content".into()));
        }
        Ok(content)
    }
}
