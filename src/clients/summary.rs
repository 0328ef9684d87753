//! Text generation for the AI "pulse check".

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::PulseError;

/// Generates short natural-language text from a prompt.
#[async_trait]
pub trait Summarizer: Send + Sync + std::fmt::Debug {
    /// Returns `false` when the backend cannot be called at all (no key).
    fn is_configured(&self) -> bool;

    /// Generates text for `prompt` under `system_instruction`.
    ///
    /// # Errors
    ///
    /// Returns [`PulseError::SummaryUnavailable`] if the model is not
    /// configured or the call fails.
    async fn generate(&self, system_instruction: &str, prompt: &str)
    -> Result<String, PulseError>;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    system_instruction: Content<'a>,
    contents: [Content<'a>; 1],
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: [Part<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    thinking_config: ThinkingConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ThinkingConfig {
    thinking_budget: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GenerateResponse {
    /// Concatenated text of the first candidate; empty if there is none.
    fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|c| {
                c.parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}

/// Summarizer backed by the Gemini `generateContent` REST endpoint.
#[derive(Debug, Clone)]
pub struct GeminiSummarizer {
    client: Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

impl GeminiSummarizer {
    /// Creates a summarizer. With `api_key == None` every call fails fast.
    ///
    /// # Errors
    ///
    /// Returns [`PulseError::Internal`] if the HTTP client cannot be built.
    pub fn new(base_url: &str, model: &str, api_key: Option<String>) -> Result<Self, PulseError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(20))
            .build()
            .map_err(|e| PulseError::Internal(format!("summary client: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key,
        })
    }
}

#[async_trait]
impl Summarizer for GeminiSummarizer {
    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn generate(
        &self,
        system_instruction: &str,
        prompt: &str,
    ) -> Result<String, PulseError> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(PulseError::SummaryUnavailable("missing API key".to_string()));
        };

        let body = GenerateRequest {
            system_instruction: Content {
                role: None,
                parts: [Part {
                    text: system_instruction,
                }],
            },
            contents: [Content {
                role: Some("user"),
                parts: [Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                thinking_config: ThinkingConfig { thinking_budget: 0 },
            },
        };

        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        let response = self
            .client
            .post(url)
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| PulseError::SummaryUnavailable(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            return Err(PulseError::SummaryUnavailable(format!(
                "model returned {status}: {detail}"
            )));
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| PulseError::SummaryUnavailable(e.to_string()))?;
        Ok(parsed.text())
    }
}
