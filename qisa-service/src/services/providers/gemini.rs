//! Gemini AI provider implementation.
//!
//! Implements single-turn text generation using Google's Gemini REST API
//! (`models/{model}:generateContent`).

use super::{
    ChatRequest, FinishReason, GenerationParams, ProviderError, ProviderResponse, TextProvider,
};
use crate::config::InstructionMode;
use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Header carrying the API key.
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Appended to the instruction when it travels as a regular user turn.
pub const INTERNAL_INSTRUCTION_NOTE: &str =
    "(⚠️ Esta é uma instrução interna, não responda a ela.)";

/// Gemini provider configuration.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: Secret<String>,
    pub model: String,
    pub api_base: String,
    pub instruction_mode: InstructionMode,
    pub timeout: Duration,
}

/// Gemini text provider.
pub struct GeminiTextProvider {
    config: GeminiConfig,
    client: Client,
}

impl GeminiTextProvider {
    pub fn new(config: GeminiConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| {
                ProviderError::NotConfigured(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self { config, client })
    }

    /// Build the API URL for the given model method.
    fn api_url(&self, method: &str) -> String {
        format!(
            "{}/models/{}:{}",
            self.config.api_base.trim_end_matches('/'),
            self.config.model,
            method
        )
    }

    /// Lay out the instruction and question according to the instruction mode.
    fn build_request(
        &self,
        request: &ChatRequest,
        params: &GenerationParams,
    ) -> GenerateContentRequest {
        let question = Content {
            role: Some("user".to_string()),
            parts: vec![Part::text(&request.question)],
        };

        let (system_instruction, contents) = match self.config.instruction_mode {
            InstructionMode::Native => (
                Some(Content {
                    role: None,
                    parts: vec![Part::text(&request.instruction)],
                }),
                vec![question],
            ),
            InstructionMode::PrecedingTurn => {
                let setup = Content {
                    role: Some("user".to_string()),
                    parts: vec![Part::text(&format!(
                        "{}\n{}",
                        request.instruction, INTERNAL_INSTRUCTION_NOTE
                    ))],
                };
                (None, vec![setup, question])
            }
        };

        GenerateContentRequest {
            system_instruction,
            contents,
            generation_config: Some(GenerationConfig {
                temperature: params.temperature,
            }),
        }
    }
}

#[async_trait]
impl TextProvider for GeminiTextProvider {
    async fn generate(
        &self,
        request: &ChatRequest,
        params: &GenerationParams,
    ) -> Result<ProviderResponse, ProviderError> {
        let body = self.build_request(request, params);
        let url = self.api_url("generateContent");

        tracing::debug!(
            model = %self.config.model,
            instruction_mode = ?self.config.instruction_mode,
            instruction_len = request.instruction.len(),
            question_len = request.question.len(),
            "Sending request to Gemini API"
        );

        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, self.config.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::NetworkError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();

            if status.as_u16() == 429 {
                return Err(ProviderError::RateLimited);
            }

            return Err(ProviderError::ApiError(format!(
                "Gemini API error {}: {}",
                status, error_text
            )));
        }

        let api_response: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::ApiError(format!("Failed to parse response: {}", e)))?;

        if let Some(reason) = api_response
            .prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.as_deref())
        {
            tracing::warn!(block_reason = %reason, "Gemini blocked the prompt");
            return Err(ProviderError::ContentFiltered);
        }

        let candidate = api_response.candidates.first();

        // Concatenate every text part of the first candidate
        let text = candidate
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<String>()
            })
            .filter(|text| !text.is_empty());

        let finish_reason = candidate
            .map(|c| match c.finish_reason.as_deref() {
                Some("STOP") | None => FinishReason::Complete,
                Some("MAX_TOKENS") => FinishReason::Length,
                Some("SAFETY") | Some("PROHIBITED_CONTENT") | Some("BLOCKLIST") => {
                    FinishReason::ContentFilter
                }
                Some(_) => FinishReason::Error,
            })
            .unwrap_or(FinishReason::Error);

        if finish_reason == FinishReason::ContentFilter {
            return Err(ProviderError::ContentFiltered);
        }

        let usage = api_response.usage_metadata.unwrap_or_default();

        Ok(ProviderResponse {
            text,
            input_tokens: usage.prompt_token_count.unwrap_or(0),
            output_tokens: usage.candidates_token_count.unwrap_or(0),
            finish_reason,
        })
    }

    async fn health_check(&self) -> Result<(), ProviderError> {
        if self.config.api_key.expose_secret().is_empty() {
            return Err(ProviderError::NotConfigured(
                "Gemini API key not configured".to_string(),
            ));
        }

        // Fetch the configured model to verify the key and model name
        let url = format!(
            "{}/models/{}",
            self.config.api_base.trim_end_matches('/'),
            self.config.model
        );

        let response = self
            .client
            .get(&url)
            .header(API_KEY_HEADER, self.config.api_key.expose_secret())
            .send()
            .await
            .map_err(|e| ProviderError::NetworkError(e.to_string()))?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(ProviderError::ApiError(format!(
                "Health check failed: {}",
                response.status()
            )))
        }
    }
}

// ============================================================================
// Gemini API Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

/// Only text parts are produced or read; other part kinds are ignored.
#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

impl Part {
    fn text(text: &str) -> Self {
        Self {
            text: Some(text.to_string()),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
    #[serde(default)]
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    prompt_token_count: Option<i32>,
    candidates_token_count: Option<i32>,
}
