//! Text generation - trait abstraction plus the Ollama-backed implementation.
//!
//! Production code uses `OllamaGenerator`, which sends blocking-style
//! requests to a local Ollama instance. Tests use fakes with scripted
//! replies and call counters.

use crate::prompts;
use async_trait::async_trait;
use kazu_common::ResolveError;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

/// Default Ollama endpoint.
pub const OLLAMA_API: &str = "http://127.0.0.1:11434";

/// Sampling parameters sent with every generation call, serialized into the
/// request's `options` map.
#[derive(Debug, Clone, Serialize)]
pub struct SamplingOptions {
    /// Stop after this many newly generated tokens (or end-of-sequence).
    #[serde(rename = "num_predict")]
    pub max_new_tokens: u32,

    /// Context window; the backend left-truncates the prompt to fit.
    pub num_ctx: u32,

    pub temperature: f32,

    /// Nucleus sampling mass.
    pub top_p: f32,

    /// Forbid any 3-token sequence from repeating within the continuation.
    /// Backends without the constraint ignore the key.
    pub no_repeat_ngram_size: u32,
}

impl Default for SamplingOptions {
    fn default() -> Self {
        Self {
            max_new_tokens: 150,
            num_ctx: prompts::MAX_CONTEXT_TOKENS as u32,
            temperature: 0.7,
            top_p: 0.9,
            no_repeat_ngram_size: 3,
        }
    }
}

/// One generation call: the built prompt plus its sampling parameters.
/// Built fresh per call, never persisted.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub prompt: String,
    pub options: SamplingOptions,
}

impl GenerationRequest {
    pub fn for_question(question: &str) -> Self {
        Self {
            prompt: prompts::build_prompt(question),
            options: SamplingOptions::default(),
        }
    }
}

/// Generative fallback behind the rule and learned-answer tiers.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Produce an answer for a question. Never returns an empty string:
    /// empty model output is substituted with the clarification message,
    /// while invocation failures surface as `GenerationFailure`.
    async fn generate(&self, question: &str) -> Result<String, ResolveError>;
}

/// Generator backed by a local Ollama instance.
pub struct OllamaGenerator {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

impl OllamaGenerator {
    pub fn new(model: &str, timeout_secs: u64) -> Result<Self, ResolveError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(generation_err)?;

        Ok(Self {
            client,
            base_url: OLLAMA_API.to_string(),
            model: model.to_string(),
        })
    }

    /// Point at a non-default endpoint.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl Generator for OllamaGenerator {
    async fn generate(&self, question: &str) -> Result<String, ResolveError> {
        let request = GenerationRequest::for_question(question);
        debug!(
            "Generating with {} ({} prompt chars)",
            self.model,
            request.prompt.len()
        );

        let body = serde_json::json!({
            "model": self.model,
            "prompt": request.prompt,
            "stream": false,
            "options": request.options,
        });

        let response = self
            .client
            .post(format!("{}/api/generate", self.base_url))
            .json(&body)
            .send()
            .await
            .map_err(generation_err)?;

        if !response.status().is_success() {
            return Err(ResolveError::GenerationFailure(format!(
                "Ollama request failed: {}",
                response.status()
            )));
        }

        let json: serde_json::Value = response.json().await.map_err(generation_err)?;
        let raw = json
            .get("response")
            .and_then(|r| r.as_str())
            .ok_or_else(|| {
                ResolveError::GenerationFailure(
                    "malformed Ollama response: missing response field".to_string(),
                )
            })?;

        Ok(prompts::clean_generation(&request.prompt, raw)
            .unwrap_or_else(|| prompts::CLARIFICATION.to_string()))
    }
}

fn generation_err(e: impl std::fmt::Display) -> ResolveError {
    ResolveError::GenerationFailure(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sampling_options_wire_shape() {
        let options = SamplingOptions::default();
        let json = serde_json::to_value(&options).unwrap();
        assert_eq!(json["num_predict"], 150);
        assert_eq!(json["num_ctx"], 512);
        assert_eq!(json["no_repeat_ngram_size"], 3);
        assert!((json["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-6);
        assert!((json["top_p"].as_f64().unwrap() - 0.9).abs() < 1e-6);
    }

    #[test]
    fn test_request_embeds_question() {
        let request = GenerationRequest::for_question("qué hora es en tokio");
        assert!(request.prompt.contains("qué hora es en tokio"));
        assert!(request.prompt.contains(prompts::PERSONA_PREAMBLE));
    }
}
