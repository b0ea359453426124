use crate::adapter::ToolAdapter;
use async_trait::async_trait;
use overseer_core::{OverseerError, OverseerResult};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, info};

fn default_temperature() -> f32 {
    0.2
}

/// Configuration for the text-generation API client.
///
/// Works with OpenAI, OpenRouter, Groq and any other provider implementing
/// the OpenAI chat-completions API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Bearer token for the API.
    pub api_key: String,
    /// Model identifier, e.g. `gpt-4o-mini`.
    pub model_id: String,
    /// Override for the API base URL; defaults to the OpenAI endpoint.
    pub api_base_url: Option<String>,
    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Optional system prompt prepended to every request.
    #[serde(default)]
    pub system_prompt: Option<String>,
}

impl GeneratorConfig {
    /// Effective base URL for requests.
    pub fn base_url(&self) -> &str {
        self.api_base_url
            .as_deref()
            .unwrap_or("https://api.openai.com")
    }
}

/// Text-generation adapter over an OpenAI-compatible chat endpoint.
///
/// Arguments: `{prompt}`. Result: `{text}` with the raw completion —
/// callers own any cleanup (fence stripping, parsing, dedup).
pub struct TextGenerator {
    config: GeneratorConfig,
    http: reqwest::Client,
}

impl TextGenerator {
    /// Registry name for this adapter.
    pub const NAME: &'static str = "text_generator";

    /// Creates a generator from `config`.
    pub fn new(config: GeneratorConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl ToolAdapter for TextGenerator {
    fn name(&self) -> &str {
        Self::NAME
    }

    async fn invoke(&self, args: Value) -> OverseerResult<Value> {
        let prompt = args["prompt"]
            .as_str()
            .ok_or_else(|| OverseerError::Tool("text_generator: missing 'prompt'".to_string()))?;
        info!(
            model = %self.config.model_id,
            prompt_len = prompt.len(),
            "Calling generation API"
        );

        let mut messages: Vec<Value> = Vec::new();
        if let Some(system) = &self.config.system_prompt {
            messages.push(json!({ "role": "system", "content": system }));
        }
        messages.push(json!({ "role": "user", "content": prompt }));

        let body = json!({
            "model": self.config.model_id,
            "temperature": self.config.temperature,
            "messages": messages,
        });

        let url = format!("{}/v1/chat/completions", self.config.base_url());
        let resp = self
            .http
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| OverseerError::Http(e.to_string()))?;

        let status = resp.status();
        let resp_body: Value = resp
            .json()
            .await
            .map_err(|e| OverseerError::Http(e.to_string()))?;

        if !status.is_success() {
            return Err(OverseerError::Http(format!(
                "generation API error {status}: {resp_body}"
            )));
        }

        let content = resp_body["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| {
                OverseerError::Http(format!("generation API returned no content: {resp_body}"))
            })?;
        debug!(response_len = content.len(), "Generation call succeeded");

        Ok(json!({ "text": content }))
    }
}
