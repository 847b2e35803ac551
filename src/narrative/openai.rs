// =============================================================================
// OpenAI-compatible chat-completions client
// =============================================================================
//
// SECURITY: the API key is sent only as a bearer header and never logged or
// serialized. The request timeout is bounded at the reqwest client level so a
// slow upstream can never stall the read path — callers fall back to the
// local narrative on any error.
// =============================================================================

use anyhow::{Context, Result};
use tracing::{debug, instrument};

use crate::config::OpenAiConfig;

/// Minimal chat-completions client for narrative generation.
#[derive(Clone)]
pub struct OpenAiClient {
    api_key: String,
    model: String,
    base_url: String,
    client: reqwest::Client,
}

impl OpenAiClient {
    pub fn new(config: &OpenAiConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("failed to build reqwest client");

        Self {
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            base_url: config.base_url.clone(),
            client,
        }
    }

    /// POST /v1/chat/completions — one system + one user message, returns the
    /// assistant's text.
    ///
    /// Any transport/auth/quota error surfaces as `Err` for the caller to
    /// catch and recover from locally.
    #[instrument(skip_all, name = "openai::generate")]
    pub async fn generate(&self, system_prompt: &str, user_prompt: &str) -> Result<String> {
        let url = format!("{}/v1/chat/completions", self.base_url);

        let payload = serde_json::json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": system_prompt },
                { "role": "user", "content": user_prompt },
            ],
            "temperature": 0.4,
        });

        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .context("POST /v1/chat/completions request failed")?;

        let status = resp.status();
        let body: serde_json::Value = resp
            .json()
            .await
            .context("failed to parse chat completion response")?;

        if !status.is_success() {
            anyhow::bail!("chat completion returned {status}: {body}");
        }

        let content = body["choices"][0]["message"]["content"]
            .as_str()
            .context("chat completion response missing choices[0].message.content")?
            .trim()
            .to_string();

        debug!(model = %self.model, chars = content.len(), "narrative generated");
        Ok(content)
    }
}

impl std::fmt::Debug for OpenAiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiClient")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn debug_redacts_api_key() {
        let client = OpenAiClient::new(&OpenAiConfig {
            api_key: "sk-secret".into(),
            model: "gpt-4o-mini".into(),
            base_url: "https://api.openai.com".into(),
            timeout: Duration::from_secs(20),
        });
        let rendered = format!("{client:?}");
        assert!(!rendered.contains("sk-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
