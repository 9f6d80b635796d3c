// Local backend adapter (Ollama-compatible generate/tags API)

use super::{build_http_client, endpoint, SectionProvider};
use crate::config::LocalConfig;
use crate::errors::GenerationError;
use crate::generation::prompt_builder::Prompt;
use crate::models::ProviderId;
use crate::utils::preview;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<ModelTag>,
}

#[derive(Debug, Deserialize)]
struct ModelTag {
    name: String,
}

/// Adapter for a local inference server
pub struct LocalProvider {
    client: reqwest::Client,
    base_url: String,
    model: String,
    temperature: f64,
    top_p: f64,
    max_tokens: u32,
}

impl LocalProvider {
    pub fn new(config: &LocalConfig) -> anyhow::Result<Self> {
        Ok(Self {
            client: build_http_client(config.timeout_secs)?,
            base_url: config.base_url.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
            top_p: config.top_p,
            max_tokens: config.max_tokens,
        })
    }

    fn unavailable(&self, status: Option<u16>, reason: String) -> GenerationError {
        GenerationError::unavailable(ProviderId::Local, status, reason)
    }

    async fn fetch_models(&self) -> Result<Vec<String>, String> {
        let url = endpoint(&self.base_url, "api/tags");
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| format!("Request failed: {}", e))?;

        if !response.status().is_success() {
            return Err(format!("API returned {}", response.status()));
        }

        let tags: TagsResponse = response
            .json()
            .await
            .map_err(|e| format!("Failed to parse response: {}", e))?;

        Ok(tags.models.into_iter().map(|m| m.name).collect())
    }
}

/// The `response` text of a generate envelope; blank counts as missing
fn extract_response(body: &str) -> Option<String> {
    let envelope: GenerateResponse = serde_json::from_str(body).ok()?;
    envelope.response.filter(|text| !text.trim().is_empty())
}

#[async_trait]
impl SectionProvider for LocalProvider {
    fn id(&self) -> ProviderId {
        ProviderId::Local
    }

    async fn generate(&self, prompt: &Prompt) -> Result<String, GenerationError> {
        let url = endpoint(&self.base_url, "api/generate");
        let body = json!({
            "model": self.model,
            "prompt": prompt.combined(),
            "stream": false,
            "options": {
                "temperature": self.temperature,
                "top_p": self.top_p,
                "max_tokens": self.max_tokens,
            },
        });

        log::info!("[local] Requesting sections from {} (model {})", url, self.model);

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.unavailable(None, format!("Request failed: {}", e)))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| {
                self.unavailable(
                    Some(status.as_u16()),
                    format!("Failed to read response: {}", e),
                )
            })?;

        if !status.is_success() {
            return Err(self.unavailable(
                Some(status.as_u16()),
                format!("API returned {}: {}", status, preview(&text, 200)),
            ));
        }

        let output = extract_response(&text).ok_or_else(|| {
            log::warn!("[local] Response envelope had no text");
            GenerationError::malformed(text.clone())
        })?;

        log::debug!("[local] Raw output: {}", preview(&output, 200));
        Ok(output)
    }

    async fn list_models(&self) -> Vec<String> {
        match self.fetch_models().await {
            Ok(models) => models,
            Err(e) => {
                log::warn!("[local] Failed to list models from {}: {}", self.base_url, e);
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_response() {
        assert_eq!(
            extract_response(r#"{"model":"llama3.2:3b","response":"Here you go: []","done":true}"#)
                .as_deref(),
            Some("Here you go: []")
        );
        assert!(extract_response(r#"{"done":true}"#).is_none());
        assert!(extract_response(r#"{"response":""}"#).is_none());
        assert!(extract_response("plain text").is_none());
    }

    #[tokio::test]
    async fn test_list_models_unreachable_is_empty() {
        let config = LocalConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            ..LocalConfig::default()
        };
        let provider = LocalProvider::new(&config).unwrap();
        assert!(provider.list_models().await.is_empty());
    }
}
