// Hosted backend adapter (OpenAI-compatible chat completions)

use super::{build_http_client, endpoint, SectionProvider};
use crate::config::{get_provider_preset, HostedConfig};
use crate::errors::GenerationError;
use crate::generation::prompt_builder::Prompt;
use crate::models::ProviderId;
use crate::utils::preview;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Adapter for the hosted chat-completions API
pub struct HostedProvider {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
    temperature: f64,
    max_tokens: u32,
}

impl HostedProvider {
    pub fn new(config: &HostedConfig) -> anyhow::Result<Self> {
        if config.api_key.is_none() {
            log::warn!("[hosted] No API key configured; requests will be sent unauthenticated");
        }

        Ok(Self {
            client: build_http_client(config.timeout_secs)?,
            base_url: config.base_url.clone(),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }

    fn unavailable(&self, status: Option<u16>, reason: String) -> GenerationError {
        GenerationError::unavailable(ProviderId::Hosted, status, reason)
    }
}

/// Pull the first choice's text out of a chat-completions body
fn extract_content(body: &str) -> Option<String> {
    let envelope: ChatCompletionResponse = serde_json::from_str(body).ok()?;
    envelope
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|content| !content.trim().is_empty())
}

#[async_trait]
impl SectionProvider for HostedProvider {
    fn id(&self) -> ProviderId {
        ProviderId::Hosted
    }

    async fn generate(&self, prompt: &Prompt) -> Result<String, GenerationError> {
        let url = endpoint(&self.base_url, "chat/completions");
        let body = json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": prompt.system},
                {"role": "user", "content": prompt.instruction},
            ],
            "temperature": self.temperature,
            "max_tokens": self.max_tokens,
        });

        log::info!("[hosted] Requesting sections from {} (model {})", url, self.model);

        let mut request = self.client.post(&url).json(&body);
        if let Some(ref key) = self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
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

        let content = extract_content(&text).ok_or_else(|| {
            log::warn!("[hosted] Response carried no message content");
            GenerationError::malformed(text.clone())
        })?;

        log::debug!("[hosted] Raw output: {}", preview(&content, 200));
        Ok(content)
    }

    async fn list_models(&self) -> Vec<String> {
        get_provider_preset(ProviderId::Hosted).fallback_model_names()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_content_from_first_choice() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":"[1,2,3]"}},{"message":{"content":"ignored"}}]}"#;
        assert_eq!(extract_content(body).as_deref(), Some("[1,2,3]"));
    }

    #[test]
    fn test_extract_content_rejects_empty_envelopes() {
        assert!(extract_content(r#"{"choices":[]}"#).is_none());
        assert!(extract_content(r#"{"choices":[{"message":{"content":null}}]}"#).is_none());
        assert!(extract_content(r#"{"choices":[{"message":{"content":"  "}}]}"#).is_none());
        assert!(extract_content("<html>gateway</html>").is_none());
    }

    #[tokio::test]
    async fn test_list_models_returns_fallback_list() {
        let provider = HostedProvider::new(&HostedConfig::default()).unwrap();
        assert_eq!(provider.list_models().await, vec!["gpt-4", "gpt-3.5-turbo"]);
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_unavailable() {
        let config = HostedConfig {
            // Port 9 (discard) on localhost is not serving HTTP
            base_url: "http://127.0.0.1:9".to_string(),
            ..HostedConfig::default()
        };
        let provider = HostedProvider::new(&config).unwrap();
        let prompt = crate::generation::prompt_builder::build_prompt(
            &crate::models::Idea::parse("bakery").unwrap(),
        );

        let err = provider.generate(&prompt).await.unwrap_err();
        assert!(matches!(
            err,
            GenerationError::ProviderUnavailable {
                provider: ProviderId::Hosted,
                status: None,
                ..
            }
        ));
    }
}
