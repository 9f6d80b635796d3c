// Inference backend adapters
//
// Each adapter turns a Prompt into the backend's raw text reply. Parsing and
// validation of that text happen later in the pipeline, identically for
// every backend.

pub mod hosted_provider;
pub mod local_provider;
pub mod selector;

pub use hosted_provider::HostedProvider;
pub use local_provider::LocalProvider;
pub use selector::ProviderSelector;

use crate::config::AppConfig;
use crate::errors::GenerationError;
use crate::generation::prompt_builder::Prompt;
use crate::models::ProviderId;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// An inference backend able to produce section text
#[async_trait]
pub trait SectionProvider: Send + Sync {
    fn id(&self) -> ProviderId;

    /// Send the prompt and return the backend's raw text reply
    ///
    /// Transport failures map to `ProviderUnavailable`; a success response
    /// without usable text maps to `MalformedOutput`. Never retries.
    async fn generate(&self, prompt: &Prompt) -> Result<String, GenerationError>;

    /// Models the backend can serve; empty when unknown
    async fn list_models(&self) -> Vec<String>;
}

/// Build an HTTP client, applying the request timeout when configured
pub(crate) fn build_http_client(timeout_secs: Option<u64>) -> anyhow::Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder();
    if let Some(secs) = timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    builder
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build HTTP client: {}", e))
}

/// Join a base URL and an endpoint path without doubling slashes
pub(crate) fn endpoint(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Build both adapters and the selector from configuration
pub fn build_selector(config: &AppConfig) -> anyhow::Result<ProviderSelector> {
    let hosted: Arc<dyn SectionProvider> = Arc::new(HostedProvider::new(&config.hosted)?);
    let local: Arc<dyn SectionProvider> = Arc::new(LocalProvider::new(&config.local)?);

    Ok(ProviderSelector::new(
        hosted,
        local,
        config.generation.default_provider_id(),
    ))
}
