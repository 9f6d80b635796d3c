//! Generation pipeline
//!
//! [`GenerationService`] runs one idea through provider selection, prompt
//! building, the backend call, normalization and validation. A run either
//! yields a complete validated [`SectionSet`] or a single terminal
//! [`GenerationError`]; there are no retries and no partial results.

pub mod prompt_builder;

pub use prompt_builder::{build_prompt, Prompt};

use crate::errors::GenerationError;
use crate::file_storage::{FileResult, SectionStore};
use crate::models::{GenerationResult, Idea, ProviderId, SectionSet};
use crate::parsers::{normalize, validate_sections};
use crate::providers::ProviderSelector;
use crate::utils::preview;
use std::sync::Arc;

pub struct GenerationService {
    selector: ProviderSelector,
    store: Arc<dyn SectionStore>,
}

impl GenerationService {
    pub fn new(selector: ProviderSelector, store: Arc<dyn SectionStore>) -> Self {
        Self { selector, store }
    }

    pub fn default_provider(&self) -> ProviderId {
        self.selector.default_provider()
    }

    /// Generate and validate sections without persisting them
    pub async fn generate_sections(
        &self,
        idea: &Idea,
        requested: Option<&str>,
    ) -> Result<SectionSet, GenerationError> {
        let (sections, _) = self.generate_with_provider(idea, requested).await?;
        Ok(sections)
    }

    /// Generate sections and persist the result exactly once
    ///
    /// A failed save returns `Persistence` carrying the validated sections so
    /// the caller can retry storage without regenerating.
    pub async fn run(
        &self,
        idea: &Idea,
        requested: Option<&str>,
    ) -> Result<GenerationResult, GenerationError> {
        let (sections, provider) = self.generate_with_provider(idea, requested).await?;
        let result = GenerationResult::new(idea, sections, provider);

        if let Err(reason) = self.store.save(&result) {
            log::error!("[generation] Failed to persist {}: {}", result.id, reason);
            return Err(GenerationError::Persistence {
                sections: result.sections,
                reason,
            });
        }

        log::info!(
            "[generation] Stored generation {} ({} provider)",
            result.id,
            provider
        );
        Ok(result)
    }

    /// All stored generations, newest first
    pub fn list_sections(&self) -> FileResult<Vec<GenerationResult>> {
        self.store.list_all()
    }

    /// Models offered by the resolved provider
    pub async fn available_models(&self, requested: Option<&str>) -> Vec<String> {
        self.selector.resolve(requested).list_models().await
    }

    async fn generate_with_provider(
        &self,
        idea: &Idea,
        requested: Option<&str>,
    ) -> Result<(SectionSet, ProviderId), GenerationError> {
        let provider = self.selector.resolve(requested);
        let provider_id = provider.id();
        log::info!(
            "[generation] Generating sections for '{}' with {} provider",
            preview(idea.as_str(), 80),
            provider_id
        );

        let prompt = build_prompt(idea);

        let outcome = async {
            let raw = provider.generate(&prompt).await?;
            let (candidate, strategy) = normalize(&raw)?;
            log::debug!("[generation] Normalized output via {:?} strategy", strategy);
            Ok::<_, GenerationError>(validate_sections(&candidate)?)
        }
        .await;

        match outcome {
            Ok(sections) => Ok((sections, provider_id)),
            Err(e) => {
                log::warn!(
                    "[generation] {} provider failed ({}): {}",
                    provider_id,
                    e.kind(),
                    e
                );
                Err(e)
            }
        }
    }
}
