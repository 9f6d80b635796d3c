// Builtin presets for the two supported inference backends
//
// The hosted backend speaks the OpenAI chat-completions protocol; the local
// backend speaks the Ollama generate/tags protocol. Presets supply the
// defaults used when the config file leaves a value out.

use crate::models::ProviderId;
use serde::{Deserialize, Serialize};

/// A builtin provider preset
/// Note: This is hardcoded data, not deserialized from files
#[derive(Debug, Clone)]
pub struct ProviderPreset {
    pub id: ProviderId,
    /// Display name
    pub name: &'static str,
    /// Default base URL for the backend
    pub base_url: &'static str,
    /// Model used when none is configured
    pub default_model: &'static str,
    /// Models reported when the backend catalog cannot be queried
    pub fallback_models: &'static [&'static str],
}

/// Builtin provider presets
pub static PROVIDERS: &[ProviderPreset] = &[
    ProviderPreset {
        id: ProviderId::Hosted,
        name: "OpenAI (Hosted)",
        base_url: "https://api.openai.com/v1",
        default_model: "gpt-4",
        // The chat-completions adapter has no catalog endpoint
        fallback_models: &["gpt-4", "gpt-3.5-turbo"],
    },
    ProviderPreset {
        id: ProviderId::Local,
        name: "Ollama (Local)",
        base_url: "http://localhost:11434",
        default_model: "llama3.2:3b",
        fallback_models: &[],
    },
];

/// Get the preset for a provider
pub fn get_provider_preset(id: ProviderId) -> &'static ProviderPreset {
    match id {
        ProviderId::Hosted => &PROVIDERS[0],
        ProviderId::Local => &PROVIDERS[1],
    }
}

/// Provider info returned to clients
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderInfo {
    pub id: ProviderId,
    pub name: String,
    pub base_url: String,
    pub model: String,
    /// Whether this provider is the configured default
    pub is_default: bool,
}

impl ProviderPreset {
    /// Convert to ProviderInfo with the effective endpoint and model
    pub fn to_info(&self, base_url: &str, model: &str, is_default: bool) -> ProviderInfo {
        ProviderInfo {
            id: self.id,
            name: self.name.to_string(),
            base_url: base_url.to_string(),
            model: model.to_string(),
            is_default,
        }
    }

    pub fn fallback_model_names(&self) -> Vec<String> {
        self.fallback_models.iter().map(|m| (*m).to_string()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_provider_preset() {
        let hosted = get_provider_preset(ProviderId::Hosted);
        assert_eq!(hosted.id, ProviderId::Hosted);
        assert_eq!(hosted.default_model, "gpt-4");

        let local = get_provider_preset(ProviderId::Local);
        assert_eq!(local.id, ProviderId::Local);
        assert_eq!(local.base_url, "http://localhost:11434");
    }

    #[test]
    fn test_every_provider_has_a_preset() {
        for id in ProviderId::all() {
            assert_eq!(get_provider_preset(*id).id, *id);
        }
    }

    #[test]
    fn test_hosted_fallback_models() {
        let names = get_provider_preset(ProviderId::Hosted).fallback_model_names();
        assert_eq!(names, vec!["gpt-4", "gpt-3.5-turbo"]);
    }

    #[test]
    fn test_preset_to_info() {
        let info = get_provider_preset(ProviderId::Local).to_info(
            "http://gpu-box:11434",
            "mistral",
            false,
        );
        assert_eq!(info.id, ProviderId::Local);
        assert_eq!(info.name, "Ollama (Local)");
        assert_eq!(info.base_url, "http://gpu-box:11434");
        assert_eq!(info.model, "mistral");
        assert!(!info.is_default);
    }
}
