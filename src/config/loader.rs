// Configuration file loading

use super::providers::get_provider_preset;
use crate::models::ProviderId;
use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Sectiongen configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// Generation settings
    #[serde(default)]
    pub generation: GenerationConfig,
    /// Hosted (OpenAI-compatible) backend settings
    #[serde(default)]
    pub hosted: HostedConfig,
    /// Local (Ollama-compatible) backend settings
    #[serde(default)]
    pub local: LocalConfig,
    /// Storage settings
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Generation configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GenerationConfig {
    /// Provider used when a request does not name a recognized one
    #[serde(rename = "defaultProvider", alias = "default_provider", default)]
    pub default_provider: Option<String>,
}

impl GenerationConfig {
    /// Resolve the configured default, falling back to hosted when unset or unknown
    pub fn default_provider_id(&self) -> ProviderId {
        match self.default_provider.as_deref() {
            None => ProviderId::default(),
            Some(name) => ProviderId::parse(name).unwrap_or_else(|| {
                log::warn!(
                    "[config] Unknown default provider '{}', using '{}'",
                    name,
                    ProviderId::default()
                );
                ProviderId::default()
            }),
        }
    }
}

/// Hosted backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostedConfig {
    /// Base URL of the chat-completions API (without `/chat/completions`)
    #[serde(rename = "baseUrl", alias = "base_url", default = "default_hosted_base_url")]
    pub base_url: String,
    /// Model identifier sent with every request
    #[serde(default = "default_hosted_model")]
    pub model: String,
    /// API key; when absent the secrets file is consulted
    #[serde(rename = "apiKey", alias = "api_key", default, skip_serializing)]
    pub api_key: Option<String>,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(rename = "maxTokens", alias = "max_tokens", default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Request timeout; no timeout when absent
    #[serde(rename = "timeoutSecs", alias = "timeout_secs", default)]
    pub timeout_secs: Option<u64>,
}

/// Local backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalConfig {
    /// Base URL of the inference server
    #[serde(rename = "baseUrl", alias = "base_url", default = "default_local_base_url")]
    pub base_url: String,
    #[serde(default = "default_local_model")]
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(rename = "topP", alias = "top_p", default = "default_top_p")]
    pub top_p: f64,
    #[serde(rename = "maxTokens", alias = "max_tokens", default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(rename = "timeoutSecs", alias = "timeout_secs", default)]
    pub timeout_secs: Option<u64>,
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StorageConfig {
    /// Directory holding generated sections; defaults to ~/.sectiongen/data
    #[serde(rename = "dataDir", alias = "data_dir", default)]
    pub data_dir: Option<PathBuf>,
}

impl StorageConfig {
    /// Effective data directory
    pub fn resolved_data_dir(&self) -> PathBuf {
        self.data_dir
            .clone()
            .unwrap_or_else(crate::file_storage::get_global_data_dir)
    }
}

fn default_hosted_base_url() -> String {
    get_provider_preset(ProviderId::Hosted).base_url.to_string()
}

fn default_hosted_model() -> String {
    get_provider_preset(ProviderId::Hosted).default_model.to_string()
}

fn default_local_base_url() -> String {
    get_provider_preset(ProviderId::Local).base_url.to_string()
}

fn default_local_model() -> String {
    get_provider_preset(ProviderId::Local).default_model.to_string()
}

fn default_temperature() -> f64 {
    0.7
}

fn default_top_p() -> f64 {
    0.9
}

fn default_max_tokens() -> u32 {
    1000
}

impl Default for HostedConfig {
    fn default() -> Self {
        Self {
            base_url: default_hosted_base_url(),
            model: default_hosted_model(),
            api_key: None,
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_secs: None,
        }
    }
}

impl Default for LocalConfig {
    fn default() -> Self {
        Self {
            base_url: default_local_base_url(),
            model: default_local_model(),
            temperature: default_temperature(),
            top_p: default_top_p(),
            max_tokens: default_max_tokens(),
            timeout_secs: None,
        }
    }
}

/// Config loader
pub struct ConfigLoader {
    /// Config file path
    path: Option<PathBuf>,
}

impl ConfigLoader {
    /// Create a loader for the default config location
    pub fn new() -> Self {
        Self {
            path: Self::get_default_config_path(),
        }
    }

    /// Use an explicit config file instead of the default location
    pub fn with_path(mut self, path: &Path) -> Self {
        self.path = Some(path.to_path_buf());
        self
    }

    /// Get the default config path (~/.config/sectiongen/config.toml on Linux)
    fn get_default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("sectiongen").join("config.toml"))
    }

    /// Get the config path
    pub fn config_path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Load config, returning None when the file does not exist
    pub fn load(&self) -> Result<Option<AppConfig>> {
        match self.path {
            Some(ref path) => self.load_from_path(path),
            None => Ok(None),
        }
    }

    /// Load config from a specific path
    pub fn load_from_path(&self, path: &Path) -> Result<Option<AppConfig>> {
        if !path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(path)
            .map_err(|e| anyhow!("Failed to read config file '{}': {}", path.display(), e))?;

        let config: AppConfig = toml::from_str(&contents)
            .map_err(|e| anyhow!("Failed to parse config file '{}': {}", path.display(), e))?;

        validate_config(&config)?;

        Ok(Some(config))
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Validate config values
pub fn validate_config(config: &AppConfig) -> Result<()> {
    if !(0.0..=2.0).contains(&config.hosted.temperature) {
        return Err(anyhow!("hosted.temperature must be between 0 and 2"));
    }
    if !(0.0..=2.0).contains(&config.local.temperature) {
        return Err(anyhow!("local.temperature must be between 0 and 2"));
    }
    if !(0.0..=1.0).contains(&config.local.top_p) {
        return Err(anyhow!("local.top_p must be between 0 and 1"));
    }
    if config.hosted.max_tokens == 0 || config.local.max_tokens == 0 {
        return Err(anyhow!("max_tokens must be greater than 0"));
    }
    if config.hosted.base_url.trim().is_empty() || config.local.base_url.trim().is_empty() {
        return Err(anyhow!("base_url cannot be empty"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, contents: &str) -> PathBuf {
        let path = dir.path().join("config.toml");
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_defaults_match_presets() {
        let config = AppConfig::default();
        assert_eq!(config.hosted.base_url, "https://api.openai.com/v1");
        assert_eq!(config.hosted.model, "gpt-4");
        assert_eq!(config.hosted.temperature, 0.7);
        assert_eq!(config.hosted.max_tokens, 1000);
        assert_eq!(config.local.base_url, "http://localhost:11434");
        assert_eq!(config.local.model, "llama3.2:3b");
        assert_eq!(config.local.top_p, 0.9);
        assert_eq!(config.generation.default_provider_id(), ProviderId::Hosted);
    }

    #[test]
    fn test_loads_config_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_config(
            &temp_dir,
            r#"
[generation]
default_provider = "ollama"

[local]
base_url = "http://gpu-box:11434"
model = "mistral"

[hosted]
timeout_secs = 30
"#,
        );

        let config = ConfigLoader::new().with_path(&path).load().unwrap().unwrap();
        assert_eq!(config.generation.default_provider_id(), ProviderId::Local);
        assert_eq!(config.local.base_url, "http://gpu-box:11434");
        assert_eq!(config.local.model, "mistral");
        // Unset fields keep their defaults
        assert_eq!(config.local.top_p, 0.9);
        assert_eq!(config.hosted.model, "gpt-4");
        assert_eq!(config.hosted.timeout_secs, Some(30));
    }

    #[test]
    fn test_accepts_camel_case_keys() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_config(
            &temp_dir,
            r#"
[generation]
defaultProvider = "local"

[local]
topP = 0.5
"#,
        );

        let config = ConfigLoader::new().with_path(&path).load().unwrap().unwrap();
        assert_eq!(config.generation.default_provider_id(), ProviderId::Local);
        assert_eq!(config.local.top_p, 0.5);
    }

    #[test]
    fn test_missing_file_is_none() {
        let temp_dir = TempDir::new().unwrap();
        let loader = ConfigLoader::new().with_path(&temp_dir.path().join("missing.toml"));
        assert!(loader.load().unwrap().is_none());
    }

    #[test]
    fn test_rejects_invalid_values() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_config(&temp_dir, "[local]\ntop_p = 1.5\n");
        assert!(ConfigLoader::new().with_path(&path).load().is_err());

        let path = write_config(&temp_dir, "[hosted]\nmax_tokens = 0\n");
        assert!(ConfigLoader::new().with_path(&path).load().is_err());
    }

    #[test]
    fn test_rejects_malformed_toml() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_config(&temp_dir, "[hosted\nmodel = ");
        assert!(ConfigLoader::new().with_path(&path).load().is_err());
    }

    #[test]
    fn test_unknown_default_provider_falls_back_to_hosted() {
        let config = GenerationConfig {
            default_provider: Some("anthropic".to_string()),
        };
        assert_eq!(config.default_provider_id(), ProviderId::Hosted);
    }

    #[test]
    fn test_api_key_is_never_serialized() {
        let mut config = AppConfig::default();
        config.hosted.api_key = Some("sk-secret".to_string());
        let toml_str = toml::to_string(&config).unwrap();
        assert!(!toml_str.contains("sk-secret"));
    }
}
