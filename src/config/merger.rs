// Configuration merging with priority

use crate::config::loader::{AppConfig, GenerationConfig, HostedConfig, LocalConfig, StorageConfig};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Partial configuration for merging
/// Uses Option<T> for all fields to support partial overrides
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PartialConfig {
    #[serde(default)]
    pub generation: Option<PartialGenerationConfig>,
    #[serde(default)]
    pub hosted: Option<PartialHostedConfig>,
    #[serde(default)]
    pub local: Option<PartialLocalConfig>,
    #[serde(default)]
    pub storage: Option<PartialStorageConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PartialGenerationConfig {
    pub default_provider: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PartialHostedConfig {
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PartialLocalConfig {
    pub base_url: Option<String>,
    pub model: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PartialStorageConfig {
    pub data_dir: Option<PathBuf>,
}

/// Environment variables recognized as overrides
pub const ENV_DEFAULT_PROVIDER: &str = "AI_PROVIDER";
pub const ENV_HOSTED_API_KEY: &str = "OPENAI_API_KEY";
pub const ENV_HOSTED_BASE_URL: &str = "OPENAI_BASE_URL";
pub const ENV_HOSTED_MODEL: &str = "OPENAI_MODEL";
pub const ENV_LOCAL_BASE_URL: &str = "OLLAMA_URL";
pub const ENV_LOCAL_MODEL: &str = "OLLAMA_MODEL";
pub const ENV_DATA_DIR: &str = "SECTIONGEN_DATA_DIR";

impl PartialConfig {
    /// Build overrides from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build overrides from any variable lookup (empty values are ignored)
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let generation = get(ENV_DEFAULT_PROVIDER).map(|p| PartialGenerationConfig {
            default_provider: Some(p),
        });

        let hosted = PartialHostedConfig {
            base_url: get(ENV_HOSTED_BASE_URL),
            model: get(ENV_HOSTED_MODEL),
            api_key: get(ENV_HOSTED_API_KEY),
        };
        let hosted = (hosted.base_url.is_some()
            || hosted.model.is_some()
            || hosted.api_key.is_some())
        .then_some(hosted);

        let local = PartialLocalConfig {
            base_url: get(ENV_LOCAL_BASE_URL),
            model: get(ENV_LOCAL_MODEL),
        };
        let local = (local.base_url.is_some() || local.model.is_some()).then_some(local);

        let storage = get(ENV_DATA_DIR).map(|dir| PartialStorageConfig {
            data_dir: Some(PathBuf::from(dir)),
        });

        Self {
            generation,
            hosted,
            local,
            storage,
        }
    }
}

/// Configuration merger
/// Priority order: CLI -> Environment -> File -> Defaults
pub struct ConfigMerger {
    defaults: AppConfig,
    file: Option<AppConfig>,
    env: Option<PartialConfig>,
    cli: Option<PartialConfig>,
}

impl ConfigMerger {
    /// Create a new config merger with defaults
    pub fn new() -> Self {
        Self {
            defaults: AppConfig::default(),
            file: None,
            env: None,
            cli: None,
        }
    }

    /// Set config loaded from file
    pub fn with_file(mut self, config: Option<AppConfig>) -> Self {
        self.file = config;
        self
    }

    /// Set environment overrides
    pub fn with_env(mut self, config: Option<PartialConfig>) -> Self {
        self.env = config;
        self
    }

    /// Set CLI overrides
    pub fn with_cli(mut self, config: Option<PartialConfig>) -> Self {
        self.cli = config;
        self
    }

    /// Merge all configs with priority
    pub fn merge(&self) -> AppConfig {
        let mut result = self
            .file
            .clone()
            .unwrap_or_else(|| self.defaults.clone());

        if let Some(ref env) = self.env {
            result = self.merge_partial(&result, env);
        }

        // CLI overrides have the highest priority
        if let Some(ref cli) = self.cli {
            result = self.merge_partial(&result, cli);
        }

        result
    }

    /// Merge partial config into full config
    fn merge_partial(&self, base: &AppConfig, partial: &PartialConfig) -> AppConfig {
        AppConfig {
            generation: partial
                .generation
                .as_ref()
                .map(|p| self.merge_partial_generation(&base.generation, p))
                .unwrap_or_else(|| base.generation.clone()),
            hosted: partial
                .hosted
                .as_ref()
                .map(|p| self.merge_partial_hosted(&base.hosted, p))
                .unwrap_or_else(|| base.hosted.clone()),
            local: partial
                .local
                .as_ref()
                .map(|p| self.merge_partial_local(&base.local, p))
                .unwrap_or_else(|| base.local.clone()),
            storage: partial
                .storage
                .as_ref()
                .map(|p| self.merge_partial_storage(&base.storage, p))
                .unwrap_or_else(|| base.storage.clone()),
        }
    }

    fn merge_partial_generation(
        &self,
        base: &GenerationConfig,
        partial: &PartialGenerationConfig,
    ) -> GenerationConfig {
        GenerationConfig {
            default_provider: partial
                .default_provider
                .clone()
                .or_else(|| base.default_provider.clone()),
        }
    }

    fn merge_partial_hosted(
        &self,
        base: &HostedConfig,
        partial: &PartialHostedConfig,
    ) -> HostedConfig {
        HostedConfig {
            base_url: partial
                .base_url
                .clone()
                .unwrap_or_else(|| base.base_url.clone()),
            model: partial.model.clone().unwrap_or_else(|| base.model.clone()),
            api_key: partial.api_key.clone().or_else(|| base.api_key.clone()),
            ..base.clone()
        }
    }

    fn merge_partial_local(&self, base: &LocalConfig, partial: &PartialLocalConfig) -> LocalConfig {
        LocalConfig {
            base_url: partial
                .base_url
                .clone()
                .unwrap_or_else(|| base.base_url.clone()),
            model: partial.model.clone().unwrap_or_else(|| base.model.clone()),
            ..base.clone()
        }
    }

    fn merge_partial_storage(
        &self,
        base: &StorageConfig,
        partial: &PartialStorageConfig,
    ) -> StorageConfig {
        StorageConfig {
            data_dir: partial.data_dir.clone().or_else(|| base.data_dir.clone()),
        }
    }
}

impl Default for ConfigMerger {
    fn default() -> Self {
        Self::new()
    }
}
