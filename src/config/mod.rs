// Layered configuration system

pub mod loader;
pub mod merger;
pub mod providers;
pub mod secrets;

// Re-export main types
pub use loader::{
    validate_config, AppConfig, ConfigLoader, GenerationConfig, HostedConfig, LocalConfig,
    StorageConfig,
};
pub use merger::{
    ConfigMerger, PartialConfig, PartialGenerationConfig, PartialHostedConfig, PartialLocalConfig,
    PartialStorageConfig,
};
pub use providers::{get_provider_preset, ProviderInfo, ProviderPreset, PROVIDERS};
pub use secrets::SecretsConfig;

use crate::models::ProviderId;
use anyhow::Result;
use std::path::Path;

/// Load and merge configuration from all sources
/// Priority: CLI -> Environment -> File -> Defaults
///
/// A config file that exists but cannot be parsed is an error; a missing
/// file is not. When no hosted API key is configured anywhere, the secrets
/// file is consulted last.
pub fn load_config(
    config_path: Option<&Path>,
    cli_overrides: Option<PartialConfig>,
) -> Result<AppConfig> {
    let loader = match config_path {
        Some(path) => ConfigLoader::new().with_path(path),
        None => ConfigLoader::new(),
    };

    let file = loader.load()?;
    if file.is_none() {
        log::debug!(
            "[config] No config file at {:?}, using defaults",
            loader.config_path()
        );
    }

    let mut config = ConfigMerger::new()
        .with_file(file)
        .with_env(Some(PartialConfig::from_env()))
        .with_cli(cli_overrides)
        .merge();

    if config.hosted.api_key.is_none() {
        config.hosted.api_key = load_secret_key(ProviderId::Hosted);
    }

    validate_config(&config)?;
    Ok(config)
}

/// Read a provider key from the secrets file, logging instead of failing
fn load_secret_key(provider: ProviderId) -> Option<String> {
    match SecretsConfig::load() {
        Ok(secrets) => secrets.get_token(provider).map(str::to_string),
        Err(e) => {
            log::warn!("[config] Could not read secrets file: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_config_from_explicit_path() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "[local]\ntop_p = 0.4\n").unwrap();

        let config = load_config(Some(&path), None).unwrap();
        assert_eq!(config.local.top_p, 0.4);
    }

    #[test]
    fn test_load_config_cli_wins_over_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "[storage]\ndata_dir = \"/from/file\"\n").unwrap();

        let cli = PartialConfig {
            storage: Some(PartialStorageConfig {
                data_dir: Some("/from/cli".into()),
            }),
            ..Default::default()
        };

        let config = load_config(Some(&path), Some(cli)).unwrap();
        assert_eq!(
            config.storage.resolved_data_dir(),
            std::path::PathBuf::from("/from/cli")
        );
    }

    #[test]
    fn test_load_config_rejects_broken_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "not = [valid").unwrap();

        assert!(load_config(Some(&path), None).is_err());
    }
}
