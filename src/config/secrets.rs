// API keys kept outside the main config file
//
// Stored in ~/.sectiongen/secrets.toml, keyed by provider id ("hosted").
// Only the hosted backend needs a key today.

use crate::models::ProviderId;
use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Secrets stored in ~/.sectiongen/secrets.toml
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SecretsConfig {
    /// API tokens indexed by provider id
    #[serde(default)]
    pub api_tokens: HashMap<String, String>,
}

impl SecretsConfig {
    pub fn get_secrets_path() -> Option<PathBuf> {
        dirs::home_dir().map(|p| p.join(".sectiongen").join("secrets.toml"))
    }

    /// Load secrets from the default location; missing file yields empty secrets
    pub fn load() -> Result<Self> {
        let path = Self::get_secrets_path()
            .ok_or_else(|| anyhow!("Could not determine home directory"))?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .map_err(|e| anyhow!("Failed to read secrets file '{}': {}", path.display(), e))?;

        toml::from_str(&contents)
            .map_err(|e| anyhow!("Failed to parse secrets file '{}': {}", path.display(), e))
    }

    /// Write secrets, owner read/write only on Unix
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                anyhow!(
                    "Failed to create secrets directory '{}': {}",
                    parent.display(),
                    e
                )
            })?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| anyhow!("Failed to serialize secrets: {}", e))?;

        fs::write(path, contents)
            .map_err(|e| anyhow!("Failed to write secrets file '{}': {}", path.display(), e))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(path, fs::Permissions::from_mode(0o600)).map_err(|e| {
                anyhow!(
                    "Failed to set permissions on secrets file '{}': {}",
                    path.display(),
                    e
                )
            })?;
        }

        log::info!("[config] Saved secrets to: {}", path.display());
        Ok(())
    }

    pub fn get_token(&self, provider: ProviderId) -> Option<&str> {
        self.api_tokens
            .get(provider.as_str())
            .map(String::as_str)
            .filter(|t| !t.trim().is_empty())
    }

    pub fn set_token(&mut self, provider: ProviderId, token: &str) {
        self.api_tokens
            .insert(provider.as_str().to_string(), token.to_string());
    }

    /// Remove a provider's token, returning whether one existed
    pub fn delete_token(&mut self, provider: ProviderId) -> bool {
        self.api_tokens.remove(provider.as_str()).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_set_get_delete_token() {
        let mut secrets = SecretsConfig::default();
        assert!(secrets.get_token(ProviderId::Hosted).is_none());

        secrets.set_token(ProviderId::Hosted, "sk-test");
        assert_eq!(secrets.get_token(ProviderId::Hosted), Some("sk-test"));
        assert!(secrets.get_token(ProviderId::Local).is_none());

        assert!(secrets.delete_token(ProviderId::Hosted));
        assert!(!secrets.delete_token(ProviderId::Hosted));
    }

    #[test]
    fn test_blank_token_is_ignored() {
        let mut secrets = SecretsConfig::default();
        secrets.set_token(ProviderId::Hosted, "  ");
        assert!(secrets.get_token(ProviderId::Hosted).is_none());
    }

    #[test]
    fn test_missing_file_yields_empty_secrets() {
        let temp_dir = TempDir::new().unwrap();
        let secrets = SecretsConfig::load_from(&temp_dir.path().join("secrets.toml")).unwrap();
        assert!(secrets.api_tokens.is_empty());
    }

    #[test]
    fn test_save_and_reload() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("secrets.toml");

        let mut secrets = SecretsConfig::default();
        secrets.set_token(ProviderId::Hosted, "sk-12345");
        secrets.save_to(&path).unwrap();

        let loaded = SecretsConfig::load_from(&path).unwrap();
        assert_eq!(loaded.get_token(ProviderId::Hosted), Some("sk-12345"));

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = fs::metadata(&path).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o600);
        }
    }
}
