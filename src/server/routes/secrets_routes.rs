//! Secrets command routing
//!
//! Handles: set_provider_token, delete_provider_token
//!
//! Tokens are read when the server starts, so a change applies to the
//! hosted backend after the next restart.

use crate::config::SecretsConfig;
use crate::models::ProviderId;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};

use super::{get_arg, InvokeError, ServerAppState};

const SECRETS_COMMANDS: &[&str] = &["set_provider_token", "delete_provider_token"];

pub fn is_secrets_command(cmd: &str) -> bool {
    SECRETS_COMMANDS.contains(&cmd)
}

/// Route secrets commands
pub fn route_secrets_command(
    cmd: &str,
    args: Value,
    state: &ServerAppState,
) -> Result<Value, InvokeError> {
    let provider = provider_arg(&args)?;
    let path = secrets_path(state)?;

    match cmd {
        "set_provider_token" => {
            let token: String = get_arg(&args, "token")?;
            if token.trim().is_empty() {
                return Err(InvokeError::bad_request("Token cannot be empty"));
            }
            set_provider_token(&path, provider, token.trim()).map_err(InvokeError::internal)?;
            Ok(Value::Null)
        }

        "delete_provider_token" => {
            let deleted = delete_provider_token(&path, provider).map_err(InvokeError::internal)?;
            Ok(json!({ "deleted": deleted }))
        }

        _ => Err(InvokeError::bad_request(format!(
            "Unknown secrets command: {}",
            cmd
        ))),
    }
}

fn provider_arg(args: &Value) -> Result<ProviderId, InvokeError> {
    let raw: String = get_arg(args, "provider")?;
    ProviderId::parse(&raw)
        .ok_or_else(|| InvokeError::bad_request(format!("Unknown provider: {}", raw)))
}

fn secrets_path(state: &ServerAppState) -> Result<PathBuf, InvokeError> {
    state
        .secrets_path()
        .ok_or_else(|| InvokeError::internal("Could not determine home directory"))
}

/// Store a provider's API token
pub fn set_provider_token(path: &Path, provider: ProviderId, token: &str) -> Result<(), String> {
    let mut secrets = SecretsConfig::load_from(path).map_err(|e| e.to_string())?;
    secrets.set_token(provider, token);
    secrets.save_to(path).map_err(|e| e.to_string())?;

    log::info!("[secrets] Set token for provider: {}", provider);
    Ok(())
}

/// Remove a provider's API token, returning whether one was stored
pub fn delete_provider_token(path: &Path, provider: ProviderId) -> Result<bool, String> {
    let mut secrets = SecretsConfig::load_from(path).map_err(|e| e.to_string())?;
    if !secrets.delete_token(provider) {
        return Ok(false);
    }

    secrets.save_to(path).map_err(|e| e.to_string())?;
    log::info!("[secrets] Deleted token for provider: {}", provider);
    Ok(true)
}
