//! Command routing modules
//!
//! - section_routes: generation, history, models and provider commands
//! - secrets_routes: provider API tokens

pub mod secrets_routes;
pub mod section_routes;

use serde_json::Value;

use super::proxy::InvokeError;
use super::ServerAppState;

/// Extract a required argument from JSON args
pub fn get_arg<T: serde::de::DeserializeOwned>(args: &Value, name: &str) -> Result<T, String> {
    serde_json::from_value(
        args.get(name)
            .ok_or_else(|| format!("Missing argument: {}", name))?
            .clone(),
    )
    .map_err(|e| format!("Invalid argument {}: {}", name, e))
}

/// Extract an optional argument from JSON args
pub fn get_opt_arg<T: serde::de::DeserializeOwned>(
    args: &Value,
    name: &str,
) -> Result<Option<T>, String> {
    match args.get(name) {
        Some(v) if !v.is_null() => serde_json::from_value(v.clone())
            .map(Some)
            .map_err(|e| format!("Invalid argument {}: {}", name, e)),
        _ => Ok(None),
    }
}

/// Serialize a command result into the response payload
pub fn to_data<T: serde::Serialize>(result: T) -> Result<Value, InvokeError> {
    serde_json::to_value(result).map_err(|e| InvokeError::internal(e.to_string()))
}

/// Route a command to its implementation by dispatching to the appropriate sub-router
pub async fn route_command(
    cmd: &str,
    args: Value,
    state: &ServerAppState,
) -> Result<Value, InvokeError> {
    if section_routes::is_section_command(cmd) {
        return section_routes::route_section_command(cmd, args, state).await;
    }

    if secrets_routes::is_secrets_command(cmd) {
        return secrets_routes::route_secrets_command(cmd, args, state);
    }

    Err(InvokeError::bad_request(format!("Unknown command: {}", cmd)))
}
