//! Section command routing
//!
//! Handles: generate_sections, get_sections, get_available_models,
//! get_default_provider, get_providers

use crate::config::{get_provider_preset, ProviderInfo};
use crate::models::{Idea, ProviderId};
use serde_json::{json, Value};

use super::{get_arg, get_opt_arg, to_data, InvokeError, ServerAppState};

const SECTION_COMMANDS: &[&str] = &[
    "generate_sections",
    "get_sections",
    "get_available_models",
    "get_default_provider",
    "get_providers",
];

pub fn is_section_command(cmd: &str) -> bool {
    SECTION_COMMANDS.contains(&cmd)
}

/// Route section commands
pub async fn route_section_command(
    cmd: &str,
    args: Value,
    state: &ServerAppState,
) -> Result<Value, InvokeError> {
    match cmd {
        "generate_sections" => {
            let raw: String = get_arg(&args, "idea")?;
            let idea = Idea::parse(&raw)?;
            let provider: Option<String> = get_opt_arg(&args, "provider")?;
            let result = state.service.run(&idea, provider.as_deref()).await?;
            to_data(result)
        }

        "get_sections" => {
            let sections = state
                .service
                .list_sections()
                .map_err(|e| InvokeError::internal(format!("Failed to fetch sections: {}", e)))?;
            to_data(sections)
        }

        "get_available_models" => {
            let provider: Option<String> = get_opt_arg(&args, "provider")?;
            to_data(state.service.available_models(provider.as_deref()).await)
        }

        "get_default_provider" => Ok(json!({ "provider": state.service.default_provider() })),

        "get_providers" => to_data(provider_infos(state)),

        _ => Err(InvokeError::bad_request(format!(
            "Unknown section command: {}",
            cmd
        ))),
    }
}

/// Describe both backends with their effective endpoint and model
fn provider_infos(state: &ServerAppState) -> Vec<ProviderInfo> {
    let default = state.service.default_provider();
    ProviderId::all()
        .iter()
        .map(|id| {
            let (base_url, model) = match id {
                ProviderId::Hosted => (&state.config.hosted.base_url, &state.config.hosted.model),
                ProviderId::Local => (&state.config.local.base_url, &state.config.local.model),
            };
            get_provider_preset(*id).to_info(base_url, model, *id == default)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_section_command() {
        assert!(is_section_command("generate_sections"));
        assert!(is_section_command("get_default_provider"));
        assert!(!is_section_command("get_config"));
    }
}
