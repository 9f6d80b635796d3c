//! Command proxy handler that routes HTTP requests to backend commands
//!
//! A single /api/invoke endpoint receives `{cmd, args}` and dispatches to the
//! command routers in `routes/`. Every reply uses the same envelope:
//! `{success, data?, error?}`.

use super::routes;
use super::ServerAppState;
use crate::errors::GenerationError;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Request body for /api/invoke endpoint
#[derive(Debug, Deserialize)]
pub struct InvokeRequest {
    /// Command name (e.g., "generate_sections")
    pub cmd: String,
    /// Command arguments as JSON object
    #[serde(default)]
    pub args: Value,
}

/// Response body for /api/invoke endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct InvokeResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Error type for invoke handler
#[derive(Debug)]
pub struct InvokeError {
    pub status: StatusCode,
    pub message: String,
}

impl InvokeError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }
}

/// Argument and routing errors are the caller's fault
impl From<String> for InvokeError {
    fn from(message: String) -> Self {
        Self::bad_request(message)
    }
}

impl From<GenerationError> for InvokeError {
    fn from(err: GenerationError) -> Self {
        let status = match err {
            GenerationError::ProviderUnavailable { .. }
            | GenerationError::MalformedOutput { .. }
            | GenerationError::Validation(_) => StatusCode::BAD_GATEWAY,
            GenerationError::Persistence { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: format!("{} ({})", err, err.kind()),
        }
    }
}

impl IntoResponse for InvokeError {
    fn into_response(self) -> Response {
        let body = InvokeResponse {
            success: false,
            data: None,
            error: Some(self.message),
        };
        (self.status, Json(body)).into_response()
    }
}

/// Main invoke handler - routes commands to their implementations
pub async fn invoke_handler(
    State(state): State<ServerAppState>,
    Json(req): Json<InvokeRequest>,
) -> Result<Json<InvokeResponse>, InvokeError> {
    log::debug!("[server] Invoke command: {} with args: {:?}", req.cmd, req.args);

    match routes::route_command(&req.cmd, req.args, &state).await {
        Ok(data) => Ok(Json(InvokeResponse {
            success: true,
            data: Some(data),
            error: None,
        })),
        Err(e) => {
            log::warn!("[server] Command {} failed ({}): {}", req.cmd, e.status, e.message);
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ValidationError;
    use crate::models::{ProviderId, SectionItem, SectionSet};

    #[test]
    fn test_generation_error_status_mapping() {
        let cases = [
            (
                GenerationError::unavailable(ProviderId::Local, None, "refused".to_string()),
                StatusCode::BAD_GATEWAY,
            ),
            (GenerationError::malformed("??"), StatusCode::BAD_GATEWAY),
            (
                GenerationError::Validation(ValidationError::NotASequence),
                StatusCode::BAD_GATEWAY,
            ),
            (
                GenerationError::Persistence {
                    sections: SectionSet::try_from(vec![
                        SectionItem::new("A", "B"),
                        SectionItem::new("C", "D"),
                        SectionItem::new("E", "F"),
                    ])
                    .unwrap(),
                    reason: "disk full".to_string(),
                },
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(InvokeError::from(err).status, expected);
        }
    }

    #[test]
    fn test_string_errors_are_bad_requests() {
        let err: InvokeError = "Missing argument: idea".to_string().into();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_error_message_includes_kind() {
        let err = InvokeError::from(GenerationError::malformed("x"));
        assert!(err.message.ends_with("(malformed_output)"));
    }
}
