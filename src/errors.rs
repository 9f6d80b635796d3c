// Error taxonomy for the generation pipeline

use crate::models::{ProviderId, SectionSet};
use thiserror::Error;

/// Shape violations found while validating a candidate section list
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Expected an array of sections")]
    NotASequence,

    #[error("Expected exactly {expected} sections, got {actual}")]
    CountMismatch { expected: usize, actual: usize },

    #[error("Section at index {index} has an empty or missing {field}")]
    EmptyField { index: usize, field: &'static str },
}

impl ValidationError {
    /// Index of the offending section, if the error is about a single item
    pub fn index(&self) -> Option<usize> {
        match self {
            ValidationError::EmptyField { index, .. } => Some(*index),
            _ => None,
        }
    }
}

/// Terminal failure of a generation run
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Provider '{provider}' unavailable: {reason}")]
    ProviderUnavailable {
        provider: ProviderId,
        status: Option<u16>,
        reason: String,
    },

    #[error("Malformed output from provider: no parseable section array found")]
    MalformedOutput { raw: String },

    #[error("Invalid section structure: {0}")]
    Validation(#[from] ValidationError),

    #[error("Failed to save generated sections: {reason}")]
    Persistence { sections: SectionSet, reason: String },
}

impl GenerationError {
    /// Stable tag for transport-level mapping and logs
    pub fn kind(&self) -> &'static str {
        match self {
            GenerationError::ProviderUnavailable { .. } => "provider_unavailable",
            GenerationError::MalformedOutput { .. } => "malformed_output",
            GenerationError::Validation(_) => "validation_error",
            GenerationError::Persistence { .. } => "persistence_error",
        }
    }

    pub(crate) fn unavailable(provider: ProviderId, status: Option<u16>, reason: String) -> Self {
        GenerationError::ProviderUnavailable {
            provider,
            status,
            reason,
        }
    }

    pub(crate) fn malformed(raw: impl Into<String>) -> Self {
        GenerationError::MalformedOutput { raw: raw.into() }
    }
}
