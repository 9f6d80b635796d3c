// Parsers that turn raw backend replies into validated section sets

pub mod section_validator;
pub mod structured_output;

pub use section_validator::validate_sections;
pub use structured_output::{normalize, NormalizeStrategy};

use crate::errors::GenerationError;
use crate::models::SectionSet;

/// Normalize then validate a raw backend reply
///
/// Convenience for callers that do not care which normalization strategy
/// succeeded.
pub fn parse_sections(raw: &str) -> Result<SectionSet, GenerationError> {
    let (candidate, _) = normalize(raw)?;
    Ok(validate_sections(&candidate)?)
}
