// Section validator - checks the candidate array and builds a SectionSet
//
// Rules are checked in order and the first violation is reported:
// 1. the candidate is an array
// 2. it has exactly three elements
// 3. every element has a non-blank string `title` and `content`
//
// Positions are trusted: index 0/1/2 are taken to be Hero/About/Contact
// without looking at the titles.

use crate::errors::ValidationError;
use crate::models::{SectionItem, SectionSet, SECTION_COUNT};
use serde_json::Value;

/// Read a non-blank string field from a section object
fn required_text(
    item: &Value,
    index: usize,
    field: &'static str,
) -> Result<String, ValidationError> {
    match item.get(field).and_then(Value::as_str) {
        Some(text) if !text.trim().is_empty() => Ok(text.to_string()),
        _ => Err(ValidationError::EmptyField { index, field }),
    }
}

/// Validate a loosely typed candidate and convert it into a SectionSet
pub fn validate_sections(candidate: &Value) -> Result<SectionSet, ValidationError> {
    let items = candidate.as_array().ok_or(ValidationError::NotASequence)?;

    if items.len() != SECTION_COUNT {
        return Err(ValidationError::CountMismatch {
            expected: SECTION_COUNT,
            actual: items.len(),
        });
    }

    let mut sections = Vec::with_capacity(SECTION_COUNT);
    for (index, item) in items.iter().enumerate() {
        let title = required_text(item, index, "title")?;
        let content = required_text(item, index, "content")?;
        sections.push(SectionItem { title, content });
    }

    SectionSet::try_from(sections)
}
