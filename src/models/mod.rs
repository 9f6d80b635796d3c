// Data models shared by the generation pipeline, storage and server

use crate::errors::ValidationError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Number of sections every generation must produce (Hero, About, Contact)
pub const SECTION_COUNT: usize = 3;

/// Section names in the order the prompt requests them
pub const SECTION_NAMES: [&str; SECTION_COUNT] = ["Hero", "About", "Contact"];

// ============================================================================
// Provider Identifier
// ============================================================================

/// Inference backend used to generate sections
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ProviderId {
    /// Remote chat-completion API (OpenAI-compatible)
    #[serde(alias = "openai")]
    Hosted,
    /// Local inference server (Ollama-compatible)
    #[serde(alias = "ollama")]
    Local,
}

impl ProviderId {
    /// Returns all provider identifiers
    pub fn all() -> &'static [ProviderId] {
        &[ProviderId::Hosted, ProviderId::Local]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::Hosted => "hosted",
            ProviderId::Local => "local",
        }
    }

    /// Lenient lookup used for request parameters.
    ///
    /// Accepts the canonical names and the legacy backend names
    /// ("openai", "ollama"), ignoring case and surrounding whitespace.
    pub fn parse(value: &str) -> Option<ProviderId> {
        value.parse().ok()
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ProviderId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "hosted" | "openai" => Ok(ProviderId::Hosted),
            "local" | "ollama" => Ok(ProviderId::Local),
            _ => Err(format!(
                "Unknown provider: '{}'. Expected one of: hosted, local",
                s
            )),
        }
    }
}

impl Default for ProviderId {
    fn default() -> Self {
        ProviderId::Hosted
    }
}

// ============================================================================
// Idea
// ============================================================================

/// A website/product idea submitted by the user (never empty)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Idea(String);

impl Idea {
    /// Trim the raw input and reject it if nothing is left
    pub fn parse(raw: &str) -> Result<Idea, String> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err("Website idea is required".to_string());
        }
        Ok(Idea(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Idea {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Sections
// ============================================================================

/// A single generated website section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SectionItem {
    pub title: String,
    pub content: String,
}

impl SectionItem {
    pub fn new(title: &str, content: &str) -> Self {
        Self {
            title: title.to_string(),
            content: content.to_string(),
        }
    }
}

/// The validated Hero/About/Contact bundle.
///
/// Always holds exactly three items with non-empty title and content.
/// Deserialization goes through the same checks as [`SectionSet::try_from`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(try_from = "Vec<SectionItem>", into = "Vec<SectionItem>")]
pub struct SectionSet([SectionItem; SECTION_COUNT]);

impl SectionSet {
    pub fn hero(&self) -> &SectionItem {
        &self.0[0]
    }

    pub fn about(&self) -> &SectionItem {
        &self.0[1]
    }

    pub fn contact(&self) -> &SectionItem {
        &self.0[2]
    }

    pub fn items(&self) -> &[SectionItem] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<SectionItem> {
        self.0.into()
    }
}

impl TryFrom<Vec<SectionItem>> for SectionSet {
    type Error = ValidationError;

    fn try_from(items: Vec<SectionItem>) -> Result<Self, Self::Error> {
        if items.len() != SECTION_COUNT {
            return Err(ValidationError::CountMismatch {
                expected: SECTION_COUNT,
                actual: items.len(),
            });
        }

        for (index, item) in items.iter().enumerate() {
            if item.title.trim().is_empty() {
                return Err(ValidationError::EmptyField {
                    index,
                    field: "title",
                });
            }
            if item.content.trim().is_empty() {
                return Err(ValidationError::EmptyField {
                    index,
                    field: "content",
                });
            }
        }

        let items: [SectionItem; SECTION_COUNT] =
            items
                .try_into()
                .map_err(|rest: Vec<SectionItem>| ValidationError::CountMismatch {
                    expected: SECTION_COUNT,
                    actual: rest.len(),
                })?;
        Ok(SectionSet(items))
    }
}

impl From<SectionSet> for Vec<SectionItem> {
    fn from(set: SectionSet) -> Self {
        set.into_vec()
    }
}

// ============================================================================
// Generation Result
// ============================================================================

/// A persisted generation: the idea, the sections produced for it, and
/// which backend produced them
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResult {
    pub id: String,
    pub idea: String,
    pub sections: SectionSet,
    pub provider: ProviderId,
    pub created_at: DateTime<Utc>,
}

impl GenerationResult {
    /// Stamp a freshly validated section set with an id and creation time
    pub fn new(idea: &Idea, sections: SectionSet, provider: ProviderId) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            idea: idea.as_str().to_string(),
            sections,
            provider,
            created_at: Utc::now(),
        }
    }
}
