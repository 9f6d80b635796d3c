//! Prompt Builder - Generates the section-writing prompt for an idea
//!
//! The prompt restates the idea, asks for exactly three sections
//! (Hero, About, Contact) of roughly 150 words each, and pins the reply to a
//! bare JSON array of `{ "title", "content" }` objects.
//!
//! Building is pure: the same idea always yields the same prompt.

use crate::models::{Idea, SECTION_NAMES};

/// Persona sent as the system message (or prepended for single-prompt backends)
pub const SYSTEM_PROMPT: &str = "You are a professional web content writer. \
Generate engaging, professional website sections that are tailored to the specific website idea provided.";

/// Target length for each section's content
pub const WORDS_PER_SECTION: u32 = 150;

/// A prompt split into its fixed persona and per-idea instruction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: String,
    pub instruction: String,
}

impl Prompt {
    /// Persona and instruction joined for backends that take a single prompt string
    pub fn combined(&self) -> String {
        format!("{}\n\n{}", self.system, self.instruction)
    }
}

/// Build the prompt for an idea
pub fn build_prompt(idea: &Idea) -> Prompt {
    Prompt {
        system: SYSTEM_PROMPT.to_string(),
        instruction: build_instruction(idea),
    }
}

fn build_instruction(idea: &Idea) -> String {
    let section_list = SECTION_NAMES.join(", ");

    let mut shape = String::from("[\n");
    for (i, name) in SECTION_NAMES.iter().enumerate() {
        shape.push_str(&format!(
            "  {{\n    \"title\": \"{name} Section Title\",\n    \"content\": \"{name} section content (around {words} words)...\"\n  }}",
            name = name,
            words = WORDS_PER_SECTION
        ));
        if i + 1 < SECTION_NAMES.len() {
            shape.push(',');
        }
        shape.push('\n');
    }
    shape.push(']');

    format!(
        r#"Given a website idea: "{idea}", generate exactly {count} website sections, in this order: {sections}.

For each section, provide:
- A compelling title
- Approximately {words} words of engaging, professional content that matches the website's purpose

Return the response as a JSON array with this exact format:
{shape}

Respond with ONLY the JSON array. Do not add explanations, markdown code fences, or any text before or after it.
Make the content engaging, professional, and tailored to the specific website idea."#,
        idea = idea.as_str(),
        count = SECTION_NAMES.len(),
        sections = section_list,
        words = WORDS_PER_SECTION,
        shape = shape,
    )
}
