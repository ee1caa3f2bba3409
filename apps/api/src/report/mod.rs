// Report generation: prompts → concurrent completions → assembly → delivery → persistence.
// All completions go through llm_client via the CompletionClient trait.

use std::fmt;

use serde::{Deserialize, Serialize};

pub mod archive;
pub mod assembler;
pub mod fanout;
pub mod generator;
pub mod handlers;
pub mod prompt_builder;
pub mod prompts;
pub mod store;

/// One AI-generated content block of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Result,
    CareerAcademic,
    Relationship,
    StrengthWeakness,
}

impl Section {
    /// Page order in rendered reports.
    pub const ALL: [Section; 4] = [
        Section::Result,
        Section::CareerAcademic,
        Section::Relationship,
        Section::StrengthWeakness,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Section::Result => "result",
            Section::CareerAcademic => "career_academic",
            Section::Relationship => "relationship",
            Section::StrengthWeakness => "strength_weakness",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Section::Result => "Your Personality at a Glance",
            Section::CareerAcademic => "Career & Academics",
            Section::Relationship => "Relationships",
            Section::StrengthWeakness => "Strengths & Growth",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_serde_matches_key() {
        for section in Section::ALL {
            let json = serde_json::to_string(&section).unwrap();
            assert_eq!(json, format!("\"{}\"", section.key()));
        }
    }
}
