use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::level::{CefrLevel, DifficultyLevel, Familiarity};

/// Number of usage examples kept per language
pub const EXAMPLE_COUNT: usize = 3;

/// Exactly three example sentences
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct Examples([String; EXAMPLE_COUNT]);

impl Examples {
    /// Build from any list, truncating extras and padding with blanks
    pub fn from_vec(items: Vec<String>) -> Self {
        let mut slots: [String; EXAMPLE_COUNT] = Default::default();
        for (slot, item) in slots.iter_mut().zip(items) {
            *slot = item.trim().to_string();
        }
        Self(slots)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.0.iter()
    }

    pub fn is_complete(&self) -> bool {
        self.0.iter().all(|e| !e.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.0.iter().all(String::is_empty)
    }
}

impl From<Vec<String>> for Examples {
    fn from(items: Vec<String>) -> Self {
        Self::from_vec(items)
    }
}

impl From<Examples> for Vec<String> {
    fn from(examples: Examples) -> Self {
        examples.0.into()
    }
}

/// Persisted dictionary entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    pub id: i64,
    pub original_word: String,
    pub french_word: String,
    pub english_translation: String,
    pub french_explanation: String,
    pub english_examples: Examples,
    pub french_examples: Examples,
    pub difficulty_level: DifficultyLevel,
    pub cefr_level: Option<CefrLevel>,
    pub part_of_speech: Option<String>,
    pub familiarity: Familiarity,
    /// Prompt sent to the model, kept verbatim for audit
    pub prompt_used: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Word content ready to be written, without persistence metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewWord {
    pub original_word: String,
    pub french_word: String,
    pub english_translation: String,
    pub french_explanation: String,
    pub english_examples: Examples,
    pub french_examples: Examples,
    pub difficulty_level: DifficultyLevel,
    pub cefr_level: Option<CefrLevel>,
    pub part_of_speech: Option<String>,
    pub prompt_used: String,
}

/// Equality filters for listing words
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WordFilter {
    pub difficulty_level: Option<DifficultyLevel>,
    pub familiarity: Option<Familiarity>,
}

impl WordFilter {
    pub fn familiarity(familiarity: Familiarity) -> Self {
        Self {
            familiarity: Some(familiarity),
            ..Self::default()
        }
    }

    pub fn difficulty(difficulty_level: DifficultyLevel) -> Self {
        Self {
            difficulty_level: Some(difficulty_level),
            ..Self::default()
        }
    }
}

/// The only fields a saved word may change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetadataUpdate {
    pub difficulty_level: DifficultyLevel,
    pub familiarity: Familiarity,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn examples_pad_and_truncate() {
        let short = Examples::from_vec(vec!["Bonjour !".into()]);
        assert_eq!(short.as_slice(), ["Bonjour !", "", ""]);
        assert!(!short.is_complete());

        let long = Examples::from_vec((1..=5).map(|i| format!("phrase {i}")).collect());
        assert_eq!(long.as_slice(), ["phrase 1", "phrase 2", "phrase 3"]);
        assert!(long.is_complete());
    }

    #[test]
    fn examples_serialize_as_plain_list() {
        let examples = Examples::from_vec(vec!["a".into(), "b".into(), "c".into()]);
        let json = serde_json::to_string(&examples).unwrap();
        assert_eq!(json, r#"["a","b","c"]"#);

        let back: Examples = serde_json::from_str(r#"["x"]"#).unwrap();
        assert_eq!(back.as_slice(), ["x", "", ""]);
    }
}
