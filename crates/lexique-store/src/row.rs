use chrono::{DateTime, Utc};
use lexique_types::{CefrLevel, DifficultyLevel, Examples, Familiarity, Word};
use sqlx::FromRow;

use crate::StoreError;

/// Column list shared by every query that returns whole words
pub(crate) const COLUMNS: &str = "id, original_word, french_word, english_translation, \
    french_explanation, english_examples, french_examples, difficulty_level, cefr_level, \
    part_of_speech, familiarity, prompt_used, created_at, updated_at";

#[derive(Debug, FromRow)]
pub(crate) struct WordRow {
    pub id: i64,
    pub original_word: String,
    pub french_word: String,
    pub english_translation: String,
    pub french_explanation: String,
    pub english_examples: String,
    pub french_examples: String,
    pub difficulty_level: String,
    pub cefr_level: Option<String>,
    pub part_of_speech: Option<String>,
    pub familiarity: String,
    pub prompt_used: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<WordRow> for Word {
    type Error = StoreError;

    fn try_from(row: WordRow) -> Result<Self, Self::Error> {
        let id = row.id;
        let corrupt = |reason: String| StoreError::Corrupt { id, reason };

        let examples = |raw: &str, column: &str| {
            serde_json::from_str::<Examples>(raw).map_err(|e| corrupt(format!("{column}: {e}")))
        };
        let english_examples = examples(&row.english_examples, "english_examples")?;
        let french_examples = examples(&row.french_examples, "french_examples")?;

        let difficulty_level = DifficultyLevel::parse(&row.difficulty_level)
            .ok_or_else(|| corrupt(format!("difficulty_level `{}`", row.difficulty_level)))?;
        let familiarity = Familiarity::parse(&row.familiarity)
            .ok_or_else(|| corrupt(format!("familiarity `{}`", row.familiarity)))?;
        let cefr_level = match row.cefr_level.as_deref() {
            Some(code) => Some(
                CefrLevel::parse(code).ok_or_else(|| corrupt(format!("cefr_level `{code}`")))?,
            ),
            None => None,
        };

        Ok(Word {
            id,
            original_word: row.original_word,
            french_word: row.french_word,
            english_translation: row.english_translation,
            french_explanation: row.french_explanation,
            english_examples,
            french_examples,
            difficulty_level,
            cefr_level,
            part_of_speech: row.part_of_speech,
            familiarity,
            prompt_used: row.prompt_used,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
