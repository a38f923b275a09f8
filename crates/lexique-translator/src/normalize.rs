//! Turning raw model output into entry fields.
//!
//! Models are asked for a JSON object but do not always comply: the text may
//! arrive wrapped in markdown fences, with trailing commas, under the key
//! names of an older prompt, or as free prose. [`LenientNormalizer`] recovers
//! what it can and leaves the rest empty. [`StrictNormalizer`] accepts only
//! the complete schema.

use std::sync::{Arc, LazyLock};

use lexique_config::translator::NormalizerKind;
use lexique_types::{CefrLevel, DifficultyLevel, EXAMPLE_COUNT};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Entry fields as far as they could be read from the response.
/// Every field stays empty until the response proves it present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedEntry {
    pub original_word: Option<String>,
    pub french_word: Option<String>,
    pub english_translation: Option<String>,
    pub french_explanation: Option<String>,
    pub english_examples: Vec<String>,
    pub french_examples: Vec<String>,
    pub cefr_level: Option<CefrLevel>,
    pub difficulty_level: Option<DifficultyLevel>,
    pub part_of_speech: Option<String>,
}

impl ParsedEntry {
    pub fn is_empty(&self) -> bool {
        *self == ParsedEntry::default()
    }

    fn set_difficulty(&mut self, raw: &str) {
        if let Some(cefr) = CefrLevel::parse(raw) {
            self.cefr_level = Some(cefr);
            self.difficulty_level = Some(cefr.difficulty());
        } else if let Some(level) = DifficultyLevel::parse(raw) {
            self.difficulty_level = Some(level);
        }
    }

    /// Like `set_difficulty`, but also reads levels written with a
    /// description, e.g. `C1 - Advanced` or `B1 (Intermediate)`
    fn set_difficulty_loose(&mut self, raw: &str) {
        self.set_difficulty(raw);
        if self.difficulty_level.is_some() {
            return;
        }

        if let Some(code) = CEFR_CODE.captures(raw).and_then(|caps| caps.get(1)) {
            self.set_difficulty(code.as_str());
        } else if let Some(name) = LEVEL_NAME.find(raw) {
            self.set_difficulty(name.as_str());
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum NormalizeError {
    #[error("response is not the expected JSON object: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("response field `{0}` is empty")]
    MissingField(&'static str),

    #[error("response field `{field}` has {count} examples, expected 3")]
    WrongExampleCount { field: &'static str, count: usize },

    #[error("unknown difficulty level `{0}`")]
    UnknownDifficulty(String),
}

/// Maps raw model text into a [`ParsedEntry`]
pub trait ResponseNormalizer: Send + Sync {
    fn normalize(&self, raw: &str) -> Result<ParsedEntry, NormalizeError>;

    fn name(&self) -> &'static str;
}

pub fn normalizer_for(kind: NormalizerKind) -> Arc<dyn ResponseNormalizer> {
    match kind {
        NormalizerKind::Lenient => Arc::new(LenientNormalizer),
        NormalizerKind::Strict => Arc::new(StrictNormalizer),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    OriginalWord,
    FrenchWord,
    EnglishTranslation,
    FrenchExplanation,
    EnglishExamples,
    FrenchExamples,
    Difficulty,
    PartOfSpeech,
}

impl Field {
    const ALL: [Field; 8] = [
        Field::OriginalWord,
        Field::FrenchWord,
        Field::EnglishTranslation,
        Field::FrenchExplanation,
        Field::EnglishExamples,
        Field::FrenchExamples,
        Field::Difficulty,
        Field::PartOfSpeech,
    ];

    /// Accepted keys, most preferred first
    fn aliases(self) -> &'static [&'static str] {
        match self {
            Field::OriginalWord => &["original_word", "input_word", "word"],
            Field::FrenchWord => &["french_word", "base_form", "french"],
            Field::EnglishTranslation => &[
                "english_translation",
                "translation",
                "explanation_native",
                "personalized_explanation",
                "definition_en",
                "definition",
                "english",
            ],
            Field::FrenchExplanation => &["french_explanation", "explanation_fr", "explanation"],
            Field::EnglishExamples => &["english_examples", "examples_en"],
            Field::FrenchExamples => &[
                "french_examples",
                "usages_target",
                "usages_fr",
                "examples_fr",
                "examples",
            ],
            Field::Difficulty => &["difficulty_level", "cefr_level", "difficulty", "level", "cefr"],
            Field::PartOfSpeech => &["part_of_speech", "pos"],
        }
    }

    fn is_list(self) -> bool {
        matches!(self, Field::EnglishExamples | Field::FrenchExamples)
    }

    fn from_key(key: &str) -> Option<Self> {
        let key = normalize_key(key);
        Field::ALL
            .into_iter()
            .find(|field| field.aliases().contains(&key.as_str()))
    }
}

fn normalize_key(key: &str) -> String {
    key.trim()
        .trim_matches(|c: char| c == '*' || c == '"' || c == '\'')
        .trim()
        .to_lowercase()
        .replace([' ', '-'], "_")
}

static CODE_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```(?:json|JSON)?").expect("valid regex"));
static TRAILING_COMMA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",\s*([}\]])").expect("valid regex"));
static LIST_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(?:\d+[.)]|[-*•])\s*").expect("valid regex"));
static LIST_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(?:\d+[.)]|[-*•])\s+(.+)$").expect("valid regex"));
static CEFR_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b([abc][12])\b").expect("valid regex"));
static LEVEL_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:beginner|intermediate|advanced)\b").expect("valid regex")
});
static KEY_VALUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:[-*•]\s*)?\**\s*([A-Za-z][A-Za-z _-]{0,40}?)\s*\**\s*[:：]\s*(.*)$")
        .expect("valid regex")
});

/// Best-effort extraction that never fails
#[derive(Debug, Clone, Copy, Default)]
pub struct LenientNormalizer;

impl ResponseNormalizer for LenientNormalizer {
    fn normalize(&self, raw: &str) -> Result<ParsedEntry, NormalizeError> {
        let raw = raw.trim();
        if raw.is_empty() {
            tracing::warn!("Model returned empty text");
            return Ok(ParsedEntry::default());
        }

        if let Some(object) = recover_json_object(raw) {
            return Ok(entry_from_object(&object));
        }

        tracing::warn!("No JSON object in model output, falling back to text extraction");
        Ok(entry_from_text(raw))
    }

    fn name(&self) -> &'static str {
        "lenient"
    }
}

/// Parse the text as JSON, cleaning up the usual defects on a second try
fn recover_json_object(raw: &str) -> Option<Map<String, Value>> {
    if let Ok(Value::Object(object)) = serde_json::from_str(raw) {
        return Some(object);
    }

    let text = CODE_FENCE.replace_all(raw, "");
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end <= start {
        return None;
    }

    let cleaned = TRAILING_COMMA.replace_all(&text[start..=end], "$1");
    match serde_json::from_str(&cleaned) {
        Ok(Value::Object(object)) => Some(object),
        Ok(_) => None,
        Err(e) => {
            tracing::debug!("Recovered JSON still invalid: {e}");
            None
        }
    }
}

fn entry_from_object(object: &Map<String, Value>) -> ParsedEntry {
    let mut entry = ParsedEntry::default();

    // Lowercased keys so `French_Word` and `french word` are still found
    let fields: Map<String, Value> = object
        .iter()
        .map(|(k, v)| (normalize_key(k), v.clone()))
        .collect();

    for field in Field::ALL {
        let value = field
            .aliases()
            .iter()
            .filter_map(|alias| fields.get(*alias))
            .find(|v| !is_blank(v));

        let Some(value) = value else { continue };

        if field.is_list() {
            assign_list(&mut entry, field, list_value(value));
        } else if let Some(text) = scalar_value(value) {
            assign_scalar(&mut entry, field, text);
        }
    }

    entry
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.iter().all(is_blank),
        _ => false,
    }
}

fn scalar_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Array(items) => {
            let joined = items
                .iter()
                .filter_map(scalar_value)
                .collect::<Vec<_>>()
                .join(", ");
            Some(joined).filter(|s| !s.is_empty())
        }
        _ => None,
    }
}

fn list_value(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.iter().filter_map(scalar_value).collect(),
        Value::String(s) => split_example_lines(s),
        other => scalar_value(other).into_iter().collect(),
    }
}

/// Split a block of examples on line breaks, dropping list numbering
fn split_example_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(|line| LIST_MARKER.replace(line, "").trim().to_string())
        .filter(|line| !line.is_empty())
        .collect()
}

fn clean_scalar(text: &str) -> String {
    text.trim()
        .trim_end_matches(',')
        .trim()
        .trim_matches(|c: char| c == '"' || c == '*')
        .trim()
        .to_string()
}

fn assign_scalar(entry: &mut ParsedEntry, field: Field, text: String) {
    let text = clean_scalar(&text);
    if text.is_empty() {
        return;
    }

    let slot = match field {
        Field::OriginalWord => &mut entry.original_word,
        Field::FrenchWord => &mut entry.french_word,
        Field::EnglishTranslation => &mut entry.english_translation,
        Field::FrenchExplanation => &mut entry.french_explanation,
        Field::PartOfSpeech => &mut entry.part_of_speech,
        Field::Difficulty => {
            if entry.difficulty_level.is_none() {
                entry.set_difficulty_loose(&text);
            }
            return;
        }
        Field::EnglishExamples | Field::FrenchExamples => return,
    };

    if slot.is_none() {
        *slot = Some(text);
    }
}

fn assign_list(entry: &mut ParsedEntry, field: Field, items: Vec<String>) {
    let list = match field {
        Field::EnglishExamples => &mut entry.english_examples,
        Field::FrenchExamples => &mut entry.french_examples,
        _ => return,
    };
    list.extend(
        items
            .into_iter()
            .map(|item| clean_scalar(&item))
            .filter(|item| !item.is_empty()),
    );
}

/// Line-oriented reading of `Key: value` prose with numbered example lists
fn entry_from_text(text: &str) -> ParsedEntry {
    let mut entry = ParsedEntry::default();
    let mut current_list: Option<Field> = None;

    for line in text.lines() {
        if line.trim().is_empty() {
            continue;
        }

        let keyed = KEY_VALUE
            .captures(line)
            .and_then(|caps| Some((Field::from_key(caps.get(1)?.as_str())?, caps.get(2)?)));

        if let Some((field, value)) = keyed {
            let value = value.as_str().trim();
            if field.is_list() {
                current_list = Some(field);
                if !value.is_empty() {
                    assign_list(&mut entry, field, split_inline_examples(value));
                }
            } else {
                current_list = None;
                assign_scalar(&mut entry, field, value.to_string());
            }
            continue;
        }

        if let (Some(field), Some(caps)) = (current_list, LIST_ITEM.captures(line)) {
            if let Some(item) = caps.get(1) {
                assign_list(&mut entry, field, vec![item.as_str().to_string()]);
            }
        }
    }

    entry
}

/// Examples written on the key line itself, separated by `;` or `|`
fn split_inline_examples(value: &str) -> Vec<String> {
    value
        .split([';', '|'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Deserialize)]
struct StrictEntry {
    original_word: String,
    french_word: String,
    english_translation: String,
    french_explanation: String,
    english_examples: Vec<String>,
    french_examples: Vec<String>,
    difficulty_level: String,
    part_of_speech: String,
}

/// Accepts only a complete schema object
#[derive(Debug, Clone, Copy, Default)]
pub struct StrictNormalizer;

impl ResponseNormalizer for StrictNormalizer {
    fn normalize(&self, raw: &str) -> Result<ParsedEntry, NormalizeError> {
        let strict: StrictEntry = serde_json::from_str(raw.trim())?;

        let required = |name: &'static str, value: String| {
            let value = value.trim().to_string();
            if value.is_empty() {
                Err(NormalizeError::MissingField(name))
            } else {
                Ok(value)
            }
        };

        let examples = |name: &'static str, items: Vec<String>| {
            let items: Vec<String> = items
                .into_iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
            if items.len() == EXAMPLE_COUNT {
                Ok(items)
            } else {
                Err(NormalizeError::WrongExampleCount {
                    field: name,
                    count: items.len(),
                })
            }
        };

        let difficulty = required("difficulty_level", strict.difficulty_level)?;
        let mut entry = ParsedEntry {
            original_word: Some(required("original_word", strict.original_word)?),
            french_word: Some(required("french_word", strict.french_word)?),
            english_translation: Some(required(
                "english_translation",
                strict.english_translation,
            )?),
            french_explanation: Some(required("french_explanation", strict.french_explanation)?),
            english_examples: examples("english_examples", strict.english_examples)?,
            french_examples: examples("french_examples", strict.french_examples)?,
            part_of_speech: Some(required("part_of_speech", strict.part_of_speech)?),
            ..ParsedEntry::default()
        };

        entry.set_difficulty(&difficulty);
        if entry.difficulty_level.is_none() {
            return Err(NormalizeError::UnknownDifficulty(difficulty));
        }

        Ok(entry)
    }

    fn name(&self) -> &'static str {
        "strict"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WELL_FORMED: &str = r#"{
        "original_word": "bonjour",
        "french_word": "bonjour",
        "english_translation": "hello; good morning",
        "french_explanation": "Salutation utilisée pendant la journée.",
        "english_examples": ["Hello, Marie!", "Good morning, sir.", "Say hello to him."],
        "french_examples": ["Bonjour, Marie !", "Bonjour, monsieur.", "Dis-lui bonjour."],
        "difficulty_level": "A1",
        "part_of_speech": "interjection"
    }"#;

    #[test]
    fn lenient_reads_well_formed_json() {
        let entry = LenientNormalizer.normalize(WELL_FORMED).unwrap();

        assert_eq!(entry.original_word.as_deref(), Some("bonjour"));
        assert_eq!(entry.english_examples.len(), 3);
        assert_eq!(entry.french_examples[2], "Dis-lui bonjour.");
        assert_eq!(entry.cefr_level, Some(CefrLevel::A1));
        assert_eq!(entry.difficulty_level, Some(DifficultyLevel::Beginner));
    }

    #[test]
    fn lenient_recovers_fenced_json_with_trailing_commas() {
        let raw = "Here you go:\n```json\n{\n  \"french_word\": \"chat\",\n  \"french_examples\": [\"Le chat dort.\", \"J'ai un chat.\",],\n}\n```";
        let entry = LenientNormalizer.normalize(raw).unwrap();

        assert_eq!(entry.french_word.as_deref(), Some("chat"));
        assert_eq!(entry.french_examples, vec!["Le chat dort.", "J'ai un chat."]);
        assert_eq!(entry.english_translation, None);
    }

    #[test]
    fn lenient_accepts_older_key_names() {
        let raw = r#"{
            "input_word": "courir",
            "base_form": "courir",
            "explanation_native": "to run",
            "usages_target": "1. Je cours.\n2. Il court vite.\n3. Nous courons.",
            "cefr_level": "b1"
        }"#;
        let entry = LenientNormalizer.normalize(raw).unwrap();

        assert_eq!(entry.original_word.as_deref(), Some("courir"));
        assert_eq!(entry.english_translation.as_deref(), Some("to run"));
        assert_eq!(entry.french_examples, vec!["Je cours.", "Il court vite.", "Nous courons."]);
        assert_eq!(entry.difficulty_level, Some(DifficultyLevel::Intermediate));
    }

    #[test]
    fn lenient_extracts_fields_from_prose() {
        let raw = "**French word:** maison\n\
                   Translation: house, home\n\
                   Difficulty: Beginner\n\
                   French examples:\n\
                   1. La maison est grande.\n\
                   2. Je rentre à la maison.\n\
                   English examples: The house is big; I'm going home\n";
        let entry = LenientNormalizer.normalize(raw).unwrap();

        assert_eq!(entry.french_word.as_deref(), Some("maison"));
        assert_eq!(entry.english_translation.as_deref(), Some("house, home"));
        assert_eq!(entry.difficulty_level, Some(DifficultyLevel::Beginner));
        assert_eq!(entry.cefr_level, None);
        assert_eq!(
            entry.french_examples,
            vec!["La maison est grande.", "Je rentre à la maison."]
        );
        assert_eq!(entry.english_examples, vec!["The house is big", "I'm going home"]);
    }

    #[test]
    fn lenient_reads_described_levels() {
        let entry = LenientNormalizer
            .normalize(r#"{ "difficulty_level": "C1 - Advanced" }"#)
            .unwrap();
        assert_eq!(entry.cefr_level, Some(CefrLevel::C1));
        assert_eq!(entry.difficulty_level, Some(DifficultyLevel::Advanced));

        let entry = LenientNormalizer
            .normalize("French word: chat\nDifficulty: B1 (Intermediate)\n")
            .unwrap();
        assert_eq!(entry.cefr_level, Some(CefrLevel::B1));
        assert_eq!(entry.difficulty_level, Some(DifficultyLevel::Intermediate));

        let entry = LenientNormalizer
            .normalize(r#"{ "difficulty": "fairly advanced" }"#)
            .unwrap();
        assert_eq!(entry.cefr_level, None);
        assert_eq!(entry.difficulty_level, Some(DifficultyLevel::Advanced));
    }

    #[test]
    fn lenient_degrades_to_empty_entry() {
        assert!(LenientNormalizer.normalize("").unwrap().is_empty());
        assert!(LenientNormalizer.normalize("I cannot help with that.").unwrap().is_empty());
    }

    #[test]
    fn strict_accepts_complete_schema() {
        let entry = StrictNormalizer.normalize(WELL_FORMED).unwrap();
        assert_eq!(entry.french_word.as_deref(), Some("bonjour"));
        assert_eq!(entry.part_of_speech.as_deref(), Some("interjection"));
    }

    #[test]
    fn strict_rejects_partial_output() {
        let missing = r#"{ "original_word": "chat", "french_word": "chat" }"#;
        assert!(matches!(
            StrictNormalizer.normalize(missing),
            Err(NormalizeError::InvalidJson(_))
        ));

        let short = WELL_FORMED.replace(r#""Say hello to him.""#, r#""""#);
        assert!(matches!(
            StrictNormalizer.normalize(&short),
            Err(NormalizeError::WrongExampleCount {
                field: "english_examples",
                count: 2
            })
        ));

        let level = WELL_FORMED.replace(r#""A1""#, r#""N5""#);
        assert!(matches!(
            StrictNormalizer.normalize(&level),
            Err(NormalizeError::UnknownDifficulty(_))
        ));
    }

    #[test]
    fn normalizer_follows_config() {
        assert_eq!(normalizer_for(NormalizerKind::Lenient).name(), "lenient");
        assert_eq!(normalizer_for(NormalizerKind::Strict).name(), "strict");
    }
}
