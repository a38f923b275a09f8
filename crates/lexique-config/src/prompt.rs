use serde::{Deserialize, Serialize};

/// Placeholders: `{word}`, `{level}`, `{interest}`, `{tone}`.
const DEFAULT_TEMPLATE: &str = r#"You are a friendly French-English dictionary and language tutor.
The learner's level is {level} and their interests are: {interest}.

Word to look up: "{word}"

The word may be French or English. Identify the French word in its basic form
(infinitive for verbs, singular for nouns, masculine singular for adjectives).

Instructions:
1. Give a short English translation/explanation of the French word.
2. Give a short explanation in French, at {level} level.
3. Write exactly 3 English example sentences and exactly 3 French example
   sentences. Where it fits naturally, set them in the context of {interest}.
4. Rate the difficulty of the word on the CEFR scale (A1, A2, B1, B2, C1, C2).
5. Identify the part of speech.

Tone: {tone}

Return ONLY valid JSON. No markdown. No extra text.

Schema:
{
  "original_word": "{word}",
  "french_word": "string",
  "english_translation": "string",
  "french_explanation": "string",
  "english_examples": ["sentence 1", "sentence 2", "sentence 3"],
  "french_examples": ["phrase 1", "phrase 2", "phrase 3"],
  "difficulty_level": "A1" | "A2" | "B1" | "B2" | "C1" | "C2",
  "part_of_speech": "noun" | "verb" | "adjective" | "adverb" | "other"
}
"#;

fn default_template() -> String {
    DEFAULT_TEMPLATE.to_string()
}

fn default_level() -> String {
    "B1".to_string()
}

fn default_interest() -> String {
    "General Knowledge, Daily Life".to_string()
}

fn default_fun_tone() -> String {
    "Humorous, witty, engaging".to_string()
}

fn default_academic_tone() -> String {
    "Formal, precise, academic".to_string()
}

#[derive(Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct PromptConfig {
    #[serde(default = "default_template")]
    pub template: String,
    /// CEFR level used when the learner gives none
    #[serde(default = "default_level")]
    pub default_level: String,
    #[serde(default = "default_interest")]
    pub default_interest: String,
    #[serde(default = "default_fun_tone")]
    pub fun_tone: String,
    #[serde(default = "default_academic_tone")]
    pub academic_tone: String,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            template: default_template(),
            default_level: default_level(),
            default_interest: default_interest(),
            fun_tone: default_fun_tone(),
            academic_tone: default_academic_tone(),
        }
    }
}
