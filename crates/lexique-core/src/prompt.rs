use std::fmt;

use lexique_config::prompt::PromptConfig;
use lexique_types::CefrLevel;
use serde::{Deserialize, Serialize};

/// How explanations should sound
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LearningStyle {
    #[default]
    Fun,
    Academic,
}

impl LearningStyle {
    pub const ALL: [LearningStyle; 2] = [LearningStyle::Fun, LearningStyle::Academic];

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "fun" => Some(LearningStyle::Fun),
            "academic" => Some(LearningStyle::Academic),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LearningStyle::Fun => "Fun",
            LearningStyle::Academic => "Academic",
        }
    }
}

impl fmt::Display for LearningStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Optional learner context folded into the prompt
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Personalization {
    pub interest: Option<String>,
    pub level: Option<CefrLevel>,
    pub style: Option<LearningStyle>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PromptError {
    #[error("prompt template is not configured")]
    MissingTemplate,

    #[error("prompt template has no `{0}` placeholder")]
    MissingPlaceholder(&'static str),

    #[error("default prompt level `{0}` is not a CEFR level")]
    InvalidDefaultLevel(String),

    #[error("cannot build a prompt for an empty word")]
    EmptyWord,
}

const WORD: &str = "{word}";
const LEVEL: &str = "{level}";
const INTEREST: &str = "{interest}";
const TONE: &str = "{tone}";

/// Fills the configured template for one lookup
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    template: String,
    default_level: CefrLevel,
    default_interest: String,
    fun_tone: String,
    academic_tone: String,
}

impl PromptBuilder {
    /// Template with the stock personalization defaults
    pub fn new(template: impl Into<String>) -> Result<Self, PromptError> {
        Self::from_config(&PromptConfig {
            template: template.into(),
            ..PromptConfig::default()
        })
    }

    pub fn from_config(config: &PromptConfig) -> Result<Self, PromptError> {
        if config.template.trim().is_empty() {
            return Err(PromptError::MissingTemplate);
        }
        if !config.template.contains(WORD) {
            return Err(PromptError::MissingPlaceholder(WORD));
        }

        let default_level = CefrLevel::parse(&config.default_level)
            .ok_or_else(|| PromptError::InvalidDefaultLevel(config.default_level.clone()))?;

        Ok(Self {
            template: config.template.clone(),
            default_level,
            default_interest: config.default_interest.clone(),
            fun_tone: config.fun_tone.clone(),
            academic_tone: config.academic_tone.clone(),
        })
    }

    pub fn build(&self, word: &str, personalization: &Personalization) -> Result<String, PromptError> {
        let word = word.trim();
        if word.is_empty() {
            return Err(PromptError::EmptyWord);
        }

        let level = personalization.level.unwrap_or(self.default_level);
        let interest = personalization
            .interest
            .as_deref()
            .map(str::trim)
            .filter(|i| !i.is_empty())
            .unwrap_or(&self.default_interest);
        let tone = match personalization.style.unwrap_or_default() {
            LearningStyle::Fun => &self.fun_tone,
            LearningStyle::Academic => &self.academic_tone,
        };

        Ok(fill(
            &self.template,
            &[
                (WORD, word),
                (LEVEL, level.as_str()),
                (INTEREST, interest),
                (TONE, tone.as_str()),
            ],
        ))
    }
}

/// Substitute placeholders in one pass over the template, so text coming
/// from the learner is never scanned for placeholders itself
fn fill(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];

        match values.iter().find(|(key, _)| tail.starts_with(key)) {
            Some((key, value)) => {
                out.push_str(value);
                rest = &tail[key.len()..];
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }

    out.push_str(rest);
    out
}
