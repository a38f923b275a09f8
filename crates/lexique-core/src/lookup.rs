use std::sync::Arc;

use lexique_translator::{
    NormalizeError, ParsedEntry, ResponseNormalizer, TranslateError, Translator,
};
use lexique_types::{CefrLevel, DifficultyLevel, Examples, NewWord};
use serde::{Deserialize, Serialize};

use crate::language::{LanguageProcessor, ValidationError};
use crate::prompt::{Personalization, PromptBuilder, PromptError};

#[derive(Debug, Clone, Default)]
pub struct LookupRequest {
    pub word: String,
    pub personalization: Personalization,
}

impl LookupRequest {
    pub fn new(word: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            personalization: Personalization::default(),
        }
    }
}

/// A looked-up entry, ready for display and for saving
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LookupResult {
    pub original_word: String,
    pub french_word: String,
    pub english_translation: String,
    pub french_explanation: String,
    pub english_examples: Examples,
    pub french_examples: Examples,
    /// None when the model reported no usable level
    pub difficulty_level: Option<DifficultyLevel>,
    pub cefr_level: Option<CefrLevel>,
    pub part_of_speech: Option<String>,
    pub prompt_used: String,
}

impl LookupResult {
    pub fn from_entry(original_word: String, prompt_used: String, entry: ParsedEntry) -> Self {
        Self {
            original_word,
            french_word: entry.french_word.unwrap_or_default(),
            english_translation: entry.english_translation.unwrap_or_default(),
            french_explanation: entry.french_explanation.unwrap_or_default(),
            english_examples: Examples::from_vec(entry.english_examples),
            french_examples: Examples::from_vec(entry.french_examples),
            difficulty_level: entry.difficulty_level,
            cefr_level: entry.cefr_level,
            part_of_speech: entry.part_of_speech,
            prompt_used,
        }
    }

    /// Names of the fields the model left blank
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.french_word.is_empty() {
            missing.push("french word");
        }
        if self.english_translation.is_empty() {
            missing.push("english translation");
        }
        if self.french_explanation.is_empty() {
            missing.push("french explanation");
        }
        if !self.english_examples.is_complete() {
            missing.push("english examples");
        }
        if !self.french_examples.is_complete() {
            missing.push("french examples");
        }
        if self.difficulty_level.is_none() {
            missing.push("difficulty");
        }
        if self.part_of_speech.is_none() {
            missing.push("part of speech");
        }
        missing
    }

    pub fn is_partial(&self) -> bool {
        !self.missing_fields().is_empty()
    }

    pub fn to_new_word(&self) -> NewWord {
        NewWord {
            original_word: self.original_word.clone(),
            french_word: self.french_word.clone(),
            english_translation: self.english_translation.clone(),
            french_explanation: self.french_explanation.clone(),
            english_examples: self.english_examples.clone(),
            french_examples: self.french_examples.clone(),
            difficulty_level: self.difficulty_level.unwrap_or_default(),
            cefr_level: self.cefr_level,
            part_of_speech: self.part_of_speech.clone(),
            prompt_used: self.prompt_used.clone(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error("Lookup failed: {0}")]
    Prompt(#[from] PromptError),

    #[error("Lookup failed: {0}")]
    Translation(#[from] TranslateError),

    #[error("Lookup failed: the response could not be read ({0})")]
    Shape(#[from] NormalizeError),
}

impl LookupError {
    /// Rejected before any call went out
    pub fn is_input_error(&self) -> bool {
        matches!(self, LookupError::Invalid(_))
    }
}

/// Validate, prompt, call the model, read the answer
#[derive(Clone)]
pub struct LookupService {
    processor: Arc<dyn LanguageProcessor>,
    prompts: PromptBuilder,
    translator: Arc<dyn Translator>,
    normalizer: Arc<dyn ResponseNormalizer>,
}

impl LookupService {
    pub fn new(
        processor: Arc<dyn LanguageProcessor>,
        prompts: PromptBuilder,
        translator: Arc<dyn Translator>,
        normalizer: Arc<dyn ResponseNormalizer>,
    ) -> Self {
        Self {
            processor,
            prompts,
            translator,
            normalizer,
        }
    }

    pub async fn lookup(&self, request: LookupRequest) -> Result<LookupResult, LookupError> {
        let word = self.processor.validate_word(&request.word)?;
        let personalization = Personalization {
            interest: match request.personalization.interest.as_deref() {
                Some(interest) => self.processor.validate_interest(interest)?,
                None => None,
            },
            ..request.personalization
        };

        let prompt = self.prompts.build(&word, &personalization)?;
        tracing::debug!("Prompt for '{}': {} chars", word, prompt.len());

        let provider = self.translator.metadata();
        tracing::info!("Looking up '{}' with {} ({})", word, provider.name, provider.model);

        let raw = self
            .translator
            .generate(&prompt)
            .await
            .inspect_err(|e| tracing::error!("Lookup of '{}' failed: {}", word, e))?;
        tracing::debug!("Raw response: {} chars", raw.len());

        let entry = self.normalizer.normalize(&raw).inspect_err(|e| {
            tracing::error!(
                "{} normalizer rejected response for '{}': {}",
                self.normalizer.name(),
                word,
                e
            )
        })?;

        let result = LookupResult::from_entry(word, prompt, entry);
        if result.is_partial() {
            tracing::warn!(
                "Partial result for '{}', missing: {}",
                result.original_word,
                result.missing_fields().join(", ")
            );
        }

        Ok(result)
    }

    /// Check a result that came back from the client before it is stored
    pub fn prepare_save(&self, result: &LookupResult) -> Result<NewWord, LookupError> {
        let original_word = self.processor.validate_word(&result.original_word)?;
        Ok(NewWord {
            original_word,
            ..result.to_new_word()
        })
    }
}
