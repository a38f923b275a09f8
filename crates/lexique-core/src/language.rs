/// Longest word or phrase accepted for lookup
pub const MAX_WORD_CHARS: usize = 200;
/// Longest interest tag accepted for personalization
pub const MAX_INTEREST_CHARS: usize = 100;

/// Input handling for the language being learned
pub trait LanguageProcessor: Send + Sync {
    /// Language identifier (ISO 639-1 code)
    fn language_code(&self) -> &str;

    /// Normalize user input (Unicode normalization, whitespace, etc.)
    fn normalize(&self, text: &str) -> String;

    /// Normalize and check a word submitted for lookup
    fn validate_word(&self, text: &str) -> Result<String, ValidationError> {
        let word = self.normalize(text);

        if word.is_empty() {
            return Err(ValidationError::Empty);
        }
        if word.chars().count() > MAX_WORD_CHARS {
            return Err(ValidationError::TooLong {
                max: MAX_WORD_CHARS,
            });
        }
        if !word.chars().any(char::is_alphabetic) {
            return Err(ValidationError::NoLetters);
        }

        Ok(word)
    }

    /// Optional interest tag; blank means none
    fn validate_interest(&self, text: &str) -> Result<Option<String>, ValidationError> {
        let interest = self.normalize(text);

        if interest.is_empty() {
            return Ok(None);
        }
        if interest.chars().count() > MAX_INTEREST_CHARS {
            return Err(ValidationError::InterestTooLong {
                max: MAX_INTEREST_CHARS,
            });
        }

        Ok(Some(interest))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please enter a word to look up.")]
    Empty,

    #[error("Words are limited to {max} characters.")]
    TooLong { max: usize },

    #[error("Please enter a word, not only numbers or symbols.")]
    NoLetters,

    #[error("Interests are limited to {max} characters.")]
    InterestTooLong { max: usize },
}
