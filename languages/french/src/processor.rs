use lexique_core::language::LanguageProcessor;
use lexique_core::preprocess::{DefaultPreprocessor, Preprocessor};

/// Quote pairs people paste around a word
const QUOTES: [(char, char); 4] = [('"', '"'), ('«', '»'), ('“', '”'), ('\'', '\'')];

/// French input processor
#[derive(Default)]
pub struct FrenchProcessor {
    preprocessor: DefaultPreprocessor,
}

impl FrenchProcessor {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LanguageProcessor for FrenchProcessor {
    fn language_code(&self) -> &str {
        "fr"
    }

    fn normalize(&self, text: &str) -> String {
        // Typographic apostrophes: l’eau -> l'eau
        let text: String = text
            .chars()
            .map(|c| match c {
                '\u{2019}' | '\u{02BC}' => '\'',
                '\u{00A0}' | '\u{202F}' => ' ',
                c => c,
            })
            .collect();

        let mut word = self.preprocessor.process(&text);

        loop {
            let stripped = QUOTES.iter().find_map(|(open, close)| {
                word.strip_prefix(*open)
                    .and_then(|w| w.strip_suffix(*close))
                    .map(str::trim)
            });
            match stripped {
                Some(inner) if inner.len() < word.len() => word = inner.to_string(),
                _ => break,
            }
        }

        word
    }
}

#[cfg(test)]
mod tests {
    use lexique_core::ValidationError;

    use super::*;

    #[test]
    fn normalizes_typography() {
        let fr = FrenchProcessor::new();

        assert_eq!(fr.normalize("  l’eau  "), "l'eau");
        assert_eq!(fr.normalize("« pomme\u{00A0}de terre »"), "pomme de terre");
        assert_eq!(fr.normalize("\"'bonjour'\""), "bonjour");
        assert_eq!(fr.normalize("aujourd'hui"), "aujourd'hui");
    }

    #[test]
    fn keeps_accents_composed() {
        let fr = FrenchProcessor::new();
        assert_eq!(fr.normalize("e\u{301}te\u{301}"), "été");
    }

    #[test]
    fn validation_uses_normalized_text() {
        let fr = FrenchProcessor::new();

        assert_eq!(fr.validate_word(" « chat » ").unwrap(), "chat");
        assert_eq!(fr.validate_word("« »"), Err(ValidationError::Empty));
        assert_eq!(fr.validate_word("1234 !"), Err(ValidationError::NoLetters));
        assert!(matches!(
            fr.validate_word(&"a".repeat(201)),
            Err(ValidationError::TooLong { max: 200 })
        ));
        assert_eq!(fr.validate_interest("  "), Ok(None));
        assert_eq!(
            fr.validate_interest(" hockey "),
            Ok(Some("hockey".to_string()))
        );
    }
}
