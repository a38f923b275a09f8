use unicode_normalization::UnicodeNormalization;

pub trait Preprocessor {
    // Default preprocessor: NFC, single spaces, no line breaks
    fn process(&self, text: &str) -> String {
        let text = text.trim();

        if text.is_empty() {
            return String::new();
        }

        let text: String = text.nfc().collect();

        text.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultPreprocessor;
impl Preprocessor for DefaultPreprocessor {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_whitespace_and_composes() {
        // "e" + combining acute accent
        let decomposed = "  cafe\u{301} \n  cre\u{300}me ";
        assert_eq!(DefaultPreprocessor.process(decomposed), "café crème");
        assert_eq!(DefaultPreprocessor.process(" \t\n"), "");
    }
}
