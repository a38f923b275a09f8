use std::fmt::Write;

use axum::extract::Query;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect};
use serde::Deserialize;

use crate::render::{self, text};

pub async fn index() -> Redirect {
    Redirect::to("/lookup/")
}

pub async fn about() -> Html<String> {
    render::layout(
        "About",
        None,
        r#"<p>Lexique is a French-English vocabulary companion. Type a French or
English word and a language model explains it: the French base form, an
English translation, a short explanation in French, three example sentences
in each language and a CEFR difficulty.</p>
<p>Saved words go into your own notebook, where you can track how well you
know each one, from <em>New</em> to <em>Mastered</em>.</p>
<p>Explanations can be tuned to an interest, a CEFR level and a fun or
academic tone.</p>"#,
    )
}

pub async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, render::not_found())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DocSection {
    #[default]
    Overview,
    Lookup,
    Words,
    Schema,
    Example,
}

impl DocSection {
    pub const ALL: [DocSection; 5] = [
        DocSection::Overview,
        DocSection::Lookup,
        DocSection::Words,
        DocSection::Schema,
        DocSection::Example,
    ];

    /// Unknown sections fall back to the overview
    pub fn parse(s: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|section| section.slug() == s.trim().to_lowercase())
            .unwrap_or_default()
    }

    pub fn slug(&self) -> &'static str {
        match self {
            DocSection::Overview => "overview",
            DocSection::Lookup => "lookup",
            DocSection::Words => "words",
            DocSection::Schema => "schema",
            DocSection::Example => "example",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            DocSection::Overview => "Overview",
            DocSection::Lookup => "Looking up words",
            DocSection::Words => "Your words",
            DocSection::Schema => "Response schema",
            DocSection::Example => "Example response",
        }
    }

    fn content(&self) -> String {
        match self {
            DocSection::Overview => r#"<p>Each lookup sends one prompt to the model and shows
what comes back. Nothing is stored until you press <em>Save word</em>.</p>
<p>Lookups are never retried. When the model is slow or unavailable the page
says so and you can try again.</p>"#
                .to_string(),
            DocSection::Lookup => r#"<p>Enter a single word or a short phrase, up to 200
characters. Accents, apostrophes and guillemets are cleaned up before the
prompt is built.</p>
<ul>
<li><strong>Interest</strong> steers the example sentences, e.g. <em>Hockey</em>.</li>
<li><strong>Level</strong> is your CEFR level; B1 when left blank.</li>
<li><strong>Style</strong> picks a fun or an academic tone.</li>
</ul>
<p>When the answer is missing fields the result is still shown, with a note
listing what is blank.</p>"#
                .to_string(),
            DocSection::Words => r#"<p>Saved words are listed newest first and can be
filtered by difficulty and familiarity. Saving the same word again refreshes
its content and keeps your progress.</p>
<p>Difficulty follows the CEFR level the model reports: A1 and A2 are
Beginner, B1 and B2 Intermediate, C1 and C2 Advanced.</p>"#
                .to_string(),
            DocSection::Schema => format!(
                "<p>The model is asked to answer with this JSON object:</p>\n<pre>{}</pre>",
                text(SCHEMA)
            ),
            DocSection::Example => format!(
                "<p>A typical answer for <em>bonjour</em>. Shown for reference only, no request is made.</p>\n<pre>{}</pre>",
                text(EXAMPLE_RESPONSE)
            ),
        }
    }
}

const SCHEMA: &str = r#"{
  "original_word": "string",
  "french_word": "string",
  "english_translation": "string",
  "french_explanation": "string",
  "english_examples": ["string", "string", "string"],
  "french_examples": ["string", "string", "string"],
  "difficulty_level": "A1 | A2 | B1 | B2 | C1 | C2",
  "part_of_speech": "noun | verb | adjective | adverb | other"
}"#;

const EXAMPLE_RESPONSE: &str = r#"{
  "original_word": "bonjour",
  "french_word": "bonjour",
  "english_translation": "hello, good morning",
  "french_explanation": "Salutation utilisée pendant la journée pour dire bonjour à quelqu'un.",
  "english_examples": [
    "Hello, how are you?",
    "She said good morning to the baker.",
    "Say hello to your parents for me."
  ],
  "french_examples": [
    "Bonjour, comment allez-vous ?",
    "Elle a dit bonjour au boulanger.",
    "Dis bonjour à tes parents de ma part."
  ],
  "difficulty_level": "A1",
  "part_of_speech": "other"
}"#;

#[derive(Debug, Default, Deserialize)]
pub struct DocsQuery {
    pub section: Option<String>,
}

pub async fn docs(Query(query): Query<DocsQuery>) -> Html<String> {
    let current = query.section.as_deref().map(DocSection::parse).unwrap_or_default();

    let mut nav = String::from("<ul class=\"sections\">");
    for section in DocSection::ALL {
        if section == current {
            let _ = write!(nav, "<li><strong>{}</strong></li>", section.title());
        } else {
            let _ = write!(
                nav,
                r#"<li><a href="/docs/?section={}">{}</a></li>"#,
                section.slug(),
                section.title()
            );
        }
    }
    nav.push_str("</ul>");

    let body = format!("{nav}\n<h2>{}</h2>\n{}", current.title(), current.content());
    render::layout("Documentation", None, &body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sections_parse_by_slug() {
        for section in DocSection::ALL {
            assert_eq!(DocSection::parse(section.slug()), section);
        }
        assert_eq!(DocSection::parse(" SCHEMA "), DocSection::Schema);
        assert_eq!(DocSection::parse("weather"), DocSection::Overview);
    }

    #[test]
    fn example_payload_is_valid_json() {
        let value: serde_json::Value = serde_json::from_str(EXAMPLE_RESPONSE).unwrap();
        assert_eq!(value["english_examples"].as_array().unwrap().len(), 3);
        assert_eq!(value["french_examples"].as_array().unwrap().len(), 3);
    }
}
