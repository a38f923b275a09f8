use std::fmt::Write;

use axum::Form;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use lexique_types::{DifficultyLevel, Familiarity, MetadataUpdate, Word, WordFilter};
use serde::Deserialize;

use crate::error::AppError;
use crate::render::{self, Flash, example_list, options, or_dash, text};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub difficulty: Option<String>,
    pub familiarity: Option<String>,
    pub notice: Option<String>,
}

impl ListQuery {
    /// Blank or unrecognised values do not filter
    fn filter(&self) -> WordFilter {
        WordFilter {
            difficulty_level: self.difficulty.as_deref().and_then(DifficultyLevel::parse),
            familiarity: self.familiarity.as_deref().and_then(Familiarity::parse),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct NoticeQuery {
    pub notice: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MetadataForm {
    pub difficulty_level: String,
    pub familiarity: String,
}

/// Ids that are not numbers cannot exist either
fn parse_id(raw: &str) -> Result<i64, AppError> {
    raw.parse().map_err(|_| AppError::NotFound)
}

async fn find(state: &AppState, raw_id: &str) -> Result<Word, AppError> {
    let id = parse_id(raw_id)?;
    state.store.get(id).await?.ok_or(AppError::NotFound)
}

pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Html<String>, AppError> {
    let filter = query.filter();
    let words = state.store.list(filter).await?;

    let difficulty = filter.difficulty_level.map(|d| d.as_str()).unwrap_or_default();
    let familiarity = filter.familiarity.map(|f| f.as_str()).unwrap_or_default();

    let mut body = format!(
        r#"<form method="get" action="/words/">
<label>Difficulty <select name="difficulty"><option value="">All</option>{difficulties}</select></label>
<label>Familiarity <select name="familiarity"><option value="">All</option>{familiarities}</select></label>
<button type="submit">Filter</button>
</form>
"#,
        difficulties = options(DifficultyLevel::ALL.map(|d| (d.as_str(), d.as_str())), difficulty),
        familiarities = options(Familiarity::ALL.map(|f| (f.as_str(), f.as_str())), familiarity),
    );

    if words.is_empty() {
        body.push_str(
            r#"<p class="muted">No saved words yet. <a href="/lookup/">Look one up</a>.</p>"#,
        );
    } else {
        body.push_str(
            "<table>\n<tr><th>French</th><th>English</th><th>Difficulty</th><th>Familiarity</th><th>Saved</th></tr>\n",
        );
        for word in &words {
            let _ = writeln!(
                body,
                r#"<tr><td><a href="/words/{id}/">{french}</a></td><td>{english}</td><td>{difficulty}</td><td>{familiarity}</td><td>{saved}</td></tr>"#,
                id = word.id,
                french = text(display_name(word)),
                english = or_dash(&word.english_translation),
                difficulty = word.difficulty_level,
                familiarity = word.familiarity,
                saved = word.created_at.format("%Y-%m-%d"),
            );
        }
        body.push_str("</table>\n");
    }

    let flash = Flash::from_notice(query.notice.as_deref());
    Ok(render::layout("My words", flash.as_ref(), &body))
}

pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<NoticeQuery>,
) -> Result<Html<String>, AppError> {
    let word = find(&state, &id).await?;
    let flash = Flash::from_notice(query.notice.as_deref());
    Ok(detail_page(&word, flash.as_ref()))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<MetadataForm>,
) -> Result<Response, AppError> {
    let word = find(&state, &id).await?;

    let update = match (
        DifficultyLevel::parse(&form.difficulty_level),
        Familiarity::parse(&form.familiarity),
    ) {
        (Some(difficulty_level), Some(familiarity)) => MetadataUpdate {
            difficulty_level,
            familiarity,
        },
        _ => {
            let flash = Flash::Error("Please choose a valid difficulty and familiarity.".to_string());
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, detail_page(&word, Some(&flash))).into_response());
        }
    };

    let updated = state
        .store
        .update_metadata(word.id, update)
        .await?
        .ok_or(AppError::NotFound)?;
    tracing::info!(
        id = updated.id,
        "Updated '{}': {} / {}",
        updated.original_word,
        updated.difficulty_level,
        updated.familiarity
    );

    Ok(Redirect::to(&format!("/words/{}/?notice=updated", updated.id)).into_response())
}

pub async fn confirm_delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Html<String>, AppError> {
    let word = find(&state, &id).await?;
    let body = format!(
        r#"<p>Delete <strong>{name}</strong> from your words?</p>
<form method="post" action="/words/{id}/delete/">
<button type="submit">Delete</button> <a href="/words/{id}/">Cancel</a>
</form>
"#,
        name = text(display_name(&word)),
        id = word.id,
    );
    Ok(render::layout("Delete word", None, &body))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let id = parse_id(&id)?;

    if !state.store.delete(id).await? {
        return Err(AppError::NotFound);
    }
    tracing::info!(id, "Deleted word");

    Ok(Redirect::to("/words/?notice=deleted").into_response())
}

fn display_name(word: &Word) -> &str {
    if word.french_word.is_empty() {
        &word.original_word
    } else {
        &word.french_word
    }
}

fn detail_page(word: &Word, flash: Option<&Flash>) -> Html<String> {
    let cefr = word
        .cefr_level
        .map(|c| c.description().to_string())
        .unwrap_or_else(|| "-".to_string());

    let body = format!(
        r#"<p class="muted">You searched for: {original}</p>
<dl>
<dt>English</dt><dd>{translation}</dd>
<dt>Explication</dt><dd>{explanation}</dd>
<dt>CEFR</dt><dd>{cefr}</dd>
<dt>Part of speech</dt><dd>{pos}</dd>
<dt>Saved</dt><dd>{created}</dd>
<dt>Updated</dt><dd>{updated}</dd>
</dl>
<h3>English examples</h3>
{english}
<h3>French examples</h3>
{french}
<h3>Progress</h3>
<form method="post" action="/words/{id}/">
<label>Difficulty <select name="difficulty_level">{difficulties}</select></label>
<label>Familiarity <select name="familiarity">{familiarities}</select></label>
<button type="submit">Update</button>
</form>
<details>
<summary>Prompt used</summary>
<pre>{prompt}</pre>
</details>
<p><a href="/words/{id}/delete/">Delete this word</a> | <a href="/words/">Back to list</a></p>
"#,
        original = text(&word.original_word),
        translation = or_dash(&word.english_translation),
        explanation = or_dash(&word.french_explanation),
        cefr = text(&cefr),
        pos = or_dash(word.part_of_speech.as_deref().unwrap_or_default()),
        created = word.created_at.format("%Y-%m-%d %H:%M UTC"),
        updated = word.updated_at.format("%Y-%m-%d %H:%M UTC"),
        english = example_list(&word.english_examples),
        french = example_list(&word.french_examples),
        id = word.id,
        difficulties = options(
            DifficultyLevel::ALL.map(|d| (d.as_str(), d.as_str())),
            word.difficulty_level.as_str()
        ),
        familiarities = options(
            Familiarity::ALL.map(|f| (f.as_str(), f.as_str())),
            word.familiarity.as_str()
        ),
        prompt = text(&word.prompt_used),
    );

    render::layout(display_name(word), flash, &body)
}
