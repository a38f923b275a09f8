use std::fmt::Write;

use axum::Form;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use lexique_core::{LearningStyle, LookupError, LookupRequest, LookupResult, Personalization};
use lexique_types::{CefrLevel, DifficultyLevel};
use serde::Deserialize;

use crate::error::AppError;
use crate::render::{self, Flash, attr, example_list, options, or_dash, text};
use crate::state::AppState;

/// Both the lookup form and the save form post here
#[derive(Debug, Default, Deserialize)]
pub struct LookupForm {
    pub action: Option<String>,
    pub word: Option<String>,
    pub interest: Option<String>,
    pub level: Option<String>,
    pub style: Option<String>,
    /// Serialized [`LookupResult`] echoed back by the save button
    pub word_data: Option<String>,
    /// Tag over `word_data` from [`crate::signing::PayloadSigner`]
    pub signature: Option<String>,
}

impl LookupForm {
    fn request(&self) -> LookupRequest {
        LookupRequest {
            word: self.word.clone().unwrap_or_default(),
            personalization: Personalization {
                interest: self.interest.clone(),
                level: self.level.as_deref().and_then(CefrLevel::parse),
                style: self.style.as_deref().and_then(LearningStyle::parse),
            },
        }
    }
}

pub async fn show(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    render_page(&state, &LookupForm::default(), None, None)
}

pub async fn submit(
    State(state): State<AppState>,
    Form(form): Form<LookupForm>,
) -> Result<Response, AppError> {
    match form.action.as_deref() {
        Some("save") => save(state, form).await,
        _ => lookup(state, form).await,
    }
}

async fn lookup(state: AppState, form: LookupForm) -> Result<Response, AppError> {
    match state.lookup.lookup(form.request()).await {
        Ok(result) => {
            let flash = result.is_partial().then(|| {
                Flash::Warning(format!(
                    "The response was incomplete. Missing: {}.",
                    result.missing_fields().join(", ")
                ))
            });
            let page = render_page(&state, &form, Some(&result), flash.as_ref())?;
            Ok(page.into_response())
        }
        Err(e) => {
            let status = lookup_status(&e);
            let page = render_page(&state, &form, None, Some(&Flash::Error(e.to_string())))?;
            Ok((status, page).into_response())
        }
    }
}

fn lookup_status(error: &LookupError) -> StatusCode {
    if error.is_input_error() {
        StatusCode::UNPROCESSABLE_ENTITY
    } else {
        StatusCode::BAD_GATEWAY
    }
}

async fn save(state: AppState, form: LookupForm) -> Result<Response, AppError> {
    let Some(raw) = form.word_data.as_deref().filter(|d| !d.trim().is_empty()) else {
        let flash = Flash::Warning("Could not save word: missing data.".to_string());
        let page = render_page(&state, &form, None, Some(&flash))?;
        return Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response());
    };

    let signature = form.signature.as_deref().unwrap_or_default();
    if !state.signer.verify(raw, signature) {
        tracing::warn!("Rejected save with a missing or invalid signature");
        let flash =
            Flash::Warning("Could not save word: the lookup result was modified.".to_string());
        let page = render_page(&state, &form, None, Some(&flash))?;
        return Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response());
    }

    let result: LookupResult = match serde_json::from_str(raw) {
        Ok(result) => result,
        Err(e) => {
            tracing::warn!("Rejected save with unreadable word data: {e}");
            let flash = Flash::Warning(format!("Could not save word (parsing error): {e}."));
            let page = render_page(&state, &form, None, Some(&flash))?;
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response());
        }
    };

    let new_word = match state.lookup.prepare_save(&result) {
        Ok(new_word) => new_word,
        Err(e) => {
            let flash = Flash::Warning(format!(
                "Could not save word: {e} The lookup result is still displayed below."
            ));
            let page = render_page(&state, &form, Some(&result), Some(&flash))?;
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response());
        }
    };

    let word = state.store.upsert(&new_word).await?;
    tracing::info!(id = word.id, "Saved '{}'", word.original_word);

    Ok(Redirect::to("/words/?notice=saved").into_response())
}

fn render_page(
    state: &AppState,
    form: &LookupForm,
    result: Option<&LookupResult>,
    flash: Option<&Flash>,
) -> Result<Html<String>, AppError> {
    let word = form
        .word
        .as_deref()
        .or(result.map(|r| r.original_word.as_str()))
        .unwrap_or_default();
    let interest = form.interest.as_deref().unwrap_or_default();
    let level = form.level.as_deref().unwrap_or_default();
    let style = form
        .style
        .as_deref()
        .and_then(LearningStyle::parse)
        .unwrap_or_default();

    let default_level = format!("Default ({})", state.config.prompt.default_level);
    let levels = std::iter::once(("", default_level.as_str()))
        .chain(CefrLevel::ALL.into_iter().map(|l| (l.as_str(), l.description())));

    let mut body = format!(
        r#"<form method="post" action="/lookup/">
<input type="hidden" name="action" value="lookup">
<label>Word or phrase <input name="word" value="{word}" maxlength="200" required autofocus></label>
<label>Interest <input name="interest" value="{interest}" maxlength="100" placeholder="{placeholder}"></label>
<label>Level <select name="level">{levels}</select></label>
<label>Style <select name="style">{styles}</select></label>
<button type="submit">Look up</button>
</form>
"#,
        word = attr(word),
        interest = attr(interest),
        placeholder = attr(&state.config.prompt.default_interest),
        levels = options(levels, level),
        styles = options(LearningStyle::ALL.map(|s| (s.as_str(), s.as_str())), style.as_str()),
    );

    if let Some(result) = result {
        body.push_str(&result_section(state, result)?);
    }

    Ok(render::layout("Look up a word", flash, &body))
}

fn result_section(state: &AppState, result: &LookupResult) -> Result<String, AppError> {
    let payload = serde_json::to_string(result)?;
    let signature = state.signer.sign(&payload);
    let heading = if result.french_word.is_empty() {
        &result.original_word
    } else {
        &result.french_word
    };
    let difficulty = match (result.difficulty_level, result.cefr_level) {
        (Some(level), Some(cefr)) => format!("{level} ({cefr})"),
        (Some(level), None) => level.to_string(),
        (None, _) => format!("{} (default)", DifficultyLevel::default()),
    };

    let mut html = String::new();
    let _ = write!(
        html,
        r#"<section class="result">
<h2>{heading}</h2>
<p class="muted">You searched for: {original}</p>
<dl>
<dt>English</dt><dd>{translation}</dd>
<dt>Explication</dt><dd>{explanation}</dd>
<dt>Difficulty</dt><dd>{difficulty}</dd>
<dt>Part of speech</dt><dd>{pos}</dd>
</dl>
<h3>English examples</h3>
{english}
<h3>French examples</h3>
{french}
<form method="post" action="/lookup/">
<input type="hidden" name="action" value="save">
<input type="hidden" name="word_data" value="{payload}">
<input type="hidden" name="signature" value="{signature}">
<button type="submit">Save word</button>
</form>
</section>
"#,
        heading = text(heading),
        original = text(&result.original_word),
        translation = or_dash(&result.english_translation),
        explanation = or_dash(&result.french_explanation),
        difficulty = text(&difficulty),
        pos = or_dash(result.part_of_speech.as_deref().unwrap_or_default()),
        english = example_list(&result.english_examples),
        french = example_list(&result.french_examples),
        payload = attr(&payload),
        signature = attr(&signature),
    );

    Ok(html)
}
