//! Server-rendered HTML. Every piece of user or model text goes through
//! [`text`] or [`attr`] before it lands in markup.

use std::borrow::Cow;
use std::fmt::Write;

use axum::response::Html;
use lexique_types::Examples;

const STYLE: &str = "
body { font-family: system-ui, sans-serif; max-width: 52rem; margin: 0 auto; padding: 1rem; color: #222; }
nav a { margin-right: 1rem; }
label { display: block; margin: .5rem 0; }
table { border-collapse: collapse; width: 100%; }
th, td { text-align: left; padding: .3rem .5rem; border-bottom: 1px solid #ddd; }
.flash { padding: .6rem 1rem; border-radius: 4px; }
.flash.success { background: #e6f4ea; }
.flash.warning { background: #fff4e5; }
.flash.error { background: #fdecea; }
.muted { color: #777; }
pre { background: #f6f6f6; padding: 1rem; overflow-x: auto; }
";

pub fn text(value: &str) -> Cow<'_, str> {
    html_escape::encode_text(value)
}

pub fn attr(value: &str) -> Cow<'_, str> {
    html_escape::encode_double_quoted_attribute(value)
}

/// One-shot message shown above the page body
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flash {
    Success(String),
    Warning(String),
    Error(String),
}

impl Flash {
    /// Messages carried across redirects as `?notice=`
    pub fn from_notice(notice: Option<&str>) -> Option<Self> {
        match notice? {
            "saved" => Some(Flash::Success("Word saved.".to_string())),
            "updated" => Some(Flash::Success("Word updated.".to_string())),
            "deleted" => Some(Flash::Success("Word deleted.".to_string())),
            _ => None,
        }
    }

    fn to_html(&self) -> String {
        let (class, message) = match self {
            Flash::Success(m) => ("success", m),
            Flash::Warning(m) => ("warning", m),
            Flash::Error(m) => ("error", m),
        };
        format!(r#"<p class="flash {class}">{}</p>"#, text(message))
    }
}

pub fn layout(title: &str, flash: Option<&Flash>, body: &str) -> Html<String> {
    let flash = flash.map(Flash::to_html).unwrap_or_default();
    let title = text(title);

    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title} | Lexique</title>
<style>{STYLE}</style>
</head>
<body>
<nav><a href="/lookup/">Lookup</a><a href="/words/">My words</a><a href="/docs/">Docs</a><a href="/about/">About</a></nav>
<main>
<h1>{title}</h1>
{flash}
{body}
</main>
</body>
</html>
"#
    ))
}

/// `<option>` list with `selected` on the matching value
pub fn options<'a>(choices: impl IntoIterator<Item = (&'a str, &'a str)>, selected: &str) -> String {
    let mut html = String::new();
    for (value, label) in choices {
        let mark = if value == selected { " selected" } else { "" };
        let _ = write!(html, r#"<option value="{}"{mark}>{}</option>"#, attr(value), text(label));
    }
    html
}

pub fn example_list(examples: &Examples) -> String {
    if examples.is_empty() {
        return r#"<p class="muted">No examples.</p>"#.to_string();
    }

    let mut html = String::from("<ol>");
    for example in examples.iter().filter(|e| !e.is_empty()) {
        let _ = write!(html, "<li>{}</li>", text(example));
    }
    html.push_str("</ol>");
    html
}

/// Blank model fields show as a dash
pub fn or_dash(value: &str) -> Cow<'_, str> {
    if value.trim().is_empty() {
        Cow::Borrowed("-")
    } else {
        text(value)
    }
}

pub fn not_found() -> Html<String> {
    layout(
        "Not found",
        None,
        r#"<p>There is nothing here. <a href="/words/">Back to your words</a>.</p>"#,
    )
}

pub fn server_error() -> Html<String> {
    layout(
        "Something went wrong",
        Some(&Flash::Error("The request could not be completed.".to_string())),
        r#"<p><a href="/lookup/">Back to lookup</a></p>"#,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notices_map_to_messages() {
        assert_eq!(
            Flash::from_notice(Some("deleted")),
            Some(Flash::Success("Word deleted.".to_string()))
        );
        assert_eq!(Flash::from_notice(Some("<script>")), None);
        assert_eq!(Flash::from_notice(None), None);
    }

    #[test]
    fn model_text_is_escaped() {
        let Html(page) = layout("<b>", Some(&Flash::Warning("a & b".to_string())), "");
        assert!(page.contains("&lt;b&gt;"));
        assert!(page.contains("a &amp; b"));

        let examples = Examples::from_vec(vec!["<i>Salut</i>".to_string()]);
        assert_eq!(example_list(&examples), "<ol><li>&lt;i&gt;Salut&lt;/i&gt;</li></ol>");
    }

    #[test]
    fn options_mark_selection() {
        let html = options([("A1", "A1"), ("B2", "B2")], "B2");
        assert_eq!(
            html,
            r#"<option value="A1">A1</option><option value="B2" selected>B2</option>"#
        );
    }
}
