use std::env;

use serde::{Deserialize, Serialize};

use self::database::DatabaseConfig;
use self::prompt::PromptConfig;
use self::server::ServerConfig;
use self::translator::TranslatorConfig;

pub mod database;
pub mod prompt;
pub mod server;
pub mod translator;

#[derive(Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub translator: TranslatorConfig,
    pub prompt: PromptConfig,
}

impl Config {
    /// Overlay values found in the process environment
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| env::var(key).ok());
    }

    /// Overlay values from `lookup`, a stand-in for the environment.
    /// Empty values are ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = lookup("GEMINI_API_KEY") {
            self.translator.api_key = key;
        }
        if let Some(model) = lookup("GEMINI_MODEL") {
            self.translator.model = model;
        }
        if let Some(url) = lookup("GEMINI_API_URL") {
            self.translator.api_url = url;
        }
        if let Some(timeout) = lookup("GEMINI_TIMEOUT_SECONDS").and_then(|v| v.parse().ok()) {
            self.translator.timeout_seconds = timeout;
        }
        if let Some(url) = lookup("DATABASE_URL") {
            self.database.url = url;
        }
        if let Some(bind) = lookup("LEXIQUE_BIND") {
            self.server.bind = bind;
        }
        if let Some(secret) = lookup("LEXIQUE_SECRET_KEY") {
            self.server.secret_key = secret;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let config: Config =
            serde_json::from_str(r#"{ "translator": { "model": "gemini-pro" } }"#).unwrap();

        assert_eq!(config.translator.model, "gemini-pro");
        assert_eq!(config.translator.timeout_seconds, 30);
        assert_eq!(config.server.bind, "127.0.0.1:8000");
        assert!(config.server.secret_key.is_empty());
        assert!(config.prompt.template.contains("{word}"));
    }

    #[test]
    fn overrides_replace_non_empty_values() {
        let vars: HashMap<&str, &str> = [
            ("GEMINI_API_KEY", "secret"),
            ("DATABASE_URL", "sqlite://other.db"),
            ("LEXIQUE_BIND", "  "),
            ("GEMINI_TIMEOUT_SECONDS", "not-a-number"),
            ("LEXIQUE_SECRET_KEY", "s3cret"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.translator.api_key, "secret");
        assert_eq!(config.database.url, "sqlite://other.db");
        assert_eq!(config.server.bind, "127.0.0.1:8000");
        assert_eq!(config.translator.timeout_seconds, 30);
        assert_eq!(config.server.secret_key, "s3cret");
    }
}
