use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::Context;
use lexique_config::Config;

/// Load the config file, then let the environment override it.
/// A missing file means defaults.
pub fn load_config(path: &Path) -> anyhow::Result<Config> {
    let mut config = if path.exists() {
        tracing::info!("Loading config from {}", path.display());
        let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
        let reader = BufReader::new(file);
        serde_json::from_reader(reader)
            .with_context(|| format!("invalid config file {}", path.display()))?
    } else {
        tracing::warn!("{} not found, using default config", path.display());
        Config::default()
    };

    config.apply_env();

    if config.translator.api_key.is_empty() {
        tracing::warn!("GEMINI_API_KEY is not set, lookups will fail");
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let config = load_config(Path::new("does-not-exist/config.json")).unwrap();
        assert_eq!(config.database.max_connections, 5);
    }

    #[test]
    fn reads_partial_file() {
        let path = std::env::temp_dir().join(format!("lexique-config-{}.json", std::process::id()));
        fs::write(&path, r#"{ "prompt": { "default_level": "A2" } }"#).unwrap();

        let config = load_config(&path).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(config.prompt.default_level, "A2");
        assert!(config.prompt.template.contains("{word}"));
    }

    #[test]
    fn malformed_file_is_an_error() {
        let path = std::env::temp_dir().join(format!("lexique-bad-{}.json", std::process::id()));
        fs::write(&path, "{ not json").unwrap();

        let result = load_config(&path);
        fs::remove_file(&path).ok();

        assert!(result.is_err());
    }
}
