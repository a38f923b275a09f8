use serde::{Deserialize, Serialize};

fn default_bind() -> String {
    "127.0.0.1:8000".to_string()
}

#[derive(Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the HTTP server listens on
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Key for signing lookup results held by the browser between lookup and save.
    /// Empty means a random key per process, so pending save forms do not survive a restart.
    #[serde(default)]
    pub secret_key: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            secret_key: String::new(),
        }
    }
}
