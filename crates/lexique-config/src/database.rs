use serde::{Deserialize, Serialize};

fn default_url() -> String {
    "sqlite://lexique.db".to_string()
}

fn default_max_connections() -> u32 {
    5
}

#[derive(Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct DatabaseConfig {
    #[serde(default = "default_url")]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            max_connections: default_max_connections(),
        }
    }
}
