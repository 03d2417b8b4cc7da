use std::env;

/// Model used for curation judgment calls unless overridden.
pub const DEFAULT_CURATION_MODEL: &str = "o4-mini-2025-04-16";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: String,
    pub curation_model: String,
}

impl Config {
    /// Load configuration from environment variables.
    /// Panics with a clear message if required vars are missing.
    pub fn from_env() -> Self {
        Self {
            openai_api_key: required_env("OPENAI_API_KEY"),
            curation_model: env::var("CURATION_MODEL")
                .unwrap_or_else(|_| DEFAULT_CURATION_MODEL.to_string()),
        }
    }
}

fn required_env(key: &str) -> String {
    env::var(key).unwrap_or_else(|_| panic!("{key} environment variable is required"))
}
