//! Runtime configuration loaded from environment variables.

use std::env;

use crate::error::{AskdbError, Result};

const DEFAULT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Settings for the chat-completion backend.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
}

/// Full application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub llm: LlmConfig,
    pub database_url: String,
    pub read_only: bool,
}

impl Config {
    /// Loads configuration from the environment.
    ///
    /// `OPENAI_API_KEY` and `DATABASE_URL` are required. `ASKDB_MODEL`,
    /// `ASKDB_BASE_URL` and `ASKDB_READ_ONLY` are optional overrides.
    pub fn from_env() -> Result<Self> {
        let api_key = required("OPENAI_API_KEY")?;
        let database_url = required("DATABASE_URL")?;

        let model = env::var("ASKDB_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let base_url = env::var("ASKDB_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let read_only = env::var("ASKDB_READ_ONLY")
            .map(|v| truthy(&v))
            .unwrap_or(true);

        Ok(Self {
            llm: LlmConfig {
                api_key,
                model,
                base_url,
            },
            database_url,
            read_only,
        })
    }
}

fn required(key: &str) -> Result<String> {
    match env::var(key) {
        Ok(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(AskdbError::Config(format!(
            "{} is not set. Add it to the environment or a .env file.",
            key
        ))),
    }
}

fn truthy(value: &str) -> bool {
    let v = value.trim();
    !v.eq_ignore_ascii_case("false") && v != "0"
}
