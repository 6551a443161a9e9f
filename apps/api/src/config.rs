use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};

const DEFAULT_STUB_DELAY_MS: u64 = 2000;
const DEFAULT_ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com";
const DEFAULT_CREDENTIAL_PATH: &str = ".tailor/credential";
const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Which backend produces tailored résumés.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TailorBackend {
    /// Fixed delay, then a placeholder naming the company and position.
    Stub,
    /// Anthropic Messages API, authenticated with the user's credential.
    Anthropic,
}

impl TailorBackend {
    fn parse(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "stub" => Ok(Self::Stub),
            "anthropic" => Ok(Self::Anthropic),
            other => bail!("TAILOR_BACKEND must be 'stub' or 'anthropic', got '{other}'"),
        }
    }
}

/// Application configuration loaded from environment variables.
/// Every variable is optional; see the defaults above.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub backend: TailorBackend,
    pub stub_delay: Duration,
    /// Initial credential. A key persisted through the API takes precedence.
    pub anthropic_api_key: Option<String>,
    pub anthropic_base_url: String,
    /// Attempts per LLM call, counting the first; 429 and 5xx are retried.
    pub anthropic_max_attempts: u32,
    pub credential_path: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let backend = match optional_env("TAILOR_BACKEND") {
            Some(value) => TailorBackend::parse(&value)?,
            None => TailorBackend::Stub,
        };

        let stub_delay_ms = match optional_env("TAILOR_STUB_DELAY_MS") {
            Some(value) => value
                .parse::<u64>()
                .context("TAILOR_STUB_DELAY_MS must be a whole number of milliseconds")?,
            None => DEFAULT_STUB_DELAY_MS,
        };

        let anthropic_max_attempts = match optional_env("ANTHROPIC_MAX_ATTEMPTS") {
            Some(value) => parse_attempts(&value)?,
            None => DEFAULT_MAX_ATTEMPTS,
        };

        Ok(Config {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            backend,
            stub_delay: Duration::from_millis(stub_delay_ms),
            anthropic_api_key: optional_env("ANTHROPIC_API_KEY"),
            anthropic_base_url: optional_env("ANTHROPIC_BASE_URL")
                .unwrap_or_else(|| DEFAULT_ANTHROPIC_BASE_URL.to_string()),
            anthropic_max_attempts,
            credential_path: optional_env("CREDENTIAL_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CREDENTIAL_PATH)),
        })
    }
}

fn parse_attempts(value: &str) -> Result<u32> {
    match value.parse::<u32>() {
        Ok(n) if n >= 1 => Ok(n),
        _ => bail!("ANTHROPIC_MAX_ATTEMPTS must be a whole number of at least 1, got '{value}'"),
    }
}

/// Reads a variable, treating unset and blank the same way.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
