//! Tailoring backends — pluggable, trait-based producers of tailored résumé text.
//!
//! Default: `StubTailor` (fixed delay, placeholder text, never fails).
//! `LlmTailor` sends the résumé and posting to Claude through `llm_client`.
//!
//! `Orchestrator` holds an `Arc<dyn Tailor>`, chosen at startup via config.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::llm_client::prompts::{FACTUALITY_INSTRUCTION, PLAIN_TEXT_SYSTEM};
use crate::llm_client::{LlmClient, LlmError};
use crate::models::job::JobDescription;
use crate::tailoring::prompts::{TAILOR_PROMPT_TEMPLATE, TAILOR_SYSTEM};

// ────────────────────────────────────────────────────────────────────────────
// Errors
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Error, PartialEq)]
pub enum TailorError {
    #[error("no API key is configured; set one before tailoring")]
    MissingCredential,

    #[error("could not reach the text-generation service: {0}")]
    Network(String),

    #[error("the API key was rejected: {0}")]
    Authentication(String),

    #[error("usage quota or rate limit exceeded: {0}")]
    Quota(String),

    #[error("the text-generation service returned an unusable response: {0}")]
    MalformedResponse(String),
}

/// Stable classification of a [`TailorError`], exposed to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TailorErrorKind {
    MissingCredential,
    Network,
    Authentication,
    Quota,
    MalformedResponse,
}

impl TailorErrorKind {
    pub fn code(self) -> &'static str {
        match self {
            Self::MissingCredential => "MISSING_CREDENTIAL",
            Self::Network => "NETWORK_ERROR",
            Self::Authentication => "AUTHENTICATION_ERROR",
            Self::Quota => "QUOTA_EXCEEDED",
            Self::MalformedResponse => "MALFORMED_RESPONSE",
        }
    }
}

impl TailorError {
    pub fn kind(&self) -> TailorErrorKind {
        match self {
            Self::MissingCredential => TailorErrorKind::MissingCredential,
            Self::Network(_) => TailorErrorKind::Network,
            Self::Authentication(_) => TailorErrorKind::Authentication,
            Self::Quota(_) => TailorErrorKind::Quota,
            Self::MalformedResponse(_) => TailorErrorKind::MalformedResponse,
        }
    }
}

impl From<LlmError> for TailorError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::Http(e) if e.is_decode() => Self::MalformedResponse(e.to_string()),
            LlmError::Http(e) => Self::Network(e.to_string()),
            LlmError::Api { status: 401 | 403, message } => Self::Authentication(message),
            LlmError::Api { status: 429, message } => Self::Quota(message),
            LlmError::Api { status, message } => Self::Network(format!("status {status}: {message}")),
            LlmError::RateLimited { retries, message } => {
                Self::Quota(format!("{message} (still limited after {retries} attempts)"))
            }
            LlmError::EmptyContent => Self::MalformedResponse("no text in response".to_string()),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// Everything a backend needs, snapshotted from the workspace at submit time.
#[derive(Clone)]
pub struct TailorRequest {
    pub resume: String,
    pub job: JobDescription,
    pub credential: Option<String>,
}

/// The tailoring backend trait. Implement this to swap backends without
/// touching the orchestrator or handlers.
#[async_trait]
pub trait Tailor: Send + Sync {
    /// Short backend name recorded on each result ("stub" | "anthropic").
    fn name(&self) -> &'static str;

    async fn tailor(&self, request: &TailorRequest) -> Result<String, TailorError>;
}

// ────────────────────────────────────────────────────────────────────────────
// StubTailor
// ────────────────────────────────────────────────────────────────────────────

/// Waits a fixed delay, then returns a placeholder naming the company and
/// position. Ignores the credential.
pub struct StubTailor {
    delay: Duration,
}

impl StubTailor {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl Tailor for StubTailor {
    fn name(&self) -> &'static str {
        "stub"
    }

    async fn tailor(&self, request: &TailorRequest) -> Result<String, TailorError> {
        tokio::time::sleep(self.delay).await;
        Ok(format!(
            "Your resume has been tailored for the {} position at {}. \
             (Placeholder: no text-generation backend is connected.)",
            request.job.position, request.job.company
        ))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// LlmTailor
// ────────────────────────────────────────────────────────────────────────────

pub struct LlmTailor {
    llm: LlmClient,
}

impl LlmTailor {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl Tailor for LlmTailor {
    fn name(&self) -> &'static str {
        "anthropic"
    }

    async fn tailor(&self, request: &TailorRequest) -> Result<String, TailorError> {
        let api_key = request
            .credential
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or(TailorError::MissingCredential)?;

        let prompt = build_prompt(request);
        let system = format!("{TAILOR_SYSTEM} {PLAIN_TEXT_SYSTEM}");

        info!(
            "Tailoring resume for {} ({} chars)",
            request.job.label(),
            request.resume.len()
        );
        let text = self.llm.call_text(api_key, &prompt, &system).await?;
        Ok(text)
    }
}

fn build_prompt(request: &TailorRequest) -> String {
    TAILOR_PROMPT_TEMPLATE
        .replace("{factuality_instruction}", FACTUALITY_INSTRUCTION)
        .replace("{company}", &request.job.company)
        .replace("{position}", &request.job.position)
        .replace("{description}", &request.job.description)
        .replace("{resume}", &request.resume)
}
