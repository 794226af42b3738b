//! Error types.
//!
//! `ProviderError` describes transport-level failures talking to an LLM
//! backend. `QuizError` is the taxonomy surfaced to callers of the lesson
//! pipeline; provider failures are folded into `QuizError::Upstream`.

use std::fmt;

use thiserror::Error;

/// Errors that can occur when interacting with an LLM provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The API returned a 429 rate limit response.
    #[error("rate limited, retry after {retry_after_ms}ms")]
    RateLimited { retry_after_ms: u64 },

    /// Authentication failed (invalid API key).
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The requested model was not found.
    #[error("model not found: {0}")]
    ModelNotFound(String),

    /// The API returned an error response.
    #[error("API error (HTTP {status}): {message}")]
    ApiError { status: u16, message: String },

    /// The request timed out.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// A network error occurred.
    #[error("network error: {0}")]
    NetworkError(String),
}

/// One structurally invalid entry in a question reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// Zero-based position of the entry in the reply.
    pub index: usize,
    /// What is wrong with it.
    pub message: String,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "entry {}: {}", self.index, self.message)
    }
}

/// Errors surfaced by the question and content pipelines.
#[derive(Debug, Error)]
pub enum QuizError {
    /// A required request field is missing or invalid.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The upstream call failed or timed out.
    #[error("upstream request failed: {0}")]
    Upstream(String),

    /// The upstream reply carried no content.
    #[error("upstream returned an empty response")]
    EmptyResponse,

    /// The upstream reply was not the JSON we asked for.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The reply parsed but is inconsistent with the requested question type.
    #[error("response failed validation: {}", describe_issues(.issues))]
    Validation { issues: Vec<ValidationIssue> },
}

impl QuizError {
    /// Returns `true` if the caller sent a bad request (as opposed to an
    /// upstream or reply problem).
    pub fn is_client_error(&self) -> bool {
        matches!(self, QuizError::InvalidInput(_))
    }
}

fn describe_issues(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

pub type QuizResult<T> = Result<T, QuizError>;
