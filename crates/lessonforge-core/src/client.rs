//! Generation client: one upstream call per invocation.
//!
//! Wraps an `LlmProvider` with the model settings and deadline, and folds
//! provider failures into `QuizError`. There is no retry and no caching.

use std::sync::Arc;
use std::time::Duration;

use tracing::instrument;

use crate::error::{ProviderError, QuizError, QuizResult};
use crate::model::ContentRequest;
use crate::prompt::{build_analysis_prompt, build_content_prompt, PromptText};
use crate::traits::{GenerateRequest, LlmProvider};

/// Model settings applied to every call.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Model identifier passed to the provider.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f64,
    /// Max tokens per reply.
    pub max_tokens: u32,
    /// Upper bound on a single call; `None` relies on the provider's own timeout.
    pub deadline: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4.1-mini".to_string(),
            temperature: 0.7,
            max_tokens: 4096,
            deadline: Some(Duration::from_secs(120)),
        }
    }
}

/// Sends prompts upstream and returns the raw reply text.
#[derive(Clone)]
pub struct GenerationClient {
    provider: Arc<dyn LlmProvider>,
    config: ClientConfig,
}

impl GenerationClient {
    pub fn new(provider: Arc<dyn LlmProvider>, config: ClientConfig) -> Self {
        Self { provider, config }
    }

    /// A copy of this client whose calls are bounded by `deadline`.
    pub fn with_deadline(&self, deadline: Duration) -> Self {
        let mut config = self.config.clone();
        config.deadline = Some(deadline);
        Self {
            provider: Arc::clone(&self.provider),
            config,
        }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Send a question prompt; the reply is expected to be JSON.
    pub async fn generate(&self, prompt: &PromptText) -> QuizResult<String> {
        self.complete(prompt, true).await
    }

    /// Ask for a readability/metadata analysis of `content`.
    pub async fn analyze(&self, content: &str) -> QuizResult<String> {
        self.complete(&build_analysis_prompt(content), true).await
    }

    /// Ask for a lesson text on a topic/subtopic.
    pub async fn write_content(&self, request: &ContentRequest) -> QuizResult<String> {
        self.complete(&build_content_prompt(request), false).await
    }

    #[instrument(skip(self, prompt), fields(provider = %self.provider.name(), model = %self.config.model))]
    async fn complete(&self, prompt: &PromptText, json_mode: bool) -> QuizResult<String> {
        let request = GenerateRequest {
            model: self.config.model.clone(),
            prompt: prompt.user.clone(),
            system_prompt: Some(prompt.system.clone()),
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
            json_mode,
        };

        let call = self.provider.generate(&request);
        let result = match self.config.deadline {
            Some(deadline) => tokio::time::timeout(deadline, call).await.map_err(|_| {
                tracing::error!("upstream call exceeded {}ms", deadline.as_millis());
                QuizError::Upstream(format!(
                    "request timed out after {}ms",
                    deadline.as_millis()
                ))
            })?,
            None => call.await,
        };

        let response = result.map_err(|e| {
            match e.downcast_ref::<ProviderError>() {
                Some(ProviderError::RateLimited { retry_after_ms }) => {
                    tracing::warn!("upstream rate limited (retry after {retry_after_ms}ms)")
                }
                Some(kind) => tracing::error!("upstream call failed: {kind}"),
                None => tracing::error!("upstream call failed: {e:#}"),
            }
            QuizError::Upstream(format!("{e:#}"))
        })?;

        if response.content.trim().is_empty() {
            return Err(QuizError::EmptyResponse);
        }

        tracing::debug!(
            latency_ms = response.latency_ms,
            total_tokens = response.token_usage.total_tokens,
            "upstream call complete"
        );
        Ok(response.content)
    }
}
