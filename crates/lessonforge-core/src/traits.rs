//! Core trait definitions for LLM providers.
//!
//! The `LlmProvider` trait is implemented by the `lessonforge-providers`
//! crate; the generation client only ever talks to it through this seam.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// LLM Provider trait
// ---------------------------------------------------------------------------

/// Trait for LLM backends that complete a chat prompt.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Human-readable provider name (e.g. "openai").
    fn name(&self) -> &str;

    /// Send one completion request.
    async fn generate(&self, request: &GenerateRequest) -> anyhow::Result<GenerateResponse>;

    /// List available models for this provider.
    fn available_models(&self) -> Vec<ModelInfo>;
}

/// Request to complete a prompt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    /// Model identifier (e.g. "gpt-4.1-mini").
    pub model: String,
    /// The user prompt.
    pub prompt: String,
    /// Optional system prompt override.
    #[serde(default)]
    pub system_prompt: Option<String>,
    /// Maximum tokens to generate.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f64,
    /// Ask the backend to constrain output to a JSON object.
    #[serde(default)]
    pub json_mode: bool,
}

/// Response from a completion request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResponse {
    /// The raw response content.
    pub content: String,
    /// Model that actually generated the response.
    pub model: String,
    /// Token usage.
    pub token_usage: TokenUsage,
    /// Latency in milliseconds.
    pub latency_ms: u64,
}

/// Token accounting reported by the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
    pub estimated_cost_usd: f64,
}

/// Information about an available model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Model identifier.
    pub id: String,
    /// Human-readable model name.
    pub name: String,
    /// Provider name.
    pub provider: String,
    /// Maximum context window size in tokens.
    pub max_context: u32,
    /// Cost per 1K input tokens in USD.
    pub cost_per_1k_input: f64,
    /// Cost per 1K output tokens in USD.
    pub cost_per_1k_output: f64,
}

// ---------------------------------------------------------------------------
// Default system prompt
// ---------------------------------------------------------------------------

/// System prompt used when a request does not carry its own.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are an expert educational content assistant. Follow the user's formatting instructions exactly.";

// ---------------------------------------------------------------------------
// Markdown JSON extraction
// ---------------------------------------------------------------------------

/// Extract a JSON payload from a possibly markdown-wrapped LLM reply.
///
/// Handles:
/// - ```json``` blocks (the first one wins)
/// - Generic ``` blocks (if no json-specific block is found)
/// - Raw text with no fences (returned trimmed)
pub fn extract_json_payload(response: &str) -> String {
    let mut json_blocks = Vec::new();
    let mut generic_blocks = Vec::new();
    let mut in_block = false;
    let mut is_json_block = false;
    let mut is_generic_block = false;
    let mut current_block = String::new();

    for line in response.lines() {
        let trimmed = line.trim();

        if !in_block && trimmed.starts_with("```") {
            in_block = true;
            let lang = trimmed.trim_start_matches('`').trim().to_lowercase();
            is_json_block = lang == "json" || lang == "jsonc";
            is_generic_block = lang.is_empty();
            current_block.clear();
            continue;
        }

        if in_block && trimmed == "```" {
            in_block = false;
            if is_json_block {
                json_blocks.push(current_block.clone());
            } else if is_generic_block {
                generic_blocks.push(current_block.clone());
            }
            current_block.clear();
            continue;
        }

        if in_block {
            if !current_block.is_empty() {
                current_block.push('\n');
            }
            current_block.push_str(line);
        }
    }

    // Truncated (unclosed) block: keep what we have
    if in_block && !current_block.is_empty() {
        if is_json_block {
            json_blocks.push(current_block);
        } else if is_generic_block {
            generic_blocks.push(current_block);
        }
    }

    if let Some(block) = json_blocks.into_iter().next() {
        return block.trim().to_string();
    }

    if let Some(block) = generic_blocks.into_iter().next() {
        return block.trim().to_string();
    }

    response.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_json_block() {
        let input = r#"Here are your questions:

```json
{"questions": []}
```

Good luck!"#;
        assert_eq!(extract_json_payload(input), r#"{"questions": []}"#);
    }

    #[test]
    fn extract_no_fences_returns_trimmed_raw() {
        let input = "  {\"a\": 1}\n";
        assert_eq!(extract_json_payload(input), "{\"a\": 1}");
    }

    #[test]
    fn extract_generic_block_fallback() {
        let input = "```\n{\"b\": 2}\n```";
        assert_eq!(extract_json_payload(input), "{\"b\": 2}");
    }

    #[test]
    fn extract_prefers_json_over_generic() {
        let input = "```\nnot this\n```\n\n```json\n{\"c\": 3}\n```\n";
        assert_eq!(extract_json_payload(input), "{\"c\": 3}");
    }

    #[test]
    fn extract_truncated_unclosed_block() {
        let input = "```json\n{\"questions\": [";
        assert_eq!(extract_json_payload(input), "{\"questions\": [");
    }

    #[test]
    fn extract_ignores_other_languages() {
        let input = "```python\nprint('hi')\n```\n```json\n[1]\n```";
        assert_eq!(extract_json_payload(input), "[1]");
    }
}
