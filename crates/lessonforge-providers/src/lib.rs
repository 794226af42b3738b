//! lessonforge-providers — LLM provider integrations.
//!
//! Implements the `LlmProvider` trait for OpenAI, Anthropic, and Ollama, and
//! loads the configuration that decides which one the service talks to.

pub mod anthropic;
pub mod config;
pub mod mock;
pub mod ollama;
pub mod openai;

pub use config::{
    create_provider, load_config, load_config_from, provider_by_name, LessonforgeConfig,
    ProviderConfig, ServerConfig,
};
pub use lessonforge_core::error::ProviderError;
