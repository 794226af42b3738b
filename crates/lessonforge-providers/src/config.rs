//! Configuration loading and provider factory.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use lessonforge_core::client::ClientConfig;
use lessonforge_core::service::ServiceConfig;
use lessonforge_core::traits::LlmProvider;

use crate::anthropic::AnthropicProvider;
use crate::mock::MockProvider;
use crate::ollama::OllamaProvider;
use crate::openai::OpenAiProvider;

/// File looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "lessonforge.toml";

/// Configuration for a single LLM provider.
///
/// Note: Custom Debug impl masks API keys to prevent accidental exposure in logs.
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProviderConfig {
    OpenAI {
        api_key: String,
        #[serde(default)]
        base_url: Option<String>,
        #[serde(default)]
        org_id: Option<String>,
    },
    Anthropic {
        api_key: String,
        #[serde(default)]
        base_url: Option<String>,
    },
    Ollama {
        #[serde(default = "default_ollama_url")]
        base_url: String,
    },
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderConfig::OpenAI {
                api_key: _,
                base_url,
                org_id,
            } => f
                .debug_struct("OpenAI")
                .field("api_key", &"***")
                .field("base_url", base_url)
                .field("org_id", org_id)
                .finish(),
            ProviderConfig::Anthropic {
                api_key: _,
                base_url,
            } => f
                .debug_struct("Anthropic")
                .field("api_key", &"***")
                .field("base_url", base_url)
                .finish(),
            ProviderConfig::Ollama { base_url } => f
                .debug_struct("Ollama")
                .field("base_url", base_url)
                .finish(),
        }
    }
}

fn default_ollama_url() -> String {
    "http://localhost:11434".to_string()
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Socket address the API listens on.
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:3000".to_string()
}

/// Top-level lessonforge configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LessonforgeConfig {
    /// Provider configurations keyed by name.
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
    /// Provider used when none is given on the command line.
    #[serde(default = "default_provider")]
    pub default_provider: String,
    #[serde(default = "default_model")]
    pub default_model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Deadline for a single upstream call.
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
    /// Largest question count a request may ask for.
    #[serde(default = "default_max_questions")]
    pub max_questions: u32,
    #[serde(default)]
    pub server: ServerConfig,
}

fn default_provider() -> String {
    "openai".to_string()
}
fn default_model() -> String {
    "gpt-4.1-mini".to_string()
}
fn default_temperature() -> f64 {
    0.7
}
fn default_max_tokens() -> u32 {
    4096
}
fn default_timeout() -> u64 {
    120
}
fn default_max_questions() -> u32 {
    50
}

impl Default for LessonforgeConfig {
    fn default() -> Self {
        Self {
            providers: HashMap::new(),
            default_provider: default_provider(),
            default_model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            request_timeout_secs: default_timeout(),
            max_questions: default_max_questions(),
            server: ServerConfig::default(),
        }
    }
}

impl LessonforgeConfig {
    /// Client settings, optionally with a different model.
    pub fn client_config(&self, model: Option<&str>) -> ClientConfig {
        ClientConfig {
            model: model.unwrap_or(&self.default_model).to_string(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            deadline: (self.request_timeout_secs > 0)
                .then(|| Duration::from_secs(self.request_timeout_secs)),
        }
    }

    pub fn service_config(&self) -> ServiceConfig {
        ServiceConfig {
            max_questions: self.max_questions,
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        if let Some(end) = result[start..].find('}') {
            let var_name = &result[start + 2..start + end];
            let value = std::env::var(var_name).unwrap_or_default();
            result = format!(
                "{}{}{}",
                &result[..start],
                value,
                &result[start + end + 1..]
            );
        } else {
            break;
        }
    }
    result
}

fn resolve_provider_config(config: &ProviderConfig) -> ProviderConfig {
    match config {
        ProviderConfig::OpenAI {
            api_key,
            base_url,
            org_id,
        } => ProviderConfig::OpenAI {
            api_key: resolve_env_vars(api_key),
            base_url: base_url.as_ref().map(|u| resolve_env_vars(u)),
            org_id: org_id.as_ref().map(|o| resolve_env_vars(o)),
        },
        ProviderConfig::Anthropic { api_key, base_url } => ProviderConfig::Anthropic {
            api_key: resolve_env_vars(api_key),
            base_url: base_url.as_ref().map(|u| resolve_env_vars(u)),
        },
        ProviderConfig::Ollama { base_url } => ProviderConfig::Ollama {
            base_url: resolve_env_vars(base_url),
        },
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `lessonforge.toml` in the current directory
/// 2. `~/.config/lessonforge/config.toml`
///
/// Environment variable overrides: `OPENAI_API_KEY` / `LESSONFORGE_OPENAI_KEY`
/// (the latter wins) and `LESSONFORGE_ANTHROPIC_KEY`.
pub fn load_config() -> Result<LessonforgeConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<LessonforgeConfig> {
    let config_path = match path {
        Some(p) if p.exists() => Some(p.to_path_buf()),
        Some(p) => anyhow::bail!("config file not found: {}", p.display()),
        None => {
            let local = PathBuf::from(CONFIG_FILE_NAME);
            if local.exists() {
                Some(local)
            } else {
                dirs_path()
                    .map(|home| home.join("config.toml"))
                    .filter(|global| global.exists())
            }
        }
    };

    let mut config = match config_path {
        Some(path) => {
            tracing::debug!("loading config from {}", path.display());
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<LessonforgeConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => LessonforgeConfig::default(),
    };

    apply_env_overrides(&mut config);

    config.providers = config
        .providers
        .iter()
        .map(|(k, v)| (k.clone(), resolve_provider_config(v)))
        .collect();

    Ok(config)
}

fn apply_env_overrides(config: &mut LessonforgeConfig) {
    let openai_key = std::env::var("LESSONFORGE_OPENAI_KEY")
        .or_else(|_| std::env::var("OPENAI_API_KEY"))
        .ok();
    if let Some(key) = openai_key {
        let entry = config
            .providers
            .entry("openai".into())
            .or_insert(ProviderConfig::OpenAI {
                api_key: String::new(),
                base_url: None,
                org_id: None,
            });
        if let ProviderConfig::OpenAI { api_key, .. } = entry {
            *api_key = key;
        }
    }

    if let Ok(key) = std::env::var("LESSONFORGE_ANTHROPIC_KEY") {
        let entry = config
            .providers
            .entry("anthropic".into())
            .or_insert(ProviderConfig::Anthropic {
                api_key: String::new(),
                base_url: None,
            });
        if let ProviderConfig::Anthropic { api_key, .. } = entry {
            *api_key = key;
        }
    }
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("lessonforge"))
}

/// Create a provider instance from its configuration.
pub fn create_provider(name: &str, config: &ProviderConfig) -> Result<Box<dyn LlmProvider>> {
    let provider: Box<dyn LlmProvider> = match config {
        ProviderConfig::Anthropic { api_key, base_url } => {
            Box::new(AnthropicProvider::new(api_key, base_url.clone())?)
        }
        ProviderConfig::OpenAI {
            api_key,
            base_url,
            org_id,
        } => Box::new(OpenAiProvider::new(
            api_key,
            base_url.clone(),
            org_id.clone(),
        )?),
        ProviderConfig::Ollama { base_url } => Box::new(OllamaProvider::new(base_url)?),
    };
    tracing::debug!(provider = name, "created provider");
    Ok(provider)
}

/// Look up a provider by name.
///
/// `mock` always resolves to the offline sample provider, and `ollama` falls
/// back to the local default URL when it has no entry.
pub fn provider_by_name(config: &LessonforgeConfig, name: &str) -> Result<Box<dyn LlmProvider>> {
    if name == "mock" {
        return Ok(Box::new(MockProvider::sample()));
    }
    match config.providers.get(name) {
        Some(provider_config) => {
            if let ProviderConfig::OpenAI { api_key, .. }
            | ProviderConfig::Anthropic { api_key, .. } = provider_config
            {
                if api_key.trim().is_empty() {
                    anyhow::bail!("provider '{name}' has no API key configured");
                }
            }
            create_provider(name, provider_config)
        }
        None if name == "ollama" => create_provider(
            name,
            &ProviderConfig::Ollama {
                base_url: default_ollama_url(),
            },
        ),
        None => anyhow::bail!(
            "provider '{name}' is not configured; set OPENAI_API_KEY or add it to {CONFIG_FILE_NAME}"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_env_vars_basic() {
        std::env::set_var("_LESSONFORGE_TEST_VAR", "hello");
        assert_eq!(resolve_env_vars("${_LESSONFORGE_TEST_VAR}"), "hello");
        assert_eq!(
            resolve_env_vars("prefix_${_LESSONFORGE_TEST_VAR}_suffix"),
            "prefix_hello_suffix"
        );
        assert_eq!(resolve_env_vars("${_LESSONFORGE_UNSET_VAR}"), "");
        assert_eq!(resolve_env_vars("no ${close"), "no ${close");
        std::env::remove_var("_LESSONFORGE_TEST_VAR");
    }

    #[test]
    fn default_config() {
        let config = LessonforgeConfig::default();
        assert_eq!(config.default_provider, "openai");
        assert_eq!(config.default_model, "gpt-4.1-mini");
        assert_eq!(config.max_questions, 50);
        assert_eq!(config.server.bind, "127.0.0.1:3000");
    }

    #[test]
    fn parse_full_config() {
        let toml_str = r#"
default_provider = "anthropic"
default_model = "claude-sonnet-4-20250514"
temperature = 0.2
request_timeout_secs = 30
max_questions = 10

[providers.anthropic]
type = "anthropic"
api_key = "sk-test"

[providers.openai]
type = "openai"
api_key = "sk-openai"

[providers.ollama]
type = "ollama"

[server]
bind = "0.0.0.0:8080"
"#;
        let config: LessonforgeConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.providers.len(), 3);
        assert!(matches!(
            config.providers.get("ollama"),
            Some(ProviderConfig::Ollama { base_url }) if base_url == "http://localhost:11434"
        ));
        assert_eq!(config.server.bind, "0.0.0.0:8080");
        assert_eq!(config.max_tokens, 4096);

        let client = config.client_config(None);
        assert_eq!(client.model, "claude-sonnet-4-20250514");
        assert_eq!(client.deadline, Some(Duration::from_secs(30)));
        assert_eq!(config.client_config(Some("other")).model, "other");
        assert_eq!(config.service_config().max_questions, 10);
    }

    #[test]
    fn zero_timeout_disables_deadline() {
        let config = LessonforgeConfig {
            request_timeout_secs: 0,
            ..Default::default()
        };
        assert!(config.client_config(None).deadline.is_none());
    }

    #[test]
    fn debug_masks_api_keys() {
        let config = ProviderConfig::OpenAI {
            api_key: "sk-secret".into(),
            base_url: None,
            org_id: None,
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("***"));
    }

    #[test]
    fn load_from_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(
            &path,
            "max_questions = 5\n[providers.local]\ntype = \"ollama\"\nbase_url = \"http://gpu:11434\"\n",
        )
        .unwrap();

        let config = load_config_from(Some(&path)).unwrap();
        assert_eq!(config.max_questions, 5);
        assert!(config.providers.contains_key("local"));

        let missing = load_config_from(Some(&dir.path().join("nope.toml")));
        assert!(missing.is_err());
    }

    #[test]
    fn provider_lookup() {
        let mut config = LessonforgeConfig::default();
        assert_eq!(provider_by_name(&config, "mock").unwrap().name(), "mock");
        assert_eq!(provider_by_name(&config, "ollama").unwrap().name(), "ollama");
        assert!(provider_by_name(&config, "nowhere").is_err());

        config.providers.insert(
            "openai".into(),
            ProviderConfig::OpenAI {
                api_key: "  ".into(),
                base_url: None,
                org_id: None,
            },
        );
        let err = provider_by_name(&config, "openai").err().unwrap();
        assert!(err.to_string().contains("no API key"));
    }
}
