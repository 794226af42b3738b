pub mod analyze;
pub mod content;
pub mod export;
pub mod init;
pub mod list_models;
pub mod module;
pub mod questions;
pub mod serve;

use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};

use lessonforge_core::client::GenerationClient;
use lessonforge_core::model::{QuestionFlags, QuestionSpec};
use lessonforge_core::service::LessonService;
use lessonforge_providers::config::{load_config_from, provider_by_name, LessonforgeConfig};

use crate::{ProviderArgs, QuestionArgs};

/// Load the config and wire the selected provider into a service.
pub(crate) fn build_service(args: &ProviderArgs) -> Result<(LessonforgeConfig, LessonService)> {
    let config = load_config_from(args.config.as_deref())?;
    let name = args
        .provider
        .clone()
        .unwrap_or_else(|| config.default_provider.clone());
    let provider = provider_by_name(&config, &name)?;

    let model = match (&args.model, name.as_str()) {
        (Some(model), _) => model.clone(),
        (None, "mock") => "mock-model".to_string(),
        (None, _) => config.default_model.clone(),
    };
    tracing::debug!(provider = %name, model = %model, "using provider");

    let client = GenerationClient::new(Arc::from(provider), config.client_config(Some(&model)));
    let service = LessonService::new(client, config.service_config());
    Ok((config, service))
}

/// Read a content file, or stdin for `-`.
pub(crate) fn read_content(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read content from stdin")?;
        return Ok(buf);
    }
    std::fs::read_to_string(path)
        .with_context(|| format!("failed to read content from {}", path.display()))
}

pub(crate) fn question_spec(args: &QuestionArgs, count: u32) -> QuestionSpec {
    QuestionSpec::new(args.question_type, args.difficulty, count).with_flags(QuestionFlags {
        include_explanations: args.explanations,
        include_tags: args.tags,
        time_estimates: args.time_estimates,
    })
}

/// Write `text` to `output`, or print it.
pub(crate) fn emit(text: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, text)
                .with_context(|| format!("failed to write {}", path.display()))?;
            eprintln!("Wrote {}", path.display());
        }
        None => println!("{text}"),
    }
    Ok(())
}
