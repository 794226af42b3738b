//! The `lessonforge list-models` command.

use std::path::PathBuf;

use anyhow::Result;

use lessonforge_core::traits::{LlmProvider, ModelInfo};
use lessonforge_providers::config::load_config_from;
use lessonforge_providers::create_provider;
use lessonforge_providers::mock::MockProvider;
use lessonforge_providers::ollama::OllamaProvider;
use lessonforge_providers::ProviderConfig;

pub async fn execute(provider_filter: Option<String>, config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;

    let mut names: Vec<&String> = config.providers.keys().collect();
    names.sort();

    let mut found_any = false;
    for name in names {
        if provider_filter.as_ref().is_some_and(|f| f != name) {
            continue;
        }

        let models = match &config.providers[name] {
            ProviderConfig::Ollama { base_url } => {
                match OllamaProvider::new(base_url)?.list_models_async().await {
                    Ok(models) => models,
                    Err(e) => {
                        tracing::warn!("{name}: {e:#}");
                        continue;
                    }
                }
            }
            provider_config => create_provider(name, provider_config)?.available_models(),
        };

        if !models.is_empty() {
            found_any = true;
            print_models(name, &models);
        }
    }

    if provider_filter.as_deref() == Some("mock") {
        found_any = true;
        print_models("mock", &MockProvider::new(Vec::new()).available_models());
    }

    if !found_any {
        println!("No providers configured. Run `lessonforge init` to create a config file.");
    }

    Ok(())
}

fn print_models(provider: &str, models: &[ModelInfo]) {
    println!("Provider: {provider}");
    for model in models {
        if model.max_context > 0 {
            println!(
                "  {} ({}, {}K context, ${:.4}/{:.4} per 1K tokens)",
                model.id,
                model.name,
                model.max_context / 1000,
                model.cost_per_1k_input,
                model.cost_per_1k_output,
            );
        } else {
            println!("  {}", model.id);
        }
    }
    println!();
}
