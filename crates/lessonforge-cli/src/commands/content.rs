//! The `lessonforge content` command.

use std::path::PathBuf;

use anyhow::Result;

use lessonforge_core::model::{ComplexityLevel, ContentRequest};

use crate::ProviderArgs;

pub async fn execute(
    topic: String,
    subtopic: String,
    audience: Option<String>,
    complexity: Option<ComplexityLevel>,
    output: Option<PathBuf>,
    provider: ProviderArgs,
) -> Result<()> {
    let (_, service) = super::build_service(&provider)?;
    let request = ContentRequest {
        topic,
        subtopic,
        target_audience: audience,
        content_complexity: complexity,
    };

    let content = service.generate_content(&request).await?;
    super::emit(&content, output.as_deref())
}
