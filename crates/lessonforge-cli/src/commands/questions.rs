//! The `lessonforge questions` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use lessonforge_core::statistics::question_stats;
use lessonforge_export::markdown::questions_markdown;
use lessonforge_export::{ExportFormat, ExportSettings};

use crate::{ProviderArgs, QuestionArgs};

pub async fn execute(
    content_file: PathBuf,
    count: u32,
    spec_args: QuestionArgs,
    format: ExportFormat,
    output: Option<PathBuf>,
    provider: ProviderArgs,
) -> Result<()> {
    let content = super::read_content(&content_file)?;
    let spec = super::question_spec(&spec_args, count);
    let (_, service) = super::build_service(&provider)?;

    let questions = service.generate_questions(&content, &spec).await?;

    let rendered = match format {
        ExportFormat::Json => {
            serde_json::to_string_pretty(&serde_json::json!({ "questions": questions }))?
        }
        ExportFormat::Markdown => {
            questions_markdown("Questions", &questions, &ExportSettings::default())
        }
        ExportFormat::Html => anyhow::bail!("html output is only available through `export`"),
    };
    super::emit(&rendered, output.as_deref())?;

    let stats = question_stats(&questions);
    let mut table = Table::new();
    table.set_header(vec!["Type", "Difficulty", "Questions", "Est. time"]);
    table.add_row(vec![
        Cell::new(spec.question_type),
        Cell::new(spec.difficulty),
        Cell::new(stats.total),
        Cell::new(if stats.total_estimated_seconds > 0 {
            format!("{}s", stats.total_estimated_seconds)
        } else {
            "-".to_string()
        }),
    ]);
    eprintln!("{table}");

    Ok(())
}
