//! The `lessonforge analyze` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use crate::ProviderArgs;

pub async fn execute(content_file: PathBuf, json: bool, provider: ProviderArgs) -> Result<()> {
    let content = super::read_content(&content_file)?;
    let (_, service) = super::build_service(&provider)?;

    let analytics = service.analyze_content(&content).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&analytics)?);
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Metric", "Value"]);
    table.add_row(vec![Cell::new("Words"), Cell::new(analytics.word_count)]);
    table.add_row(vec![
        Cell::new("Reading time"),
        Cell::new(format!("{} min", analytics.estimated_reading_time_minutes)),
    ]);
    table.add_row(vec![
        Cell::new("Readability"),
        Cell::new(format!("{:.0}/100", analytics.readability_score)),
    ]);
    if let Some(relevance) = analytics.topic_relevance_score {
        table.add_row(vec![
            Cell::new("Topic relevance"),
            Cell::new(format!("{relevance:.0}/100")),
        ]);
    }
    table.add_row(vec![
        Cell::new("Complexity"),
        Cell::new(analytics.complexity_level),
    ]);
    table.add_row(vec![
        Cell::new("Key terms"),
        Cell::new(analytics.key_terms.join(", ")),
    ]);
    if let Some(tags) = &analytics.suggested_tags {
        table.add_row(vec![Cell::new("Suggested tags"), Cell::new(tags.join(", "))]);
    }
    println!("{table}");

    Ok(())
}
