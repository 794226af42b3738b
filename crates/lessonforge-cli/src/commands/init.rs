//! The `lessonforge init` command.

use std::path::Path;

use anyhow::Result;

use lessonforge_providers::config::CONFIG_FILE_NAME;

pub fn execute() -> Result<()> {
    if Path::new(CONFIG_FILE_NAME).exists() {
        println!("{CONFIG_FILE_NAME} already exists, skipping.");
    } else {
        std::fs::write(CONFIG_FILE_NAME, SAMPLE_CONFIG)?;
        println!("Created {CONFIG_FILE_NAME}");
    }

    println!("\nNext steps:");
    println!("  1. Export OPENAI_API_KEY (or edit {CONFIG_FILE_NAME})");
    println!("  2. Run: lessonforge module new --title \"My course\" --output course.json");
    println!("  3. Run: lessonforge module add-lesson --module course.json --topic Biology --subtopic Cells --analyze --questions 5");
    println!("  4. Run: lessonforge export --module course.json --format html");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# lessonforge configuration

default_provider = "openai"
default_model = "gpt-4.1-mini"
temperature = 0.7
max_tokens = 4096
request_timeout_secs = 120
max_questions = 50

[server]
bind = "127.0.0.1:3000"

[providers.openai]
type = "openai"
api_key = "${OPENAI_API_KEY}"

[providers.anthropic]
type = "anthropic"
api_key = "${ANTHROPIC_API_KEY}"

[providers.ollama]
type = "ollama"
base_url = "http://localhost:11434"
"#;
