//! lessonforge-export — render course modules and question sets.
//!
//! Markdown and self-contained HTML, plus a pretty-JSON passthrough. Answers
//! can be shown inline, collected in a trailing answer key, or left out.

pub mod html;
pub mod markdown;

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use lessonforge_core::course::CourseModule;
use lessonforge_core::model::{Question, QuestionBody};

pub use html::generate_html;
pub use markdown::generate_markdown;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Markdown,
    Html,
    Json,
}

impl ExportFormat {
    /// File extension without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Markdown => "md",
            ExportFormat::Html => "html",
            ExportFormat::Json => "json",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportFormat::Markdown => write!(f, "markdown"),
            ExportFormat::Html => write!(f, "html"),
            ExportFormat::Json => write!(f, "json"),
        }
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "markdown" | "md" => Ok(ExportFormat::Markdown),
            "html" => Ok(ExportFormat::Html),
            "json" => Ok(ExportFormat::Json),
            other => Err(format!("unknown export format: {other}")),
        }
    }
}

/// What an export contains.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportSettings {
    pub format: ExportFormat,
    pub include_answers: bool,
    pub include_explanations: bool,
    /// Collect answers at the end instead of after each question.
    pub separate_answer_key: bool,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            format: ExportFormat::Markdown,
            include_answers: true,
            include_explanations: true,
            separate_answer_key: false,
        }
    }
}

impl ExportSettings {
    fn inline_answers(&self) -> bool {
        self.include_answers && !self.separate_answer_key
    }

    fn answer_key(&self) -> bool {
        self.include_answers && self.separate_answer_key
    }
}

/// Render a module in the format named by `settings`.
pub fn render(module: &CourseModule, settings: &ExportSettings) -> Result<String> {
    match settings.format {
        ExportFormat::Markdown => Ok(generate_markdown(module, settings)),
        ExportFormat::Html => Ok(generate_html(module, settings)),
        ExportFormat::Json => {
            serde_json::to_string_pretty(module).context("failed to serialize module")
        }
    }
}

/// Render a module and write it to `path`.
pub fn write_export(module: &CourseModule, settings: &ExportSettings, path: &Path) -> Result<()> {
    let rendered = render(module, settings)?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, rendered)
        .with_context(|| format!("failed to write export to {}", path.display()))?;
    Ok(())
}

/// `0 → 'A'`, `1 → 'B'`, ...
pub(crate) fn option_letter(index: usize) -> char {
    char::from(b'A' + (index % 26) as u8)
}

/// One-line statement of the correct answer.
pub(crate) fn answer_text(question: &Question) -> String {
    match &question.body {
        QuestionBody::SingleChoice {
            options,
            correct_answer,
        } => match options.iter().position(|o| o == correct_answer) {
            Some(i) => format!("{}. {}", option_letter(i), correct_answer),
            None => correct_answer.clone(),
        },
        QuestionBody::MultipleChoice {
            options,
            correct_answers,
        } => options
            .iter()
            .enumerate()
            .filter(|(_, o)| correct_answers.contains(o))
            .map(|(i, o)| format!("{}. {}", option_letter(i), o))
            .collect::<Vec<_>>()
            .join(", "),
        QuestionBody::MatchingPairs {
            column_a,
            column_b,
            correct_pairs,
        } => correct_pairs
            .iter()
            .filter_map(|[a, b]| Some(format!("{} → {}", column_a.get(*a)?, column_b.get(*b)?)))
            .collect::<Vec<_>>()
            .join("; "),
        QuestionBody::TrueFalse { is_true, .. } => {
            let answer = if *is_true { "True" } else { "False" };
            answer.to_string()
        }
        QuestionBody::FillInBlank { answers, .. } => answers
            .iter()
            .enumerate()
            .map(|(i, accepted)| format!("({}) {}", i + 1, accepted.join(" / ")))
            .collect::<Vec<_>>()
            .join("; "),
        QuestionBody::Essay { sample_answer, .. } => sample_answer
            .clone()
            .unwrap_or_else(|| "Open response, graded by rubric".to_string()),
    }
}
