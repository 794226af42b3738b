//! Markdown export.

use lessonforge_core::course::{CourseModule, Lesson};
use lessonforge_core::model::{ContentAnalytics, Question, QuestionBody};

use crate::{answer_text, option_letter, ExportSettings};

/// Render a whole module: header, then each lesson's content, analytics and
/// questions, then the answer key if one was asked for.
pub fn generate_markdown(module: &CourseModule, settings: &ExportSettings) -> String {
    let mut md = String::new();

    md.push_str(&format!("# {}\n\n", module.title));
    if !module.description.is_empty() {
        md.push_str(&format!("{}\n\n", module.description));
    }
    md.push_str(&format!(
        "_{} lessons | updated {}_\n\n",
        module.lessons.len(),
        module.updated_at.format("%Y-%m-%d")
    ));

    for lesson in &module.lessons {
        push_lesson(&mut md, lesson, settings);
    }

    if settings.answer_key() {
        md.push_str("---\n\n## Answer key\n\n");
        for lesson in &module.lessons {
            let Some(questions) = lesson.questions.as_ref().filter(|q| !q.is_empty()) else {
                continue;
            };
            md.push_str(&format!("### {}\n\n", lesson.title));
            push_answer_key(&mut md, questions, settings);
        }
    }

    md
}

/// Render a bare question list, e.g. straight from `lessonforge questions`.
pub fn questions_markdown(title: &str, questions: &[Question], settings: &ExportSettings) -> String {
    let mut md = format!("# {title}\n\n");
    for (i, q) in questions.iter().enumerate() {
        push_question(&mut md, i + 1, q, settings);
    }
    if settings.answer_key() && !questions.is_empty() {
        md.push_str("---\n\n## Answer key\n\n");
        push_answer_key(&mut md, questions, settings);
    }
    md
}

fn push_lesson(md: &mut String, lesson: &Lesson, settings: &ExportSettings) {
    md.push_str(&format!("## {}. {}\n\n", lesson.order + 1, lesson.title));
    if let Some(analytics) = &lesson.analytics {
        push_analytics(md, analytics);
    }

    // Lesson text keeps its own headings, shifted below the lesson heading.
    for line in lesson.content.trim().lines() {
        if line.starts_with('#') {
            md.push_str("##");
        }
        md.push_str(line);
        md.push('\n');
    }
    md.push('\n');

    if let Some(questions) = lesson.questions.as_ref().filter(|q| !q.is_empty()) {
        md.push_str("### Questions\n\n");
        for (i, q) in questions.iter().enumerate() {
            push_question(md, i + 1, q, settings);
        }
    }
}

fn push_analytics(md: &mut String, analytics: &ContentAnalytics) {
    md.push_str(&format!(
        "> {} words, {} min read, readability {:.0}/100, {} level\n",
        analytics.word_count,
        analytics.estimated_reading_time_minutes,
        analytics.readability_score,
        analytics.complexity_level
    ));
    if !analytics.key_terms.is_empty() {
        md.push_str(&format!("> Key terms: {}\n", analytics.key_terms.join(", ")));
    }
    md.push('\n');
}

fn push_question(md: &mut String, number: usize, q: &Question, settings: &ExportSettings) {
    md.push_str(&format!(
        "**{number}. {}** _({}, {})_\n\n",
        q.question,
        q.question_type(),
        q.difficulty
    ));

    match &q.body {
        QuestionBody::SingleChoice { options, .. } | QuestionBody::MultipleChoice { options, .. } => {
            for (i, option) in options.iter().enumerate() {
                md.push_str(&format!("- {}. {}\n", option_letter(i), option));
            }
            md.push('\n');
        }
        QuestionBody::MatchingPairs {
            column_a, column_b, ..
        } => {
            md.push_str("| # | Column A | | Column B |\n|---|---|---|---|\n");
            for i in 0..column_a.len().max(column_b.len()) {
                md.push_str(&format!(
                    "| {} | {} | {} | {} |\n",
                    i + 1,
                    column_a.get(i).map(|a| table_cell(a)).unwrap_or_default(),
                    option_letter(i),
                    column_b.get(i).map(|b| table_cell(b)).unwrap_or_default()
                ));
            }
            md.push('\n');
        }
        QuestionBody::TrueFalse { statement, .. } => {
            if statement != &q.question {
                md.push_str(&format!("{statement}\n\n"));
            }
            md.push_str("- True\n- False\n\n");
        }
        QuestionBody::FillInBlank {
            text_with_blanks, ..
        } => md.push_str(&format!("{}\n\n", text_with_blanks.replace("___", "\\_\\_\\_"))),
        QuestionBody::Essay {
            prompt,
            word_limit,
            rubric,
            ..
        } => {
            md.push_str(&format!("{prompt}\n\n"));
            if let Some(limit) = word_limit {
                md.push_str(&format!("_Word limit: {limit}_\n\n"));
            }
            if let Some(rubric) = rubric.as_ref().filter(|r| !r.is_empty()) {
                md.push_str("| Criteria | Weight | Excellent | Good | Satisfactory | Needs improvement |\n");
                md.push_str("|---|---|---|---|---|---|\n");
                for item in rubric {
                    md.push_str(&format!(
                        "| {} | {}% | {} | {} | {} | {} |\n",
                        table_cell(&item.criteria),
                        item.weight,
                        table_cell(&item.descriptions.excellent),
                        table_cell(&item.descriptions.good),
                        table_cell(&item.descriptions.satisfactory),
                        table_cell(&item.descriptions.needs_improvement)
                    ));
                }
                md.push('\n');
            }
        }
    }

    if settings.inline_answers() {
        md.push_str(&format!("**Answer:** {}\n\n", answer_text(q)));
        if settings.include_explanations {
            if let Some(explanation) = &q.explanation {
                md.push_str(&format!("_Explanation:_ {explanation}\n\n"));
            }
        }
    }
}

/// Escape text for a single Markdown table cell.
fn table_cell(text: &str) -> String {
    text.replace('|', "\\|").replace(['\r', '\n'], " ")
}

fn push_answer_key(md: &mut String, questions: &[Question], settings: &ExportSettings) {
    for (i, q) in questions.iter().enumerate() {
        md.push_str(&format!("{}. {}\n", i + 1, answer_text(q)));
        if settings.include_explanations {
            if let Some(explanation) = &q.explanation {
                md.push_str(&format!("   _{explanation}_\n"));
            }
        }
    }
    md.push('\n');
}
