//! HTML export.
//!
//! Produces a self-contained HTML file with all CSS inlined. Every piece of
//! module text is escaped; lesson content is shown as preformatted text.

use lessonforge_core::course::{CourseModule, Lesson};
use lessonforge_core::model::{ContentAnalytics, Question, QuestionBody};

use crate::{answer_text, option_letter, ExportSettings};

/// Escape a string for safe HTML insertion.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Generate an HTML document for a course module.
pub fn generate_html(module: &CourseModule, settings: &ExportSettings) -> String {
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!("<title>{}</title>\n", html_escape(&module.title)));
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");

    html.push_str("<header>\n");
    html.push_str(&format!("<h1>{}</h1>\n", html_escape(&module.title)));
    if !module.description.is_empty() {
        html.push_str(&format!("<p>{}</p>\n", html_escape(&module.description)));
    }
    html.push_str(&format!(
        "<p class=\"meta\">{} lessons | {} questions | updated {}</p>\n",
        module.lessons.len(),
        module.questions().count(),
        module.updated_at.format("%Y-%m-%d %H:%M UTC")
    ));
    html.push_str("</header>\n");

    if module.lessons.len() > 1 {
        html.push_str("<nav>\n<ol>\n");
        for lesson in &module.lessons {
            html.push_str(&format!(
                "<li><a href=\"#lesson-{}\">{}</a></li>\n",
                lesson.order + 1,
                html_escape(&lesson.title)
            ));
        }
        html.push_str("</ol>\n</nav>\n");
    }

    for lesson in &module.lessons {
        push_lesson(&mut html, lesson, settings);
    }

    if settings.answer_key() {
        html.push_str("<section class=\"answer-key\">\n<h2>Answer key</h2>\n");
        for lesson in &module.lessons {
            let Some(questions) = lesson.questions.as_ref().filter(|q| !q.is_empty()) else {
                continue;
            };
            html.push_str(&format!("<h3>{}</h3>\n", html_escape(&lesson.title)));
            push_answer_key(&mut html, questions, settings);
        }
        html.push_str("</section>\n");
    }

    html.push_str("</body>\n</html>");
    html
}

fn push_lesson(html: &mut String, lesson: &Lesson, settings: &ExportSettings) {
    html.push_str(&format!(
        "<section class=\"lesson\" id=\"lesson-{}\">\n<h2>{}. {}</h2>\n",
        lesson.order + 1,
        lesson.order + 1,
        html_escape(&lesson.title)
    ));
    if let Some(analytics) = &lesson.analytics {
        push_analytics(html, analytics);
    }
    html.push_str(&format!(
        "<pre class=\"content\">{}</pre>\n",
        html_escape(lesson.content.trim())
    ));

    if let Some(questions) = lesson.questions.as_ref().filter(|q| !q.is_empty()) {
        html.push_str("<h3>Questions</h3>\n<ol class=\"questions\">\n");
        for q in questions {
            push_question(html, q, settings);
        }
        html.push_str("</ol>\n");
    }
    html.push_str("</section>\n");
}

fn push_analytics(html: &mut String, analytics: &ContentAnalytics) {
    html.push_str("<table class=\"analytics\">\n<tbody>\n");
    html.push_str(&format!(
        "<tr><th>Words</th><td>{}</td><th>Reading time</th><td>{} min</td></tr>\n",
        analytics.word_count, analytics.estimated_reading_time_minutes
    ));
    html.push_str(&format!(
        "<tr><th>Readability</th><td>{:.0}/100</td><th>Level</th><td>{}</td></tr>\n",
        analytics.readability_score, analytics.complexity_level
    ));
    html.push_str("</tbody></table>\n");
    if !analytics.key_terms.is_empty() {
        html.push_str("<p class=\"terms\">");
        for term in &analytics.key_terms {
            html.push_str(&format!("<span class=\"tag\">{}</span>", html_escape(term)));
        }
        html.push_str("</p>\n");
    }
}

fn push_question(html: &mut String, q: &Question, settings: &ExportSettings) {
    html.push_str(&format!(
        "<li class=\"question {}\">\n<p><strong>{}</strong> <span class=\"meta\">{}, {}</span></p>\n",
        q.question_type(),
        html_escape(&q.question),
        q.question_type(),
        q.difficulty
    ));

    match &q.body {
        QuestionBody::SingleChoice { options, .. } | QuestionBody::MultipleChoice { options, .. } => {
            html.push_str("<ol type=\"A\">\n");
            for option in options {
                html.push_str(&format!("<li>{}</li>\n", html_escape(option)));
            }
            html.push_str("</ol>\n");
        }
        QuestionBody::MatchingPairs {
            column_a, column_b, ..
        } => {
            html.push_str("<table class=\"matching\">\n<thead><tr><th>#</th><th>Column A</th><th></th><th>Column B</th></tr></thead>\n<tbody>\n");
            for i in 0..column_a.len().max(column_b.len()) {
                html.push_str(&format!(
                    "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
                    i + 1,
                    html_escape(column_a.get(i).map(String::as_str).unwrap_or("")),
                    option_letter(i),
                    html_escape(column_b.get(i).map(String::as_str).unwrap_or(""))
                ));
            }
            html.push_str("</tbody></table>\n");
        }
        QuestionBody::TrueFalse { statement, .. } => {
            if statement != &q.question {
                html.push_str(&format!("<p>{}</p>\n", html_escape(statement)));
            }
            html.push_str("<p class=\"choices\">True / False</p>\n");
        }
        QuestionBody::FillInBlank {
            text_with_blanks, ..
        } => {
            let text = html_escape(text_with_blanks)
                .replace("___", "<span class=\"blank\"></span>");
            html.push_str(&format!("<p>{text}</p>\n"));
        }
        QuestionBody::Essay {
            prompt,
            word_limit,
            rubric,
            ..
        } => {
            html.push_str(&format!("<p>{}</p>\n", html_escape(prompt)));
            if let Some(limit) = word_limit {
                html.push_str(&format!("<p class=\"meta\">Word limit: {limit}</p>\n"));
            }
            if let Some(rubric) = rubric.as_ref().filter(|r| !r.is_empty()) {
                html.push_str("<table class=\"rubric\">\n<thead><tr><th>Criteria</th><th>Weight</th><th>Excellent</th><th>Good</th><th>Satisfactory</th><th>Needs improvement</th></tr></thead>\n<tbody>\n");
                for item in rubric {
                    html.push_str(&format!(
                        "<tr><td>{}</td><td>{}%</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
                        html_escape(&item.criteria),
                        item.weight,
                        html_escape(&item.descriptions.excellent),
                        html_escape(&item.descriptions.good),
                        html_escape(&item.descriptions.satisfactory),
                        html_escape(&item.descriptions.needs_improvement)
                    ));
                }
                html.push_str("</tbody></table>\n");
            }
        }
    }

    if settings.inline_answers() {
        html.push_str("<details class=\"answer\">\n<summary>Answer</summary>\n");
        html.push_str(&format!("<p>{}</p>\n", html_escape(&answer_text(q))));
        if settings.include_explanations {
            if let Some(explanation) = &q.explanation {
                html.push_str(&format!(
                    "<p class=\"explanation\">{}</p>\n",
                    html_escape(explanation)
                ));
            }
        }
        html.push_str("</details>\n");
    }
    html.push_str("</li>\n");
}

fn push_answer_key(html: &mut String, questions: &[Question], settings: &ExportSettings) {
    html.push_str("<ol>\n");
    for q in questions {
        html.push_str(&format!("<li>{}", html_escape(&answer_text(q))));
        if settings.include_explanations {
            if let Some(explanation) = &q.explanation {
                html.push_str(&format!(
                    "<br><span class=\"explanation\">{}</span>",
                    html_escape(explanation)
                ));
            }
        }
        html.push_str("</li>\n");
    }
    html.push_str("</ol>\n");
}

const CSS: &str = r#"
:root { --bg: #fff; --fg: #1a1a1a; --border: #e5e7eb; --accent: #dbeafe; --muted: #6b7280; }
@media (prefers-color-scheme: dark) {
  :root { --bg: #111827; --fg: #f9fafb; --border: #374151; --accent: #1e3a8a; --muted: #9ca3af; }
}
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; margin: 0 auto; max-width: 60rem; padding: 2rem; background: var(--bg); color: var(--fg); line-height: 1.5; }
h1, h2 { margin-top: 2rem; }
.meta { color: var(--muted); font-size: 0.9rem; }
table { border-collapse: collapse; width: 100%; margin: 1rem 0; }
th, td { border: 1px solid var(--border); padding: 0.4rem 0.8rem; text-align: left; }
th { background: var(--border); }
pre.content { white-space: pre-wrap; font-family: inherit; padding: 1rem; border-left: 4px solid var(--accent); }
.tag { display: inline-block; background: var(--accent); border-radius: 999px; padding: 0 0.6rem; margin-right: 0.4rem; font-size: 0.85rem; }
.questions > li { margin-bottom: 1.5rem; }
.blank { display: inline-block; min-width: 5rem; border-bottom: 1px solid var(--fg); }
details.answer { margin: 0.5rem 0; }
summary { cursor: pointer; font-weight: bold; }
.explanation { color: var(--muted); font-style: italic; }
.answer-key { border-top: 2px solid var(--border); margin-top: 3rem; }
@media print { details.answer { display: none; } }
"#;
