//! Normalization of upstream replies into typed records.
//!
//! Model output is untrusted. Each question entry goes through a default
//! table (identifier, type, difficulty, question text, flagged extras) on the
//! raw JSON object, is deserialized into its variant, and is then checked
//! against the structural invariants of that variant. Any bad entry fails the
//! whole reply with a `QuizError::Validation` that lists every offender.

use std::collections::HashSet;

use serde_json::{Map, Value};
use uuid::Uuid;

use crate::error::{QuizError, QuizResult, ValidationIssue};
use crate::model::{
    ComplexityLevel, ContentAnalytics, Difficulty, Question, QuestionBody, QuestionFlags,
    QuestionSpec, QuestionType,
};
use crate::traits::extract_json_payload;

/// Average adult reading speed.
pub const READING_SPEED_WPM: usize = 250;

/// Readability used when the model omits one.
pub const DEFAULT_READABILITY: f64 = 50.0;

/// Number of options single- and multiple-choice questions must carry.
pub const CHOICE_OPTION_COUNT: usize = 4;

/// Parse a reply as JSON, tolerating a surrounding markdown fence.
pub fn parse_reply(raw: &str) -> QuizResult<Value> {
    let payload = extract_json_payload(raw);
    serde_json::from_str(&payload).map_err(|e| QuizError::MalformedResponse(e.to_string()))
}

/// Turn a question-generation reply into typed questions.
///
/// The output has exactly as many entries as the reply; it is never padded
/// or truncated to `spec.count`.
pub fn normalize_questions(spec: &QuestionSpec, raw: &str) -> QuizResult<Vec<Question>> {
    let entries = question_entries(parse_reply(raw)?)?;

    let mut questions = Vec::with_capacity(entries.len());
    let mut issues = Vec::new();
    let mut seen_ids = HashSet::new();

    for (index, entry) in entries.into_iter().enumerate() {
        let Value::Object(mut fields) = entry else {
            issues.push(ValidationIssue {
                index,
                message: "entry is not a JSON object".into(),
            });
            continue;
        };

        apply_defaults(&mut fields, spec);
        if let Some(Value::String(id)) = fields.get("id") {
            if !seen_ids.insert(id.clone()) {
                let fresh = Uuid::new_v4().to_string();
                tracing::debug!("entry {index} repeats id {id}, assigning {fresh}");
                seen_ids.insert(fresh.clone());
                fields.insert("id".into(), Value::String(fresh));
            }
        }

        match serde_json::from_value::<Question>(Value::Object(fields)) {
            Ok(question) => match check_structure(&question) {
                Ok(()) => questions.push(question),
                Err(message) => issues.push(ValidationIssue { index, message }),
            },
            Err(e) => issues.push(ValidationIssue {
                index,
                message: format!("does not match {}: {e}", spec.question_type),
            }),
        }
    }

    if !issues.is_empty() {
        tracing::warn!(
            count = issues.len(),
            question_type = %spec.question_type,
            "reply contained structurally invalid questions"
        );
        return Err(QuizError::Validation { issues });
    }

    if questions.len() != spec.count as usize {
        tracing::debug!(
            "reply supplied {} questions, {} requested",
            questions.len(),
            spec.count
        );
    }

    Ok(questions)
}

fn question_entries(value: Value) -> QuizResult<Vec<Value>> {
    match value {
        Value::Array(items) => Ok(items),
        Value::Object(mut obj) => match obj.remove("questions") {
            Some(Value::Array(items)) => Ok(items),
            Some(_) => Err(QuizError::MalformedResponse(
                "\"questions\" is not an array".into(),
            )),
            None => Err(QuizError::MalformedResponse(
                "reply has no \"questions\" array".into(),
            )),
        },
        _ => Err(QuizError::MalformedResponse(
            "expected a JSON object with a \"questions\" array".into(),
        )),
    }
}

// ---------------------------------------------------------------------------
// Default table
// ---------------------------------------------------------------------------

/// What to insert when a requested optional field is absent.
#[derive(Clone, Copy)]
enum Fallback {
    None,
    EmptyList,
    Zero,
}

/// An optional field that is kept only when its flag is set.
struct FlaggedField {
    name: &'static str,
    enabled: fn(&QuestionFlags) -> bool,
    fallback: Fallback,
}

const FLAGGED_FIELDS: [FlaggedField; 3] = [
    FlaggedField {
        name: "explanation",
        enabled: explanations_enabled,
        fallback: Fallback::None,
    },
    FlaggedField {
        name: "tags",
        enabled: tags_enabled,
        fallback: Fallback::EmptyList,
    },
    FlaggedField {
        name: "estimatedTimeSeconds",
        enabled: time_enabled,
        fallback: Fallback::Zero,
    },
];

fn explanations_enabled(flags: &QuestionFlags) -> bool {
    flags.include_explanations
}

fn tags_enabled(flags: &QuestionFlags) -> bool {
    flags.include_tags
}

fn time_enabled(flags: &QuestionFlags) -> bool {
    flags.time_estimates
}

/// Field that supplies the `question` text when the model leaves it out.
fn question_text_source(question_type: QuestionType) -> Option<&'static str> {
    match question_type {
        QuestionType::TrueFalse => Some("statement"),
        QuestionType::Essay => Some("prompt"),
        QuestionType::FillInBlank => Some("textWithBlanks"),
        _ => None,
    }
}

fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(_) => false,
    }
}

fn apply_defaults(fields: &mut Map<String, Value>, spec: &QuestionSpec) {
    // The requested type always wins over whatever the model labelled it.
    fields.insert(
        "type".into(),
        Value::String(spec.question_type.as_str().into()),
    );

    if is_blank(fields.get("id")) {
        fields.insert("id".into(), Value::String(Uuid::new_v4().to_string()));
    } else if let Some(Value::Number(n)) = fields.get("id") {
        let id = n.to_string();
        fields.insert("id".into(), Value::String(id));
    }

    let difficulty = fields
        .get("difficulty")
        .and_then(Value::as_str)
        .and_then(|d| d.parse::<Difficulty>().ok())
        .unwrap_or(spec.difficulty);
    fields.insert(
        "difficulty".into(),
        Value::String(difficulty.as_str().into()),
    );

    if is_blank(fields.get("question")) {
        let text = question_text_source(spec.question_type)
            .and_then(|source| fields.get(source))
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        fields.insert("question".into(), Value::String(text));
    }

    for field in &FLAGGED_FIELDS {
        if !(field.enabled)(&spec.flags) {
            fields.remove(field.name);
            continue;
        }
        if is_blank(fields.get(field.name)) {
            match field.fallback {
                Fallback::None => {
                    fields.remove(field.name);
                }
                Fallback::EmptyList => {
                    fields.insert(field.name.into(), Value::Array(Vec::new()));
                }
                Fallback::Zero => {
                    fields.insert(field.name.into(), Value::from(0u32));
                }
            }
        }
    }

    if let Some(tags) = fields.get("tags").cloned() {
        fields.insert("tags".into(), coerce_tags(tags));
    }
    if let Some(secs) = fields.get("estimatedTimeSeconds").cloned() {
        fields.insert("estimatedTimeSeconds".into(), coerce_seconds(&secs));
    }

    if spec.question_type == QuestionType::FillInBlank {
        if let Some(answers) = fields.get("answers").cloned() {
            fields.insert("answers".into(), coerce_blank_answers(answers));
        }
    }
}

/// Accept a list of strings or a comma-separated string.
fn coerce_tags(tags: Value) -> Value {
    let list: Vec<Value> = match tags {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|t| match t {
                Value::String(s) if !s.trim().is_empty() => Some(Value::String(s.trim().into())),
                _ => None,
            })
            .collect(),
        Value::String(s) => s
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(|t| Value::String(t.into()))
            .collect(),
        _ => Vec::new(),
    };
    Value::Array(list)
}

/// Whole, non-negative seconds from a number or numeric string.
fn coerce_seconds(value: &Value) -> Value {
    let secs = match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };
    Value::from(secs.max(0.0).round().min(u32::MAX as f64) as u32)
}

/// A flat list of strings means one acceptable answer per blank.
fn coerce_blank_answers(answers: Value) -> Value {
    match answers {
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(|item| match item {
                    Value::String(s) => Value::Array(vec![Value::String(s)]),
                    other => other,
                })
                .collect(),
        ),
        other => other,
    }
}

// ---------------------------------------------------------------------------
// Structural checks
// ---------------------------------------------------------------------------

fn check_options(options: &[String]) -> Result<(), String> {
    if options.len() != CHOICE_OPTION_COUNT {
        return Err(format!(
            "expected {CHOICE_OPTION_COUNT} options, got {}",
            options.len()
        ));
    }
    Ok(())
}

/// Check the invariants of one question's variant.
pub fn check_structure(question: &Question) -> Result<(), String> {
    match &question.body {
        QuestionBody::SingleChoice {
            options,
            correct_answer,
        } => {
            check_options(options)?;
            if !options.contains(correct_answer) {
                return Err(format!(
                    "correctAnswer {correct_answer:?} is not one of the options"
                ));
            }
        }
        QuestionBody::MultipleChoice {
            options,
            correct_answers,
        } => {
            check_options(options)?;
            if correct_answers.is_empty() {
                return Err("correctAnswers is empty".into());
            }
            if let Some(missing) = correct_answers.iter().find(|a| !options.contains(a)) {
                return Err(format!(
                    "correctAnswers entry {missing:?} is not one of the options"
                ));
            }
        }
        QuestionBody::MatchingPairs {
            column_a,
            column_b,
            correct_pairs,
        } => check_pairs(column_a.len(), column_b.len(), correct_pairs)?,
        QuestionBody::TrueFalse { statement, .. } => {
            if statement.trim().is_empty() {
                return Err("statement is empty".into());
            }
        }
        QuestionBody::FillInBlank { answers, .. } => {
            if answers.is_empty() {
                return Err("answers is empty".into());
            }
            if let Some(blank) = answers.iter().position(|a| a.is_empty()) {
                return Err(format!("blank {blank} has no acceptable answer"));
            }
        }
        QuestionBody::Essay { prompt, .. } => {
            if prompt.trim().is_empty() {
                return Err("prompt is empty".into());
            }
        }
    }
    Ok(())
}

/// `pairs` must be a bijection between `0..len_a` and `0..len_b`.
fn check_pairs(len_a: usize, len_b: usize, pairs: &[[usize; 2]]) -> Result<(), String> {
    if len_a != len_b {
        return Err(format!(
            "columnA has {len_a} items but columnB has {len_b}"
        ));
    }
    if len_a == 0 {
        return Err("columns are empty".into());
    }

    let mut seen_a = HashSet::new();
    let mut seen_b = HashSet::new();
    for &[a, b] in pairs {
        if a >= len_a || b >= len_b {
            return Err(format!("pair [{a}, {b}] is out of range"));
        }
        if !seen_a.insert(a) {
            return Err(format!("columnA index {a} is paired more than once"));
        }
        if !seen_b.insert(b) {
            return Err(format!("columnB index {b} is paired more than once"));
        }
    }
    if seen_a.len() != len_a {
        return Err(format!(
            "correctPairs covers {} of {len_a} columnA items",
            seen_a.len()
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Content analytics
// ---------------------------------------------------------------------------

/// Whitespace-separated word count.
pub fn count_words(content: &str) -> usize {
    content.split_whitespace().count()
}

/// `ceil(word_count / 250)`.
pub fn reading_time_minutes(word_count: usize) -> usize {
    word_count.div_ceil(READING_SPEED_WPM)
}

fn lookup<'a>(obj: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|k| obj.get(*k)).filter(|v| !v.is_null())
}

fn score_value(value: &Value) -> Option<f64> {
    let score: Option<f64> = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().trim_end_matches('%').parse().ok(),
        _ => None,
    };
    score.filter(|s| s.is_finite())
}

fn clamp_score(name: &str, score: f64) -> f64 {
    if !(0.0..=100.0).contains(&score) {
        tracing::debug!("clamping {name} {score} into [0, 100]");
    }
    score.clamp(0.0, 100.0)
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    let Some(Value::Array(items)) = value else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| match item {
            Value::String(s) => Some(s.trim().to_string()),
            Value::Object(o) => o
                .get("term")
                .or_else(|| o.get("name"))
                .and_then(Value::as_str)
                .map(|s| s.trim().to_string()),
            _ => None,
        })
        .filter(|s| !s.is_empty())
        .collect()
}

/// Turn an analysis reply into `ContentAnalytics`.
///
/// `wordCount` and `estimatedReadingTimeMinutes` always come from
/// `word_count`; whatever the model reported for them is ignored.
pub fn normalize_analytics(raw: &str, word_count: usize) -> QuizResult<ContentAnalytics> {
    let value = parse_reply(raw)?;
    let Value::Object(obj) = value else {
        return Err(QuizError::MalformedResponse(
            "expected a JSON object".into(),
        ));
    };

    let readability_score = lookup(&obj, &["readabilityScore", "readability_score"])
        .and_then(score_value)
        .map(|s| clamp_score("readabilityScore", s))
        .unwrap_or(DEFAULT_READABILITY);

    let topic_relevance_score = lookup(&obj, &["topicRelevanceScore", "topic_relevance_score"])
        .and_then(score_value)
        .map(|s| clamp_score("topicRelevanceScore", s));

    let complexity_level = lookup(&obj, &["complexityLevel", "complexity_level"])
        .and_then(Value::as_str)
        .and_then(|s| s.parse::<ComplexityLevel>().ok())
        .unwrap_or_default();

    let key_terms = string_list(lookup(&obj, &["keyTerms", "key_terms"]));
    let suggested_tags = string_list(lookup(&obj, &["suggestedTags", "suggested_tags"]));

    Ok(ContentAnalytics {
        readability_score,
        word_count,
        estimated_reading_time_minutes: reading_time_minutes(word_count),
        topic_relevance_score,
        key_terms,
        complexity_level,
        suggested_tags: Some(suggested_tags),
    })
}
