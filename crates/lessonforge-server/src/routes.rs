//! Request bodies and handlers.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::instrument;

use lessonforge_core::model::{
    ComplexityLevel, ContentRequest, Difficulty, QuestionFlags, QuestionSpec, QuestionType,
};
use lessonforge_core::service::LessonService;

use crate::error::ApiError;

type AppState = State<Arc<LessonService>>;

/// Body of `POST /api/generate-questions`. Every field is optional at the
/// parsing stage so that a missing one becomes a 400 naming it.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionsBody {
    pub content: Option<String>,
    pub question_type: Option<String>,
    pub difficulty: Option<String>,
    #[serde(alias = "count")]
    pub num_questions: Option<Value>,
    #[serde(default)]
    pub include_explanations: bool,
    #[serde(default)]
    pub include_tags: bool,
    #[serde(default)]
    pub time_estimates: bool,
}

impl QuestionsBody {
    /// Check required fields and build the spec.
    pub fn into_parts(self) -> Result<(String, QuestionSpec), ApiError> {
        let mut missing = Vec::new();
        if is_blank(&self.content) {
            missing.push("content");
        }
        if is_blank(&self.question_type) {
            missing.push("questionType");
        }
        if is_blank(&self.difficulty) {
            missing.push("difficulty");
        }
        if self.num_questions.as_ref().map_or(true, Value::is_null) {
            missing.push("numQuestions");
        }
        if !missing.is_empty() {
            return Err(ApiError::bad_request(format!(
                "Missing required fields: {}",
                missing.join(", ")
            )));
        }

        let content = self.content.unwrap_or_default();
        let question_type = QuestionType::parse_lenient(self.question_type.as_deref().unwrap_or_default());
        let difficulty: Difficulty = self
            .difficulty
            .as_deref()
            .unwrap_or_default()
            .parse()
            .map_err(ApiError::bad_request)?;
        let count = parse_count(self.num_questions.as_ref())?;

        let spec = QuestionSpec::new(question_type, difficulty, count).with_flags(QuestionFlags {
            include_explanations: self.include_explanations,
            include_tags: self.include_tags,
            time_estimates: self.time_estimates,
        });
        Ok((content, spec))
    }
}

/// Body of `POST /api/analyze-content`.
#[derive(Debug, Default, Deserialize)]
pub struct AnalyzeBody {
    pub content: Option<String>,
}

/// Body of `POST /api/generate-content`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentBody {
    pub topic: Option<String>,
    pub subtopic: Option<String>,
    pub target_audience: Option<String>,
    pub content_complexity: Option<String>,
}

impl ContentBody {
    pub fn into_request(self) -> Result<ContentRequest, ApiError> {
        if is_blank(&self.topic) || is_blank(&self.subtopic) {
            return Err(ApiError::bad_request("Topic and subtopic are required"));
        }
        let content_complexity = self
            .content_complexity
            .filter(|c| !c.trim().is_empty())
            .map(|c| c.parse::<ComplexityLevel>())
            .transpose()
            .map_err(ApiError::bad_request)?;

        Ok(ContentRequest {
            topic: self.topic.unwrap_or_default(),
            subtopic: self.subtopic.unwrap_or_default(),
            target_audience: self.target_audience.filter(|a| !a.trim().is_empty()),
            content_complexity,
        })
    }
}

fn is_blank(field: &Option<String>) -> bool {
    field.as_deref().map_or(true, |s| s.trim().is_empty())
}

/// Accept `5` or `"5"`; anything else is a 400.
fn parse_count(value: Option<&Value>) -> Result<u32, ApiError> {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_u64(),
        Some(Value::String(s)) => s.trim().parse::<u64>().ok(),
        _ => None,
    };
    parsed
        .and_then(|n| u32::try_from(n).ok())
        .ok_or_else(|| ApiError::bad_request("numQuestions must be a positive integer"))
}

fn parse_body<T: DeserializeOwned>(body: &Bytes) -> Result<T, ApiError> {
    serde_json::from_slice(body)
        .map_err(|e| ApiError::bad_request(format!("invalid JSON body: {e}")))
}

pub(crate) async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

#[instrument(skip_all)]
pub(crate) async fn generate_questions(
    State(service): AppState,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    let (content, spec) = parse_body::<QuestionsBody>(&body)?.into_parts()?;
    let questions = service.generate_questions(&content, &spec).await?;
    Ok(Json(json!({ "questions": questions })))
}

#[instrument(skip_all)]
pub(crate) async fn analyze_content(
    State(service): AppState,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    let request = parse_body::<AnalyzeBody>(&body)?;
    if is_blank(&request.content) {
        return Err(ApiError::bad_request("Content is required"));
    }
    let analytics = service
        .analyze_content(request.content.as_deref().unwrap_or_default())
        .await?;
    Ok(Json(json!({ "analytics": analytics })))
}

#[instrument(skip_all)]
pub(crate) async fn generate_content(
    State(service): AppState,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    let request = parse_body::<ContentBody>(&body)?.into_request()?;
    let content = service.generate_content(&request).await?;
    Ok(Json(json!({ "content": content })))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(value: Value) -> QuestionsBody {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn missing_fields_are_named() {
        let err = body(json!({"content": "text", "difficulty": "easy"}))
            .into_parts()
            .unwrap_err();
        assert_eq!(err.message, "Missing required fields: questionType, numQuestions");
    }

    #[test]
    fn count_alias_and_string_count() {
        let (_, spec) = body(json!({
            "content": "text", "questionType": "essay", "difficulty": "hard", "count": "2"
        }))
        .into_parts()
        .unwrap();
        assert_eq!(spec.count, 2);
        assert_eq!(spec.question_type, QuestionType::Essay);
    }

    #[test]
    fn unknown_type_falls_back_but_unknown_difficulty_is_rejected() {
        let (_, spec) = body(json!({
            "content": "text", "questionType": "crossword", "difficulty": "easy",
            "numQuestions": 3, "includeTags": true
        }))
        .into_parts()
        .unwrap();
        assert_eq!(spec.question_type, QuestionType::SingleChoice);
        assert!(spec.flags.include_tags);

        let err = body(json!({
            "content": "text", "questionType": "essay", "difficulty": "brutal", "numQuestions": 3
        }))
        .into_parts()
        .unwrap_err();
        assert_eq!(err.status, axum::http::StatusCode::BAD_REQUEST);
    }

    #[test]
    fn negative_count_is_rejected() {
        let err = body(json!({
            "content": "text", "questionType": "essay", "difficulty": "easy", "numQuestions": -1
        }))
        .into_parts()
        .unwrap_err();
        assert!(err.message.contains("positive integer"));
    }

    #[test]
    fn content_body_parses_complexity() {
        let request = ContentBody {
            topic: Some("Physics".into()),
            subtopic: Some("Optics".into()),
            target_audience: Some(" ".into()),
            content_complexity: Some("advanced".into()),
        }
        .into_request()
        .unwrap();
        assert_eq!(request.content_complexity, Some(ComplexityLevel::Advanced));
        assert!(request.target_audience.is_none());

        assert!(ContentBody::default().into_request().is_err());
    }
}
