//! Lesson service: the request → prompt → upstream → normalized pipelines.
//!
//! Stateless and `Send + Sync`; share it behind an `Arc`.

use tracing::instrument;

use crate::client::GenerationClient;
use crate::error::{QuizError, QuizResult};
use crate::model::{ContentAnalytics, ContentRequest, Question, QuestionSpec};
use crate::normalize::{count_words, normalize_analytics, normalize_questions};
use crate::prompt::build_question_prompt;

/// Limits enforced before anything is sent upstream.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Largest `count` a single question request may ask for.
    pub max_questions: u32,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self { max_questions: 50 }
    }
}

/// Everything generated for one lesson.
#[derive(Debug, Clone)]
pub struct LessonDraft {
    pub title: String,
    pub content: String,
    pub questions: Vec<Question>,
    pub analytics: ContentAnalytics,
}

pub struct LessonService {
    client: GenerationClient,
    config: ServiceConfig,
}

impl LessonService {
    pub fn new(client: GenerationClient, config: ServiceConfig) -> Self {
        Self { client, config }
    }

    pub fn client(&self) -> &GenerationClient {
        &self.client
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Generate and normalize questions about `content`.
    #[instrument(skip(self, content), fields(question_type = %spec.question_type, count = spec.count))]
    pub async fn generate_questions(
        &self,
        content: &str,
        spec: &QuestionSpec,
    ) -> QuizResult<Vec<Question>> {
        if content.trim().is_empty() {
            return Err(QuizError::InvalidInput("content is required".into()));
        }
        spec.validate(self.config.max_questions)?;

        let prompt = build_question_prompt(content, spec);
        let raw = self.client.generate(&prompt).await?;
        let questions = normalize_questions(spec, &raw)?;

        tracing::info!("generated {} {} questions", questions.len(), spec.question_type);
        Ok(questions)
    }

    /// Analyze `content`; word count and reading time are computed locally.
    #[instrument(skip(self, content))]
    pub async fn analyze_content(&self, content: &str) -> QuizResult<ContentAnalytics> {
        if content.trim().is_empty() {
            return Err(QuizError::InvalidInput("content is required".into()));
        }

        let word_count = count_words(content);
        let raw = self.client.analyze(content).await?;
        normalize_analytics(&raw, word_count)
    }

    /// Write a lesson text for a topic/subtopic.
    #[instrument(skip(self, request), fields(topic = %request.topic, subtopic = %request.subtopic))]
    pub async fn generate_content(&self, request: &ContentRequest) -> QuizResult<String> {
        request.validate()?;
        let content = self.client.write_content(request).await?;
        Ok(content.trim().to_string())
    }

    /// Write content, then analyze it and generate questions concurrently.
    pub async fn build_lesson(
        &self,
        request: &ContentRequest,
        spec: &QuestionSpec,
    ) -> QuizResult<LessonDraft> {
        spec.validate(self.config.max_questions)?;
        let content = self.generate_content(request).await?;

        let (analytics, questions) = futures::try_join!(
            self.analyze_content(&content),
            self.generate_questions(&content, spec),
        )?;

        Ok(LessonDraft {
            title: request.subtopic.trim().to_string(),
            content,
            questions,
            analytics,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::Ordering;
    use std::sync::Arc;

    use serde_json::json;

    use crate::client::tests::StubProvider;
    use crate::client::ClientConfig;
    use crate::model::{Difficulty, QuestionType};

    fn service(stub: Arc<StubProvider>) -> LessonService {
        LessonService::new(
            GenerationClient::new(stub, ClientConfig::default()),
            ServiceConfig::default(),
        )
    }

    fn true_false_reply() -> String {
        json!({"questions": [
            {"statement": "Cells have membranes.", "isTrue": true},
            {"statement": "Cells are made of plastic.", "isTrue": false},
            {"statement": "Mitochondria produce ATP.", "isTrue": true}
        ]})
        .to_string()
    }

    #[tokio::test]
    async fn questions_end_to_end() {
        let stub = Arc::new(StubProvider::replying(vec![(
            "trueFalse questions",
            true_false_reply(),
        )]));
        let svc = service(stub.clone());
        let spec = QuestionSpec::new(QuestionType::TrueFalse, Difficulty::Easy, 3);

        let questions = svc
            .generate_questions("Cells are the basic unit of life.", &spec)
            .await
            .unwrap();
        assert_eq!(questions.len(), 3);
        assert!(questions.iter().all(|q| q.difficulty == Difficulty::Easy));
        assert_eq!(stub.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn invalid_input_never_reaches_upstream() {
        let stub = Arc::new(StubProvider::replying(vec![]));
        let svc = service(stub.clone());

        let blank = svc
            .generate_questions(
                "  ",
                &QuestionSpec::new(QuestionType::Essay, Difficulty::Hard, 1),
            )
            .await;
        assert!(matches!(blank, Err(QuizError::InvalidInput(_))));

        let zero = svc
            .generate_questions(
                "text",
                &QuestionSpec::new(QuestionType::Essay, Difficulty::Hard, 0),
            )
            .await;
        assert!(matches!(zero, Err(QuizError::InvalidInput(_))));

        let analysis = svc.analyze_content("").await;
        assert!(matches!(analysis, Err(QuizError::InvalidInput(_))));

        assert_eq!(stub.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn malformed_reply_yields_no_questions() {
        let stub = Arc::new(StubProvider::replying(vec![("questions", "{not json".into())]));
        let svc = service(stub);
        let result = svc
            .generate_questions(
                "text",
                &QuestionSpec::new(QuestionType::SingleChoice, Difficulty::Easy, 2),
            )
            .await;
        assert!(matches!(result, Err(QuizError::MalformedResponse(_))));
    }

    #[tokio::test]
    async fn analysis_counts_words_locally() {
        let stub = Arc::new(StubProvider::replying(vec![(
            "Analyze",
            json!({"readabilityScore": 70, "wordCount": 3}).to_string(),
        )]));
        let svc = service(stub);
        let passage = vec!["alpha"; 500].join(" ");

        let analytics = svc.analyze_content(&passage).await.unwrap();
        assert_eq!(analytics.word_count, 500);
        assert_eq!(analytics.estimated_reading_time_minutes, 2);
        assert_eq!(analytics.readability_score, 70.0);
    }

    #[tokio::test]
    async fn build_lesson_runs_all_three_pipelines() {
        let stub = Arc::new(StubProvider::replying(vec![
            ("Create an educational content piece", "Cells are the basic unit of life.".into()),
            ("Analyze", json!({"complexityLevel": "beginner"}).to_string()),
            ("trueFalse questions", true_false_reply()),
        ]));
        let svc = service(stub.clone());

        let draft = svc
            .build_lesson(
                &ContentRequest::new("Biology", "Cells"),
                &QuestionSpec::new(QuestionType::TrueFalse, Difficulty::Easy, 3),
            )
            .await
            .unwrap();
        assert_eq!(draft.title, "Cells");
        assert_eq!(draft.content, "Cells are the basic unit of life.");
        assert_eq!(draft.questions.len(), 3);
        assert_eq!(draft.analytics.word_count, 7);
        assert_eq!(stub.calls.load(Ordering::SeqCst), 3);
    }
}
