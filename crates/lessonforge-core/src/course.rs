//! Course modules and lessons, with JSON file persistence.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{QuizError, QuizResult};
use crate::model::{ContentAnalytics, Question};
use crate::service::LessonDraft;

/// One lesson inside a module. `order` always equals its list position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    pub id: String,
    pub title: String,
    pub content: String,
    pub order: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub questions: Option<Vec<Question>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analytics: Option<ContentAnalytics>,
}

/// An ordered collection of lessons.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseModule {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub lessons: Vec<Lesson>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CourseModule {
    pub fn new(title: &str, description: &str) -> QuizResult<Self> {
        let title = title.trim();
        if title.is_empty() {
            return Err(QuizError::InvalidInput("module title is required".into()));
        }
        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            title: title.to_string(),
            description: description.trim().to_string(),
            lessons: Vec::new(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Append a lesson. A blank title becomes "Lesson N".
    pub fn add_lesson(&mut self, title: &str, content: String) -> &mut Lesson {
        let order = self.lessons.len();
        let title = match title.trim() {
            "" => format!("Lesson {}", order + 1),
            t => t.to_string(),
        };
        self.lessons.push(Lesson {
            id: Uuid::new_v4().to_string(),
            title,
            content,
            order,
            questions: None,
            analytics: None,
        });
        self.touch();
        &mut self.lessons[order]
    }

    /// Append a generated lesson with its questions and analytics.
    pub fn add_draft(&mut self, draft: LessonDraft) -> &Lesson {
        let lesson = self.add_lesson(&draft.title, draft.content);
        lesson.questions = Some(draft.questions);
        lesson.analytics = Some(draft.analytics);
        lesson
    }

    /// Remove a lesson and renumber the rest.
    pub fn remove_lesson(&mut self, id: &str) -> Option<Lesson> {
        let index = self.lessons.iter().position(|l| l.id == id)?;
        let removed = self.lessons.remove(index);
        self.renumber();
        self.touch();
        Some(removed)
    }

    /// Move a lesson to `new_index` (clamped to the end). Returns `false` if
    /// no lesson has that id.
    pub fn move_lesson(&mut self, id: &str, new_index: usize) -> bool {
        let Some(index) = self.lessons.iter().position(|l| l.id == id) else {
            return false;
        };
        let lesson = self.lessons.remove(index);
        let target = new_index.min(self.lessons.len());
        self.lessons.insert(target, lesson);
        self.renumber();
        self.touch();
        true
    }

    /// Every question across all lessons, in lesson order.
    pub fn questions(&self) -> impl Iterator<Item = &Question> {
        self.lessons
            .iter()
            .filter_map(|l| l.questions.as_ref())
            .flatten()
    }

    fn renumber(&mut self) {
        for (order, lesson) in self.lessons.iter_mut().enumerate() {
            lesson.order = order;
        }
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Save the module as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize module")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write module to {}", path.display()))?;
        Ok(())
    }

    /// Load a module from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read module from {}", path.display()))?;
        let mut module: CourseModule =
            serde_json::from_str(&content).context("failed to parse module JSON")?;
        module.lessons.sort_by_key(|l| l.order);
        module.renumber();
        Ok(module)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ComplexityLevel, Difficulty, QuestionBody};

    fn module_with(n: usize) -> CourseModule {
        let mut m = CourseModule::new("Biology 101", "Intro course").unwrap();
        for i in 0..n {
            m.add_lesson(&format!("L{i}"), format!("content {i}"));
        }
        m
    }

    #[test]
    fn blank_title_rejected() {
        assert!(CourseModule::new("   ", "").is_err());
    }

    #[test]
    fn lessons_are_numbered_in_order() {
        let mut m = module_with(2);
        let untitled = m.add_lesson("", "x".into());
        assert_eq!(untitled.title, "Lesson 3");
        assert_eq!(untitled.order, 2);
        let orders: Vec<_> = m.lessons.iter().map(|l| l.order).collect();
        assert_eq!(orders, vec![0, 1, 2]);
    }

    #[test]
    fn remove_renumbers() {
        let mut m = module_with(3);
        let middle = m.lessons[1].id.clone();
        let removed = m.remove_lesson(&middle).unwrap();
        assert_eq!(removed.title, "L1");
        assert_eq!(m.lessons.len(), 2);
        assert_eq!(m.lessons[1].title, "L2");
        assert_eq!(m.lessons[1].order, 1);
        assert!(m.remove_lesson("missing").is_none());
    }

    #[test]
    fn move_lesson_reorders() {
        let mut m = module_with(3);
        let first = m.lessons[0].id.clone();
        assert!(m.move_lesson(&first, 10));
        let titles: Vec<_> = m.lessons.iter().map(|l| l.title.as_str()).collect();
        assert_eq!(titles, vec!["L1", "L2", "L0"]);
        assert_eq!(m.lessons[2].order, 2);
        assert!(!m.move_lesson("missing", 0));
    }

    #[test]
    fn add_draft_attaches_questions_and_analytics() {
        let mut m = module_with(0);
        let draft = LessonDraft {
            title: "Cells".into(),
            content: "Cells are small.".into(),
            questions: vec![Question {
                id: "q".into(),
                question: "Cells are small.".into(),
                difficulty: Difficulty::Easy,
                tags: None,
                estimated_time_seconds: None,
                explanation: None,
                body: QuestionBody::TrueFalse {
                    statement: "Cells are small.".into(),
                    is_true: true,
                },
            }],
            analytics: ContentAnalytics {
                readability_score: 80.0,
                word_count: 3,
                estimated_reading_time_minutes: 1,
                topic_relevance_score: None,
                key_terms: vec![],
                complexity_level: ComplexityLevel::Beginner,
                suggested_tags: None,
            },
        };
        let lesson = m.add_draft(draft);
        assert_eq!(lesson.title, "Cells");
        assert_eq!(m.questions().count(), 1);
    }

    #[test]
    fn json_roundtrip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("modules").join("bio.json");
        let m = module_with(2);
        m.save_json(&path).unwrap();

        let loaded = CourseModule::load_json(&path).unwrap();
        assert_eq!(loaded, m);
    }
}
