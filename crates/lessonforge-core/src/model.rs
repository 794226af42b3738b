//! Core data model types for lessonforge.
//!
//! Question requests, normalized questions, and content analytics. Field
//! names serialize in camelCase to match the JSON API.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{QuizError, QuizResult};

/// The six supported question formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum QuestionType {
    SingleChoice,
    MultipleChoice,
    MatchingPairs,
    TrueFalse,
    FillInBlank,
    Essay,
}

impl QuestionType {
    pub const ALL: [QuestionType; 6] = [
        QuestionType::SingleChoice,
        QuestionType::MultipleChoice,
        QuestionType::MatchingPairs,
        QuestionType::TrueFalse,
        QuestionType::FillInBlank,
        QuestionType::Essay,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::SingleChoice => "singleChoice",
            QuestionType::MultipleChoice => "multipleChoice",
            QuestionType::MatchingPairs => "matchingPairs",
            QuestionType::TrueFalse => "trueFalse",
            QuestionType::FillInBlank => "fillInBlank",
            QuestionType::Essay => "essay",
        }
    }

    /// Parse a question type, falling back to `SingleChoice` for anything
    /// unrecognized.
    pub fn parse_lenient(s: &str) -> Self {
        s.parse().unwrap_or_else(|_| {
            tracing::warn!("unknown question type '{s}', using singleChoice");
            QuestionType::SingleChoice
        })
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuestionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-' && !c.is_whitespace())
            .collect::<String>()
            .to_lowercase();
        match key.as_str() {
            "singlechoice" | "single" => Ok(QuestionType::SingleChoice),
            "multiplechoice" | "multiple" => Ok(QuestionType::MultipleChoice),
            "matchingpairs" | "matching" => Ok(QuestionType::MatchingPairs),
            "truefalse" => Ok(QuestionType::TrueFalse),
            "fillinblank" | "fillintheblank" | "cloze" => Ok(QuestionType::FillInBlank),
            "essay" => Ok(QuestionType::Essay),
            _ => Err(format!("unknown question type: {s}")),
        }
    }
}

/// Requested cognitive level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(format!("unknown difficulty: {other}")),
        }
    }
}

/// Optional extras the caller can ask the model for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionFlags {
    #[serde(default)]
    pub include_explanations: bool,
    #[serde(default)]
    pub include_tags: bool,
    #[serde(default)]
    pub time_estimates: bool,
}

/// What kind of questions to generate, and how many.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionSpec {
    pub question_type: QuestionType,
    pub difficulty: Difficulty,
    pub count: u32,
    #[serde(flatten)]
    pub flags: QuestionFlags,
}

impl QuestionSpec {
    pub fn new(question_type: QuestionType, difficulty: Difficulty, count: u32) -> Self {
        Self {
            question_type,
            difficulty,
            count,
            flags: QuestionFlags::default(),
        }
    }

    pub fn with_flags(mut self, flags: QuestionFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Check `1 <= count <= max_questions`.
    pub fn validate(&self, max_questions: u32) -> QuizResult<()> {
        if self.count == 0 {
            return Err(QuizError::InvalidInput(
                "number of questions must be at least 1".into(),
            ));
        }
        if self.count > max_questions {
            return Err(QuizError::InvalidInput(format!(
                "number of questions must be at most {max_questions}"
            )));
        }
        Ok(())
    }
}

/// One normalized quiz item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,
    #[serde(default)]
    pub question: String,
    pub difficulty: Difficulty,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_time_seconds: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    #[serde(flatten)]
    pub body: QuestionBody,
}

impl Question {
    pub fn question_type(&self) -> QuestionType {
        self.body.question_type()
    }
}

/// Variant-specific question fields, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum QuestionBody {
    SingleChoice {
        options: Vec<String>,
        correct_answer: String,
    },
    MultipleChoice {
        options: Vec<String>,
        correct_answers: Vec<String>,
    },
    MatchingPairs {
        column_a: Vec<String>,
        column_b: Vec<String>,
        correct_pairs: Vec<[usize; 2]>,
    },
    TrueFalse {
        statement: String,
        is_true: bool,
    },
    FillInBlank {
        text_with_blanks: String,
        /// Acceptable answers, one list per blank.
        answers: Vec<Vec<String>>,
    },
    Essay {
        prompt: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        word_limit: Option<u32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        rubric: Option<Vec<RubricItem>>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        sample_answer: Option<String>,
    },
}

impl QuestionBody {
    pub fn question_type(&self) -> QuestionType {
        match self {
            QuestionBody::SingleChoice { .. } => QuestionType::SingleChoice,
            QuestionBody::MultipleChoice { .. } => QuestionType::MultipleChoice,
            QuestionBody::MatchingPairs { .. } => QuestionType::MatchingPairs,
            QuestionBody::TrueFalse { .. } => QuestionType::TrueFalse,
            QuestionBody::FillInBlank { .. } => QuestionType::FillInBlank,
            QuestionBody::Essay { .. } => QuestionType::Essay,
        }
    }
}

/// One weighted essay grading criterion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RubricItem {
    pub criteria: String,
    pub weight: f64,
    pub descriptions: RubricDescriptions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RubricDescriptions {
    pub excellent: String,
    pub good: String,
    pub satisfactory: String,
    pub needs_improvement: String,
}

/// Reading level of a piece of content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComplexityLevel {
    Beginner,
    #[default]
    Intermediate,
    Advanced,
}

impl fmt::Display for ComplexityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComplexityLevel::Beginner => write!(f, "beginner"),
            ComplexityLevel::Intermediate => write!(f, "intermediate"),
            ComplexityLevel::Advanced => write!(f, "advanced"),
        }
    }
}

impl FromStr for ComplexityLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "beginner" | "basic" | "introductory" => Ok(ComplexityLevel::Beginner),
            "intermediate" => Ok(ComplexityLevel::Intermediate),
            "advanced" | "expert" => Ok(ComplexityLevel::Advanced),
            other => Err(format!("unknown complexity level: {other}")),
        }
    }
}

/// Readability and metadata summary for a piece of content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentAnalytics {
    /// 0–100, higher is easier to read.
    pub readability_score: f64,
    pub word_count: usize,
    pub estimated_reading_time_minutes: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic_relevance_score: Option<f64>,
    #[serde(default)]
    pub key_terms: Vec<String>,
    #[serde(default)]
    pub complexity_level: ComplexityLevel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_tags: Option<Vec<String>>,
}

/// Request to write a lesson text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentRequest {
    pub topic: String,
    pub subtopic: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_audience: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_complexity: Option<ComplexityLevel>,
}

impl ContentRequest {
    pub fn new(topic: impl Into<String>, subtopic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            subtopic: subtopic.into(),
            target_audience: None,
            content_complexity: None,
        }
    }

    /// Topic and subtopic must both be non-blank.
    pub fn validate(&self) -> QuizResult<()> {
        if self.topic.trim().is_empty() || self.subtopic.trim().is_empty() {
            return Err(QuizError::InvalidInput(
                "topic and subtopic are required".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn question_type_display_and_parse() {
        for qt in QuestionType::ALL {
            assert_eq!(qt.to_string().parse::<QuestionType>().unwrap(), qt);
        }
        assert_eq!(
            "single_choice".parse::<QuestionType>().unwrap(),
            QuestionType::SingleChoice
        );
        assert_eq!(
            "Fill-In-Blank".parse::<QuestionType>().unwrap(),
            QuestionType::FillInBlank
        );
        assert!("ranking".parse::<QuestionType>().is_err());
    }

    #[test]
    fn unknown_question_type_falls_back_to_single_choice() {
        assert_eq!(
            QuestionType::parse_lenient("ranking"),
            QuestionType::SingleChoice
        );
        assert_eq!(QuestionType::parse_lenient("essay"), QuestionType::Essay);
    }

    #[test]
    fn spec_count_bounds() {
        let spec = QuestionSpec::new(QuestionType::Essay, Difficulty::Hard, 0);
        assert!(matches!(spec.validate(50), Err(QuizError::InvalidInput(_))));

        let spec = QuestionSpec::new(QuestionType::Essay, Difficulty::Hard, 51);
        assert!(spec.validate(50).is_err());

        let spec = QuestionSpec::new(QuestionType::Essay, Difficulty::Hard, 1);
        assert!(spec.validate(50).is_ok());
    }

    #[test]
    fn question_serializes_with_type_tag() {
        let q = Question {
            id: "q1".into(),
            question: "Is water wet?".into(),
            difficulty: Difficulty::Easy,
            tags: None,
            estimated_time_seconds: None,
            explanation: None,
            body: QuestionBody::TrueFalse {
                statement: "Water is wet.".into(),
                is_true: true,
            },
        };
        let json = serde_json::to_value(&q).unwrap();
        assert_eq!(json["type"], "trueFalse");
        assert_eq!(json["isTrue"], true);
        assert_eq!(json["difficulty"], "easy");
        assert!(json.get("tags").is_none());
    }

    #[test]
    fn matching_pairs_deserializes_camel_case_columns() {
        let json = serde_json::json!({
            "id": "m1",
            "difficulty": "medium",
            "type": "matchingPairs",
            "columnA": ["H2O", "NaCl"],
            "columnB": ["salt", "water"],
            "correctPairs": [[0, 1], [1, 0]]
        });
        let q: Question = serde_json::from_value(json).unwrap();
        assert_eq!(q.question_type(), QuestionType::MatchingPairs);
        match q.body {
            QuestionBody::MatchingPairs { correct_pairs, .. } => {
                assert_eq!(correct_pairs, vec![[0, 1], [1, 0]]);
            }
            other => panic!("unexpected body: {other:?}"),
        }
    }

    #[test]
    fn content_request_requires_topic_and_subtopic() {
        assert!(ContentRequest::new("Biology", " ").validate().is_err());
        assert!(ContentRequest::new("Biology", "Cells").validate().is_ok());
    }
}
