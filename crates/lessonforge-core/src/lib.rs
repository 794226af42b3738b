//! lessonforge-core — prompt building, response normalization, and course model.
//!
//! This crate defines the question and analytics data model, the prompts sent
//! to the upstream model, the normalization pass that turns untrusted replies
//! into typed records, and the service that ties them together.

pub mod client;
pub mod course;
pub mod error;
pub mod model;
pub mod normalize;
pub mod prompt;
pub mod service;
pub mod statistics;
pub mod traits;

pub use error::{ProviderError, QuizError, QuizResult, ValidationIssue};
pub use model::{
    ComplexityLevel, ContentAnalytics, ContentRequest, Difficulty, Question, QuestionBody,
    QuestionFlags, QuestionSpec, QuestionType,
};
