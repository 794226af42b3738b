//! Aggregate statistics over question sets and course modules.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::course::CourseModule;
use crate::model::{Difficulty, Question, QuestionType};
use crate::normalize::{count_words, reading_time_minutes};

/// Counts over a set of questions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuestionStats {
    pub total: usize,
    pub by_type: BTreeMap<QuestionType, usize>,
    pub by_difficulty: BTreeMap<Difficulty, usize>,
    /// Sum of `estimatedTimeSeconds` over questions that carry one.
    pub total_estimated_seconds: u64,
}

pub fn question_stats<'a>(questions: impl IntoIterator<Item = &'a Question>) -> QuestionStats {
    let mut stats = QuestionStats::default();
    for q in questions {
        stats.total += 1;
        *stats.by_type.entry(q.question_type()).or_default() += 1;
        *stats.by_difficulty.entry(q.difficulty).or_default() += 1;
        stats.total_estimated_seconds += u64::from(q.estimated_time_seconds.unwrap_or(0));
    }
    stats
}

/// Summary of a whole course module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleStats {
    pub lessons: usize,
    pub total_words: usize,
    pub avg_words_per_lesson: usize,
    pub total_reading_minutes: usize,
    /// Mean readability over lessons that have analytics.
    pub avg_readability: Option<f64>,
    pub questions: QuestionStats,
}

pub fn module_stats(module: &CourseModule) -> ModuleStats {
    let lessons = module.lessons.len();
    let word_counts: Vec<usize> = module
        .lessons
        .iter()
        .map(|l| count_words(&l.content))
        .collect();
    let total_words: usize = word_counts.iter().sum();

    let readabilities: Vec<f64> = module
        .lessons
        .iter()
        .filter_map(|l| l.analytics.as_ref().map(|a| a.readability_score))
        .collect();
    let avg_readability = if readabilities.is_empty() {
        None
    } else {
        Some(readabilities.iter().sum::<f64>() / readabilities.len() as f64)
    };

    ModuleStats {
        lessons,
        total_words,
        avg_words_per_lesson: if lessons == 0 {
            0
        } else {
            (total_words as f64 / lessons as f64).round() as usize
        },
        total_reading_minutes: word_counts.iter().map(|&w| reading_time_minutes(w)).sum(),
        avg_readability,
        questions: question_stats(module.questions()),
    }
}
