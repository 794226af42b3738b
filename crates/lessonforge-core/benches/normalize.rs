use criterion::{black_box, criterion_group, criterion_main, Criterion};
use serde_json::json;

use lessonforge_core::model::{Difficulty, QuestionFlags, QuestionSpec, QuestionType};
use lessonforge_core::normalize::{normalize_analytics, normalize_questions};

fn single_choice_reply(n: usize) -> String {
    let questions: Vec<_> = (0..n)
        .map(|i| {
            json!({
                "question": format!("Question {i}?"),
                "options": ["alpha", "beta", "gamma", "delta"],
                "correctAnswer": "gamma",
                "explanation": "because",
                "tags": ["bench"],
                "estimatedTimeSeconds": 30
            })
        })
        .collect();
    json!({ "questions": questions }).to_string()
}

fn matching_reply(n: usize) -> String {
    let questions: Vec<_> = (0..n)
        .map(|_| {
            json!({
                "columnA": ["a", "b", "c", "d", "e"],
                "columnB": ["v", "w", "x", "y", "z"],
                "correctPairs": [[0, 4], [1, 3], [2, 2], [3, 1], [4, 0]]
            })
        })
        .collect();
    json!({ "questions": questions }).to_string()
}

fn bench_normalize_questions(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalize_questions");

    let flagged = QuestionSpec::new(QuestionType::SingleChoice, Difficulty::Easy, 10).with_flags(
        QuestionFlags {
            include_explanations: true,
            include_tags: true,
            time_estimates: true,
        },
    );
    let plain = QuestionSpec::new(QuestionType::SingleChoice, Difficulty::Easy, 10);
    let matching = QuestionSpec::new(QuestionType::MatchingPairs, Difficulty::Hard, 10);

    let sc_10 = single_choice_reply(10);
    let sc_50 = single_choice_reply(50);
    let mp_10 = matching_reply(10);

    group.bench_function("single_choice_10_flagged", |b| {
        b.iter(|| normalize_questions(black_box(&flagged), black_box(&sc_10)))
    });
    group.bench_function("single_choice_10_plain", |b| {
        b.iter(|| normalize_questions(black_box(&plain), black_box(&sc_10)))
    });
    group.bench_function("single_choice_50_flagged", |b| {
        b.iter(|| normalize_questions(black_box(&flagged), black_box(&sc_50)))
    });
    group.bench_function("matching_pairs_10", |b| {
        b.iter(|| normalize_questions(black_box(&matching), black_box(&mp_10)))
    });

    group.finish();
}

fn bench_normalize_analytics(c: &mut Criterion) {
    let raw = json!({
        "readabilityScore": 64.5,
        "keyTerms": [{"term": "photosynthesis", "importance": 9}, {"term": "chlorophyll", "importance": 7}],
        "complexityLevel": "intermediate",
        "topicRelevanceScore": 120,
        "suggestedTags": ["biology", "plants"]
    })
    .to_string();

    c.bench_function("normalize_analytics", |b| {
        b.iter(|| normalize_analytics(black_box(&raw), black_box(575)))
    });
}

criterion_group!(benches, bench_normalize_questions, bench_normalize_analytics);
criterion_main!(benches);
