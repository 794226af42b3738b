//! Offline provider with canned replies.
//!
//! Used by `--provider mock` and by the server/CLI integration tests. Replies
//! are picked by prompt substring, so one instance can serve question,
//! analysis and content requests at once.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::json;

use lessonforge_core::traits::{GenerateRequest, GenerateResponse, LlmProvider, ModelInfo, TokenUsage};

/// A mock LLM provider for running the pipelines without real API calls.
pub struct MockProvider {
    /// Prompt substring → reply, checked in insertion order.
    responses: Vec<(String, String)>,
    /// Reply used when no substring matches.
    default_response: String,
    call_count: AtomicU32,
    last_request: Mutex<Option<GenerateRequest>>,
}

impl MockProvider {
    pub fn new(responses: Vec<(String, String)>) -> Self {
        Self {
            responses,
            default_response: String::new(),
            call_count: AtomicU32::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// A mock that always returns the same reply.
    pub fn with_fixed_response(response: &str) -> Self {
        let mut mock = Self::new(Vec::new());
        mock.default_response = response.to_string();
        mock
    }

    /// A mock that answers every pipeline with a small, valid reply.
    ///
    /// Question replies carry three entries of the requested type.
    pub fn sample() -> Self {
        let mut responses: Vec<(String, String)> = SAMPLE_QUESTIONS
            .iter()
            .map(|(marker, reply)| (format!("{marker} questions"), reply.to_string()))
            .collect();
        responses.push(("Analyze the following".into(), sample_analysis()));
        responses.push(("Create an educational content piece".into(), SAMPLE_CONTENT.into()));
        Self::new(responses)
    }

    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    pub fn last_request(&self) -> Option<GenerateRequest> {
        self.last_request
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }
}

#[async_trait]
impl LlmProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn generate(&self, request: &GenerateRequest) -> anyhow::Result<GenerateResponse> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        if let Ok(mut last) = self.last_request.lock() {
            *last = Some(request.clone());
        }

        let content = self
            .responses
            .iter()
            .find(|(key, _)| request.prompt.contains(key.as_str()))
            .map(|(_, v)| v.clone())
            .unwrap_or_else(|| self.default_response.clone());

        let prompt_tokens = (request.prompt.len() / 4) as u32; // Rough estimate
        let completion_tokens = (content.len() / 4) as u32;

        Ok(GenerateResponse {
            content,
            model: request.model.clone(),
            token_usage: TokenUsage {
                prompt_tokens,
                completion_tokens,
                total_tokens: prompt_tokens + completion_tokens,
                estimated_cost_usd: 0.0,
            },
            latency_ms: 1,
        })
    }

    fn available_models(&self) -> Vec<ModelInfo> {
        vec![ModelInfo {
            id: "mock-model".into(),
            name: "Mock Model".into(),
            provider: "mock".into(),
            max_context: 100_000,
            cost_per_1k_input: 0.0,
            cost_per_1k_output: 0.0,
        }]
    }
}

const SAMPLE_CONTENT: &str = "# Photosynthesis\n\nPhotosynthesis is the process plants use to turn light, water and carbon dioxide into glucose and oxygen. It happens inside chloroplasts, which contain the green pigment chlorophyll.\n\n## Key Concepts\n\n- Light-dependent reactions capture energy.\n- The Calvin cycle fixes carbon.\n\n## Summary\n\nWithout photosynthesis there would be no oxygen-rich atmosphere.";

const SAMPLE_QUESTIONS: &[(&str, &str)] = &[
    (
        "singleChoice",
        r#"{"questions": [
            {"question": "Where does photosynthesis happen?", "options": ["Chloroplast", "Nucleus", "Ribosome", "Vacuole"], "correctAnswer": "Chloroplast", "explanation": "Chloroplasts hold chlorophyll.", "tags": ["biology"], "estimatedTimeSeconds": 30},
            {"question": "Which gas is released?", "options": ["Oxygen", "Nitrogen", "Helium", "Argon"], "correctAnswer": "Oxygen", "explanation": "Water is split.", "tags": ["biology"], "estimatedTimeSeconds": 30},
            {"question": "Which pigment is green?", "options": ["Chlorophyll", "Melanin", "Keratin", "Carotene"], "correctAnswer": "Chlorophyll", "explanation": "It absorbs red and blue light.", "tags": ["biology"], "estimatedTimeSeconds": 30}
        ]}"#,
    ),
    (
        "multipleChoice",
        r#"{"questions": [
            {"question": "Which are inputs of photosynthesis?", "options": ["Water", "Carbon dioxide", "Glucose", "Oxygen"], "correctAnswers": ["Water", "Carbon dioxide"], "explanation": "Glucose and oxygen are outputs."},
            {"question": "Which are outputs?", "options": ["Glucose", "Oxygen", "Nitrogen", "Water"], "correctAnswers": ["Glucose", "Oxygen"], "explanation": "Sugar and oxygen are produced."},
            {"question": "Which stages exist?", "options": ["Light-dependent reactions", "Calvin cycle", "Krebs cycle", "Glycolysis"], "correctAnswers": ["Light-dependent reactions", "Calvin cycle"], "explanation": "Krebs and glycolysis are respiration."}
        ]}"#,
    ),
    (
        "matchingPairs",
        r#"{"questions": [
            {"question": "Match each term to its role.", "columnA": ["Chlorophyll", "Stomata", "Calvin cycle"], "columnB": ["Fixes carbon", "Absorbs light", "Exchange gases"], "correctPairs": [[0, 1], [1, 2], [2, 0]]},
            {"question": "Match input to source.", "columnA": ["Water", "Carbon dioxide"], "columnB": ["Air", "Soil"], "correctPairs": [[0, 1], [1, 0]]},
            {"question": "Match output to use.", "columnA": ["Glucose", "Oxygen"], "columnB": ["Respiration in animals", "Energy storage"], "correctPairs": [[0, 1], [1, 0]]}
        ]}"#,
    ),
    (
        "trueFalse",
        r#"{"questions": [
            {"question": "Photosynthesis releases oxygen.", "statement": "Photosynthesis releases oxygen.", "isTrue": true, "explanation": "Oxygen comes from split water."},
            {"question": "Photosynthesis happens in mitochondria.", "statement": "Photosynthesis happens in mitochondria.", "isTrue": false, "explanation": "It happens in chloroplasts."},
            {"question": "Chlorophyll is green.", "statement": "Chlorophyll is green.", "isTrue": true, "explanation": "It reflects green light."}
        ]}"#,
    ),
    (
        "fillInBlank",
        r#"{"questions": [
            {"question": "Complete the sentence.", "textWithBlanks": "Photosynthesis takes place in the ___.", "answers": [["chloroplast", "chloroplasts"]]},
            {"question": "Complete the sentence.", "textWithBlanks": "The green pigment is ___.", "answers": [["chlorophyll"]]},
            {"question": "Complete the sentence.", "textWithBlanks": "Plants release ___ and store ___.", "answers": [["oxygen"], ["glucose", "sugar"]]}
        ]}"#,
    ),
    (
        "essay",
        r#"{"questions": [
            {"question": "Explain photosynthesis.", "prompt": "Explain how light energy becomes chemical energy.", "wordLimit": 300, "rubric": [{"criteria": "Accuracy", "weight": 100, "descriptions": {"excellent": "Fully correct", "good": "Mostly correct", "satisfactory": "Partly correct", "needsImprovement": "Incorrect"}}]},
            {"question": "Discuss chloroplasts.", "prompt": "Describe the structure of a chloroplast.", "wordLimit": 250},
            {"question": "Evaluate importance.", "prompt": "Why does life depend on photosynthesis?", "wordLimit": 300}
        ]}"#,
    ),
];

fn sample_analysis() -> String {
    json!({
        "readabilityScore": 68,
        "topicRelevanceScore": 90,
        "keyTerms": ["photosynthesis", "chlorophyll", "Calvin cycle"],
        "complexityLevel": "beginner",
        "suggestedTags": ["biology", "plants"]
    })
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(prompt: &str) -> GenerateRequest {
        GenerateRequest {
            model: "mock-model".into(),
            prompt: prompt.into(),
            system_prompt: None,
            max_tokens: 100,
            temperature: 0.0,
            json_mode: true,
        }
    }

    #[tokio::test]
    async fn fixed_response() {
        let provider = MockProvider::with_fixed_response("{}");
        let response = provider.generate(&request("anything")).await.unwrap();
        assert_eq!(response.content, "{}");
        assert_eq!(provider.call_count(), 1);
        assert_eq!(provider.last_request().unwrap().prompt, "anything");
    }

    #[tokio::test]
    async fn prompt_matching_in_order() {
        let provider = MockProvider::new(vec![
            ("essay".into(), "first".into()),
            ("essay questions".into(), "second".into()),
        ]);
        let response = provider
            .generate(&request("create 2 essay questions"))
            .await
            .unwrap();
        assert_eq!(response.content, "first");
    }

    #[tokio::test]
    async fn sample_replies_are_json() {
        let provider = MockProvider::sample();
        for (marker, _) in SAMPLE_QUESTIONS {
            let prompt = format!("create 3 high-quality easy {marker} questions");
            let reply = provider.generate(&request(&prompt)).await.unwrap();
            let value: serde_json::Value = serde_json::from_str(&reply.content).unwrap();
            assert_eq!(value["questions"].as_array().unwrap().len(), 3, "{marker}");
        }
        assert_eq!(provider.call_count(), SAMPLE_QUESTIONS.len() as u32);
    }
}
