//! Prompt construction for the upstream model.
//!
//! Every builder here is a pure function of its inputs: the same arguments
//! always produce the same `PromptText`.

use serde::{Deserialize, Serialize};

use crate::model::{ContentRequest, Difficulty, QuestionFlags, QuestionSpec, QuestionType};

/// A system instruction plus the user message sent upstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptText {
    pub system: String,
    pub user: String,
}

pub const QUESTION_SYSTEM_PROMPT: &str = "You are an expert educational assessment developer with experience creating high-quality questions that accurately measure understanding across various subjects and difficulty levels. Respond with a single valid JSON object and nothing else.";

pub const ANALYSIS_SYSTEM_PROMPT: &str = "You are an educational content analyzer. Analyze the provided content and return JSON with readability statistics and key terms. Respond with a single valid JSON object and nothing else.";

pub const CONTENT_SYSTEM_PROMPT: &str = "You are an expert educational content creator with deep knowledge across various subjects. Your task is to create comprehensive, accurate, and engaging educational content. Focus on clarity, proper structure, and educational value while making complex concepts accessible to students.";

const JSON_ONLY_DIRECTIVE: &str =
    "Return ONLY a valid JSON object. Do not wrap it in markdown and do not add commentary.";

/// Instruction and structural guidelines for one question type.
struct TypeTemplate {
    instruction: &'static str,
    guidelines: &'static str,
    example: &'static str,
}

fn type_template(question_type: QuestionType) -> TypeTemplate {
    match question_type {
        QuestionType::SingleChoice => TypeTemplate {
            instruction: "Create single-choice questions with exactly 4 options each, with only one correct answer.",
            guidelines: "- Each question should have a clear, unambiguous correct answer
- The 3 incorrect options (distractors) should be plausible but clearly incorrect
- Distractors should be of similar length and structure as the correct answer
- Avoid using \"all/none of the above\" options
- Ensure options are mutually exclusive
- Distribute the position of the correct answer across questions
- correctAnswer must repeat the text of one option exactly",
            example: r#"{
  "questions": [
    {
      "question": "Complete question text here",
      "options": ["Option A", "Option B", "Option C", "Option D"],
      "correctAnswer": "Option B"
    }
  ]
}"#,
        },
        QuestionType::MultipleChoice => TypeTemplate {
            instruction: "Create multiple-choice questions with exactly 4 options each, where 2-3 options are correct.",
            guidelines: "- Each question should have 2-3 correct answers
- All incorrect options should be plausible but clearly incorrect
- Avoid having \"all of the above\" as an option
- Make options similar in length and grammatical structure
- The correct answers should test different aspects of the same concept
- Every entry in correctAnswers must repeat the text of one option exactly",
            example: r#"{
  "questions": [
    {
      "question": "Complete question text here",
      "options": ["Option A", "Option B", "Option C", "Option D"],
      "correctAnswers": ["Option A", "Option C"]
    }
  ]
}"#,
        },
        QuestionType::MatchingPairs => TypeTemplate {
            instruction: "Create matching pairs exercises with items in column A that correspond to items in column B.",
            guidelines: "- columnA and columnB must have the same number of items
- Each item in columnA has exactly one correct match in columnB
- Items in both columns should be concise (1-5 words when possible)
- columnA holds concepts, terms, or principles; columnB holds definitions, explanations, or examples
- Shuffle columnB so matches are not simply aligned
- correctPairs lists [indexA, indexB] pairs (zero-indexed) and covers every columnA index exactly once",
            example: r#"{
  "questions": [
    {
      "question": "Match each term with its definition",
      "columnA": ["Item 1", "Item 2", "Item 3", "Item 4"],
      "columnB": ["Match 3", "Match 1", "Match 4", "Match 2"],
      "correctPairs": [[0, 1], [1, 3], [2, 0], [3, 2]]
    }
  ]
}"#,
        },
        QuestionType::TrueFalse => TypeTemplate {
            instruction: "Create true/false statements that are each either definitively true or definitively false.",
            guidelines: "- Balance the set: roughly half the statements should be true and half false
- False statements should be plausible, typically a subtle alteration of a true fact
- Avoid absolute words such as \"always\" or \"never\" that give the answer away
- Test a single idea per statement; avoid double negatives",
            example: r#"{
  "questions": [
    {
      "question": "True or false?",
      "statement": "Statement text here",
      "isTrue": false
    }
  ]
}"#,
        },
        QuestionType::FillInBlank => TypeTemplate {
            instruction: "Create fill-in-the-blank questions where key terms are replaced with blanks marked as ___.",
            guidelines: "- Each blank should target a key term or concept, not a trivial word
- Use one to three blanks per sentence
- answers holds one list per blank, in order, with every acceptable answer for that blank
- The surrounding text must give enough context to determine the answer",
            example: r#"{
  "questions": [
    {
      "question": "Fill in the blanks",
      "textWithBlanks": "The ___ is the powerhouse of the ___.",
      "answers": [["mitochondrion", "mitochondria"], ["cell"]]
    }
  ]
}"#,
        },
        QuestionType::Essay => TypeTemplate {
            instruction: "Create open-ended essay prompts with a grading rubric.",
            guidelines: "- Each prompt should require explanation, argument, or synthesis rather than recall
- Give a suggested wordLimit appropriate to the difficulty
- Provide a rubric with exactly 4 criteria whose weights sum to 100
- Describe excellent, good, satisfactory, and needsImprovement performance for each criterion
- Include a short sampleAnswer outlining a strong response",
            example: r#"{
  "questions": [
    {
      "question": "Short title for the prompt",
      "prompt": "Essay prompt text here",
      "wordLimit": 300,
      "rubric": [
        {
          "criteria": "Understanding of concepts",
          "weight": 25,
          "descriptions": {
            "excellent": "...",
            "good": "...",
            "satisfactory": "...",
            "needsImprovement": "..."
          }
        }
      ],
      "sampleAnswer": "Outline of a strong answer"
    }
  ]
}"#,
        },
    }
}

fn difficulty_block(difficulty: Difficulty) -> &'static str {
    match difficulty {
        Difficulty::Easy => "- Focus on recall and basic understanding
- Use straightforward language
- Test fundamental concepts and definitions
- Questions should be answerable directly from the content
- Avoid complex scenario-based questions",
        Difficulty::Medium => "- Test application and analysis of concepts
- Include some questions requiring inference
- Use more nuanced language
- May require connecting multiple concepts
- Include some scenario-based questions",
        Difficulty::Hard => "- Focus on evaluation and synthesis of information
- Include complex scenarios requiring critical thinking
- Test deeper understanding and relationships between concepts
- Require application of concepts to novel situations
- Include questions that test edge cases and exceptions",
    }
}

fn flag_fragments(flags: &QuestionFlags) -> String {
    let mut out = String::new();
    if flags.include_explanations {
        out.push_str("- Add an \"explanation\" field to every question explaining why the answer is correct\n");
    }
    if flags.include_tags {
        out.push_str("- Add a \"tags\" field to every question: a list of 2-4 short topic keywords\n");
    }
    if flags.time_estimates {
        out.push_str("- Add an \"estimatedTimeSeconds\" field to every question: the number of seconds a typical student needs to answer it\n");
    }
    out
}

const GENERAL_GUIDELINES: &str = "- Questions should directly test understanding of the educational content provided
- Cover different aspects/sections of the content (don't focus on just one part)
- Ensure questions are clear, concise, and unambiguous
- Use proper grammar and professional language
- Avoid cultural bias or assuming specific regional knowledge
- Ensure all questions have definitive, factually correct answers";

/// Build the question-generation prompt for `content`.
pub fn build_question_prompt(content: &str, spec: &QuestionSpec) -> PromptText {
    let template = type_template(spec.question_type);
    let extras = flag_fragments(&spec.flags);

    let mut user = format!(
        "Based on the following educational content, create {count} high-quality {difficulty} {qtype} questions.

EDUCATIONAL CONTENT:
{content}

QUESTION TYPE:
{instruction}

QUESTION GUIDELINES:
{guidelines}

DIFFICULTY LEVEL: {difficulty}
{difficulty_guidelines}

GENERAL ASSESSMENT GUIDELINES:
{general}
",
        count = spec.count,
        difficulty = spec.difficulty,
        qtype = spec.question_type,
        content = content.trim(),
        instruction = template.instruction,
        guidelines = template.guidelines,
        difficulty_guidelines = difficulty_block(spec.difficulty),
        general = GENERAL_GUIDELINES,
    );

    if !extras.is_empty() {
        user.push_str("\nADDITIONAL FIELDS:\n");
        user.push_str(&extras);
    }

    user.push_str(&format!(
        "\nFORMAT THE OUTPUT AS A VALID JSON OBJECT with this structure:\n{}\n\n{}",
        template.example, JSON_ONLY_DIRECTIVE
    ));

    PromptText {
        system: QUESTION_SYSTEM_PROMPT.to_string(),
        user,
    }
}

/// Build the readability/metadata analysis prompt.
pub fn build_analysis_prompt(content: &str) -> PromptText {
    let user = format!(
        "Analyze the following educational content and return a JSON object with:
1. \"readabilityScore\": a Flesch reading-ease score (0-100 scale)
2. \"keyTerms\": a list of 5-10 key terms/concepts, each {{\"term\": string, \"importance\": 1-10}}
3. \"complexityLevel\": one of \"beginner\", \"intermediate\", \"advanced\"
4. \"topicRelevanceScore\": 0-100, how focused the content is on its main topic
5. \"suggestedTags\": a list of tags for categorizing this content

Content to analyze:
{}

{}",
        content.trim(),
        JSON_ONLY_DIRECTIVE
    );

    PromptText {
        system: ANALYSIS_SYSTEM_PROMPT.to_string(),
        user,
    }
}

/// Build the lesson-writing prompt for a topic/subtopic.
pub fn build_content_prompt(request: &ContentRequest) -> PromptText {
    let topic = request.topic.trim();
    let subtopic = request.subtopic.trim();

    let mut user = format!(
        "Create an educational content piece about \"{topic}\", specifically focusing on \"{subtopic}\".

CONTENT STRUCTURE:
1. Introduction (approximately 75 words)
   - Begin with a compelling hook related to {subtopic}
   - Provide brief context about {topic} and why {subtopic} is important
   - Include a clear thesis statement outlining what the reader will learn

2. Background/Historical Context (approximately 100 words)
   - Explain how {subtopic} fits within the broader field of {topic}
   - Mention key figures, events, or developments if relevant

3. Main Concepts/Core Principles (approximately 150 words)
   - Clearly define all essential terminology related to {subtopic}
   - Explain 3-5 fundamental concepts or principles of {subtopic}

4. Practical Applications/Examples (approximately 100 words)
   - Provide specific real-world examples demonstrating {subtopic} in action

5. Current Developments/Challenges (approximately 75 words)
   - Discuss recent developments, open challenges, or ongoing research

6. Conclusion (approximately 75 words)
   - Summarize key points and reinforce the importance of {subtopic} within {topic}
   - End with a thought-provoking question or forward-looking statement

CONTENT GUIDELINES:
- Write in clear, concise educational prose suitable for students
- Maintain a neutral, objective tone while being engaging
- Avoid jargon unless necessary (then explain it)
- Total length should be approximately 575 words
- Structure content with appropriate headings for each section
"
    );

    if let Some(audience) = request
        .target_audience
        .as_deref()
        .map(str::trim)
        .filter(|a| !a.is_empty())
    {
        user.push_str(&format!("- Write for this audience: {audience}\n"));
    }
    if let Some(level) = request.content_complexity {
        user.push_str(&format!("- Pitch the material at a {level} level\n"));
    }

    PromptText {
        system: CONTENT_SYSTEM_PROMPT.to_string(),
        user,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(question_type: QuestionType) -> QuestionSpec {
        QuestionSpec::new(question_type, Difficulty::Medium, 5)
    }

    #[test]
    fn prompt_is_deterministic() {
        let s = spec(QuestionType::MatchingPairs).with_flags(QuestionFlags {
            include_explanations: true,
            include_tags: true,
            time_estimates: true,
        });
        let a = build_question_prompt("Photosynthesis converts light.", &s);
        let b = build_question_prompt("Photosynthesis converts light.", &s);
        assert_eq!(a, b);
    }

    #[test]
    fn prompt_carries_count_type_and_content() {
        let p = build_question_prompt("The mitochondria makes ATP.", &spec(QuestionType::SingleChoice));
        assert!(p.user.contains("create 5 high-quality medium singleChoice questions"));
        assert!(p.user.contains("The mitochondria makes ATP."));
        assert!(p.user.contains("exactly 4 options"));
        assert!(p.user.contains("\"correctAnswer\""));
        assert!(p.user.contains("Return ONLY a valid JSON object"));
        assert_eq!(p.system, QUESTION_SYSTEM_PROMPT);
    }

    #[test]
    fn each_type_selects_its_own_example() {
        let cases = [
            (QuestionType::SingleChoice, "\"correctAnswer\""),
            (QuestionType::MultipleChoice, "\"correctAnswers\""),
            (QuestionType::MatchingPairs, "\"correctPairs\""),
            (QuestionType::TrueFalse, "\"isTrue\""),
            (QuestionType::FillInBlank, "\"textWithBlanks\""),
            (QuestionType::Essay, "\"rubric\""),
        ];
        for (qt, marker) in cases {
            let p = build_question_prompt("content", &spec(qt));
            assert!(p.user.contains(marker), "{qt} prompt lacks {marker}");
        }
    }

    #[test]
    fn difficulty_selects_guidelines() {
        let easy = build_question_prompt(
            "c",
            &QuestionSpec::new(QuestionType::TrueFalse, Difficulty::Easy, 3),
        );
        let hard = build_question_prompt(
            "c",
            &QuestionSpec::new(QuestionType::TrueFalse, Difficulty::Hard, 3),
        );
        assert!(easy.user.contains("recall and basic understanding"));
        assert!(hard.user.contains("evaluation and synthesis"));
        assert!(!easy.user.contains("evaluation and synthesis"));
    }

    #[test]
    fn flags_append_fragments_only_when_requested() {
        let plain = build_question_prompt("c", &spec(QuestionType::Essay));
        assert!(!plain.user.contains("ADDITIONAL FIELDS"));

        let flagged = build_question_prompt(
            "c",
            &spec(QuestionType::Essay).with_flags(QuestionFlags {
                include_explanations: true,
                include_tags: false,
                time_estimates: true,
            }),
        );
        assert!(flagged.user.contains("\"explanation\""));
        assert!(flagged.user.contains("\"estimatedTimeSeconds\""));
        assert!(!flagged.user.contains("\"tags\" field"));
    }

    #[test]
    fn content_prompt_mentions_audience_and_level() {
        let mut req = ContentRequest::new("Physics", "Optics");
        req.target_audience = Some("high school students".into());
        req.content_complexity = Some(crate::model::ComplexityLevel::Beginner);
        let p = build_content_prompt(&req);
        assert!(p.user.contains("\"Physics\""));
        assert!(p.user.contains("\"Optics\""));
        assert!(p.user.contains("high school students"));
        assert!(p.user.contains("beginner level"));
    }

    #[test]
    fn analysis_prompt_asks_for_json() {
        let p = build_analysis_prompt("Some text.");
        assert!(p.user.contains("readabilityScore"));
        assert!(p.user.contains("Some text."));
        assert_eq!(p.system, ANALYSIS_SYSTEM_PROMPT);
    }
}
