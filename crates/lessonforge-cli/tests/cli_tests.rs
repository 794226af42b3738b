//! CLI integration tests using assert_cmd. Everything runs against the
//! offline `mock` provider.

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn lessonforge(dir: &Path) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("lessonforge").unwrap();
    cmd.current_dir(dir)
        .env("HOME", dir)
        .env_remove("LESSONFORGE_OPENAI_KEY")
        .env_remove("LESSONFORGE_ANTHROPIC_KEY");
    cmd
}

fn read_json(path: &Path) -> serde_json::Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

const PASSAGE: &str = "Photosynthesis is how plants turn light, water and carbon dioxide into glucose and oxygen.";

#[test]
fn init_creates_config() {
    let dir = TempDir::new().unwrap();

    lessonforge(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created lessonforge.toml"));
    assert!(dir.path().join("lessonforge.toml").exists());

    lessonforge(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn questions_as_json() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("passage.txt"), PASSAGE).unwrap();

    let output = lessonforge(dir.path())
        .args(["questions", "--content-file", "passage.txt"])
        .args(["--type", "trueFalse", "--difficulty", "easy", "--count", "3"])
        .args(["--provider", "mock"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let body: serde_json::Value = serde_json::from_slice(&output).unwrap();
    let questions = body["questions"].as_array().unwrap();
    assert_eq!(questions.len(), 3);
    assert!(questions.iter().all(|q| q["type"] == "trueFalse" && q["difficulty"] == "easy"));
}

#[test]
fn questions_as_markdown_from_stdin() {
    let dir = TempDir::new().unwrap();

    lessonforge(dir.path())
        .args(["questions", "--content-file", "-", "--type", "singleChoice"])
        .args(["--count", "3", "--format", "markdown", "--provider", "mock"])
        .write_stdin(PASSAGE)
        .assert()
        .success()
        .stdout(predicate::str::contains("# Questions"))
        .stdout(predicate::str::contains("**Answer:** A. Chloroplast"));
}

#[test]
fn invalid_question_count_fails() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("passage.txt"), PASSAGE).unwrap();

    lessonforge(dir.path())
        .args(["questions", "--content-file", "passage.txt", "--count", "0"])
        .args(["--provider", "mock"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: invalid input"));
}

#[test]
fn unknown_question_type_is_rejected() {
    let dir = TempDir::new().unwrap();

    lessonforge(dir.path())
        .args(["questions", "--content-file", "x.txt", "--type", "crossword"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown question type"));
}

#[test]
fn unconfigured_provider_fails() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("passage.txt"), PASSAGE).unwrap();

    lessonforge(dir.path())
        .env_remove("OPENAI_API_KEY")
        .args(["analyze", "--content-file", "passage.txt", "--provider", "openai"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not configured"));
}

#[test]
fn analyze_prints_json() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("passage.txt"), PASSAGE).unwrap();

    let output = lessonforge(dir.path())
        .args(["analyze", "--content-file", "passage.txt", "--json", "--provider", "mock"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let analytics: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(analytics["wordCount"], 14);
    assert_eq!(analytics["estimatedReadingTimeMinutes"], 1);
    assert_eq!(analytics["complexityLevel"], "beginner");
}

#[test]
fn module_workflow() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("intro.md"), "# Intro\n\nPlants need light.").unwrap();

    lessonforge(dir.path())
        .args(["module", "new", "--title", "Plant Biology", "--output", "course.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created module \"Plant Biology\""));

    lessonforge(dir.path())
        .args(["module", "add-lesson", "--module", "course.json", "--content-file", "intro.md"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added lesson 1 \"Lesson 1\""));

    lessonforge(dir.path())
        .args(["module", "add-lesson", "--module", "course.json"])
        .args(["--topic", "Biology", "--subtopic", "Photosynthesis"])
        .args(["--analyze", "--questions", "3", "--type", "multipleChoice"])
        .args(["--provider", "mock"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added lesson 2 \"Photosynthesis\""))
        .stdout(predicate::str::contains("3 questions"));

    let module = read_json(&dir.path().join("course.json"));
    let lessons = module["lessons"].as_array().unwrap();
    assert_eq!(lessons.len(), 2);
    assert_eq!(lessons[1]["order"], 1);
    assert_eq!(lessons[1]["questions"].as_array().unwrap().len(), 3);
    assert!(lessons[1]["analytics"]["readabilityScore"].is_number());

    lessonforge(dir.path())
        .args(["module", "move-lesson", "--module", "course.json", "--lesson", "2", "--to", "1"])
        .assert()
        .success();
    let module = read_json(&dir.path().join("course.json"));
    assert_eq!(module["lessons"][0]["title"], "Photosynthesis");

    lessonforge(dir.path())
        .args(["module", "show", "--module", "course.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Plant Biology"))
        .stdout(predicate::str::contains("3 questions (multipleChoice: 3)"));

    lessonforge(dir.path())
        .args(["export", "--module", "course.json", "--format", "html", "--answer-key"])
        .assert()
        .success()
        .stdout(predicate::str::contains("as html"));
    let html = std::fs::read_to_string(dir.path().join("course.html")).unwrap();
    assert!(html.contains("<h2>Answer key</h2>"));

    lessonforge(dir.path())
        .args(["export", "--module", "course.json", "--output", "student.md", "--no-answers"])
        .assert()
        .success();
    let md = std::fs::read_to_string(dir.path().join("student.md")).unwrap();
    assert!(md.starts_with("# Plant Biology"));
    assert!(!md.contains("**Answer:**"));

    lessonforge(dir.path())
        .args(["module", "remove-lesson", "--module", "course.json", "--lesson", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed lesson \"Photosynthesis\""));
    let module = read_json(&dir.path().join("course.json"));
    assert_eq!(module["lessons"].as_array().unwrap().len(), 1);
    assert_eq!(module["lessons"][0]["order"], 0);
}

#[test]
fn remove_missing_lesson_fails() {
    let dir = TempDir::new().unwrap();

    lessonforge(dir.path())
        .args(["module", "new", "--title", "Empty", "--output", "empty.json"])
        .assert()
        .success();

    lessonforge(dir.path())
        .args(["module", "remove-lesson", "--module", "empty.json", "--lesson", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no lesson at position 1"));
}

#[test]
fn blank_module_title_fails() {
    let dir = TempDir::new().unwrap();

    lessonforge(dir.path())
        .args(["module", "new", "--title", "  ", "--output", "m.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("module title is required"));
}

#[test]
fn content_writes_file() {
    let dir = TempDir::new().unwrap();

    lessonforge(dir.path())
        .args(["content", "--topic", "Biology", "--subtopic", "Photosynthesis"])
        .args(["--output", "lesson.md", "--provider", "mock"])
        .assert()
        .success();
    let text = std::fs::read_to_string(dir.path().join("lesson.md")).unwrap();
    assert!(text.starts_with("# Photosynthesis"));
}

#[test]
fn list_mock_models() {
    let dir = TempDir::new().unwrap();

    lessonforge(dir.path())
        .args(["list-models", "--provider", "mock"])
        .assert()
        .success()
        .stdout(predicate::str::contains("mock-model"));
}

#[test]
fn help_output() {
    let dir = TempDir::new().unwrap();

    lessonforge(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("quiz and course content generator"));
}
