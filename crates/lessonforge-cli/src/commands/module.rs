//! The `lessonforge module` subcommands.

use std::path::Path;

use anyhow::{Context, Result};
use comfy_table::{Cell, Table};

use lessonforge_core::course::CourseModule;
use lessonforge_core::model::ContentRequest;
use lessonforge_core::normalize::count_words;
use lessonforge_core::statistics::module_stats;

use crate::ModuleCommand;

pub async fn execute(command: ModuleCommand) -> Result<()> {
    match command {
        ModuleCommand::New {
            title,
            description,
            output,
        } => {
            if output.exists() {
                anyhow::bail!("{} already exists", output.display());
            }
            let module = CourseModule::new(&title, &description)?;
            module.save_json(&output)?;
            println!("Created module \"{}\" at {}", module.title, output.display());
            Ok(())
        }
        ModuleCommand::AddLesson {
            module: path,
            title,
            content_file,
            topic,
            subtopic,
            analyze,
            questions,
            spec,
            provider,
        } => {
            let mut module = CourseModule::load_json(&path)?;
            let needs_service = topic.is_some() || analyze || questions > 0;
            let service = if needs_service {
                Some(super::build_service(&provider)?.1)
            } else {
                None
            };

            let lesson = match (topic, subtopic, content_file) {
                // Full generation: write, then analyze and question concurrently.
                (Some(topic), Some(subtopic), _) if analyze && questions > 0 => {
                    let service = service.as_ref().context("no provider available")?;
                    let request = ContentRequest::new(topic, subtopic);
                    let spec = super::question_spec(&spec, questions);
                    let mut draft = service.build_lesson(&request, &spec).await?;
                    if let Some(title) = title {
                        draft.title = title;
                    }
                    module.add_draft(draft)
                }
                (topic, subtopic, content_file) => {
                    let (content, default_title) = match (topic, subtopic, content_file) {
                        (Some(topic), Some(subtopic), _) => {
                            let request = ContentRequest::new(topic, subtopic.clone());
                            let service = service.as_ref().context("no provider available")?;
                            (service.generate_content(&request).await?, subtopic)
                        }
                        (_, _, Some(file)) => (super::read_content(&file)?, String::new()),
                        _ => anyhow::bail!(
                            "either --content-file or --topic/--subtopic is required"
                        ),
                    };
                    if content.trim().is_empty() {
                        anyhow::bail!("lesson content is empty");
                    }

                    let (analytics, generated) = match &service {
                        Some(service) => {
                            let analytics = if analyze {
                                Some(service.analyze_content(&content).await?)
                            } else {
                                None
                            };
                            let generated = if questions > 0 {
                                let spec = super::question_spec(&spec, questions);
                                Some(service.generate_questions(&content, &spec).await?)
                            } else {
                                None
                            };
                            (analytics, generated)
                        }
                        None => (None, None),
                    };

                    let title = title.unwrap_or(default_title);
                    let lesson = module.add_lesson(&title, content);
                    lesson.analytics = analytics;
                    lesson.questions = generated;
                    &*lesson
                }
            };
            let summary = format!(
                "Added lesson {} \"{}\" ({} words, {} questions)",
                lesson.order + 1,
                lesson.title,
                count_words(&lesson.content),
                lesson.questions.as_ref().map_or(0, Vec::len)
            );

            module.save_json(&path)?;
            println!("{summary}");
            Ok(())
        }
        ModuleCommand::RemoveLesson {
            module: path,
            lesson,
        } => {
            let mut module = CourseModule::load_json(&path)?;
            let id = lesson_id(&module, lesson)?;
            if let Some(removed) = module.remove_lesson(&id) {
                println!("Removed lesson \"{}\"", removed.title);
            }
            module.save_json(&path)
        }
        ModuleCommand::MoveLesson {
            module: path,
            lesson,
            to,
        } => {
            let mut module = CourseModule::load_json(&path)?;
            let id = lesson_id(&module, lesson)?;
            if to == 0 {
                anyhow::bail!("positions start at 1");
            }
            module.move_lesson(&id, to - 1);
            module.save_json(&path)?;
            print_lessons(&module);
            Ok(())
        }
        ModuleCommand::Show { module: path } => show(&path),
    }
}

/// Resolve a 1-based lesson position to its id.
fn lesson_id(module: &CourseModule, position: usize) -> Result<String> {
    position
        .checked_sub(1)
        .and_then(|i| module.lessons.get(i))
        .map(|l| l.id.clone())
        .with_context(|| {
            format!(
                "no lesson at position {position} (module has {})",
                module.lessons.len()
            )
        })
}

fn print_lessons(module: &CourseModule) {
    let mut table = Table::new();
    table.set_header(vec!["#", "Title", "Words", "Questions", "Readability"]);
    for lesson in &module.lessons {
        table.add_row(vec![
            Cell::new(lesson.order + 1),
            Cell::new(&lesson.title),
            Cell::new(count_words(&lesson.content)),
            Cell::new(lesson.questions.as_ref().map_or(0, Vec::len)),
            Cell::new(
                lesson
                    .analytics
                    .as_ref()
                    .map(|a| format!("{:.0}", a.readability_score))
                    .unwrap_or_else(|| "-".to_string()),
            ),
        ]);
    }
    println!("{table}");
}

fn show(path: &Path) -> Result<()> {
    let module = CourseModule::load_json(path)?;
    println!("{}", module.title);
    if !module.description.is_empty() {
        println!("{}", module.description);
    }
    println!();
    print_lessons(&module);

    let stats = module_stats(&module);
    println!(
        "\n{} lessons, {} words (avg {}), ~{} min reading",
        stats.lessons, stats.total_words, stats.avg_words_per_lesson, stats.total_reading_minutes
    );
    if let Some(readability) = stats.avg_readability {
        println!("Average readability: {readability:.0}/100");
    }
    if stats.questions.total > 0 {
        let by_type: Vec<String> = stats
            .questions
            .by_type
            .iter()
            .map(|(t, n)| format!("{t}: {n}"))
            .collect();
        println!("{} questions ({})", stats.questions.total, by_type.join(", "));
    }
    Ok(())
}
