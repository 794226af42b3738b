//! The `lessonforge export` command.

use std::path::PathBuf;

use anyhow::Result;

use lessonforge_core::course::CourseModule;
use lessonforge_export::{write_export, ExportFormat, ExportSettings};

pub fn execute(
    module_path: PathBuf,
    format: ExportFormat,
    output: Option<PathBuf>,
    no_answers: bool,
    no_explanations: bool,
    answer_key: bool,
) -> Result<()> {
    let module = CourseModule::load_json(&module_path)?;
    let settings = ExportSettings {
        format,
        include_answers: !no_answers,
        include_explanations: !no_explanations,
        separate_answer_key: answer_key,
    };

    let output = output.unwrap_or_else(|| module_path.with_extension(format.extension()));
    if output == module_path {
        anyhow::bail!("refusing to overwrite the module file; pass --output");
    }

    write_export(&module, &settings, &output)?;
    println!(
        "Exported \"{}\" ({} lessons) as {} to {}",
        module.title,
        module.lessons.len(),
        format,
        output.display()
    );
    Ok(())
}
