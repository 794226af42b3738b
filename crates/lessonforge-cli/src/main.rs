//! lessonforge CLI — generate quizzes and lesson content from the terminal,
//! or serve the same pipelines over HTTP.

use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};

use lessonforge_core::model::{ComplexityLevel, Difficulty, QuestionType};
use lessonforge_export::ExportFormat;

mod commands;

#[derive(Parser)]
#[command(
    name = "lessonforge",
    version,
    about = "AI-assisted quiz and course content generator"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Which upstream model to talk to.
#[derive(Args, Debug, Clone)]
pub struct ProviderArgs {
    /// Provider name from the config ("openai", "anthropic", "ollama", "mock")
    #[arg(long)]
    provider: Option<String>,

    /// Model identifier (defaults to `default_model` from the config)
    #[arg(long)]
    model: Option<String>,

    /// Config file path
    #[arg(long)]
    config: Option<PathBuf>,
}

/// What kind of questions to generate.
#[derive(Args, Debug, Clone)]
pub struct QuestionArgs {
    /// Question type: singleChoice, multipleChoice, matchingPairs, trueFalse, fillInBlank, essay
    #[arg(long = "type", default_value = "singleChoice")]
    question_type: QuestionType,

    /// Difficulty: easy, medium, hard
    #[arg(long, default_value = "medium")]
    difficulty: Difficulty,

    /// Ask for an explanation per question
    #[arg(long)]
    explanations: bool,

    /// Ask for topic tags per question
    #[arg(long)]
    tags: bool,

    /// Ask for a time estimate per question
    #[arg(long)]
    time_estimates: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the JSON HTTP API
    Serve {
        /// Address to listen on (defaults to `[server] bind` from the config)
        #[arg(long)]
        bind: Option<String>,

        #[command(flatten)]
        provider: ProviderArgs,
    },

    /// Generate questions about a piece of content
    Questions {
        /// File with the source content ("-" reads stdin)
        #[arg(long)]
        content_file: PathBuf,

        /// Number of questions
        #[arg(long, default_value = "5")]
        count: u32,

        #[command(flatten)]
        spec: QuestionArgs,

        /// Output format: json or markdown
        #[arg(long, default_value = "json")]
        format: ExportFormat,

        /// Write the questions here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        provider: ProviderArgs,
    },

    /// Analyze readability and key terms of a piece of content
    Analyze {
        /// File with the content ("-" reads stdin)
        #[arg(long)]
        content_file: PathBuf,

        /// Print the analytics as JSON instead of a table
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        provider: ProviderArgs,
    },

    /// Write a lesson text for a topic and subtopic
    Content {
        #[arg(long)]
        topic: String,

        #[arg(long)]
        subtopic: String,

        /// Intended readers, e.g. "high school students"
        #[arg(long)]
        audience: Option<String>,

        /// beginner, intermediate or advanced
        #[arg(long)]
        complexity: Option<ComplexityLevel>,

        /// Write the content here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        provider: ProviderArgs,
    },

    /// Create and edit course modules stored as JSON files
    Module {
        #[command(subcommand)]
        command: ModuleCommand,
    },

    /// Export a course module as Markdown, HTML or JSON
    Export {
        /// Module JSON file
        #[arg(long)]
        module: PathBuf,

        /// Output format: markdown, html, json
        #[arg(long, default_value = "markdown")]
        format: ExportFormat,

        /// Output path (defaults to the module path with the format's extension)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Leave answers out (student copy)
        #[arg(long)]
        no_answers: bool,

        /// Leave explanations out
        #[arg(long)]
        no_explanations: bool,

        /// Put answers in a trailing answer key instead of after each question
        #[arg(long)]
        answer_key: bool,
    },

    /// List available models
    ListModels {
        /// Filter to specific provider
        #[arg(long)]
        provider: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create a starter config
    Init,
}

#[derive(Subcommand)]
enum ModuleCommand {
    /// Create an empty module
    New {
        #[arg(long)]
        title: String,

        #[arg(long, default_value = "")]
        description: String,

        /// Where to write the module JSON
        #[arg(long)]
        output: PathBuf,
    },

    /// Append a lesson, from a file or generated from a topic
    AddLesson {
        /// Module JSON file
        #[arg(long)]
        module: PathBuf,

        /// Lesson title ("Lesson N" when omitted)
        #[arg(long)]
        title: Option<String>,

        /// Lesson content file ("-" reads stdin)
        #[arg(long, conflicts_with = "topic")]
        content_file: Option<PathBuf>,

        /// Generate the content for this topic (requires --subtopic)
        #[arg(long, requires = "subtopic")]
        topic: Option<String>,

        #[arg(long, requires = "topic")]
        subtopic: Option<String>,

        /// Run content analysis on the lesson
        #[arg(long)]
        analyze: bool,

        /// Generate this many questions for the lesson
        #[arg(long, default_value = "0")]
        questions: u32,

        #[command(flatten)]
        spec: QuestionArgs,

        #[command(flatten)]
        provider: ProviderArgs,
    },

    /// Remove a lesson by its 1-based position
    RemoveLesson {
        #[arg(long)]
        module: PathBuf,

        #[arg(long)]
        lesson: usize,
    },

    /// Move a lesson to another 1-based position
    MoveLesson {
        #[arg(long)]
        module: PathBuf,

        #[arg(long)]
        lesson: usize,

        #[arg(long)]
        to: usize,
    },

    /// Print lessons and statistics
    Show {
        #[arg(long)]
        module: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("lessonforge=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Serve { bind, provider } => commands::serve::execute(bind, provider).await,
        Commands::Questions {
            content_file,
            count,
            spec,
            format,
            output,
            provider,
        } => commands::questions::execute(content_file, count, spec, format, output, provider).await,
        Commands::Analyze {
            content_file,
            json,
            provider,
        } => commands::analyze::execute(content_file, json, provider).await,
        Commands::Content {
            topic,
            subtopic,
            audience,
            complexity,
            output,
            provider,
        } => commands::content::execute(topic, subtopic, audience, complexity, output, provider).await,
        Commands::Module { command } => commands::module::execute(command).await,
        Commands::Export {
            module,
            format,
            output,
            no_answers,
            no_explanations,
            answer_key,
        } => commands::export::execute(
            module,
            format,
            output,
            no_answers,
            no_explanations,
            answer_key,
        ),
        Commands::ListModels { provider, config } => {
            commands::list_models::execute(provider, config).await
        }
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
