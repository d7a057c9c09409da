use clap::{Args, Parser, Subcommand, ValueEnum};
use quizr_core::StorageBackend;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "quizr")]
#[command(about = "Manage quiz questions and their answer options", long_about = None)]
#[command(version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("GIT_COMMIT_HASH"), ")"))]
pub struct Cli {
    /// Path to the question store (or set QUIZR_FILE env var)
    #[arg(long, global = true, value_name = "FILE", env = "QUIZR_FILE")]
    pub file: Option<PathBuf>,

    /// Storage backend; defaults to the config file setting, then json
    #[arg(long, global = true, value_enum, env = "QUIZR_BACKEND")]
    pub backend: Option<BackendArg>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum BackendArg {
    Json,
    Sqlite,
}

impl From<BackendArg> for StorageBackend {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::Json => StorageBackend::Json,
            BackendArg::Sqlite => StorageBackend::Sqlite,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Question operations
    Question(QuestionCommand),
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Args)]
pub struct QuestionCommand {
    #[command(subcommand)]
    pub action: QuestionAction,
}

#[derive(Subcommand)]
pub enum QuestionAction {
    /// Create a new question
    Create(QuestionCreateArgs),
    /// List all questions
    List,
    /// Get a specific question
    Get {
        #[arg(long)]
        id: String,
    },
    /// Update a question's prompt and answer options
    Update(QuestionUpdateArgs),
}

#[derive(Args)]
pub struct QuestionCreateArgs {
    #[arg(long)]
    pub prompt: String,
    /// Incorrect answer option (repeatable)
    #[arg(long = "option", value_name = "ANSWER")]
    pub options: Vec<String>,
    /// Correct answer option (repeatable)
    #[arg(long = "correct-option", value_name = "ANSWER")]
    pub correct_options: Vec<String>,
}

#[derive(Args)]
pub struct QuestionUpdateArgs {
    #[arg(long)]
    pub id: String,
    #[arg(long)]
    pub prompt: Option<String>,
    /// Add an incorrect answer option (repeatable)
    #[arg(long = "add-option", value_name = "ANSWER")]
    pub add_options: Vec<String>,
    /// Add a correct answer option (repeatable)
    #[arg(long = "add-correct-option", value_name = "ANSWER")]
    pub add_correct_options: Vec<String>,
    /// Remove the answer option with this id (repeatable)
    #[arg(long = "remove-option", value_name = "OPTION_ID")]
    pub remove_options: Vec<String>,
    /// Replace an option's answer text (repeatable)
    #[arg(long = "set-answer", value_name = "OPTION_ID=ANSWER", value_parser = parse_key_val)]
    pub set_answers: Vec<(String, String)>,
    /// Mark an answer option as correct (repeatable)
    #[arg(long = "mark-correct", value_name = "OPTION_ID")]
    pub mark_correct: Vec<String>,
    /// Mark an answer option as incorrect (repeatable)
    #[arg(long = "mark-incorrect", value_name = "OPTION_ID")]
    pub mark_incorrect: Vec<String>,
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected OPTION_ID=ANSWER, got '{}'", s))?;
    if key.is_empty() {
        return Err(format!("missing option id in '{}'", s));
    }
    Ok((key.to_string(), value.to_string()))
}
