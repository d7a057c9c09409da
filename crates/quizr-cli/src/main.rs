mod cli;
mod context;
mod handlers;
mod output;

use clap::{CommandFactory, Parser};
use cli::{Cli, Commands};
use context::CliContext;
use quizr_core::{AppConfig, QuizResult, StorageBackend};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load();

    if let Ok(log_path) = std::env::var("QUIZR_DEBUG_LOG") {
        let log_file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;

        tracing_subscriber::fmt()
            .with_writer(log_file)
            .with_max_level(tracing::Level::DEBUG)
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .with_ansi(false)
            .init();
    } else {
        // stdout carries the JSON responses
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(config.effective_log_filter()));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }

    let cli = Cli::parse();

    match cli.command {
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "quizr", &mut std::io::stdout());
        }
        Commands::Question(question_cmd) => {
            let file_path: PathBuf = cli
                .file
                .or_else(|| config.default_file.clone())
                .ok_or_else(|| anyhow::anyhow!("--file is required for CLI operations"))?;
            let backend: StorageBackend = cli.backend.map(Into::into).unwrap_or(config.backend);

            let ctx = match CliContext::open(&file_path, backend).await {
                Ok(ctx) => ctx,
                Err(e) => output::output_error(&e.to_string()),
            };

            let result = handlers::question::handle(&ctx, question_cmd.action).await;
            if let Err(message) = outcome(result, ctx.close().await) {
                output::output_error(&message);
            }
        }
    }

    Ok(())
}

/// Message to report for a finished command. A handler failure takes
/// precedence over a failure to close the store.
fn outcome(result: anyhow::Result<()>, closed: QuizResult<()>) -> Result<(), String> {
    match (result, closed) {
        (Err(e), Err(close_err)) => {
            tracing::warn!("Failed to close store: {}", close_err);
            Err(e.to_string())
        }
        (Err(e), Ok(())) => Err(e.to_string()),
        (Ok(()), Err(close_err)) => Err(close_err.to_string()),
        (Ok(()), Ok(())) => Ok(()),
    }
}
