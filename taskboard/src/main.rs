//! Kanban task board on the command line.
//!
//! Loads the board from the task API, runs one action, and prints the
//! resulting columns. Configuration via CLI flags, environment variables,
//! or config file (`~/.config/taskboard/config.toml`).
//!
//! ```bash
//! # Show the board served by a local taskboard-server
//! cargo run --bin taskboard -- list
//!
//! # Drag task 1 onto task 4
//! cargo run --bin taskboard -- move 1 --onto 4
//!
//! # Try it without a server
//! cargo run --bin taskboard -- --offline move 1 --onto 3
//! ```

use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing_appender::non_blocking::WorkerGuard;

use taskboard::api::{HttpTaskApi, MemoryTaskApi, TaskApi};
use taskboard::board::{Board, BoardError, DragEnd, DragOutcome, TaskStore, columns};
use taskboard::config::{CliArgs, ClientConfig, Command};
use taskboard::notify::Notifier;
use taskboard_proto::{NewTask, TaskEdit};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = CliArgs::parse();

    let config = match ClientConfig::load(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    // Logs go to a file so stdout only carries the board.
    let _log_guard = init_logging(&cli.log_level, cli.log_file.as_deref());

    let api: Arc<dyn TaskApi> = if config.offline {
        tracing::info!("running against the offline demo board");
        Arc::new(MemoryTaskApi::demo())
    } else {
        match HttpTaskApi::new(&config.api_url) {
            Ok(api) => Arc::new(api),
            Err(e) => {
                eprintln!("error: {e}");
                return ExitCode::FAILURE;
            }
        }
    };
    tracing::info!(api_url = %config.api_url, offline = config.offline, "taskboard starting");

    let (notifier, mut notices) = Notifier::channel(config.notice_buffer);
    let board = Board::new(api, notifier);

    let result = run(&board, cli.command.unwrap_or(Command::List)).await;

    while let Ok(notice) = notices.try_recv() {
        eprintln!("{notice}");
    }

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "command failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Initialize file-based logging.
///
/// Returns a [`WorkerGuard`] that must be held until shutdown to ensure all
/// buffered log entries are flushed.
fn init_logging(level: &str, file_path: Option<&Path>) -> Option<WorkerGuard> {
    let default_path = std::env::temp_dir().join("taskboard.log");
    let log_path = file_path.unwrap_or(&default_path);

    let log_dir = log_path.parent()?;
    let file_name = log_path.file_name()?.to_str()?;

    let file_appender = tracing_appender::rolling::never(log_dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(env_filter)
        .with_ansi(false)
        .init();

    Some(guard)
}

/// Loads the board, runs `command`, and prints the board afterwards.
async fn run(board: &Board, command: Command) -> Result<(), BoardError> {
    board.refresh().await?;

    match command {
        Command::List => {}
        Command::Add {
            title,
            description,
            status,
            priority,
            due,
        } => {
            let mut task = NewTask::new(title, status)
                .with_description(description)
                .with_priority(priority);
            if let Some(due) = due {
                task = task.with_due_date(due);
            }
            let id = board.add_task(task).await?;
            println!("Created task {id}.\n");
        }
        Command::Edit {
            id,
            title,
            description,
            priority,
            due,
            clear_due,
        } => {
            let edit = TaskEdit {
                title,
                description,
                priority,
                due_date: if clear_due { Some(None) } else { due.map(Some) },
            };
            board.edit_task(id, &edit).await?;
        }
        Command::Delete { id } => board.delete_task(id).await?,
        Command::Move { active, onto } => {
            let outcome = board.drag_end(DragEnd { active, over: onto }).await;
            match outcome {
                DragOutcome::NoOp => println!("Nothing to move.\n"),
                DragOutcome::Persisted { task, .. } => {
                    println!(
                        "Moved task {} to {} at position {}.\n",
                        task.id,
                        task.status.title(),
                        task.order.saturating_add(1)
                    );
                }
                DragOutcome::RolledBack { error, .. } => return Err(error.into()),
            }
        }
    }

    print_board(board.store());
    Ok(())
}

fn print_board(store: &TaskStore) {
    let tasks = store.snapshot();
    for (status, cards) in columns(&tasks) {
        println!("{} ({})", status.title(), cards.len());
        for task in cards {
            let due = task
                .due_date
                .map(|d| format!(", due {d}"))
                .unwrap_or_default();
            println!("  [{}] {} ({}{due})", task.id, task.title, task.priority);
            if !task.description.is_empty() {
                println!("      {}", task.description);
            }
        }
        println!();
    }
}
