use crate::cli::TaskCommand;
use std::io::Write;
use std::path::Path;
use taskbot_core::error::AppError;
use taskbot_core::model::Task;
use taskbot_core::task_api::{self, CompleteOutcome, MarkOutcome, TaskQuery};

/// Execute one task command against the store and print its outcome.
pub fn run_command<W: Write>(
    store: &Path,
    command: &TaskCommand,
    json: bool,
    out: &mut W,
) -> Result<(), AppError> {
    tracing::debug!(?command, store = %store.display(), "running task command");

    match command {
        TaskCommand::ByDate(date) => print_query(&task_api::tasks_by_date(store, date)?, json, out),
        TaskCommand::ByCategory(category) => {
            print_query(&task_api::tasks_by_category(store, category)?, json, out)
        }
        TaskCommand::Pending => print_query(&task_api::pending_tasks(store)?, json, out),
        TaskCommand::InProgress => print_query(&task_api::in_progress_tasks(store)?, json, out),
        TaskCommand::AllSorted => print_query(&task_api::all_tasks_sorted(store)?, json, out),
        TaskCommand::MarkInProgress(name) => {
            print_mark(&task_api::mark_in_progress(store, name)?, json, out)
        }
        TaskCommand::Complete(name) => {
            print_complete(&task_api::complete_task(store, name)?, json, out)
        }
    }
}

fn task_line(task: &Task) -> String {
    let last_done = task.history.iter().max().map_or("-", String::as_str);
    format!(
        "{} | {} | {} | {}",
        task.name,
        task.category,
        task.status.label(),
        last_done
    )
}

fn print_query<W: Write>(query: &TaskQuery, json: bool, out: &mut W) -> Result<(), AppError> {
    match query {
        TaskQuery::Found(tasks) if json => {
            let payload =
                serde_json::to_string(tasks).map_err(|err| AppError::invalid_data(err.to_string()))?;
            writeln!(out, "{payload}")?;
        }
        TaskQuery::Found(tasks) => {
            for task in tasks {
                writeln!(out, "{}", task_line(task))?;
            }
        }
        TaskQuery::NotFound(message) if json => {
            let payload = serde_json::json!({ "outcome": "no_tasks", "message": message });
            writeln!(out, "{payload}")?;
        }
        TaskQuery::NotFound(message) => writeln!(out, "{message}")?,
    }

    Ok(())
}

fn print_mark<W: Write>(outcome: &MarkOutcome, json: bool, out: &mut W) -> Result<(), AppError> {
    if json {
        let payload = match outcome {
            MarkOutcome::Started(task) => serde_json::json!({ "outcome": "in_progress", "task": task }),
            MarkOutcome::NotFound { name } => serde_json::json!({ "outcome": "not_found", "name": name }),
        };
        writeln!(out, "{payload}")?;
        return Ok(());
    }

    match outcome {
        MarkOutcome::Started(task) => writeln!(out, "Task '{}' is now in progress.", task.name)?,
        MarkOutcome::NotFound { name } => writeln!(out, "Task '{name}' not found.")?,
    }
    Ok(())
}

fn print_complete<W: Write>(
    outcome: &CompleteOutcome,
    json: bool,
    out: &mut W,
) -> Result<(), AppError> {
    if json {
        let payload = match outcome {
            CompleteOutcome::Completed { task, date } => {
                serde_json::json!({ "outcome": "completed", "date": date, "task": task })
            }
            CompleteOutcome::NotInProgress(task) => {
                serde_json::json!({ "outcome": "not_in_progress", "task": task })
            }
            CompleteOutcome::NotFound { name } => {
                serde_json::json!({ "outcome": "not_found", "name": name })
            }
        };
        writeln!(out, "{payload}")?;
        return Ok(());
    }

    match outcome {
        CompleteOutcome::Completed { task, date } => {
            writeln!(out, "Task '{}' marked as completed on {date}.", task.name)?
        }
        CompleteOutcome::NotInProgress(task) => {
            writeln!(out, "Task '{}' is not in progress yet.", task.name)?
        }
        CompleteOutcome::NotFound { name } => writeln!(out, "Task '{name}' not found.")?,
    }
    Ok(())
}
