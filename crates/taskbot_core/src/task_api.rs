use crate::error::AppError;
use crate::model::{Task, TaskStatus};
use crate::storage::json_store;
use std::path::Path;
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};

/// Result of a read-only query. An empty match is reported as a message,
/// never as an empty list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskQuery {
    Found(Vec<Task>),
    NotFound(String),
}

impl TaskQuery {
    fn from_matches(tasks: Vec<Task>, empty_message: impl FnOnce() -> String) -> Self {
        if tasks.is_empty() {
            Self::NotFound(empty_message())
        } else {
            Self::Found(tasks)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkOutcome {
    Started(Task),
    NotFound { name: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompleteOutcome {
    Completed { task: Task, date: String },
    NotFound { name: String },
    NotInProgress(Task),
}

pub fn mark_in_progress(path: &Path, name: &str) -> Result<MarkOutcome, AppError> {
    let trimmed_name = required_name(name)?;

    let mut state = json_store::load_state(path)?;
    let started = match state.find_mut(trimmed_name) {
        Some(task) => {
            task.status = TaskStatus::InProgress;
            task.clone()
        }
        None => {
            tracing::info!(name = trimmed_name, "task not found");
            return Ok(MarkOutcome::NotFound {
                name: trimmed_name.to_string(),
            });
        }
    };

    json_store::save_state(path, &state)?;
    tracing::info!(name = %started.name, "task is now in progress");

    Ok(MarkOutcome::Started(started))
}

pub fn complete_task(path: &Path, name: &str) -> Result<CompleteOutcome, AppError> {
    let date = today()?;
    complete_task_on(path, name, &date)
}

pub fn complete_task_on(path: &Path, name: &str, date: &str) -> Result<CompleteOutcome, AppError> {
    let trimmed_name = required_name(name)?;

    let mut state = json_store::load_state(path)?;
    let completed = match state.find_mut(trimmed_name) {
        Some(task) if task.status == TaskStatus::InProgress => {
            task.history.push(date.to_string());
            task.status = TaskStatus::Completed;
            task.clone()
        }
        Some(task) => {
            tracing::info!(name = %task.name, status = task.status.label(), "task is not in progress");
            return Ok(CompleteOutcome::NotInProgress(task.clone()));
        }
        None => {
            tracing::info!(name = trimmed_name, "task not found");
            return Ok(CompleteOutcome::NotFound {
                name: trimmed_name.to_string(),
            });
        }
    };

    json_store::save_state(path, &state)?;
    tracing::info!(name = %completed.name, date, "task completed");

    Ok(CompleteOutcome::Completed {
        task: completed,
        date: date.to_string(),
    })
}

pub fn tasks_by_date(path: &Path, date: &str) -> Result<TaskQuery, AppError> {
    let date = date.trim();
    let tasks = json_store::load_tasks(path)?;
    let matches = tasks
        .into_iter()
        .filter(|task| task.history.iter().any(|entry| entry == date))
        .collect();

    Ok(TaskQuery::from_matches(matches, || {
        format!("No tasks recorded for {date}.")
    }))
}

pub fn tasks_by_category(path: &Path, category: &str) -> Result<TaskQuery, AppError> {
    let category = category.trim();
    let tasks = json_store::load_tasks(path)?;
    let matches = tasks
        .into_iter()
        .filter(|task| task.in_category(category))
        .collect();

    Ok(TaskQuery::from_matches(matches, || {
        format!("No tasks found in the category '{category}'.")
    }))
}

pub fn pending_tasks(path: &Path) -> Result<TaskQuery, AppError> {
    tasks_with_status(path, TaskStatus::Pending, "No pending tasks!")
}

pub fn in_progress_tasks(path: &Path) -> Result<TaskQuery, AppError> {
    tasks_with_status(path, TaskStatus::InProgress, "No tasks in progress!")
}

/// All tasks, most recently completed first. Ties keep file order.
pub fn all_tasks_sorted(path: &Path) -> Result<TaskQuery, AppError> {
    let mut tasks = json_store::load_tasks(path)?;
    sort_by_recency(&mut tasks);

    Ok(TaskQuery::from_matches(tasks, || {
        "No tasks found!".to_string()
    }))
}

fn tasks_with_status(
    path: &Path,
    status: TaskStatus,
    empty_message: &str,
) -> Result<TaskQuery, AppError> {
    let tasks = json_store::load_tasks(path)?;
    let matches = tasks
        .into_iter()
        .filter(|task| task.status == status)
        .collect();

    Ok(TaskQuery::from_matches(matches, || {
        empty_message.to_string()
    }))
}

fn sort_by_recency(tasks: &mut [Task]) {
    tasks.sort_by(|left, right| right.last_done().cmp(left.last_done()));
}

fn required_name(name: &str) -> Result<&str, AppError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(AppError::invalid_input("task name is required"));
    }
    Ok(trimmed)
}

/// Local calendar date as `YYYY-MM-DD`.
pub fn today() -> Result<String, AppError> {
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    OffsetDateTime::now_utc()
        .to_offset(offset)
        .date()
        .format(format_description!("[year]-[month]-[day]"))
        .map_err(|err| AppError::invalid_data(err.to_string()))
}
