use crate::error::AppError;
use crate::model::Task;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

pub const STORE_ENV_VAR: &str = "TASKBOT_STORE_PATH";
const STORE_FILE_NAME: &str = "schedule.json";

/// The whole persisted document. Top-level keys other than `tasks` are
/// carried through untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskState {
    pub tasks: Vec<Task>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TaskState {
    pub fn new(tasks: Vec<Task>) -> Self {
        Self {
            tasks,
            extra: Map::new(),
        }
    }

    pub fn find_mut(&mut self, name: &str) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|task| task.matches_name(name))
    }
}

pub fn store_path(configured: Option<&str>) -> PathBuf {
    resolve_store_path(std::env::var(STORE_ENV_VAR).ok(), configured)
}

fn resolve_store_path(env_value: Option<String>, configured: Option<&str>) -> PathBuf {
    if let Some(path) = env_value
        && !path.trim().is_empty()
    {
        return PathBuf::from(path);
    }

    if let Some(path) = configured
        && !path.trim().is_empty()
    {
        return PathBuf::from(path);
    }

    PathBuf::from(STORE_FILE_NAME)
}

pub fn load_tasks(path: &Path) -> Result<Vec<Task>, AppError> {
    Ok(load_state(path)?.tasks)
}

pub fn load_state(path: &Path) -> Result<TaskState, AppError> {
    if !path.exists() {
        return Err(AppError::source_not_found(format!(
            "task file {} does not exist",
            path.display()
        )));
    }

    let content = std::fs::read_to_string(path)
        .map_err(|err| AppError::io(format!("{}: {}", path.display(), err)))?;
    let state: TaskState = serde_json::from_str(&content).map_err(|err| {
        AppError::source_malformed(format!("invalid task file {}: {}", path.display(), err))
    })?;

    tracing::debug!(path = %path.display(), tasks = state.tasks.len(), "loaded task file");
    Ok(state)
}

pub fn save_state(path: &Path, state: &TaskState) -> Result<(), AppError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|err| AppError::io(err.to_string()))?;
    }

    let mut content = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut content, formatter);
    state
        .serialize(&mut serializer)
        .map_err(|err| AppError::invalid_data(err.to_string()))?;

    std::fs::write(path, content)
        .map_err(|err| AppError::io(format!("{}: {}", path.display(), err)))?;

    tracing::debug!(path = %path.display(), tasks = state.tasks.len(), "saved task file");
    Ok(())
}
