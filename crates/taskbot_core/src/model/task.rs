use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Last-done date assumed for tasks that were never completed.
pub const NEVER_DONE_SENTINEL: &str = "2000-01-01";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub name: String,
    pub category: String,
    pub status: TaskStatus,
    /// Completion dates (`YYYY-MM-DD`), append-only.
    #[serde(default)]
    pub history: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Task {
    pub fn new(name: &str, category: &str, status: TaskStatus) -> Self {
        Self {
            name: name.to_string(),
            category: category.to_string(),
            status,
            history: Vec::new(),
            extra: Map::new(),
        }
    }

    pub fn matches_name(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
    }

    pub fn in_category(&self, category: &str) -> bool {
        self.category.to_lowercase() == category.to_lowercase()
    }

    pub fn last_done(&self) -> &str {
        self.history
            .iter()
            .map(String::as_str)
            .max()
            .unwrap_or(NEVER_DONE_SENTINEL)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TaskStatus {
    #[serde(rename = "pending")]
    Pending,
    #[serde(rename = "in progress")]
    InProgress,
    #[serde(rename = "completed")]
    Completed,
}

impl TaskStatus {
    const LABELS: &'static [&'static str] = &["pending", "in progress", "completed"];

    /// Matches a stored status label, ignoring case and surrounding spaces.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "in progress" => Some(Self::InProgress),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in progress",
            Self::Completed => "completed",
        }
    }
}

impl<'de> Deserialize<'de> for TaskStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).ok_or_else(|| serde::de::Error::unknown_variant(&raw, Self::LABELS))
    }
}

#[cfg(test)]
mod tests {
    use super::{NEVER_DONE_SENTINEL, Task, TaskStatus};

    #[test]
    fn matches_name_ignores_case() {
        let task = Task::new("Write Report", "work", TaskStatus::Pending);

        assert!(task.matches_name("write report"));
        assert!(task.matches_name("WRITE REPORT"));
        assert!(task.matches_name("wRiTe RePoRt"));
        assert!(!task.matches_name("write reports"));
    }

    #[test]
    fn last_done_picks_latest_entry() {
        let mut task = Task::new("Gym", "health", TaskStatus::Completed);
        task.history = vec![
            "2024-03-01".to_string(),
            "2024-06-01".to_string(),
            "2024-01-15".to_string(),
        ];

        assert_eq!(task.last_done(), "2024-06-01");
    }

    #[test]
    fn last_done_defaults_to_sentinel() {
        let task = Task::new("Gym", "health", TaskStatus::Pending);
        assert_eq!(task.last_done(), NEVER_DONE_SENTINEL);
    }

    #[test]
    fn status_serializes_with_spaces() {
        let value = serde_json::to_value(TaskStatus::InProgress).unwrap();
        assert_eq!(value, serde_json::json!("in progress"));

        let parsed: TaskStatus = serde_json::from_str("\"completed\"").unwrap();
        assert_eq!(parsed, TaskStatus::Completed);
        assert_eq!(parsed.label(), "completed");
    }

    #[test]
    fn status_parses_any_case_and_writes_lowercase() {
        for (raw, expected) in [
            ("\"Pending\"", TaskStatus::Pending),
            ("\"IN PROGRESS\"", TaskStatus::InProgress),
            ("\" In Progress \"", TaskStatus::InProgress),
            ("\"Completed\"", TaskStatus::Completed),
        ] {
            let parsed: TaskStatus = serde_json::from_str(raw).unwrap();
            assert_eq!(parsed, expected);
        }

        let parsed: TaskStatus = serde_json::from_str("\"In Progress\"").unwrap();
        assert_eq!(serde_json::to_value(parsed).unwrap(), serde_json::json!("in progress"));
    }

    #[test]
    fn unknown_status_is_rejected() {
        let parsed = serde_json::from_str::<TaskStatus>("\"blocked\"");
        assert!(parsed.is_err());
    }

    #[test]
    fn task_keeps_unknown_fields() {
        let raw = serde_json::json!({
            "name": "Gym",
            "category": "health",
            "status": "pending",
            "history": [],
            "priority": 3
        });

        let task: Task = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(task.extra.get("priority"), Some(&serde_json::json!(3)));
        assert_eq!(serde_json::to_value(&task).unwrap(), raw);
    }
}
