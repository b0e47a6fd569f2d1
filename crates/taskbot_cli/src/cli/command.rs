use taskbot_core::error::AppError;

/// A task operation recognized from free command text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskCommand {
    ByDate(String),
    ByCategory(String),
    Pending,
    InProgress,
    AllSorted,
    MarkInProgress(String),
    Complete(String),
}

impl TaskCommand {
    /// Parse command text; anything unrecognized names a task to complete.
    pub fn parse(text: &str) -> Result<Self, AppError> {
        Ok(Self::recognize(text)?.unwrap_or_else(|| Self::Complete(text.trim().to_string())))
    }

    /// Like `parse`, but yields `None` instead of falling back to `Complete`.
    pub fn recognize(text: &str) -> Result<Option<Self>, AppError> {
        let trimmed = text.trim();
        let (keyword, argument) = match trimmed.split_once(char::is_whitespace) {
            Some((keyword, rest)) => (keyword, rest.trim()),
            None => (trimmed, ""),
        };

        let command = match keyword.to_lowercase().as_str() {
            "get_tasks_by_date" => Self::ByDate(required(keyword, argument, "date")?),
            "get_tasks_by_category" => Self::ByCategory(required(keyword, argument, "category")?),
            "mark_in_progress" => Self::MarkInProgress(required(keyword, argument, "task name")?),
            "get_pending_tasks" if argument.is_empty() => Self::Pending,
            "get_in_progress_tasks" if argument.is_empty() => Self::InProgress,
            "get_all_tasks_sorted" if argument.is_empty() => Self::AllSorted,
            _ => return Ok(None),
        };

        Ok(Some(command))
    }
}

fn required(keyword: &str, argument: &str, what: &str) -> Result<String, AppError> {
    if argument.is_empty() {
        return Err(AppError::invalid_input(format!("{keyword} requires a {what}")));
    }
    Ok(argument.to_string())
}

#[cfg(test)]
mod tests {
    use super::TaskCommand;

    #[test]
    fn parses_argument_commands() {
        assert_eq!(
            TaskCommand::parse("get_tasks_by_date 2024-06-01").unwrap(),
            TaskCommand::ByDate("2024-06-01".into())
        );
        assert_eq!(
            TaskCommand::parse("get_tasks_by_category  Home Chores ").unwrap(),
            TaskCommand::ByCategory("Home Chores".into())
        );
        assert_eq!(
            TaskCommand::parse("mark_in_progress Write report").unwrap(),
            TaskCommand::MarkInProgress("Write report".into())
        );
    }

    #[test]
    fn keywords_ignore_case() {
        assert_eq!(
            TaskCommand::parse("GET_PENDING_TASKS").unwrap(),
            TaskCommand::Pending
        );
        assert_eq!(
            TaskCommand::parse("Mark_In_Progress gym").unwrap(),
            TaskCommand::MarkInProgress("gym".into())
        );
    }

    #[test]
    fn parses_bare_listing_commands() {
        assert_eq!(
            TaskCommand::parse("get_in_progress_tasks").unwrap(),
            TaskCommand::InProgress
        );
        assert_eq!(
            TaskCommand::parse(" get_all_tasks_sorted ").unwrap(),
            TaskCommand::AllSorted
        );
    }

    #[test]
    fn unrecognized_text_completes_a_task() {
        assert_eq!(
            TaskCommand::parse("Write report").unwrap(),
            TaskCommand::Complete("Write report".into())
        );
        assert_eq!(
            TaskCommand::parse("get_pending_tasks now").unwrap(),
            TaskCommand::Complete("get_pending_tasks now".into())
        );
        assert_eq!(
            TaskCommand::parse("mark_in_progressive").unwrap(),
            TaskCommand::Complete("mark_in_progressive".into())
        );
    }

    #[test]
    fn missing_argument_is_invalid_input() {
        let err = TaskCommand::parse("get_tasks_by_date").unwrap_err();
        assert_eq!(err.code(), "invalid_input");
        assert!(err.message().contains("date"));

        let err = TaskCommand::recognize("mark_in_progress   ").unwrap_err();
        assert_eq!(err.code(), "invalid_input");
    }

    #[test]
    fn recognize_leaves_chat_text_alone() {
        assert_eq!(TaskCommand::recognize("how are you today?").unwrap(), None);
        assert_eq!(
            TaskCommand::recognize("get_pending_tasks").unwrap(),
            Some(TaskCommand::Pending)
        );
    }
}
