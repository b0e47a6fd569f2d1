use thiserror::Error;

/// Failures that abort the current invocation (or, for the responder, the
/// current chat turn). Logical conditions such as "task not found" are
/// outcome values in `task_api`, not errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppError {
    #[error("config_missing - {0}")]
    ConfigMissing(String),
    #[error("source_not_found - {0}")]
    SourceNotFound(String),
    #[error("source_malformed - {0}")]
    SourceMalformed(String),
    #[error("invalid_input - {0}")]
    InvalidInput(String),
    #[error("invalid_data - {0}")]
    InvalidData(String),
    #[error("io_error - {0}")]
    Io(String),
    #[error("responder_unavailable - {0}")]
    ResponderUnavailable(String),
}

impl AppError {
    pub fn config_missing<M: Into<String>>(message: M) -> Self {
        Self::ConfigMissing(message.into())
    }

    pub fn source_not_found<M: Into<String>>(message: M) -> Self {
        Self::SourceNotFound(message.into())
    }

    pub fn source_malformed<M: Into<String>>(message: M) -> Self {
        Self::SourceMalformed(message.into())
    }

    pub fn invalid_input<M: Into<String>>(message: M) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn invalid_data<M: Into<String>>(message: M) -> Self {
        Self::InvalidData(message.into())
    }

    pub fn io<M: Into<String>>(message: M) -> Self {
        Self::Io(message.into())
    }

    pub fn responder_unavailable<M: Into<String>>(message: M) -> Self {
        Self::ResponderUnavailable(message.into())
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigMissing(_) => "config_missing",
            Self::SourceNotFound(_) => "source_not_found",
            Self::SourceMalformed(_) => "source_malformed",
            Self::InvalidInput(_) => "invalid_input",
            Self::InvalidData(_) => "invalid_data",
            Self::Io(_) => "io_error",
            Self::ResponderUnavailable(_) => "responder_unavailable",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::ConfigMissing(message)
            | Self::SourceNotFound(message)
            | Self::SourceMalformed(message)
            | Self::InvalidInput(message)
            | Self::InvalidData(message)
            | Self::Io(message)
            | Self::ResponderUnavailable(message) => message,
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}
