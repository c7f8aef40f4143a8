use thiserror::Error;

/// Failure taxonomy for one invocation. Each variant maps to exactly one
/// response status.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CrudError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    UnsupportedAction(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Unexpected(String),
}

impl CrudError {
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) | Self::UnsupportedAction(_) => 400,
            Self::NotFound(_) => 404,
            Self::Conflict(_) => 409,
            Self::Unexpected(_) => 500,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::UnsupportedAction(_) => "unsupported_action",
            Self::NotFound(_) => "not_found",
            Self::Conflict(_) => "conflict",
            Self::Unexpected(_) => "unexpected",
        }
    }

    pub fn missing_key(key_field: &str) -> Self {
        Self::Validation(format!("Missing {key_field}"))
    }

    pub fn not_found() -> Self {
        Self::NotFound("Not found".to_string())
    }
}
