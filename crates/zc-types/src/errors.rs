//! Error types and conversions

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Rule store error: {0}")]
    RuleStore(String),

    #[error("Invalid rule: {0}")]
    InvalidRule(String),

    #[error("Moderation error: {0}")]
    Moderation(String),

    #[error("Moderation service unavailable: {0}")]
    ModerationUnavailable(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid parameters: {0}")]
    InvalidParams(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type AppResult<T> = Result<T, AppError>;

impl From<AppError> for String {
    fn from(err: AppError) -> String {
        err.to_string()
    }
}
