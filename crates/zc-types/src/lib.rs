//! Shared types and error types for ZooChat guardrails

pub mod errors;

pub use errors::{AppError, AppResult};
