//! External moderation client for ZooChat guardrails
//!
//! Wraps a third-party content-moderation classifier behind the
//! [`ModerationClient`] trait so the validation engine can run against the
//! real HTTP service or a stub. The classifier is a black box: it returns
//! per-category confidence scores and nothing else is assumed about it.

pub mod client;
pub mod types;

pub use client::{HttpModerationClient, ModerationClient};
pub use types::{CategoryScore, ModerationCategory, ModerationOutcome};
