//! Guardrails: content validation for zoo chatbot conversations
//!
//! Classifies free text against administrator-authored guardrail rules
//! and an external moderation classifier, and produces a structured
//! verdict (approved/flagged/blocked/escalated) with author-facing
//! explanations.
//!
//! # Architecture
//!
//! - **Store**: rule storage with per-call read snapshots and idempotent
//!   auto-disable of malformed rules
//! - **Matcher**: pure evaluation of content against enabled rules
//!   (explicit regex or keyword plans derived from rule text)
//! - **Composer**: merges local and moderation triggers, ranks them,
//!   scores risk, classifies the result
//! - **Engine**: one `validate()` call wiring the above together, with a
//!   timeout-guarded, fail-open moderation call
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use zc_guardrails::{builtin, InMemoryRuleStore, ValidationConfig, ValidationEngine};
//!
//! # async fn demo() {
//! let store = Arc::new(InMemoryRuleStore::with_rules(builtin::builtin_rules()).unwrap());
//! let engine = ValidationEngine::new(store, ValidationConfig::default());
//!
//! let response = engine.validate("Do lions sleep at night?").await;
//! if !response.valid {
//!     // Handle blocked content
//! }
//! # }
//! ```

pub mod analytics;
pub mod builtin;
pub mod composer;
pub mod config;
pub mod engine;
pub mod explain;
pub mod matcher;
pub mod rule_file;
pub mod store;
pub mod types;

pub use analytics::AnalyticsRecorder;
pub use config::ValidationConfig;
pub use engine::ValidationEngine;
pub use explain::{ConflictExplainer, TemplateExplainer};
pub use store::{InMemoryRuleStore, RuleStore};
pub use types::*;
