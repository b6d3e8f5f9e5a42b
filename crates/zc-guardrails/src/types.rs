//! Type definitions for the validation engine

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use zc_moderation::ModerationCategory;
use zc_types::{AppError, AppResult};

/// Maximum length of a rule's text
pub const MAX_RULE_TEXT_CHARS: usize = 500;
/// Maximum length of a trigger's context excerpt
pub const MAX_CONTEXT_CHARS: usize = 500;
/// Maximum length of an author-facing explanation
pub const MAX_USER_MESSAGE_CHARS: usize = 200;

/// Polarity of a guardrail rule
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RuleType {
    Always,
    Never,
    Encourage,
    Discourage,
}

impl RuleType {
    /// Rules that push content toward a behavior
    pub fn is_affirmative(self) -> bool {
        matches!(self, Self::Always | Self::Encourage)
    }

    /// Rules that push content away from a behavior
    pub fn is_restrictive(self) -> bool {
        matches!(self, Self::Never | Self::Discourage)
    }
}

impl std::fmt::Display for RuleType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Always => write!(f, "ALWAYS"),
            Self::Never => write!(f, "NEVER"),
            Self::Encourage => write!(f, "ENCOURAGE"),
            Self::Discourage => write!(f, "DISCOURAGE"),
        }
    }
}

/// Subject area a rule governs
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RuleCategory {
    Safety,
    Educational,
    AgeAppropriate,
    Behavioral,
    ContentQuality,
    Privacy,
}

impl std::fmt::Display for RuleCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Safety => write!(f, "Safety"),
            Self::Educational => write!(f, "Educational"),
            Self::AgeAppropriate => write!(f, "Age-Appropriate"),
            Self::Behavioral => write!(f, "Behavioral"),
            Self::ContentQuality => write!(f, "Content Quality"),
            Self::Privacy => write!(f, "Privacy"),
        }
    }
}

/// Severity level of a rule
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum RuleSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl std::fmt::Display for RuleSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
            Self::Critical => write!(f, "critical"),
        }
    }
}

impl RuleSeverity {
    /// Parse severity from string (case-insensitive)
    pub fn from_str_lenient(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "low" => Self::Low,
            "medium" => Self::Medium,
            "high" => Self::High,
            "critical" => Self::Critical,
            _ => Self::Medium,
        }
    }
}

/// An administrator-authored guardrail rule
///
/// `rule_text` is the human-readable rule and the keyword basis for
/// matching. When `pattern` is set, the matcher uses that regex instead
/// of keyword matching; an invalid pattern gets the rule auto-disabled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuardrailRule {
    pub rule_id: String,
    pub rule_text: String,
    pub rule_type: RuleType,
    pub category: RuleCategory,
    pub severity: RuleSeverity,
    pub enabled: bool,
    /// Explicit regex to match instead of the keyword plan
    #[serde(default)]
    pub pattern: Option<String>,
    /// Author-facing explanation copied onto triggers
    #[serde(default)]
    pub user_message: Option<String>,
}

impl GuardrailRule {
    /// Check structural constraints before the rule enters the store
    pub fn validate(&self) -> AppResult<()> {
        if self.rule_id.trim().is_empty() {
            return Err(AppError::InvalidRule("rule_id must not be empty".into()));
        }
        if self.rule_text.is_empty() || self.rule_text.chars().count() > MAX_RULE_TEXT_CHARS {
            return Err(AppError::InvalidRule(format!(
                "rule {} text must be 1-{} characters",
                self.rule_id, MAX_RULE_TEXT_CHARS
            )));
        }
        if let Some(ref msg) = self.user_message {
            if msg.chars().count() > MAX_USER_MESSAGE_CHARS {
                return Err(AppError::InvalidRule(format!(
                    "rule {} user_message exceeds {} characters",
                    self.rule_id, MAX_USER_MESSAGE_CHARS
                )));
            }
        }
        Ok(())
    }
}

/// A single rule match before hydration, as produced by the matcher
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawTrigger {
    pub rule_id: String,
    /// Match strength, 0-100
    pub confidence_score: f32,
    /// Excerpt that caused the match
    pub trigger_context: Option<String>,
}

/// A fully hydrated rule trigger, surfaced to callers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriggeredRule {
    pub rule_id: String,
    pub rule_text: String,
    pub rule_type: RuleType,
    pub category: RuleCategory,
    pub severity: RuleSeverity,
    pub confidence_score: f32,
    pub trigger_context: Option<String>,
    pub user_message: Option<String>,
    pub detected_at: DateTime<Utc>,
}

/// A moderation-API finding, kept separate from local rule triggers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModerationFlag {
    pub category: ModerationCategory,
    pub severity: RuleSeverity,
    /// Classifier confidence scaled to 0-100
    pub confidence_score: f32,
    pub detected_at: DateTime<Utc>,
}

/// Final classification of a validation call
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ValidationResult {
    Approved,
    Flagged,
    Blocked,
    Escalated,
}

impl std::fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Approved => write!(f, "approved"),
            Self::Flagged => write!(f, "flagged"),
            Self::Blocked => write!(f, "blocked"),
            Self::Escalated => write!(f, "escalated"),
        }
    }
}

/// Counts and extremes over both trigger lists
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriggerSummary {
    pub total_triggered: usize,
    pub highest_severity: Option<RuleSeverity>,
}

/// Result of one validation call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResponse {
    pub validation_id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub processing_time_ms: u64,
    pub valid: bool,
    pub result: ValidationResult,
    /// Aggregate risk, 0-100
    pub risk_score: f32,
    pub requires_escalation: bool,
    /// Local rule triggers, ranked by severity then confidence
    pub triggered_rules: Vec<TriggeredRule>,
    /// Moderation-API findings, ranked the same way, never mixed with
    /// local triggers
    pub moderation_flags: Vec<ModerationFlag>,
    pub summary: TriggerSummary,
    pub user_message: Option<String>,
    pub safe_alternative: Option<String>,
    /// Present when both affirmative and restrictive rules triggered
    pub conflict_note: Option<String>,
    /// True when the moderation service was unavailable and only local
    /// rules were evaluated
    pub degraded: bool,
    /// Administrator-facing notices (e.g. auto-disabled rules)
    pub notices: Vec<String>,
}

impl ValidationResponse {
    /// Check if anything triggered, local or moderation
    pub fn has_triggers(&self) -> bool {
        !self.triggered_rules.is_empty() || !self.moderation_flags.is_empty()
    }

    /// Highest severity across both trigger lists
    pub fn highest_severity(&self) -> Option<RuleSeverity> {
        let local = self.triggered_rules.iter().map(|t| t.severity).max();
        let moderation = self.moderation_flags.iter().map(|f| f.severity).max();
        local.max(moderation)
    }
}
