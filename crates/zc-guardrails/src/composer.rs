//! Verdict composer: merges local and moderation triggers into a verdict
//!
//! Deterministic: hydrate raw triggers against the rule snapshot, filter
//! by confidence, fold in moderation findings (kept in their own list),
//! rank, score, classify, and build the response. Moderation being
//! unavailable degrades the response instead of failing it; local rules
//! are the safety net.

use std::collections::HashMap;

use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

use zc_moderation::{ModerationCategory, ModerationOutcome};

use crate::config::ValidationConfig;
use crate::explain::ConflictExplainer;
use crate::types::{
    GuardrailRule, ModerationFlag, RawTrigger, RuleCategory, RuleSeverity, TriggerSummary,
    TriggeredRule, ValidationResponse, ValidationResult,
};

/// Moderation input to a compose call
#[derive(Debug, Clone)]
pub enum ModerationInput {
    /// The classifier responded
    Outcome(ModerationOutcome),
    /// The call failed, timed out, or returned garbage; validation
    /// proceeds on local rules only
    Unavailable,
    /// No moderation client is configured
    Disabled,
}

/// Extra risk per additional trigger beyond the first
const MULTI_TRIGGER_INCREMENT: f32 = 3.0;
/// Cap on how many extra triggers add risk
const MULTI_TRIGGER_CAP: usize = 5;

/// Build a [`ValidationResponse`] from raw local triggers and the
/// moderation outcome. `processing_time_ms` is left at zero for the
/// caller to fill in.
pub fn compose(
    local_triggers: Vec<RawTrigger>,
    moderation: ModerationInput,
    rules: &[GuardrailRule],
    config: &ValidationConfig,
    explainer: &dyn ConflictExplainer,
) -> ValidationResponse {
    let now = Utc::now();
    let rules_by_id: HashMap<&str, &GuardrailRule> =
        rules.iter().map(|r| (r.rule_id.as_str(), r)).collect();

    // Hydrate, then filter below the confidence threshold
    let mut triggered: Vec<TriggeredRule> = local_triggers
        .into_iter()
        .filter_map(|raw| {
            let rule = rules_by_id.get(raw.rule_id.as_str())?;
            Some(TriggeredRule {
                rule_id: rule.rule_id.clone(),
                rule_text: rule.rule_text.clone(),
                rule_type: rule.rule_type,
                category: rule.category,
                severity: rule.severity,
                confidence_score: raw.confidence_score,
                trigger_context: raw.trigger_context,
                user_message: rule.user_message.clone(),
                detected_at: now,
            })
        })
        .filter(|t| t.confidence_score >= config.confidence_threshold)
        .collect();

    let degraded = matches!(&moderation, ModerationInput::Unavailable);
    let mut flags: Vec<ModerationFlag> = match moderation {
        ModerationInput::Outcome(outcome) => outcome
            .scores
            .into_iter()
            .map(|s| ModerationFlag {
                severity: category_severity(&s.category),
                category: s.category,
                confidence_score: s.score * 100.0,
                detected_at: now,
            })
            .filter(|f| f.confidence_score >= config.confidence_threshold)
            .collect(),
        ModerationInput::Unavailable | ModerationInput::Disabled => Vec::new(),
    };

    // Ranking contract: severity descending, then confidence descending
    rank(&mut triggered, |t| (t.severity, t.confidence_score));
    rank(&mut flags, |f| (f.severity, f.confidence_score));

    let has_affirmative = triggered.iter().any(|t| t.rule_type.is_affirmative());
    let has_restrictive = triggered.iter().any(|t| t.rule_type.is_restrictive());
    let conflict_note = if has_affirmative && has_restrictive {
        Some(explainer.explain(&triggered))
    } else {
        None
    };

    let risk = risk_score(&triggered, &flags);
    let total_triggered = triggered.len() + flags.len();
    let highest_severity = triggered
        .iter()
        .map(|t| t.severity)
        .max()
        .max(flags.iter().map(|f| f.severity).max());

    let requires_escalation = highest_severity == Some(RuleSeverity::Critical);
    let result = if total_triggered == 0 {
        ValidationResult::Approved
    } else if (config.block_on_critical && requires_escalation) || risk >= config.block_threshold {
        ValidationResult::Blocked
    } else if requires_escalation {
        ValidationResult::Escalated
    } else {
        ValidationResult::Flagged
    };

    debug!(
        "Composed verdict: {} ({} local, {} moderation, risk {:.1})",
        result,
        triggered.len(),
        flags.len(),
        risk
    );

    let user_message = build_user_message(&triggered, &flags, result);
    let safe_alternative = build_safe_alternative(&triggered, &flags, result);

    ValidationResponse {
        validation_id: Uuid::new_v4(),
        timestamp: now,
        processing_time_ms: 0,
        valid: result != ValidationResult::Blocked,
        result,
        risk_score: risk,
        requires_escalation,
        triggered_rules: triggered,
        moderation_flags: flags,
        summary: TriggerSummary {
            total_triggered,
            highest_severity,
        },
        user_message,
        safe_alternative,
        conflict_note,
        degraded,
        notices: Vec::new(),
    }
}

fn rank<T, K: FnMut(&T) -> (RuleSeverity, f32)>(items: &mut [T], mut key: K) {
    items.sort_by(|a, b| {
        let (sev_a, conf_a) = key(a);
        let (sev_b, conf_b) = key(b);
        sev_b
            .cmp(&sev_a)
            .then(conf_b.partial_cmp(&conf_a).unwrap_or(std::cmp::Ordering::Equal))
    });
}

/// Severity band boundaries for risk scoring
fn severity_band(severity: RuleSeverity) -> (f32, f32) {
    match severity {
        RuleSeverity::Low => (20.0, 40.0),
        RuleSeverity::Medium => (40.0, 60.0),
        RuleSeverity::High => (60.0, 80.0),
        RuleSeverity::Critical => (80.0, 100.0),
    }
}

fn band_score(severity: RuleSeverity, confidence: f32) -> f32 {
    let (floor, cap) = severity_band(severity);
    floor + (confidence.clamp(0.0, 100.0) / 100.0) * (cap - floor)
}

/// Aggregate risk over both trigger lists.
///
/// Each trigger scores into its severity band (linear in confidence);
/// the response risk is the maximum band score plus a bounded per-trigger
/// increment. Monotonic: adding a trigger of equal or higher severity can
/// only add a max candidate and raise the count bonus.
pub fn risk_score(triggered: &[TriggeredRule], flags: &[ModerationFlag]) -> f32 {
    let total = triggered.len() + flags.len();
    if total == 0 {
        return 0.0;
    }

    let max = triggered
        .iter()
        .map(|t| band_score(t.severity, t.confidence_score))
        .chain(flags.iter().map(|f| band_score(f.severity, f.confidence_score)))
        .fold(0.0_f32, f32::max);

    let bonus = MULTI_TRIGGER_INCREMENT * (total - 1).min(MULTI_TRIGGER_CAP) as f32;
    (max + bonus).min(100.0)
}

/// Map a moderation category onto the local severity scale
pub(crate) fn category_severity(category: &ModerationCategory) -> RuleSeverity {
    match category {
        ModerationCategory::SelfHarm | ModerationCategory::SexualMinors => RuleSeverity::Critical,
        ModerationCategory::Hate
        | ModerationCategory::Violence
        | ModerationCategory::ViolenceGraphic
        | ModerationCategory::Sexual
        | ModerationCategory::Illicit => RuleSeverity::High,
        ModerationCategory::Harassment | ModerationCategory::Other(_) => RuleSeverity::Medium,
    }
}

fn build_user_message(
    triggered: &[TriggeredRule],
    flags: &[ModerationFlag],
    result: ValidationResult,
) -> Option<String> {
    if result == ValidationResult::Approved {
        return Some("Looks good! No content concerns found.".to_string());
    }
    if let Some(top) = triggered.first() {
        return Some(
            top.user_message
                .clone()
                .unwrap_or_else(|| default_user_message(top.category)),
        );
    }
    if !flags.is_empty() {
        return Some("This message can't be shared in the zoo chat.".to_string());
    }
    None
}

fn default_user_message(category: RuleCategory) -> String {
    match category {
        RuleCategory::Safety => "Let's keep our conversation safe for everyone at the zoo.",
        RuleCategory::Educational => "Let's explore what makes our animals amazing!",
        RuleCategory::AgeAppropriate => "Let's keep things friendly for visitors of all ages.",
        RuleCategory::Behavioral => "Let's be kind to everyone in our zoo community.",
        RuleCategory::ContentQuality => "Let's keep the conversation about our zoo and its animals.",
        RuleCategory::Privacy => "Please don't share personal information in the chat.",
    }
    .to_string()
}

fn build_safe_alternative(
    triggered: &[TriggeredRule],
    flags: &[ModerationFlag],
    result: ValidationResult,
) -> Option<String> {
    if result == ValidationResult::Approved {
        return None;
    }
    if let Some(top) = triggered.first() {
        return safe_alternative(top.category);
    }
    if !flags.is_empty() {
        return Some("Let's talk about the zoo and its animals instead.".to_string());
    }
    None
}

fn safe_alternative(category: RuleCategory) -> Option<String> {
    let suggestion = match category {
        RuleCategory::Safety => "Try asking how our keepers care for the animals instead.",
        RuleCategory::Privacy => "You can ask about the zoo without sharing personal details.",
        RuleCategory::AgeAppropriate => "How about asking which animal is the fastest?",
        RuleCategory::Behavioral => "Try asking a fun animal fact question instead.",
        RuleCategory::ContentQuality => "Try asking about an animal you'd like to meet.",
        RuleCategory::Educational => return None,
    };
    Some(suggestion.to_string())
}
