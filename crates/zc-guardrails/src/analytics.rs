//! Hourly rule analytics
//!
//! Bucketed counters keyed by rule and hour, consumed by admin
//! dashboards. Purely additive: recording never changes a verdict.

use std::collections::HashMap;

use chrono::{DateTime, TimeZone, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::types::{ValidationResponse, ValidationResult};

/// Counters for one rule in one hour bucket
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleHourlyStats {
    pub rule_id: String,
    /// Start of the hour bucket
    pub hour: DateTime<Utc>,
    pub triggered: u64,
    pub blocked: u64,
}

/// In-memory hourly analytics recorder
#[derive(Default)]
pub struct AnalyticsRecorder {
    buckets: Mutex<HashMap<(String, i64), RuleHourlyStats>>,
}

impl AnalyticsRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a validation response into the hourly buckets
    pub fn record(&self, response: &ValidationResponse) {
        let hour_index = response.timestamp.timestamp().div_euclid(3600);
        let blocked = response.result == ValidationResult::Blocked;
        let mut buckets = self.buckets.lock();

        for trigger in &response.triggered_rules {
            let entry = buckets
                .entry((trigger.rule_id.clone(), hour_index))
                .or_insert_with(|| RuleHourlyStats {
                    rule_id: trigger.rule_id.clone(),
                    hour: Utc
                        .timestamp_opt(hour_index * 3600, 0)
                        .single()
                        .unwrap_or(response.timestamp),
                    triggered: 0,
                    blocked: 0,
                });
            entry.triggered += 1;
            if blocked {
                entry.blocked += 1;
            }
        }
    }

    /// All buckets for one rule, oldest first
    pub fn stats_for(&self, rule_id: &str) -> Vec<RuleHourlyStats> {
        let mut stats: Vec<RuleHourlyStats> = self
            .buckets
            .lock()
            .values()
            .filter(|s| s.rule_id == rule_id)
            .cloned()
            .collect();
        stats.sort_by_key(|s| s.hour);
        stats
    }

    /// Snapshot of every bucket
    pub fn snapshot(&self) -> Vec<RuleHourlyStats> {
        self.buckets.lock().values().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{
        RuleCategory, RuleSeverity, RuleType, TriggerSummary, TriggeredRule,
    };
    use uuid::Uuid;

    fn response_with_trigger(rule_id: &str, result: ValidationResult) -> ValidationResponse {
        let now = Utc::now();
        ValidationResponse {
            validation_id: Uuid::new_v4(),
            timestamp: now,
            processing_time_ms: 1,
            valid: result != ValidationResult::Blocked,
            result,
            risk_score: 60.0,
            requires_escalation: false,
            triggered_rules: vec![TriggeredRule {
                rule_id: rule_id.to_string(),
                rule_text: "text".to_string(),
                rule_type: RuleType::Never,
                category: RuleCategory::Safety,
                severity: RuleSeverity::High,
                confidence_score: 80.0,
                trigger_context: None,
                user_message: None,
                detected_at: now,
            }],
            moderation_flags: vec![],
            summary: TriggerSummary {
                total_triggered: 1,
                highest_severity: Some(RuleSeverity::High),
            },
            user_message: None,
            safe_alternative: None,
            conflict_note: None,
            degraded: false,
            notices: vec![],
        }
    }

    #[test]
    fn test_record_accumulates_within_hour() {
        let recorder = AnalyticsRecorder::new();
        recorder.record(&response_with_trigger("r1", ValidationResult::Flagged));
        recorder.record(&response_with_trigger("r1", ValidationResult::Blocked));

        let stats = recorder.stats_for("r1");
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].triggered, 2);
        assert_eq!(stats[0].blocked, 1);
    }

    #[test]
    fn test_stats_for_unknown_rule_empty() {
        let recorder = AnalyticsRecorder::new();
        assert!(recorder.stats_for("nope").is_empty());
    }

    #[test]
    fn test_snapshot_covers_all_rules() {
        let recorder = AnalyticsRecorder::new();
        recorder.record(&response_with_trigger("r1", ValidationResult::Flagged));
        recorder.record(&response_with_trigger("r2", ValidationResult::Flagged));
        assert_eq!(recorder.snapshot().len(), 2);
    }
}
