//! JSON rule-file parser for administrator tooling
//!
//! Lenient on purpose: entries missing optional fields get defaults,
//! entries missing rule text are skipped with a warning. Structural
//! validation still happens when the rules enter the store.
//!
//! Expected format:
//! ```json
//! [
//!   {
//!     "rule_id": "rule_safety_001",
//!     "rule_text": "Never discuss harming animals",
//!     "rule_type": "never",
//!     "category": "safety",
//!     "severity": "critical",
//!     "enabled": true,
//!     "pattern": "(?i)harm\\s+animals",
//!     "user_message": "We never talk about harming animals."
//!   }
//! ]
//! ```

use tracing::warn;

use crate::types::{GuardrailRule, RuleCategory, RuleSeverity, RuleType};
use zc_types::{AppError, AppResult};

/// Parse rules from a JSON array of rule objects
pub fn parse_rules_json(data: &[u8]) -> AppResult<Vec<GuardrailRule>> {
    let entries: Vec<serde_json::Value> = serde_json::from_slice(data)
        .map_err(|e| AppError::InvalidRule(format!("Failed to parse rule file: {}", e)))?;

    let mut rules = Vec::new();

    for (i, entry) in entries.iter().enumerate() {
        let rule_text = match entry.get("rule_text").and_then(|v| v.as_str()) {
            Some(t) if !t.is_empty() => t.to_string(),
            _ => {
                warn!("Skipping rule entry {} without rule_text", i);
                continue;
            }
        };

        let rule_id = entry
            .get("rule_id")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
            .unwrap_or_else(|| format!("rule_{:03}", i));

        let rule_type = entry
            .get("rule_type")
            .and_then(|v| v.as_str())
            .map(parse_rule_type)
            .unwrap_or(RuleType::Never);

        let category = entry
            .get("category")
            .and_then(|v| v.as_str())
            .map(parse_category)
            .unwrap_or(RuleCategory::Safety);

        let severity = entry
            .get("severity")
            .and_then(|v| v.as_str())
            .map(RuleSeverity::from_str_lenient)
            .unwrap_or(RuleSeverity::Medium);

        let enabled = entry.get("enabled").and_then(|v| v.as_bool()).unwrap_or(true);

        let pattern = entry
            .get("pattern")
            .and_then(|v| v.as_str())
            .filter(|p| !p.is_empty())
            .map(|p| p.to_string());

        let user_message = entry
            .get("user_message")
            .and_then(|v| v.as_str())
            .filter(|m| !m.is_empty())
            .map(|m| m.to_string());

        rules.push(GuardrailRule {
            rule_id,
            rule_text,
            rule_type,
            category,
            severity,
            enabled,
            pattern,
            user_message,
        });
    }

    Ok(rules)
}

fn parse_rule_type(s: &str) -> RuleType {
    match s.to_lowercase().as_str() {
        "always" => RuleType::Always,
        "never" => RuleType::Never,
        "encourage" => RuleType::Encourage,
        "discourage" => RuleType::Discourage,
        _ => RuleType::Never,
    }
}

fn parse_category(s: &str) -> RuleCategory {
    match s.to_lowercase().replace('-', "_").as_str() {
        "safety" => RuleCategory::Safety,
        "educational" | "education" => RuleCategory::Educational,
        "age_appropriate" => RuleCategory::AgeAppropriate,
        "behavioral" | "behaviour" | "behavior" => RuleCategory::Behavioral,
        "content_quality" | "quality" => RuleCategory::ContentQuality,
        "privacy" => RuleCategory::Privacy,
        _ => RuleCategory::Safety,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_entry() {
        let json = serde_json::json!([{
            "rule_id": "rule_safety_001",
            "rule_text": "Never discuss harming animals",
            "rule_type": "NEVER",
            "category": "safety",
            "severity": "critical",
            "enabled": true,
            "pattern": "(?i)harm",
            "user_message": "Be kind to animals."
        }]);

        let rules = parse_rules_json(&serde_json::to_vec(&json).unwrap()).unwrap();
        assert_eq!(rules.len(), 1);
        let rule = &rules[0];
        assert_eq!(rule.rule_id, "rule_safety_001");
        assert_eq!(rule.rule_type, RuleType::Never);
        assert_eq!(rule.severity, RuleSeverity::Critical);
        assert_eq!(rule.pattern.as_deref(), Some("(?i)harm"));
    }

    #[test]
    fn test_parse_defaults() {
        let json = serde_json::json!([{"rule_text": "Encourage conservation questions"}]);
        let rules = parse_rules_json(&serde_json::to_vec(&json).unwrap()).unwrap();

        let rule = &rules[0];
        assert_eq!(rule.rule_id, "rule_000");
        assert_eq!(rule.rule_type, RuleType::Never);
        assert_eq!(rule.category, RuleCategory::Safety);
        assert_eq!(rule.severity, RuleSeverity::Medium);
        assert!(rule.enabled);
        assert!(rule.pattern.is_none());
    }

    #[test]
    fn test_parse_skips_missing_text() {
        let json = serde_json::json!([
            {"rule_id": "no_text"},
            {"rule_text": "Valid rule text"}
        ]);
        let rules = parse_rules_json(&serde_json::to_vec(&json).unwrap()).unwrap();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].rule_text, "Valid rule text");
    }

    #[test]
    fn test_parse_hyphenated_category() {
        let json = serde_json::json!([{
            "rule_text": "Keep things friendly",
            "category": "age-appropriate"
        }]);
        let rules = parse_rules_json(&serde_json::to_vec(&json).unwrap()).unwrap();
        assert_eq!(rules[0].category, RuleCategory::AgeAppropriate);
    }

    #[test]
    fn test_parse_invalid_json() {
        assert!(parse_rules_json(b"{not json").is_err());
    }
}
