//! Built-in starter guardrail rules
//!
//! Always available without an administrator loading anything. These are
//! conservative patterns designed to catch obvious problems in a zoo
//! visitor chat with minimal false positives.

use crate::types::{GuardrailRule, RuleCategory, RuleSeverity, RuleType};

/// Get all built-in rules
pub fn builtin_rules() -> Vec<GuardrailRule> {
    let mut rules = Vec::new();

    rules.extend(animal_safety_rules());
    rules.extend(visitor_safety_rules());
    rules.extend(privacy_rules());
    rules.extend(age_appropriate_rules());
    rules.extend(behavioral_rules());
    rules.extend(educational_rules());
    rules.extend(content_quality_rules());

    rules
}

fn animal_safety_rules() -> Vec<GuardrailRule> {
    vec![
        GuardrailRule {
            rule_id: "builtin-safety-001".into(),
            rule_text: "Never discuss harming, hurting, or killing animals".into(),
            rule_type: RuleType::Never,
            category: RuleCategory::Safety,
            severity: RuleSeverity::Critical,
            enabled: true,
            pattern: Some(
                r"(?i)\b(hurt|harm|kill|poison|injure|torture|abuse)\w*\s+(the\s+|an?\s+|our\s+)?(animals?|lions?|tigers?|elephants?|monkeys?|birds?|penguins?|creatures?)"
                    .into(),
            ),
            user_message: Some("We never talk about harming animals. Our keepers work hard to keep every animal safe.".into()),
        },
        GuardrailRule {
            rule_id: "builtin-safety-002".into(),
            rule_text: "Never give instructions for entering animal enclosures".into(),
            rule_type: RuleType::Never,
            category: RuleCategory::Safety,
            severity: RuleSeverity::Critical,
            enabled: true,
            pattern: Some(
                r"(?i)(climb|sneak|jump|get|break)\w*\s+(into|over|inside|past)\s+(the\s+)?(enclosure|exhibit|habitat|cage|fence|barrier)".into(),
            ),
            user_message: Some("Enclosures keep both visitors and animals safe. Please stay on the visitor paths.".into()),
        },
        GuardrailRule {
            rule_id: "builtin-safety-003".into(),
            rule_text: "Never encourage feeding wild or exhibited animals".into(),
            rule_type: RuleType::Never,
            category: RuleCategory::Safety,
            severity: RuleSeverity::High,
            enabled: true,
            pattern: Some(r"(?i)(feed|throw|give)\w*\s+(food|snacks?|candy|treats?)\s+(to\s+)?(the\s+)?(animals?|lions?|bears?|monkeys?)".into()),
            user_message: Some("Only keepers feed the animals. Zoo diets are carefully planned!".into()),
        },
    ]
}

fn visitor_safety_rules() -> Vec<GuardrailRule> {
    vec![GuardrailRule {
        rule_id: "builtin-safety-010".into(),
        rule_text: "Never discuss weapons or violence toward zoo visitors or staff".into(),
        rule_type: RuleType::Never,
        category: RuleCategory::Safety,
        severity: RuleSeverity::Critical,
        enabled: true,
        pattern: Some(r"(?i)\b(gun|knife|weapon|bomb|attack|stab|shoot)\w*\b".into()),
        user_message: Some("Let's keep our zoo chat safe and friendly for everyone.".into()),
    }]
}

fn privacy_rules() -> Vec<GuardrailRule> {
    vec![
        GuardrailRule {
            rule_id: "builtin-privacy-001".into(),
            rule_text: "Never ask visitors for their home address or school".into(),
            rule_type: RuleType::Never,
            category: RuleCategory::Privacy,
            severity: RuleSeverity::High,
            enabled: true,
            pattern: Some(
                r"(?i)(what|where)('s|\s+is)?\s+(your|ur)\s+(home\s+)?(address|school|phone\s*number)".into(),
            ),
            user_message: Some("Please don't share personal details like addresses or school names in the chat.".into()),
        },
        GuardrailRule {
            rule_id: "builtin-privacy-002".into(),
            rule_text: "Never surface phone numbers in chat".into(),
            rule_type: RuleType::Never,
            category: RuleCategory::Privacy,
            severity: RuleSeverity::High,
            enabled: true,
            pattern: Some(r"\b\d{3}[-.\s]\d{3}[-.\s]\d{4}\b".into()),
            user_message: Some("Phone numbers shouldn't be shared in the zoo chat.".into()),
        },
    ]
}

fn age_appropriate_rules() -> Vec<GuardrailRule> {
    vec![GuardrailRule {
        rule_id: "builtin-age-001".into(),
        rule_text: "Never use profanity in visitor conversations".into(),
        rule_type: RuleType::Never,
        category: RuleCategory::AgeAppropriate,
        severity: RuleSeverity::High,
        enabled: true,
        pattern: Some(r"(?i)\b(damn|hell|crap|stupid\s+idiot)\b".into()),
        user_message: Some("Let's keep our words friendly for visitors of all ages.".into()),
    }]
}

fn behavioral_rules() -> Vec<GuardrailRule> {
    vec![GuardrailRule {
        rule_id: "builtin-behavioral-001".into(),
        rule_text: "Discourage bullying, teasing, or name-calling".into(),
        rule_type: RuleType::Discourage,
        category: RuleCategory::Behavioral,
        severity: RuleSeverity::Medium,
        enabled: true,
        pattern: Some(r"(?i)\b(bully|bullying|loser|dumb|hate\s+you|shut\s+up)\b".into()),
        user_message: Some("Everyone is welcome at our zoo. Let's be kind to each other.".into()),
    }]
}

fn educational_rules() -> Vec<GuardrailRule> {
    vec![
        GuardrailRule {
            rule_id: "builtin-edu-001".into(),
            rule_text: "Encourage questions about habitats conservation wildlife".into(),
            rule_type: RuleType::Encourage,
            category: RuleCategory::Educational,
            severity: RuleSeverity::Low,
            enabled: true,
            pattern: None,
            user_message: None,
        },
        GuardrailRule {
            rule_id: "builtin-edu-002".into(),
            rule_text: "Always share accurate species diet facts".into(),
            rule_type: RuleType::Always,
            category: RuleCategory::Educational,
            severity: RuleSeverity::Low,
            enabled: true,
            pattern: None,
            user_message: None,
        },
    ]
}

fn content_quality_rules() -> Vec<GuardrailRule> {
    vec![GuardrailRule {
        rule_id: "builtin-quality-001".into(),
        rule_text: "Discourage spam gibberish promotions advertising".into(),
        rule_type: RuleType::Discourage,
        category: RuleCategory::ContentQuality,
        severity: RuleSeverity::Low,
        enabled: true,
        pattern: Some(r"(?i)(buy\s+now|click\s+here|free\s+money|subscribe\s+to)".into()),
        user_message: Some("The zoo chat is for questions about our animals and exhibits.".into()),
    }]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher;

    #[test]
    fn test_builtin_rules_validate() {
        let rules = builtin_rules();
        assert!(!rules.is_empty());
        for rule in &rules {
            rule.validate().unwrap_or_else(|e| panic!("{}: {}", rule.rule_id, e));
        }
    }

    #[test]
    fn test_builtin_rule_ids_unique() {
        let rules = builtin_rules();
        let mut ids: Vec<&str> = rules.iter().map(|r| r.rule_id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), rules.len());
    }

    #[test]
    fn test_builtin_patterns_compile() {
        let outcome = matcher::evaluate("hello zoo", &builtin_rules());
        assert!(outcome.malformed.is_empty(), "built-in patterns must be valid");
    }

    #[test]
    fn test_animal_harm_detected() {
        let outcome = matcher::evaluate("How do I hurt animals?", &builtin_rules());
        assert!(outcome
            .triggers
            .iter()
            .any(|t| t.rule_id == "builtin-safety-001"));
    }

    #[test]
    fn test_enclosure_entry_detected() {
        let outcome = matcher::evaluate("Can I climb into the enclosure?", &builtin_rules());
        assert!(outcome
            .triggers
            .iter()
            .any(|t| t.rule_id == "builtin-safety-002"));
    }

    #[test]
    fn test_phone_number_detected() {
        let outcome = matcher::evaluate("Call me at 555-867-5309 tonight", &builtin_rules());
        assert!(outcome
            .triggers
            .iter()
            .any(|t| t.rule_id == "builtin-privacy-002"));
    }

    #[test]
    fn test_clean_content_no_high_severity() {
        let outcome = matcher::evaluate("I love lions because they're amazing", &builtin_rules());
        let rules = builtin_rules();
        for trigger in &outcome.triggers {
            let rule = rules.iter().find(|r| r.rule_id == trigger.rule_id).unwrap();
            assert!(
                rule.severity < RuleSeverity::High,
                "clean content triggered {}",
                rule.rule_id
            );
        }
    }
}
