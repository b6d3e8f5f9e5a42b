//! Rule matcher: evaluates content against enabled rules
//!
//! Pure function of content + rule set, no I/O. A rule with an explicit
//! regex pattern matches through it; otherwise a keyword plan is derived
//! from the rule text. A rule triggers at most once per call. Malformed
//! patterns go into a side list instead of aborting the batch.

use std::collections::HashSet;

use regex::Regex;
use tracing::warn;

use crate::types::{GuardrailRule, RawTrigger, MAX_CONTEXT_CHARS};

/// Confidence assigned to an explicit regex hit
const REGEX_CONFIDENCE: f32 = 90.0;
/// Confidence assigned when the full rule text appears verbatim
const PHRASE_CONFIDENCE: f32 = 95.0;
/// Ceiling for keyword-overlap confidence (all keywords present)
const KEYWORD_CONFIDENCE_CEILING: f32 = 85.0;
/// Characters of context kept on either side of a hit
const SNIPPET_CONTEXT_CHARS: usize = 30;

/// Words too common in rule prose to count as keywords
const STOPWORDS: &[&str] = &[
    "the", "and", "for", "not", "nor", "with", "without", "about", "never", "always",
    "should", "must", "shall", "may", "might", "any", "all", "some", "you", "your",
    "are", "that", "this", "these", "those", "when", "them", "they", "their", "from",
    "have", "has", "had", "will", "would", "can", "could", "into", "onto", "out",
    "our", "who", "what", "how", "why", "where", "was", "were", "been", "being",
    "does", "did", "doing", "don", "doesn", "users", "user", "content", "rule",
    "please", "like", "make", "use", "give", "such", "other", "than", "very",
    "discuss", "discussing", "avoid", "avoiding", "encourage", "encouraging",
    "discourage", "discouraging",
];

/// A rule whose pattern could not be evaluated
#[derive(Debug, Clone)]
pub struct MalformedRule {
    pub rule_id: String,
    pub error: String,
}

/// Everything one evaluation pass produced
#[derive(Debug, Default)]
pub struct MatchOutcome {
    pub triggers: Vec<RawTrigger>,
    pub malformed: Vec<MalformedRule>,
}

/// Evaluate content against each enabled rule
pub fn evaluate(content: &str, rules: &[GuardrailRule]) -> MatchOutcome {
    let mut outcome = MatchOutcome::default();
    let content_lower = content.to_lowercase();
    let content_words: HashSet<&str> = content_lower
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();

    for rule in rules.iter().filter(|r| r.enabled) {
        match match_rule(content, &content_lower, &content_words, rule) {
            Ok(Some(trigger)) => outcome.triggers.push(trigger),
            Ok(None) => {}
            Err(error) => {
                warn!(
                    "Skipping rule '{}': malformed pattern: {}",
                    rule.rule_id, error
                );
                outcome.malformed.push(MalformedRule {
                    rule_id: rule.rule_id.clone(),
                    error,
                });
            }
        }
    }

    outcome
}

/// Match a single rule; Err carries the pattern compile error
fn match_rule(
    content: &str,
    content_lower: &str,
    content_words: &HashSet<&str>,
    rule: &GuardrailRule,
) -> Result<Option<RawTrigger>, String> {
    if let Some(ref pattern) = rule.pattern {
        let re = Regex::new(pattern).map_err(|e| e.to_string())?;
        return Ok(re.find(content).map(|m| RawTrigger {
            rule_id: rule.rule_id.clone(),
            confidence_score: REGEX_CONFIDENCE,
            trigger_context: Some(extract_snippet(
                content,
                m.start(),
                m.end(),
                SNIPPET_CONTEXT_CHARS,
            )),
        }));
    }

    let keywords = keywords(&rule.rule_text);
    if keywords.is_empty() {
        return Ok(None);
    }

    // Verbatim phrase hit beats any keyword overlap
    if content_lower.contains(&rule.rule_text.to_lowercase()) {
        return Ok(Some(RawTrigger {
            rule_id: rule.rule_id.clone(),
            confidence_score: PHRASE_CONFIDENCE,
            trigger_context: find_context(content, &rule.rule_text, false),
        }));
    }

    let matched: Vec<&String> = keywords
        .iter()
        .filter(|k| content_words.contains(k.as_str()))
        .collect();
    if matched.is_empty() {
        return Ok(None);
    }

    let fraction = matched.len() as f32 / keywords.len() as f32;
    Ok(Some(RawTrigger {
        rule_id: rule.rule_id.clone(),
        confidence_score: fraction * KEYWORD_CONFIDENCE_CEILING,
        trigger_context: find_context(content, matched[0], true),
    }))
}

/// Significant words of a rule's text, in order, deduplicated
pub(crate) fn keywords(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    let mut out: Vec<String> = Vec::new();
    for word in lowered.split(|c: char| !c.is_alphanumeric()) {
        if word.len() < 3 || STOPWORDS.contains(&word) {
            continue;
        }
        if !out.iter().any(|w| w == word) {
            out.push(word.to_string());
        }
    }
    out
}

/// Locate `needle` case-insensitively in the original content and cut a
/// snippet around it. `whole_word` adds word boundaries.
fn find_context(content: &str, needle: &str, whole_word: bool) -> Option<String> {
    let pattern = if whole_word {
        format!(r"(?i)\b{}\b", regex::escape(needle))
    } else {
        format!("(?i){}", regex::escape(needle))
    };
    let re = Regex::new(&pattern).ok()?;
    re.find(content)
        .map(|m| extract_snippet(content, m.start(), m.end(), SNIPPET_CONTEXT_CHARS))
}

/// Extract a context snippet around a match position
pub(crate) fn extract_snippet(
    text: &str,
    start: usize,
    end: usize,
    context_chars: usize,
) -> String {
    let mut snippet_start = start.saturating_sub(context_chars);
    while snippet_start > 0 && !text.is_char_boundary(snippet_start) {
        snippet_start -= 1;
    }
    let mut snippet_end = (end + context_chars).min(text.len());
    while snippet_end < text.len() && !text.is_char_boundary(snippet_end) {
        snippet_end += 1;
    }

    let mut snippet = String::new();
    if snippet_start > 0 {
        snippet.push_str("...");
    }
    snippet.push_str(&text[snippet_start..snippet_end]);
    if snippet_end < text.len() {
        snippet.push_str("...");
    }

    if snippet.chars().count() > MAX_CONTEXT_CHARS {
        snippet = snippet.chars().take(MAX_CONTEXT_CHARS - 3).collect();
        snippet.push_str("...");
    }
    snippet
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{RuleCategory, RuleSeverity, RuleType};
    use test_case::test_case;

    fn keyword_rule(id: &str, text: &str) -> GuardrailRule {
        GuardrailRule {
            rule_id: id.to_string(),
            rule_text: text.to_string(),
            rule_type: RuleType::Never,
            category: RuleCategory::Safety,
            severity: RuleSeverity::High,
            enabled: true,
            pattern: None,
            user_message: None,
        }
    }

    fn pattern_rule(id: &str, pattern: &str) -> GuardrailRule {
        GuardrailRule {
            pattern: Some(pattern.to_string()),
            ..keyword_rule(id, "pattern rule")
        }
    }

    #[test]
    fn test_regex_rule_triggers() {
        let rules = vec![pattern_rule("r1", r"(?i)hurt\s+(the\s+)?animals?")];
        let outcome = evaluate("How do I hurt animals?", &rules);

        assert_eq!(outcome.triggers.len(), 1);
        assert!(outcome.malformed.is_empty());
        let trigger = &outcome.triggers[0];
        assert_eq!(trigger.rule_id, "r1");
        assert!((trigger.confidence_score - REGEX_CONFIDENCE).abs() < f32::EPSILON);
        assert!(trigger.trigger_context.as_deref().unwrap().contains("hurt animals"));
    }

    #[test]
    fn test_regex_rule_no_match() {
        let rules = vec![pattern_rule("r1", r"(?i)tiger")];
        let outcome = evaluate("I love lions", &rules);
        assert!(outcome.triggers.is_empty());
    }

    #[test]
    fn test_malformed_pattern_isolated() {
        let rules = vec![
            pattern_rule("bad", r"[unclosed"),
            pattern_rule("good", r"(?i)lions?"),
        ];
        let outcome = evaluate("I love lions", &rules);

        assert_eq!(outcome.malformed.len(), 1);
        assert_eq!(outcome.malformed[0].rule_id, "bad");
        assert_eq!(outcome.triggers.len(), 1);
        assert_eq!(outcome.triggers[0].rule_id, "good");
    }

    #[test]
    fn test_disabled_rule_skipped() {
        let mut rule = pattern_rule("r1", r"lions");
        rule.enabled = false;
        let outcome = evaluate("lions everywhere", &[rule]);
        assert!(outcome.triggers.is_empty());
    }

    #[test]
    fn test_keyword_full_overlap() {
        let rules = vec![keyword_rule("r1", "poison feeding wildlife")];
        let outcome = evaluate("Can I go poison the wildlife by feeding them?", &rules);

        assert_eq!(outcome.triggers.len(), 1);
        let conf = outcome.triggers[0].confidence_score;
        assert!((conf - KEYWORD_CONFIDENCE_CEILING).abs() < 0.01);
    }

    #[test]
    fn test_keyword_partial_overlap_scales() {
        // 1 of 3 keywords present
        let rules = vec![keyword_rule("r1", "poison feeding wildlife")];
        let outcome = evaluate("What do zookeepers do about feeding?", &rules);

        assert_eq!(outcome.triggers.len(), 1);
        let conf = outcome.triggers[0].confidence_score;
        assert!((conf - KEYWORD_CONFIDENCE_CEILING / 3.0).abs() < 0.01);
    }

    #[test]
    fn test_keyword_no_overlap() {
        let rules = vec![keyword_rule("r1", "poison feeding wildlife")];
        let outcome = evaluate("I love lions because they're amazing", &rules);
        assert!(outcome.triggers.is_empty());
    }

    #[test]
    fn test_phrase_match_outranks_keywords() {
        let rules = vec![keyword_rule("r1", "secret staff door")];
        let outcome = evaluate("Where is the secret staff door located?", &rules);

        assert_eq!(outcome.triggers.len(), 1);
        assert!((outcome.triggers[0].confidence_score - PHRASE_CONFIDENCE).abs() < f32::EPSILON);
    }

    #[test]
    fn test_one_trigger_per_rule() {
        let rules = vec![pattern_rule("r1", r"(?i)lion")];
        let outcome = evaluate("lion lion lion lion", &rules);
        assert_eq!(outcome.triggers.len(), 1);
    }

    #[test_case("Never discuss harming animals", &["harming", "animals"] ; "stopwords dropped")]
    #[test_case("ALWAYS be kind", &["kind"] ; "short words dropped")]
    #[test_case("animals animals animals", &["animals"] ; "duplicates collapsed")]
    fn test_keywords(text: &str, expected: &[&str]) {
        let words = keywords(text);
        assert_eq!(words, expected.iter().map(|s| s.to_string()).collect::<Vec<_>>());
    }

    #[test]
    fn test_extract_snippet_middle() {
        let text = "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa MATCH bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb";
        let start = text.find("MATCH").unwrap();
        let snippet = extract_snippet(text, start, start + 5, 10);
        assert!(snippet.starts_with("..."));
        assert!(snippet.ends_with("..."));
        assert!(snippet.contains("MATCH"));
    }

    #[test]
    fn test_extract_snippet_whole_text() {
        let snippet = extract_snippet("short", 0, 5, 30);
        assert_eq!(snippet, "short");
    }

    #[test]
    fn test_extract_snippet_multibyte_boundary() {
        let text = "ééééé MATCH ééééé";
        let start = text.find("MATCH").unwrap();
        // Radius lands mid-codepoint without boundary handling
        let snippet = extract_snippet(text, start, start + 5, 2);
        assert!(snippet.contains("MATCH"));
    }
}
