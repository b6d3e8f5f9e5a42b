//! Conflict explanation strategy
//!
//! When both affirmative (ALWAYS/ENCOURAGE) and restrictive
//! (NEVER/DISCOURAGE) rules trigger on the same content, neither finding
//! is dropped; a response-level note explains the tension. The note can
//! come from an external language model, but correctness never depends on
//! it: the default implementation is a deterministic template.

use crate::types::TriggeredRule;

/// Produces the response-level note for conflicting rule types
pub trait ConflictExplainer: Send + Sync {
    fn explain(&self, triggers: &[TriggeredRule]) -> String;
}

/// Deterministic template-based explainer
pub struct TemplateExplainer;

impl ConflictExplainer for TemplateExplainer {
    fn explain(&self, triggers: &[TriggeredRule]) -> String {
        let affirmative: Vec<&str> = triggers
            .iter()
            .filter(|t| t.rule_type.is_affirmative())
            .map(|t| t.rule_id.as_str())
            .collect();
        let restrictive: Vec<&str> = triggers
            .iter()
            .filter(|t| t.rule_type.is_restrictive())
            .map(|t| t.rule_id.as_str())
            .collect();

        format!(
            "This content matches both encouraged guidance ({}) and restricted guidance ({}). \
             Both findings are reported; the restrictive finding drives the overall verdict.",
            affirmative.join(", "),
            restrictive.join(", ")
        )
    }
}
