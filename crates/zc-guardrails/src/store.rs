//! Rule store: the single interface for reading and writing guardrail rules
//!
//! Evaluation reads a per-call snapshot; a rule update never affects an
//! in-flight evaluation, only subsequent ones. The only engine-initiated
//! write is the idempotent auto-disable of malformed rules.

use parking_lot::RwLock;
use tracing::{debug, info};

use crate::types::GuardrailRule;
use zc_types::AppResult;

/// Storage interface for guardrail rules
pub trait RuleStore: Send + Sync {
    /// Snapshot of all enabled rules
    fn enabled_rules(&self) -> Vec<GuardrailRule>;

    /// Snapshot of all rules, enabled or not
    fn list_rules(&self) -> Vec<GuardrailRule>;

    /// Look up a single rule
    fn get_rule(&self, rule_id: &str) -> Option<GuardrailRule>;

    /// Insert or replace a rule; the rule is validated first
    fn upsert_rule(&self, rule: GuardrailRule) -> AppResult<()>;

    /// Remove a rule; returns whether it existed
    fn remove_rule(&self, rule_id: &str) -> bool;

    /// Flip a rule to disabled. Idempotent: returns true only if the
    /// rule existed and was enabled.
    fn disable_rule(&self, rule_id: &str) -> bool;
}

/// In-memory rule store
pub struct InMemoryRuleStore {
    rules: RwLock<Vec<GuardrailRule>>,
}

impl InMemoryRuleStore {
    pub fn new() -> Self {
        Self {
            rules: RwLock::new(Vec::new()),
        }
    }

    /// Create a store pre-loaded with validated rules
    pub fn with_rules(rules: Vec<GuardrailRule>) -> AppResult<Self> {
        for rule in &rules {
            rule.validate()?;
        }
        info!("Loaded {} guardrail rules", rules.len());
        Ok(Self {
            rules: RwLock::new(rules),
        })
    }
}

impl Default for InMemoryRuleStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleStore for InMemoryRuleStore {
    fn enabled_rules(&self) -> Vec<GuardrailRule> {
        self.rules
            .read()
            .iter()
            .filter(|r| r.enabled)
            .cloned()
            .collect()
    }

    fn list_rules(&self) -> Vec<GuardrailRule> {
        self.rules.read().clone()
    }

    fn get_rule(&self, rule_id: &str) -> Option<GuardrailRule> {
        self.rules.read().iter().find(|r| r.rule_id == rule_id).cloned()
    }

    fn upsert_rule(&self, rule: GuardrailRule) -> AppResult<()> {
        rule.validate()?;
        let mut rules = self.rules.write();
        if let Some(existing) = rules.iter_mut().find(|r| r.rule_id == rule.rule_id) {
            *existing = rule;
        } else {
            rules.push(rule);
        }
        Ok(())
    }

    fn remove_rule(&self, rule_id: &str) -> bool {
        let mut rules = self.rules.write();
        let before = rules.len();
        rules.retain(|r| r.rule_id != rule_id);
        rules.len() < before
    }

    fn disable_rule(&self, rule_id: &str) -> bool {
        let mut rules = self.rules.write();
        match rules.iter_mut().find(|r| r.rule_id == rule_id) {
            Some(rule) if rule.enabled => {
                rule.enabled = false;
                debug!("Rule '{}' disabled", rule_id);
                true
            }
            _ => false,
        }
    }
}
