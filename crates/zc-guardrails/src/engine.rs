//! Validation engine
//!
//! Ties the pieces together for one synchronous, stateless validation
//! call: snapshot rules, match locally, consult the moderation classifier
//! under a timeout, compose the verdict. The only writes are the
//! idempotent auto-disables of malformed rules.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, warn};

use zc_moderation::ModerationClient;

use crate::analytics::AnalyticsRecorder;
use crate::composer::{self, ModerationInput};
use crate::config::ValidationConfig;
use crate::explain::{ConflictExplainer, TemplateExplainer};
use crate::matcher;
use crate::store::RuleStore;
use crate::types::ValidationResponse;

/// The main validation engine
pub struct ValidationEngine {
    store: Arc<dyn RuleStore>,
    moderation: Option<Arc<dyn ModerationClient>>,
    explainer: Box<dyn ConflictExplainer>,
    analytics: Option<Arc<AnalyticsRecorder>>,
    config: ValidationConfig,
}

impl ValidationEngine {
    /// Create an engine over a rule store, local rules only
    pub fn new(store: Arc<dyn RuleStore>, config: ValidationConfig) -> Self {
        Self {
            store,
            moderation: None,
            explainer: Box::new(TemplateExplainer),
            analytics: None,
            config,
        }
    }

    /// Attach an external moderation classifier
    pub fn with_moderation(mut self, client: Arc<dyn ModerationClient>) -> Self {
        self.moderation = Some(client);
        self
    }

    /// Replace the conflict explainer strategy
    pub fn with_explainer(mut self, explainer: Box<dyn ConflictExplainer>) -> Self {
        self.explainer = explainer;
        self
    }

    /// Attach an hourly analytics recorder
    pub fn with_analytics(mut self, recorder: Arc<AnalyticsRecorder>) -> Self {
        self.analytics = Some(recorder);
        self
    }

    pub fn store(&self) -> &Arc<dyn RuleStore> {
        &self.store
    }

    /// Validate a piece of content against local rules and the external
    /// moderation classifier. Never fails: a moderation outage degrades
    /// the response, a malformed rule is disabled and skipped.
    pub async fn validate(&self, content: &str) -> ValidationResponse {
        let start = Instant::now();
        let rules = self.store.enabled_rules();
        let outcome = matcher::evaluate(content, &rules);

        let mut notices = Vec::new();
        for malformed in &outcome.malformed {
            if self.store.disable_rule(&malformed.rule_id) {
                warn!(
                    "Rule '{}' disabled: malformed pattern ({})",
                    malformed.rule_id, malformed.error
                );
            }
            notices.push(format!(
                "rule {} disabled: malformed pattern",
                malformed.rule_id
            ));
        }

        let moderation = match &self.moderation {
            None => ModerationInput::Disabled,
            Some(client) => {
                let budget = self.config.moderation_timeout();
                match tokio::time::timeout(budget, client.moderate(content)).await {
                    Ok(Ok(result)) => ModerationInput::Outcome(result),
                    Ok(Err(e)) => {
                        warn!("Moderation unavailable, validating with local rules only: {}", e);
                        ModerationInput::Unavailable
                    }
                    Err(_) => {
                        warn!("Moderation call exceeded {:?}, validating with local rules only", budget);
                        ModerationInput::Unavailable
                    }
                }
            }
        };

        let mut response = composer::compose(
            outcome.triggers,
            moderation,
            &rules,
            &self.config,
            self.explainer.as_ref(),
        );
        response.notices = notices;
        response.processing_time_ms = start.elapsed().as_millis() as u64;

        debug!(
            "Validation {}: {} ({} rules checked, {} triggered, {}ms)",
            response.validation_id,
            response.result,
            rules.len(),
            response.summary.total_triggered,
            response.processing_time_ms
        );

        if let Some(recorder) = &self.analytics {
            recorder.record(&response);
        }

        response
    }
}
