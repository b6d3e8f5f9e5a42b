//! Validation engine configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Tunable thresholds and policy knobs for a validation engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Triggers below this confidence (0-100) are dropped
    #[serde(default = "default_confidence_threshold")]
    pub confidence_threshold: f32,
    /// Risk score at or above which content is blocked
    #[serde(default = "default_block_threshold")]
    pub block_threshold: f32,
    /// When true, any critical trigger blocks outright; when false,
    /// critical triggers escalate unless the risk threshold blocks
    #[serde(default = "default_block_on_critical")]
    pub block_on_critical: bool,
    /// Budget for the external moderation call
    #[serde(default = "default_moderation_timeout_secs")]
    pub moderation_timeout_secs: u64,
}

fn default_confidence_threshold() -> f32 {
    50.0
}

fn default_block_threshold() -> f32 {
    85.0
}

fn default_block_on_critical() -> bool {
    true
}

fn default_moderation_timeout_secs() -> u64 {
    10
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: default_confidence_threshold(),
            block_threshold: default_block_threshold(),
            block_on_critical: default_block_on_critical(),
            moderation_timeout_secs: default_moderation_timeout_secs(),
        }
    }
}

impl ValidationConfig {
    pub fn moderation_timeout(&self) -> Duration {
        Duration::from_secs(self.moderation_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ValidationConfig::default();
        assert!((config.confidence_threshold - 50.0).abs() < f32::EPSILON);
        assert!((config.block_threshold - 85.0).abs() < f32::EPSILON);
        assert!(config.block_on_critical);
        assert_eq!(config.moderation_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_partial_deserialization_uses_defaults() {
        let config: ValidationConfig = serde_json::from_str(r#"{"block_threshold": 70.0}"#).unwrap();
        assert!((config.block_threshold - 70.0).abs() < f32::EPSILON);
        assert!((config.confidence_threshold - 50.0).abs() < f32::EPSILON);
    }
}
