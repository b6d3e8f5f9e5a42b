//! Moderation category and outcome types
//!
//! Categories are mapped from the classifier's native labels (e.g.
//! "self-harm", "sexual/minors"). Unknown labels are preserved as
//! [`ModerationCategory::Other`] for forward compatibility.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Content category reported by the moderation classifier
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ModerationCategory {
    Hate,
    Harassment,
    SelfHarm,
    Sexual,
    SexualMinors,
    Violence,
    ViolenceGraphic,
    Illicit,
    /// Unrecognized native label, preserved verbatim
    Other(String),
}

impl ModerationCategory {
    /// Map a classifier's native label onto a category
    pub fn from_label(label: &str) -> Self {
        match label.to_lowercase().as_str() {
            "hate" | "hate/threatening" => Self::Hate,
            "harassment" | "harassment/threatening" => Self::Harassment,
            "self-harm" | "self-harm/intent" | "self-harm/instructions" => Self::SelfHarm,
            "sexual" => Self::Sexual,
            "sexual/minors" => Self::SexualMinors,
            "violence" => Self::Violence,
            "violence/graphic" => Self::ViolenceGraphic,
            "illicit" | "illicit/violent" => Self::Illicit,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for ModerationCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hate => write!(f, "Hate"),
            Self::Harassment => write!(f, "Harassment"),
            Self::SelfHarm => write!(f, "Self-Harm"),
            Self::Sexual => write!(f, "Sexual Content"),
            Self::SexualMinors => write!(f, "Sexual Content Involving Minors"),
            Self::Violence => write!(f, "Violence"),
            Self::ViolenceGraphic => write!(f, "Graphic Violence"),
            Self::Illicit => write!(f, "Illicit Activity"),
            Self::Other(label) => write!(f, "{}", label),
        }
    }
}

/// A single category score from the classifier, raw confidence in 0.0-1.0
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryScore {
    pub category: ModerationCategory,
    pub score: f32,
}

/// Result of one moderation call
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModerationOutcome {
    /// Overall flagged determination from the classifier
    pub flagged: bool,
    /// Per-category confidence scores
    pub scores: Vec<CategoryScore>,
}

impl ModerationOutcome {
    /// Highest category score, if any categories were reported
    pub fn max_score(&self) -> Option<f32> {
        self.scores
            .iter()
            .map(|s| s.score)
            .max_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
    }

    /// Scores at or above a raw threshold (0.0-1.0)
    pub fn scores_above(&self, threshold: f32) -> Vec<&CategoryScore> {
        self.scores.iter().filter(|s| s.score >= threshold).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_label_known() {
        assert_eq!(
            ModerationCategory::from_label("self-harm"),
            ModerationCategory::SelfHarm
        );
        assert_eq!(
            ModerationCategory::from_label("sexual/minors"),
            ModerationCategory::SexualMinors
        );
        assert_eq!(
            ModerationCategory::from_label("Hate/Threatening"),
            ModerationCategory::Hate
        );
    }

    #[test]
    fn test_from_label_unknown_preserved() {
        assert_eq!(
            ModerationCategory::from_label("spam"),
            ModerationCategory::Other("spam".to_string())
        );
    }

    #[test]
    fn test_max_score() {
        let outcome = ModerationOutcome {
            flagged: true,
            scores: vec![
                CategoryScore {
                    category: ModerationCategory::Violence,
                    score: 0.82,
                },
                CategoryScore {
                    category: ModerationCategory::Hate,
                    score: 0.31,
                },
            ],
        };
        assert_eq!(outcome.max_score(), Some(0.82));
        assert_eq!(outcome.scores_above(0.5).len(), 1);
    }

    #[test]
    fn test_max_score_empty() {
        let outcome = ModerationOutcome::default();
        assert_eq!(outcome.max_score(), None);
    }
}
