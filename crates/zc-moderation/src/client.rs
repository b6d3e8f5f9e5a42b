//! Moderation client trait and HTTP implementation
//!
//! The HTTP client targets an OpenAI-compatible `/v1/moderations` endpoint.
//! Availability and retry semantics belong to the remote service; callers
//! treat any failure here as "moderation unavailable" and fall back to
//! local rules.

use std::collections::HashMap;
use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::types::{CategoryScore, ModerationCategory, ModerationOutcome};
use zc_types::{AppError, AppResult};

/// A content-moderation classifier
#[async_trait::async_trait]
pub trait ModerationClient: Send + Sync {
    /// Instance identifier (e.g. "openai-moderation")
    fn id(&self) -> &str;

    /// Classify a piece of content
    async fn moderate(&self, content: &str) -> AppResult<ModerationOutcome>;
}

/// Wire format of a moderation response
#[derive(Debug, Deserialize)]
struct ModerationApiResponse {
    results: Vec<ModerationApiResult>,
}

#[derive(Debug, Deserialize)]
struct ModerationApiResult {
    #[serde(default)]
    flagged: bool,
    #[serde(default)]
    category_scores: HashMap<String, f32>,
}

/// Moderation client that calls an OpenAI-compatible moderation endpoint
pub struct HttpModerationClient {
    http_client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpModerationClient {
    /// Create a client with a per-request timeout
    pub fn new(base_url: String, api_key: Option<String>, timeout: Duration) -> Self {
        Self {
            http_client: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
            base_url,
            api_key,
        }
    }

    fn parse_response(&self, body: &str) -> AppResult<ModerationOutcome> {
        let parsed: ModerationApiResponse = serde_json::from_str(body)
            .map_err(|e| AppError::Moderation(format!("Invalid moderation response: {}", e)))?;

        let result = parsed
            .results
            .into_iter()
            .next()
            .ok_or_else(|| AppError::Moderation("Moderation response had no results".into()))?;

        let mut scores: Vec<CategoryScore> = result
            .category_scores
            .into_iter()
            .map(|(label, score)| CategoryScore {
                category: ModerationCategory::from_label(&label),
                score,
            })
            .collect();
        // HashMap iteration order is arbitrary; keep output deterministic
        scores.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        Ok(ModerationOutcome {
            flagged: result.flagged,
            scores,
        })
    }
}

#[async_trait::async_trait]
impl ModerationClient for HttpModerationClient {
    fn id(&self) -> &str {
        "http-moderation"
    }

    async fn moderate(&self, content: &str) -> AppResult<ModerationOutcome> {
        let url = format!("{}/v1/moderations", self.base_url.trim_end_matches('/'));
        let body = serde_json::json!({ "input": content });

        let mut req = self.http_client.post(&url).json(&body);
        if let Some(ref key) = self.api_key {
            req = req.header("Authorization", format!("Bearer {}", key));
        }

        let resp = req
            .send()
            .await
            .map_err(|e| AppError::ModerationUnavailable(format!("Request failed: {}", e)))?;

        let status = resp.status();
        let resp_text = resp
            .text()
            .await
            .map_err(|e| AppError::ModerationUnavailable(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            return Err(AppError::Moderation(format!(
                "Moderation endpoint returned {}: {}",
                status, resp_text
            )));
        }

        let outcome = self.parse_response(&resp_text)?;
        debug!(
            flagged = outcome.flagged,
            categories = outcome.scores.len(),
            "Moderation call completed"
        );
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client() -> HttpModerationClient {
        HttpModerationClient::new(
            "http://localhost:9999".to_string(),
            None,
            Duration::from_secs(5),
        )
    }

    #[test]
    fn test_parse_response() {
        let body = r#"{
            "id": "modr-1",
            "results": [{
                "flagged": true,
                "categories": {"violence": true, "hate": false},
                "category_scores": {"violence": 0.91, "hate": 0.02}
            }]
        }"#;

        let outcome = test_client().parse_response(body).unwrap();
        assert!(outcome.flagged);
        assert_eq!(outcome.scores.len(), 2);
        // Sorted by score descending
        assert_eq!(outcome.scores[0].category, ModerationCategory::Violence);
        assert!((outcome.scores[0].score - 0.91).abs() < f32::EPSILON);
    }

    #[test]
    fn test_parse_response_unknown_category() {
        let body = r#"{"results": [{"flagged": false, "category_scores": {"spam": 0.7}}]}"#;
        let outcome = test_client().parse_response(body).unwrap();
        assert_eq!(
            outcome.scores[0].category,
            ModerationCategory::Other("spam".to_string())
        );
    }

    #[test]
    fn test_parse_response_empty_results() {
        let body = r#"{"results": []}"#;
        assert!(test_client().parse_response(body).is_err());
    }

    #[test]
    fn test_parse_response_invalid_json() {
        assert!(test_client().parse_response("not json").is_err());
    }

    #[tokio::test]
    async fn test_moderate_unreachable_endpoint() {
        let client = HttpModerationClient::new(
            "http://127.0.0.1:1".to_string(),
            None,
            Duration::from_millis(200),
        );
        let err = client.moderate("hello").await.unwrap_err();
        assert!(matches!(err, AppError::ModerationUnavailable(_)));
    }
}
