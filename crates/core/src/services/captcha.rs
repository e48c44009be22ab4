//! Anti-abuse verification gate for public submissions.

use std::sync::Arc;

use async_trait::async_trait;
use markethall_common::config::CaptchaConfig;
use markethall_common::{AppError, AppResult};
use serde::Deserialize;
use tracing::{debug, warn};

/// Risk score source behind the gate.
///
/// Returns `Some(score)` only for an unambiguous verification outcome.
/// Transport errors, malformed bodies and provider-side failures all read
/// as `None`; the gate treats `None` as a failed verification.
#[async_trait]
pub trait ScoreProvider: Send + Sync {
    async fn verify(&self, token: &str) -> Option<f64>;
}

#[derive(Debug, Deserialize)]
struct VerifyResponse {
    success: bool,
    score: Option<f64>,
    #[serde(default, rename = "error-codes")]
    error_codes: Vec<String>,
}

/// Production provider: posts the token to the configured verify endpoint.
pub struct HttpScoreProvider {
    client: reqwest::Client,
    verify_url: String,
    secret: String,
}

impl HttpScoreProvider {
    /// Create a provider from configuration.
    #[must_use]
    pub fn new(verify_url: String, secret: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            verify_url,
            secret,
        }
    }
}

#[async_trait]
impl ScoreProvider for HttpScoreProvider {
    async fn verify(&self, token: &str) -> Option<f64> {
        let response = self
            .client
            .post(&self.verify_url)
            .form(&[("secret", self.secret.as_str()), ("response", token)])
            .send()
            .await;

        let response = match response {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "Captcha verification request failed");
                return None;
            }
        };

        let body: VerifyResponse = match response.json().await {
            Ok(body) => body,
            Err(e) => {
                warn!(error = %e, "Captcha verification returned malformed body");
                return None;
            }
        };

        if !body.success {
            debug!(error_codes = ?body.error_codes, "Captcha verification unsuccessful");
            return None;
        }

        // v2-style responses carry no score; a successful one counts as a
        // strong pass.
        Some(body.score.unwrap_or(0.9))
    }
}

/// The gate itself: one verification per mutating public request, never
/// retried.
#[derive(Clone)]
pub struct CaptchaService {
    provider: Arc<dyn ScoreProvider>,
    enabled: bool,
    score_threshold: f64,
}

impl CaptchaService {
    /// Build the gate from configuration with the HTTP provider.
    #[must_use]
    pub fn new(config: &CaptchaConfig) -> Self {
        Self {
            provider: Arc::new(HttpScoreProvider::new(
                config.verify_url.clone(),
                config.secret.clone(),
            )),
            enabled: config.enabled,
            score_threshold: config.score_threshold,
        }
    }

    /// Build the gate over an arbitrary provider.
    #[must_use]
    pub fn with_provider(provider: Arc<dyn ScoreProvider>, enabled: bool, threshold: f64) -> Self {
        Self {
            provider,
            enabled,
            score_threshold: threshold,
        }
    }

    /// Gate a public submission.
    ///
    /// A missing or blank token is rejected before the provider is ever
    /// contacted. A disabled gate accepts everything.
    pub async fn check_submission(&self, token: Option<&str>) -> AppResult<()> {
        if !self.enabled {
            return Ok(());
        }

        let token = token
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::BadRequest("Captcha token is required".to_string()))?;

        let Some(score) = self.provider.verify(token).await else {
            return Err(AppError::Captcha(
                "verification could not be completed".to_string(),
            ));
        };

        // Threshold is inclusive.
        if score >= self.score_threshold {
            Ok(())
        } else {
            debug!(score, threshold = self.score_threshold, "Captcha score below threshold");
            Err(AppError::Captcha(format!("score {score} below threshold")))
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedProvider {
        score: Option<f64>,
        calls: AtomicUsize,
    }

    impl FixedProvider {
        fn new(score: Option<f64>) -> Arc<Self> {
            Arc::new(Self {
                score,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl ScoreProvider for FixedProvider {
        async fn verify(&self, _token: &str) -> Option<f64> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.score
        }
    }

    #[tokio::test]
    async fn threshold_is_inclusive() {
        let gate = CaptchaService::with_provider(FixedProvider::new(Some(0.5)), true, 0.5);
        assert!(gate.check_submission(Some("tok")).await.is_ok());

        let gate = CaptchaService::with_provider(FixedProvider::new(Some(0.499)), true, 0.5);
        assert!(matches!(
            gate.check_submission(Some("tok")).await,
            Err(AppError::Captcha(_))
        ));
    }

    #[tokio::test]
    async fn missing_token_never_reaches_the_provider() {
        let provider = FixedProvider::new(Some(1.0));
        let gate = CaptchaService::with_provider(provider.clone(), true, 0.5);

        let result = gate.check_submission(None).await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));

        let result = gate.check_submission(Some("   ")).await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));

        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn ambiguous_verification_fails_closed() {
        let gate = CaptchaService::with_provider(FixedProvider::new(None), true, 0.5);
        assert!(matches!(
            gate.check_submission(Some("tok")).await,
            Err(AppError::Captcha(_))
        ));
    }

    #[tokio::test]
    async fn disabled_gate_accepts_without_token() {
        let provider = FixedProvider::new(None);
        let gate = CaptchaService::with_provider(provider.clone(), false, 0.5);

        assert!(gate.check_submission(None).await.is_ok());
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }
}
