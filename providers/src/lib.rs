//! Gemini explanation client for Venosim.
//!
//! # Contract
//!
//! [`ExplanationClient::fetch`] maps a [`Stage`] to an [`Explanation`] and
//! **never fails**: every failure mode collapses into a usable fallback so
//! the visualization stays interactive even when the AI feature is down.
//!
//! | Condition | Result |
//! |-----------|--------|
//! | No credential configured | Static offline explanation, no network call |
//! | Transport error / non-2xx / malformed reply | Logged, fixed "unavailable" explanation |
//! | Well-formed reply | Model-generated explanation |
//!
//! The client is stateless and idempotent: repeated calls for the same stage
//! are independent, uncached requests. Callers that care about ordering must
//! discard stale results themselves (the engine does, via
//! [`venosim_types::RequestSeq`]).

pub mod gemini;

use std::sync::OnceLock;
use std::time::Duration;

use venosim_types::{ApiKey, Explanation, Severity, Stage};

/// Canonical Gemini API base URL.
pub const GEMINI_API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default model, matching the Gemini structured-output recommendation.
pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";

const CONNECT_TIMEOUT_SECS: u64 = 30;
const REQUEST_TIMEOUT_SECS: u64 = 30;
const TCP_KEEPALIVE_SECS: u64 = 60;

/// Shared HTTP client with connection hardening.
pub fn http_client() -> &'static reqwest::Client {
    static CLIENT: OnceLock<reqwest::Client> = OnceLock::new();
    CLIENT.get_or_init(|| {
        reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .redirect(reqwest::redirect::Policy::none())
            .tcp_keepalive(Some(Duration::from_secs(TCP_KEEPALIVE_SECS)))
            .build()
            .unwrap_or_else(|e| {
                tracing::error!("Failed to build hardened HTTP client: {e}. Using defaults.");
                reqwest::Client::new()
            })
    })
}

/// Client for fetching stage explanations from the Gemini API.
#[derive(Debug, Clone)]
pub struct ExplanationClient {
    base_url: String,
    model: String,
    api_key: Option<ApiKey>,
}

impl ExplanationClient {
    /// Build a client. `None` or an empty key selects offline mode.
    #[must_use]
    pub fn new(api_key: Option<ApiKey>) -> Self {
        let api_key = api_key.filter(|key| !key.is_empty());
        Self {
            base_url: GEMINI_API_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key,
        }
    }

    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Point the client at a different API base. Used by tests to target a
    /// local mock server.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Whether a credential is configured.
    #[must_use]
    pub fn is_online(&self) -> bool {
        self.api_key.is_some()
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Fetch the explanation for a stage. Infallible by design: failures are
    /// logged and converted to a fallback explanation with `info` severity.
    pub async fn fetch(&self, stage: Stage) -> Explanation {
        let Some(api_key) = &self.api_key else {
            return offline_explanation(stage);
        };

        match gemini::generate(http_client(), &self.base_url, &self.model, api_key, stage).await {
            Ok(explanation) => explanation,
            Err(e) => {
                tracing::warn!(stage = %stage, error = %e, "Explanation request failed");
                unavailable_explanation(stage)
            }
        }
    }
}

/// Fixed explanation shown when no credential is configured.
#[must_use]
pub fn offline_explanation(stage: Stage) -> Explanation {
    Explanation {
        title: format!("{} (offline)", stage.label()),
        content: "No API key is configured, so AI explanations are disabled. \
                  Set GEMINI_API_KEY or add api_key to ~/.venosim/config.toml \
                  to enable them. The simulation itself is fully interactive."
            .to_string(),
        severity: Severity::Info,
    }
}

/// Fixed explanation shown when a backend request fails.
#[must_use]
pub fn unavailable_explanation(stage: Stage) -> Explanation {
    Explanation {
        title: format!("{} (explanation unavailable)", stage.label()),
        content: "The explanation service could not be reached. Check the \
                  network connection and API key; the simulation keeps running \
                  without it."
            .to_string(),
        severity: Severity::Info,
    }
}

#[cfg(test)]
mod tests {
    use super::{ExplanationClient, offline_explanation, unavailable_explanation};
    use venosim_types::{ApiKey, Severity, Stage};

    #[test]
    fn empty_key_selects_offline_mode() {
        assert!(!ExplanationClient::new(None).is_online());
        assert!(!ExplanationClient::new(Some(ApiKey::new("  "))).is_online());
        assert!(ExplanationClient::new(Some(ApiKey::new("AIza-test"))).is_online());
    }

    #[test]
    fn fallbacks_are_well_formed_for_every_stage() {
        for stage in Stage::all() {
            for explanation in [offline_explanation(stage), unavailable_explanation(stage)] {
                assert!(!explanation.title.trim().is_empty());
                assert!(!explanation.content.trim().is_empty());
                assert_eq!(explanation.severity, Severity::Info);
            }
        }
    }

    #[test]
    fn fallbacks_are_deterministic() {
        assert_eq!(
            unavailable_explanation(Stage::Varicose),
            unavailable_explanation(Stage::Varicose)
        );
        assert_eq!(
            offline_explanation(Stage::PostEmbolism),
            offline_explanation(Stage::PostEmbolism)
        );
    }

    #[tokio::test]
    async fn offline_fetch_never_touches_the_network() {
        // Unroutable base URL: any attempted request would error, which would
        // surface as the "unavailable" fallback instead of the offline one.
        let client = ExplanationClient::new(None).with_base_url("http://127.0.0.1:1");
        let explanation = client.fetch(Stage::Normal).await;
        assert_eq!(explanation, offline_explanation(Stage::Normal));
    }
}
