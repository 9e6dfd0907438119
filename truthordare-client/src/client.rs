//! Rate-limit-aware HTTP client for the Truth or Dare Bot API.
//!
//! Every operation runs an explicit two-stage pipeline: a pre-flight gate
//! against the tracked rate-limit budget, then a response classifier that
//! keeps the budget current and maps failures onto [`ApiError`]. The client
//! never retries on its own; it surfaces each condition once (to the caller
//! as an error, to the user through the injected [`Notifier`]).

mod config;
mod error;

pub use config::ClientConfig;
pub use error::ApiError;

use crate::notify::{Notification, Notifier, TracingNotifier};
use crate::rate_limit::{now_ms, GateDecision, RateLimitState, RateLimitTracker};
use crate::types::{Prompt, PromptKind, Rating};
use reqwest::StatusCode;
use std::sync::Arc;
use tracing::{debug, warn};
use url::Url;

/// Client for the Truth or Dare Bot API.
///
/// Wraps a [`reqwest::Client`] with rate-limit tracking: a confirmed 429
/// engages a cooldown gate that rejects calls locally until the advertised
/// reset time has passed. Operations may run concurrently; they share one
/// [`RateLimitState`] and each reads it at the moment it starts. Two calls
/// racing a third call's 429 can both still reach the network - the server
/// remains the authoritative limiter.
pub struct TruthOrDareClient {
    http: reqwest::Client,
    config: ClientConfig,
    limits: RateLimitTracker,
    notifier: Arc<dyn Notifier>,
}

impl TruthOrDareClient {
    /// Builds a client from the provided configuration.
    ///
    /// Notifications go to the default [`TracingNotifier`]; use
    /// [`with_notifier`](Self::with_notifier) to redirect them.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Unknown`] if the underlying HTTP client cannot
    /// be constructed.
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;
        Ok(Self {
            http,
            config,
            limits: RateLimitTracker::default(),
            notifier: Arc::new(TracingNotifier),
        })
    }

    /// Replaces the notifier receiving user-facing condition reports.
    #[must_use]
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Fetches a truth prompt.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] describing the single failure condition; see the
    /// variant docs.
    pub async fn get_truth(&self, rating: Rating) -> Result<Prompt, ApiError> {
        self.fetch(PromptKind::Truth, rating).await
    }

    /// Fetches a dare prompt.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] describing the single failure condition; see the
    /// variant docs.
    pub async fn get_dare(&self, rating: Rating) -> Result<Prompt, ApiError> {
        self.fetch(PromptKind::Dare, rating).await
    }

    /// Fetches a random "would you rather" prompt.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] describing the single failure condition; see the
    /// variant docs.
    pub async fn get_random(&self, rating: Rating) -> Result<Prompt, ApiError> {
        self.fetch(PromptKind::Random, rating).await
    }

    /// Returns a snapshot of the tracked rate-limit state.
    ///
    /// The returned value is a copy; mutating it has no effect on the
    /// client.
    #[must_use]
    pub fn rate_limit_state(&self) -> RateLimitState {
        self.limits.snapshot()
    }

    async fn fetch(&self, kind: PromptKind, rating: Rating) -> Result<Prompt, ApiError> {
        self.before_request()?;

        let url = endpoint(self.config.base_url(), kind);
        debug!(%url, rating = rating.as_str(), "Requesting prompt");

        let result = self
            .http
            .get(&url)
            .query(&[("rating", rating.as_str())])
            .send()
            .await;

        self.after_response(result).await
    }

    /// Pre-flight gate: rejects the call locally while a cooldown is active.
    fn before_request(&self) -> Result<(), ApiError> {
        match self.limits.check(now_ms()) {
            GateDecision::Proceed => Ok(()),
            GateDecision::Blocked { wait_secs } => {
                debug!(wait_secs, "Blocking request during rate limit cooldown");
                self.notifier.notify(&Notification::Blocked { wait_secs });
                Err(ApiError::RateLimitBlocked { wait_secs })
            }
        }
    }

    /// Response classifier: updates the budget from server signals and maps
    /// the outcome onto exactly one [`ApiError`] variant.
    async fn after_response(
        &self,
        result: Result<reqwest::Response, reqwest::Error>,
    ) -> Result<Prompt, ApiError> {
        let response = match result {
            Ok(response) => response,
            Err(err) => return Err(self.classify_transport(err)),
        };

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            let wait_secs = self.limits.record_exceeded(response.headers(), now_ms());
            warn!(?wait_secs, "Rate limit exceeded");
            self.notifier
                .notify(&Notification::RateLimitExceeded { wait_secs });
            return Err(ApiError::RateLimitExceeded { wait_secs });
        }
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            warn!("Server error");
            self.notifier.notify(&Notification::ServerError);
            return Err(ApiError::ServerError);
        }
        let response = match response.error_for_status() {
            Ok(response) => response,
            Err(err) => return Err(self.classify_transport(err)),
        };

        if let Some(remaining) = self.limits.record_success(response.headers()) {
            debug!(remaining, "Rate limit budget low");
            self.notifier.notify(&Notification::LowBudget { remaining });
        }

        match response.json::<Prompt>().await {
            Ok(prompt) => Ok(prompt),
            Err(err) => Err(self.classify_transport(err)),
        }
    }

    /// Maps a transport-level failure onto the taxonomy, emitting the
    /// matching notification.
    fn classify_transport(&self, err: reqwest::Error) -> ApiError {
        if err.is_timeout() {
            let timeout_secs = self.config.timeout().as_secs();
            warn!(timeout_secs, "Request timed out");
            self.notifier.notify(&Notification::Timeout);
            ApiError::Timeout { timeout_secs }
        } else {
            warn!(error = %err, "Request failed");
            self.notifier.notify(&Notification::RequestFailed);
            ApiError::Unknown(err)
        }
    }
}

/// Builds the request URL for a prompt kind against the configured base.
fn endpoint(base: &Url, kind: PromptKind) -> String {
    format!("{}/{}", base.as_str().trim_end_matches('/'), kind.path())
}
