//! Rate limit tracking for the Truth or Dare Bot API.
//!
//! This module tracks the request budget the server advertises through
//! `x-ratelimit-*` response headers and gates outbound calls while a
//! confirmed 429 cooldown is active. The gate never sleeps: a blocked call
//! is rejected immediately and the flag clears lazily on the next attempt
//! after the reset time passes.

mod state;

pub use state::RateLimitState;

use reqwest::header::HeaderMap;
use std::str::FromStr;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};

/// Remaining-request threshold at or below which a low-budget warning fires.
pub(crate) const LOW_BUDGET_THRESHOLD: u32 = 5;

/// Header carrying the remaining request count for the current window.
const REMAINING_HEADER: &str = "x-ratelimit-remaining";

/// Header carrying the window reset time as Unix seconds.
const RESET_HEADER: &str = "x-ratelimit-reset";

/// Outcome of the pre-flight gate check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum GateDecision {
    /// Not limited (or the cooldown elapsed); the request may go out.
    Proceed,

    /// Cooldown still active; the request must not reach the network.
    Blocked {
        /// Whole seconds until the cooldown window ends.
        wait_secs: u64,
    },
}

/// Tracks the rate-limit budget for one client instance.
///
/// All mutation happens inside the client's request pipeline; callers only
/// ever observe copies via [`RateLimitTracker::snapshot`]. Each gate or
/// recording pass holds the lock for a single short critical section, so
/// concurrent in-flight requests never observe a partial update.
#[derive(Debug, Default)]
pub(crate) struct RateLimitTracker {
    state: Mutex<RateLimitState>,
}

impl RateLimitTracker {
    /// Returns a copy of the current state.
    pub(crate) fn snapshot(&self) -> RateLimitState {
        *self.state()
    }

    /// Pre-flight gate: decides whether a request may go out at `now_ms`.
    ///
    /// Clears the `limited` flag once the cooldown has elapsed and lets the
    /// request through; the server stays the final arbiter for that call.
    pub(crate) fn check(&self, now_ms: u64) -> GateDecision {
        let mut state = self.state();

        if !state.limited {
            return GateDecision::Proceed;
        }

        if now_ms < state.reset_at_ms {
            GateDecision::Blocked {
                wait_secs: wait_secs(state.reset_at_ms, now_ms),
            }
        } else {
            state.limited = false;
            GateDecision::Proceed
        }
    }

    /// Applies `x-ratelimit-*` headers from a successful response.
    ///
    /// Absent or unparseable headers leave the previous values untouched.
    /// A successful response also confirms capacity, so the `limited` flag
    /// is cleared unconditionally.
    ///
    /// Returns the updated remaining budget when it sits in the low-budget
    /// range `(0, LOW_BUDGET_THRESHOLD]`.
    pub(crate) fn record_success(&self, headers: &HeaderMap) -> Option<u32> {
        let mut state = self.state();

        if let Some(remaining) = header_value::<u32>(headers, REMAINING_HEADER) {
            state.remaining = remaining;
        }
        if let Some(reset_secs) = header_value::<u64>(headers, RESET_HEADER) {
            state.reset_at_ms = reset_secs * 1000;
        }
        state.limited = false;

        (state.remaining > 0 && state.remaining <= LOW_BUDGET_THRESHOLD).then_some(state.remaining)
    }

    /// Applies a confirmed 429 observed at `now_ms`.
    ///
    /// With a parseable reset header the cooldown gate engages and the wait
    /// in whole seconds is returned. Without one there is no reset time to
    /// gate on, so the state is left as-is.
    pub(crate) fn record_exceeded(&self, headers: &HeaderMap, now_ms: u64) -> Option<u64> {
        let reset_secs = header_value::<u64>(headers, RESET_HEADER)?;
        let mut state = self.state();

        state.reset_at_ms = reset_secs * 1000;
        state.limited = true;

        Some(wait_secs(state.reset_at_ms, now_ms))
    }

    fn state(&self) -> MutexGuard<'_, RateLimitState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Seconds until `reset_at_ms`, rounded up; 0 once the reset has passed.
pub(crate) fn wait_secs(reset_at_ms: u64, now_ms: u64) -> u64 {
    reset_at_ms.saturating_sub(now_ms).div_ceil(1000)
}

/// Current wall-clock time in epoch milliseconds.
pub(crate) fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// Parses a header value, ignoring anything malformed.
fn header_value<T: FromStr>(headers: &HeaderMap, name: &str) -> Option<T> {
    headers.get(name)?.to_str().ok()?.parse().ok()
}
