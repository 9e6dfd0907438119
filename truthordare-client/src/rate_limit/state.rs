//! Rate limit state.

/// Optimistic request budget assumed before the first server response.
pub(crate) const DEFAULT_REMAINING: u32 = 100;

/// Snapshot of the remote rate-limit budget as last observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitState {
    /// Requests believed still permitted in the current window.
    pub remaining: u32,

    /// Epoch milliseconds at which the current window ends (0 until the
    /// server reports one).
    pub reset_at_ms: u64,

    /// Whether requests are currently rejected pre-flight.
    pub limited: bool,
}

impl Default for RateLimitState {
    fn default() -> Self {
        Self {
            remaining: DEFAULT_REMAINING,
            reset_at_ms: 0,
            limited: false,
        }
    }
}
