//! User-facing condition notifications.
//!
//! The client reports every distinct request outcome through the [`Notifier`]
//! capability. Presentation layers (toasts, terminals) decide how to render
//! each [`Notification`]; the message text, display duration and severity
//! hints are provided here so all front ends agree on the content.

use std::time::Duration;
use tracing::{error, warn};

/// Display severity hint for a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Advisory; the operation still succeeded.
    Warning,

    /// The operation failed.
    Error,
}

/// A user-facing condition reported by the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// The remaining request budget has dropped to a handful.
    LowBudget {
        /// Requests left in the current window.
        remaining: u32,
    },

    /// The server confirmed the rate limit was exceeded (429).
    RateLimitExceeded {
        /// Whole seconds until the window resets, when the server said so.
        wait_secs: Option<u64>,
    },

    /// The call was rejected locally while a cooldown is active.
    Blocked {
        /// Whole seconds until the cooldown ends.
        wait_secs: u64,
    },

    /// The server answered 500.
    ServerError,

    /// No response arrived within the configured deadline.
    Timeout,

    /// Any other transport or HTTP failure.
    RequestFailed,
}

impl Notification {
    /// Returns the message to present to the user.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::LowBudget { remaining } => {
                format!("Only {remaining} requests remaining!")
            }
            Self::RateLimitExceeded {
                wait_secs: Some(wait),
            } => format!("Rate limit exceeded! Please wait {wait} seconds."),
            Self::RateLimitExceeded { wait_secs: None } => {
                "Rate limit exceeded! Please slow down.".to_string()
            }
            Self::Blocked { wait_secs } => {
                format!("Rate limit exceeded. Please wait {wait_secs} seconds.")
            }
            Self::ServerError => "Server error. Please try again later.".to_string(),
            Self::Timeout => "Request timeout. Please check your connection.".to_string(),
            Self::RequestFailed => "Something went wrong. Please try again.".to_string(),
        }
    }

    /// Returns how long the message should stay visible.
    #[must_use]
    pub fn duration(&self) -> Duration {
        match self {
            Self::LowBudget { .. } => Duration::from_secs(3),
            Self::RateLimitExceeded { .. } | Self::Blocked { .. } => Duration::from_secs(5),
            Self::ServerError | Self::Timeout | Self::RequestFailed => Duration::from_secs(4),
        }
    }

    /// Returns the display severity.
    #[must_use]
    pub fn severity(&self) -> Severity {
        match self {
            Self::LowBudget { .. } => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

/// Capability for delivering user-facing notifications.
///
/// Implementations should hand the notification off quickly (queue it, print
/// it); the client invokes this inline on its request path.
pub trait Notifier: Send + Sync {
    /// Reports one condition.
    fn notify(&self, notification: &Notification);
}

/// Default notifier that forwards notifications to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: &Notification) {
        match notification.severity() {
            Severity::Warning => warn!("{}", notification.message()),
            Severity::Error => error!("{}", notification.message()),
        }
    }
}
