#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

pub mod client;
pub mod notify;
pub mod rate_limit;
pub mod types;

pub use client::{ApiError, ClientConfig, TruthOrDareClient};
pub use notify::{Notification, Notifier, Severity, TracingNotifier};
pub use rate_limit::RateLimitState;
pub use types::{InvalidRating, Prompt, PromptKind, Rating};
