//! CLI for the Truth or Dare client.
//!
//! Fetches a single prompt from the Truth or Dare Bot API and prints it,
//! rendering the client's notifications (cooldown messages, low-budget
//! warnings) to stderr the way the web front end renders toasts.

use clap::{Parser, ValueEnum};
use std::process::ExitCode;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, error};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use truthordare_client::{
    ApiError, ClientConfig, Notification, Notifier, Prompt, Rating, Severity, TruthOrDareClient,
};
use url::Url;

/// Which prompt feed to draw from.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum Mode {
    /// Truth questions only.
    Truth,
    /// Dare challenges only.
    Dare,
    /// Mixed "would you rather" prompts.
    Both,
}

/// Truth or Dare - fetch party prompts from the Truth or Dare Bot API.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Prompt feed to draw from.
    #[arg(value_enum, default_value = "both")]
    mode: Mode,

    /// Content rating (pg, pg13, r).
    #[arg(long, default_value = "pg", value_parser = Rating::from_str)]
    rating: Rating,

    /// Mature content shortcut; overrides --rating with r.
    #[arg(long)]
    adult: bool,

    /// Base URL of the API.
    #[arg(long, env = "TRUTHORDARE_BASE_URL")]
    base_url: Option<Url>,

    /// Print the raw JSON payload instead of formatted output.
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize tracing
    init_tracing();

    // Parse arguments
    let args = Args::parse();

    let client = match build_client(&args) {
        Ok(client) => client,
        Err(e) => {
            error!(error = %e, "Failed to initialize client");
            return ExitCode::from(2);
        }
    };

    match fetch_prompt(&client, &args).await {
        Ok(prompt) => {
            print_prompt(&prompt, args.json);

            let state = client.rate_limit_state();
            debug!(
                remaining = state.remaining,
                limited = state.limited,
                "Rate limit budget after fetch"
            );
            ExitCode::from(0)
        }
        Err(e) => {
            error!(error = %e, "Failed to fetch prompt");
            ExitCode::from(1)
        }
    }
}

/// Initializes tracing with environment filter support.
///
/// Sets up the global tracing subscriber with:
/// - Compact log formatting (single-line output)
/// - Log level filtering via `RUST_LOG` env var (defaults to "info")
fn init_tracing() {
    tracing_subscriber::registry()
        // Use compact formatting without module target paths for cleaner output
        .with(fmt::layer().compact().with_target(false))
        // Allow runtime log filtering via RUST_LOG env var (e.g., RUST_LOG=debug)
        // Falls back to "info" level if RUST_LOG is not set or invalid
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        // Register as the global default subscriber
        .init();
}

/// Builds the API client with the toast-style stderr notifier attached.
fn build_client(args: &Args) -> Result<TruthOrDareClient, ApiError> {
    let mut config = ClientConfig::new();
    if let Some(base_url) = &args.base_url {
        config = config.with_base_url(base_url.clone());
    }
    Ok(TruthOrDareClient::new(config)?.with_notifier(Arc::new(StderrNotifier)))
}

/// Fetches one prompt according to the selected mode and rating.
async fn fetch_prompt(client: &TruthOrDareClient, args: &Args) -> Result<Prompt, ApiError> {
    let rating = if args.adult { Rating::R } else { args.rating };

    match args.mode {
        Mode::Truth => client.get_truth(rating).await,
        Mode::Dare => client.get_dare(rating).await,
        Mode::Both => client.get_random(rating).await,
    }
}

/// Prints the fetched prompt.
fn print_prompt(prompt: &Prompt, json: bool) {
    if json {
        match serde_json::to_string_pretty(prompt) {
            Ok(raw) => println!("{raw}"),
            Err(e) => error!(error = %e, "Failed to serialize prompt"),
        }
    } else {
        println!("{} [{}]", prompt.kind, prompt.rating);
        println!("{}", prompt.question);
    }
}

/// Renders notifications to stderr the way the web UI renders toasts.
struct StderrNotifier;

impl Notifier for StderrNotifier {
    fn notify(&self, notification: &Notification) {
        let tag = match notification.severity() {
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        eprintln!("[{tag}] {}", notification.message());
    }
}
