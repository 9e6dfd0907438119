use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use truthordare_client::{
    ApiError, ClientConfig, Notification, Notifier, PromptKind, Rating, TruthOrDareClient,
};
use url::Url;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Captures every notification the client emits so tests can assert on the
/// exact sequence.
#[derive(Default)]
struct RecordingNotifier {
    seen: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    fn seen(&self) -> Vec<Notification> {
        self.seen.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: &Notification) {
        self.seen.lock().unwrap().push(notification.clone());
    }
}

fn now_epoch_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs()
}

async fn client_for(server: &MockServer) -> (TruthOrDareClient, Arc<RecordingNotifier>) {
    let notifier = Arc::new(RecordingNotifier::default());
    let config = ClientConfig::new()
        .with_base_url(Url::parse(&server.uri()).unwrap())
        .with_timeout(Duration::from_secs(1));
    let client = TruthOrDareClient::new(config)
        .unwrap()
        .with_notifier(notifier.clone());
    (client, notifier)
}

fn prompt_body(kind: &str, rating: &str, question: &str) -> serde_json::Value {
    serde_json::json!({
        "id": "q1",
        "type": kind,
        "rating": rating,
        "question": question,
    })
}

#[tokio::test]
async fn fetches_truth_and_records_headers() {
    let server = MockServer::start().await;
    let (client, notifier) = client_for(&server).await;

    Mock::given(method("GET"))
        .and(path("/truth"))
        .and(query_param("rating", "pg"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("x-ratelimit-remaining", "42")
                .set_body_json(prompt_body("TRUTH", "pg", "X")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let prompt = client.get_truth(Rating::Pg).await.unwrap();

    assert_eq!(prompt.kind, PromptKind::Truth);
    assert_eq!(prompt.rating, Rating::Pg);
    assert_eq!(prompt.question, "X");

    let state = client.rate_limit_state();
    assert_eq!(state.remaining, 42);
    assert!(!state.limited);
    assert!(notifier.seen().is_empty());
}

#[tokio::test]
async fn successful_sequences_never_engage_the_gate() {
    let server = MockServer::start().await;
    let (client, _notifier) = client_for(&server).await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("x-ratelimit-remaining", "10")
                .set_body_json(prompt_body("DARE", "pg", "Do a handstand")),
        )
        .expect(3)
        .mount(&server)
        .await;

    client.get_dare(Rating::Pg).await.unwrap();
    client.get_truth(Rating::Pg).await.unwrap();
    client.get_random(Rating::Pg).await.unwrap();

    assert!(!client.rate_limit_state().limited);
}

#[tokio::test]
async fn rate_limit_exceeded_blocks_the_next_call_locally() {
    let server = MockServer::start().await;
    let (client, notifier) = client_for(&server).await;
    let reset = now_epoch_secs() + 30;

    // Exactly one request may reach the server; the follow-up call must be
    // rejected by the gate without touching the network.
    Mock::given(method("GET"))
        .and(path("/dare"))
        .and(query_param("rating", "r"))
        .respond_with(
            ResponseTemplate::new(429)
                .insert_header("x-ratelimit-reset", reset.to_string().as_str()),
        )
        .expect(1)
        .mount(&server)
        .await;

    let err = client.get_dare(Rating::R).await.unwrap_err();
    let wait = match err {
        ApiError::RateLimitExceeded { wait_secs } => wait_secs.unwrap(),
        other => panic!("expected RateLimitExceeded, got {other:?}"),
    };
    assert!((29..=30).contains(&wait), "wait was {wait}");

    let state = client.rate_limit_state();
    assert!(state.limited);
    assert_eq!(state.reset_at_ms, reset * 1000);

    let err = client.get_dare(Rating::R).await.unwrap_err();
    let wait = match err {
        ApiError::RateLimitBlocked { wait_secs } => wait_secs,
        other => panic!("expected RateLimitBlocked, got {other:?}"),
    };
    assert!((28..=30).contains(&wait), "wait was {wait}");

    let seen = notifier.seen();
    assert_eq!(seen.len(), 2);
    assert!(matches!(seen[0], Notification::RateLimitExceeded { .. }));
    assert!(matches!(seen[1], Notification::Blocked { .. }));
}

#[tokio::test]
async fn elapsed_cooldown_lets_the_next_call_through() {
    let server = MockServer::start().await;
    let (client, _notifier) = client_for(&server).await;

    {
        let _guard = Mock::given(method("GET"))
            .and(path("/truth"))
            .respond_with(
                ResponseTemplate::new(429).insert_header(
                    "x-ratelimit-reset",
                    (now_epoch_secs() - 1).to_string().as_str(),
                ),
            )
            .expect(1)
            .mount_as_scoped(&server)
            .await;

        let err = client.get_truth(Rating::Pg).await.unwrap_err();
        assert!(matches!(err, ApiError::RateLimitExceeded { .. }));
        assert!(client.rate_limit_state().limited);
    }

    // Reset time already passed, so the gate clears and the request goes out.
    Mock::given(method("GET"))
        .and(path("/truth"))
        .respond_with(ResponseTemplate::new(200).set_body_json(prompt_body("TRUTH", "pg", "Y")))
        .expect(1)
        .mount(&server)
        .await;

    let prompt = client.get_truth(Rating::Pg).await.unwrap();
    assert_eq!(prompt.question, "Y");
    assert!(!client.rate_limit_state().limited);
}

#[tokio::test]
async fn missing_reset_header_on_429_does_not_engage_the_gate() {
    let server = MockServer::start().await;
    let (client, _notifier) = client_for(&server).await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429))
        .expect(2)
        .mount(&server)
        .await;

    let err = client.get_random(Rating::Pg).await.unwrap_err();
    assert!(matches!(
        err,
        ApiError::RateLimitExceeded { wait_secs: None }
    ));
    assert!(!client.rate_limit_state().limited);

    // No reset time to gate on, so the second call still reaches the server.
    let err = client.get_random(Rating::Pg).await.unwrap_err();
    assert!(matches!(err, ApiError::RateLimitExceeded { .. }));
}

#[tokio::test]
async fn low_budget_header_triggers_exactly_one_warning() {
    let server = MockServer::start().await;
    let (client, notifier) = client_for(&server).await;

    {
        let _guard = Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("x-ratelimit-remaining", "3")
                    .set_body_json(prompt_body("TRUTH", "pg", "X")),
            )
            .mount_as_scoped(&server)
            .await;

        client.get_truth(Rating::Pg).await.unwrap();
    }

    assert_eq!(client.rate_limit_state().remaining, 3);
    assert_eq!(
        notifier.seen(),
        vec![Notification::LowBudget { remaining: 3 }]
    );

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("x-ratelimit-remaining", "50")
                .set_body_json(prompt_body("TRUTH", "pg", "X")),
        )
        .mount(&server)
        .await;

    client.get_truth(Rating::Pg).await.unwrap();

    assert_eq!(client.rate_limit_state().remaining, 50);
    assert_eq!(notifier.seen().len(), 1);
}

#[tokio::test]
async fn state_snapshot_is_a_copy() {
    let server = MockServer::start().await;
    let (client, _notifier) = client_for(&server).await;

    let mut snapshot = client.rate_limit_state();
    snapshot.remaining = 0;
    snapshot.limited = true;

    let fresh = client.rate_limit_state();
    assert_eq!(fresh.remaining, 100);
    assert!(!fresh.limited);
}

#[tokio::test]
async fn repeated_calls_are_independent() {
    let server = MockServer::start().await;
    let (client, _notifier) = client_for(&server).await;

    Mock::given(method("GET"))
        .and(path("/truth"))
        .and(query_param("rating", "pg"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("x-ratelimit-remaining", "10")
                .set_body_json(prompt_body("TRUTH", "pg", "X")),
        )
        .expect(2)
        .mount(&server)
        .await;

    let first = client.get_truth(Rating::Pg).await.unwrap();
    let second = client.get_truth(Rating::Pg).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(client.rate_limit_state().remaining, 10);
}

#[tokio::test]
async fn server_error_maps_to_server_error() {
    let server = MockServer::start().await;
    let (client, notifier) = client_for(&server).await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = client.get_truth(Rating::Pg).await.unwrap_err();

    assert!(matches!(err, ApiError::ServerError));
    assert_eq!(notifier.seen(), vec![Notification::ServerError]);
}

#[tokio::test]
async fn slow_server_maps_to_timeout() {
    let server = MockServer::start().await;
    let (client, notifier) = client_for(&server).await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(prompt_body("RANDOM", "pg", "X"))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let err = client.get_random(Rating::Pg).await.unwrap_err();

    assert!(matches!(err, ApiError::Timeout { timeout_secs: 1 }));
    assert_eq!(notifier.seen(), vec![Notification::Timeout]);
}

#[tokio::test]
async fn unexpected_status_maps_to_unknown() {
    let server = MockServer::start().await;
    let (client, notifier) = client_for(&server).await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = client.get_truth(Rating::Pg).await.unwrap_err();

    assert!(matches!(err, ApiError::Unknown(_)));
    assert_eq!(notifier.seen(), vec![Notification::RequestFailed]);
}

#[tokio::test]
async fn malformed_body_maps_to_unknown() {
    let server = MockServer::start().await;
    let (client, notifier) = client_for(&server).await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = client.get_dare(Rating::Pg).await.unwrap_err();

    assert!(matches!(err, ApiError::Unknown(_)));
    assert_eq!(notifier.seen(), vec![Notification::RequestFailed]);
}
