//! End-to-end behavior of the structured generation client over a scripted
//! transport: attempt bounds, backoff timing, fallbacks and cancellation.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use proptest::prelude::*;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use venue_assist::ai::{
    GenerateContentRequest, GenerationOutcome, GenerationRequest, GenerationTransport,
    ResponseContract, RetryPolicy, StructuredClient,
};
use venue_assist::constants::messages;
use venue_assist::types::{ErrorClassifier, Result};

const FALLBACK: &str = "Sorry, the assistant is unavailable right now.";

/// One scripted endpoint reaction
#[derive(Debug, Clone)]
enum Step {
    Status(u16),
    Body(String),
}

fn ok(body: &str) -> Step {
    Step::Body(body.to_string())
}

/// Plays back a script; once it runs out, every call fails with HTTP 500
struct ScriptedTransport {
    script: Mutex<VecDeque<Step>>,
    calls: Mutex<Vec<Instant>>,
}

impl ScriptedTransport {
    fn new(script: Vec<Step>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            calls: Mutex::new(Vec::new()),
        })
    }

    fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn call_times(&self) -> Vec<Instant> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl GenerationTransport for ScriptedTransport {
    async fn send(&self, _payload: &GenerateContentRequest) -> Result<String> {
        self.calls.lock().unwrap().push(Instant::now());
        let step = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Step::Status(500));
        match step {
            Step::Body(body) => Ok(body),
            Step::Status(status) => {
                Err(ErrorClassifier::classify_http_status(status, "scripted failure", "scripted").into())
            }
        }
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

fn client(transport: &Arc<ScriptedTransport>) -> StructuredClient {
    StructuredClient::new(transport.clone()).with_fallback_message(FALLBACK)
}

fn ids_contract() -> ResponseContract {
    ResponseContract::with_text_field("text").list_field("mentionedIds")
}

fn coffee_request(contract: Option<ResponseContract>) -> GenerationRequest {
    let builder = GenerationRequest::builder("You recommend venues from a fixed list.")
        .user_text("Recommend a quiet coffee shop");
    match contract {
        Some(contract) => builder.contract(contract).build().unwrap(),
        None => builder.build().unwrap(),
    }
}

// =============================================================================
// Attempt bounds
// =============================================================================

#[tokio::test(start_paused = true)]
async fn first_success_uses_one_attempt() {
    for body in ["plain words", "{}", "", "{\"text\": 3}"] {
        let transport = ScriptedTransport::new(vec![ok(body)]);
        let result = client(&transport)
            .generate(&coffee_request(Some(ids_contract())), &RetryPolicy::default())
            .await;

        assert_eq!(result.attempts_used(), 1, "body: {:?}", body);
        assert_eq!(transport.call_count(), 1);
        assert!(result.succeeded());
    }
}

#[tokio::test(start_paused = true)]
async fn fail_fail_succeed_waits_with_exponential_backoff() {
    let transport = ScriptedTransport::new(vec![Step::Status(500), Step::Status(503), ok("fine")]);
    let result = client(&transport)
        .generate(&coffee_request(None), &RetryPolicy::default())
        .await;

    assert_eq!(result.attempts_used(), 3);
    assert_eq!(result.text, "fine");

    let first = result.attempts[0].backoff.unwrap();
    let second = result.attempts[1].backoff.unwrap();
    assert!(first >= Duration::from_millis(1000) && first <= Duration::from_millis(2000));
    assert!(second >= Duration::from_millis(2000) && second <= Duration::from_millis(3000));
    assert!(result.attempts[2].backoff.is_none());

    let calls = transport.call_times();
    assert!(calls[1] - calls[0] >= Duration::from_millis(1000));
    assert!(calls[2] - calls[1] >= Duration::from_millis(2000));
}

#[tokio::test(start_paused = true)]
async fn always_failing_endpoint_yields_fallback_text() {
    let transport = ScriptedTransport::new(vec![]);
    let started = Instant::now();
    let result = client(&transport)
        .generate(&coffee_request(Some(ids_contract())), &RetryPolicy::default())
        .await;

    assert_eq!(result.attempts_used(), 3);
    assert_eq!(transport.call_count(), 3);
    assert_eq!(result.text, FALLBACK);
    assert!(result.structured_fields().is_empty());
    assert!(matches!(result.outcome, GenerationOutcome::Exhausted { .. }));
    // No sleep after the final attempt: 1000 + 2000 plus at most 2 x 1000 jitter
    assert!(started.elapsed() <= Duration::from_millis(5000));
}

#[tokio::test]
async fn zero_attempt_budget_still_tries_once() {
    let transport = ScriptedTransport::new(vec![]);
    let result = client(&transport)
        .generate(&coffee_request(None), &RetryPolicy::immediate(0))
        .await;

    assert_eq!(result.attempts_used(), 1);
    assert_eq!(result.text, FALLBACK);
}

#[tokio::test]
async fn client_errors_are_retried_like_server_errors() {
    let transport = ScriptedTransport::new(vec![Step::Status(429), Step::Status(401), ok("late")]);
    let result = client(&transport)
        .generate(&coffee_request(None), &RetryPolicy::immediate(3))
        .await;

    assert_eq!(result.attempts_used(), 3);
    assert_eq!(result.text, "late");
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn never_more_than_three_attempts(script in prop::collection::vec(any::<bool>(), 0..8)) {
        let steps: Vec<Step> = script
            .iter()
            .map(|&succeeds| if succeeds { ok("answer") } else { Step::Status(500) })
            .collect();
        let expected = script
            .iter()
            .take(3)
            .position(|&succeeds| succeeds)
            .map(|i| i as u32 + 1)
            .unwrap_or(3);

        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .start_paused(true)
            .build()
            .unwrap();
        let transport = ScriptedTransport::new(steps);
        let result = rt.block_on(
            client(&transport).generate(&coffee_request(Some(ids_contract())), &RetryPolicy::default()),
        );

        prop_assert!(result.attempts_used() <= 3);
        prop_assert_eq!(result.attempts_used(), expected);
        prop_assert_eq!(transport.call_count() as u32, expected);
        prop_assert!(!result.text.is_empty());
    }
}

// =============================================================================
// Contract handling
// =============================================================================

#[tokio::test]
async fn valid_contract_json_populates_fields() {
    let body = r#"{"text":"Try Bean & Co, it's quiet.","mentionedIds":["3"]}"#;
    let transport = ScriptedTransport::new(vec![ok(body)]);
    let result = client(&transport)
        .generate(&coffee_request(Some(ids_contract())), &RetryPolicy::default())
        .await;

    assert_eq!(result.attempts_used(), 1);
    assert_eq!(result.text, "Try Bean & Co, it's quiet.");
    let fields = result.structured_fields();
    assert_eq!(fields.text("text"), Some("Try Bean & Co, it's quiet."));
    assert_eq!(fields.list("mentionedIds"), Some(&["3".to_string()][..]));
}

#[tokio::test]
async fn non_json_answer_is_used_verbatim_without_retry() {
    let transport = ScriptedTransport::new(vec![ok("Bean & Co is lovely.")]);
    let result = client(&transport)
        .generate(&coffee_request(Some(ids_contract())), &RetryPolicy::default())
        .await;

    assert_eq!(result.attempts_used(), 1);
    assert_eq!(transport.call_count(), 1);
    assert_eq!(result.text, "Bean & Co is lovely.");
    assert!(result.structured_fields().is_empty());
    assert!(result.is_parse_fallback());
}

#[tokio::test]
async fn envelope_wrapped_answer_is_unwrapped_before_validation() {
    let body = r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"```json\n{\"text\":\"Nook\",\"mentionedIds\":[]}\n```"}]}}],
                  "usageMetadata":{"promptTokenCount":12,"candidatesTokenCount":7}}"#;
    let transport = ScriptedTransport::new(vec![ok(body)]);
    let result = client(&transport)
        .generate(&coffee_request(Some(ids_contract())), &RetryPolicy::default())
        .await;

    assert_eq!(result.text, "Nook");
    assert_eq!(result.structured_fields().list("mentionedIds"), Some(&[][..]));
}

#[tokio::test(start_paused = true)]
async fn recovers_after_two_server_errors_with_plain_answer() {
    let transport = ScriptedTransport::new(vec![
        Step::Status(500),
        Step::Status(500),
        ok("Sorry, no data."),
    ]);
    let result = client(&transport)
        .generate(&coffee_request(Some(ids_contract())), &RetryPolicy::default())
        .await;

    assert_eq!(result.attempts_used(), 3);
    assert_eq!(result.text, "Sorry, no data.");
    assert!(result.structured_fields().is_empty());
}

// =============================================================================
// Concurrency and cancellation
// =============================================================================

#[tokio::test]
async fn concurrent_calls_share_nothing() {
    let good = ScriptedTransport::new(vec![ok("first")]);
    let bad = ScriptedTransport::new(vec![]);
    let good_client = client(&good);
    let bad_client = StructuredClient::new(bad.clone());
    let request = coffee_request(None);
    let policy = RetryPolicy::immediate(3);

    let (a, b) = tokio::join!(
        good_client.generate(&request, &policy),
        bad_client.generate(&request, &policy),
    );

    assert_eq!(a.text, "first");
    assert_eq!(a.attempts_used(), 1);
    assert_eq!(b.text, messages::CHAT_FALLBACK);
    assert_eq!(b.attempts_used(), 3);
}

#[tokio::test(start_paused = true)]
async fn cancellation_stops_further_attempts() {
    let transport = ScriptedTransport::new(vec![]);
    let client = client(&transport);
    let request = coffee_request(None);
    let policy = RetryPolicy::default();
    let token = CancellationToken::new();

    let canceller = {
        let token = token.clone();
        tokio::spawn(async move {
            // Inside the first backoff window (at least 1000 ms)
            tokio::time::sleep(Duration::from_millis(500)).await;
            token.cancel();
        })
    };

    let result = client.generate_cancellable(&request, &policy, &token).await;
    canceller.await.unwrap();

    assert!(result.is_none());
    assert_eq!(transport.call_count(), 1);

    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(transport.call_count(), 1);
}

#[tokio::test]
async fn uncancelled_call_completes_normally() {
    let transport = ScriptedTransport::new(vec![ok("done")]);
    let token = CancellationToken::new();
    let result = client(&transport)
        .generate_cancellable(&coffee_request(None), &RetryPolicy::default(), &token)
        .await
        .unwrap();

    assert_eq!(result.text, "done");
    assert_eq!(result.outcome, GenerationOutcome::PlainText);
}
