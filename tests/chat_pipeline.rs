//! Integration tests for the chat pipeline
//!
//! These tests run the session orchestration against mock HTTP servers:
//! one standing in for the OpenRouter completions endpoint and one for the
//! MediTrack web backend. Backoff delays are captured through a recording
//! sleeper so the retry schedule can be asserted without real waits.

use meditrack::backend::BackendClient;
use meditrack::config::{BackendConfig, OpenRouterConfig};
use meditrack::error::MeditrackError;
use meditrack::providers::{Message, OpenRouterProvider, Provider, RetryPolicy, Sleeper};
use meditrack::session::{ChatSession, TurnOutcome, APOLOGY_MESSAGE};

use async_trait::async_trait;
use serde_json::json;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Sleeper that records requested delays and returns immediately
#[derive(Default)]
struct RecordingSleeper {
    delays: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    fn recorded(&self) -> Vec<Duration> {
        self.delays.lock().unwrap().clone()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.delays.lock().unwrap().push(duration);
    }
}

fn provider_config(server: &MockServer) -> OpenRouterConfig {
    OpenRouterConfig {
        api_base: server.uri(),
        ..Default::default()
    }
}

fn backend_config(server: &MockServer) -> BackendConfig {
    BackendConfig {
        api_base: server.uri(),
        session_cookie: Some("token=test-session".to_string()),
        ..Default::default()
    }
}

fn completion_body(content: &str) -> serde_json::Value {
    json!({
        "choices": [{"message": {"role": "assistant", "content": content}}]
    })
}

#[tokio::test]
async fn test_retry_budget_exhausts_after_five_attempts() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream down"))
        .expect(5)
        .mount(&server)
        .await;

    let sleeper = Arc::new(RecordingSleeper::default());
    let provider = OpenRouterProvider::with_retry(
        provider_config(&server),
        "test-key".to_string(),
        RetryPolicy::default(),
        sleeper.clone(),
    )
    .unwrap();

    let history = vec![Message::user("what diet helps with a fever?")];
    let err = provider
        .complete("You are a diet assistant", &history)
        .await
        .unwrap_err();

    match err.downcast_ref::<MeditrackError>() {
        Some(MeditrackError::RetriesExhausted { attempts, .. }) => assert_eq!(*attempts, 5),
        other => panic!("expected RetriesExhausted, got {:?}", other),
    }

    // Four delays between five attempts, each base*2^(n-1) plus jitter
    // below 500ms.
    let delays = sleeper.recorded();
    assert_eq!(delays.len(), 4);
    for (i, delay) in delays.iter().enumerate() {
        let floor = Duration::from_millis(1000 * 2u64.pow(i as u32));
        let ceiling = floor + Duration::from_millis(500);
        assert!(*delay >= floor, "delay {} was {:?}, below {:?}", i, delay, floor);
        assert!(*delay < ceiling, "delay {} was {:?}, not below {:?}", i, delay, ceiling);
    }
}

#[tokio::test]
async fn test_health_query_answered_and_meal_plan_saved() {
    let provider_server = MockServer::start().await;
    let backend_server = MockServer::start().await;

    let raw = "[USER_FRIENDLY]\nStay hydrated and keep meals light today. \u{1f4a7}\n[JSON_START]\n{\"meals\":[{\"meal\":\"Oatmeal with banana\",\"time\":\"08:00\",\"date\":\"2024-05-01\",\"timestamp\":\"2024-05-01T08:00:00Z\",\"notes\":\"light breakfast\"}]}\n[JSON_END]";

    // The system prompt is personalized from the identity endpoint, so the
    // completion request must carry the fetched name.
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_string_contains("alice"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(raw)))
        .expect(1)
        .mount(&provider_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"username": "alice"})))
        .expect(1)
        .mount(&backend_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/mealPlans/create"))
        .and(body_string_contains("Oatmeal with banana"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
        .expect(1)
        .mount(&backend_server)
        .await;

    let provider = OpenRouterProvider::with_retry(
        provider_config(&provider_server),
        "test-key".to_string(),
        RetryPolicy::default(),
        Arc::new(RecordingSleeper::default()),
    )
    .unwrap();
    let backend = BackendClient::new(backend_config(&backend_server)).unwrap();
    let mut session = ChatSession::new(Arc::new(provider), backend);

    let outcome = session
        .submit("I have a headache, what diet helps?")
        .await
        .unwrap();

    match outcome {
        TurnOutcome::Answered {
            display,
            plan_outcome,
        } => {
            assert_eq!(display, "Stay hydrated and keep meals light today. \u{1f4a7}");
            assert!(matches!(
                plan_outcome,
                Some(meditrack::backend::PersistOutcome::Saved)
            ));
        }
        other => panic!("expected Answered, got {:?}", other),
    }

    // History: the user query plus the unsplit raw completion.
    assert_eq!(session.history().len(), 2);
    assert_eq!(session.history().messages()[1].content, raw);
}

#[tokio::test]
async fn test_off_topic_query_rejected_without_network() {
    let provider_server = MockServer::start().await;
    let backend_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("unused")))
        .expect(0)
        .mount(&provider_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"username": "alice"})))
        .expect(0)
        .mount(&backend_server)
        .await;

    let provider = OpenRouterProvider::with_retry(
        provider_config(&provider_server),
        "test-key".to_string(),
        RetryPolicy::default(),
        Arc::new(RecordingSleeper::default()),
    )
    .unwrap();
    let backend = BackendClient::new(backend_config(&backend_server)).unwrap();
    let mut session = ChatSession::new(Arc::new(provider), backend);

    let outcome = session.submit("tell me a joke").await.unwrap();
    assert!(matches!(outcome, TurnOutcome::Rejected { .. }));

    // User query and refusal are recorded so later turns have the context.
    assert_eq!(session.history().len(), 2);
}

#[tokio::test]
async fn test_exhausted_retries_end_turn_with_apology() {
    let provider_server = MockServer::start().await;
    let backend_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .expect(5)
        .mount(&provider_server)
        .await;

    // Identity is fetched before the completion is attempted.
    Mock::given(method("GET"))
        .and(path("/api/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"username": "alice"})))
        .expect(1)
        .mount(&backend_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/mealPlans/create"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&backend_server)
        .await;

    let provider = OpenRouterProvider::with_retry(
        provider_config(&provider_server),
        "test-key".to_string(),
        RetryPolicy::default(),
        Arc::new(RecordingSleeper::default()),
    )
    .unwrap();
    let backend = BackendClient::new(backend_config(&backend_server)).unwrap();
    let mut session = ChatSession::new(Arc::new(provider), backend);

    let outcome = session
        .submit("my blood pressure medicine ran out")
        .await
        .unwrap();

    match outcome {
        TurnOutcome::Failed { apology } => assert_eq!(apology, APOLOGY_MESSAGE),
        other => panic!("expected Failed, got {:?}", other),
    }

    // Only the user message survives a failed turn.
    assert_eq!(session.history().len(), 1);
    assert_eq!(session.history().messages()[0].role, "user");
}

#[tokio::test]
async fn test_persistence_failure_is_soft() {
    let provider_server = MockServer::start().await;
    let backend_server = MockServer::start().await;

    let raw = "[USER_FRIENDLY]\nHere is a plan.\n[JSON_START]\n{\"meals\":[{\"meal\":\"Grilled fish\",\"time\":\"19:00\",\"date\":\"2024-05-01\",\"timestamp\":\"2024-05-01T19:00:00Z\"}]}\n[JSON_END]";

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(raw)))
        .expect(1)
        .mount(&provider_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": "Bob"})))
        .expect(1)
        .mount(&backend_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/mealPlans/create"))
        .respond_with(ResponseTemplate::new(500).set_body_string("db down"))
        .expect(1)
        .mount(&backend_server)
        .await;

    let provider = OpenRouterProvider::with_retry(
        provider_config(&provider_server),
        "test-key".to_string(),
        RetryPolicy::default(),
        Arc::new(RecordingSleeper::default()),
    )
    .unwrap();
    let backend = BackendClient::new(backend_config(&backend_server)).unwrap();
    let mut session = ChatSession::new(Arc::new(provider), backend);

    let outcome = session.submit("plan my diet for recovery").await.unwrap();

    match outcome {
        TurnOutcome::Answered {
            display,
            plan_outcome,
        } => {
            assert_eq!(display, "Here is a plan.");
            // The answer stands even though the save failed.
            assert!(matches!(
                plan_outcome,
                Some(meditrack::backend::PersistOutcome::Failed)
            ));
        }
        other => panic!("expected Answered, got {:?}", other),
    }
}
