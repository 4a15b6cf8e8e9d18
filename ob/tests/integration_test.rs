//! End-to-end tests: the real OpenAI client against a local stub endpoint,
//! and the HTTP API driven through the router.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderMap, Request, StatusCode};
use axum::routing::post;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use okrboard::config::ResolvedLlmConfig;
use okrboard::llm::{LlmClient, create_client};
use okrboard::planner::{ErrorKind, PlanGenerator};
use okrboard::service::PlanService;
use okrboard::state::StateManager;
use okrboard::web;
use planstore::Store;

const PLAN_JSON: &str = r#"{"objectives":[{"id":"","title":"Ship v1","tasks":[{"id":"","content":"Draft changelog","status":"todo","obj_id":"wrong"},{"id":"task_keep","content":"Cut release","status":"in_progress","obj_id":""}]}]}"#;

// ── Stub chat-completions endpoint ─────────────────────────────

#[derive(Debug, Clone)]
struct Seen {
    authorization: Option<String>,
    body: Value,
}

#[derive(Clone)]
struct Stub {
    status: StatusCode,
    body: String,
    delay: Duration,
    seen: Arc<Mutex<Vec<Seen>>>,
}

async fn chat_completions(State(stub): State<Stub>, headers: HeaderMap, body: String) -> (StatusCode, String) {
    let authorization = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(String::from);
    let body = serde_json::from_str(&body).unwrap_or(Value::Null);
    stub.seen.lock().unwrap().push(Seen { authorization, body });

    if !stub.delay.is_zero() {
        tokio::time::sleep(stub.delay).await;
    }
    (stub.status, stub.body.clone())
}

/// Start a stub that answers every request with `status` and `body`
async fn start_stub(status: StatusCode, body: String, delay: Duration) -> (SocketAddr, Arc<Mutex<Vec<Seen>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let stub = Stub {
        status,
        body,
        delay,
        seen: seen.clone(),
    };
    let app = Router::new()
        .route("/v1/chat/completions", post(chat_completions))
        .with_state(stub);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, seen)
}

fn completion_body(content: &str) -> String {
    json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "choices": [{"index": 0, "message": {"role": "assistant", "content": content}, "finish_reason": "stop"}],
        "usage": {"prompt_tokens": 100, "completion_tokens": 50, "total_tokens": 150}
    })
    .to_string()
}

fn llm_config(addr: SocketAddr, api_key: Option<&str>) -> ResolvedLlmConfig {
    ResolvedLlmConfig {
        model: "gpt-3.5-turbo".to_string(),
        api_key: api_key.map(String::from),
        api_key_env: "OPENAI_API_KEY".to_string(),
        base_url: format!("http://{}/v1", addr),
        timeout_ms: 5_000,
    }
}

fn generator_for(config: &ResolvedLlmConfig) -> PlanGenerator {
    let llm: Arc<dyn LlmClient> = create_client(config).unwrap();
    PlanGenerator::new(llm)
}

// ── Client and generator against the stub ──────────────────────

#[tokio::test]
async fn test_generate_with_fenced_reply() {
    let reply = format!("```json\n{}\n```", PLAN_JSON);
    let (addr, seen) = start_stub(StatusCode::OK, completion_body(&reply), Duration::ZERO).await;
    let generator = generator_for(&llm_config(addr, Some("sk-test-key")));

    let plan = generator.generate("ship v1", "grow users").await.unwrap();

    let objective = &plan.objectives[0];
    assert!(objective.id.starts_with("obj_"));
    assert_eq!(objective.tasks.len(), 2);
    assert!(objective.tasks[0].id.starts_with("task_"));
    assert_eq!(objective.tasks[1].id, "task_keep");
    assert!(objective.tasks.iter().all(|t| t.obj_id == objective.id));

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].authorization.as_deref(), Some("Bearer sk-test-key"));
    let body = &seen[0].body;
    assert_eq!(body["model"], "gpt-3.5-turbo");
    assert_eq!(body["max_tokens"], 2000);
    assert!((body["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-6);
    assert_eq!(body["messages"][0]["role"], "user");
    let prompt = body["messages"][0]["content"].as_str().unwrap();
    assert!(prompt.contains("ship v1"));
    assert!(prompt.contains("grow users"));
}

#[tokio::test]
async fn test_provider_error_payload() {
    let body = json!({"error": {"message": "rate limited", "type": "rate_limit"}}).to_string();
    let (addr, _seen) = start_stub(StatusCode::TOO_MANY_REQUESTS, body, Duration::ZERO).await;
    let generator = generator_for(&llm_config(addr, Some("sk-test-key")));

    let err = generator.generate("a", "b").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RemoteApi);
    assert!(err.to_string().contains("rate limited"));
}

#[tokio::test]
async fn test_provider_error_payload_with_ok_status() {
    let body = json!({"error": {"message": "model overloaded", "type": "server_error"}}).to_string();
    let (addr, _seen) = start_stub(StatusCode::OK, body, Duration::ZERO).await;
    let generator = generator_for(&llm_config(addr, Some("sk-test-key")));

    let err = generator.generate("a", "b").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RemoteApi);
    assert!(err.to_string().contains("model overloaded"));
}

#[tokio::test]
async fn test_empty_choices() {
    let body = json!({"choices": []}).to_string();
    let (addr, _seen) = start_stub(StatusCode::OK, body, Duration::ZERO).await;
    let generator = generator_for(&llm_config(addr, Some("sk-test-key")));

    let err = generator.generate("a", "b").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RemoteApi);
}

#[tokio::test]
async fn test_reply_that_is_not_json() {
    let body = completion_body("Here are some objectives you could try...");
    let (addr, _seen) = start_stub(StatusCode::OK, body, Duration::ZERO).await;
    let generator = generator_for(&llm_config(addr, Some("sk-test-key")));

    let err = generator.generate("a", "b").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Decode);
}

#[tokio::test]
async fn test_missing_key_sends_nothing() {
    let (addr, seen) = start_stub(StatusCode::OK, completion_body(PLAN_JSON), Duration::ZERO).await;
    let generator = generator_for(&llm_config(addr, None));

    let err = generator.generate("a", "b").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);
    assert!(err.to_string().contains("OPENAI_API_KEY"));
    assert!(seen.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_timeout_is_transport_error() {
    let (addr, _seen) = start_stub(StatusCode::OK, completion_body(PLAN_JSON), Duration::from_secs(3)).await;
    let mut config = llm_config(addr, Some("sk-test-key"));
    config.timeout_ms = 200;
    let generator = generator_for(&config);

    let err = generator.generate("a", "b").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let generator = generator_for(&llm_config(addr, Some("sk-test-key")));
    let err = generator.generate("a", "b").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);
}

// ── HTTP API ───────────────────────────────────────────────────

async fn app_with_stub(status: StatusCode, body: String) -> (Router, StateManager) {
    let (addr, _seen) = start_stub(status, body, Duration::ZERO).await;
    let state = StateManager::spawn_with_store(Store::open_in_memory().unwrap());
    let service = PlanService::new(generator_for(&llm_config(addr, Some("sk-test-key"))), state.clone());
    (web::router(service), state)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<&str>) -> (StatusCode, String) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

#[tokio::test]
async fn test_api_health() {
    let (app, _state) = app_with_stub(StatusCode::OK, completion_body(PLAN_JSON)).await;
    let (status, body) = send(&app, "GET", "/api/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ok");
}

#[tokio::test]
async fn test_api_empty_state() {
    let (app, _state) = app_with_stub(StatusCode::OK, completion_body(PLAN_JSON)).await;

    let (status, body) = send(&app, "GET", "/api/initial-plan", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(serde_json::from_str::<Value>(&body).unwrap(), json!({"objectives": []}));

    let (status, body) = send(&app, "GET", "/api/user-input", None).await;
    assert_eq!(status, StatusCode::OK);
    let input: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(input["weekly_goals"], "");
    assert_eq!(input["overall_goals"], "");
}

#[tokio::test]
async fn test_api_process_okr_flow() {
    let (app, _state) = app_with_stub(StatusCode::OK, completion_body(PLAN_JSON)).await;

    let request = json!({"weeklyGoals": "ship v1", "overallGoals": "grow users"}).to_string();
    let (status, body) = send(&app, "POST", "/api/process-okr", Some(&request)).await;
    assert_eq!(status, StatusCode::OK);
    let plan: Value = serde_json::from_str(&body).unwrap();
    let obj_id = plan["objectives"][0]["id"].as_str().unwrap().to_string();
    assert_eq!(plan["objectives"][0]["title"], "Ship v1");
    assert_eq!(plan["objectives"][0]["tasks"][0]["obj_id"], obj_id.as_str());
    assert_eq!(plan["objectives"][0]["tasks"][1]["status"], "in_progress");

    let (_, stored) = send(&app, "GET", "/api/initial-plan", None).await;
    assert_eq!(serde_json::from_str::<Value>(&stored).unwrap(), plan);

    let (_, input) = send(&app, "GET", "/api/user-input", None).await;
    let input: Value = serde_json::from_str(&input).unwrap();
    assert_eq!(input["weekly_goals"], "ship v1");
    assert_eq!(input["overall_goals"], "grow users");

    // Tick a task off
    let update = json!({"id": "task_keep", "content": "Cut release 1.0", "status": "done", "obj_id": obj_id}).to_string();
    let (status, body) = send(&app, "POST", "/api/update-task", Some(&update)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(serde_json::from_str::<Value>(&body).unwrap(), json!({"success": true}));

    let (_, stored) = send(&app, "GET", "/api/initial-plan", None).await;
    let stored: Value = serde_json::from_str(&stored).unwrap();
    assert_eq!(stored["objectives"][0]["tasks"][1]["status"], "done");
    assert_eq!(stored["objectives"][0]["tasks"][1]["content"], "Cut release 1.0");
}

#[tokio::test]
async fn test_api_process_okr_missing_fields_are_empty() {
    let (app, _state) = app_with_stub(StatusCode::OK, completion_body(PLAN_JSON)).await;
    let (status, _) = send(&app, "POST", "/api/process-okr", Some("{}")).await;
    assert_eq!(status, StatusCode::OK);

    let (_, input) = send(&app, "GET", "/api/user-input", None).await;
    let input: Value = serde_json::from_str(&input).unwrap();
    assert_eq!(input["weekly_goals"], "");
    assert!(!input["created_at"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_api_invalid_json() {
    let (app, _state) = app_with_stub(StatusCode::OK, completion_body(PLAN_JSON)).await;

    let (status, body) = send(&app, "POST", "/api/process-okr", Some("{not json")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "Invalid JSON");

    let (status, body) = send(&app, "POST", "/api/update-task", Some(r#"{"id": "t", "status": "blocked"}"#)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, "Invalid JSON");
}

#[tokio::test]
async fn test_api_provider_failure_is_500_and_persists_nothing() {
    let body = json!({"error": {"message": "rate limited", "type": "rate_limit"}}).to_string();
    let (app, _state) = app_with_stub(StatusCode::TOO_MANY_REQUESTS, body).await;

    let request = json!({"weeklyGoals": "ship v1", "overallGoals": "grow users"}).to_string();
    let (status, body) = send(&app, "POST", "/api/process-okr", Some(&request)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.contains("rate limited"));

    let (_, plan) = send(&app, "GET", "/api/initial-plan", None).await;
    assert_eq!(serde_json::from_str::<Value>(&plan).unwrap(), json!({"objectives": []}));
}

#[tokio::test]
async fn test_api_update_unknown_task_succeeds() {
    let (app, _state) = app_with_stub(StatusCode::OK, completion_body(PLAN_JSON)).await;
    let update = json!({"id": "task_nope", "content": "x", "status": "done", "obj_id": "obj_nope"}).to_string();

    let (status, body) = send(&app, "POST", "/api/update-task", Some(&update)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(serde_json::from_str::<Value>(&body).unwrap(), json!({"success": true}));
}

#[tokio::test]
async fn test_api_reads_degrade_when_store_is_gone() {
    let (app, state) = app_with_stub(StatusCode::OK, completion_body(PLAN_JSON)).await;
    state.shutdown().await.unwrap();
    tokio::time::sleep(Duration::from_millis(20)).await;

    let (status, body) = send(&app, "GET", "/api/initial-plan", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(serde_json::from_str::<Value>(&body).unwrap(), json!({"objectives": []}));

    let (status, _) = send(&app, "GET", "/api/user-input", None).await;
    assert_eq!(status, StatusCode::OK);

    let update = json!({"id": "t", "content": "x", "status": "todo", "obj_id": "o"}).to_string();
    let (status, _) = send(&app, "POST", "/api/update-task", Some(&update)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_api_wrong_method() {
    let (app, _state) = app_with_stub(StatusCode::OK, completion_body(PLAN_JSON)).await;
    let (status, _) = send(&app, "GET", "/api/process-okr", None).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}
