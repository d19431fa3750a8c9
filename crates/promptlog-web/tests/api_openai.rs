//! End-to-end requests against `/api/openai` with a mock provider.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::connect_info::MockConnectInfo,
    http::{header::CONTENT_TYPE, Request, StatusCode},
    Router,
};
use pretty_assertions::assert_eq;
use promptlog_common::AuditStore;
use promptlog_llm::{CompletionService, OpenAiChatClient};
use promptlog_test_utils::{
    chat_completion_json, provider_config, FailingAuditStore, MemoryAuditStore,
    COMPLETIONS_PATH,
};
use promptlog_web::{build_router, AppState};
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PEER: &str = "192.0.2.10:51234";

fn app(provider_uri: &str, store: Arc<dyn AuditStore>) -> Router {
    let client = OpenAiChatClient::new(provider_config(provider_uri)).unwrap();
    let state = AppState::new(CompletionService::new(client, store));
    let peer: SocketAddr = PEER.parse().unwrap();
    build_router(state).layer(MockConnectInfo(peer))
}

async fn provider(body: serde_json::Value) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(COMPLETIONS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;
    server
}

async fn body_bytes(resp: axum::response::Response) -> Vec<u8> {
    axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_success_returns_provider_json_and_logs_once() {
    let server = provider(chat_completion_json("Ferris")).await;
    let store = Arc::new(MemoryAuditStore::new());

    let resp = app(&server.uri(), store.clone())
        .oneshot(get("/api/openai?keyword=crab"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()[CONTENT_TYPE], "application/json");
    let body: serde_json::Value = serde_json::from_slice(&body_bytes(resp).await).unwrap();
    assert_eq!(body, chat_completion_json("Ferris"));

    let records = store.records();
    assert_eq!(records.len(), 1);
    let sent: serde_json::Value = serde_json::from_str(&records[0].request_body).unwrap();
    assert_eq!(sent["messages"][1]["content"], "crab");
    assert_eq!(records[0].ip_address, PEER);
}

#[tokio::test]
async fn test_forwarded_for_is_logged_instead_of_peer() {
    let server = provider(chat_completion_json("ok")).await;
    let store = Arc::new(MemoryAuditStore::new());

    let req = Request::builder()
        .uri("/api/openai?keyword=k")
        .header("x-forwarded-for", "203.0.113.7")
        .header("user-agent", "curl/8.5.0")
        .body(Body::empty())
        .unwrap();
    let resp = app(&server.uri(), store.clone()).oneshot(req).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let record = &store.records()[0];
    assert_eq!(record.ip_address, "203.0.113.7");
    assert_eq!(record.user_agent, "curl/8.5.0");
}

#[tokio::test]
async fn test_real_ip_wins_over_forwarded_for() {
    let server = provider(chat_completion_json("ok")).await;
    let store = Arc::new(MemoryAuditStore::new());

    let req = Request::builder()
        .uri("/api/openai?keyword=k")
        .header("x-real-ip", "198.51.100.1")
        .header("x-forwarded-for", "203.0.113.7")
        .body(Body::empty())
        .unwrap();
    app(&server.uri(), store.clone()).oneshot(req).await.unwrap();

    assert_eq!(store.records()[0].ip_address, "198.51.100.1");
}

#[tokio::test]
async fn test_storage_failure_returns_500_without_provider_body() {
    let server = provider(chat_completion_json("secret completion")).await;

    let resp = app(&server.uri(), Arc::new(FailingAuditStore::default()))
        .oneshot(get("/api/openai?keyword=k"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = String::from_utf8(body_bytes(resp).await).unwrap();
    assert!(body.contains("does not exist"));
    assert!(!body.contains("secret completion"));
}

#[tokio::test]
async fn test_missing_keyword_sends_empty_user_content() {
    let server = provider(chat_completion_json("ok")).await;
    let store = Arc::new(MemoryAuditStore::new());

    let resp = app(&server.uri(), store.clone())
        .oneshot(get("/api/openai"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(store.len(), 1);
    let sent: serde_json::Value =
        serde_json::from_str(&store.records()[0].request_body).unwrap();
    assert_eq!(sent["messages"][1]["content"], "");
}

#[tokio::test]
async fn test_request_id_query_is_persisted() {
    let server = provider(chat_completion_json("ok")).await;
    let store = Arc::new(MemoryAuditStore::new());

    app(&server.uri(), store.clone())
        .oneshot(get("/api/openai?keyword=k&requestId=trace-77"))
        .await
        .unwrap();

    assert_eq!(store.records()[0].request_id, "trace-77");
}

#[tokio::test]
async fn test_repeated_parameters_use_first_value() {
    let server = provider(chat_completion_json("ok")).await;
    let store = Arc::new(MemoryAuditStore::new());

    let resp = app(&server.uri(), store.clone())
        .oneshot(get("/api/openai?keyword=a&keyword=b&requestId=r1&requestId=r2"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let records = store.records();
    assert_eq!(records.len(), 1);
    let sent: serde_json::Value = serde_json::from_str(&records[0].request_body).unwrap();
    assert_eq!(sent["messages"][1]["content"], "a");
    assert_eq!(records[0].request_id, "r1");
}

#[tokio::test]
async fn test_malformed_percent_encoding_is_not_rejected() {
    let server = provider(chat_completion_json("ok")).await;
    let store = Arc::new(MemoryAuditStore::new());

    let resp = app(&server.uri(), store.clone())
        .oneshot(get("/api/openai?keyword=100%zz"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn test_route_accepts_other_methods() {
    let server = provider(chat_completion_json("ok")).await;
    let store = Arc::new(MemoryAuditStore::new());

    let req = Request::builder()
        .method("POST")
        .uri("/api/openai?keyword=k")
        .body(Body::empty())
        .unwrap();
    let resp = app(&server.uri(), store.clone()).oneshot(req).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn test_unreachable_provider_returns_500_and_logs_nothing() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let uri = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);
    let store = Arc::new(MemoryAuditStore::new());

    let resp = app(&uri, store.clone())
        .oneshot(get("/api/openai?keyword=k"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = String::from_utf8(body_bytes(resp).await).unwrap();
    assert!(body.starts_with("transport error"));
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let store = Arc::new(MemoryAuditStore::new());
    let resp = app("http://127.0.0.1:9", store.clone())
        .oneshot(get("/api/other"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert!(store.is_empty());
}
