//! A throwaway chat-completion server for adapter and route tests.

#![allow(dead_code)]

use api_lib::{
    adapters::{FileCredentialSlot, OpenAiChatAdapter},
    config::Config,
    web::{self, AppState},
};
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::post,
    Router,
};
use lesson_assistant_core::SessionContext;
use serde_json::Value;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;

/// One request as the fake service saw it.
#[derive(Debug, Clone)]
pub struct Captured {
    pub authorization: Option<String>,
    pub body: Value,
}

#[derive(Clone)]
struct Script {
    status: StatusCode,
    body: String,
    delay: Duration,
    seen: Arc<Mutex<Vec<Captured>>>,
}

pub struct MockChatService {
    pub addr: SocketAddr,
    seen: Arc<Mutex<Vec<Captured>>>,
}

impl MockChatService {
    /// Answers every POST to `/v1/chat/completions` with `status` and `body`.
    pub async fn spawn(status: StatusCode, body: &str) -> Self {
        Self::spawn_delayed(status, body, Duration::ZERO).await
    }

    /// Like [`spawn`](Self::spawn), but holds every reply back for `delay`.
    pub async fn spawn_delayed(status: StatusCode, body: &str, delay: Duration) -> Self {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let script = Script {
            status,
            body: body.to_string(),
            delay,
            seen: seen.clone(),
        };

        let router = Router::new()
            .route("/v1/chat/completions", post(reply))
            .with_state(script);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind");
        let addr = listener.local_addr().expect("Failed to get local addr");
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server failed");
        });

        Self { addr, seen }
    }

    /// Replies with a single choice whose content is `content`.
    pub async fn answering(content: &str) -> Self {
        Self::answering_after(content, Duration::ZERO).await
    }

    pub async fn answering_after(content: &str, delay: Duration) -> Self {
        let body = serde_json::json!({
            "id": "chatcmpl-test",
            "choices": [{ "index": 0, "message": { "role": "assistant", "content": content } }]
        });
        Self::spawn_delayed(StatusCode::OK, &body.to_string(), delay).await
    }

    pub fn api_base(&self) -> String {
        format!("http://{}/v1", self.addr)
    }

    pub fn adapter(&self) -> OpenAiChatAdapter {
        OpenAiChatAdapter::new(reqwest::Client::new(), &self.api_base())
    }

    pub fn requests(&self) -> Vec<Captured> {
        self.seen.lock().unwrap().clone()
    }
}

async fn reply(State(script): State<Script>, headers: HeaderMap, body: String) -> (StatusCode, String) {
    let authorization = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let body = serde_json::from_str(&body).unwrap_or(Value::Null);
    script.seen.lock().unwrap().push(Captured { authorization, body });
    tokio::time::sleep(script.delay).await;
    (script.status, script.body.clone())
}

/// Full application state wired to `chat`, with the credential slot in a temp dir.
pub fn app_state(chat: &MockChatService) -> (Arc<AppState>, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let credential_path = dir.path().join("credential.json");
    let config = Config::from_lookup(|key| match key {
        "CHAT_API_BASE" => Some(chat.api_base()),
        "CREDENTIAL_PATH" => Some(credential_path.display().to_string()),
        _ => None,
    })
    .unwrap();

    let slot = Arc::new(FileCredentialSlot::new(config.credential_path.clone()));
    let session = Arc::new(SessionContext::restore(slot).unwrap());
    let state = AppState::new(Arc::new(config), session, Arc::new(chat.adapter()));
    (Arc::new(state), dir)
}

pub fn router(state: Arc<AppState>) -> Router {
    web::router(state)
}

/// Serves the full router over real TCP, for tests that need a client to hang up.
pub async fn serve(state: Arc<AppState>) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().expect("Failed to get local addr");
    let app = router(state);
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server failed");
    });
    addr
}
