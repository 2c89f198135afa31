mod common;

use axum::http::StatusCode;
use common::MockChatService;
use lesson_assistant_core::{
    ChatCompletionService, ContentBlock, Credential, CredentialStore, ImageSource, LessonDraft,
    LessonStore, PortError, QuestionAnswerEngine, RequestPolicy, ViewingSession,
};
use lesson_assistant_core::ports::CredentialSlot;
use std::sync::Arc;

fn credential() -> Credential {
    Credential::new("sk-test").unwrap()
}

fn text_request() -> lesson_assistant_core::ChatRequest {
    RequestPolicy::default().build_request("", &ContentBlock::Text("Mitochondria.".into()), "Why?")
}

#[tokio::test]
async fn success_returns_first_choice_verbatim() {
    let mock = MockChatService::answering("42").await;

    let answer = mock.adapter().complete(&credential(), &text_request()).await.unwrap();
    assert_eq!(answer, "42");

    let requests = mock.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].authorization.as_deref(), Some("Bearer sk-test"));

    let body = &requests[0].body;
    assert_eq!(body["model"], "gpt-4o");
    assert_eq!(body["max_tokens"], 300);
    assert_eq!(body["messages"][0]["role"], "system");
    assert_eq!(body["messages"][0]["content"], "You are a helpful assistant.");
    assert_eq!(body["messages"][1]["role"], "user");
    assert_eq!(
        body["messages"][1]["content"],
        "Context: Mitochondria.\n\nQuestion: Why?"
    );
}

#[tokio::test]
async fn rejection_embeds_the_service_message() {
    let mock = MockChatService::spawn(
        StatusCode::UNAUTHORIZED,
        r#"{"error":{"message":"bad key","type":"invalid_request_error"}}"#,
    )
    .await;

    let err = mock.adapter().complete(&credential(), &text_request()).await.unwrap_err();
    assert_eq!(err, PortError::Rejected("bad key".into()));
    assert_eq!(err.to_string(), "API Error: bad key");
}

#[tokio::test]
async fn rejection_without_detail_uses_status_text() {
    let mock = MockChatService::spawn(StatusCode::INTERNAL_SERVER_ERROR, "oops").await;

    let err = mock.adapter().complete(&credential(), &text_request()).await.unwrap_err();
    assert_eq!(err, PortError::Rejected("Internal Server Error".into()));

    let mock = MockChatService::spawn(StatusCode::TOO_MANY_REQUESTS, r#"{"error":{}}"#).await;
    let err = mock.adapter().complete(&credential(), &text_request()).await.unwrap_err();
    assert_eq!(err, PortError::Rejected("Too Many Requests".into()));
}

#[tokio::test]
async fn success_without_choices_is_unexpected_format() {
    for body in [r#"{"id":"chatcmpl-1"}"#, r#"{"choices":[]}"#, "not json"] {
        let mock = MockChatService::spawn(StatusCode::OK, body).await;
        let err = mock.adapter().complete(&credential(), &text_request()).await.unwrap_err();
        assert_eq!(err, PortError::UnexpectedFormat, "body: {body}");
    }
}

#[tokio::test]
async fn unreachable_service_is_a_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let adapter = api_lib::adapters::OpenAiChatAdapter::new(
        reqwest::Client::new(),
        &format!("http://{addr}/v1/"),
    );
    assert_eq!(adapter.endpoint(), format!("http://{addr}/v1/chat/completions"));

    match adapter.complete(&credential(), &text_request()).await {
        Err(PortError::Transport(message)) => assert!(!message.is_empty()),
        other => panic!("expected a transport error, got {other:?}"),
    }
}

/// Keeps nothing, so the store starts without a credential.
struct EmptySlot;

impl CredentialSlot for EmptySlot {
    fn load(&self) -> lesson_assistant_core::PortResult<Option<String>> {
        Ok(None)
    }
    fn store(&self, _: &str) -> lesson_assistant_core::PortResult<()> {
        Ok(())
    }
    fn remove(&self) -> lesson_assistant_core::PortResult<()> {
        Ok(())
    }
}

fn image_lesson() -> lesson_assistant_core::Lesson {
    LessonStore::new().add(LessonDraft {
        title: "Art".into(),
        system_prompt: "You are an art historian.".into(),
        content: vec![ContentBlock::Image(ImageSource::Inline(
            "data:image/png;base64,iVBORw==".into(),
        ))],
    })
}

#[tokio::test]
async fn engine_end_to_end_over_http() {
    let mock = MockChatService::answering("A red square.").await;
    let credentials = Arc::new(CredentialStore::restore(Arc::new(EmptySlot)).unwrap());
    let engine = Arc::new(QuestionAnswerEngine::new(
        Arc::new(mock.adapter()),
        credentials.clone(),
        RequestPolicy::default(),
    ));
    let viewing = ViewingSession::new(engine, image_lesson());

    // No credential yet: nothing reaches the service.
    let answer = viewing.submit(0, "What is this?").await;
    assert_eq!(
        answer,
        "Error: API key is missing. Please make sure you have entered a valid OpenAI API key."
    );
    assert!(mock.requests().is_empty());

    credentials.set("sk-live").unwrap();
    assert_eq!(viewing.submit(0, "What is this?").await, "A red square.");

    let requests = mock.requests();
    assert_eq!(requests.len(), 1);
    let body = &requests[0].body;
    assert_eq!(body["messages"][0]["content"], "You are an art historian.");
    let parts = body["messages"][1]["content"].as_array().unwrap();
    assert_eq!(parts[0]["type"], "text");
    assert_eq!(parts[0]["text"], "What is this?");
    assert_eq!(parts[1]["type"], "image_url");
    assert_eq!(parts[1]["image_url"]["url"], "data:image/png;base64,iVBORw==");
}

#[tokio::test]
async fn engine_formats_rejections_for_display() {
    let mock = MockChatService::spawn(
        StatusCode::UNAUTHORIZED,
        r#"{"error":{"message":"bad key"}}"#,
    )
    .await;
    let credentials = Arc::new(CredentialStore::restore(Arc::new(EmptySlot)).unwrap());
    credentials.set("sk-wrong").unwrap();
    let engine = Arc::new(QuestionAnswerEngine::new(
        Arc::new(mock.adapter()),
        credentials,
        RequestPolicy::default(),
    ));

    let viewing = ViewingSession::new(engine, image_lesson());
    assert_eq!(viewing.submit(0, "q").await, "Error: API Error: bad key");
}
