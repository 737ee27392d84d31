//! Chat session driven through the HTTP client against a running relay.

mod common;

use common::{completion_body, TestApp, TEST_API_KEY};
use relay_service::models::ModelKey;
use relay_service::services::providers::mock::MockChatProvider;
use relay_service::services::providers::ProviderError;
use relay_service::session::{ChatSession, MessageRole, RelayClient, MISSING_KEY_NOTICE};

#[tokio::test]
async fn session_round_trip_records_memory() {
    let app = TestApp::spawn(
        MockChatProvider::replying(completion_body("Entropy measures disorder.")),
        Some(TEST_API_KEY),
    )
    .await;
    let client = RelayClient::new(&app.address);
    let mut session = ChatSession::new();

    session.switch_model(ModelKey::Rvm);
    let reply = session.send(&client, "What is entropy?").await.unwrap();
    assert_eq!(reply.role, MessageRole::Assistant);
    assert_eq!(reply.content, "Entropy measures disorder.");

    let memory = session.memories().iter().next().unwrap();
    assert_eq!(memory.prompt, "What is entropy?");
    assert_eq!(memory.model_name, "RVM 1.0");
    assert_eq!(
        app.provider.last_request().unwrap().model,
        "deepseek-reasoner"
    );
}

#[tokio::test]
async fn relay_failure_renders_inline_and_session_continues() {
    let app = TestApp::spawn(
        MockChatProvider::failing(ProviderError::Http {
            status: 503,
            body: "overloaded".to_string(),
        }),
        Some(TEST_API_KEY),
    )
    .await;
    let client = RelayClient::new(&app.address);
    let mut session = ChatSession::new();

    let reply = session.send(&client, "hello").await.unwrap();
    assert_eq!(reply.content, "Error: HTTP 503: overloaded");
    assert!(session.memories().is_empty());
    assert!(!session.is_sending());

    assert!(session.send(&client, "again").await.is_ok());
    assert_eq!(app.provider.calls(), 2);
}

#[tokio::test]
async fn missing_credential_surfaces_notice_and_error() {
    let app = TestApp::spawn(MockChatProvider::replying(completion_body("hi")), None).await;
    let client = RelayClient::new(&app.address);
    let mut session = ChatSession::new();

    session.check_health(&client).await;
    assert_eq!(session.messages()[0].content, MISSING_KEY_NOTICE);

    let reply = session.send(&client, "hello").await.unwrap();
    assert_eq!(reply.content, "Error: DEEPSEEK_API_KEY not configured");
    assert_eq!(app.provider.calls(), 0);
}

#[tokio::test]
async fn unreachable_relay_is_connection_error() {
    let client = RelayClient::new("http://127.0.0.1:9");
    let mut session = ChatSession::new();

    let reply = session.send(&client, "hello").await.unwrap();
    assert!(reply.content.starts_with("Connection Error: "));
    assert!(reply
        .content
        .ends_with(". Please check your network and try again."));
    assert!(!session.is_sending());
}
