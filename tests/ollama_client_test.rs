//! Integration tests for the Ollama HTTP client
//!
//! These tests run the client against a mockito server standing in for
//! Ollama.
//!
//! Test coverage:
//! - Model listing via `/api/tags`
//! - Embedding requests and error classification
//! - Non-streaming chat requests and sampling options
//! - Connection failures
//! - A full engine run over HTTP

mod common;

use std::sync::Arc;

use docrag::adapters::{InMemoryDocumentSource, OllamaClient, OllamaClientConfig};
use docrag::domain::models::{ChatMessage, ChatOptions};
use docrag::domain::ports::{ChatBackend, EmbeddingBackend};
use docrag::{RagEngine, RagError};
use mockito::{Matcher, Server};

fn client_for(url: &str) -> OllamaClient {
    OllamaClient::new(OllamaClientConfig {
        base_url: url.to_string(),
        timeout_secs: 5,
    })
    .unwrap()
}

fn tags_body() -> String {
    serde_json::json!({
        "models": [
            {"name": "nomic-embed-text:latest", "size": 274302450, "modified_at": "2024-05-01T10:00:00Z"},
            {"name": "llama3:latest", "size": 4661224676u64}
        ]
    })
    .to_string()
}

#[tokio::test]
async fn test_list_models_with_mock() {
    // Arrange: Create mock HTTP server
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/api/tags")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(tags_body())
        .expect(2)
        .create_async()
        .await;
    let client = client_for(&server.url());

    // Act
    let models = EmbeddingBackend::list_models(&client).await.unwrap();
    let installed = client.installed_models().await.unwrap();

    // Assert
    assert_eq!(models, vec!["nomic-embed-text:latest", "llama3:latest"]);
    assert_eq!(installed[0].size, Some(274_302_450));
    assert_eq!(installed[1].modified_at, None);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_embed_sends_model_and_prompt() {
    // Arrange
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/embeddings")
        .match_body(Matcher::Json(serde_json::json!({
            "model": "nomic-embed-text:latest",
            "prompt": "Battery life is 10 hours."
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"embedding": [0.25, -0.5, 1.0]}"#)
        .create_async()
        .await;
    let client = client_for(&server.url());

    // Act
    let vector = client
        .embed("nomic-embed-text:latest", "Battery life is 10 hours.")
        .await
        .unwrap();

    // Assert
    assert_eq!(vector, vec![0.25, -0.5, 1.0]);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_embed_missing_model_is_unavailable() {
    // Arrange
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/api/embeddings")
        .with_status(404)
        .with_body(r#"{"error": "model \"all-minilm\" not found, try pulling it first"}"#)
        .create_async()
        .await;
    let client = client_for(&server.url());

    // Act
    let err = client.embed("all-minilm", "text").await.unwrap_err();

    // Assert
    assert!(matches!(err, RagError::ModelUnavailable { ref model, .. } if model == "all-minilm"));
    assert!(!err.is_transient());
}

#[tokio::test]
async fn test_embed_server_error_is_transient_and_truncated() {
    // Arrange
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/api/embeddings")
        .with_status(500)
        .with_body("x".repeat(5_000))
        .create_async()
        .await;
    let client = client_for(&server.url());

    // Act
    let err = client.embed("nomic-embed-text", "text").await.unwrap_err();

    // Assert
    assert!(matches!(err, RagError::Embedding(_)));
    assert!(err.is_transient());
    assert!(err.to_string().contains("500"));
    assert!(err.to_string().len() < 200, "response body must be truncated");
}

#[tokio::test]
async fn test_embed_empty_vector_is_rejected() {
    // Arrange
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/api/embeddings")
        .with_status(200)
        .with_body(r#"{"embedding": []}"#)
        .create_async()
        .await;
    let client = client_for(&server.url());

    // Act
    let err = client.embed("nomic-embed-text", "text").await.unwrap_err();

    // Assert
    assert_eq!(err.kind(), "embedding");
}

#[tokio::test]
async fn test_chat_sends_non_streaming_request() {
    // Arrange
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/chat")
        .match_body(Matcher::PartialJson(serde_json::json!({
            "model": "llama3:latest",
            "stream": false,
            "options": {"temperature": 0.5, "num_ctx": 2048},
            "messages": [
                {"role": "system", "content": "Use the context."},
                {"role": "user", "content": "How do I turn on the device?"}
            ]
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            serde_json::json!({
                "model": "llama3:latest",
                "message": {"role": "assistant", "content": "Press the side button."},
                "done": true
            })
            .to_string(),
        )
        .create_async()
        .await;
    let client = client_for(&server.url());
    let messages = vec![
        ChatMessage::system("Use the context."),
        ChatMessage::user("How do I turn on the device?"),
    ];
    let options = ChatOptions {
        temperature: 0.5,
        context_window: 2048,
    };

    // Act
    let reply = client.chat("llama3:latest", &messages, options).await.unwrap();

    // Assert
    assert_eq!(reply, "Press the side button.");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_chat_bad_request_maps_to_chat_error() {
    // Arrange
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/api/chat")
        .with_status(400)
        .with_body(r#"{"error": "invalid options"}"#)
        .create_async()
        .await;
    let client = client_for(&server.url());
    let options = ChatOptions {
        temperature: 0.1,
        context_window: 4096,
    };

    // Act
    let err = client
        .chat("llama3", &[ChatMessage::user("hi")], options)
        .await
        .unwrap_err();

    // Assert
    assert!(matches!(err.inner(), RagError::Chat(msg) if msg.contains("invalid options")));
    assert!(!err.is_transient(), "a rejected request must not be retried");
    assert_eq!(err.kind(), "chat");
}

#[tokio::test]
async fn test_unreachable_server_is_provider_error() {
    // Arrange: nothing listens on port 9 (discard) in the test environment
    let client = client_for("http://127.0.0.1:9");

    // Act
    let err = EmbeddingBackend::list_models(&client).await.unwrap_err();

    // Assert
    assert_eq!(err.kind(), "provider");
    assert!(err.is_transient());
}

#[tokio::test]
async fn test_engine_over_http() {
    // Arrange
    let mut server = Server::new_async().await;
    let _tags = server
        .mock("GET", "/api/tags")
        .with_status(200)
        .with_body(tags_body())
        .create_async()
        .await;
    let _embeddings = server
        .mock("POST", "/api/embeddings")
        .with_status(200)
        .with_body(r#"{"embedding": [0.6, 0.8, 0.0]}"#)
        .expect_at_least(3)
        .create_async()
        .await;
    let _chat = server
        .mock("POST", "/api/chat")
        .with_status(200)
        .with_body(
            serde_json::json!({
                "message": {"role": "assistant", "content": common::SIDE_BUTTON_ANSWER}
            })
            .to_string(),
        )
        .create_async()
        .await;

    let client = Arc::new(client_for(&server.url()));
    let source = InMemoryDocumentSource::from_texts([
        "The device powers on via the side button.",
        "Battery life is 10 hours.",
    ]);

    // Act
    let engine = RagEngine::initialize(common::scenario_config(), client.clone(), client, &source)
        .await
        .unwrap();
    let answer = engine
        .ask_question("How do I turn on the device?")
        .await
        .unwrap();

    // Assert
    assert_eq!(engine.store().len(), 2);
    assert_eq!(engine.store().dimension(), 3);
    assert!(answer.status.is_answered());
    assert!(answer.text.contains("side button"));
}
