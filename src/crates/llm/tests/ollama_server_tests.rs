//! Integration tests for the Ollama client against an in-process fake server.

use axum::routing::{get, post};
use axum::{http::StatusCode, Json, Router};
use llm::{LlmError, LocalLlmConfig, ModelClient, OllamaClient};
use serde_json::{json, Value};
use std::time::Duration;

/// Serve `router` on an ephemeral port and return its base URL.
async fn spawn_server(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    format!("http://{}", addr)
}

/// A base URL nothing is listening on.
async fn unreachable_base_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

fn client_for(base_url: &str) -> OllamaClient {
    let config = LocalLlmConfig::new(base_url)
        .with_list_timeout(Duration::from_secs(2))
        .with_generate_timeout(Duration::from_secs(2));
    OllamaClient::new(config).unwrap()
}

#[tokio::test]
async fn test_list_models_single_model() {
    let router = Router::new().route(
        "/api/tags",
        get(|| async { Json(json!({"models": [{"name": "llama3:latest"}]})) }),
    );
    let base = spawn_server(router).await;

    let models = client_for(&base).list_models().await;
    assert_eq!(models, vec!["llama3:latest".to_string()]);
}

#[tokio::test]
async fn test_list_models_sorted() {
    let router = Router::new().route(
        "/api/tags",
        get(|| async {
            Json(json!({"models": [
                {"name": "mistral:7b", "size": 4_100_000_000u64},
                {"name": "gemma:2b"},
                {"name": "llama3:latest", "modified_at": "2024-05-01T10:00:00Z"}
            ]}))
        }),
    );
    let base = spawn_server(router).await;

    let models = client_for(&base).list_models().await;
    assert_eq!(models, vec!["gemma:2b", "llama3:latest", "mistral:7b"]);
}

#[tokio::test]
async fn test_list_models_empty_returns_default() {
    let router = Router::new().route("/api/tags", get(|| async { Json(json!({"models": []})) }));
    let base = spawn_server(router).await;

    let models = client_for(&base).list_models().await;
    assert_eq!(models, vec!["llama3:latest".to_string()]);
}

#[tokio::test]
async fn test_list_models_empty_uses_configured_default() {
    let router = Router::new().route("/api/tags", get(|| async { Json(json!({})) }));
    let base = spawn_server(router).await;

    let config = LocalLlmConfig::new(&base).with_default_model("phi3");
    let client = OllamaClient::new(config).unwrap();

    assert_eq!(client.list_models().await, vec!["phi3".to_string()]);
}

#[tokio::test]
async fn test_list_models_server_error_returns_empty() {
    let router = Router::new().route(
        "/api/tags",
        get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
    );
    let base = spawn_server(router).await;

    assert!(client_for(&base).list_models().await.is_empty());
}

#[tokio::test]
async fn test_list_models_malformed_body_returns_empty() {
    let router = Router::new().route("/api/tags", get(|| async { "definitely not json" }));
    let base = spawn_server(router).await;

    let client = client_for(&base);
    assert!(client.list_models().await.is_empty());
    assert!(matches!(
        client.fetch_models().await,
        Err(LlmError::InvalidResponse(_))
    ));
}

#[tokio::test]
async fn test_list_models_unreachable_returns_empty() {
    let base = unreachable_base_url().await;
    let client = client_for(&base);

    assert!(client.list_models().await.is_empty());
    assert!(!client.check_health().await);
}

#[tokio::test]
async fn test_generate_sends_model_and_prompt_without_streaming() {
    let router = Router::new().route(
        "/api/generate",
        post(|Json(body): Json<Value>| async move {
            let reply = format!(
                "  model={} prompt={} stream={}  \n",
                body["model"].as_str().unwrap_or(""),
                body["prompt"].as_str().unwrap_or(""),
                body["stream"]
            );
            Json(json!({ "response": reply, "done": true }))
        }),
    );
    let base = spawn_server(router).await;

    let text = client_for(&base).generate("hello", "llama3").await.unwrap();
    assert_eq!(text, "model=llama3 prompt=hello stream=false");
}

#[tokio::test]
async fn test_bare_host_base_url_reaches_server() {
    let router = Router::new()
        .route(
            "/api/tags",
            get(|| async { Json(json!({"models": [{"name": "phi3:mini"}]})) }),
        )
        .route(
            "/api/generate",
            post(|| async { Json(json!({ "response": " pong ", "done": true })) }),
        );
    let base = spawn_server(router).await;
    let bare = base.trim_start_matches("http://");

    let client = client_for(bare);
    assert_eq!(client.config().base_url, base);
    assert_eq!(client.list_models().await, vec!["phi3:mini".to_string()]);
    assert_eq!(client.generate("ping", "phi3:mini").await.unwrap(), "pong");
}

#[tokio::test]
async fn test_unparseable_base_url_is_config_error() {
    let result = OllamaClient::new(LocalLlmConfig::new("http://[::1"));
    assert!(matches!(result, Err(LlmError::ConfigError(_))));
}

#[tokio::test]
async fn test_generate_non_success_status_is_provider_error() {
    let router = Router::new().route(
        "/api/generate",
        post(|| async { (StatusCode::NOT_FOUND, r#"{"error":"model 'nope' not found"}"#) }),
    );
    let base = spawn_server(router).await;

    let err = client_for(&base).generate("hi", "nope").await.unwrap_err();
    assert!(matches!(err, LlmError::ProviderError(_)));
    assert!(err.to_string().contains("404"));
    assert!(err.display_text().starts_with("[Ollama Error:"));
}

#[tokio::test]
async fn test_generate_missing_response_field() {
    let router = Router::new().route("/api/generate", post(|| async { Json(json!({"done": true})) }));
    let base = spawn_server(router).await;

    let err = client_for(&base).generate("hi", "llama3").await.unwrap_err();
    assert!(matches!(err, LlmError::InvalidResponse(_)));
}

#[tokio::test]
async fn test_generate_timeout() {
    let router = Router::new().route(
        "/api/generate",
        post(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Json(json!({"response": "too late"}))
        }),
    );
    let base = spawn_server(router).await;

    let config = LocalLlmConfig::new(&base).with_generate_timeout(Duration::from_millis(200));
    let client = OllamaClient::new(config).unwrap();

    let err = client.generate("hi", "llama3").await.unwrap_err();
    assert!(matches!(err, LlmError::Timeout(_)), "unexpected error: {err:?}");
}

#[tokio::test]
async fn test_generate_unreachable_is_retryable() {
    let base = unreachable_base_url().await;

    let err = client_for(&base).generate("hi", "llama3").await.unwrap_err();
    assert!(err.is_retryable(), "unexpected error: {err:?}");
}
