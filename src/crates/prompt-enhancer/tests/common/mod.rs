//! Common test utilities and setup
//!
//! An in-process stand-in for an Ollama server: it lists a fixed set of
//! models, answers generations from a queue and records every request body.

#![allow(dead_code)]

use axum::extract::State;
use axum::routing::{get, post};
use axum::{http::StatusCode, Json, Router};
use llm::{LocalLlmConfig, OllamaClient};
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone, Default)]
pub struct FakeOllama {
    models: Vec<String>,
    replies: Arc<Mutex<VecDeque<String>>>,
    requests: Arc<Mutex<Vec<Value>>>,
}

impl FakeOllama {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_models(mut self, models: &[&str]) -> Self {
        self.models = models.iter().map(|m| m.to_string()).collect();
        self
    }

    /// Queue a generation reply; sent padded with whitespace like a real model
    pub fn with_reply(self, reply: &str) -> Self {
        self.replies.lock().push_back(format!("\n {}\n", reply));
        self
    }

    /// Bodies of every `/api/generate` request so far
    pub fn requests(&self) -> Vec<Value> {
        self.requests.lock().clone()
    }

    /// Prompts of every `/api/generate` request so far
    pub fn prompts(&self) -> Vec<String> {
        self.requests()
            .iter()
            .map(|body| body["prompt"].as_str().unwrap_or_default().to_string())
            .collect()
    }

    /// Serve on an ephemeral port and return the base URL
    pub async fn spawn(&self) -> String {
        let router = Router::new()
            .route("/api/tags", get(tags))
            .route("/api/generate", post(generate))
            .with_state(self.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        format!("http://{}", addr)
    }
}

async fn tags(State(fake): State<FakeOllama>) -> Json<Value> {
    let models: Vec<Value> = fake.models.iter().map(|name| json!({ "name": name })).collect();
    Json(json!({ "models": models }))
}

async fn generate(State(fake): State<FakeOllama>, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    fake.requests.lock().push(body);
    match fake.replies.lock().pop_front() {
        Some(reply) => (StatusCode::OK, Json(json!({ "response": reply, "done": true }))),
        None => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "no reply queued" })),
        ),
    }
}

/// A base URL nothing is listening on
pub async fn unreachable_base_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

pub fn client_for(base_url: &str) -> OllamaClient {
    let config = LocalLlmConfig::new(base_url)
        .with_list_timeout(Duration::from_secs(2))
        .with_generate_timeout(Duration::from_secs(5));
    OllamaClient::new(config).unwrap()
}
