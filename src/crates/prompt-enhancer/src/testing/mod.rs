//! Test infrastructure and helpers for prompt-enhancer
//!
//! This module provides a scripted [`ModelClient`] that replays queued
//! replies and records every prompt it receives, so selector and enhancer
//! behavior can be checked without a model server.

use async_trait::async_trait;
use llm::{LlmError, ModelClient, Result};
use parking_lot::Mutex;
use std::collections::VecDeque;

/// A single `generate` call seen by the scripted client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub prompt: String,
    pub model: String,
}

/// Model client that answers from a queue of canned results
///
/// # Example
/// ```
/// use prompt_enhancer::testing::ScriptedClient;
/// use llm::ModelClient;
///
/// # async fn example() {
/// let client = ScriptedClient::new().with_reply("xml_structure");
/// let reply = client.generate("which strategy?", "llama3").await.unwrap();
/// assert_eq!(reply, "xml_structure");
/// assert_eq!(client.prompts(), vec!["which strategy?".to_string()]);
/// # }
/// ```
#[derive(Debug, Default)]
pub struct ScriptedClient {
    replies: Mutex<VecDeque<Result<String>>>,
    calls: Mutex<Vec<RecordedCall>>,
    models: Vec<String>,
}

impl ScriptedClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful reply. Replies are trimmed like a real server's.
    pub fn with_reply(self, reply: impl Into<String>) -> Self {
        self.replies
            .lock()
            .push_back(Ok(reply.into().trim().to_string()));
        self
    }

    /// Queue a failed generation
    pub fn with_failure(self, err: LlmError) -> Self {
        self.replies.lock().push_back(Err(err));
        self
    }

    /// Models returned by `list_models`
    pub fn with_models<I, S>(mut self, models: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.models = models.into_iter().map(Into::into).collect();
        self
    }

    /// Every `generate` call so far, in order
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    /// Prompts of every `generate` call so far, in order
    pub fn prompts(&self) -> Vec<String> {
        self.calls.lock().iter().map(|c| c.prompt.clone()).collect()
    }

    /// Number of queued replies not yet consumed
    pub fn remaining(&self) -> usize {
        self.replies.lock().len()
    }
}

#[async_trait]
impl ModelClient for ScriptedClient {
    async fn list_models(&self) -> Vec<String> {
        self.models.clone()
    }

    async fn generate(&self, prompt: &str, model: &str) -> Result<String> {
        self.calls.lock().push(RecordedCall {
            prompt: prompt.to_string(),
            model: model.to_string(),
        });

        self.replies.lock().pop_front().unwrap_or_else(|| {
            Err(LlmError::InvalidResponse(
                "scripted client has no reply queued".to_string(),
            ))
        })
    }
}

/// Sample prompts and parameters for tests
pub mod fixtures {
    use std::collections::BTreeMap;

    /// A prompt with more than fifteen words
    pub fn long_prompt() -> &'static str {
        "Please help me write a detailed project plan for migrating our monolithic billing service to a set of smaller services"
    }

    /// A prompt well under the word threshold
    pub fn short_prompt() -> &'static str {
        "Explain recursion"
    }

    /// Parameters satisfying the role prompting template
    pub fn role_parameters() -> BTreeMap<String, String> {
        [
            ("persona", "data engineer"),
            ("years_experience", "15"),
            ("domain", "distributed systems"),
            ("key_strengths", "pragmatism"),
            ("reputation_traits", "clear explanations"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }

    /// Parameters satisfying the multishot template
    pub fn multishot_parameters() -> BTreeMap<String, String> {
        [
            ("example_input_1", "2 + 2"),
            ("example_output_1", "4"),
            ("example_input_2", "3 * 3"),
            ("example_output_2", "9"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_replies_are_consumed_in_order() {
        let client = ScriptedClient::new().with_reply("first").with_reply("  second  ");

        assert_eq!(client.generate("a", "m").await.unwrap(), "first");
        assert_eq!(client.generate("b", "m").await.unwrap(), "second");
        assert!(client.generate("c", "m").await.is_err());
        assert_eq!(client.prompts(), vec!["a", "b", "c"]);
        assert_eq!(client.remaining(), 0);
    }

    #[tokio::test]
    async fn test_models() {
        let client = ScriptedClient::new().with_models(["llama3:latest"]);
        assert_eq!(client.list_models().await, vec!["llama3:latest".to_string()]);
    }

    #[test]
    fn test_fixture_word_counts() {
        assert!(fixtures::long_prompt().split_whitespace().count() > 15);
        assert!(fixtures::short_prompt().split_whitespace().count() <= 15);
    }
}
