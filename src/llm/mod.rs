//! External embedding and chat-completion providers.
//!
//! Both capabilities sit behind [`LlmProvider`] so the selection pipeline can
//! run against the real HTTP client or the deterministic [`StubLlm`].

pub mod client;
pub mod rerank;
pub mod stub;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use client::HttpLlm;
pub use stub::StubLlm;

/// A single chat turn sent to the completion endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Short provider label for logs.
    fn name(&self) -> &str;

    /// Embed one text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Run a non-streaming chat completion and return the assistant text.
    async fn chat(&self, messages: &[ChatMessage]) -> Result<String>;
}
