use anyhow::Result;
use async_trait::async_trait;
use parking_lot::Mutex;

use super::{ChatMessage, LlmProvider};

const STUB_DIM: usize = 64;

/// Deterministic offline provider.
///
/// Embeddings are hashed bags of lowercase words, so texts sharing words
/// score higher under cosine similarity. Chat returns a canned reply, or
/// fails when none is set. Every call is recorded for assertions.
#[derive(Default)]
pub struct StubLlm {
    chat_reply: Option<String>,
    fail_embeddings: bool,
    embed_calls: Mutex<Vec<String>>,
    chat_calls: Mutex<Vec<Vec<ChatMessage>>>,
}

impl StubLlm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_chat_reply(mut self, reply: impl Into<String>) -> Self {
        self.chat_reply = Some(reply.into());
        self
    }

    pub fn failing_embeddings(mut self) -> Self {
        self.fail_embeddings = true;
        self
    }

    pub fn embed_calls(&self) -> Vec<String> {
        self.embed_calls.lock().clone()
    }

    pub fn chat_calls(&self) -> Vec<Vec<ChatMessage>> {
        self.chat_calls.lock().clone()
    }
}

/// FNV-1a, stable across runs and platforms.
fn fnv1a(bytes: &[u8]) -> u64 {
    let mut hash: u64 = 0xcbf29ce484222325;
    for b in bytes {
        hash ^= u64::from(*b);
        hash = hash.wrapping_mul(0x100000001b3);
    }
    hash
}

pub fn stub_embedding(text: &str) -> Vec<f32> {
    let mut v = vec![0f32; STUB_DIM];
    for word in text
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
    {
        let idx = (fnv1a(word.as_bytes()) % STUB_DIM as u64) as usize;
        v[idx] += 1.0;
    }
    v
}

#[async_trait]
impl LlmProvider for StubLlm {
    fn name(&self) -> &str {
        "stub"
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.embed_calls.lock().push(text.to_string());
        if self.fail_embeddings {
            anyhow::bail!("stub embeddings disabled");
        }
        Ok(stub_embedding(text))
    }

    async fn chat(&self, messages: &[ChatMessage]) -> Result<String> {
        self.chat_calls.lock().push(messages.to_vec());
        match &self.chat_reply {
            Some(reply) => Ok(reply.clone()),
            None => anyhow::bail!("stub has no chat reply"),
        }
    }
}
