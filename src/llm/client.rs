use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{ChatMessage, LlmProvider};
use crate::config::LlmConfig;

/// Upper bound on characters sent per embedding input. Vendor blobs and
/// request summaries are far below this; it only guards pasted documents.
const MAX_EMBED_CHARS: usize = 8_000;

const CHAT_MAX_TOKENS: u32 = 900;

/// Truncate `text` to at most `MAX_EMBED_CHARS`, splitting on a UTF-8 char boundary.
fn truncate_for_embedding(text: &str) -> &str {
    if text.len() <= MAX_EMBED_CHARS {
        return text;
    }
    let mut end = MAX_EMBED_CHARS;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

/// Network client for OpenAI-compatible or Ollama endpoints.
pub struct HttpLlm {
    client: reqwest::Client,
    config: LlmConfig,
}

impl HttpLlm {
    pub fn new(config: LlmConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client, config })
    }

    fn api_key(&self) -> &str {
        self.config.api_key.as_deref().unwrap_or_default()
    }
}

#[async_trait]
impl LlmProvider for HttpLlm {
    fn name(&self) -> &str {
        &self.config.provider
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let input = truncate_for_embedding(text).to_string();
        let embeddings = match self.config.provider.as_str() {
            "ollama" => self.embed_ollama(input).await?,
            "openai" => self.embed_openai(input).await?,
            other => anyhow::bail!("Unknown LLM provider: {other}"),
        };
        embeddings
            .into_iter()
            .next()
            .context("No embedding returned")
    }

    async fn chat(&self, messages: &[ChatMessage]) -> Result<String> {
        match self.config.provider.as_str() {
            "ollama" => self.chat_ollama(messages).await,
            "openai" => self.chat_openai(messages).await,
            other => anyhow::bail!("Unknown LLM provider: {other}"),
        }
    }
}

// ─── Ollama ──────────────────────────────────────────────

#[derive(Serialize)]
struct OllamaEmbedRequest {
    model: String,
    input: Vec<String>,
    truncate: bool,
}

#[derive(Deserialize)]
struct OllamaEmbedResponse {
    embeddings: Vec<Vec<f32>>,
}

#[derive(Serialize)]
struct OllamaChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    stream: bool,
    options: OllamaOptions,
}

#[derive(Serialize)]
struct OllamaOptions {
    temperature: f32,
}

#[derive(Deserialize)]
struct OllamaChatResponse {
    message: ChatMessage,
}

impl HttpLlm {
    async fn embed_ollama(&self, input: String) -> Result<Vec<Vec<f32>>> {
        let url = format!("{}/api/embed", self.config.base_url);
        let req = OllamaEmbedRequest {
            model: self.config.embedding_model.clone(),
            input: vec![input],
            truncate: true,
        };

        let resp = self
            .client
            .post(&url)
            .json(&req)
            .send()
            .await
            .context("Failed to call Ollama embed API")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("Ollama embed API returned {status}: {body}");
        }

        let body: OllamaEmbedResponse = resp
            .json()
            .await
            .context("Failed to parse Ollama embed response")?;
        Ok(body.embeddings)
    }

    async fn chat_ollama(&self, messages: &[ChatMessage]) -> Result<String> {
        let url = format!("{}/api/chat", self.config.base_url);
        let req = OllamaChatRequest {
            model: &self.config.chat_model,
            messages,
            stream: false,
            options: OllamaOptions { temperature: 0.0 },
        };

        let resp = self
            .client
            .post(&url)
            .json(&req)
            .send()
            .await
            .context("Failed to call Ollama chat API")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("Ollama chat API returned {status}: {body}");
        }

        let body: OllamaChatResponse = resp
            .json()
            .await
            .context("Failed to parse Ollama chat response")?;
        Ok(body.message.content)
    }
}

// ─── OpenAI-compatible ───────────────────────────────────

#[derive(Serialize)]
struct OpenAiEmbedRequest {
    model: String,
    input: Vec<String>,
}

#[derive(Deserialize)]
struct OpenAiEmbedResponse {
    data: Vec<OpenAiEmbedData>,
}

#[derive(Deserialize)]
struct OpenAiEmbedData {
    embedding: Vec<f32>,
}

#[derive(Serialize)]
struct OpenAiChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct OpenAiChatResponse {
    choices: Vec<OpenAiChoice>,
}

#[derive(Deserialize)]
struct OpenAiChoice {
    message: OpenAiResponseMessage,
}

#[derive(Deserialize)]
struct OpenAiResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

impl HttpLlm {
    async fn embed_openai(&self, input: String) -> Result<Vec<Vec<f32>>> {
        let url = format!("{}/v1/embeddings", self.config.base_url);
        let req = OpenAiEmbedRequest {
            model: self.config.embedding_model.clone(),
            input: vec![input],
        };

        let resp = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key()))
            .json(&req)
            .send()
            .await
            .context("Failed to call OpenAI embed API")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("OpenAI embed API returned {status}: {body}");
        }

        let body: OpenAiEmbedResponse = resp
            .json()
            .await
            .context("Failed to parse OpenAI embed response")?;
        Ok(body.data.into_iter().map(|d| d.embedding).collect())
    }

    async fn chat_openai(&self, messages: &[ChatMessage]) -> Result<String> {
        let url = format!("{}/v1/chat/completions", self.config.base_url);
        let req = OpenAiChatRequest {
            model: &self.config.chat_model,
            messages,
            temperature: 0.0,
            max_tokens: CHAT_MAX_TOKENS,
        };

        let resp = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key()))
            .json(&req)
            .send()
            .await
            .context("Failed to call OpenAI chat API")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("OpenAI chat API returned {status}: {body}");
        }

        let body: OpenAiChatResponse = resp
            .json()
            .await
            .context("Failed to parse OpenAI chat response")?;
        body.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .context("Chat completion returned no content")
    }
}
