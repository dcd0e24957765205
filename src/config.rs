use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Where the JSON stores, embeddings and generated RFPs live
    pub data_dir: PathBuf,
    /// Where uploaded attachments are written
    pub upload_dir: PathBuf,
    /// Static frontend assets (index.html, formSchemas/)
    pub public_dir: PathBuf,
    /// Server bind address
    pub bind_addr: String,
    /// LLM provider configuration
    pub llm: LlmConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// "openai" or "ollama"
    pub provider: String,
    /// Base URL for the LLM API
    pub base_url: String,
    /// Model name for re-ranking
    pub chat_model: String,
    /// Model name for embeddings
    pub embedding_model: String,
    /// API key (only needed for cloud providers)
    pub api_key: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            upload_dir: PathBuf::from("./uploads"),
            public_dir: PathBuf::from("./public"),
            bind_addr: "127.0.0.1:8000".to_string(),
            llm: LlmConfig::default(),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            base_url: "https://api.openai.com".to_string(),
            chat_model: "gpt-4o-mini".to_string(),
            embedding_model: "text-embedding-3-small".to_string(),
            api_key: None,
        }
    }
}

impl LlmConfig {
    /// Whether the enhancement tiers (embeddings, re-rank) should be enabled.
    /// Ollama runs locally and needs no key; cloud providers do.
    pub fn is_configured(&self) -> bool {
        match self.provider.as_str() {
            "ollama" => true,
            _ => self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty()),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(dir) = std::env::var("VSP_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        if let Ok(dir) = std::env::var("VSP_UPLOAD_DIR") {
            config.upload_dir = PathBuf::from(dir);
        }
        if let Ok(dir) = std::env::var("VSP_PUBLIC_DIR") {
            config.public_dir = PathBuf::from(dir);
        }
        if let Ok(addr) = std::env::var("VSP_BIND_ADDR") {
            config.bind_addr = addr;
        }
        if let Ok(provider) = std::env::var("LLM_PROVIDER") {
            if provider == "ollama" {
                config.llm.base_url = "http://localhost:11434".to_string();
            }
            config.llm.provider = provider;
        }
        if let Ok(url) = std::env::var("LLM_BASE_URL") {
            config.llm.base_url = url;
        }
        if let Ok(model) = std::env::var("OPENAI_MODEL") {
            config.llm.chat_model = model;
        }
        if let Ok(model) = std::env::var("OPENAI_EMBED_MODEL") {
            config.llm.embedding_model = model;
        }
        if let Ok(key) = std::env::var("OPENAI_API_KEY").or_else(|_| std::env::var("LLM_API_KEY")) {
            config.llm.api_key = Some(key);
        }

        config
    }

    /// A config rooted entirely under `root`, used by tests and throwaway instances.
    pub fn rooted_at(root: &std::path::Path) -> Self {
        Self {
            data_dir: root.join("data"),
            upload_dir: root.join("uploads"),
            public_dir: root.join("public"),
            ..Self::default()
        }
    }

    pub fn requests_path(&self) -> PathBuf {
        self.data_dir.join("requests.json")
    }

    pub fn catalog_path(&self) -> PathBuf {
        self.data_dir.join("vendors_catalog.json")
    }

    pub fn vendor_names_path(&self) -> PathBuf {
        self.data_dir.join("vendors.json")
    }

    pub fn embeddings_path(&self) -> PathBuf {
        self.data_dir.join("vendors_embeddings.json")
    }

    pub fn audit_path(&self) -> PathBuf {
        self.data_dir.join("selection_audit.json")
    }

    pub fn rfp_dir(&self) -> PathBuf {
        self.data_dir.join("rfps")
    }

    pub fn schemas_dir(&self) -> PathBuf {
        self.public_dir.join("formSchemas")
    }
}
