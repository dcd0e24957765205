use std::sync::Arc;

use crate::config::Config;
use crate::llm::{HttpLlm, LlmProvider};
use crate::store::{AuditLog, EmbeddingCache, JsonRequestStore, RequestRepository, VendorCatalog};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub requests: Arc<dyn RequestRepository>,
    pub catalog: Arc<VendorCatalog>,
    pub embeddings: Arc<EmbeddingCache>,
    pub audit: Arc<AuditLog>,
    /// `None` when no provider is configured; embeddings and re-rank are skipped.
    pub llm: Option<Arc<dyn LlmProvider>>,
}

impl AppState {
    /// Open the stores under `config` and connect the configured provider.
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let llm: Option<Arc<dyn LlmProvider>> = if config.llm.is_configured() {
            Some(Arc::new(HttpLlm::new(config.llm.clone())?))
        } else {
            None
        };
        Self::with_llm(config, llm)
    }

    /// Like [`AppState::new`] but with an explicit provider (or none).
    pub fn with_llm(config: Config, llm: Option<Arc<dyn LlmProvider>>) -> anyhow::Result<Self> {
        // Ensure data directories exist
        std::fs::create_dir_all(&config.data_dir)?;
        std::fs::create_dir_all(&config.upload_dir)?;
        std::fs::create_dir_all(config.rfp_dir())?;

        let requests = JsonRequestStore::open(&config.requests_path())?;
        let catalog = VendorCatalog::open(&config.catalog_path(), &config.vendor_names_path())?;
        let embeddings = EmbeddingCache::new(&config.embeddings_path());
        let audit = AuditLog::open(&config.audit_path())?;

        Ok(Self {
            config,
            requests: Arc::new(requests),
            catalog: Arc::new(catalog),
            embeddings: Arc::new(embeddings),
            audit: Arc::new(audit),
            llm,
        })
    }
}
