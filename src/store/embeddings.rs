use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::llm::LlmProvider;
use crate::models::VendorProfile;

use super::{read_json, write_json_atomic, StoreError};

/// Vendor name -> embedding vector
pub type EmbeddingMap = BTreeMap<String, Vec<f32>>;

/// Text embedded for each vendor when the cache is (re)built.
pub fn vendor_blob(vendor: &VendorProfile) -> String {
    format!(
        "{}. Services: {}. Countries: {}. Description: {}",
        vendor.name,
        vendor.services.join(", "),
        vendor.countries.join(", "),
        vendor.description
    )
}

/// On-disk cache of catalog embeddings, rebuilt wholesale.
pub struct EmbeddingCache {
    path: PathBuf,
}

impl EmbeddingCache {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    pub fn read(&self) -> Option<EmbeddingMap> {
        read_json(&self.path)
    }

    pub fn write(&self, mapping: &EmbeddingMap) -> Result<(), StoreError> {
        write_json_atomic(&self.path, mapping, false)
    }

    /// Return the cached mapping, building it from `catalog` when the cache
    /// is empty or `force_refresh` is set.
    ///
    /// Returns `None` when there is nothing cached and no provider to build
    /// with, or when every vendor failed to embed.
    pub async fn ensure(
        &self,
        catalog: &[VendorProfile],
        llm: Option<&dyn LlmProvider>,
        force_refresh: bool,
    ) -> Option<EmbeddingMap> {
        if !force_refresh {
            if let Some(cached) = self.read().filter(|m| !m.is_empty()) {
                return Some(cached);
            }
        }

        let llm = llm?;
        tracing::info!(
            "Building vendor embeddings for {} vendors via {}",
            catalog.len(),
            llm.name()
        );

        let mut mapping = EmbeddingMap::new();
        for vendor in catalog {
            match llm.embed(&vendor_blob(vendor)).await {
                Ok(vec) if !vec.is_empty() => {
                    mapping.insert(vendor.name.clone(), vec);
                }
                Ok(_) => tracing::warn!("Empty embedding returned for {}", vendor.name),
                Err(e) => tracing::warn!("Embedding failed for {}: {e:#}", vendor.name),
            }
        }

        if mapping.is_empty() {
            return None;
        }
        if let Err(e) = self.write(&mapping) {
            tracing::warn!("Failed to persist vendor embeddings: {e}");
        }
        Some(mapping)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::StubLlm;

    fn catalog() -> Vec<VendorProfile> {
        vec![
            VendorProfile {
                name: "Acme".to_string(),
                services: vec!["Packaging".to_string(), "Labeling".to_string()],
                countries: vec!["US".to_string()],
                description: "Blister packs".to_string(),
                capacity_per_month: None,
            },
            VendorProfile::from_name("Plain"),
        ]
    }

    #[test]
    fn test_vendor_blob_format() {
        assert_eq!(
            vendor_blob(&catalog()[0]),
            "Acme. Services: Packaging, Labeling. Countries: US. Description: Blister packs"
        );
    }

    #[tokio::test]
    async fn test_ensure_without_provider_or_cache() {
        let dir = tempfile::tempdir().unwrap();
        let cache = EmbeddingCache::new(&dir.path().join("emb.json"));
        assert!(cache.ensure(&catalog(), None, false).await.is_none());
    }

    #[tokio::test]
    async fn test_ensure_builds_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let cache = EmbeddingCache::new(&dir.path().join("emb.json"));
        let stub = StubLlm::new();

        let built = cache.ensure(&catalog(), Some(&stub), false).await.unwrap();
        assert_eq!(built.len(), 2);
        assert_eq!(stub.embed_calls().len(), 2);
        assert_eq!(cache.read(), Some(built));
    }

    #[tokio::test]
    async fn test_ensure_reuses_cache_unless_forced() {
        let dir = tempfile::tempdir().unwrap();
        let cache = EmbeddingCache::new(&dir.path().join("emb.json"));
        let mut seeded = EmbeddingMap::new();
        seeded.insert("Acme".to_string(), vec![1.0, 0.0]);
        cache.write(&seeded).unwrap();

        let stub = StubLlm::new();
        let got = cache.ensure(&catalog(), Some(&stub), false).await.unwrap();
        assert_eq!(got, seeded);
        assert!(stub.embed_calls().is_empty());

        // Cached vectors are served even with no provider configured
        assert_eq!(cache.ensure(&catalog(), None, false).await, Some(seeded));

        let rebuilt = cache.ensure(&catalog(), Some(&stub), true).await.unwrap();
        assert_eq!(rebuilt.len(), 2);
        assert_eq!(stub.embed_calls().len(), 2);
    }

    #[tokio::test]
    async fn test_ensure_all_failures_yields_none() {
        let dir = tempfile::tempdir().unwrap();
        let cache = EmbeddingCache::new(&dir.path().join("emb.json"));
        let stub = StubLlm::new().failing_embeddings();
        assert!(cache.ensure(&catalog(), Some(&stub), true).await.is_none());
        assert!(cache.read().is_none());
    }
}
