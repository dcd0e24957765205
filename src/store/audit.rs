use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::models::AuditRecord;

use super::{read_json, seed_json, write_json_atomic, StoreError};

/// Append-only log of vendor-selection calls.
pub struct AuditLog {
    path: PathBuf,
}

impl AuditLog {
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        seed_json(path, &Vec::<Value>::new())?;
        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    /// Append one record, rewriting the log atomically. Existing entries are
    /// carried over as raw JSON so records from older layouts survive.
    pub fn append(&self, record: &AuditRecord) -> Result<(), StoreError> {
        let mut log: Vec<Value> = read_json(&self.path).unwrap_or_default();
        log.push(serde_json::to_value(record)?);
        write_json_atomic(&self.path, &log, true)
    }

    pub fn read_all(&self) -> Vec<AuditRecord> {
        let raw: Vec<Value> = read_json(&self.path).unwrap_or_default();
        raw.into_iter()
            .filter_map(|v| serde_json::from_value(v).ok())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{now_iso, CandidateScore, VendorPick};
    use serde_json::json;

    fn record(method: &str) -> AuditRecord {
        AuditRecord {
            created_at: now_iso(),
            request: json!({"services_needed": "Packaging"}),
            retrieval_candidates: vec![CandidateScore {
                name: "Acme".to_string(),
                score: 75.0,
            }],
            final_selection: vec![VendorPick {
                name: "Acme".to_string(),
                score: Some(75.0),
                reason: Some("ok".to_string()),
            }],
            method: method.to_string(),
        }
    }

    #[test]
    fn test_append_preserves_order() {
        let dir = tempfile::tempdir().unwrap();
        let log = AuditLog::open(&dir.path().join("audit.json")).unwrap();
        assert!(log.read_all().is_empty());

        log.append(&record("rag_retrieval:local_rerank")).unwrap();
        log.append(&record("rag_retrieval:llm_rerank")).unwrap();

        let all = log.read_all();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].method, "rag_retrieval:local_rerank");
        assert_eq!(all[1].method, "rag_retrieval:llm_rerank");
        assert_eq!(all[0].request["services_needed"], "Packaging");
    }

    #[test]
    fn test_append_keeps_foreign_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.json");
        std::fs::write(&path, r#"[{"legacy": true}]"#).unwrap();
        let log = AuditLog::open(&path).unwrap();

        log.append(&record("rag_retrieval:local_rerank")).unwrap();

        let raw: Vec<Value> = read_json(&path).unwrap();
        assert_eq!(raw.len(), 2);
        assert_eq!(raw[0]["legacy"], true);
        assert_eq!(log.read_all().len(), 1);
    }
}
