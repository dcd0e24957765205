use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::models::{epoch_millis, now_iso, RequestEntry, UploadedFile};

use super::{read_json, seed_json, write_json_atomic, StoreError};

/// A form submission, already split into fields and saved attachments.
#[derive(Debug, Clone, Default)]
pub struct Submission {
    pub fields: BTreeMap<String, String>,
    pub files: Vec<UploadedFile>,
    /// Existing request to update instead of creating a new one
    pub original_id: Option<String>,
    pub status: Option<String>,
}

/// Whole-collection persistence for request entries.
///
/// Implementors only provide `read_all`/`write_all`; create and merge
/// semantics are shared so another backend can be dropped in without
/// touching the handlers.
pub trait RequestRepository: Send + Sync {
    /// All stored entries. Never fails: an unreadable backend reads as empty.
    fn read_all(&self) -> Vec<RequestEntry>;

    /// Replace the stored collection.
    fn write_all(&self, requests: &[RequestEntry]) -> Result<(), StoreError>;

    fn find(&self, id: &str) -> Option<RequestEntry> {
        self.read_all().into_iter().find(|r| r.id == id)
    }

    /// Create a new entry, or merge into `original_id` when one is given.
    fn create(&self, submission: Submission) -> Result<RequestEntry, StoreError> {
        let Submission {
            fields,
            files,
            original_id,
            status,
        } = submission;
        let status = status.filter(|s| !s.is_empty());
        let mut data = self.read_all();

        if let Some(original_id) = original_id.filter(|s| !s.is_empty()) {
            let entry = data
                .iter_mut()
                .find(|e| e.id == original_id)
                .ok_or_else(|| StoreError::NotFound("originalId".to_string()))?;

            entry.body.extend(fields);
            entry.files.extend(files);
            if status.is_some() {
                entry.status = status;
            }
            entry.updated_at = Some(now_iso());
            let updated = entry.clone();

            self.write_all(&data)?;
            tracing::info!(
                "Updated request {} ({} files total)",
                updated.id,
                updated.files.len()
            );
            return Ok(updated);
        }

        let entry = RequestEntry {
            id: next_request_id(&data),
            created_at: now_iso(),
            body: fields,
            files,
            status,
            updated_at: None,
        };
        tracing::info!(
            "Creating request {} (body keys: {:?}, files: {})",
            entry.id,
            entry.body.keys().collect::<Vec<_>>(),
            entry.files.len()
        );
        data.push(entry.clone());
        self.write_all(&data)?;
        Ok(entry)
    }
}

/// `REQ-<epoch-ms>`, bumped past any millisecond already taken.
fn next_request_id(existing: &[RequestEntry]) -> String {
    let mut millis = epoch_millis();
    loop {
        let id = format!("REQ-{millis}");
        if !existing.iter().any(|e| e.id == id) {
            return id;
        }
        millis += 1;
    }
}

/// Requests kept as a pretty-printed JSON array in a single file.
pub struct JsonRequestStore {
    path: PathBuf,
}

impl JsonRequestStore {
    /// Open the store, creating an empty array file if none exists.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        seed_json(path, &Vec::<RequestEntry>::new())?;
        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RequestRepository for JsonRequestStore {
    fn read_all(&self) -> Vec<RequestEntry> {
        read_json(&self.path).unwrap_or_default()
    }

    fn write_all(&self, requests: &[RequestEntry]) -> Result<(), StoreError> {
        write_json_atomic(&self.path, requests, true)
    }
}
