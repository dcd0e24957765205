//! Flat-file JSON persistence.
//!
//! Every store keeps one JSON document under the data directory. Reads are
//! lenient (missing or corrupt files read as empty) and writes replace the
//! whole document via a sibling temp file and a rename, so a reader only ever
//! sees a complete file. There is no cross-request locking: two concurrent
//! writers race and the last rename wins.

pub mod audit;
pub mod catalog;
pub mod embeddings;
pub mod requests;

use std::ffi::OsString;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

pub use audit::AuditLog;
pub use catalog::VendorCatalog;
pub use embeddings::{EmbeddingCache, EmbeddingMap};
pub use requests::{JsonRequestStore, RequestRepository, Submission};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{0} not found")]
    NotFound(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Read and parse a JSON document, treating a missing or unparsable file as absent.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Option<T> {
    let data = std::fs::read_to_string(path).ok()?;
    match serde_json::from_str(&data) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!("Ignoring unreadable data file {}: {e}", path.display());
            None
        }
    }
}

/// Sibling temp path used for atomic replacement (`requests.json` -> `requests.json.tmp`).
pub fn temp_path(path: &Path) -> PathBuf {
    let mut name: OsString = path.file_name().map(OsString::from).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Serialize `value` to a temp file next to `path`, then rename it over `path`.
pub fn write_json_atomic<T: Serialize + ?Sized>(
    path: &Path,
    value: &T,
    pretty: bool,
) -> Result<(), StoreError> {
    let data = if pretty {
        serde_json::to_vec_pretty(value)?
    } else {
        serde_json::to_vec(value)?
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let tmp = temp_path(path);
    {
        let mut file = std::fs::File::create(&tmp)?;
        file.write_all(&data)?;
        file.sync_all()?;
    }
    std::fs::rename(&tmp, path)?;
    Ok(())
}

/// Create `path` holding `initial` unless it already exists.
pub fn seed_json<T: Serialize + ?Sized>(path: &Path, initial: &T) -> Result<(), StoreError> {
    if path.exists() {
        return Ok(());
    }
    write_json_atomic(path, initial, true)
}
