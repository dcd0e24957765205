//! Attachment storage for request submissions.

use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::Path;

use crate::models::{epoch_millis, UploadedFile};

/// URL prefix uploads are served under.
pub const UPLOADS_URL_PREFIX: &str = "/uploads";

/// Keep `[A-Za-z0-9._-]`, replace everything else with `_`.
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Write `data` under `upload_dir` as `<epoch-ms>_<sanitized name>`.
///
/// An existing file is never overwritten: when the name is taken the
/// millisecond prefix is bumped until it is free.
pub fn save_upload(upload_dir: &Path, original_name: &str, data: &[u8]) -> std::io::Result<UploadedFile> {
    std::fs::create_dir_all(upload_dir)?;
    let sanitized = sanitize_filename(original_name);
    let mut millis = epoch_millis();

    loop {
        let stored_name = format!("{millis}_{sanitized}");
        match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(upload_dir.join(&stored_name))
        {
            Ok(mut file) => {
                file.write_all(data)?;
                file.sync_all()?;
                return Ok(UploadedFile {
                    originalname: original_name.to_string(),
                    path: format!("{UPLOADS_URL_PREFIX}/{stored_name}"),
                    size: data.len() as u64,
                });
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => millis += 1,
            Err(e) => return Err(e),
        }
    }
}

/// A single path segment safe to join onto a serving directory.
/// Dots inside a name (`report..final.pdf`) are fine.
pub fn is_safe_file_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains('/')
        && !name.contains('\\')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("spec sheet (v2).pdf"), "spec_sheet__v2_.pdf");
        assert_eq!(sanitize_filename("ok-name_1.txt"), "ok-name_1.txt");
        assert_eq!(sanitize_filename("../etc/passwd"), ".._etc_passwd");
        assert_eq!(sanitize_filename("résumé.doc"), "r_sum_.doc");
    }

    #[test]
    fn test_save_upload() {
        let dir = tempfile::tempdir().unwrap();
        let saved = save_upload(dir.path(), "my file.txt", b"hello").unwrap();

        assert_eq!(saved.originalname, "my file.txt");
        assert_eq!(saved.size, 5);
        assert!(saved.path.starts_with("/uploads/"));
        assert!(saved.path.ends_with("_my_file.txt"));

        let stored = saved.path.trim_start_matches("/uploads/");
        assert_eq!(std::fs::read(dir.path().join(stored)).unwrap(), b"hello");
    }

    #[test]
    fn test_is_safe_file_name() {
        assert!(is_safe_file_name("REQ-1_rfp.txt"));
        assert!(!is_safe_file_name(".."));
        assert!(!is_safe_file_name("a/../b"));
        assert!(!is_safe_file_name("a\\b"));
        assert!(!is_safe_file_name(""));
        assert!(!is_safe_file_name("."));
        assert!(is_safe_file_name("1700000000000_report..final.pdf"));
    }

    #[test]
    fn test_save_upload_keeps_double_dot_names_servable() {
        let dir = tempfile::tempdir().unwrap();
        let saved = save_upload(dir.path(), "report..final.pdf", b"hi").unwrap();
        let stored = saved.path.trim_start_matches("/uploads/");
        assert!(stored.ends_with("_report..final.pdf"));
        assert!(is_safe_file_name(stored));
    }

    #[test]
    fn test_save_upload_same_name_twice_keeps_both() {
        let dir = tempfile::tempdir().unwrap();
        let first = save_upload(dir.path(), "photo.png", b"first-file").unwrap();
        let second = save_upload(dir.path(), "photo.png", b"second").unwrap();

        assert_ne!(first.path, second.path);
        assert_eq!(first.size, 10);
        assert_eq!(second.size, 6);

        let read = |p: &str| std::fs::read(dir.path().join(p.trim_start_matches("/uploads/"))).unwrap();
        assert_eq!(read(&first.path), b"first-file");
        assert_eq!(read(&second.path), b"second");
    }
}
