//! Document store boundary.
//!
//! Uploaded files live outside the engine; all the engine records is the
//! durable URL the store hands back. The filesystem impl backs the CLI and
//! local dev.

use std::path::PathBuf;

use uuid::Uuid;

use crate::error::{Error, Result};

/// Accepts a file, returns a durable reference URL.
pub trait DocumentStore {
    fn store(&self, name: &str, bytes: &[u8]) -> Result<String>;
}

/// Filesystem-backed store: writes under a base directory and returns a
/// `file://` URL.
pub struct FsDocumentStore {
    base_dir: PathBuf,
}

impl FsDocumentStore {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }
}

impl DocumentStore for FsDocumentStore {
    fn store(&self, name: &str, bytes: &[u8]) -> Result<String> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| Error::Other(format!("failed to create document dir: {e}")))?;

        // Prefix with a fresh UUID so equal names never collide.
        let file_name = format!("{}-{name}", Uuid::new_v4());
        let path = self.base_dir.join(&file_name);
        std::fs::write(&path, bytes)
            .map_err(|e| Error::Other(format!("failed to store document: {e}")))?;

        let absolute = path
            .canonicalize()
            .map_err(|e| Error::Other(format!("failed to resolve document path: {e}")))?;
        Ok(format!("file://{}", absolute.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stores_and_returns_a_file_url() {
        let dir = std::env::temp_dir().join(format!("jansewa-docs-{}", Uuid::new_v4()));
        let store = FsDocumentStore::new(&dir);

        let url = store.store("aadhaar.pdf", b"scan bytes").unwrap();
        assert!(url.starts_with("file://"));
        assert!(url.ends_with("aadhaar.pdf"));

        let path = url.strip_prefix("file://").unwrap();
        assert_eq!(std::fs::read(path).unwrap(), b"scan bytes");

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn equal_names_get_distinct_urls() {
        let dir = std::env::temp_dir().join(format!("jansewa-docs-{}", Uuid::new_v4()));
        let store = FsDocumentStore::new(&dir);

        let a = store.store("photo.jpg", b"a").unwrap();
        let b = store.store("photo.jpg", b"b").unwrap();
        assert_ne!(a, b);

        std::fs::remove_dir_all(&dir).ok();
    }
}
