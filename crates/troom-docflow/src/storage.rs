//! # File Store Interface
//!
//! Defines the storage seam for document content. The document flow holds
//! only opaque [`FileRef`] handles; reading, writing, and serving bytes is
//! the store's business.
//!
//! Production deployments implement [`FileStore`] against an object store
//! (S3, GCS); tests use [`InMemoryFileStore`]. Storage failures propagate
//! as-is — the document flow performs no retries.

use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use troom_core::FileRef;

// ---------------------------------------------------------------------------
// Upload type
// ---------------------------------------------------------------------------

/// An uploaded document file: new content for an existing document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentFile {
    /// Original file name of the upload (e.g., "purchase-agreement-v2.pdf").
    pub file_name: String,
    /// Media type of the content (e.g., "application/pdf").
    pub media_type: String,
    /// Raw file content.
    pub bytes: Vec<u8>,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors from file store operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// No content exists at the given path.
    #[error("file not found in store: {path}")]
    FileNotFound {
        /// The missing path.
        path: String,
    },

    /// The storage backend failed.
    #[error("storage backend error: {reason}")]
    Backend {
        /// Description of the backend failure.
        reason: String,
    },
}

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// Document content storage.
///
/// Implementations must be `Send + Sync` so they can be shared behind an
/// `Arc`. The trait is object-safe.
pub trait FileStore: Send + Sync {
    /// Copy the content at `path` to a fresh path and return it.
    ///
    /// Used when materializing a document from a template: the template's
    /// file stays untouched and the document gets its own working copy.
    fn duplicate_file(&self, path: &FileRef) -> Result<FileRef, StorageError>;

    /// Store uploaded content as the replacement for `old_path`, returning
    /// the path of the new content. The previous content is removed when
    /// present.
    fn replace_document(
        &self,
        file: &DocumentFile,
        old_path: &FileRef,
    ) -> Result<FileRef, StorageError>;

    /// Produce a time-limited URL for viewing the content at `path`.
    fn generate_secure_url(&self, path: &FileRef, expiry_hours: u32)
        -> Result<String, StorageError>;

    /// Remove the content at `path`.
    fn delete_file(&self, path: &FileRef) -> Result<(), StorageError>;
}

// ---------------------------------------------------------------------------
// In-memory implementation
// ---------------------------------------------------------------------------

/// In-memory file store for testing and development.
///
/// Content lives in a `DashMap` keyed by path string. Duplicated files
/// land under `copies/{n}/` with a monotonic counter, and replacements
/// land next to the path they replace, named after the upload.
#[derive(Debug, Default)]
pub struct InMemoryFileStore {
    objects: DashMap<String, Vec<u8>>,
    copy_counter: AtomicU64,
}

impl InMemoryFileStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed content at a path.
    pub fn put(&self, path: &FileRef, bytes: Vec<u8>) {
        self.objects.insert(path.as_str().to_string(), bytes);
    }

    /// Read the content at a path, if any.
    pub fn contents(&self, path: &FileRef) -> Option<Vec<u8>> {
        self.objects.get(path.as_str()).map(|b| b.clone())
    }

    /// Number of stored objects.
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    fn wrap_path(path: String) -> Result<FileRef, StorageError> {
        FileRef::new(path).map_err(|e| StorageError::Backend {
            reason: e.to_string(),
        })
    }
}

impl FileStore for InMemoryFileStore {
    fn duplicate_file(&self, path: &FileRef) -> Result<FileRef, StorageError> {
        let bytes = self
            .objects
            .get(path.as_str())
            .map(|b| b.clone())
            .ok_or_else(|| StorageError::FileNotFound {
                path: path.as_str().to_string(),
            })?;

        let n = self.copy_counter.fetch_add(1, Ordering::Relaxed);
        let basename = path.as_str().rsplit('/').next().unwrap_or(path.as_str());
        let new_path = Self::wrap_path(format!("copies/{n}/{basename}"))?;
        self.objects.insert(new_path.as_str().to_string(), bytes);
        Ok(new_path)
    }

    fn replace_document(
        &self,
        file: &DocumentFile,
        old_path: &FileRef,
    ) -> Result<FileRef, StorageError> {
        let new_key = match old_path.as_str().rsplit_once('/') {
            Some((prefix, _)) => format!("{prefix}/{}", file.file_name),
            None => file.file_name.clone(),
        };
        let new_path = Self::wrap_path(new_key)?;

        if new_path != *old_path {
            self.objects.remove(old_path.as_str());
        }
        self.objects
            .insert(new_path.as_str().to_string(), file.bytes.clone());
        Ok(new_path)
    }

    fn generate_secure_url(
        &self,
        path: &FileRef,
        expiry_hours: u32,
    ) -> Result<String, StorageError> {
        if !self.objects.contains_key(path.as_str()) {
            return Err(StorageError::FileNotFound {
                path: path.as_str().to_string(),
            });
        }
        Ok(format!(
            "https://files.mock.invalid/{}?expires={}h",
            path.as_str(),
            expiry_hours
        ))
    }

    fn delete_file(&self, path: &FileRef) -> Result<(), StorageError> {
        self.objects
            .remove(path.as_str())
            .map(|_| ())
            .ok_or_else(|| StorageError::FileNotFound {
                path: path.as_str().to_string(),
            })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn pdf(name: &str, content: &str) -> DocumentFile {
        DocumentFile {
            file_name: name.to_string(),
            media_type: "application/pdf".to_string(),
            bytes: content.as_bytes().to_vec(),
        }
    }

    #[test]
    fn duplicate_copies_content_to_fresh_path() {
        let store = InMemoryFileStore::new();
        let template = FileRef::new("templates/purchase-agreement.pdf").unwrap();
        store.put(&template, b"template body".to_vec());

        let copy = store.duplicate_file(&template).unwrap();
        assert_ne!(copy, template);
        assert_eq!(store.contents(&copy).as_deref(), Some(&b"template body"[..]));
        // Original untouched.
        assert_eq!(
            store.contents(&template).as_deref(),
            Some(&b"template body"[..])
        );
    }

    #[test]
    fn duplicates_of_one_file_get_distinct_paths() {
        let store = InMemoryFileStore::new();
        let template = FileRef::new("templates/disclosure.pdf").unwrap();
        store.put(&template, b"x".to_vec());

        let a = store.duplicate_file(&template).unwrap();
        let b = store.duplicate_file(&template).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn duplicate_missing_file_fails() {
        let store = InMemoryFileStore::new();
        let missing = FileRef::new("templates/nope.pdf").unwrap();
        assert!(matches!(
            store.duplicate_file(&missing),
            Err(StorageError::FileNotFound { .. })
        ));
    }

    #[test]
    fn replace_stores_new_content_next_to_old() {
        let store = InMemoryFileStore::new();
        let old = FileRef::new("docs/t1/contract.pdf").unwrap();
        store.put(&old, b"v1".to_vec());

        let new_path = store
            .replace_document(&pdf("contract-v2.pdf", "v2"), &old)
            .unwrap();
        assert_eq!(new_path.as_str(), "docs/t1/contract-v2.pdf");
        assert_eq!(store.contents(&new_path).as_deref(), Some(&b"v2"[..]));
        assert!(store.contents(&old).is_none());
    }

    #[test]
    fn replace_with_same_name_overwrites_in_place() {
        let store = InMemoryFileStore::new();
        let old = FileRef::new("docs/t1/contract.pdf").unwrap();
        store.put(&old, b"v1".to_vec());

        let new_path = store
            .replace_document(&pdf("contract.pdf", "v2"), &old)
            .unwrap();
        assert_eq!(new_path, old);
        assert_eq!(store.contents(&old).as_deref(), Some(&b"v2"[..]));
    }

    #[test]
    fn secure_url_names_path_and_expiry() {
        let store = InMemoryFileStore::new();
        let path = FileRef::new("docs/t1/title.pdf").unwrap();
        store.put(&path, b"x".to_vec());

        let url = store.generate_secure_url(&path, 24).unwrap();
        assert!(url.contains("docs/t1/title.pdf"));
        assert!(url.contains("expires=24h"));
    }

    #[test]
    fn secure_url_for_missing_file_fails() {
        let store = InMemoryFileStore::new();
        let missing = FileRef::new("docs/none.pdf").unwrap();
        assert!(matches!(
            store.generate_secure_url(&missing, 24),
            Err(StorageError::FileNotFound { .. })
        ));
    }

    #[test]
    fn delete_removes_content() {
        let store = InMemoryFileStore::new();
        let path = FileRef::new("docs/t1/old.pdf").unwrap();
        store.put(&path, b"x".to_vec());

        store.delete_file(&path).unwrap();
        assert!(store.contents(&path).is_none());
        assert!(matches!(
            store.delete_file(&path),
            Err(StorageError::FileNotFound { .. })
        ));
    }

    #[test]
    fn trait_is_object_safe() {
        let store: std::sync::Arc<dyn FileStore> = std::sync::Arc::new(InMemoryFileStore::new());
        let missing = FileRef::new("x.pdf").unwrap();
        assert!(store.duplicate_file(&missing).is_err());
    }
}
