//! # File References
//!
//! Newtype for the storage key of a document file. A [`FileRef`] is an
//! opaque handle into whatever file store backs the deployment (S3 key,
//! GCS object name, local path in tests). The document flow never parses
//! it; it only passes it back to the store.
//!
//! ## Validation
//!
//! [`FileRef`] is validated to be non-empty at construction time. An empty
//! storage key is always a bug upstream, never a valid document.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

// -- Validating Deserialize for FileRef ----------------------------------------

impl<'de> Deserialize<'de> for FileRef {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::new(raw).map_err(serde::de::Error::custom)
    }
}

/// A reference to a stored document file.
///
/// The value is an opaque storage key. No format restrictions beyond
/// non-emptiness are imposed because key layout is a property of the
/// configured file store, not of the document flow.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct FileRef(String);

impl FileRef {
    /// Create a file reference from a string, validating non-emptiness.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidFileRef`] if the string is empty
    /// or whitespace-only.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let raw = value.into();
        if raw.trim().is_empty() {
            return Err(ValidationError::InvalidFileRef(raw));
        }
        Ok(Self(raw))
    }

    /// Access the storage key string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for FileRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
