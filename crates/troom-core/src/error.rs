//! # Validation Errors
//!
//! Construction-time validation failures for the foundational types.
//! All errors use `thiserror` for derive-based `Display` and `Error`
//! implementations; each variant carries the rejected input so callers
//! can render a precise message without re-deriving context.

use thiserror::Error;

/// A foundational type rejected its input at construction time.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Timestamp string is not RFC 3339 or uses a non-UTC offset.
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),

    /// Auth0 subject identifier is empty or contains whitespace.
    #[error("invalid auth0 identifier: {0:?}")]
    InvalidAuth0Id(String),

    /// Storage handle is empty.
    #[error("invalid file reference: {0:?}")]
    InvalidFileRef(String),

    /// String does not name a known document category.
    #[error("unknown document category: {0:?}")]
    UnknownCategory(String),
}
