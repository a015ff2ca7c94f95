//! # Identity Newtypes
//!
//! Domain-primitive newtypes for identifiers throughout the troom stack.
//! Each identifier is a distinct type — you cannot pass a [`DocumentId`]
//! where a [`TransactionId`] is expected, which rules out the
//! cross-namespace confusion a signature-collection flow is most exposed
//! to (a signer id landing in a document slot authorizes the wrong party).
//!
//! ## Validation
//!
//! UUID-based identifiers ([`DocumentId`], [`TransactionId`], [`UserId`],
//! [`SignatureRequestId`], [`TemplateId`]) are always valid by
//! construction. The string-based [`Auth0Id`] validates its shape at
//! construction time and at deserialization time.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

/// Helper macro to implement `Deserialize` for string newtypes that must
/// validate their contents. Deserializes as a plain `String`, then routes
/// through the type's `new()` constructor so that invalid values are
/// rejected at deserialization time — not silently accepted.
macro_rules! impl_validating_deserialize {
    ($ty:ident) => {
        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let raw = String::deserialize(deserializer)?;
                Self::new(raw).map_err(serde::de::Error::custom)
            }
        }
    };
}

/// Helper macro for UUID-backed identifiers: constructor set, `Default`,
/// `From<Uuid>`, `Display`, and `FromStr` are identical across them.
macro_rules! impl_uuid_id {
    ($ty:ident, $new_doc:literal) => {
        impl $ty {
            #[doc = $new_doc]
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Create an identifier from an existing UUID.
            pub fn from_uuid(id: Uuid) -> Self {
                Self(id)
            }

            /// Access the underlying UUID.
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $ty {
            fn default() -> Self {
                Self::new()
            }
        }

        impl From<Uuid> for $ty {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }

        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $ty {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::from_str(s).map(Self)
            }
        }
    };
}

// ---------------------------------------------------------------------------
// UUID-based identifiers (always valid by construction)
// ---------------------------------------------------------------------------

/// A unique identifier for a document attached to a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentId(Uuid);

impl_uuid_id!(DocumentId, "Create a new random document identifier.");

/// A unique identifier for a property transaction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransactionId(Uuid);

impl_uuid_id!(TransactionId, "Create a new random transaction identifier.");

/// A unique identifier for a user (any participant role).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(Uuid);

impl_uuid_id!(UserId, "Create a new random user identifier.");

/// A unique identifier for a signature request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SignatureRequestId(Uuid);

impl_uuid_id!(
    SignatureRequestId,
    "Create a new random signature request identifier."
);

/// A unique identifier for a document template.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TemplateId(Uuid);

impl_uuid_id!(TemplateId, "Create a new random template identifier.");

// ---------------------------------------------------------------------------
// String-based identifiers (validated at construction)
// ---------------------------------------------------------------------------

/// An Auth0 subject identifier, as presented by the identity provider
/// (e.g. `auth0|64f1c...`, `google-oauth2|1099...`).
///
/// The token itself is verified by the identity collaborator outside this
/// core; here the value is an opaque subject string that must be non-empty
/// and free of whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Auth0Id(String);

impl Auth0Id {
    /// Create a validated Auth0 subject identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidAuth0Id`] if the string is empty
    /// or contains whitespace.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let s = value.into();
        if s.is_empty() || s.chars().any(char::is_whitespace) {
            return Err(ValidationError::InvalidAuth0Id(s));
        }
        Ok(Self(s))
    }

    /// Access the subject string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl_validating_deserialize!(Auth0Id);

impl std::fmt::Display for Auth0Id {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
