//! # Document Flow Errors
//!
//! Unified error type for [`DocumentFlowService`](crate::DocumentFlowService)
//! plus the boundary classification the hosting layer consumes. Domain
//! errors from troom-state and troom-signing, and collaborator errors, all
//! converge here; nothing is swallowed and nothing is retried. This crate
//! exposes no HTTP surface, so classification is a plain enum ([`ErrorClass`])
//! rather than status codes.

use thiserror::Error;

use troom_core::{DocumentId, TemplateId, TransactionId, UserId};
use troom_signing::SigningError;
use troom_state::{DocumentStatus, StatusError};

use crate::access::AccessError;
use crate::storage::StorageError;

// ---------------------------------------------------------------------------
// DocflowError
// ---------------------------------------------------------------------------

/// Errors surfaced by document flow operations.
#[derive(Debug, Error)]
pub enum DocflowError {
    /// The requested action is not legal from the document's current
    /// status (Conflict).
    #[error("invalid document transition: action '{action}' is not legal from status {from}")]
    InvalidStatusTransition {
        /// Status the document was in when the action was attempted.
        from: DocumentStatus,
        /// Name of the attempted action.
        action: &'static str,
    },

    /// No document with this identifier (NotFound).
    #[error("document {document_id} not found")]
    DocumentNotFound {
        /// The identifier that failed to resolve.
        document_id: DocumentId,
    },

    /// No registered template with this identifier (NotFound).
    #[error("document template {template_id} not found")]
    DocumentTemplateNotFound {
        /// The identifier that failed to resolve.
        template_id: TemplateId,
    },

    /// Signatures were requested on a document that is not collecting
    /// them (Conflict).
    #[error("document {document_id} is not awaiting signatures (status {status})")]
    DocumentNotReadyForSignatures {
        /// The document in question.
        document_id: DocumentId,
        /// Its status at the time of the attempt.
        status: DocumentStatus,
    },

    /// The nominated signer is not a declared participant of the
    /// transaction (Validation).
    #[error("user {user_id} is not a participant of transaction {transaction_id}")]
    UserNotInTransaction {
        /// The transaction whose participant list was consulted.
        transaction_id: TransactionId,
        /// The nominated signer.
        user_id: UserId,
    },

    /// Signature ledger violation (Conflict).
    #[error(transparent)]
    Signing(#[from] SigningError),

    /// Authorization failure, distinct from status failures.
    #[error(transparent)]
    Access(#[from] AccessError),

    /// File storage failure (Internal). Propagated as-is, never retried.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Lift a pure transition failure into the service error, keeping the
/// from-status and action context.
impl From<StatusError> for DocflowError {
    fn from(err: StatusError) -> Self {
        match err {
            StatusError::InvalidTransition { from, action } => {
                Self::InvalidStatusTransition { from, action }
            }
        }
    }
}

impl DocflowError {
    /// Classify this error for the hosting boundary.
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::Access(AccessError::NotAParticipant { .. }) => ErrorClass::Forbidden,
            Self::Access(AccessError::TransactionNotFound { .. })
            | Self::DocumentNotFound { .. }
            | Self::DocumentTemplateNotFound { .. } => ErrorClass::NotFound,
            Self::InvalidStatusTransition { .. }
            | Self::DocumentNotReadyForSignatures { .. }
            | Self::Signing(_) => ErrorClass::Conflict,
            Self::UserNotInTransaction { .. } => ErrorClass::Validation,
            Self::Access(AccessError::Backend { .. }) | Self::Storage(_) => ErrorClass::Internal,
        }
    }
}

// ---------------------------------------------------------------------------
// ErrorClass
// ---------------------------------------------------------------------------

/// Coarse classification the hosting layer maps onto its own status codes.
///
/// Access denials and state conflicts are deliberately distinct: "you may
/// not touch this transaction" is `Forbidden`, "the document is not in a
/// state that allows this" is `Conflict`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    /// Caller lacks access to the transaction.
    Forbidden,
    /// A referenced document, template, or transaction does not exist.
    NotFound,
    /// The operation conflicts with current document or ledger state.
    Conflict,
    /// The request referenced something structurally invalid, such as a
    /// signer outside the transaction.
    Validation,
    /// Collaborator failure; safe to retry from outside, never retried here.
    Internal,
}

impl ErrorClass {
    /// Machine-readable class name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Forbidden => "FORBIDDEN",
            Self::NotFound => "NOT_FOUND",
            Self::Conflict => "CONFLICT",
            Self::Validation => "VALIDATION",
            Self::Internal => "INTERNAL",
        }
    }
}

impl std::fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
