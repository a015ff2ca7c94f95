//! # Signature Request Records
//!
//! The per-signer request record and the eligibility verdict the ledger
//! answers signing queries with.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use troom_core::{DocumentId, SignatureRequestId, Timestamp, UserId};

// ---------------------------------------------------------------------------
// Signature request
// ---------------------------------------------------------------------------

/// A request for one participant's signature on one document.
///
/// A request moves through three shapes, always in place:
///
/// - **pending** — `is_signed == false`, no rejection reason;
/// - **fulfilled** — `is_signed == true`, `signed_at` set;
/// - **rejected** — `is_signed == false`, `rejection_reason` set.
///
/// A request is never both fulfilled and rejected: rejection clears any
/// previously recorded signature.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignatureRequest {
    /// Unique request identity.
    pub request_id: SignatureRequestId,
    /// The document to be signed.
    pub document_id: DocumentId,
    /// The participant whose signature is requested.
    pub signer_id: UserId,
    /// Whether the signature has been collected.
    pub is_signed: bool,
    /// When the signature was collected.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signed_at: Option<Timestamp>,
    /// Why the signer refused, when they did.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
    /// When the request was issued.
    pub requested_at: Timestamp,
}

impl SignatureRequest {
    /// Create a new pending request.
    pub fn new(document_id: DocumentId, signer_id: UserId) -> Self {
        Self {
            request_id: SignatureRequestId::new(),
            document_id,
            signer_id,
            is_signed: false,
            signed_at: None,
            rejection_reason: None,
            requested_at: Timestamp::now(),
        }
    }

    /// Whether the request is still actionable: not fulfilled, not rejected.
    pub fn is_pending(&self) -> bool {
        !self.is_signed && self.rejection_reason.is_none()
    }
}

// ---------------------------------------------------------------------------
// Eligibility
// ---------------------------------------------------------------------------

/// The ledger's verdict on whether a participant may sign a document now.
///
/// A three-way answer instead of a boolean so callers can distinguish
/// "already done" from "was never asked" without a second lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SigningEligibility {
    /// A pending request exists; the participant may sign now.
    Eligible,
    /// The participant already fulfilled their request.
    AlreadySigned,
    /// No actionable request exists for this participant. Covers both
    /// "never asked" and "their request was rejected".
    NotASigner,
}

impl SigningEligibility {
    /// Whether this verdict permits signing.
    pub fn can_sign(&self) -> bool {
        matches!(self, Self::Eligible)
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors from ledger operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SigningError {
    /// No pending signature request exists for this signer.
    #[error("user {signer_id} cannot sign document {document_id}: no pending signature request")]
    UserCannotSign {
        /// The document.
        document_id: DocumentId,
        /// The would-be signer.
        signer_id: UserId,
    },

    /// The signer already fulfilled their signature request.
    #[error("user {signer_id} has already signed document {document_id}")]
    DocumentAlreadySigned {
        /// The document.
        document_id: DocumentId,
        /// The signer.
        signer_id: UserId,
    },

    /// A request for this (document, signer) pair already exists.
    #[error("signature already requested from user {signer_id} for document {document_id}")]
    SignatureAlreadyRequested {
        /// The document.
        document_id: DocumentId,
        /// The signer.
        signer_id: UserId,
    },
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
